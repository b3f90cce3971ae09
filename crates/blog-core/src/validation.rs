//! Declarative payload validation.
//!
//! A [`Schema`] is a list of [`FieldRule`]s. [`Schema::validate`] checks a JSON
//! payload against them and reports every violation it finds. Keys that no
//! rule mentions are ignored; they are dropped when the payload is decoded.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Shape a field's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty string.
    Text,
    /// Array of non-empty strings; the array itself may be empty.
    TextList,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    rules: &'static [FieldRule],
}

/// Payload for creating a post.
pub const CREATE_POST: Schema = Schema::new(&[
    FieldRule::required("title", FieldKind::Text),
    FieldRule::required("body", FieldKind::Text),
    FieldRule::required("tags", FieldKind::TextList),
]);

/// Payload for patching a post.
pub const UPDATE_POST: Schema = Schema::new(&[
    FieldRule::optional("title", FieldKind::Text),
    FieldRule::optional("body", FieldKind::Text),
    FieldRule::optional("tags", FieldKind::TextList),
]);

impl Schema {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    pub fn validate(&self, payload: &Value) -> Result<(), ValidationError> {
        let Some(object) = payload.as_object() else {
            return Err(ValidationError::from_violations(vec![Violation::new(
                "value",
                ViolationKind::NotObject,
            )]));
        };

        let violations: Vec<Violation> = self
            .rules
            .iter()
            .flat_map(|rule| check_field(rule, object))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::from_violations(violations))
        }
    }
}

fn check_field(rule: &FieldRule, object: &Map<String, Value>) -> Vec<Violation> {
    let Some(value) = object.get(rule.name) else {
        return if rule.required {
            vec![Violation::new(rule.name, ViolationKind::Required)]
        } else {
            Vec::new()
        };
    };

    match rule.kind {
        FieldKind::Text => check_text(rule.name.to_string(), value)
            .into_iter()
            .collect(),
        FieldKind::TextList => match value.as_array() {
            Some(items) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| check_text(format!("{}[{}]", rule.name, i), item))
                .collect(),
            None => vec![Violation::new(rule.name, ViolationKind::NotList)],
        },
    }
}

fn check_text(path: String, value: &Value) -> Option<Violation> {
    match value.as_str() {
        Some("") => Some(Violation::new(path, ViolationKind::EmptyText)),
        Some(_) => None,
        None => Some(Violation::new(path, ViolationKind::NotText)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    NotObject,
    Required,
    NotText,
    EmptyText,
    NotList,
}

/// One failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        let path = path.into();
        let message = match kind {
            ViolationKind::NotObject => format!("\"{path}\" must be an object"),
            ViolationKind::Required => format!("\"{path}\" is required"),
            ViolationKind::NotText => format!("\"{path}\" must be a string"),
            ViolationKind::EmptyText => format!("\"{path}\" is not allowed to be empty"),
            ViolationKind::NotList => format!("\"{path}\" must be an array"),
        };
        Self {
            path,
            kind,
            message,
        }
    }
}

/// Structured validation failure, serialized as the 400 response detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub message: String,
    pub details: Vec<Violation>,
}

impl ValidationError {
    fn from_violations(details: Vec<Violation>) -> Self {
        let message = details
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join(". ");
        Self { message, details }
    }

    /// Failure for a payload that passed the schema but could not be decoded.
    pub fn malformed(detail: impl fmt::Display) -> Self {
        Self {
            message: detail.to_string(),
            details: Vec::new(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}
