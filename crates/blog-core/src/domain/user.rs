use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User identity - who authored a post or is acting on one.
///
/// Credentials live with the external auth service; the blog only
/// ever sees the id and username carried by a validated token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

impl User {
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}
