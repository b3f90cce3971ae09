use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Number of body characters kept in list previews.
pub const PREVIEW_LENGTH: usize = 200;

/// Appended to a body that was cut for a preview.
pub const PREVIEW_MARKER: &str = " ...";

/// Post entity - a titled, tagged, owned piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub user: User,
    pub published_date: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `user`.
    ///
    /// Ids are UUIDv7, so ordering by id is ordering by creation time.
    pub fn new(draft: PostDraft, user: User) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: draft.title,
            body: draft.body,
            tags: draft.tags,
            user,
            published_date: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user.id == user.id
    }

    /// Replace only the fields present in `patch`.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }

    /// The post as shown in listings, with a long body cut down.
    pub fn into_preview(mut self) -> Self {
        if let Some((cut, _)) = self.body.char_indices().nth(PREVIEW_LENGTH) {
            self.body.truncate(cut);
            self.body.push_str(PREVIEW_MARKER);
        }
        self
    }
}

/// Validated input for a new post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// Partial update; `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.tags.is_none()
    }
}

/// Listing filter. Every present criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub tag: Option<String>,
    pub username: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        let tag_ok = self
            .tag
            .as_ref()
            .is_none_or(|tag| post.tags.iter().any(|t| t == tag));
        let user_ok = self
            .username
            .as_ref()
            .is_none_or(|name| &post.user.username == name);
        tag_ok && user_ok
    }
}
