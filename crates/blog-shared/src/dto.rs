//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Public view of a post's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUserResponse {
    pub id: String,
    pub username: String,
}

/// A post as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub user: PostUserResponse,
    pub published_date: String,
}

/// Body of a new post. Mirrors the create schema; sent by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritePostRequest {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// Partial post update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
