//! Domain entities - the core business objects.

mod user;

mod post;

pub use post::{Post, PostDraft, PostFilter, PostPatch, PREVIEW_LENGTH, PREVIEW_MARKER};
pub use user::User;
