//! Post request pipeline.
//!
//! A request starts as an empty [`RequestContext`]. Guards in [`guard`] consume
//! it and hand back an enriched one (post resolved, ownership checked), or stop
//! with a [`DomainError`](crate::DomainError). The operations in [`service`]
//! name the context state they need in their signatures, so a handler cannot
//! call `update` without having run both guards first.

pub mod context;
pub mod guard;
pub mod service;

pub use context::{Anonymous, Owned, RequestContext, Resolved, Unresolved};
pub use guard::{check_ownership, parse_post_id, resolve_post};
pub use service::{ListQuery, PAGE_SIZE, PostPage, list, read, remove, update, write};

#[cfg(test)]
pub(crate) mod testing;
