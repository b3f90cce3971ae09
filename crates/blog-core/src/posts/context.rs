//! Per-request context threaded through the guards.

use crate::domain::{Post, User};

/// No authenticated caller yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

/// No post looked up yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unresolved;

/// Post found by the lookup guard.
#[derive(Debug, Clone)]
pub struct Resolved(Post);

/// Post found and confirmed to belong to the caller.
#[derive(Debug, Clone)]
pub struct Owned(Post);

/// Immutable request state. `U` is the caller, `P` the post lookup state.
#[derive(Debug, Clone, Default)]
pub struct RequestContext<U = Anonymous, P = Unresolved> {
    user: U,
    post: P,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P> RequestContext<Anonymous, P> {
    /// Attach the identity established by the authentication layer.
    pub fn authenticated(self, user: User) -> RequestContext<User, P> {
        RequestContext {
            user,
            post: self.post,
        }
    }
}

impl<P> RequestContext<User, P> {
    pub fn user(&self) -> &User {
        &self.user
    }
}

impl<U> RequestContext<U, Unresolved> {
    pub(crate) fn resolved(self, post: Post) -> RequestContext<U, Resolved> {
        RequestContext {
            user: self.user,
            post: Resolved(post),
        }
    }
}

impl<U> RequestContext<U, Resolved> {
    pub fn post(&self) -> &Post {
        &self.post.0
    }

    pub fn into_post(self) -> Post {
        self.post.0
    }
}

impl RequestContext<User, Resolved> {
    pub(crate) fn owned(self) -> RequestContext<User, Owned> {
        RequestContext {
            user: self.user,
            post: Owned(self.post.0),
        }
    }
}

impl<U> RequestContext<U, Owned> {
    pub fn post(&self) -> &Post {
        &self.post.0
    }
}
