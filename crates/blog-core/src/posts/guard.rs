//! Lookup and ownership guards.

use uuid::Uuid;

use super::context::{Owned, RequestContext, Resolved, Unresolved};
use crate::domain::User;
use crate::error::DomainError;
use crate::ports::PostRepository;

/// Parse a post id from a path segment.
pub fn parse_post_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::try_parse(raw).map_err(|_| DomainError::InvalidId(raw.to_string()))
}

/// Look up the post named by `raw_id` and attach it to the context.
pub async fn resolve_post<U>(
    repo: &dyn PostRepository,
    ctx: RequestContext<U, Unresolved>,
    raw_id: &str,
) -> Result<RequestContext<U, Resolved>, DomainError> {
    let id = parse_post_id(raw_id)?;

    match repo.find_by_id(id).await? {
        Some(post) => Ok(ctx.resolved(post)),
        None => {
            tracing::debug!(post_id = %id, "Post not found");
            Err(DomainError::NotFound {
                entity_type: "Post",
                id: id.to_string(),
            })
        }
    }
}

/// Only the post's owner may go on to mutate it.
pub fn check_ownership(
    ctx: RequestContext<User, Resolved>,
) -> Result<RequestContext<User, Owned>, DomainError> {
    if ctx.post().is_owned_by(ctx.user()) {
        return Ok(ctx.owned());
    }

    tracing::debug!(
        post_id = %ctx.post().id,
        user_id = %ctx.user().id,
        "Rejected mutation by non-owner"
    );
    Err(DomainError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::testing::{StubRepository, draft, user};

    #[tokio::test]
    async fn test_resolve_rejects_malformed_id() {
        let repo = StubRepository::default();

        let err = resolve_post(&repo, RequestContext::new(), "not-a-uuid")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidId(raw) if raw == "not-a-uuid"));
        assert_eq!(repo.queries(), 0);
    }

    #[tokio::test]
    async fn test_resolve_reports_missing_post() {
        let repo = StubRepository::default();
        let id = Uuid::now_v7().to_string();

        let err = resolve_post(&repo, RequestContext::new(), &id)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { id: missing, .. } if missing == id));
    }

    #[tokio::test]
    async fn test_resolve_attaches_post() {
        let alice = user("alice");
        let repo = StubRepository::with_posts(vec![crate::domain::Post::new(draft("t"), alice)]);
        let stored = repo.all()[0].clone();

        let ctx = resolve_post(&repo, RequestContext::new(), &stored.id.to_string())
            .await
            .unwrap();

        assert_eq!(ctx.post(), &stored);
    }

    #[tokio::test]
    async fn test_ownership_allows_owner_and_rejects_others() {
        let alice = user("alice");
        let repo = StubRepository::with_posts(vec![crate::domain::Post::new(
            draft("t"),
            alice.clone(),
        )]);
        let id = repo.all()[0].id.to_string();

        let owner_ctx = resolve_post(&repo, RequestContext::new().authenticated(alice), &id)
            .await
            .unwrap();
        assert!(check_ownership(owner_ctx).is_ok());

        let other_ctx = resolve_post(&repo, RequestContext::new().authenticated(user("bob")), &id)
            .await
            .unwrap();
        assert!(matches!(
            check_ownership(other_ctx),
            Err(DomainError::Forbidden)
        ));
    }
}
