//! Post operations: list, read, write, update, remove.

use serde::Deserialize;
use serde_json::Value;

use super::context::{Owned, RequestContext, Resolved};
use crate::domain::{Post, PostDraft, PostFilter, PostPatch, User};
use crate::error::DomainError;
use crate::ports::PostRepository;
use crate::validation::{CREATE_POST, UPDATE_POST, ValidationError};

/// Posts per listing page.
pub const PAGE_SIZE: u64 = 10;

/// Listing query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub tag: Option<String>,
    pub username: Option<String>,
}

impl ListQuery {
    /// 1-based page number; absent or empty means the first page.
    pub fn page(&self) -> Result<u64, DomainError> {
        let raw = match self.page.as_deref().map(str::trim) {
            None | Some("") => return Ok(1),
            Some(raw) => raw,
        };

        match raw.parse::<u64>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(DomainError::InvalidPage(raw.to_string())),
        }
    }

    pub fn filter(&self) -> PostFilter {
        let present = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        PostFilter {
            tag: present(&self.tag),
            username: present(&self.username),
        }
    }
}

/// One page of previews plus the index of the final page.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub last_page: u64,
}

pub async fn list(repo: &dyn PostRepository, query: &ListQuery) -> Result<PostPage, DomainError> {
    let page = query.page()?;
    let skip = (page - 1)
        .checked_mul(PAGE_SIZE)
        .ok_or_else(|| DomainError::InvalidPage(page.to_string()))?;
    let filter = query.filter();

    let posts = repo.find_page(&filter, skip, PAGE_SIZE).await?;
    let total = repo.count(&filter).await?;

    tracing::debug!(page, total, returned = posts.len(), "Listed posts");

    Ok(PostPage {
        posts: posts.into_iter().map(Post::into_preview).collect(),
        last_page: total.div_ceil(PAGE_SIZE),
    })
}

/// The post resolved by the lookup guard.
pub fn read<U>(ctx: RequestContext<U, Resolved>) -> Post {
    ctx.into_post()
}

pub async fn write<P>(
    repo: &dyn PostRepository,
    ctx: &RequestContext<User, P>,
    payload: &Value,
) -> Result<Post, DomainError> {
    CREATE_POST.validate(payload)?;
    let draft = PostDraft::deserialize(payload).map_err(ValidationError::malformed)?;

    let post = repo.insert(Post::new(draft, ctx.user().clone())).await?;

    tracing::info!(post_id = %post.id, user_id = %post.user.id, "Post created");
    Ok(post)
}

pub async fn update(
    repo: &dyn PostRepository,
    ctx: RequestContext<User, Owned>,
    payload: &Value,
) -> Result<Post, DomainError> {
    UPDATE_POST.validate(payload)?;
    let patch = PostPatch::deserialize(payload).map_err(ValidationError::malformed)?;
    let id = ctx.post().id;

    match repo.update(id, patch).await? {
        Some(post) => {
            tracing::info!(post_id = %id, "Post updated");
            Ok(post)
        }
        None => {
            tracing::warn!(post_id = %id, "Post vanished before update");
            Err(DomainError::NotFound {
                entity_type: "Post",
                id: id.to_string(),
            })
        }
    }
}

/// Delete the post. Succeeds even when nothing was left to delete.
pub async fn remove(
    repo: &dyn PostRepository,
    ctx: RequestContext<User, Owned>,
) -> Result<(), DomainError> {
    let id = ctx.post().id;

    if repo.delete(id).await? {
        tracing::info!(post_id = %id, "Post deleted");
    } else {
        tracing::debug!(post_id = %id, "Post was already gone");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{PREVIEW_LENGTH, PREVIEW_MARKER};
    use crate::posts::guard::{check_ownership, resolve_post};
    use crate::ports::BaseRepository;
    use crate::posts::testing::{StubRepository, draft, user};

    fn query(page: Option<&str>) -> ListQuery {
        ListQuery {
            page: page.map(String::from),
            ..Default::default()
        }
    }

    async fn owned_by(
        repo: &StubRepository,
        user: &User,
        id: &str,
    ) -> Result<RequestContext<User, Owned>, DomainError> {
        let ctx = RequestContext::new().authenticated(user.clone());
        check_ownership(resolve_post(repo, ctx, id).await?)
    }

    fn seeded(count: usize, author: &User) -> StubRepository {
        let posts = (0..count)
            .map(|i| Post::new(draft(&format!("post #{i}")), author.clone()))
            .collect();
        StubRepository::with_posts(posts)
    }

    #[test]
    fn test_page_parsing() {
        assert_eq!(query(None).page().unwrap(), 1);
        assert_eq!(query(Some("")).page().unwrap(), 1);
        assert_eq!(query(Some("3")).page().unwrap(), 3);
        assert!(matches!(query(Some("0")).page(), Err(DomainError::InvalidPage(_))));
        assert!(matches!(query(Some("-2")).page(), Err(DomainError::InvalidPage(_))));
        assert!(matches!(query(Some("two")).page(), Err(DomainError::InvalidPage(_))));
    }

    #[test]
    fn test_page_with_trailing_garbage_is_rejected() {
        for raw in ["1.5", "2abc", "3 4"] {
            assert!(
                matches!(query(Some(raw)).page(), Err(DomainError::InvalidPage(_))),
                "page={raw}"
            );
        }
    }

    #[test]
    fn test_empty_filter_values_are_ignored() {
        let q = ListQuery {
            page: None,
            tag: Some(String::new()),
            username: Some("alice".to_string()),
        };
        assert_eq!(
            q.filter(),
            PostFilter {
                tag: None,
                username: Some("alice".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_page_issues_no_query() {
        let repo = seeded(3, &user("alice"));

        let result = list(&repo, &query(Some("0"))).await;

        assert!(matches!(result, Err(DomainError::InvalidPage(_))));
        assert_eq!(repo.queries(), 0);
    }

    #[tokio::test]
    async fn test_oversized_page_is_rejected() {
        let repo = seeded(1, &user("alice"));

        let result = list(&repo, &query(Some(&u64::MAX.to_string()))).await;

        assert!(matches!(result, Err(DomainError::InvalidPage(_))));
        assert_eq!(repo.queries(), 0);
    }

    #[tokio::test]
    async fn test_pages_do_not_overlap() {
        let repo = seeded(25, &user("alice"));

        let first = list(&repo, &query(None)).await.unwrap();
        let second = list(&repo, &query(Some("2"))).await.unwrap();
        let third = list(&repo, &query(Some("3"))).await.unwrap();

        assert_eq!(first.posts.len(), 10);
        assert_eq!(second.posts.len(), 10);
        assert_eq!(third.posts.len(), 5);
        assert_eq!(first.last_page, 3);
        assert!(
            first
                .posts
                .iter()
                .all(|p| second.posts.iter().all(|q| q.id != p.id))
        );
        assert!(first.posts.windows(2).all(|w| w[0].id > w[1].id));
        assert!(first.posts.last().unwrap().id > second.posts[0].id);
    }

    #[tokio::test]
    async fn test_last_page_of_empty_result_is_zero() {
        let repo = StubRepository::default();
        let page = list(&repo, &query(None)).await.unwrap();
        assert!(page.posts.is_empty());
        assert_eq!(page.last_page, 0);
    }

    #[tokio::test]
    async fn test_list_previews_without_touching_storage() {
        let author = user("alice");
        let long_body = "x".repeat(PREVIEW_LENGTH + 50);
        let mut long_draft = draft("long");
        long_draft.body = long_body.clone();
        let repo = StubRepository::with_posts(vec![Post::new(long_draft, author)]);

        let page = list(&repo, &query(None)).await.unwrap();

        assert_eq!(
            page.posts[0].body,
            format!("{}{}", "x".repeat(PREVIEW_LENGTH), PREVIEW_MARKER)
        );
        assert_eq!(repo.all()[0].body, long_body);
    }

    #[tokio::test]
    async fn test_write_uses_caller_identity() {
        let repo = StubRepository::default();
        let alice = user("alice");
        let ctx = RequestContext::new().authenticated(alice.clone());
        let payload = json!({
            "title": "Hello",
            "body": "World",
            "tags": [],
            "user": { "id": uuid::Uuid::new_v4(), "username": "mallory" }
        });

        let post = write(&repo, &ctx, &payload).await.unwrap();

        assert_eq!(post.user, alice);
        assert_eq!(repo.all(), vec![post]);
    }

    #[tokio::test]
    async fn test_write_validation_failure_skips_storage() {
        let repo = StubRepository::default();
        let ctx = RequestContext::new().authenticated(user("alice"));

        let err = write(&repo, &ctx, &json!({ "title": "Hello" }))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(v) if v.details.len() == 2));
        assert_eq!(repo.queries(), 0);
    }

    #[tokio::test]
    async fn test_write_surfaces_repository_failure() {
        let repo = StubRepository::failing();
        let ctx = RequestContext::new().authenticated(user("alice"));
        let payload = json!({ "title": "t", "body": "b", "tags": ["x"] });

        let err = write(&repo, &ctx, &payload).await.unwrap_err();

        assert!(matches!(err, DomainError::Repository(_)));
    }

    #[tokio::test]
    async fn test_update_is_partial_and_reports_race() {
        let alice = user("alice");
        let repo = seeded(1, &alice);
        let id = repo.all()[0].id.to_string();
        let original = repo.all()[0].clone();

        let ctx = owned_by(&repo, &alice, &id).await.unwrap();
        let updated = update(&repo, ctx, &json!({ "title": "Renamed" }))
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.body, original.body);
        assert_eq!(updated.tags, original.tags);

        let ctx = owned_by(&repo, &alice, &id).await.unwrap();
        repo.delete(original.id).await.unwrap();
        let err = update(&repo, ctx, &json!({ "body": "late" }))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let alice = user("alice");
        let repo = seeded(1, &alice);
        let id = repo.all()[0].id.to_string();

        let first = owned_by(&repo, &alice, &id).await.unwrap();
        let second = first.clone();

        remove(&repo, first).await.unwrap();
        remove(&repo, second).await.unwrap();
        assert!(repo.all().is_empty());
    }
}
