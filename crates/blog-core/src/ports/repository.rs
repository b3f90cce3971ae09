use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostFilter, PostPatch};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity and return it as stored.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Returns whether a row was removed.
    async fn delete(&self, id: ID) -> Result<bool, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts matching `filter`, newest first.
    async fn find_page(
        &self,
        filter: &PostFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Apply `patch` and return the updated post, or `None` if it no longer exists.
    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError>;
}
