//! In-memory post repository - used when no database is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Post, PostFilter, PostPatch};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

/// Post store keyed by id.
///
/// Ids are time-ordered, so iterating the map in reverse yields newest first.
/// Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<BTreeMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.store.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(store
            .values()
            .rev()
            .filter(|post| filter.matches(post))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|post| filter.matches(post)).count() as u64)
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let mut store = self.store.write().await;
        Ok(store.get_mut(&id).map(|post| {
            post.apply(patch);
            post.clone()
        }))
    }
}
