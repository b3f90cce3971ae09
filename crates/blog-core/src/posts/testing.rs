//! Test doubles for the post pipeline.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostDraft, PostFilter, PostPatch, User};
use crate::error::RepoError;
use crate::ports::{BaseRepository, PostRepository};

/// Vec-backed repository that counts every call it serves.
#[derive(Default)]
pub struct StubRepository {
    posts: Mutex<Vec<Post>>,
    queries: AtomicUsize,
    pub fail: bool,
}

impl StubRepository {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn all(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn touch(&self) -> Result<(), RepoError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RepoError::Connection("connection refused".to_string()));
        }
        Ok(())
    }

    fn sorted(&self, filter: &PostFilter) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .all()
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for StubRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.touch()?;
        Ok(self.all().into_iter().find(|p| p.id == id))
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        self.touch()?;
        self.posts.lock().unwrap().push(entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        self.touch()?;
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }
}

#[async_trait]
impl PostRepository for StubRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        self.touch()?;
        Ok(self
            .sorted(filter)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        self.touch()?;
        Ok(self.sorted(filter).len() as u64)
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        self.touch()?;
        let mut posts = self.posts.lock().unwrap();
        Ok(posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.apply(patch);
            post.clone()
        }))
    }
}

pub fn user(name: &str) -> User {
    User::new(Uuid::new_v4(), name)
}

pub fn draft(title: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        body: format!("{title} body"),
        tags: vec!["rust".to_string()],
    }
}
