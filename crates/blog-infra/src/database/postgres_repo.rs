//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use blog_core::domain::{Post, PostFilter, PostPatch};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// WHERE clause for a listing filter.
fn filter_condition(filter: &PostFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(username) = &filter.username {
        condition = condition.add(post::Column::Username.eq(username.as_str()));
    }
    if let Some(tag) = &filter.tag {
        // jsonb containment: the tags array holds this element
        condition = condition.add(Expr::cust_with_values(
            "\"tags\" @> ?",
            [post::tags_to_json(vec![tag.clone()])],
        ));
    }
    condition
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(?filter, skip, limit, "Finding posts");

        let result = PostEntity::find()
            .filter(filter_condition(filter))
            .order_by_desc(post::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(filter_condition(filter))
            .count(&self.db)
            .await
            .map_err(repo_err)
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
        else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(model.into()));
        }

        let mut active: post::ActiveModel = model.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(body) = patch.body {
            active.body = Set(body);
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(post::tags_to_json(tags));
        }

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(model.into())),
            // deleted between the read and the write
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(repo_err(e)),
        }
    }
}
