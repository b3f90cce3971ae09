//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::domain::{Post, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    /// JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub user_id: Uuid,
    pub username: String,
    pub published_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Decode the `tags` column; non-string entries are skipped.
pub fn tags_from_json(tags: Json) -> Vec<String> {
    match tags {
        Json::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Json::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn tags_to_json(tags: Vec<String>) -> Json {
    Json::Array(tags.into_iter().map(Json::String).collect())
}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
            tags: tags_from_json(model.tags),
            user: User::new(model.user_id, model.username),
            published_date: model.published_date.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            body: Set(post.body),
            tags: Set(tags_to_json(post.tags)),
            user_id: Set(post.user.id),
            username: Set(post.user.username),
            published_date: Set(post.published_date.into()),
        }
    }
}
