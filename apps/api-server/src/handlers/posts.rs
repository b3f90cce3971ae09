//! Post handlers.
//!
//! Each handler composes the guard pipeline for its route: resolve the post
//! from the path, then authenticate, then check ownership, then run the
//! operation. The lookup runs before authentication, so a malformed or unknown
//! id is reported even to anonymous callers.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use blog_core::domain::Post;
use blog_core::posts::{self, ListQuery, RequestContext, check_ownership, resolve_post};
use blog_shared::dto::{PostResponse, PostUserResponse};

use crate::middleware::auth::{AuthenticationError, Identity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Response header carrying the number of the final listing page.
pub const LAST_PAGE_HEADER: &str = "Last-Page";

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title,
        body: post.body,
        tags: post.tags,
        user: PostUserResponse {
            id: post.user.id.to_string(),
            username: post.user.username,
        },
        published_date: post.published_date.to_rfc3339(),
    }
}

/// GET /api/posts?page=&tag=&username=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = posts::list(state.posts.as_ref(), &query).await?;

    Ok(HttpResponse::Ok()
        .insert_header((LAST_PAGE_HEADER, page.last_page.to_string()))
        .json(page.posts.into_iter().map(to_response).collect::<Vec<_>>()))
}

/// POST /api/posts
pub async fn write(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let ctx = RequestContext::new().authenticated(identity.into());
    let post = posts::write(state.posts.as_ref(), &ctx, &body).await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// GET /api/posts/{id}
pub async fn read(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let ctx = resolve_post(state.posts.as_ref(), RequestContext::new(), &path).await?;

    Ok(HttpResponse::Ok().json(to_response(posts::read(ctx))))
}

/// PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: Result<Identity, AuthenticationError>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let repo = state.posts.as_ref();
    let ctx = resolve_post(repo, RequestContext::new(), &path).await?;
    let ctx = check_ownership(ctx.authenticated(identity?.into()))?;
    let post = posts::update(repo, ctx, &body).await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn remove(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: Result<Identity, AuthenticationError>,
) -> AppResult<HttpResponse> {
    let repo = state.posts.as_ref();
    let ctx = resolve_post(repo, RequestContext::new(), &path).await?;
    let ctx = check_ownership(ctx.authenticated(identity?.into()))?;
    posts::remove(repo, ctx).await?;

    Ok(HttpResponse::NoContent().finish())
}
