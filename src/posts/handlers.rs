use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    posts::{
        dto::{CreatePostRequest, LikeResponse, Pagination, PostView},
        repo::Post,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/:id", get(get_post))
        .route("/feed", get(get_feed))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/:id", axum::routing::delete(delete_post))
        .route("/posts/:id/like", post(like_post).delete(unlike_post))
}

fn validate_body(body: &str) -> ApiResult<&str> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ApiError::Validation("post body cannot be empty".into()));
    }
    if body.chars().count() > 140 {
        return Err(ApiError::Validation(
            "post body cannot exceed 140 characters".into(),
        ));
    }
    Ok(body)
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostView>)> {
    let body = validate_body(&payload.body)?;
    let post = Post::create(&state.db, caller, body).await?;

    info!(post_id = %post.id, user_id = %caller, "post created");
    let row = Post::get_view(&state.db, caller, post.id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    Ok((StatusCode::CREATED, Json(PostView::from(row))))
}

/// Explore: every post on the instance, newest first.
#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(p): Query<Pagination>,
) -> ApiResult<Json<Vec<PostView>>> {
    let (limit, offset) = p.clamp();
    let rows = Post::explore(&state.db, caller, limit, offset).await?;
    Ok(Json(rows.into_iter().map(PostView::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PostView>> {
    let row = Post::get_view(&state.db, caller, id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    Ok(Json(PostView::from(row)))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    Post::delete(&state.db, caller, id).await?;
    info!(post_id = %id, user_id = %caller, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LikeResponse>> {
    let (_created, like_count) = Post::like(&state.db, caller, id).await?;
    Ok(Json(LikeResponse {
        liked: true,
        like_count,
    }))
}

#[instrument(skip(state))]
pub async fn unlike_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LikeResponse>> {
    let (_removed, like_count) = Post::unlike(&state.db, caller, id).await?;
    Ok(Json(LikeResponse {
        liked: false,
        like_count,
    }))
}

/// Feed: the caller's own posts plus posts from followed users.
#[instrument(skip(state))]
pub async fn get_feed(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(p): Query<Pagination>,
) -> ApiResult<Json<Vec<PostView>>> {
    let (limit, offset) = p.clamp();
    let rows = Post::feed(&state.db, caller, limit, offset).await?;
    Ok(Json(rows.into_iter().map(PostView::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_trimmed() {
        assert_eq!(validate_body("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn empty_body_rejected() {
        assert!(validate_body("").is_err());
        assert!(validate_body("   ").is_err());
    }

    #[test]
    fn oversized_body_rejected() {
        let at_limit = "x".repeat(140);
        assert!(validate_body(&at_limit).is_ok());
        let too_long = "x".repeat(141);
        let err = validate_body(&too_long).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn limit_counts_chars_not_bytes() {
        // 140 multi-byte characters are still a valid post.
        let body = "é".repeat(140);
        assert!(validate_body(&body).is_ok());
    }
}
