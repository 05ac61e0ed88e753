use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    posts::{
        dto::{Pagination, PostView},
        repo::Post,
    },
    state::AppState,
    users::{
        dto::{EditProfileRequest, FollowResponse, SearchResponse, UserProfile, UserSummary},
        repo::User,
        validate::{check_about_me, check_username},
    },
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:username", get(get_user))
        .route("/users/:username/posts", get(get_user_posts))
        .route(
            "/users/:username/follow",
            post(follow_user).delete(unfollow_user),
        )
        .route("/search", get(search))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let counts = User::counts(&state.db, user_id).await?;
    Ok(Json(UserProfile::new(user, counts, true)))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut payload): Json<EditProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    payload.username = payload.username.trim().to_string();
    check_username(&payload.username)?;
    if let Some(about_me) = &payload.about_me {
        check_about_me(about_me)?;
    }

    let user = User::update_profile(
        &state.db,
        user_id,
        &payload.username,
        payload.about_me.as_deref(),
    )
    .await?;
    let counts = User::counts(&state.db, user_id).await?;

    info!(user_id = %user.id, username = %user.username, "profile updated");
    Ok(Json(UserProfile::new(user, counts, true)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let counts = User::counts(&state.db, user.id).await?;
    let is_self = user.id == caller;
    Ok(Json(UserProfile::new(user, counts, is_self)))
}

#[instrument(skip(state))]
pub async fn get_user_posts(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(username): Path<String>,
    Query(p): Query<Pagination>,
) -> ApiResult<Json<Vec<PostView>>> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let (limit, offset) = p.clamp();
    let rows = Post::list_by_author(&state.db, caller, user.id, limit, offset).await?;
    Ok(Json(rows.into_iter().map(PostView::from).collect()))
}

#[instrument(skip(state))]
pub async fn follow_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Json<FollowResponse>> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let created = User::follow(&state.db, caller, user.id).await?;
    if created {
        info!(follower = %caller, followed = %user.id, "follow created");
    }

    let following = User::is_following(&state.db, caller, user.id).await?;
    let follower_count = User::follower_count(&state.db, user.id).await?;
    Ok(Json(FollowResponse {
        following,
        follower_count,
    }))
}

#[instrument(skip(state))]
pub async fn unfollow_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Json<FollowResponse>> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let removed = User::unfollow(&state.db, caller, user.id).await?;
    if removed {
        info!(follower = %caller, followed = %user.id, "follow removed");
    }

    let following = User::is_following(&state.db, caller, user.id).await?;
    let follower_count = User::follower_count(&state.db, user.id).await?;
    Ok(Json(FollowResponse {
        following,
        follower_count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_search_limit() -> i64 {
    20
}

/// Case-insensitive substring search over usernames and post bodies.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let query = params.q.trim();
    if query.is_empty() {
        warn!("empty search query");
        return Ok(Json(SearchResponse {
            users: Vec::new(),
            posts: Vec::new(),
        }));
    }

    let limit = params.limit.clamp(1, 100);
    let offset = params.offset.max(0);

    let users = User::search(&state.db, query, 10).await?;
    let posts = Post::search(&state.db, caller, query, limit, offset).await?;

    Ok(Json(SearchResponse {
        users: users.into_iter().map(UserSummary::from).collect(),
        posts: posts.into_iter().map(PostView::from).collect(),
    }))
}
