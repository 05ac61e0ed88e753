use axum::{
    extract::{FromRef, Path, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MessageResponse, RegisterRequest, ResetPasswordConfirm,
            ResetPasswordRequest,
        },
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::{ApiError, ApiResult},
    state::AppState,
    users::{
        dto::UserProfile,
        repo::{ProfileCounts, User},
        validate::{check_email, check_password, check_username},
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/reset_password", post(reset_password_request))
        .route("/auth/reset_password/:token", post(reset_password_confirm))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    check_username(&payload.username)?;
    check_email(&payload.email)?;
    check_password(&payload.password)?;

    // Friendly messages up front; the unique constraints still decide races.
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict("username already taken".into()));
    }
    if User::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.username, &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_access(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    let counts = ProfileCounts {
        post_count: 0,
        follower_count: 0,
        following_count: 0,
    };
    Ok(Json(AuthResponse {
        token,
        expires_in: keys.access_ttl.as_secs(),
        user: UserProfile::new(user, counts, true),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let username = payload.username.trim();

    let user = match User::find_by_username(&state.db, username).await? {
        Some(u) => u,
        None => {
            warn!(%username, "login unknown username");
            return Err(ApiError::unauthorized("invalid username or password"));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthorized("invalid username or password"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_access(user.id)?;
    let counts = User::counts(&state.db, user.id).await?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        token,
        expires_in: keys.access_ttl.as_secs(),
        user: UserProfile::new(user, counts, true),
    }))
}

/// Issue a reset token and hand it to the mailer. The response is identical
/// whether or not the email is registered.
#[instrument(skip(state, payload))]
pub async fn reset_password_request(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = payload.email.trim().to_lowercase();

    if let Some(user) = User::find_by_email(&state.db, &email).await? {
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign_reset(user.id)?;
        if let Err(e) = state
            .mailer
            .send_password_reset(&user.email, &user.username, &token)
            .await
        {
            error!(error = %e, user_id = %user.id, "reset mail delivery failed");
        }
    }

    Ok(Json(MessageResponse {
        message: "check your email for password reset instructions".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn reset_password_confirm(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordConfirm>,
) -> ApiResult<Json<MessageResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let user_id = keys
        .verify_reset(&token)
        .map_err(|_| ApiError::unauthorized("invalid or expired token"))?;

    check_password(&payload.password)?;
    let hash = hash_password(&payload.password)?;

    match User::set_password(&state.db, user_id, &hash).await {
        Ok(()) => {}
        // A valid token for a vanished account still fails closed.
        Err(ApiError::NotFound(_)) => {
            return Err(ApiError::unauthorized("invalid or expired token"))
        }
        Err(e) => return Err(e),
    }

    info!(user_id = %user_id, "password reset");
    Ok(Json(MessageResponse {
        message: "your password has been reset".into(),
    }))
}
