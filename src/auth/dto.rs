use serde::{Deserialize, Serialize};

use crate::users::dto::UserProfile;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: UserProfile,
}

/// Request body for a password reset request.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Request body for completing a password reset.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordConfirm {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
