use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ApiError, ApiResult};

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,64}$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn check_username(username: &str) -> ApiResult<()> {
    if !is_valid_username(username) {
        return Err(ApiError::Validation(
            "username must be 3-64 characters: letters, digits or underscore".into(),
        ));
    }
    Ok(())
}

pub fn check_email(email: &str) -> ApiResult<()> {
    if !is_valid_email(email) {
        return Err(ApiError::Validation("invalid email address".into()));
    }
    Ok(())
}

pub fn check_password(password: &str) -> ApiResult<()> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

pub fn check_about_me(about_me: &str) -> ApiResult<()> {
    if about_me.chars().count() > 140 {
        return Err(ApiError::Validation(
            "about_me cannot exceed 140 characters".into(),
        ));
    }
    Ok(())
}
