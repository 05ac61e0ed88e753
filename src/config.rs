use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Lifetime of an API session token, in minutes.
    pub access_ttl_minutes: i64,
    /// Lifetime of a password-reset token, in minutes.
    pub reset_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("SECRET_KEY")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "moodshare".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "moodshare-users".into()),
            access_ttl_minutes: std::env::var("ACCESS_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
            reset_ttl_minutes: std::env::var("RESET_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(10),
        };
        Ok(Self { database_url, jwt })
    }
}
