use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{config::JwtConfig, state::AppState};

/// Type of JWT: API session or password reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Reset,
}

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,       // user ID
    pub iat: usize,      // issued at (unix timestamp)
    pub exp: usize,      // expires at (unix timestamp)
    pub iss: String,     // issuer
    pub aud: String,     // audience
    pub kind: TokenKind, // session or reset
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub reset_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            access_ttl_minutes,
            reset_ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            access_ttl: Duration::from_secs((access_ttl_minutes as u64) * 60),
            reset_ttl: Duration::from_secs((reset_ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    fn sign_with_kind(&self, user_id: Uuid, kind: TokenKind) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Reset => self.reset_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(user_id, TokenKind::Access)
    }

    pub fn sign_reset(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(user_id, TokenKind::Reset)
    }

    /// Verify signature, expiry, issuer and audience. Any failure is opaque
    /// to the caller: the token is simply invalid.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    /// Verify a password-reset token and resolve the user it was issued for.
    /// A valid session token is not accepted here.
    pub fn verify_reset(&self, token: &str) -> anyhow::Result<Uuid> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Reset {
            anyhow::bail!("not a reset token");
        }
        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_access_token() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign_access(user_id).expect("sign access");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[tokio::test]
    async fn reset_token_resolves_to_issuing_user() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign_reset(user_id).expect("sign reset");
        let resolved = keys.verify_reset(&token).expect("verify reset");
        assert_eq!(resolved, user_id);
    }

    #[tokio::test]
    async fn verify_reset_rejects_access_token() {
        let keys = make_keys();
        let token = keys.sign_access(Uuid::new_v4()).expect("sign access");
        let err = keys.verify_reset(&token).unwrap_err();
        assert!(err.to_string().contains("not a reset token"));
    }

    #[tokio::test]
    async fn verify_rejects_tampered_token() {
        let keys = make_keys();
        let token = keys.sign_access(Uuid::new_v4()).expect("sign access");
        // Flip one character in the signature segment.
        let mut bytes = token.into_bytes();
        let last = bytes.last_mut().unwrap();
        *last = if *last == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();
        assert!(keys.verify(&tampered).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc();
        // Expired well past the default validation leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: (now.unix_timestamp() - 600) as usize,
            exp: (now.unix_timestamp() - 300) as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
            kind: TokenKind::Reset,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
        assert!(keys.verify_reset(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let keys = make_keys();
        assert!(keys.verify("not-a-jwt").is_err());
        assert!(keys.verify("").is_err());
    }

    #[tokio::test]
    async fn verify_rejects_token_signed_with_other_secret() {
        let keys = make_keys();
        let other = EncodingKey::from_secret(b"other-secret");
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now.unix_timestamp() as usize,
            exp: (now.unix_timestamp() + 300) as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
            kind: TokenKind::Access,
        };
        let token = encode(&Header::default(), &claims, &other).expect("encode");
        assert!(keys.verify(&token).is_err());
    }
}
