use axum::async_trait;
use tracing::info;

/// Outbound mail seam. The core only produces the reset token; delivery and
/// message content belong to whatever implements this.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> anyhow::Result<()>;
}

/// Default mailer: writes the reset token to the log instead of sending mail.
#[derive(Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> anyhow::Result<()> {
        info!(%email, %username, %token, "password reset token issued");
        Ok(())
    }
}
