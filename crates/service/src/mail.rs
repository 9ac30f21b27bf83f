//! Outgoing mail.
//!
//! Delivery is best-effort: callers spawn the send and only log failures.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const ACTIVATE_ACCOUNT_SUBJECT: &str = "Activate your account";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> anyhow::Result<()>;
}

/// Writes messages to the tracing log instead of a mail server.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self { Self { from: from.into() } }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        info!(from = %self.from, to = %email.to, subject = %email.subject, "email_sent");
        debug!(body = %email.body, "email_body");
        Ok(())
    }
}

/// Keeps every message in memory.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<Email>>,
}

impl MemoryMailer {
    pub async fn sent(&self) -> Vec<Email> { self.sent.lock().await.clone() }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        self.sent.lock().await.push(email);
        Ok(())
    }
}

/// Fire-and-forget delivery; errors are logged and dropped.
pub fn spawn_send(mailer: Arc<dyn Mailer>, email: Email) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let to = email.to.clone();
        if let Err(e) = mailer.send(email).await {
            warn!(to = %to, error = %e, "email_delivery_failed");
        }
    })
}

pub fn activation_body(first_name: &str, url: &str, expire_at: &str) -> String {
    format!(
        "Hi {first_name},\n\n\
         Please activate your account by opening the link below:\n\
         {url}\n\n\
         The link expires at {expire_at} (UTC).\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: Email) -> anyhow::Result<()> { anyhow::bail!("smtp down") }
    }

    fn sample() -> Email {
        Email { to: "a@b.io".into(), subject: ACTIVATE_ACCOUNT_SUBJECT.into(), body: "hi".into() }
    }

    #[tokio::test]
    async fn memory_mailer_records_messages() {
        let mailer = Arc::new(MemoryMailer::default());
        spawn_send(mailer.clone(), sample()).await.unwrap();
        assert_eq!(mailer.sent().await, vec![sample()]);
    }

    #[tokio::test]
    async fn failures_do_not_propagate() {
        spawn_send(Arc::new(FailingMailer), sample()).await.unwrap();
    }

    #[test]
    fn body_mentions_link_and_expiry() {
        let body = activation_body("Ann", "http://x/auth/verify_email?token=t", "2030-01-01 00:00:00");
        assert!(body.contains("Hi Ann"));
        assert!(body.contains("verify_email?token=t"));
        assert!(body.contains("2030-01-01 00:00:00"));
    }
}
