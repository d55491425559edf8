//! Outgoing email. Production uses SMTP through lettre; without a `mail`
//! section messages are only logged, and tests capture them in memory.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::{config::MailConfig, error::AppError};

pub mod templates;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AppError>;
}

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig) -> anyhow::Result<Self> {
        let creds = Credentials::new(cfg.smtp_username.clone(), cfg.smtp_password.clone());
        let transport = SmtpTransport::starttls_relay(&cfg.smtp_host)?
            .credentials(creds)
            .port(cfg.smtp_port)
            .build();
        let from = cfg.from_address.parse::<Mailbox>()?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AppError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|_| AppError::bad_request("Alamat email tidak valid"))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html)
            .map_err(|err| AppError::internal_with_source("Gagal menyiapkan email", err))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| AppError::internal_with_source("Gagal mengirim email", err))?;
        tracing::info!(subject = %mail.subject, "email sent");
        Ok(())
    }
}

/// Used when no SMTP relay is configured; the body is not logged.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AppError> {
        tracing::warn!(to = %mail.to, subject = %mail.subject, "mail delivery disabled, message dropped");
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    fail: bool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails like a broken relay.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn last_to(&self, to: &str) -> Option<OutgoingMail> {
        self.sent().into_iter().rev().find(|mail| mail.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::internal("Gagal mengirim email"));
        }
        self.sent
            .lock()
            .map_err(|_| AppError::internal("Gagal mengirim email"))?
            .push(mail);
        Ok(())
    }
}

pub fn build_mailer(cfg: Option<&MailConfig>) -> anyhow::Result<Arc<dyn Mailer>> {
    match cfg {
        Some(cfg) => Ok(Arc::new(SmtpMailer::new(cfg)?)),
        None => {
            tracing::warn!("mail section missing; emails will only be logged");
            Ok(Arc::new(LogMailer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LogMailer, Mailer, MemoryMailer, OutgoingMail, build_mailer};

    fn mail(to: &str) -> OutgoingMail {
        OutgoingMail {
            to: to.to_string(),
            subject: "Kode verifikasi".to_string(),
            html: "<p>123456</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn memory_mailer_captures_messages() {
        let mailer = MemoryMailer::new();
        mailer.send(mail("a@example.com")).await.expect("send should succeed");
        mailer.send(mail("b@example.com")).await.expect("send should succeed");

        assert_eq!(mailer.sent().len(), 2);
        assert_eq!(
            mailer.last_to("b@example.com").map(|m| m.to),
            Some("b@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn failing_mailer_reports_error() {
        let err = MemoryMailer::failing()
            .send(mail("a@example.com"))
            .await
            .expect_err("send should fail");
        assert_eq!(err.message(), "Gagal mengirim email");
    }

    #[tokio::test]
    async fn log_mailer_accepts_everything() {
        LogMailer.send(mail("a@example.com")).await.expect("log mailer never fails");
        assert!(build_mailer(None).is_ok());
    }
}
