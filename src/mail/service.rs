use crate::config::SmtpConfig;
use crate::mail::error::MailError;
use crate::mail::message::{confirmation, notification, ContactForm};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{error, info};

/// Delivery seam for the mailer. The real implementation speaks SMTP;
/// tests swap in [`FakeMailTransport`].
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, message: Message) -> Result<(), MailError>;

    /// Connectivity probe. Failure here means credentials or host are
    /// wrong, not that a particular message was rejected.
    async fn verify(&self) -> Result<(), MailError>;
}

#[async_trait]
impl<T: MailTransport + ?Sized> MailTransport for Arc<T> {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        (**self).send(message).await
    }

    async fn verify(&self) -> Result<(), MailError> {
        (**self).verify().await
    }
}

/// SMTP transport over the configured relay. `secure` selects implicit
/// TLS; otherwise the connection upgrades via STARTTLS.
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailError::Transport(format!("bad relay host {}: {}", config.host, e)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();
        Ok(SmtpMailTransport { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }

    async fn verify(&self) -> Result<(), MailError> {
        let ok = self
            .transport
            .test_connection()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        if ok {
            Ok(())
        } else {
            Err(MailError::Transport(
                "connection test returned not-ok".to_string(),
            ))
        }
    }
}

/// In-memory transport for testing, recording envelopes of every send.
#[derive(Clone, Default)]
pub struct FakeMailTransport {
    sent: Arc<std::sync::Mutex<Vec<lettre::address::Envelope>>>,
    fail_sends: Arc<std::sync::atomic::AtomicBool>,
    fail_next: Arc<std::sync::atomic::AtomicBool>,
}

impl FakeMailTransport {
    pub fn new() -> Self {
        FakeMailTransport::default()
    }

    pub fn fake_fail_sends(&self, fail: bool) {
        self.fail_sends
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Fail only the next send, then recover.
    pub fn fake_fail_next_send(&self) {
        self.fail_next
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn fake_sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Recipient addresses of the nth sent message, in send order.
    pub fn fake_recipients(&self, n: usize) -> Vec<String> {
        self.sent.lock().unwrap()[n]
            .to()
            .iter()
            .map(|a| a.to_string())
            .collect()
    }
}

#[async_trait]
impl MailTransport for FakeMailTransport {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        if self.fail_sends.load(std::sync::atomic::Ordering::SeqCst)
            || self.fail_next.swap(false, std::sync::atomic::Ordering::SeqCst)
        {
            return Err(MailError::Transport("injected failure".to_string()));
        }
        self.sent.lock().unwrap().push(message.envelope().clone());
        Ok(())
    }

    async fn verify(&self) -> Result<(), MailError> {
        Ok(())
    }
}

/// Sends the pair of contact-form emails through a [`MailTransport`].
pub struct Mailer<T: MailTransport> {
    transport: T,
    service_user: String,
}

impl<T: MailTransport> Mailer<T> {
    pub fn new(transport: T, config: &SmtpConfig) -> Self {
        Mailer {
            transport,
            service_user: config.user.clone(),
        }
    }

    /// Send the submitter confirmation, then the artist notification.
    /// Strictly sequential: a confirmation failure aborts before the
    /// notification is attempted. Returns the confirmation Message-ID.
    pub async fn send_contact(&self, form: &ContactForm) -> Result<String, MailError> {
        let built = confirmation(form, &self.service_user)?;
        self.transport.send(built.message).await.map_err(|e| {
            error!("Confirmation send to {} failed: {}", form.email, e);
            e
        })?;
        info!("Confirmation email sent: {}", built.message_id);

        let notify = notification(form, &self.service_user)?;
        self.transport.send(notify.message).await.map_err(|e| {
            error!("Notification send for {} failed: {}", form.email, e);
            e
        })?;
        info!("Notification email sent: {}", notify.message_id);

        Ok(built.message_id)
    }

    pub async fn verify(&self) -> Result<(), MailError> {
        self.transport.verify().await
    }
}
