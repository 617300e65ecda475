//! Security-team notification for flagged calls.
//!
//! The [`Notifier`] logs the blocking action and hands an email to a
//! [`MailTransport`] on a background tokio task. Sending never blocks the
//! caller and is never retried; the returned [`AlertHandle`] lets callers
//! observe the outcome if they want to.

use crate::config::AlertConfig;
use crate::core::{CallRecord, Verdict};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// An email ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    /// Build the alert for a flagged call.
    pub fn for_call(from: &str, to: &str, call_id: &str, reasons: &[String]) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("Alert: Suspicious Call Detected (ID: {call_id})"),
            body: format!(
                "The following call has been flagged:\n\nCall ID: {call_id}\nReasons: {}",
                reasons.join(", ")
            ),
        }
    }
}

/// Something that can deliver an [`AlertMessage`].
///
/// Returns a short server response on success.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &AlertMessage) -> Result<String, AlertError>;
}

/// SMTP delivery through an implicit-TLS relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Create a mailer from alert configuration.
    pub fn new(config: &AlertConfig) -> Result<Self, AlertError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| AlertError::Transport(e.to_string()))?
            .port(config.smtp_port);

        if let Some((user, pass)) = config.credentials() {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: &AlertMessage) -> Result<String, AlertError> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|e| AlertError::Address(format!("{}: {e}", message.from)))?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AlertError::Address(format!("{}: {e}", message.to)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| AlertError::Message(e.to_string()))?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| AlertError::Transport(e.to_string()))?;

        let text: Vec<String> = response.message().map(|line| line.to_string()).collect();
        Ok(format!("{} {}", response.code(), text.join(" ")))
    }
}

/// Handle to an in-flight alert.
#[derive(Debug)]
pub struct AlertHandle {
    call_id: String,
    task: JoinHandle<Result<String, AlertError>>,
}

impl AlertHandle {
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Whether the send has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the send to finish.
    pub async fn wait(self) -> Result<String, AlertError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(AlertError::Task(e.to_string())),
        }
    }
}

/// Notifies the security team about flagged calls.
#[derive(Clone)]
pub struct Notifier {
    transport: Option<Arc<dyn MailTransport>>,
    from: String,
    recipient: String,
}

impl Notifier {
    /// Create a notifier that delivers through `transport`.
    pub fn new(
        transport: Arc<dyn MailTransport>,
        from: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            transport: Some(transport),
            from: from.into(),
            recipient: recipient.into(),
        }
    }

    /// Create a notifier that only logs.
    pub fn disabled() -> Self {
        Self {
            transport: None,
            from: String::new(),
            recipient: String::new(),
        }
    }

    /// Build a notifier from configuration, using SMTP when alerts are enabled.
    pub fn from_config(config: &AlertConfig) -> Result<Self, AlertError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }
        let mailer = SmtpMailer::new(config)?;
        Ok(Self::new(Arc::new(mailer), &config.from, &config.recipient))
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Report a flagged call and start sending the email alert.
    ///
    /// Returns `None` when email alerts are disabled, the verdict is not
    /// flagged, or there is no tokio runtime to send on.
    pub fn notify(&self, record: &CallRecord, verdict: &Verdict) -> Option<AlertHandle> {
        if !verdict.flagged {
            return None;
        }

        let call_id = record.id();
        tracing::warn!("Blocking Call ID: {call_id}");
        tracing::warn!(
            "Notifying security team about flagged reasons: {}",
            verdict.summary()
        );

        let Some(transport) = self.transport.clone() else {
            tracing::info!("Email alerts disabled; no alert sent for Call ID {call_id}");
            return None;
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("Failed to send email alert: {e}");
                return None;
            }
        };

        let message = AlertMessage::for_call(&self.from, &self.recipient, call_id, &verdict.reasons);
        let task = runtime.spawn(async move {
            let result = transport.send(&message).await;
            match &result {
                Ok(response) => tracing::info!("Email alert sent: {response}"),
                Err(e) => tracing::error!("Failed to send email alert: {e}"),
            }
            result
        });

        Some(AlertHandle {
            call_id: call_id.to_string(),
            task,
        })
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("enabled", &self.is_enabled())
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Alert delivery errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    /// A sender or recipient address did not parse
    Address(String),
    /// The email could not be assembled
    Message(String),
    /// The transport rejected or failed to deliver the email
    Transport(String),
    /// The background send task did not complete
    Task(String),
}

impl std::fmt::Display for AlertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertError::Address(msg) => write!(f, "Invalid email address {msg}"),
            AlertError::Message(msg) => write!(f, "Could not build email: {msg}"),
            AlertError::Transport(msg) => write!(f, "Mail transport error: {msg}"),
            AlertError::Task(msg) => write!(f, "Alert task failed: {msg}"),
        }
    }
}

impl std::error::Error for AlertError {}
