//! SMTP notifier
//!
//! Sends expiry notices as `multipart/alternative` e-mails through an SMTP
//! relay, from the configured sender to the fixed recipient.

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use super::{ExpiryNotice, Notifier};
use crate::config::MailConfig;
use crate::error::NotifyError;
use crate::models::Product;

/// E-mail notifier backed by an async SMTP transport.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Builds the transport and validates both addresses.
    ///
    /// With credentials the relay is reached over STARTTLS; without them the
    /// connection is plain, which suits a local relay.
    pub fn new(config: &MailConfig) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&config.from)?;
        let to = parse_mailbox(&config.to)?;

        let transport = match &config.credentials {
            Some((user, pass)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| NotifyError::Transport(e.to_string()))?
                    .port(config.port)
                    .credentials(Credentials::new(user.clone(), pass.clone()))
                    .build()
            }
            None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build(),
        };

        Ok(Self { transport, from, to })
    }

    /// Assembles the e-mail for one notice.
    pub fn message(&self, notice: ExpiryNotice) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notice.subject)
            .multipart(MultiPart::alternative_plain_html(notice.text, notice.html))
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, NotifyError> {
    raw.parse()
        .map_err(|e| NotifyError::Address(format!("{}: {}", raw, e)))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, product: &Product, days_remaining: i64) -> Result<(), NotifyError> {
        let message = self.message(ExpiryNotice::new(product, days_remaining))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        info!(
            barcode = %product.barcode,
            days_remaining,
            "Expiry notice sent: {}",
            response.code()
        );
        Ok(())
    }
}
