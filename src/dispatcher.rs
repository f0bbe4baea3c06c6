//! Strategy selection and delivery for validated send requests.

use tracing::field;

use crate::app::EmailSettings;
use crate::domain::{
    SendRequest,
    SendResult,
};
use crate::transport::{
    SendGridClient,
    SmtpClient,
    Transport,
    TransportError,
};

/// Picks the first transport able to handle the configured settings and
/// sends through it, or simulates the send in test mode.
///
/// The settings are fixed at construction: nothing is read from the process
/// environment while serving a request.
pub struct NotificationDispatcher {
    settings: EmailSettings,
    transports: Vec<Box<dyn Transport>>,
}

impl NotificationDispatcher {
    pub fn new(settings: EmailSettings, transports: Vec<Box<dyn Transport>>) -> Self {
        Self {
            settings,
            transports,
        }
    }

    /// SendGrid first, SMTP as the fallback.
    pub fn from_settings(settings: EmailSettings) -> Result<Self, anyhow::Error> {
        Ok(Self::new(
            settings,
            vec![Box::new(SendGridClient::new()?), Box::new(SmtpClient::default())],
        ))
    }

    fn select(&self) -> Result<&dyn Transport, TransportError> {
        self.transports
            .iter()
            .find(|transport| transport.can_handle(&self.settings))
            .map(|transport| &**transport)
            .ok_or_else(|| TransportError::not_configured("No email provider configured"))
    }

    #[tracing::instrument(
        name = "dispatching notification",
        skip(self, request),
        fields(
            recipient = %request.to.as_ref(),
            category = ?request.category,
            provider = field::Empty,
            test_mode = self.settings.test_mode,
        )
    )]
    pub async fn dispatch(&self, request: &SendRequest) -> Result<SendResult, TransportError> {
        let transport = self.select()?;
        let provider = transport.provider();
        tracing::Span::current().record("provider", &provider.as_str());

        if self.settings.test_mode {
            tracing::info!("test mode, provider call skipped");
            return Ok(SendResult::simulated(provider));
        }

        let receipt = transport
            .send(request, &self.settings)
            .await
            .map_err(|e| {
                tracing::error!("Error sending email: {}", e);
                e
            })?;
        Ok(SendResult::delivered(provider, receipt))
    }
}
