//! Email transports and the strategy trait the dispatcher drives them through.

use async_trait::async_trait;

use crate::app::EmailSettings;
use crate::domain::{
    Provider,
    Receipt,
    SendRequest,
};

pub use errors::TransportError;
pub use sendgrid::SendGridClient;
pub use smtp::{
    SmtpClient,
    WellKnownService,
};

mod errors;
mod request;
mod sendgrid;
mod smtp;
pub mod template;

/// One way of delivering a `SendRequest`.
///
/// Implementations are consulted in order; the first one whose `can_handle`
/// returns true gets the request.
#[async_trait]
pub trait Transport: Send + Sync {
    fn provider(&self) -> Provider;

    fn can_handle(&self, settings: &EmailSettings) -> bool;

    async fn send(
        &self,
        request: &SendRequest,
        settings: &EmailSettings,
    ) -> Result<Receipt, TransportError>;
}
