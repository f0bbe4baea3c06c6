use anyhow::Context;
use async_trait::async_trait;
use reqwest::{
    Client,
    Response,
    Url,
};
use serde_json::json;

use crate::app::{
    non_empty,
    EmailSettings,
};
use crate::domain::{
    Provider,
    Receipt,
    SendRequest,
};
use crate::transport::request::{
    ErrorBody,
    MailSendRequest,
};
use crate::transport::template::plain_html;
use crate::transport::{
    Transport,
    TransportError,
};

const MESSAGE_ID_HEADER: &str = "X-Message-Id";

/// Delivers through the SendGrid v3 HTTP API.
///
/// The `reqwest::Client` is built once and shared by every request; the key,
/// sender and base url are read from the settings on each send.
#[derive(Debug)]
pub struct SendGridClient {
    http_client: Client,
}

impl SendGridClient {
    pub fn new() -> Result<Self, anyhow::Error> {
        Ok(Self {
            http_client: Client::builder()
                .build()
                .context("Error creating SendGrid http client")?,
        })
    }

    #[tracing::instrument(
        name = "sending email through sendgrid",
        skip(self, api_key, html_part, text_part)
    )]
    pub async fn send_email(
        &self,
        base_url: &Url,
        api_key: &str,
        sender: &str,
        recipient: &str,
        subject: &str,
        html_part: &str,
        text_part: &str,
    ) -> Result<Receipt, TransportError> {
        let response = self
            .http_client
            .post(base_url.join("v3/mail/send")?)
            .bearer_auth(api_key)
            .json(&MailSendRequest::new(
                sender, recipient, subject, html_part, text_part,
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_response(response).await);
        }

        let status_code = response.status().as_u16();
        let message_id = response
            .headers()
            .get(MESSAGE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        Ok(Receipt {
            details: Some(json!({
                "statusCode": status_code,
                "messageId": message_id,
            })),
            message_id: None,
        })
    }

    async fn error_response(response: Response) -> TransportError {
        let status = response.status();
        let canonical_reason = status.canonical_reason().unwrap_or("HTTP Error");
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::first_message);
        TransportError::ErrorResponse {
            code: status.as_u16(),
            reason: detail.unwrap_or_else(|| canonical_reason.to_string()),
        }
    }
}

#[async_trait]
impl Transport for SendGridClient {
    fn provider(&self) -> Provider {
        Provider::SendGrid
    }

    fn can_handle(&self, settings: &EmailSettings) -> bool {
        settings.sendgrid.is_configured()
    }

    async fn send(
        &self,
        request: &SendRequest,
        settings: &EmailSettings,
    ) -> Result<Receipt, TransportError> {
        let sendgrid = &settings.sendgrid;
        let api_key = non_empty(&sendgrid.api_key)
            .ok_or_else(|| TransportError::not_configured("SENDGRID_API_KEY not set"))?;
        let sender = non_empty(&sendgrid.from_email)
            .ok_or_else(|| TransportError::not_configured("SENDGRID_FROM_EMAIL not set"))?;
        let base_url = Url::parse(&sendgrid.base_url)?;

        self.send_email(
            &base_url,
            api_key,
            sender,
            request.to.as_ref(),
            &request.subject,
            &plain_html(&request.body),
            &request.body,
        )
        .await
    }
}
