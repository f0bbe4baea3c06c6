use std::str::FromStr;

use async_trait::async_trait;
use lettre::message::header::{
    ContentTransferEncoding,
    ContentType,
};
use lettre::message::{
    Mailbox,
    MultiPart,
    SinglePart,
};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{
    Tls,
    TlsParameters,
};
use lettre::transport::stub::AsyncStubTransport;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
};
use uuid::Uuid;

use crate::app::{
    non_empty,
    EmailSettings,
    SmtpSettings,
};
use crate::domain::{
    Provider,
    Receipt,
    SendRequest,
};
use crate::transport::template::branded_html;
use crate::transport::{
    Transport,
    TransportError,
};

const NO_PROVIDER_CONFIGURED: &str =
    "No email provider configured (set SENDGRID_API_KEY or SMTP_* / EMAIL_USER & EMAIL_PASS)";

/// Mail services reachable by name alone, given a login.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WellKnownService {
    Gmail,
    Outlook,
    Yahoo,
}

impl WellKnownService {
    pub fn host(&self) -> &'static str {
        match self {
            WellKnownService::Gmail => "smtp.gmail.com",
            WellKnownService::Outlook => "smtp-mail.outlook.com",
            WellKnownService::Yahoo => "smtp.mail.yahoo.com",
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            WellKnownService::Gmail | WellKnownService::Yahoo => 465,
            WellKnownService::Outlook => 587,
        }
    }

    /// Whether the service expects TLS from the first byte rather than STARTTLS.
    pub fn implicit_tls(&self) -> bool {
        self.port() == 465
    }
}

impl FromStr for WellKnownService {
    type Err = TransportError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "gmail" | "googlemail" => Ok(WellKnownService::Gmail),
            "outlook" | "hotmail" | "outlook365" => Ok(WellKnownService::Outlook),
            "yahoo" => Ok(WellKnownService::Yahoo),
            _ => Err(TransportError::not_configured(format!(
                "Unknown email service: {}",
                name
            ))),
        }
    }
}

/// Where an SMTP delivery connects to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Relay<'a> {
    Explicit {
        host: &'a str,
        port: u16,
        secure: bool,
    },
    Service(WellKnownService),
}

impl<'a> Relay<'a> {
    /// An explicit relay needs host, port, user and pass; a login alone falls
    /// back to the named service.
    fn select(smtp: &'a SmtpSettings) -> Result<(Self, Credentials), TransportError> {
        let login = match (non_empty(&smtp.user), non_empty(&smtp.pass)) {
            (Some(user), Some(pass)) => Credentials::new(user.to_string(), pass.to_string()),
            _ => return Err(TransportError::not_configured(NO_PROVIDER_CONFIGURED)),
        };
        let port = smtp.port.filter(|port| *port != 0);

        let relay = match (non_empty(&smtp.host), port) {
            (Some(host), Some(port)) => Relay::Explicit {
                host,
                port,
                secure: smtp.secure,
            },
            _ => Relay::Service(smtp.service.parse()?),
        };
        Ok((relay, login))
    }

    fn transport(
        self,
        credentials: Credentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let (host, port, tls) = match self {
            Relay::Explicit { host, port, secure } => {
                let parameters = TlsParameters::new(host.to_string())?;
                let tls = if secure {
                    Tls::Wrapper(parameters)
                } else {
                    Tls::Opportunistic(parameters)
                };
                (host, port, tls)
            }
            Relay::Service(service) => {
                let parameters = TlsParameters::new(service.host().to_string())?;
                let tls = if service.implicit_tls() {
                    Tls::Wrapper(parameters)
                } else {
                    Tls::Required(parameters)
                };
                (service.host(), service.port(), tls)
            }
        };

        Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .tls(tls)
            .credentials(credentials)
            .build())
    }
}

/// Build the multipart message and the Message-ID it carries.
fn compose(request: &SendRequest, sender: &str) -> Result<(Message, String), TransportError> {
    let from: Mailbox = sender.parse()?;
    let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

    let message = Message::builder()
        .message_id(Some(message_id.clone()))
        .from(from)
        .to(request.to.as_ref().parse()?)
        .subject(request.subject.as_str())
        .multipart(
            MultiPart::alternative()
                .singlepart(encoded_part(ContentType::TEXT_PLAIN, request.body.clone()))
                .singlepart(encoded_part(ContentType::TEXT_HTML, branded_html(&request.body))),
        )?;
    Ok((message, message_id))
}

/// Base64 keeps accented bodies intact on relays without 8BITMIME.
fn encoded_part(content_type: ContentType, content: String) -> SinglePart {
    SinglePart::builder()
        .header(content_type)
        .header(ContentTransferEncoding::Base64)
        .body(content)
}

/// Delivers over SMTP. A transport is built per request from the settings.
#[derive(Debug, Default)]
pub struct SmtpClient {
    stub: Option<AsyncStubTransport>,
}

impl SmtpClient {
    /// A client that still resolves the relay and composes the message from
    /// the settings, then hands it to `stub` instead of connecting.
    pub fn stubbed(stub: AsyncStubTransport) -> Self {
        Self { stub: Some(stub) }
    }
}

#[async_trait]
impl Transport for SmtpClient {
    fn provider(&self) -> Provider {
        Provider::Smtp
    }

    fn can_handle(&self, _settings: &EmailSettings) -> bool {
        true
    }

    #[tracing::instrument(
        name = "sending email through smtp",
        skip(self, request, settings),
        fields(recipient = %request.to.as_ref())
    )]
    async fn send(
        &self,
        request: &SendRequest,
        settings: &EmailSettings,
    ) -> Result<Receipt, TransportError> {
        let smtp = &settings.smtp;
        let (relay, credentials) = Relay::select(smtp)?;
        let sender = smtp
            .sender()
            .ok_or_else(|| TransportError::not_configured(NO_PROVIDER_CONFIGURED))?;
        let (message, message_id) = compose(request, sender)?;

        match &self.stub {
            Some(stub) => stub.send(message).await?,
            None => {
                relay.transport(credentials)?.send(message).await?;
            }
        }
        tracing::info!(message_id = %message_id, "smtp relay accepted the message");

        Ok(Receipt {
            message_id: Some(message_id),
            details: None,
        })
    }
}
