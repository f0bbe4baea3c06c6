use custom_error::custom_error;
use lettre::address::AddressError;
use lettre::error::Error as MessageError;
use lettre::transport::smtp::Error as SmtpError;
use lettre::transport::stub::Error as StubError;
use reqwest::Error as RequestError;
use url::ParseError;

custom_error! {
///! Custom error for Email transport error.
pub TransportError
    NotConfigured {message:String} = "{message}",
    InvalidUri {source:ParseError} = "{source}",
    InvalidRequest {source:RequestError} = "{source}",
    ErrorResponse {code:u16, reason:String} = "{reason}",
    InvalidAddress {source:AddressError} = "{source}",
    InvalidMessage {source:MessageError} = "{source}",
    Smtp {source:SmtpError} = "{source}",
    Stub {source:StubError} = "{source}",
}

impl TransportError {
    pub fn not_configured(message: impl Into<String>) -> Self {
        TransportError::NotConfigured {
            message: message.into(),
        }
    }
}
