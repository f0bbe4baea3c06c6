use serde::Serialize;
use serde_json::Value;

/// The transport that handled, or would have handled, a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Provider {
    #[serde(rename = "sendgrid")]
    SendGrid,
    #[serde(rename = "nodemailer")]
    Smtp,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::SendGrid => "sendgrid",
            Provider::Smtp => "nodemailer",
        }
    }
}

/// What a provider hands back after accepting a message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Receipt {
    pub message_id: Option<String>,
    pub details: Option<Value>,
}

/// The normalized JSON body returned to the caller.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResult {
    pub const SIMULATED_SEND: &'static str = "TEST_MODE - simulated send";

    pub fn simulated(provider: Provider) -> Self {
        Self {
            message: Some(Self::SIMULATED_SEND.to_string()),
            ..Self::success(provider)
        }
    }

    pub fn delivered(provider: Provider, receipt: Receipt) -> Self {
        Self {
            result: receipt.details,
            message_id: receipt.message_id,
            ..Self::success(provider)
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            provider: None,
            message: None,
            result: None,
            message_id: None,
            error: Some(error.into()),
        }
    }

    fn success(provider: Provider) -> Self {
        Self {
            success: true,
            provider: Some(provider),
            message: None,
            result: None,
            message_id: None,
            error: None,
        }
    }
}
