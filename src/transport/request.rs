use serde::Serialize;

/// Body of a SendGrid `POST /v3/mail/send` call.
#[derive(Serialize)]
pub struct MailSendRequest<'a> {
    pub personalizations: Vec<Personalization<'a>>,
    pub from: Address<'a>,
    pub subject: &'a str,
    pub content: Vec<Content<'a>>,
}

#[derive(Serialize)]
pub struct Personalization<'a> {
    pub to: Vec<Address<'a>>,
}

#[derive(Serialize)]
pub struct Address<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub struct Content<'a> {
    #[serde(rename = "type")]
    pub mime_type: &'a str,
    pub value: &'a str,
}

impl<'a> MailSendRequest<'a> {
    // SendGrid requires text/plain to come before text/html.
    const TEXT_PLAIN: &'a str = "text/plain";
    const TEXT_HTML: &'a str = "text/html";

    pub fn new(
        sender: &'a str,
        recipient: &'a str,
        subject: &'a str,
        html_part: &'a str,
        text_part: &'a str,
    ) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![Address { email: recipient }],
            }],
            from: Address { email: sender },
            subject,
            content: vec![
                Content {
                    mime_type: Self::TEXT_PLAIN,
                    value: text_part,
                },
                Content {
                    mime_type: Self::TEXT_HTML,
                    value: html_part,
                },
            ],
        }
    }
}

/// Error body SendGrid returns on a rejected request.
#[derive(serde::Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(serde::Deserialize)]
pub struct ErrorDetail {
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn first_message(self) -> Option<String> {
        self.errors.into_iter().find_map(|e| e.message)
    }
}
