pub use errors::{
    MalformedInput,
    Violation,
};
pub use recipient_email::RecipientEmail;
pub use send_request::SendRequest;
pub use send_result::{
    Provider,
    Receipt,
    SendResult,
};

mod errors;
mod recipient_email;
mod send_request;
mod send_result;
