pub use errors::RouteError;
pub use health_check::health_check;
pub use send_email::{
    send_email,
    MAX_BODY_BYTES,
};

mod errors;
mod health_check;
mod send_email;
