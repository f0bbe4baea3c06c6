pub use configuration::*;
pub use startup::MailerApp;
pub use telemetry::setup_tracing;

mod configuration;
mod startup;
mod telemetry;
