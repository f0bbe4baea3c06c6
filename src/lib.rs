//! The `gba-mailer` entry point.
//!
//! A single endpoint validates notification requests and hands them to the
//! first configured email transport (SendGrid, then SMTP).

pub mod app;
pub mod dispatcher;
pub mod domain;
pub mod routes;
pub mod transport;
