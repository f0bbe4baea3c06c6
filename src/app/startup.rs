use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::middleware::DefaultHeaders;
use actix_web::{
    web,
    App,
    HttpServer,
};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::app::configuration::{
    ApplicationSettings,
    Settings,
};
use crate::dispatcher::NotificationDispatcher;
use crate::routes::*;

/// Paths the send endpoint answers on; the second keeps the storefront's
/// serverless function url working.
pub const SEND_EMAIL_PATHS: [&str; 2] = ["/send-email", "/.netlify/functions/send-email"];

pub struct MailerApp {
    pub server: Server,
    pub port: u16,
}

impl MailerApp {
    pub fn from(configuration: Settings) -> Result<MailerApp, anyhow::Error> {
        let dispatcher = NotificationDispatcher::from_settings(configuration.email)?;
        Self::with_dispatcher(configuration.application, dispatcher)
    }

    /// Serve `dispatcher` instead of the one the email settings would build.
    pub fn with_dispatcher(
        application: ApplicationSettings,
        dispatcher: NotificationDispatcher,
    ) -> Result<MailerApp, anyhow::Error> {
        let tcp_listener = TcpListener::bind(application.binding_address())
            .context(format!("error binding to {}", application.binding_address()))?;
        let port = tcp_listener.local_addr()?.port();
        let dispatcher = web::Data::new(dispatcher);

        // HttpServer handles all transport level concerns
        let server = HttpServer::new(move || {
            // App is where all the application logic lives: routing, middlewares, request
            // handlers, etc.
            App::new()
                .wrap(cors_headers())
                .wrap(TracingLogger::default())
                .route("/health_check", web::get().to(health_check))
                // every verb reaches the handler so it can answer the preflight and
                // reject the rest with a JSON body, before any of the payload is read
                .service(web::resource(SEND_EMAIL_PATHS).route(web::route().to(send_email)))
                .app_data(dispatcher.clone())
        })
        .backlog(application.max_pending_connections)
        .listen(tcp_listener)?
        .run();
        Ok(MailerApp { server, port })
    }
}

fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Headers", "Content-Type, Authorization"))
        .add(("Access-Control-Allow-Methods", "POST, OPTIONS"))
}
