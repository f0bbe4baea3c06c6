use gba_mailer::app::{
    load_configuration,
    setup_tracing,
    MailerApp,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing("gba-mailer".into(), "info".into());

    let configuration = load_configuration()?;
    tracing::info!(settings = ?configuration, "configuration loaded");

    let app = MailerApp::from(configuration)?;
    tracing::info!(port = app.port, "listening");
    app.server.await?;
    Ok(())
}
