use std::env;
use std::env::VarError;

use config::builder::DefaultState;
use config::{
    Config,
    ConfigBuilder,
    ConfigError,
    Environment,
    File,
};
use custom_error::custom_error;
use derivative::Derivative;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email: EmailSettings,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub max_pending_connections: u32,
    pub port: u16,
}

/// Everything the dispatcher needs to pick and drive a transport.
#[derive(Clone, Derivative, serde::Deserialize)]
#[derivative(Debug, Default)]
pub struct EmailSettings {
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub sendgrid: SendGridSettings,
    #[serde(default)]
    pub smtp: SmtpSettings,
}

#[derive(Clone, Derivative, serde::Deserialize)]
#[derivative(Debug, Default)]
pub struct SendGridSettings {
    #[derivative(Debug = "ignore")]
    pub api_key: Option<String>,
    pub from_email: Option<String>,
    #[serde(default = "default_sendgrid_base_url")]
    #[derivative(Default(value = "default_sendgrid_base_url()"))]
    pub base_url: String,
}

#[derive(Clone, Derivative, serde::Deserialize)]
#[derivative(Debug, Default)]
pub struct SmtpSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    #[serde(default)]
    pub secure: bool,
    pub user: Option<String>,
    #[derivative(Debug = "ignore")]
    pub pass: Option<String>,
    pub from: Option<String>,
    #[serde(default = "default_smtp_service")]
    #[derivative(Default(value = "default_smtp_service()"))]
    pub service: String,
}

fn default_sendgrid_base_url() -> String {
    String::from("https://api.sendgrid.com")
}

fn default_smtp_service() -> String {
    String::from("gmail")
}

/// Treats an empty value the same as a missing one.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ApplicationSettings {
    pub fn binding_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SendGridSettings {
    pub fn is_configured(&self) -> bool {
        non_empty(&self.api_key).is_some()
    }
}

impl SmtpSettings {
    /// Sender address: `EMAIL_FROM`, or the login user when unset.
    pub fn sender(&self) -> Option<&str> {
        non_empty(&self.from).or_else(|| non_empty(&self.user))
    }
}

/// The flat provider variables a deployment sets (`SENDGRID_API_KEY`,
/// `SMTP_HOST`, ...). Empty values are dropped when read.
#[derive(Clone, Derivative, Default)]
#[derivative(Debug)]
pub struct ProviderVariables {
    pub test_email_mode: Option<String>,
    #[derivative(Debug = "ignore")]
    pub sendgrid_api_key: Option<String>,
    pub sendgrid_from_email: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<String>,
    pub smtp_secure: Option<String>,
    pub email_user: Option<String>,
    #[derivative(Debug = "ignore")]
    pub email_pass: Option<String>,
    pub email_from: Option<String>,
    pub email_service: Option<String>,
}

impl ProviderVariables {
    pub fn from_env() -> Self {
        fn read(key: &str) -> Option<String> {
            env::var(key).ok().filter(|v| !v.is_empty())
        }

        Self {
            test_email_mode: read("TEST_EMAIL_MODE"),
            sendgrid_api_key: read("SENDGRID_API_KEY"),
            sendgrid_from_email: read("SENDGRID_FROM_EMAIL"),
            smtp_host: read("SMTP_HOST"),
            smtp_port: read("SMTP_PORT"),
            smtp_secure: read("SMTP_SECURE"),
            email_user: read("EMAIL_USER"),
            email_pass: read("EMAIL_PASS"),
            email_from: read("EMAIL_FROM"),
            email_service: read("EMAIL_SERVICE"),
        }
    }

    fn apply(
        self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        // only the literal "true" switches a flag on
        let test_mode = self.test_email_mode.map(|v| v == "true");
        let secure = self.smtp_secure.map(|v| v == "true");
        // an unparsable port counts as unset
        let port = self
            .smtp_port
            .and_then(|p| p.trim().parse::<u16>().ok())
            .map(i64::from);

        builder
            .set_override_option("email.test_mode", test_mode)?
            .set_override_option("email.sendgrid.api_key", self.sendgrid_api_key)?
            .set_override_option("email.sendgrid.from_email", self.sendgrid_from_email)?
            .set_override_option("email.smtp.host", self.smtp_host)?
            .set_override_option("email.smtp.port", port)?
            .set_override_option("email.smtp.secure", secure)?
            .set_override_option("email.smtp.user", self.email_user)?
            .set_override_option("email.smtp.pass", self.email_pass)?
            .set_override_option("email.smtp.from", self.email_from)?
            .set_override_option("email.smtp.service", self.email_service)
    }
}

custom_error! {
///! Custom error for missing env variable or invalid configuration files.
pub ConfigurationError
    MissingAppEnv{source:VarError} = "`APP_ENVIRONMENT` is not set \
    (possible values: [`local`|`production`]).",
    InvalidConfig{source:ConfigError} = "{source}",
}

/// Load the configuration from the directory: `configuration`.
///
/// It fails if:
/// - the `APP_ENVIRONMENT` env variable is not set
/// - the `configuration/base` file is missing
/// - the `configuration/${APP_ENVIRONMENT}` file is missing
/// - the `configuration/*` files have missing or unexpected fields
///
/// The provider variables (`TEST_EMAIL_MODE`, `SENDGRID_API_KEY`, `SMTP_*`,
/// `EMAIL_*`) are read once here and win over the files.
///
/// # Examples
///
/// ```no_run
/// use gba_mailer::app::load_configuration;
///
/// let settings = load_configuration().expect("invalid configuration");
/// println!("{}", settings.application.binding_address());
/// ```
pub fn load_configuration() -> Result<Settings, ConfigurationError> {
    let app_environment = env::var("APP_ENVIRONMENT")?;
    build_settings(&app_environment, ProviderVariables::from_env())
}

pub fn build_settings(
    app_environment: &str,
    variables: ProviderVariables,
) -> Result<Settings, ConfigurationError> {
    let builder = Config::builder()
        .add_source(File::with_name("configuration/base").required(true))
        .add_source(File::with_name(&format!("configuration/{}", app_environment)).required(true))
        // Add in settings from environment variables (with a prefix of APP and '__' as
        // separator) E.g. `APP_APPLICATION__PORT=5001 would set
        // `Settings.application.port`
        .add_source(
            Environment::with_prefix("app")
                .prefix_separator("_")
                .separator("__"),
        );

    let settings = variables.apply(builder)?.build()?.try_deserialize()?;
    Ok(settings)
}
