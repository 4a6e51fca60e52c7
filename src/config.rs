use std::fmt;
use std::path::Path;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_ENDPOINT: &str =
    "https://api.securityscorecard.com/api/v1/vendors/lifelock.com/factorsummary";

/// Env var naming an extra settings file layered over `config/default`.
pub const CONFIG_PATH_ENV: &str = "SCORECARD_WATCH_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiConfig,
    pub schedule: ScheduleConfig,
    pub mail: MailConfig,
    pub log_level: String,
}

#[derive(Deserialize, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    pub token: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
    pub threshold: i64,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub relay_host: String,
    pub relay_port: u16,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
}

impl Settings {
    /// Defaults, then `config/default.*`, then the file named by
    /// `SCORECARD_WATCH_CONFIG`, then `APP_*` environment variables.
    pub fn new() -> Result<Self> {
        let mut builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false));

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            debug!(path = %path, "Layering settings file from environment");
            builder = builder.add_source(File::from(Path::new(&path)));
        }

        let builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );

        Self::build(builder)
    }

    /// Defaults overlaid with a single settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::build(Self::defaults()?.add_source(File::from(path)))
    }

    /// Defaults overlaid with an inline document.
    pub fn from_document(document: &str, format: FileFormat) -> Result<Self> {
        Self::build(Self::defaults()?.add_source(File::from_str(document, format)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.token.trim().is_empty() {
            return Err(Error::InvalidConfig("api.token must not be empty".to_string()));
        }
        if self.api.endpoint.trim().is_empty() {
            return Err(Error::InvalidConfig("api.endpoint must not be empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.schedule.interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "schedule.interval_secs must be greater than zero".to_string(),
            ));
        }
        if !(0..=100).contains(&self.schedule.threshold) {
            return Err(Error::InvalidConfig(format!(
                "schedule.threshold must be within 0..=100, got {}",
                self.schedule.threshold
            )));
        }
        if self.mail.relay_host.trim().is_empty() {
            return Err(Error::InvalidConfig("mail.relay_host must not be empty".to_string()));
        }
        Ok(())
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = Config::builder()
            .set_default("api.endpoint", DEFAULT_ENDPOINT)?
            .set_default("api.timeout_secs", 30_i64)?
            .set_default("schedule.interval_secs", 300_i64)?
            .set_default("schedule.threshold", 99_i64)?
            .set_default("mail.relay_host", "mail.example.com")?
            .set_default("mail.relay_port", 25_i64)?
            .set_default("mail.sender", "sender@example.org")?
            .set_default("mail.recipient", "recipient@example.net")?
            .set_default("mail.subject", "Security rating alert")?
            .set_default("log_level", "info")?;
        Ok(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        debug!(
            api = ?settings.api,
            schedule = ?settings.schedule,
            mail = ?settings.mail,
            "Loaded settings"
        );

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn defaults_fill_everything_but_the_token() {
        let settings = Settings::from_document("api:\n  token: secret\n", FileFormat::Yaml).unwrap();

        assert_eq!(settings.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.api.token, "secret");
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.schedule.interval(), Duration::from_secs(300));
        assert_eq!(settings.schedule.threshold, 99);
        assert_eq!(settings.mail.relay_host, "mail.example.com");
        assert_eq!(settings.mail.relay_port, 25);
        assert_eq!(settings.mail.sender, "sender@example.org");
        assert_eq!(settings.mail.recipient, "recipient@example.net");
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = Settings::from_document("schedule:\n  threshold: 80\n", FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {err:?}");
    }

    #[test]
    fn blank_token_is_rejected() {
        let err = Settings::from_document("api:\n  token: \"  \"\n", FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "got {err:?}");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let doc = "api:\n  token: t\nschedule:\n  interval_secs: 0\n";
        let err = Settings::from_document(doc, FileFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("interval_secs"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let doc = "api:\n  token: t\n  timeout_secs: 0\n";
        let err = Settings::from_document(doc, FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "got {err:?}");
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    #[serial]
    fn new_layers_file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "api:\n  token: file-token\nschedule:\n  interval_secs: 120\n  threshold: 70\n"
        )
        .unwrap();

        // SAFETY: env mutation is confined to `#[serial]` tests.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, file.path());
            std::env::set_var("APP_API__TOKEN", "env-token");
            std::env::set_var("APP_SCHEDULE__THRESHOLD", "80");
        }

        let result = Settings::new();

        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
            std::env::remove_var("APP_API__TOKEN");
            std::env::remove_var("APP_SCHEDULE__THRESHOLD");
        }

        let settings = result.unwrap();
        assert_eq!(settings.api.token, "env-token");
        assert_eq!(settings.schedule.threshold, 80);
        assert_eq!(settings.schedule.interval_secs, 120);
        assert_eq!(settings.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.mail.relay_host, "mail.example.com");
    }

    #[test]
    #[serial]
    fn new_without_token_fails() {
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
            std::env::remove_var("APP_API__TOKEN");
        }

        assert!(Settings::new().is_err());
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let doc = "api:\n  token: t\nschedule:\n  threshold: 101\n";
        let err = Settings::from_document(doc, FileFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn loads_overrides_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[api]
endpoint = "http://localhost:8080/factorsummary"
token = "abc"

[schedule]
interval_secs = 60
threshold = 75

[mail]
relay_host = "relay.internal"
relay_port = 2525
recipient = "secops@example.net"
"#
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.api.endpoint, "http://localhost:8080/factorsummary");
        assert_eq!(settings.schedule.interval_secs, 60);
        assert_eq!(settings.schedule.threshold, 75);
        assert_eq!(settings.mail.relay_host, "relay.internal");
        assert_eq!(settings.mail.relay_port, 2525);
        assert_eq!(settings.mail.recipient, "secops@example.net");
        assert_eq!(settings.mail.sender, "sender@example.org");
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn debug_output_redacts_token() {
        let settings = Settings::from_document("api:\n  token: hunter2\n", FileFormat::Yaml).unwrap();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
