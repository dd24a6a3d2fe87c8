//! Application configuration read from the process environment.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use tracing::warn;

use super::defaults;

/// Immutable service configuration.
///
/// Built once in `main` and shared behind an `Arc`. Nothing below `main`
/// reads the environment directly.
#[derive(Clone)]
pub struct AppConfig {
    /// `ANTHROPIC_API_KEY`
    pub anthropic_api_key: Option<String>,
    /// `ANTHROPIC_MODEL`
    pub anthropic_model: String,
    /// `ANTHROPIC_API_URL`, without trailing slash
    pub anthropic_api_url: String,
    /// `MARKET_DATA_URL`; `None` disables the market data fetch
    pub market_data_url: Option<String>,
    /// `SMTP_SERVER`
    pub smtp_server: String,
    /// `SMTP_PORT`
    pub smtp_port: u16,
    /// `EMAIL_USER`, also used as the `From` address
    pub email_user: Option<String>,
    /// `EMAIL_PASSWORD`
    pub email_password: Option<String>,
    /// `EMAIL_RECIPIENTS`, split on commas
    pub recipients: Vec<String>,
    /// `PORT` for the health endpoint
    pub port: u16,
    /// `TEST_MODE`
    pub test_mode: bool,
    /// `ANALYSIS_TIME`, UTC
    pub analysis_time: NaiveTime,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// Unset keys fall back to [`defaults`]. Only values that must be
    /// numeric or a time of day can fail.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let smtp_port = match lookup("SMTP_PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid SMTP_PORT value: {v:?}"))?,
            None => defaults::SMTP_PORT,
        };

        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {v:?}"))?,
            None => defaults::HTTP_PORT,
        };

        let analysis_time = parse_time_of_day(
            &lookup("ANALYSIS_TIME").unwrap_or_else(|| defaults::ANALYSIS_TIME.to_string()),
        )?;

        // An explicitly empty MARKET_DATA_URL turns the fetch off.
        let market_data_url = match lookup("MARKET_DATA_URL") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v.trim().to_string()),
            None => Some(defaults::MARKET_DATA_URL.to_string()),
        };

        Ok(Self {
            anthropic_api_key: non_empty(lookup("ANTHROPIC_API_KEY")),
            anthropic_model: non_empty(lookup("ANTHROPIC_MODEL"))
                .unwrap_or_else(|| defaults::ANTHROPIC_MODEL.to_string()),
            anthropic_api_url: non_empty(lookup("ANTHROPIC_API_URL"))
                .unwrap_or_else(|| defaults::ANTHROPIC_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            market_data_url,
            smtp_server: non_empty(lookup("SMTP_SERVER"))
                .unwrap_or_else(|| defaults::SMTP_SERVER.to_string()),
            smtp_port,
            email_user: non_empty(lookup("EMAIL_USER")),
            email_password: non_empty(lookup("EMAIL_PASSWORD")),
            recipients: parse_recipients(&lookup("EMAIL_RECIPIENTS").unwrap_or_default()),
            port,
            test_mode: lookup("TEST_MODE").is_some_and(|v| is_truthy(&v)),
            analysis_time,
        })
    }

    /// Both SMTP login values are present.
    pub fn has_email_credentials(&self) -> bool {
        self.email_user.is_some() && self.email_password.is_some()
    }

    /// Log a warning for every setting that will make the daily run fail.
    pub fn warn_missing(&self) {
        if self.anthropic_api_key.is_none() {
            warn!("ANTHROPIC_API_KEY not set, analysis generation will fail");
        }
        if !self.has_email_credentials() {
            warn!("EMAIL_USER / EMAIL_PASSWORD not set, emails will be skipped");
        }
        if self.recipients.is_empty() {
            warn!("EMAIL_RECIPIENTS is empty, nobody will receive the analysis");
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("anthropic_api_key", &self.anthropic_api_key.as_ref().map(|_| "<redacted>"))
            .field("anthropic_model", &self.anthropic_model)
            .field("anthropic_api_url", &self.anthropic_api_url)
            .field("market_data_url", &self.market_data_url)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("email_user", &self.email_user)
            .field("email_password", &self.email_password.as_ref().map(|_| "<redacted>"))
            .field("recipients", &self.recipients)
            .field("port", &self.port)
            .field("test_mode", &self.test_mode)
            .field("analysis_time", &self.analysis_time)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            anthropic_model: defaults::ANTHROPIC_MODEL.to_string(),
            anthropic_api_url: defaults::ANTHROPIC_API_URL.to_string(),
            market_data_url: Some(defaults::MARKET_DATA_URL.to_string()),
            smtp_server: defaults::SMTP_SERVER.to_string(),
            smtp_port: defaults::SMTP_PORT,
            email_user: None,
            email_password: None,
            recipients: Vec::new(),
            port: defaults::HTTP_PORT,
            test_mode: false,
            analysis_time: NaiveTime::from_hms_opt(5, 30, 0).unwrap_or_default(),
        }
    }
}

/// `true`, `1` and `yes` (any case) enable a flag.
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Split a comma-separated recipient list, dropping blank entries.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `HH:MM` (or `HH:MM:SS`).
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .with_context(|| format!("Invalid ANALYSIS_TIME value: {value:?} (expected HH:MM)"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
