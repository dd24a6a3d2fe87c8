//! System-wide default constants.
//!
//! Every value here is what the service falls back to when the matching
//! environment variable is unset.

// ============================================================================
// Health Endpoint
// ============================================================================

/// Port for the health endpoint when `PORT` is unset.
pub const HTTP_PORT: u16 = 8080;

/// Body returned by `GET /`.
pub const HEALTH_BODY: &str = "XAUUSD Analysis Service - Running";

// ============================================================================
// LLM Provider
// ============================================================================

/// Base URL of the Anthropic API.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";

/// Model used for the daily analysis.
pub const ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Value sent in the `anthropic-version` header.
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Output token bound for one analysis.
pub const MAX_OUTPUT_TOKENS: u32 = 4000;

/// Sampling temperature. Kept low so the report structure stays stable.
pub const TEMPERATURE: f64 = 0.1;

// ============================================================================
// Market Data
// ============================================================================

/// Placeholder quote endpoint. Set `MARKET_DATA_URL=""` to disable.
pub const MARKET_DATA_URL: &str = "https://api.example.com/xauusd";

// ============================================================================
// Email
// ============================================================================

pub const SMTP_SERVER: &str = "smtp.gmail.com";

/// STARTTLS submission port.
pub const SMTP_PORT: u16 = 587;

// ============================================================================
// Scheduler
// ============================================================================

/// Daily trigger, UTC (07:30 Swedish summer time).
pub const ANALYSIS_TIME: &str = "05:30";

/// How often the scheduler checks whether the trigger is due (seconds).
pub const SCHEDULER_POLL_INTERVAL_SECS: u64 = 60;
