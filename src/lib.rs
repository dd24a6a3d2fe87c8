//! XAUUSD Daily Analyst
//!
//! Once a day: ask an LLM for a four-part gold (XAUUSD) trading analysis,
//! wrap it in an HTML email and send it to a fixed recipient list over SMTP.
//! A tiny HTTP endpoint reports liveness for platform health checks.
//!
//! ## Architecture
//!
//! - **config**: immutable settings read from the environment at startup
//! - **api**: `GET /` health endpoint
//! - **market**: optional live quote used to enrich the prompt
//! - **llm**: LLM backend trait and the Anthropic Messages API client
//! - **analysis**: prompt template and report generation
//! - **email**: HTML template and SMTP delivery
//! - **pipeline**: one generate-then-email run
//! - **scheduler**: daily trigger polled once a minute

pub mod analysis;
pub mod api;
pub mod config;
pub mod email;
pub mod llm;
pub mod market;
pub mod pipeline;
pub mod scheduler;

pub use analysis::{Analysis, AnalysisGenerator};
pub use config::AppConfig;
pub use email::{EmailError, EmailSender, MailTransport, SmtpMailer};
pub use llm::{AnthropicClient, Completion, LlmBackend, LlmError};
pub use market::{MarketDataError, MarketDataSource, MarketSnapshot};
pub use pipeline::{CycleError, CycleOutcome, DailyAnalysis};
pub use scheduler::{Clock, DailyTrigger, Scheduler, SystemClock, TickOutcome};
