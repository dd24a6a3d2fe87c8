//! One daily run: generate the analysis, then email it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::analysis::AnalysisGenerator;
use crate::config::AppConfig;
use crate::email::{EmailError, EmailSender, MailTransport, SmtpMailer};
use crate::llm::{AnthropicClient, LlmError};
use crate::market::{HttpMarketData, MarketDataSource, NoMarketData};

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    pub recipients: usize,
    pub chars: usize,
    pub model: String,
}

/// Why a run did not deliver an email
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("Analysis failed: {0}")]
    Analysis(#[from] LlmError),
    #[error("Email delivery failed: {0}")]
    Email(#[from] EmailError),
}

/// One generate-then-email run.
///
/// The email step only runs when generation succeeded.
pub struct DailyAnalysis<T> {
    generator: AnalysisGenerator,
    sender: EmailSender<T>,
}

impl DailyAnalysis<SmtpMailer> {
    /// Wire the production components: Anthropic, HTTP market data, SMTP.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("xauusd-analyst/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let market: Arc<dyn MarketDataSource> = match &config.market_data_url {
            Some(url) => Arc::new(HttpMarketData::new(http.clone(), url)),
            None => Arc::new(NoMarketData),
        };
        let llm = Arc::new(AnthropicClient::new(http, config));

        Ok(Self::new(
            AnalysisGenerator::new(llm, market),
            EmailSender::new(SmtpMailer::from_config(config), config),
        ))
    }
}

impl<T: MailTransport> DailyAnalysis<T> {
    pub fn new(generator: AnalysisGenerator, sender: EmailSender<T>) -> Self {
        Self { generator, sender }
    }

    pub fn sender(&self) -> &EmailSender<T> {
        &self.sender
    }

    /// Run the full cycle for `now`.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<CycleOutcome, CycleError> {
        info!("🚀 Starting XAUUSD analysis at {}", now.format("%Y-%m-%d %H:%M:%S UTC"));

        let analysis = match self.generator.generate(now).await {
            Ok(analysis) => analysis,
            Err(e) => {
                error!(error = %e, "❌ Analysis failed, skipping email");
                return Err(CycleError::Analysis(e));
            }
        };

        let recipients = self.sender.send_analysis(&analysis).await?;

        info!("📧 Daily analysis completed successfully");
        Ok(CycleOutcome {
            recipients,
            chars: analysis.text.len(),
            model: analysis.model,
        })
    }

    /// Test mode: run once immediately, then cancel `shutdown` whatever the
    /// result so the process exits once the health server drains.
    pub async fn run_once(
        &self,
        now: DateTime<Utc>,
        shutdown: &CancellationToken,
    ) -> Option<CycleOutcome> {
        let outcome = match self.run(now).await {
            Ok(outcome) => {
                info!(
                    recipients = outcome.recipients,
                    chars = outcome.chars,
                    "🧪 Test run delivered"
                );
                Some(outcome)
            }
            Err(e) => {
                warn!(error = %e, "🧪 Test run did not deliver an email");
                None
            }
        };
        shutdown.cancel();
        outcome
    }
}
