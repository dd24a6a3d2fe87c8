//! Analysis generation: market snapshot and date in, LLM report out.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::prompt::build_prompt;
use crate::llm::{LlmBackend, LlmError};
use crate::market::{fetch_optional, MarketDataSource};

/// A generated report, kept only until it has been emailed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    /// Whether a live market snapshot went into the prompt
    pub with_market_data: bool,
}

/// Builds the prompt and asks the LLM for the report
pub struct AnalysisGenerator {
    llm: Arc<dyn LlmBackend>,
    market: Arc<dyn MarketDataSource>,
}

impl AnalysisGenerator {
    pub fn new(llm: Arc<dyn LlmBackend>, market: Arc<dyn MarketDataSource>) -> Self {
        Self { llm, market }
    }

    /// Generate the report for the day containing `now`.
    ///
    /// A missing market snapshot is not an error. Any LLM failure is logged
    /// and returned; nothing is retried.
    pub async fn generate(&self, now: DateTime<Utc>) -> Result<Analysis, LlmError> {
        let market = fetch_optional(self.market.as_ref()).await;
        let prompt = build_prompt(now.date_naive(), market.as_ref());

        let started = Instant::now();
        match self.llm.complete(&prompt).await {
            Ok(completion) => {
                info!(
                    backend = self.llm.backend_name(),
                    model = %completion.model,
                    chars = completion.text.len(),
                    output_tokens = ?completion.output_tokens,
                    elapsed = ?started.elapsed(),
                    "Analysis generated"
                );
                Ok(Analysis {
                    text: completion.text,
                    model: completion.model,
                    generated_at: now,
                    with_market_data: market.is_some(),
                })
            }
            Err(e) => {
                error!(backend = self.llm.backend_name(), error = %e, "Error generating analysis");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Completion;
    use crate::market::{MarketDataError, MarketSnapshot, NoMarketData};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Records prompts and answers with a canned result.
    struct ScriptedLlm {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmBackend for ScriptedLlm {
        async fn complete(&self, prompt: &str) -> Result<Completion, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Some(text) => Ok(Completion {
                    text: text.clone(),
                    model: "scripted".to_string(),
                    input_tokens: None,
                    output_tokens: None,
                }),
                None => Err(LlmError::EmptyResponse),
            }
        }

        fn backend_name(&self) -> &'static str {
            "scripted"
        }
    }

    struct FixedMarket(MarketSnapshot);

    #[async_trait]
    impl MarketDataSource for FixedMarket {
        async fn fetch(&self) -> Result<MarketSnapshot, MarketDataError> {
            Ok(self.0.clone())
        }

        fn source_name(&self) -> &str {
            "fixed"
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 5, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn returns_completion_text_and_uses_todays_date() {
        let llm = Arc::new(ScriptedLlm {
            reply: Some("BUY signal at 2350".to_string()),
            prompts: Mutex::new(Vec::new()),
        });
        let generator = AnalysisGenerator::new(llm.clone(), Arc::new(NoMarketData));

        let analysis = generator.generate(now()).await.unwrap();

        assert_eq!(analysis.text, "BUY signal at 2350");
        assert_eq!(analysis.generated_at, now());
        assert!(!analysis.with_market_data);
        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Today is October 18, 2026."));
    }

    #[tokio::test]
    async fn market_snapshot_is_embedded_in_prompt() {
        let llm = Arc::new(ScriptedLlm {
            reply: Some("ok".to_string()),
            prompts: Mutex::new(Vec::new()),
        });
        let market = Arc::new(FixedMarket(serde_json::json!({"bid": 2349.9})));
        let generator = AnalysisGenerator::new(llm.clone(), market);

        let analysis = generator.generate(now()).await.unwrap();

        assert!(analysis.with_market_data);
        assert!(llm.prompts.lock().unwrap()[0].contains("2349.9"));
    }

    #[tokio::test]
    async fn llm_failure_is_returned_as_error() {
        let llm = Arc::new(ScriptedLlm {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        });
        let generator = AnalysisGenerator::new(llm, Arc::new(NoMarketData));

        assert!(matches!(generator.generate(now()).await, Err(LlmError::EmptyResponse)));
    }
}
