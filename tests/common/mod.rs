//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lettre::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use xauusd_analyst::config::AppConfig;
use xauusd_analyst::email::{EmailError, EmailSender, MailTransport};
use xauusd_analyst::llm::{Completion, LlmBackend, LlmError};
use xauusd_analyst::market::NoMarketData;
use xauusd_analyst::{AnalysisGenerator, DailyAnalysis};

/// What the fake LLM does when called
#[derive(Clone)]
pub enum LlmBehaviour {
    Reply(String),
    Fail,
    Panic,
}

pub struct FakeLlm {
    behaviour: Mutex<LlmBehaviour>,
    pub calls: AtomicUsize,
}

impl FakeLlm {
    pub fn new(behaviour: LlmBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour: Mutex::new(behaviour),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, behaviour: LlmBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmBackend for FakeLlm {
    async fn complete(&self, _prompt: &str) -> Result<Completion, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behaviour = self.behaviour.lock().unwrap().clone();
        match behaviour {
            LlmBehaviour::Reply(text) => Ok(Completion {
                text,
                model: "fake".to_string(),
                input_tokens: Some(1),
                output_tokens: Some(1),
            }),
            LlmBehaviour::Fail => Err(LlmError::Provider {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                message: "overloaded".to_string(),
            }),
            LlmBehaviour::Panic => panic!("fake LLM exploded"),
        }
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}

/// Counts SMTP sessions and keeps every message handed over.
///
/// Clones share the same counters, so a test can keep one handle while the
/// sender owns another.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sessions: Arc<AtomicUsize>,
    sent: Arc<Mutex<Vec<Message>>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, message: Message) -> Result<(), EmailError> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

impl RecordingTransport {
    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

pub fn email_config(recipients: &str) -> AppConfig {
    AppConfig {
        email_user: Some("analyst@example.org".to_string()),
        email_password: Some("app-password".to_string()),
        recipients: xauusd_analyst::config::parse_recipients(recipients),
        market_data_url: None,
        ..AppConfig::default()
    }
}

pub fn cycle(
    llm: Arc<FakeLlm>,
    transport: RecordingTransport,
    config: &AppConfig,
) -> DailyAnalysis<RecordingTransport> {
    DailyAnalysis::new(
        AnalysisGenerator::new(llm, Arc::new(NoMarketData)),
        EmailSender::new(transport, config),
    )
}
