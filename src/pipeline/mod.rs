//! Daily Analysis Pipeline
//!
//! ```text
//! market data (optional) ─┐
//!                         ├─> prompt ─> LLM ─> HTML email ─> SMTP
//! today's date ───────────┘
//! ```
//!
//! A generation failure stops the run before anything is emailed.

mod cycle;

pub use cycle::{CycleError, CycleOutcome, DailyAnalysis};
