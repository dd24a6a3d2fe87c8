//! Daily XAUUSD analysis generation
//!
//! - [`prompt`]: fixed four-part instruction template plus today's date and
//!   optional market context
//! - [`generator`]: market fetch, prompt assembly and the LLM call

pub mod generator;
pub mod prompt;

pub use generator::{Analysis, AnalysisGenerator};
pub use prompt::build_prompt;
