//! Prompt and schema contract with the hosted model, the HTTP client that
//! speaks it, and the local scan history.

pub mod analyzer;
pub mod backend;
pub mod config;
pub mod error;
pub mod gemini;
pub mod history;
pub mod prompt;
pub mod schema;

pub use analyzer::{parse_report, Analyzer};
pub use backend::{ModelBackend, ModelCall, ModelReply};
pub use config::{ModelConfig, PhishingConfig};
pub use error::{HistoryError, ScanError};
pub use gemini::GeminiClient;
pub use history::{HistoryStore, HISTORY_FILE_NAME};
pub use prompt::{build_prompt, sample_input};
