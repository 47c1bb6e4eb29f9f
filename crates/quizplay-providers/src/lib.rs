//! quizplay-providers — quiz generator backends.
//!
//! Implements the `QuizGenerator` trait for Google Gemini and a mock
//! backend, plus the TOML configuration that selects between them.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;

pub use config::{create_provider, load_config, ProviderConfig, QuizplayConfig};
pub use error::ProviderError;
