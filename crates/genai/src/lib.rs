//! Text generation for design briefs.
//!
//! [`TextGenerator`] is the seam; [`GeminiClient`] implements it over the
//! Gemini REST API. [`Advisor`] wraps a generator with the two prompts the
//! application uses and never fails: errors and empty replies become fixed
//! fallback messages.

pub mod advisor;
pub mod client;
pub mod config;
pub mod prompt;

pub use advisor::Advisor;
pub use client::{GeminiClient, GenAiError, TextGenerator};
pub use config::GenAiConfig;
