//! Scheduling assistant backed by a hosted language model.
//!
//! The model never writes to the timetable. It answers questions, drafts
//! timetables for review and points out problems in an existing schedule.

pub mod error;
pub mod gemini;
pub mod prompt;
pub mod tasks;
pub mod types;

use async_trait::async_trait;
pub use error::AssistantError;

/// A text completion backend
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Returns the model's reply to a single-turn prompt
    async fn complete(&self, prompt: &str) -> Result<String, AssistantError>;
}

/// Stands in when no API key is configured; every request fails
pub struct Unconfigured;

#[async_trait]
impl Assistant for Unconfigured {
    async fn complete(&self, _prompt: &str) -> Result<String, AssistantError> {
        Err(AssistantError::NotConfigured)
    }
}
