//! AI assistant integration
//!
//! Chat, one-click layout, image generation, and skin CSS generation
//! against OpenAI-compatible or Gemini endpoints. The wire lives in
//! `client`, fixed system prompts in `prompts`, and `worker` runs requests
//! off the UI thread.

mod client;
mod profile;
mod prompts;
mod worker;

pub use client::AiClient;
pub use profile::{AiProfile, ImageSize, Provider};
pub use worker::{AiEvent, AiTask, AiWorker};

use serde::{Deserialize, Serialize};

/// Speaker of one chat-history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}
