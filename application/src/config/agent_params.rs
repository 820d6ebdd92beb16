//! Agent parameters: request loop control.
//!
//! [`AgentParams`] groups the static parameters that bound a single `/ask`
//! request: how many model turns the reasoning loop may take and how long
//! opening the tool session and running the whole request may block.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default system prompt handed to the model.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You answer questions using the tools of the connected \
knowledge base. Search before answering, cite page titles when you use them, and say so plainly \
when the knowledge base does not contain the answer.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentParams {
    /// Maximum number of model turns in one reasoning loop.
    pub max_steps: usize,
    /// Upper bound for spawning the tool provider and completing its handshake.
    pub open_timeout: Duration,
    /// Upper bound for tool discovery plus the whole reasoning loop.
    pub request_timeout: Duration,
    /// System prompt for the model session.
    pub system_prompt: Option<String>,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            max_steps: 10,
            open_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(300),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }
}

impl AgentParams {
    // ==================== Builder Methods ====================

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }
}
