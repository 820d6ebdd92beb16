//! Answer envelope returned for a successfully answered question

use super::question::Question;
use serde::{Deserialize, Serialize};

/// Pairs the original question with the agent's final answer.
///
/// Only produced on success; failures never yield an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEnvelope {
    pub question: String,
    pub answer: String,
}

impl AnswerEnvelope {
    pub fn new(question: &Question, answer: impl Into<String>) -> Self {
        Self {
            question: question.content().to_string(),
            answer: answer.into(),
        }
    }
}
