//! Model identifier value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opaque identifier of the hosted inference model (Value Object)
///
/// The value is passed to the provider verbatim, e.g.
/// `anthropic.claude-3-5-sonnet-20240620-v1:0` or an inference profile id
/// such as `us.anthropic.claude-sonnet-4-20250514-v1:0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidModel(
                "model id cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModelId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::new(s)
    }
}

impl TryFrom<String> for ModelId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ModelId::new(s)
    }
}

impl From<ModelId> for String {
    fn from(m: ModelId) -> Self {
        m.0
    }
}
