//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`]: a validated, non-empty question
//! - [`answer::AnswerEnvelope`]: the question paired with its answer
//! - [`model::ModelId`]: opaque identifier of the inference model
//! - [`error::DomainError`]: domain-level errors

pub mod answer;
pub mod error;
pub mod model;
pub mod question;
