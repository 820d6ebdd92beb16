//! LLM session domain.
//!
//! - [`response::LlmResponse`]: structured model output
//! - [`response::ContentBlock`]: text or tool use block
//! - [`response::StopReason`]: why the model stopped generating

pub mod response;
