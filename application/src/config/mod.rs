//! Application-level configuration.
//!
//! - [`AgentParams`]: step bound, timeouts and system prompt for one request

pub mod agent_params;

pub use agent_params::AgentParams;
