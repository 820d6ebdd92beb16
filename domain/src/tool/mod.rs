//! Tool domain
//!
//! - [`entities::ToolDescriptor`]: one remotely-callable capability
//! - [`entities::ToolCatalog`]: immutable snapshot of a provider's tools
//! - [`entities::ToolCall`]: a model-requested invocation
//! - [`value_objects::ToolResult`]: outcome of a single invocation
//! - [`connection::ConnectionParams`]: how to reach the tool provider

pub mod connection;
pub mod entities;
pub mod value_objects;
