//! HTTP API
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | welcome message |
//! | `GET /health` | liveness probe |
//! | `POST /ask` | answer a question with a request-scoped tool session |

pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use handlers::{AskRequest, WELCOME_MESSAGE};
pub use router::{AppState, router, serve};
