//! Universal request and response types
//!
//! Every provider adapter translates between these types and its vendor's
//! wire format; nothing vendor-shaped escapes the adapter layer.

pub mod requests;
pub mod responses;

pub use requests::{ChatMessage, ChatRequest, MessageRole};
pub use responses::{ChatResponse, FinishReason, Usage};
