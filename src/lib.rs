//! # LLM Gateway
//!
//! A reliability-hardened HTTP gateway fronting LLM chat-completion
//! providers (OpenAI and Anthropic) behind a single validated endpoint.
//!
//! ## Features
//!
//! - **Uniform Schema**: one request/response shape regardless of vendor
//! - **Rate Limiting**: fixed-window per-client pacing with header-ready
//!   snapshots
//! - **Idempotency**: client-keyed replay of finalized responses
//! - **Request Coalescing**: concurrent duplicate requests share one
//!   upstream call
//! - **Circuit Breaking**: per-provider failure gates with half-open probes
//! - **Retries**: bounded exponential backoff around the breaker-protected
//!   call
//! - **Observability**: Prometheus metrics and structured request logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_gateway::server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     // Reads PORT, DEFAULT_PROVIDER, OPENAI_API_KEY, ... from the
//!     // environment and serves POST /v1/chat/completions.
//!     server::run_server().await.map_err(|e| e.into())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod server;
pub mod utils;

// Re-export main types
pub use crate::config::Config;
pub use crate::core::orchestrator::Orchestrator;
pub use crate::core::providers::{ChatProvider, ProviderError, ProviderRegistry, ProviderResult};
pub use crate::core::types::{
    ChatMessage, ChatRequest, ChatResponse, FinishReason, MessageRole, Usage,
};
pub use crate::utils::error::{GatewayError, Result};
