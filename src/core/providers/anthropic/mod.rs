//! Anthropic provider
//!
//! Adapter for the Anthropic messages API. The first system message is
//! lifted into the top-level `system` directive and `max_tokens` defaults
//! to 4096 when the caller leaves it unset.

pub mod client;
pub mod config;
pub mod provider;

pub use config::AnthropicConfig;
pub use provider::AnthropicProvider;
