//! OpenAI provider
//!
//! Adapter for the OpenAI chat completions API. Messages pass through
//! unchanged; finish reasons and usage are folded into the gateway's
//! uniform response shape.

pub mod client;
pub mod config;
pub mod provider;

pub use config::OpenAiConfig;
pub use provider::OpenAiProvider;
