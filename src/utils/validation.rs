//! Request and response validation
//!
//! Field-level checks that run after serde has parsed the body. Parsing
//! catches shape errors (missing fields, wrong types); the validator
//! catches range and emptiness violations and reports every offending
//! field at once.

use crate::core::types::ChatResponse;
use crate::server::types::ChatCompletionRequest;
use serde::Serialize;

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path of the offending field
    pub field: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validator for gateway requests and responses
pub struct RequestValidator;

impl RequestValidator {
    /// Validate a chat completion request body
    ///
    /// Returns every violation found rather than stopping at the first.
    pub fn validate_chat_completion(
        request: &ChatCompletionRequest,
    ) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if request.model.trim().is_empty() {
            errors.push(FieldError::new("model", "must be a non-empty string"));
        }

        if request.messages.is_empty() {
            errors.push(FieldError::new("messages", "must contain at least one message"));
        }

        for (i, message) in request.messages.iter().enumerate() {
            if message.content.is_empty() {
                errors.push(FieldError::new(
                    format!("messages[{}].content", i),
                    "must be a non-empty string",
                ));
            }
        }

        if let Some(temperature) = request.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                errors.push(FieldError::new(
                    "temperature",
                    "must be between 0 and 2",
                ));
            }
        }

        if let Some(max_tokens) = request.max_tokens {
            if max_tokens == 0 {
                errors.push(FieldError::new("maxTokens", "must be a positive integer"));
            }
        }

        if let Some(timeout) = request.timeout {
            if timeout == 0 {
                errors.push(FieldError::new("timeout", "must be a positive integer"));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validate an outgoing chat response before it is cached or emitted
    pub fn validate_chat_response(response: &ChatResponse) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if response.id.is_empty() {
            errors.push(FieldError::new("id", "must be a non-empty string"));
        }

        if response.model.is_empty() {
            errors.push(FieldError::new("model", "must be a non-empty string"));
        }

        let usage = &response.usage;
        if usage.total_tokens < usage.prompt_tokens.max(usage.completion_tokens) {
            errors.push(FieldError::new(
                "usage.totalTokens",
                "must not be less than its components",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
