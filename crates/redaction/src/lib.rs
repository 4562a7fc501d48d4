//! # Guardrail Redaction
//!
//! PII redaction engine for Guardrail providing:
//! - Recursive sanitization of arbitrary nested JSON payloads
//! - Case-insensitive, exact-name PII field classification
//! - Partial email masking that preserves a debugging hint
//! - A hard serialized-size ceiling with a truncation envelope
//!
//! ## Example
//!
//! ```rust
//! use guardrail_redaction::Sanitizer;
//! use serde_json::json;
//!
//! let sanitizer = Sanitizer::new();
//! let input = json!({"email": "john@acme.com", "name": "John"});
//! let result = sanitizer.sanitize(Some(&input));
//!
//! assert!(result.was_sanitized);
//! assert_eq!(result.fields_redacted, 1);
//! assert_eq!(result.data["name"], "John");
//! ```

mod sanitizer;

pub use sanitizer::{SanitizationResult, Sanitizer, SanitizerConfig};
