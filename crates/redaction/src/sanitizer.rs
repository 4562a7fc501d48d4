//! Recursive PII sanitizer for JSON-like payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashSet;

/// Field names treated as PII out of the box. Matching is exact and
/// case-insensitive; generic fields like `name` or `company` do not match.
const SEED_PII_FIELDS: &[&str] = &[
    "email",
    "email_address",
    "e-mail",
    "emailaddress",
    "phone",
    "phone_number",
    "phonenumber",
    "mobile",
    "first_name",
    "firstname",
    "given_name",
    "last_name",
    "lastname",
    "family_name",
    "surname",
];

const DEFAULT_PLACEHOLDER: &str = "***REDACTED***";
const DEFAULT_MAX_DATA_SIZE_BYTES: usize = 64 * 1024;

/// Recursion ceiling for pathological or cyclic inputs. Subtrees at this
/// depth are replaced wholesale rather than traversed.
const MAX_DEPTH: usize = 64;

/// Sanitizer configuration.
#[derive(Debug, Clone)]
pub struct SanitizerConfig {
    /// Replacement string for generic PII values.
    pub placeholder: String,
    /// Ceiling on the serialized size of the sanitized output.
    pub max_data_size_bytes: usize,
    /// Extra field names to classify as PII, beyond the seed list.
    pub additional_pii_fields: HashSet<String>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            max_data_size_bytes: DEFAULT_MAX_DATA_SIZE_BYTES,
            additional_pii_fields: HashSet::new(),
        }
    }
}

impl SanitizerConfig {
    /// Creates a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placeholder string.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets the serialized-size ceiling in bytes.
    pub fn max_data_size_bytes(mut self, max: usize) -> Self {
        self.max_data_size_bytes = max;
        self
    }

    /// Adds a field name to the PII denylist.
    pub fn pii_field(mut self, field: impl Into<String>) -> Self {
        self.additional_pii_fields.insert(field.into());
        self
    }

    /// Adds multiple field names to the PII denylist.
    pub fn pii_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.additional_pii_fields
            .extend(fields.into_iter().map(|f| f.into()));
        self
    }
}

/// Result of sanitizing a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizationResult {
    /// The sanitized payload, mirroring the input structure.
    pub data: Value,
    /// Whether any field was redacted.
    pub was_sanitized: bool,
    /// Number of individual leaf fields replaced.
    pub fields_redacted: usize,
}

/// PII sanitizer. Pure and synchronous; safe to share across threads.
pub struct Sanitizer {
    placeholder: String,
    max_data_size_bytes: usize,
    pii_fields: HashSet<String>,
}

impl Sanitizer {
    /// Creates a sanitizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(SanitizerConfig::default())
    }

    /// Creates a sanitizer with custom configuration.
    pub fn with_config(config: SanitizerConfig) -> Self {
        let mut pii_fields: HashSet<String> =
            SEED_PII_FIELDS.iter().map(|f| f.to_string()).collect();
        pii_fields.extend(
            config
                .additional_pii_fields
                .iter()
                .map(|f| f.to_lowercase()),
        );

        Self {
            placeholder: config.placeholder,
            max_data_size_bytes: config.max_data_size_bytes,
            pii_fields,
        }
    }

    /// Checks whether a field name is classified as PII.
    pub fn is_pii_field(&self, name: &str) -> bool {
        self.pii_fields.contains(&name.to_lowercase())
    }

    /// Sanitizes a payload, replacing PII leaf values and enforcing the
    /// serialized-size ceiling.
    pub fn sanitize(&self, input: Option<&Value>) -> SanitizationResult {
        let value = match input {
            None | Some(Value::Null) => {
                return SanitizationResult {
                    data: Value::Object(Map::new()),
                    was_sanitized: false,
                    fields_redacted: 0,
                };
            }
            Some(v) => v,
        };

        // A bare scalar cannot carry named PII fields; wrap it so the
        // output is always an object or array.
        let wrapped;
        let root = if value.is_object() || value.is_array() {
            value
        } else {
            wrapped = json!({ "_value": value });
            &wrapped
        };

        let mut fields_redacted = 0;
        let data = self.redact_value(root, 0, &mut fields_redacted);

        let serialized_size = serde_json::to_vec(&data).map(|b| b.len()).unwrap_or(0);
        let data = if serialized_size > self.max_data_size_bytes {
            json!({
                "_truncated": true,
                "_originalSizeBytes": serialized_size,
            })
        } else {
            data
        };

        SanitizationResult {
            data,
            was_sanitized: fields_redacted > 0,
            fields_redacted,
        }
    }

    fn redact_value(&self, value: &Value, depth: usize, fields_redacted: &mut usize) -> Value {
        if depth >= MAX_DEPTH {
            *fields_redacted += 1;
            return Value::String(self.placeholder.clone());
        }

        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, val) in map {
                    if self.is_pii_field(key) {
                        out.insert(key.clone(), self.redact_leaf(val));
                        *fields_redacted += 1;
                    } else {
                        out.insert(key.clone(), self.redact_value(val, depth + 1, fields_redacted));
                    }
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.redact_value(item, depth + 1, fields_redacted))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn redact_leaf(&self, value: &Value) -> Value {
        if let Value::String(s) = value {
            if let Some(masked) = mask_email(s) {
                return Value::String(masked);
            }
        }
        Value::String(self.placeholder.clone())
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Masks an email-shaped string, discarding the local part entirely and
/// keeping only a short domain hint plus the top-level suffix:
/// `user@example.com` -> `***@ex***.com`. Returns `None` for values that
/// are not email-shaped.
fn mask_email(value: &str) -> Option<String> {
    let (local, domain) = value.split_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }

    let first_label = domain.split('.').next().unwrap_or(domain);
    let hint: String = first_label.chars().take(2).collect();
    let suffix = domain.rsplit('.').next().unwrap_or(domain);

    Some(format!("***@{}***.{}", hint, suffix))
}
