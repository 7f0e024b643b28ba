//! # Validation failures
//!
//! Field-level failures reported by a validation engine, and the bridge that
//! turns a batch of them into a single envelope.
//!
//! ## Design
//! - `FieldFailure` is engine-agnostic: a field path, a rule name, the rule's
//!   parameters and an optional explicit message
//! - `validator::ValidationErrors` flattens into failures with dotted and
//!   indexed paths (`address.city`, `items[0].sku`)
//! - `Translator` renders a failure for one locale, `TranslatorProvider`
//!   selects a translator by locale
//! - `ValidationBridge` builds the envelope: fixed message, one metadata
//!   entry per failing field, no category, no detail

pub mod bridge;
pub mod translate;

pub use bridge::{from_validation_failures, new_validation_error, ValidationBridge};
pub use translate::{EnglishTranslator, Translations, Translator, TranslatorProvider};

use std::collections::BTreeMap;
use validator::{ValidationErrors, ValidationErrorsKind};

/// A single failed rule on a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    path: String,
    rule: String,
    params: BTreeMap<String, String>,
    message: Option<String>,
}

impl FieldFailure {
    pub fn new(path: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            rule: rule.into(),
            params: BTreeMap::new(),
            message: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set an explicit message, which translators use verbatim
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The namespaced path of the field, e.g. `address.city`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The field's own name: the last path segment without list index
    pub fn field(&self) -> &str {
        let last = self.path.rsplit('.').next().unwrap_or(&self.path);
        last.split('[').next().unwrap_or(last)
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Flatten a `validator` report into failures ordered by path
    pub fn from_errors(errors: &ValidationErrors) -> Vec<FieldFailure> {
        let mut failures = Vec::new();
        collect(errors, "", &mut failures);
        failures.sort_by(|a, b| a.path.cmp(&b.path));
        failures
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldFailure>) {
    for (field, kind) in errors.errors() {
        let path = join(prefix, &field.to_string());
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let mut failure = FieldFailure::new(path.clone(), error.code.to_string());
                    for (key, value) in &error.params {
                        if key == "value" {
                            continue;
                        }
                        let value = match value {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        failure = failure.with_param(key.to_string(), value);
                    }
                    if let Some(message) = &error.message {
                        failure = failure.with_message(message.to_string());
                    }
                    out.push(failure);
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Address {
        #[validate(length(min = 2))]
        city: String,
    }

    #[derive(Debug, Validate)]
    struct Item {
        #[validate(length(min = 1, message = "sku must not be blank"))]
        sku: String,
    }

    #[derive(Debug, Validate)]
    struct Signup {
        #[validate(required)]
        name: Option<String>,
        #[validate(email)]
        email: String,
        #[validate(nested)]
        address: Address,
        #[validate(nested)]
        items: Vec<Item>,
    }

    #[test]
    fn test_field_name() {
        assert_eq!(FieldFailure::new("name", "required").field(), "name");
        assert_eq!(FieldFailure::new("address.city", "length").field(), "city");
        assert_eq!(FieldFailure::new("order.items[3]", "length").field(), "items");
    }

    #[test]
    fn test_from_flat_errors() {
        let signup = Signup {
            name: None,
            email: "not-an-email".to_string(),
            address: Address { city: "Sao Paulo".to_string() },
            items: Vec::new(),
        };
        let errors = signup.validate().unwrap_err();
        let failures = FieldFailure::from_errors(&errors);

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].path(), "email");
        assert_eq!(failures[0].rule(), "email");
        assert_eq!(failures[1].path(), "name");
        assert_eq!(failures[1].rule(), "required");
    }

    #[test]
    fn test_from_nested_errors() {
        let signup = Signup {
            name: Some("ana".to_string()),
            email: "ana@example.com".to_string(),
            address: Address { city: "X".to_string() },
            items: vec![Item { sku: "A1".to_string() }, Item { sku: String::new() }],
        };
        let errors = signup.validate().unwrap_err();
        let failures = FieldFailure::from_errors(&errors);

        let paths: Vec<_> = failures.iter().map(FieldFailure::path).collect();
        assert_eq!(paths, ["address.city", "items[1].sku"]);

        assert_eq!(failures[0].param("min"), Some("2"));
        assert_eq!(failures[1].message(), Some("sku must not be blank"));
    }
}
