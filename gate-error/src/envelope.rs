//! The structured error envelope

use crate::Category;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Detail used when a cause renders to an empty string
const UNSPECIFIED_DETAIL: &str = "unspecified error";

/// A failure occurrence together with the context gathered on its way up.
///
/// The envelope carries:
/// - `id`: unique per occurrence, for correlating log lines
/// - `message`: short human-facing summary, may be empty
/// - `detail`: the rendered text of the original cause
/// - `operations`: the call path, innermost first
/// - `category`: the routing tag, fixed at construction
/// - `timestamp`: seconds since the epoch, as a decimal string
/// - `meta`: free-form key/value pairs, last write wins
/// - `source`: the original cause (if any)
///
/// Only `id`, `message`, `detail`, `type` and `timestamp` are serialized.
/// The operation chain and the metadata are internal diagnostics.
///
/// # Example
///
/// ```rust
/// use gate_error::{Category, ErrorEnvelope};
///
/// let cause = std::io::Error::new(std::io::ErrorKind::Other, "connection refused");
/// let err = ErrorEnvelope::new(Category::Internal, cause)
///     .with_operation("repo.Get")
///     .with_operation("service.Fetch")
///     .with_meta("circle", "default");
///
/// assert_eq!(err.detail(), "connection refused");
/// assert_eq!(err.error_type(), "InternalError");
/// assert_eq!(err.operations(), ["repo.Get", "service.Fetch"]);
/// ```
#[derive(Clone, Serialize)]
pub struct ErrorEnvelope {
    id: Uuid,
    message: String,
    detail: String,
    #[serde(skip)]
    operations: Vec<String>,
    #[serde(rename = "type", serialize_with = "serialize_category")]
    category: Option<Category>,
    timestamp: String,
    #[serde(skip)]
    meta: HashMap<String, String>,
    #[serde(skip)]
    source: Option<Arc<anyhow::Error>>,
}

fn serialize_category<S: Serializer>(
    category: &Option<Category>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(category.as_ref().map_or("", Category::as_str))
}

fn now() -> String {
    chrono::Utc::now().timestamp().to_string()
}

fn render(cause: &anyhow::Error) -> String {
    let rendered = format!("{:#}", cause);
    if rendered.is_empty() {
        UNSPECIFIED_DETAIL.to_string()
    } else {
        rendered
    }
}

impl ErrorEnvelope {
    /// Wrap a raw cause into a new envelope with the given category
    pub fn new(category: impl Into<Category>, cause: impl Into<anyhow::Error>) -> Self {
        let cause: anyhow::Error = cause.into();
        Self {
            detail: render(&cause),
            source: Some(Arc::new(cause)),
            ..Self::blank(Some(category.into()))
        }
    }

    /// Create an envelope when only a textual description of the cause exists
    pub fn from_detail(category: impl Into<Category>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            detail: if detail.is_empty() {
                UNSPECIFIED_DETAIL.to_string()
            } else {
                detail
            },
            ..Self::blank(Some(category.into()))
        }
    }

    /// Envelope for a translated validation batch.
    ///
    /// The category stays unset and the detail stays empty; the metadata is the detail.
    pub(crate) fn invalid_inputs(message: impl Into<String>, meta: HashMap<String, String>) -> Self {
        Self {
            message: message.into(),
            meta,
            ..Self::blank(None)
        }
    }

    fn blank(category: Option<Category>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: String::new(),
            detail: String::new(),
            operations: Vec::new(),
            category,
            timestamp: now(),
            meta: HashMap::new(),
            source: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The rendered text of the original cause
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Operation names in call order, innermost first
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    /// The category tag, `None` for validation envelopes
    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// The category tag as a string; empty when unset
    pub fn error_type(&self) -> &str {
        self.category.as_ref().map_or("", Category::as_str)
    }

    /// Creation time in seconds since the epoch
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn meta(&self) -> &HashMap<String, String> {
        &self.meta
    }

    /// Get the original cause (if any)
    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_deref()
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Append an operation to the chain
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.push_operation(operation);
        self
    }

    /// Insert a metadata entry, replacing any previous value for the key
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_meta(key, value);
        self
    }

    pub fn with_metas<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in entries {
            self.insert_meta(key, value);
        }
        self
    }

    // =========================================================================
    // In-place enrichment
    // =========================================================================

    pub fn push_operation(&mut self, operation: impl Into<String>) {
        self.operations.push(operation.into());
    }

    pub fn insert_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl ErrorEnvelope {
    pub fn not_found(cause: impl Into<anyhow::Error>) -> Self {
        Self::new(Category::NotFound, cause)
    }

    pub fn internal(cause: impl Into<anyhow::Error>) -> Self {
        Self::new(Category::Internal, cause)
    }

    pub fn illegal_param(cause: impl Into<anyhow::Error>) -> Self {
        Self::new(Category::IllegalParam, cause)
    }

    pub fn parse(cause: impl Into<anyhow::Error>) -> Self {
        Self::new(Category::Parse, cause)
    }

    pub fn business(cause: impl Into<anyhow::Error>) -> Self {
        Self::new(Category::Business, cause)
    }
}

// =============================================================================
// Display - the detail only, as the terminal consumer shows it
// =============================================================================

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}] at {}", self.error_type(), self.id, self.timestamp)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.detail.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Detail: {}", self.detail)?;
        }

        if !self.operations.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Operations: {}", self.operations.join(" -> "))?;
        }

        if !self.meta.is_empty() {
            let mut entries: Vec<_> = self.meta.iter().collect();
            entries.sort();
            writeln!(f)?;
            writeln!(f, "    Meta:")?;
            for (key, value) in entries {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorEnvelope {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|e| {
            let e: &(dyn std::error::Error + 'static) = e.as_ref();
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn refused() -> io::Error {
        io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused")
    }

    #[test]
    fn test_envelope_creation() {
        let err = ErrorEnvelope::new(Category::Internal, refused());
        assert_eq!(err.detail(), "connection refused");
        assert_eq!(err.error_type(), "InternalError");
        assert_eq!(err.message(), "");
        assert!(err.operations().is_empty());
        assert!(err.meta().is_empty());
        assert!(err.source_ref().is_some());
    }

    #[test]
    fn test_timestamp_is_epoch_seconds() {
        let before = chrono::Utc::now().timestamp();
        let err = ErrorEnvelope::internal(refused());
        let after = chrono::Utc::now().timestamp();

        let ts: i64 = err.timestamp().parse().unwrap();
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ErrorEnvelope::internal(refused());
        let b = ErrorEnvelope::internal(refused());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_operation_order() {
        let err = ErrorEnvelope::internal(refused())
            .with_operation("repo.Get")
            .with_operation("service.Fetch")
            .with_operation("handler.Show");

        assert_eq!(err.operations(), ["repo.Get", "service.Fetch", "handler.Show"]);
    }

    #[test]
    fn test_meta_last_write_wins() {
        let mut err = ErrorEnvelope::business(refused()).with_meta("k", "v1");
        err.insert_meta("other", "x");
        assert_eq!(err.meta().len(), 2);

        err.insert_meta("k", "v2");
        assert_eq!(err.meta()["k"], "v2");
        assert_eq!(err.meta().len(), 2);
    }

    #[test]
    fn test_enrichment_keeps_category_and_detail() {
        let err = ErrorEnvelope::not_found(refused())
            .with_message("circle not found")
            .with_operation("repo.Find")
            .with_metas([("workspace", "w1"), ("circle", "c1")]);

        assert_eq!(err.category(), Some(&Category::NotFound));
        assert_eq!(err.detail(), "connection refused");
        assert_eq!(err.message(), "circle not found");
    }

    #[test]
    fn test_from_detail() {
        let err = ErrorEnvelope::from_detail(Category::Parse, "unexpected token");
        assert_eq!(err.detail(), "unexpected token");
        assert!(err.source_ref().is_none());

        let err = ErrorEnvelope::from_detail("QuotaError", "");
        assert_eq!(err.detail(), UNSPECIFIED_DETAIL);
        assert_eq!(err.error_type(), "QuotaError");
    }

    #[test]
    fn test_empty_cause_keeps_detail() {
        let err = ErrorEnvelope::internal(io::Error::new(io::ErrorKind::Other, ""));
        assert_eq!(err.detail(), UNSPECIFIED_DETAIL);
    }

    #[test]
    fn test_context_chain_in_detail() {
        let cause = anyhow::Error::new(refused()).context("dial cluster");
        let err = ErrorEnvelope::internal(cause);
        assert_eq!(err.detail(), "dial cluster: connection refused");
    }

    #[test]
    fn test_display_is_detail() {
        let err = ErrorEnvelope::parse(refused()).with_operation("decode");
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_debug_lists_context() {
        let err = ErrorEnvelope::internal(refused())
            .with_operation("repo.Get")
            .with_operation("service.Fetch")
            .with_meta("host", "db");

        let debug = format!("{:?}", err);
        assert!(debug.contains("InternalError"));
        assert!(debug.contains("repo.Get -> service.Fetch"));
        assert!(debug.contains("host: db"));
        assert!(debug.contains("Source:"));
    }

    #[test]
    fn test_serialization_hides_internal_fields() {
        let err = ErrorEnvelope::internal(refused())
            .with_message("fetch failed")
            .with_operation("repo.Get")
            .with_meta("host", "db");

        let value = serde_json::to_value(&err).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 5);
        assert_eq!(object["id"], err.id().to_string());
        assert_eq!(object["message"], "fetch failed");
        assert_eq!(object["detail"], "connection refused");
        assert_eq!(object["type"], "InternalError");
        assert_eq!(object["timestamp"], err.timestamp());
        assert!(!object.contains_key("operations"));
        assert!(!object.contains_key("meta"));
    }

    #[test]
    fn test_std_error_source() {
        use std::error::Error as _;

        let err = ErrorEnvelope::internal(refused());
        assert_eq!(err.source().unwrap().to_string(), "connection refused");

        let err = ErrorEnvelope::from_detail(Category::Internal, "boom");
        assert!(err.source().is_none());
    }
}
