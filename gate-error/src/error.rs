//! The polymorphic error type and the free-function enrichment API

use crate::{Category, ErrorEnvelope};
use std::collections::HashMap;
use std::fmt;

/// Any error flowing through gate code.
///
/// Either a structured envelope, or a foreign error that has not been
/// classified yet. Enrichment on a foreign error first wraps it into an
/// `InternalError` envelope, so attaching context never fails.
pub enum Error {
    Envelope(Box<ErrorEnvelope>),
    Foreign(anyhow::Error),
}

impl Error {
    /// Wrap any error value without classifying it
    pub fn foreign(err: impl Into<anyhow::Error>) -> Self {
        let err: anyhow::Error = err.into();
        Self::from(err)
    }

    pub fn as_envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            Error::Envelope(envelope) => Some(&**envelope),
            Error::Foreign(_) => None,
        }
    }

    // A foreign error is wrapped as `InternalError` before it is enriched.
    fn into_boxed_envelope(self) -> Box<ErrorEnvelope> {
        match self {
            Error::Envelope(envelope) => envelope,
            Error::Foreign(err) => {
                tracing::warn!(
                    detail = %format!("{:#}", err),
                    "enriching an unclassified error, wrapping it as {}",
                    Category::INTERNAL
                );
                Box::new(ErrorEnvelope::internal(err))
            }
        }
    }

    /// Consume the error, yielding an envelope.
    ///
    /// A foreign error becomes an `InternalError` envelope keeping it as source.
    pub fn into_envelope(self) -> ErrorEnvelope {
        *self.into_boxed_envelope()
    }

    /// Copy out the envelope; never panics.
    ///
    /// A foreign error yields a fresh `InternalError` envelope carrying its
    /// rendered text as detail.
    pub fn to_envelope(&self) -> ErrorEnvelope {
        match self {
            Error::Envelope(envelope) => (**envelope).clone(),
            Error::Foreign(err) => ErrorEnvelope::from_detail(Category::Internal, format!("{:#}", err)),
        }
    }

    /// Append an operation to the chain
    pub fn with_operation(self, operation: impl Into<String>) -> Self {
        let mut envelope = self.into_boxed_envelope();
        envelope.push_operation(operation);
        Error::Envelope(envelope)
    }

    /// Insert a metadata entry, replacing any previous value for the key
    pub fn with_meta(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut envelope = self.into_boxed_envelope();
        envelope.insert_meta(key, value);
        Error::Envelope(envelope)
    }

    /// The category tag as a string; `InternalError` for foreign errors
    pub fn error_type(&self) -> &str {
        match self {
            Error::Envelope(envelope) => envelope.error_type(),
            Error::Foreign(_) => Category::INTERNAL,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Envelope(envelope) => fmt::Display::fmt(envelope, f),
            Error::Foreign(err) => write!(f, "{:#}", err),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Envelope(envelope) => fmt::Debug::fmt(envelope, f),
            Error::Foreign(err) => fmt::Debug::fmt(err, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Envelope(envelope) => std::error::Error::source(&**envelope),
            Error::Foreign(err) => {
                let err: &(dyn std::error::Error + 'static) = err.as_ref();
                Some(err)
            }
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ErrorEnvelope> for Error {
    fn from(envelope: ErrorEnvelope) -> Self {
        Error::Envelope(Box::new(envelope))
    }
}

impl From<anyhow::Error> for Error {
    /// Recovers an envelope that was erased into `anyhow::Error` on the way up.
    ///
    /// Context layers added with `anyhow` above the envelope are appended to
    /// its operation chain, innermost first.
    fn from(err: anyhow::Error) -> Self {
        let layers: Vec<String> = err.chain().map(ToString::to_string).collect();

        let recovered = match err.downcast::<Error>() {
            Ok(inner) => inner,
            Err(err) => match err.downcast::<ErrorEnvelope>() {
                Ok(envelope) => Error::from(envelope),
                Err(err) => return Error::Foreign(err),
            },
        };

        let detail = match recovered.as_envelope() {
            Some(envelope) => envelope.to_string(),
            None => return recovered,
        };
        let contexts: Vec<String> = layers
            .into_iter()
            .take_while(|layer| *layer != detail)
            .collect();

        contexts
            .into_iter()
            .rev()
            .fold(recovered, |err, context| err.with_operation(context))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let category = match err.kind() {
            std::io::ErrorKind::NotFound => Category::NotFound,
            _ => Category::Internal,
        };
        Error::from(ErrorEnvelope::new(category, err))
    }
}

// =============================================================================
// Free functions
// =============================================================================

/// Create a new envelope from a raw cause.
///
/// `meta` may be empty; `operations` seeds the chain, innermost first.
pub fn new_error(
    message: impl Into<String>,
    cause: impl Into<anyhow::Error>,
    category: impl Into<Category>,
    meta: Option<HashMap<String, String>>,
    operations: &[&str],
) -> Error {
    let mut envelope = ErrorEnvelope::new(category, cause)
        .with_message(message)
        .with_metas(meta.unwrap_or_default());
    for operation in operations {
        envelope.push_operation(*operation);
    }
    Error::from(envelope)
}

/// Append `operation` to the error's operation chain
pub fn with_operation(err: impl Into<Error>, operation: impl Into<String>) -> Error {
    err.into().with_operation(operation)
}

/// Insert `key -> value` into the error's metadata
pub fn with_meta(err: impl Into<Error>, key: impl Into<String>, value: impl Into<String>) -> Error {
    err.into().with_meta(key, value)
}

/// Copy out the envelope behind any error
pub fn unwrap(err: &Error) -> ErrorEnvelope {
    err.to_envelope()
}

/// The category tag of any error
pub fn error_type(err: &Error) -> String {
    err.error_type().to_string()
}

/// The rendered cause of any error
pub fn error_details(err: &Error) -> String {
    match err {
        Error::Envelope(envelope) => envelope.detail().to_string(),
        Error::Foreign(err) => format!("{:#}", err),
    }
}
