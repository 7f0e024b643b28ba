//! Enrichment helpers on `Result`

use crate::{Category, Error, ErrorEnvelope};

/// Attach context to the error side of a `Result` as it propagates.
///
/// ```rust
/// use gate_error::{Category, CategoryExt, ResultExt};
///
/// fn read_manifest() -> gate_error::Result<String> {
///     std::fs::read_to_string("/definitely/missing/manifest.yaml")
///         .category(Category::NotFound)
///         .operation("manifest.read")
/// }
///
/// let err = read_manifest().unwrap_err();
/// assert_eq!(err.error_type(), "NotFoundError");
/// ```
pub trait ResultExt<T> {
    /// Append an operation to the error's chain
    fn operation(self, operation: &str) -> Result<T, Error>;

    /// Insert a metadata entry into the error
    fn meta(self, key: &str, value: impl Into<String>) -> Result<T, Error>;

    /// Swallow the error deliberately, logging it with the reason.
    ///
    /// Suppression is always visible: a warning is emitted with the
    /// error's id, category and detail.
    fn swallow(self, reason: &str) -> Option<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for Result<T, E> {
    fn operation(self, operation: &str) -> Result<T, Error> {
        self.map_err(|e| e.into().with_operation(operation))
    }

    fn meta(self, key: &str, value: impl Into<String>) -> Result<T, Error> {
        self.map_err(|e| e.into().with_meta(key, value))
    }

    fn swallow(self, reason: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let envelope = err.into().into_envelope();
                tracing::warn!(
                    id = %envelope.id(),
                    error_type = envelope.error_type(),
                    detail = envelope.detail(),
                    operations = ?envelope.operations(),
                    "error swallowed: {}",
                    reason
                );
                None
            }
        }
    }
}

/// Classify a raw error at the point it is first observed
pub trait CategoryExt<T> {
    /// Wrap the error into a new envelope of the given category
    fn category(self, category: impl Into<Category>) -> Result<T, Error>;
}

impl<T, E> CategoryExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn category(self, category: impl Into<Category>) -> Result<T, Error> {
        self.map_err(|e| Error::from(ErrorEnvelope::new(category, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn fetch(fail: bool) -> Result<u32, io::Error> {
        if fail {
            Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
        } else {
            Ok(7)
        }
    }

    #[test]
    fn test_category_then_operations() {
        let err = fetch(true)
            .category(Category::Internal)
            .operation("repo.Get")
            .operation("service.Fetch")
            .unwrap_err();

        let envelope = err.as_envelope().unwrap();
        assert_eq!(envelope.error_type(), "InternalError");
        assert_eq!(envelope.detail(), "connection refused");
        assert_eq!(envelope.operations(), ["repo.Get", "service.Fetch"]);
    }

    #[test]
    fn test_meta_on_result() {
        let err = fetch(true)
            .category(Category::Business)
            .meta("circle", "default")
            .unwrap_err();

        assert_eq!(err.as_envelope().unwrap().meta()["circle"], "default");
    }

    #[test]
    fn test_ok_passes_through() {
        let value = fetch(false).category(Category::Internal).operation("repo.Get");
        assert_eq!(value.unwrap(), 7);
    }

    #[test]
    fn test_io_error_converts_on_operation() {
        let err = fetch(true).operation("repo.Get").unwrap_err();
        assert_eq!(err.error_type(), "InternalError");
    }

    #[test]
    fn test_swallow() {
        assert_eq!(fetch(false).swallow("cache warmup is optional"), Some(7));
        assert_eq!(fetch(true).swallow("cache warmup is optional"), None);
    }
}
