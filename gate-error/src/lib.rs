//! # gate-error
//!
//! Structured error envelopes that gather context as they travel up the
//! call stack.
//!
//! ## Design Philosophy
//!
//! - **Category**: chosen once where the failure is observed, never changed
//! - **Operations**: a flat breadcrumb of the layers the error crossed
//! - **Meta**: key/value context for logs, last write wins
//! - **Identity**: a unique id and a creation timestamp per occurrence
//!
//! ## Usage
//!
//! ```rust
//! use gate_error::{Category, ErrorEnvelope, Result};
//!
//! fn find_circle(id: &str) -> Result<()> {
//!     let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "no rows");
//!     Err(ErrorEnvelope::new(Category::NotFound, cause)
//!         .with_operation("repository.FindCircle")
//!         .with_meta("circle_id", id)
//!         .into())
//! }
//!
//! let err = find_circle("c-42").unwrap_err().with_operation("service.GetCircle");
//! let envelope = gate_error::unwrap(&err);
//! assert_eq!(envelope.error_type(), "NotFoundError");
//! assert_eq!(envelope.operations(), ["repository.FindCircle", "service.GetCircle"]);
//! ```
//!
//! ## Principles
//!
//! - The origin classifies; every other layer only appends context
//! - Enriching an unclassified error wraps it as `InternalError` instead of failing
//! - Operations and meta never leave the process: serialization skips them
//! - Suppressing an error is explicit and logged (`ResultExt::swallow`)

mod category;
mod config;
mod envelope;
mod error;
mod ext;
pub mod validation;

pub use category::Category;
pub use config::{BridgeConfig, DEFAULT_INVALID_MESSAGE, DEFAULT_LOCALE};
pub use envelope::ErrorEnvelope;
pub use error::{error_details, error_type, new_error, unwrap, with_meta, with_operation, Error};
pub use ext::{CategoryExt, ResultExt};
pub use validation::{from_validation_failures, new_validation_error, FieldFailure, ValidationBridge};

/// Result type alias using gate Error
pub type Result<T> = std::result::Result<T, Error>;
