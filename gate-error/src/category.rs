//! Category tags for gate errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a failure.
///
/// The category is chosen once, where the failure is first observed, and is
/// never changed by enrichment. Terminal consumers route on it (for example
/// `NotFoundError` to a "not found" response, everything else to a generic
/// failure response).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Requested resource or entity does not exist
    NotFound,

    /// Unexpected internal failure, not correctable by the caller
    Internal,

    /// Caller-supplied argument violates a precondition
    IllegalParam,

    /// Input could not be decoded or parsed
    Parse,

    /// Valid input rejected by a domain rule
    Business,

    /// A caller-supplied tag outside the fixed set.
    ///
    /// The generic constructor accepts any tag without checking membership;
    /// well-behaved callers stick to the variants above.
    Custom(String),
}

impl Category {
    pub const NOT_FOUND: &'static str = "NotFoundError";
    pub const INTERNAL: &'static str = "InternalError";
    pub const ILLEGAL_PARAM: &'static str = "IllegalParamError";
    pub const PARSE: &'static str = "ParseError";
    pub const BUSINESS: &'static str = "BusinessError";

    /// Returns the wire name of the category
    pub fn as_str(&self) -> &str {
        match self {
            Category::NotFound => Self::NOT_FOUND,
            Category::Internal => Self::INTERNAL,
            Category::IllegalParam => Self::ILLEGAL_PARAM,
            Category::Parse => Self::PARSE,
            Category::Business => Self::BUSINESS,
            Category::Custom(tag) => tag,
        }
    }

    /// Check if this is one of the fixed category tags
    pub fn is_well_known(&self) -> bool {
        !matches!(self, Category::Custom(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Category::NotFound)
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        match tag {
            Self::NOT_FOUND => Category::NotFound,
            Self::INTERNAL => Category::Internal,
            Self::ILLEGAL_PARAM => Category::IllegalParam,
            Self::PARSE => Category::Parse,
            Self::BUSINESS => Category::Business,
            other => Category::Custom(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        Category::from(tag.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Custom(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(Category::NotFound.to_string(), "NotFoundError");
        assert_eq!(Category::Internal.to_string(), "InternalError");
        assert_eq!(Category::IllegalParam.to_string(), "IllegalParamError");
        assert_eq!(Category::Parse.to_string(), "ParseError");
        assert_eq!(Category::Business.to_string(), "BusinessError");
    }

    #[test]
    fn test_from_known_names() {
        assert_eq!(Category::from("NotFoundError"), Category::NotFound);
        assert_eq!(Category::from("BusinessError".to_string()), Category::Business);
        assert!(Category::from("ParseError").is_well_known());
    }

    #[test]
    fn test_custom_tag_is_accepted() {
        let category = Category::from("QuotaError");
        assert_eq!(category, Category::Custom("QuotaError".to_string()));
        assert!(!category.is_well_known());
        assert_eq!(category.as_str(), "QuotaError");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&Category::IllegalParam).unwrap();
        assert_eq!(json, "\"IllegalParamError\"");

        let parsed: Category = serde_json::from_str("\"NotFoundError\"").unwrap();
        assert!(parsed.is_not_found());
    }
}
