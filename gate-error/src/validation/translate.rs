//! Translators rendering field failures as human-readable messages

use super::FieldFailure;
use std::collections::HashMap;

/// Renders field failures for one locale
pub trait Translator: Send + Sync {
    fn locale(&self) -> &str;

    fn translate(&self, failure: &FieldFailure) -> String;
}

/// Selects a translator by locale
pub trait TranslatorProvider {
    fn translator(&self, locale: &str) -> Option<&dyn Translator>;
}

/// Message used when no translator is available
pub(crate) fn raw_message(failure: &FieldFailure) -> String {
    format!(
        "field validation for '{}' failed on the '{}' rule",
        failure.field(),
        failure.rule()
    )
}

/// Default English messages for the common validation rules
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn locale(&self) -> &str {
        "en"
    }

    fn translate(&self, failure: &FieldFailure) -> String {
        if let Some(message) = failure.message() {
            return message.to_string();
        }

        let field = failure.field();
        let min = failure.param("min");
        let max = failure.param("max");

        match failure.rule() {
            "required" => format!("{} is a required field", field),
            "email" => format!("{} must be a valid email address", field),
            "url" => format!("{} must be a valid URL", field),
            "ip" => format!("{} must be a valid IP address", field),
            "credit_card" => format!("{} must be a valid credit card number", field),
            "non_control_character" => format!("{} cannot contain control characters", field),
            "regex" => format!("{} does not match the expected format", field),
            "must_match" => match failure.param("other") {
                Some(other) => format!("{} must be equal to {}", field, other),
                None => format!("{} must match", field),
            },
            "contains" => match failure.param("needle") {
                Some(needle) => format!("{} must contain the text '{}'", field, needle),
                None => raw_message(failure),
            },
            "does_not_contain" => match failure.param("needle") {
                Some(needle) => format!("{} cannot contain the text '{}'", field, needle),
                None => raw_message(failure),
            },
            "length" => match (failure.param("equal"), min, max) {
                (Some(equal), _, _) => format!("{} must be {} characters in length", field, equal),
                (None, Some(min), Some(max)) => {
                    format!("{} must be between {} and {} characters in length", field, min, max)
                }
                (None, Some(min), None) => {
                    format!("{} must be at least {} characters in length", field, min)
                }
                (None, None, Some(max)) => {
                    format!("{} must be a maximum of {} characters in length", field, max)
                }
                (None, None, None) => raw_message(failure),
            },
            "range" => match (min, max) {
                (Some(min), Some(max)) => format!("{} must be between {} and {}", field, min, max),
                (Some(min), None) => format!("{} must be {} or greater", field, min),
                (None, Some(max)) => format!("{} must be {} or less", field, max),
                (None, None) => raw_message(failure),
            },
            "min" => match min {
                Some(min) => format!("{} must be {} or greater", field, min),
                None => raw_message(failure),
            },
            "max" => match max {
                Some(max) => format!("{} must be {} or less", field, max),
                None => raw_message(failure),
            },
            _ => raw_message(failure),
        }
    }
}

/// Translators registered by locale, with an optional fallback locale
#[derive(Default)]
pub struct Translations {
    translators: HashMap<String, Box<dyn Translator>>,
    fallback: Option<String>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// English only, also used as the fallback
    pub fn english() -> Self {
        Self::new().register(EnglishTranslator).with_fallback("en")
    }

    pub fn register(mut self, translator: impl Translator + 'static) -> Self {
        self.translators
            .insert(translator.locale().to_string(), Box::new(translator));
        self
    }

    /// Locale answered when the requested one is not registered
    pub fn with_fallback(mut self, locale: impl Into<String>) -> Self {
        self.fallback = Some(locale.into());
        self
    }

    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<_> = self.translators.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}

impl TranslatorProvider for Translations {
    fn translator(&self, locale: &str) -> Option<&dyn Translator> {
        self.translators
            .get(locale)
            .or_else(|| {
                self.fallback
                    .as_ref()
                    .and_then(|fallback| self.translators.get(fallback))
            })
            .map(|translator| translator.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Portuguese;

    impl Translator for Portuguese {
        fn locale(&self) -> &str {
            "pt_BR"
        }

        fn translate(&self, failure: &FieldFailure) -> String {
            format!("{} é obrigatório", failure.field())
        }
    }

    #[test]
    fn test_english_messages() {
        let en = EnglishTranslator;
        assert_eq!(
            en.translate(&FieldFailure::new("name", "required")),
            "name is a required field"
        );
        assert_eq!(
            en.translate(&FieldFailure::new("age", "min").with_param("min", "18")),
            "age must be 18 or greater"
        );
        assert_eq!(
            en.translate(&FieldFailure::new("user.email", "email")),
            "email must be a valid email address"
        );
        assert_eq!(
            en.translate(
                &FieldFailure::new("title", "length")
                    .with_param("min", "1")
                    .with_param("max", "64")
            ),
            "title must be between 1 and 64 characters in length"
        );
        assert_eq!(
            en.translate(&FieldFailure::new("replicas", "range").with_param("max", "10")),
            "replicas must be 10 or less"
        );
    }

    #[test]
    fn test_explicit_message_wins() {
        let failure = FieldFailure::new("sku", "length").with_message("sku must not be blank");
        assert_eq!(EnglishTranslator.translate(&failure), "sku must not be blank");
    }

    #[test]
    fn test_unknown_rule_falls_back_to_raw() {
        let failure = FieldFailure::new("spec.image", "semver");
        assert_eq!(
            EnglishTranslator.translate(&failure),
            "field validation for 'image' failed on the 'semver' rule"
        );
    }

    #[test]
    fn test_lookup_by_locale() {
        let translations = Translations::english().register(Portuguese);
        assert_eq!(translations.locales(), ["en", "pt_BR"]);

        let failure = FieldFailure::new("name", "required");
        let pt = translations.translator("pt_BR").unwrap();
        assert_eq!(pt.translate(&failure), "name é obrigatório");
    }

    #[test]
    fn test_missing_locale_uses_fallback() {
        let translations = Translations::english();
        assert_eq!(translations.translator("fr").unwrap().locale(), "en");

        let translations = Translations::new().register(Portuguese);
        assert!(translations.translator("fr").is_none());
    }
}
