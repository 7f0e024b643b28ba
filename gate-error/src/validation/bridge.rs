//! Turns a batch of field failures into one envelope

use super::translate::{raw_message, TranslatorProvider};
use super::FieldFailure;
use crate::{BridgeConfig, Error, ErrorEnvelope};
use std::collections::HashMap;
use validator::ValidationErrors;

/// Converts validation failures into an `Invalid Inputs` envelope.
///
/// The envelope's metadata maps every failing field path to its translated
/// message. Its category is left unset and its detail empty: a validation
/// batch has no single cause, the metadata is the detail.
pub struct ValidationBridge<'a> {
    provider: &'a dyn TranslatorProvider,
    config: BridgeConfig,
}

impl<'a> ValidationBridge<'a> {
    pub fn new(provider: &'a dyn TranslatorProvider) -> Self {
        Self {
            provider,
            config: BridgeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Build the envelope for a batch of failures.
    ///
    /// Translator lookup is best effort: without a translator for the
    /// configured locale, failures get a generic rule message.
    pub fn convert(&self, failures: impl IntoIterator<Item = FieldFailure>) -> Error {
        let translator = self.provider.translator(&self.config.locale);
        if translator.is_none() {
            tracing::debug!(
                locale = %self.config.locale,
                "no translator for locale, using raw rule messages"
            );
        }

        let meta: HashMap<String, String> = failures
            .into_iter()
            .map(|failure| {
                let message = match translator {
                    Some(translator) => translator.translate(&failure),
                    None => raw_message(&failure),
                };
                (failure.path, message)
            })
            .collect();

        Error::from(ErrorEnvelope::invalid_inputs(self.config.message.clone(), meta))
    }

    /// Build the envelope for a `validator` report
    pub fn convert_errors(&self, errors: &ValidationErrors) -> Error {
        self.convert(FieldFailure::from_errors(errors))
    }
}

/// Translate a batch of failures with the default configuration
pub fn from_validation_failures(
    failures: impl IntoIterator<Item = FieldFailure>,
    provider: &dyn TranslatorProvider,
) -> Error {
    ValidationBridge::new(provider).convert(failures)
}

/// Translate a `validator` report with the default configuration
pub fn new_validation_error(errors: &ValidationErrors, provider: &dyn TranslatorProvider) -> Error {
    ValidationBridge::new(provider).convert_errors(errors)
}
