//! Error types for field construction and rendering.

use thiserror::Error;

use crate::factory::FieldKind;

/// Field-specific errors.
///
/// Every variant is a usage error: the call site is expected to be fixed
/// rather than the error handled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A path segment or index does not exist on the model.
    #[error("Undefined property: \"{model}::{path}\".")]
    AttributeNotFound { model: String, path: String },

    /// The attribute exists but its value cannot be converted to JSON.
    #[error("Cannot read \"{model}::{path}\": {message}")]
    UnreadableAttribute {
        model: String,
        path: String,
        message: String,
    },

    /// An intermediate dotted segment does not hold a nested model.
    #[error("Attribute \"{model}::{segment}\" is not a nested attribute.")]
    NotNestedAttribute { model: String, segment: String },

    /// The attribute path is syntactically malformed.
    #[error("Invalid attribute path: \"{0}\".")]
    InvalidPath(String),

    /// The requested configuration was never registered.
    #[error("Configuration with name \"{0}\" not found.")]
    UnknownConfiguration(String),

    /// A configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The requested field kind does not exist.
    #[error("Unknown field kind \"{0}\".")]
    UnknownFieldKind(String),

    /// A model-bound kind was requested without its model or attribute.
    #[error("{kind} field requires a form model and attribute.")]
    MissingBinding { kind: FieldKind },

    /// The attribute value cannot be rendered by this kind of field.
    #[error("{kind} field requires {expected} value.")]
    InvalidValueType {
        kind: FieldKind,
        expected: &'static str,
    },

    /// A custom field was rendered without an input widget.
    #[error("Custom field requires an input widget.")]
    MissingWidget,

    /// The field has no model bound.
    #[error("Form model is not set.")]
    NoFormModelBound,
}

/// Result type alias for field operations.
pub type Result<T> = std::result::Result<T, FieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = FieldError::AttributeNotFound {
            model: "NestedForm".into(),
            path: "letters[1]".into(),
        };
        assert_eq!(
            err.to_string(),
            "Undefined property: \"NestedForm::letters[1]\"."
        );

        let err = FieldError::UnreadableAttribute {
            model: "Grid".into(),
            path: "cells".into(),
            message: "key must be a string".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot read \"Grid::cells\": key must be a string"
        );

        let err = FieldError::UnknownConfiguration("theme-x".into());
        assert_eq!(
            err.to_string(),
            "Configuration with name \"theme-x\" not found."
        );

        let err = FieldError::InvalidValueType {
            kind: FieldKind::Date,
            expected: "a string or null",
        };
        assert_eq!(
            err.to_string(),
            "Date field requires a string or null value."
        );
    }
}
