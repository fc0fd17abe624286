//! Binding of a field to a model attribute.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{FieldError, Result};
use crate::model::FormModel;
use crate::path::AttributePath;
use crate::resolver::AttributeResolver;
use crate::rule_cache::ValidationRuleCache;
use crate::validation::Rule;

/// Validation outcome of one attribute, as far as styling is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    /// The model has not been validated yet.
    Untouched,
    Valid,
    Invalid,
}

/// A model reference plus the attribute a field displays.
///
/// Each binding owns its own [`ValidationRuleCache`]; binding a field to a
/// model creates a fresh one.
#[derive(Clone)]
pub struct AttributeBinding<'a> {
    model: &'a dyn FormModel,
    path: Option<AttributePath>,
    rules: ValidationRuleCache,
}

impl<'a> AttributeBinding<'a> {
    /// Binds `model` and the attribute at `path`.
    pub fn new(model: &'a dyn FormModel, path: AttributePath) -> Self {
        Self {
            model,
            path: Some(path),
            rules: ValidationRuleCache::new(),
        }
    }

    /// Binds a model without an attribute, as the error summary does.
    pub fn model_only(model: &'a dyn FormModel) -> Self {
        Self {
            model,
            path: None,
            rules: ValidationRuleCache::new(),
        }
    }

    pub fn model(&self) -> &'a dyn FormModel {
        self.model
    }

    /// Returns the bound attribute path.
    pub fn path(&self) -> Result<&AttributePath> {
        self.path.as_ref().ok_or(FieldError::NoFormModelBound)
    }

    pub fn value(&self) -> Result<Value> {
        AttributeResolver::value_at(self.model, self.path()?)
    }

    pub fn label(&self) -> Result<String> {
        AttributeResolver::label(self.model, self.path()?)
    }

    pub fn hint(&self) -> Result<String> {
        AttributeResolver::hint(self.model, self.path()?)
    }

    pub fn placeholder(&self) -> Result<Option<String>> {
        AttributeResolver::placeholder(self.model, self.path()?)
    }

    pub fn input_name(&self) -> Result<String> {
        Ok(AttributeResolver::input_name(self.model, self.path()?))
    }

    pub fn input_id(&self) -> Result<String> {
        Ok(AttributeResolver::input_id(self.model, self.path()?))
    }

    pub fn first_error(&self) -> Result<Option<String>> {
        Ok(AttributeResolver::first_error(self.model, self.path()?))
    }

    /// Returns the rules declared for the bound attribute.
    ///
    /// Rules keyed by the full path (`letters[0]`) win over those of the
    /// attribute (`letters`). The model's rules are normalized on first call
    /// and reused after.
    pub fn rules(&self) -> Result<&[Arc<dyn Rule>]> {
        let path = self.path()?;
        let exact = self.rules.rules_for(self.model, path.as_str());
        if !exact.is_empty() {
            return Ok(exact);
        }
        Ok(self.rules.rules_for(self.model, &path.attribute_name()))
    }

    /// Returns whether the model's rules have been normalized for this
    /// binding.
    pub fn rules_loaded(&self) -> bool {
        self.rules.is_primed()
    }

    pub fn validation_state(&self) -> Result<ValidationState> {
        let errors = self.model.form_errors();
        if !errors.is_validated() {
            return Ok(ValidationState::Untouched);
        }
        if AttributeResolver::has_errors(self.model, self.path()?) {
            Ok(ValidationState::Invalid)
        } else {
            Ok(ValidationState::Valid)
        }
    }
}

impl fmt::Debug for AttributeBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeBinding")
            .field("model", &self.model.model_name())
            .field("path", &self.path)
            .field("rules", &self.rules)
            .finish()
    }
}
