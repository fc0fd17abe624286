//! Form model contract and error container.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::validation::Rule;

/// Rules declared by a model, as `(attribute, rules)` pairs.
///
/// The same attribute may appear more than once; normalization merges the
/// lists in declaration order.
pub type RuleList = Vec<(String, Vec<Arc<dyn Rule>>)>;

/// A data object that form fields can bind to.
///
/// Models are usually implemented with `#[derive(FormModel)]` from
/// `oxide-fields-derive`, but hand-written implementations only need
/// [`form_name`](FormModel::form_name), [`attribute_names`](FormModel::attribute_names),
/// [`attribute_value`](FormModel::attribute_value) and
/// [`form_errors`](FormModel::form_errors).
pub trait FormModel: Send + Sync {
    /// Returns the name used to prefix input names (`LoginForm[login]`).
    ///
    /// An empty name leaves input names unprefixed.
    fn form_name(&self) -> &str;

    /// Returns the model type name used in error messages.
    fn model_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Returns the names of all attributes, nested models included.
    fn attribute_names(&self) -> Vec<String>;

    /// Returns the current value of an attribute, or `None` if the model has
    /// no such value attribute.
    fn attribute_value(&self, name: &str) -> Option<Value>;

    /// Reads an attribute value, keeping the reason a value could not be
    /// converted to JSON.
    ///
    /// The resolver reads through this method, so a conversion failure is
    /// reported as such instead of as a missing attribute. Defaults to
    /// [`attribute_value`](FormModel::attribute_value).
    fn read_attribute(&self, name: &str) -> Result<Option<Value>, String> {
        Ok(self.attribute_value(name))
    }

    /// Returns the sub-model held by a nested attribute.
    fn nested_model(&self, _name: &str) -> Option<&dyn FormModel> {
        None
    }

    /// Returns the declared label of an attribute.
    fn attribute_label(&self, _name: &str) -> Option<String> {
        None
    }

    /// Returns the declared hint of an attribute.
    fn attribute_hint(&self, _name: &str) -> Option<String> {
        None
    }

    /// Returns the declared placeholder of an attribute.
    fn attribute_placeholder(&self, _name: &str) -> Option<String> {
        None
    }

    /// Returns the validation rules of the model.
    fn rules(&self) -> RuleList {
        Vec::new()
    }

    /// Returns the error container.
    fn form_errors(&self) -> &FormErrors;

    /// Returns the error container for writing validation results.
    fn form_errors_mut(&mut self) -> &mut FormErrors;

    /// Returns whether the model declares a plain attribute `name`.
    fn has_own_attribute(&self, name: &str) -> bool {
        self.attribute_names().iter().any(|attribute| attribute == name)
    }
}

/// Validation errors recorded against a model, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<String, Vec<String>>,
    validated: bool,
}

impl FormErrors {
    /// Creates a new empty, unvalidated container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error for an attribute.
    pub fn add(&mut self, attribute: &str, message: impl Into<String>) {
        self.errors
            .entry(attribute.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns the first error of an attribute.
    pub fn first_error(&self, attribute: &str) -> Option<&str> {
        self.errors
            .get(attribute)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Returns all errors of an attribute.
    pub fn errors_for(&self, attribute: &str) -> &[String] {
        self.errors.get(attribute).map_or(&[], Vec::as_slice)
    }

    /// Returns whether an attribute has errors.
    pub fn has_errors(&self, attribute: &str) -> bool {
        self.errors.get(attribute).is_some_and(|m| !m.is_empty())
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of attributes with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the first error of every attribute, ordered by attribute.
    pub fn first_errors(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .filter_map(|(attribute, messages)| {
                messages
                    .first()
                    .map(|msg| (attribute.as_str(), msg.as_str()))
            })
            .collect()
    }

    /// Returns all errors as a flat list.
    pub fn all_errors(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .flat_map(|(attribute, messages)| {
                messages
                    .iter()
                    .map(move |msg| (attribute.as_str(), msg.as_str()))
            })
            .collect()
    }

    /// Removes every error and returns the container to the untouched state.
    pub fn clear(&mut self) {
        self.errors.clear();
        self.validated = false;
    }

    /// Marks the model as validated.
    pub fn mark_validated(&mut self) {
        self.validated = true;
    }

    /// Returns whether validation has run.
    ///
    /// An unvalidated model is neither valid nor invalid, so fields skip
    /// validation classes for it.
    pub fn is_validated(&self) -> bool {
        self.validated
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (attribute, messages) in &self.errors {
            for message in messages {
                writeln!(f, "{attribute}: {message}")?;
            }
        }
        Ok(())
    }
}

/// Generates a label from an attribute name.
///
/// `rememberMe` becomes `Remember Me`, `first_name` becomes `First Name`
/// and `testme` becomes `Testme`.
pub fn generate_label(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for c in name.chars() {
        if c == '_' || c == '-' || c == '.' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        if c.is_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts a scalar value to its form representation.
///
/// Strings are returned as-is, numbers in their JSON form, and booleans as
/// `"1"`/`"0"`. Null, arrays and objects have no scalar representation.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
