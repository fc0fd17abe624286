//! Validation rules and model validation.
//!
//! Rules serve two purposes: [`validate_model`] runs them against a model to
//! fill its [`FormErrors`](crate::FormErrors), and fields read their
//! [`RuleKind`] to enrich input attributes (`required`, `maxlength`,
//! `pattern`, ...).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::model::{FormErrors, FormModel};
use crate::resolver::AttributeResolver;

/// Conditional predicate deciding whether a rule applies to a model.
pub type When = Arc<dyn Fn(&dyn FormModel) -> bool + Send + Sync>;

/// Describes what a rule checks, independent of its messages.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// The value must not be empty.
    Required,
    /// The string length must be within bounds.
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// The value must be an email address.
    Email,
    /// The value must be an http(s) URL.
    Url,
    /// The value must match a regular expression.
    Pattern { pattern: String },
    /// The value must be a number within bounds.
    Number { min: Option<f64>, max: Option<f64> },
}

/// A validation rule attached to a model attribute.
pub trait Rule: Send + Sync {
    /// Returns what the rule checks.
    fn kind(&self) -> RuleKind;

    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &Value) -> std::result::Result<(), String>;

    /// Returns the error message for this rule.
    fn message(&self) -> &str;

    /// Returns the conditional predicate, if any.
    fn condition(&self) -> Option<&When> {
        None
    }

    /// Returns whether the rule applies to `model`.
    fn applies_to(&self, model: &dyn FormModel) -> bool {
        self.condition().map_or(true, |when| when(model))
    }
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind())
            .field("message", &self.message())
            .field("conditional", &self.condition().is_some())
            .finish()
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

macro_rules! conditional {
    () => {
        /// Applies the rule only when `predicate` holds for the model.
        #[must_use]
        pub fn when(
            mut self,
            predicate: impl Fn(&dyn FormModel) -> bool + Send + Sync + 'static,
        ) -> Self {
            self.when = Some(Arc::new(predicate));
            self
        }

        /// Replaces the error message.
        #[must_use]
        pub fn with_message(mut self, message: impl Into<String>) -> Self {
            self.message = message.into();
            self
        }
    };
}

/// Rule that requires a non-empty value.
#[derive(Clone)]
pub struct Required {
    message: String,
    when: Option<When>,
}

impl Required {
    /// Creates a new `Required` rule with the default message.
    pub fn new() -> Self {
        Self {
            message: "Value cannot be blank.".to_string(),
            when: None,
        }
    }

    conditional!();
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Required {
    fn kind(&self) -> RuleKind {
        RuleKind::Required
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        if is_empty_value(value) {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn condition(&self) -> Option<&When> {
        self.when.as_ref()
    }
}

/// Rule that bounds the length of a string, in characters.
#[derive(Clone)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
    message: String,
    when: Option<When>,
}

impl Length {
    /// Creates a new `Length` rule with optional bounds.
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        let message = match (min, max) {
            (Some(min), Some(max)) => {
                format!("This value must contain between {min} and {max} characters.")
            }
            (Some(min), None) => format!("This value must contain at least {min} characters."),
            (None, Some(max)) => format!("This value must contain at most {max} characters."),
            (None, None) => "This value has an invalid length.".to_string(),
        };
        Self {
            min,
            max,
            message,
            when: None,
        }
    }

    /// Creates a rule with only a maximum length.
    pub fn max(max: usize) -> Self {
        Self::new(None, Some(max))
    }

    /// Creates a rule with only a minimum length.
    pub fn min(min: usize) -> Self {
        Self::new(Some(min), None)
    }

    conditional!();
}

impl Rule for Length {
    fn kind(&self) -> RuleKind {
        RuleKind::Length {
            min: self.min,
            max: self.max,
        }
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        let Some(text) = as_text(value) else {
            return Err("This value must be a string.".to_string());
        };
        let length = text.chars().count();
        if self.min.is_some_and(|min| length < min) || self.max.is_some_and(|max| length > max) {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn condition(&self) -> Option<&When> {
        self.when.as_ref()
    }
}

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .unwrap_or_else(|e| panic!("email pattern is valid: {e}"))
});

/// Rule for email addresses.
#[derive(Clone)]
pub struct Email {
    message: String,
    when: Option<When>,
}

impl Email {
    /// Creates a new `Email` rule with the default message.
    pub fn new() -> Self {
        Self {
            message: "This value is not a valid email address.".to_string(),
            when: None,
        }
    }

    conditional!();
}

impl Default for Email {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Email {
    fn kind(&self) -> RuleKind {
        RuleKind::Email
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::String(s) if EMAIL_REGEX.is_match(s) => Ok(()),
            _ => Err(self.message.clone()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn condition(&self) -> Option<&When> {
        self.when.as_ref()
    }
}

/// Rule for URL values.
#[derive(Clone)]
pub struct Url {
    message: String,
    when: Option<When>,
}

impl Url {
    /// Creates a new `Url` rule with the default message.
    pub fn new() -> Self {
        Self {
            message: "This value is not a valid URL.".to_string(),
            when: None,
        }
    }

    conditional!();
}

impl Default for Url {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Url {
    fn kind(&self) -> RuleKind {
        RuleKind::Url
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::String(s) if s.starts_with("http://") || s.starts_with("https://") => Ok(()),
            _ => Err(self.message.clone()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn condition(&self) -> Option<&When> {
        self.when.as_ref()
    }
}

/// Rule using a custom regex pattern.
#[derive(Clone)]
pub struct Pattern {
    pattern: Regex,
    message: String,
    when: Option<When>,
}

impl Pattern {
    /// Creates a new `Pattern` rule.
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: "Value is invalid.".to_string(),
            when: None,
        })
    }

    conditional!();
}

impl Rule for Pattern {
    fn kind(&self) -> RuleKind {
        RuleKind::Pattern {
            pattern: self.pattern.as_str().to_string(),
        }
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match as_text(value) {
            Some(text) if self.pattern.is_match(&text) => Ok(()),
            _ => Err(self.message.clone()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn condition(&self) -> Option<&When> {
        self.when.as_ref()
    }
}

/// Rule for numeric values within a range.
#[derive(Clone)]
pub struct Number {
    min: Option<f64>,
    max: Option<f64>,
    message: String,
    when: Option<When>,
}

impl Number {
    /// Creates a new `Number` rule with optional bounds.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        let message = match (min, max) {
            (Some(min), Some(max)) => format!("Value must be between {min} and {max}."),
            (Some(min), None) => format!("Value must be no less than {min}."),
            (None, Some(max)) => format!("Value must be no greater than {max}."),
            (None, None) => "Value must be a number.".to_string(),
        };
        Self {
            min,
            max,
            message,
            when: None,
        }
    }

    conditional!();
}

impl Rule for Number {
    fn kind(&self) -> RuleKind {
        RuleKind::Number {
            min: self.min,
            max: self.max,
        }
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        let num = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| "Value must be a number.".to_string())?;

        if self.min.is_some_and(|min| num < min) || self.max.is_some_and(|max| num > max) {
            return Err(self.message.clone());
        }

        Ok(())
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn condition(&self) -> Option<&When> {
        self.when.as_ref()
    }
}

/// Rules of one model, normalized into a map keyed by attribute name.
#[derive(Clone, Default)]
pub struct RuleMap {
    rules: HashMap<String, Vec<Arc<dyn Rule>>>,
}

impl RuleMap {
    /// Collects the rules declared by `model`, merging repeated attributes
    /// in declaration order.
    pub fn normalize(model: &dyn FormModel) -> Self {
        let mut rules: HashMap<String, Vec<Arc<dyn Rule>>> = HashMap::new();
        for (attribute, list) in model.rules() {
            rules.entry(attribute).or_default().extend(list);
        }
        debug!(
            model = model.model_name(),
            attributes = rules.len(),
            "normalized validation rules"
        );
        Self { rules }
    }

    /// Returns the rules of an attribute, empty if none were declared.
    pub fn get(&self, attribute: &str) -> &[Arc<dyn Rule>] {
        self.rules.get(attribute).map_or(&[], Vec::as_slice)
    }

    /// Returns the attributes that carry rules, sorted.
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns whether no rules were declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.rules.iter()).finish()
    }
}

/// Validates `model` against its rules and stores the outcome in its
/// error container.
///
/// Rules whose predicate does not hold are skipped, and rules other than
/// [`Required`] skip empty values. Returns whether the model is valid.
pub fn validate_model<M: FormModel>(model: &mut M) -> Result<bool> {
    let view: &dyn FormModel = model;
    let rules = RuleMap::normalize(view);
    let mut errors = FormErrors::new();

    for attribute in rules.attributes() {
        let value = AttributeResolver::value(view, attribute)?;
        for rule in rules.get(attribute) {
            if !rule.applies_to(view) {
                continue;
            }
            if rule.kind() != RuleKind::Required && is_empty_value(&value) {
                continue;
            }
            if let Err(message) = rule.validate(&value) {
                errors.add(attribute, message);
            }
        }
    }

    errors.mark_validated();
    let valid = errors.is_empty();
    debug!(
        model = view.model_name(),
        invalid_attributes = errors.len(),
        "validated form model"
    );
    *model.form_errors_mut() = errors;
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required() {
        let rule = Required::new();
        assert!(rule.validate(&json!("hello")).is_ok());
        assert!(rule.validate(&json!(0)).is_ok());
        assert!(rule.validate(&json!("")).is_err());
        assert!(rule.validate(&json!("   ")).is_err());
        assert!(rule.validate(&Value::Null).is_err());
        assert!(rule.validate(&json!([])).is_err());
        assert_eq!(rule.kind(), RuleKind::Required);
        assert!(rule.condition().is_none());
    }

    #[test]
    fn test_length() {
        let rule = Length::new(Some(2), Some(5));
        assert!(rule.validate(&json!("hello")).is_ok());
        assert!(rule.validate(&json!("h")).is_err());
        assert!(rule.validate(&json!("hello world")).is_err());
        assert!(rule.validate(&json!("héllo")).is_ok());
        assert_eq!(
            Length::max(3).kind(),
            RuleKind::Length {
                min: None,
                max: Some(3)
            }
        );
    }

    #[test]
    fn test_email() {
        let rule = Email::new();
        assert!(rule.validate(&json!("user@example.com")).is_ok());
        assert!(rule.validate(&json!("user.name@domain.co.uk")).is_ok());
        assert!(rule.validate(&json!("invalid")).is_err());
        assert!(rule.validate(&json!("@example.com")).is_err());
    }

    #[test]
    fn test_url() {
        let rule = Url::new();
        assert!(rule.validate(&json!("https://example.com")).is_ok());
        assert!(rule.validate(&json!("http://example.com/path")).is_ok());
        assert!(rule.validate(&json!("example.com")).is_err());
    }

    #[test]
    fn test_pattern() {
        let rule = Pattern::new(r"^\d{4}-\d{2}-\d{2}$")
            .unwrap()
            .with_message("Enter a valid date.");
        assert!(rule.validate(&json!("2024-01-15")).is_ok());
        assert_eq!(
            rule.validate(&json!("not a date")),
            Err("Enter a valid date.".to_string())
        );
        assert!(Pattern::new("(").is_err());
    }

    #[test]
    fn test_number() {
        let rule = Number::new(Some(0.0), Some(100.0));
        assert!(rule.validate(&json!(50)).is_ok());
        assert!(rule.validate(&json!("0")).is_ok());
        assert!(rule.validate(&json!(100.0)).is_ok());
        assert!(rule.validate(&json!(-1)).is_err());
        assert!(rule.validate(&json!("101")).is_err());
        assert!(rule.validate(&json!("abc")).is_err());
    }

    #[test]
    fn test_conditional_rule_reports_predicate() {
        let rule = Required::new().when(|_| false);
        assert!(rule.condition().is_some());
    }
}
