//! Theme configuration.
//!
//! A [`FieldConfig`] is a set of default rendering options shared by every
//! field created through one factory. All keys are optional; unset keys fall
//! back to the built-in defaults below. Configurations deserialize from the
//! camelCase JSON layout used by theme files:
//!
//! ```
//! use oxide_fields::FieldConfig;
//!
//! let config: FieldConfig =
//!     serde_json::from_str(r#"{"containerClass": "mb-3", "inputClass": "form-control"}"#)
//!         .unwrap();
//! assert_eq!(config.container_class.as_deref(), Some("mb-3"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = "{label}\n{input}\n{hint}\n{error}";

/// Container tag used when none is configured.
pub const DEFAULT_CONTAINER_TAG: &str = "div";

/// Header of the error summary when none is configured.
pub const DEFAULT_ERROR_SUMMARY_HEADER: &str = "Please fix the following errors:";

/// Rendering options of a theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Tag wrapping each field, `div` by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_tag: Option<String>,
    /// Whether fields are wrapped in a container, `true` by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_container: Option<bool>,
    /// Extra attributes of the container tag.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub container_attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_class: Option<String>,
    /// Layout of the field parts, see [`DEFAULT_TEMPLATE`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_class: Option<String>,
    /// Container class added once the model validated without errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_class: Option<String>,
    /// Container class added when the attribute has errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_valid_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_invalid_class: Option<String>,
    /// Whether input attributes are derived from validation rules, `true`
    /// by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrich_from_rules: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_summary_header: Option<String>,
}

impl FieldConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a configuration where every key set in `overrides` replaces
    /// the key in `self`. Container attributes are merged key by key.
    #[must_use]
    pub fn merge(&self, overrides: &Self) -> Self {
        fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
            over.clone().or_else(|| base.clone())
        }

        let mut container_attributes = self.container_attributes.clone();
        container_attributes.extend(
            overrides
                .container_attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        Self {
            container_tag: pick(&self.container_tag, &overrides.container_tag),
            use_container: pick(&self.use_container, &overrides.use_container),
            container_attributes,
            container_class: pick(&self.container_class, &overrides.container_class),
            template: pick(&self.template, &overrides.template),
            label_class: pick(&self.label_class, &overrides.label_class),
            hint_class: pick(&self.hint_class, &overrides.hint_class),
            error_class: pick(&self.error_class, &overrides.error_class),
            input_class: pick(&self.input_class, &overrides.input_class),
            valid_class: pick(&self.valid_class, &overrides.valid_class),
            invalid_class: pick(&self.invalid_class, &overrides.invalid_class),
            input_valid_class: pick(&self.input_valid_class, &overrides.input_valid_class),
            input_invalid_class: pick(&self.input_invalid_class, &overrides.input_invalid_class),
            enrich_from_rules: pick(&self.enrich_from_rules, &overrides.enrich_from_rules),
            error_summary_header: pick(&self.error_summary_header, &overrides.error_summary_header),
        }
    }

    /// Bootstrap 5 theme.
    pub fn bootstrap5() -> Self {
        Self {
            container_class: Some("mb-3".into()),
            label_class: Some("form-label".into()),
            hint_class: Some("form-text".into()),
            error_class: Some("text-danger fst-italic".into()),
            input_class: Some("form-control".into()),
            valid_class: Some("is-valid".into()),
            invalid_class: Some("is-invalid".into()),
            ..Self::default()
        }
    }

    /// Bulma theme.
    pub fn bulma() -> Self {
        Self {
            container_class: Some("field".into()),
            template: Some("{label}<div class=\"control\">\n{input}</div>\n{hint}\n{error}".into()),
            label_class: Some("label".into()),
            hint_class: Some("help".into()),
            error_class: Some("has-text-danger is-italic".into()),
            input_class: Some("input".into()),
            valid_class: Some("has-background-success".into()),
            invalid_class: Some("has-background-danger".into()),
            ..Self::default()
        }
    }

    pub fn container_tag(&self) -> &str {
        self.container_tag.as_deref().unwrap_or(DEFAULT_CONTAINER_TAG)
    }

    pub fn uses_container(&self) -> bool {
        self.use_container.unwrap_or(true)
    }

    pub fn template(&self) -> &str {
        self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE)
    }

    pub fn enriches_from_rules(&self) -> bool {
        self.enrich_from_rules.unwrap_or(true)
    }

    pub fn error_summary_header(&self) -> &str {
        self.error_summary_header
            .as_deref()
            .unwrap_or(DEFAULT_ERROR_SUMMARY_HEADER)
    }
}
