//! The field value type and its option setters.
//!
//! Setters never touch the receiver: each one returns a modified copy, so a
//! configured field can serve as the base of several variants.
//!
//! ```
//! use oxide_fields::{FieldFactory, AttrValue};
//!
//! let button = FieldFactory::default().submit_button(Some("Save"));
//! let disabled = button.disabled(true);
//! assert!(button.input_attributes().get("disabled").is_none());
//! assert_eq!(disabled.input_attributes().get("disabled"), Some(&AttrValue::Bool(true)));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::FieldConfig;
use crate::error::{FieldError, Result};
use crate::factory::FieldKind;
use crate::html::{AttrValue, HtmlAttributes, MarkupRenderer};
use crate::model::FormModel;
use crate::path::AttributePath;

use super::binding::AttributeBinding;
use super::widget::InputWidget;

/// A renderable form control bound (or not) to a model attribute.
#[derive(Clone)]
pub struct FormField<'a> {
    pub(super) kind: FieldKind,
    pub(super) config: FieldConfig,
    pub(super) renderer: Arc<dyn MarkupRenderer>,
    pub(super) binding: Option<AttributeBinding<'a>>,
    pub(super) input_attributes: HtmlAttributes,
    pub(super) container_attributes: HtmlAttributes,
    pub(super) label: Option<String>,
    pub(super) show_label: bool,
    pub(super) hint: Option<String>,
    pub(super) content: Option<String>,
    pub(super) legend: Option<String>,
    pub(super) items: Vec<(String, String)>,
    pub(super) prompt: Option<String>,
    pub(super) unchecked_value: Option<String>,
    pub(super) only_attributes: Option<Vec<String>>,
    pub(super) buttons: Vec<FormField<'static>>,
    pub(super) widget: Option<Arc<dyn InputWidget>>,
}

impl<'a> FormField<'a> {
    pub(crate) fn new(
        kind: FieldKind,
        config: FieldConfig,
        renderer: Arc<dyn MarkupRenderer>,
        binding: Option<AttributeBinding<'a>>,
    ) -> Self {
        Self {
            kind,
            config,
            renderer,
            binding,
            input_attributes: HtmlAttributes::new(),
            container_attributes: HtmlAttributes::new(),
            label: None,
            show_label: true,
            hint: None,
            content: None,
            legend: None,
            items: Vec::new(),
            prompt: None,
            unchecked_value: Some("0".to_string()),
            only_attributes: None,
            buttons: Vec::new(),
            widget: None,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the effective configuration (factory defaults plus options).
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Returns the attributes set by the caller on the input element.
    ///
    /// Attributes derived at render time (id, enrichment, theme classes) are
    /// not included.
    pub fn input_attributes(&self) -> &HtmlAttributes {
        &self.input_attributes
    }

    pub fn container_attributes(&self) -> &HtmlAttributes {
        &self.container_attributes
    }

    /// Returns the model binding.
    pub fn binding(&self) -> Result<&AttributeBinding<'a>> {
        self.binding.as_ref().ok_or(FieldError::NoFormModelBound)
    }

    /// Resolves the current value of the bound attribute.
    pub fn value(&self) -> Result<Value> {
        self.binding()?.value()
    }

    /// Returns a copy bound to `attribute` of `model`, with an empty rule
    /// cache.
    pub fn bind<'b>(&self, model: &'b dyn FormModel, attribute: &str) -> Result<FormField<'b>> {
        let binding = AttributeBinding::new(model, AttributePath::parse(attribute)?);
        Ok(FormField {
            kind: self.kind,
            config: self.config.clone(),
            renderer: Arc::clone(&self.renderer),
            binding: Some(binding),
            input_attributes: self.input_attributes.clone(),
            container_attributes: self.container_attributes.clone(),
            label: self.label.clone(),
            show_label: self.show_label,
            hint: self.hint.clone(),
            content: self.content.clone(),
            legend: self.legend.clone(),
            items: self.items.clone(),
            prompt: self.prompt.clone(),
            unchecked_value: self.unchecked_value.clone(),
            only_attributes: self.only_attributes.clone(),
            buttons: self.buttons.clone(),
            widget: self.widget.clone(),
        })
    }

    fn with(&self, change: impl FnOnce(&mut Self)) -> Self {
        let mut new = self.clone();
        change(&mut new);
        new
    }

    /// Applies `options` over the current configuration, as
    /// [`FieldFactory::create`](crate::FieldFactory::create) does with its
    /// options argument.
    #[must_use]
    pub fn options(&self, options: &FieldConfig) -> Self {
        self.with(|f| f.config = f.config.merge(options))
    }

    /// Sets one attribute of the input element; a null value unsets it.
    #[must_use]
    pub fn input_attribute(&self, name: &str, value: impl Into<AttrValue>) -> Self {
        let value = value.into();
        self.with(|f| f.input_attributes.set(name, value))
    }

    /// Replaces all caller-set input attributes.
    #[must_use]
    pub fn input_attributes_map(&self, attributes: HtmlAttributes) -> Self {
        self.with(|f| f.input_attributes = attributes)
    }

    #[must_use]
    pub fn required(&self, value: bool) -> Self {
        self.input_attribute("required", value)
    }

    #[must_use]
    pub fn readonly(&self, value: bool) -> Self {
        self.input_attribute("readonly", value)
    }

    #[must_use]
    pub fn disabled(&self, value: bool) -> Self {
        self.input_attribute("disabled", value)
    }

    /// Focuses the control on page load.
    #[must_use]
    pub fn autofocus(&self, value: bool) -> Self {
        self.input_attribute("autofocus", value)
    }

    #[must_use]
    pub fn tab_index(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("tabindex", value)
    }

    #[must_use]
    pub fn min(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("min", value)
    }

    #[must_use]
    pub fn max(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("max", value)
    }

    #[must_use]
    pub fn min_length(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("minlength", value)
    }

    #[must_use]
    pub fn max_length(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("maxlength", value)
    }

    #[must_use]
    pub fn pattern(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("pattern", value)
    }

    #[must_use]
    pub fn aria_label(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("aria-label", value)
    }

    #[must_use]
    pub fn aria_described_by(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("aria-describedby", value)
    }

    /// Overrides the placeholder declared by the model.
    #[must_use]
    pub fn placeholder(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("placeholder", value)
    }

    /// Overrides the generated input id.
    #[must_use]
    pub fn input_id(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("id", value)
    }

    /// Adds CSS classes to the input element.
    #[must_use]
    pub fn input_class(&self, classes: &str) -> Self {
        self.with(|f| f.input_attributes.add_class(classes))
    }

    /// Adds CSS classes to the container.
    #[must_use]
    pub fn container_class(&self, classes: &str) -> Self {
        self.with(|f| f.container_attributes.add_class(classes))
    }

    #[must_use]
    pub fn container_attribute(&self, name: &str, value: impl Into<AttrValue>) -> Self {
        let value = value.into();
        self.with(|f| f.container_attributes.set(name, value))
    }

    #[must_use]
    pub fn container_tag(&self, tag: &str) -> Self {
        self.with(|f| f.config.container_tag = Some(tag.to_string()))
    }

    #[must_use]
    pub fn use_container(&self, value: bool) -> Self {
        self.with(|f| f.config.use_container = Some(value))
    }

    /// Sets the layout of the field parts, e.g. `"{input}\n{label}"`.
    #[must_use]
    pub fn template(&self, template: &str) -> Self {
        self.with(|f| f.config.template = Some(template.to_string()))
    }

    #[must_use]
    pub fn enrich_from_rules(&self, value: bool) -> Self {
        self.with(|f| f.config.enrich_from_rules = Some(value))
    }

    /// Overrides the label resolved from the model.
    #[must_use]
    pub fn label(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.with(|f| f.label = Some(text))
    }

    #[must_use]
    pub fn hide_label(&self) -> Self {
        self.with(|f| f.show_label = false)
    }

    /// Overrides the hint resolved from the model. An empty hint hides it.
    #[must_use]
    pub fn hint(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.with(|f| f.hint = Some(text))
    }

    /// Sets the text of a button, or the inner markup of a fieldset.
    #[must_use]
    pub fn content(&self, content: impl Into<String>) -> Self {
        let content = content.into();
        self.with(|f| f.content = Some(content))
    }

    #[must_use]
    pub fn legend(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.with(|f| f.legend = Some(text))
    }

    #[must_use]
    pub fn src(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("src", value)
    }

    #[must_use]
    pub fn alt(&self, value: impl Into<AttrValue>) -> Self {
        self.input_attribute("alt", value)
    }

    /// Sets the options of a select, or the choices of a checkbox or radio
    /// list, as `(value, label)` pairs.
    #[must_use]
    pub fn items<I, V, L>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let items: Vec<(String, String)> = items
            .into_iter()
            .map(|(value, label)| (value.into(), label.into()))
            .collect();
        self.with(|f| f.items = items)
    }

    /// Sets an empty-valued first option of a select.
    #[must_use]
    pub fn prompt(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.with(|f| f.prompt = Some(text))
    }

    /// Sets the value sent for an unchecked checkbox; `None` drops the
    /// hidden input carrying it.
    #[must_use]
    pub fn unchecked_value(&self, value: Option<&str>) -> Self {
        let value = value.map(str::to_string);
        self.with(|f| f.unchecked_value = value)
    }

    /// Sets the buttons of a button group, rendered in order.
    #[must_use]
    pub fn buttons<I>(&self, buttons: I) -> Self
    where
        I: IntoIterator<Item = FormField<'static>>,
    {
        let buttons: Vec<FormField<'static>> = buttons.into_iter().collect();
        self.with(|f| f.buttons = buttons)
    }

    /// Sets the widget rendering the input of a custom field.
    #[must_use]
    pub fn widget<W>(&self, widget: W) -> Self
    where
        W: InputWidget + 'static,
    {
        let widget: Arc<dyn InputWidget> = Arc::new(widget);
        self.with(|f| f.widget = Some(widget))
    }

    /// Limits the error summary to the given attributes.
    #[must_use]
    pub fn only_attributes<I, S>(&self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        self.with(|f| f.only_attributes = Some(attributes))
    }
}

impl fmt::Debug for FormField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormField")
            .field("kind", &self.kind)
            .field("binding", &self.binding)
            .field("input_attributes", &self.input_attributes)
            .field("container_attributes", &self.container_attributes)
            .field("has_widget", &self.widget.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::FieldConfig;
    use crate::factory::FieldFactory;
    use crate::html::AttrValue;

    #[test]
    fn test_setters_do_not_mutate_receiver() {
        let base = FieldFactory::default().button(Some("Go"));
        let required = base.required(true);
        assert!(base.input_attributes().is_empty());
        assert_eq!(required.input_attributes().get("required"), Some(&AttrValue::Bool(true)));
    }

    #[test]
    fn test_last_write_wins() {
        let field = FieldFactory::default()
            .button(None)
            .tab_index(1_i64)
            .tab_index(3_i64);
        assert_eq!(field.input_attributes().get("tabindex"), Some(&AttrValue::Int(3)));
        assert_eq!(field.input_attributes().len(), 1);
    }

    #[test]
    fn test_null_clears_attribute() {
        let field = FieldFactory::default()
            .button(None)
            .aria_label("Close")
            .aria_label(None::<&str>);
        assert!(field.input_attributes().get("aria-label").is_none());
    }

    #[test]
    fn test_options_merge_over_factory_config() {
        let factory = FieldFactory::new(FieldConfig {
            container_class: Some("field".into()),
            input_class: Some("input".into()),
            ..FieldConfig::default()
        });
        let base = factory.button(None);
        let large = base.options(&FieldConfig {
            input_class: Some("input is-large".into()),
            ..FieldConfig::default()
        });
        assert_eq!(base.config().input_class.as_deref(), Some("input"));
        assert_eq!(large.config().input_class.as_deref(), Some("input is-large"));
        assert_eq!(large.config().container_class.as_deref(), Some("field"));
    }

    #[test]
    fn test_unbound_field_has_no_value() {
        let field = FieldFactory::default().fieldset();
        assert_eq!(field.value(), Err(crate::FieldError::NoFormModelBound));
    }
}
