//! Rendering of fields into markup.

use ironhtml::typed::Element;
use ironhtml_elements::{Div, Li, Ul, P};
use serde_json::Value;

use crate::error::{FieldError, Result};
use crate::factory::FieldKind;
use crate::html::{html_escape, AttrValue, HtmlAttributes, MarkupRenderer};
use crate::model::scalar_to_string;
use crate::validation::RuleKind;

use super::attributes::FormField;
use super::binding::{AttributeBinding, ValidationState};
use super::widget::InputContext;

impl FormField<'_> {
    /// Renders the field.
    ///
    /// Rendering reads the model but never changes it or the field, so
    /// repeated calls give identical markup.
    pub fn render(&self) -> Result<String> {
        match self.kind {
            FieldKind::Label => {
                let binding = self.binding()?;
                self.label_part(binding, Some(self.resolved_input_id(binding)?.as_str()))
            }
            FieldKind::Hint => Ok(self.hint_part(self.binding()?)?.unwrap_or_default()),
            FieldKind::Error => Ok(self.error_part(self.binding()?)?.unwrap_or_default()),
            FieldKind::ErrorSummary => self.render_error_summary(),
            FieldKind::Fieldset => Ok(self.render_fieldset()),
            FieldKind::Hidden => self.render_input(self.binding()?),
            kind if kind.is_button() => Ok(self.wrap(&self.render_button(), None)),
            FieldKind::ButtonGroup => Ok(self.wrap(&self.render_button_group()?, None)),
            FieldKind::Custom if self.binding.is_none() => {
                let input = self.render_widget(None, None, &self.input_attributes)?;
                Ok(self.wrap(&input, None))
            }
            FieldKind::Image => {
                let input = self
                    .renderer
                    .input("image", None, None, &self.input_attributes);
                Ok(self.wrap(&input, None))
            }
            _ => self.render_parts(self.binding()?),
        }
    }

    fn render_parts(&self, binding: &AttributeBinding<'_>) -> Result<String> {
        let input = self.render_input(binding)?;
        let label = match self.kind {
            FieldKind::Checkbox => String::new(),
            kind if kind.is_list() => self.label_part(binding, None)?,
            _ => self.label_part(binding, Some(self.resolved_input_id(binding)?.as_str()))?,
        };
        let hint = self.hint_part(binding)?.unwrap_or_default();
        let error = self.error_part(binding)?.unwrap_or_default();

        let content = fill_template(
            self.config.template(),
            &[
                ("label", label.as_str()),
                ("input", input.as_str()),
                ("hint", hint.as_str()),
                ("error", error.as_str()),
            ],
        );
        Ok(self.wrap(&content, Some(binding)))
    }

    fn wrap(&self, content: &str, binding: Option<&AttributeBinding<'_>>) -> String {
        if !self.config.uses_container() {
            return content.to_string();
        }

        let mut attrs = HtmlAttributes::new();
        for (name, value) in &self.config.container_attributes {
            attrs.set(name.as_str(), value.as_str());
        }
        if let Some(class) = &self.config.container_class {
            attrs.add_class(class);
        }
        attrs.merge(&self.container_attributes);

        let state = binding
            .and_then(|b| b.validation_state().ok())
            .unwrap_or(ValidationState::Untouched);
        let class = match state {
            ValidationState::Valid => self.config.valid_class.as_deref(),
            ValidationState::Invalid => self.config.invalid_class.as_deref(),
            ValidationState::Untouched => None,
        };
        if let Some(class) = class {
            attrs.add_class(class);
        }

        self.renderer
            .tag(self.config.container_tag(), &attrs, Some(&format!("\n{content}\n")))
    }

    fn resolved_input_id(&self, binding: &AttributeBinding<'_>) -> Result<String> {
        match self.input_attributes.get("id").and_then(AttrValue::as_text) {
            Some(id) => Ok(id),
            None => binding.input_id(),
        }
    }

    /// Renders the `<label>`, pointing at `input_id` when there is a single
    /// input to point at.
    fn label_part(&self, binding: &AttributeBinding<'_>, input_id: Option<&str>) -> Result<String> {
        if !self.show_label {
            return Ok(String::new());
        }
        let text = match &self.label {
            Some(text) => text.clone(),
            None => binding.label()?,
        };
        let mut attrs = HtmlAttributes::new();
        if let Some(input_id) = input_id {
            attrs.set("for", input_id);
        }
        if let Some(class) = &self.config.label_class {
            attrs.add_class(class);
        }
        Ok(self.renderer.tag("label", &attrs, Some(&html_escape(&text))))
    }

    fn hint_part(&self, binding: &AttributeBinding<'_>) -> Result<Option<String>> {
        let text = match &self.hint {
            Some(text) => text.clone(),
            None => binding.hint()?,
        };
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.decoration(self.config.hint_class.as_deref(), &text)))
    }

    fn error_part(&self, binding: &AttributeBinding<'_>) -> Result<Option<String>> {
        Ok(binding
            .first_error()?
            .map(|error| self.decoration(self.config.error_class.as_deref(), &error)))
    }

    fn decoration(&self, class: Option<&str>, text: &str) -> String {
        let mut attrs = HtmlAttributes::new();
        if let Some(class) = class {
            attrs.add_class(class);
        }
        self.renderer.tag("div", &attrs, Some(&html_escape(text)))
    }

    fn render_input(&self, binding: &AttributeBinding<'_>) -> Result<String> {
        let value = binding.value()?;
        self.check_value_type(&value)?;

        let mut name = binding.input_name()?;
        if self.kind.is_list() {
            return Ok(self.render_list(name, &value));
        }
        let attrs = self.prepare_input_attributes(binding)?;
        let text = scalar_to_string(&value);

        Ok(match self.kind {
            FieldKind::Textarea => self.renderer.tag(
                "textarea",
                &lead_with_name(&name, &attrs),
                Some(&html_escape(text.as_deref().unwrap_or_default())),
            ),
            FieldKind::Checkbox => self.render_checkbox(binding, &name, text.as_deref(), attrs)?,
            FieldKind::Select => {
                if attrs.get("multiple") == Some(&AttrValue::Bool(true)) {
                    name.push_str("[]");
                }
                self.render_select(&name, &value, &attrs)
            }
            FieldKind::File => self.renderer.input("file", Some(&name), None, &attrs),
            FieldKind::Custom => self.render_widget(Some(&name), Some(&value), &attrs)?,
            kind => {
                let input_type = kind.input_type().unwrap_or("text");
                self.renderer
                    .input(input_type, Some(&name), text.as_deref(), &attrs)
            }
        })
    }

    fn check_value_type(&self, value: &Value) -> Result<()> {
        let (valid, expected) = match self.kind {
            kind if kind.is_text_like() || kind.is_date_like() => (
                matches!(value, Value::String(_) | Value::Null),
                "a string or null",
            ),
            FieldKind::Number | FieldKind::Range => (
                match value {
                    Value::Number(_) | Value::Null => true,
                    Value::String(s) => s.trim().parse::<f64>().is_ok(),
                    _ => false,
                },
                "a numeric or null",
            ),
            FieldKind::Hidden => (
                matches!(value, Value::String(_) | Value::Number(_) | Value::Null),
                "a string, numeric or null",
            ),
            FieldKind::Checkbox => (
                !matches!(value, Value::Array(_) | Value::Object(_)),
                "a string, numeric, bool or null",
            ),
            FieldKind::Select | FieldKind::CheckboxList => (
                !matches!(value, Value::Object(_)),
                "a scalar, array or null",
            ),
            FieldKind::RadioList => (
                !matches!(value, Value::Array(_) | Value::Object(_)),
                "a scalar or null",
            ),
            _ => (true, ""),
        };
        if valid {
            Ok(())
        } else {
            Err(FieldError::InvalidValueType {
                kind: self.kind,
                expected,
            })
        }
    }

    fn prepare_input_attributes(&self, binding: &AttributeBinding<'_>) -> Result<HtmlAttributes> {
        let mut attrs = HtmlAttributes::new();
        if self.kind != FieldKind::Hidden {
            if let Some(class) = &self.config.input_class {
                attrs.add_class(class);
            }
        }
        attrs.merge(&self.input_attributes);
        if !attrs.contains("id") {
            attrs.set("id", binding.input_id()?);
        }

        if self.config.enriches_from_rules() {
            self.enrich(binding, &mut attrs)?;
        }

        if self.kind.is_text_like() || self.kind == FieldKind::Number {
            if !attrs.contains("placeholder") {
                attrs.set("placeholder", binding.placeholder()?);
            }
        }

        let class = match binding.validation_state()? {
            ValidationState::Valid => self.config.input_valid_class.as_deref(),
            ValidationState::Invalid => self.config.input_invalid_class.as_deref(),
            ValidationState::Untouched => None,
        };
        if let Some(class) = class {
            attrs.add_class(class);
        }
        Ok(attrs)
    }

    /// Derives input attributes from unconditional rules. A required rule
    /// always marks the input required; the other attributes are only
    /// filled in when the caller has not set them.
    fn enrich(&self, binding: &AttributeBinding<'_>, attrs: &mut HtmlAttributes) -> Result<()> {
        fn fill(attrs: &mut HtmlAttributes, name: &str, value: AttrValue) {
            if !attrs.contains(name) {
                attrs.set(name, value);
            }
        }

        for rule in binding.rules()? {
            if rule.condition().is_some() {
                continue;
            }
            match rule.kind() {
                RuleKind::Required if self.kind != FieldKind::Hidden => {
                    attrs.set("required", true);
                }
                RuleKind::Length { min, max } if self.kind.is_text_like() => {
                    if let Some(min) = min {
                        fill(attrs, "minlength", i64::try_from(min).ok().into());
                    }
                    if let Some(max) = max {
                        fill(attrs, "maxlength", i64::try_from(max).ok().into());
                    }
                }
                RuleKind::Pattern { pattern }
                    if self.kind.is_text_like() && self.kind != FieldKind::Textarea =>
                {
                    fill(attrs, "pattern", AttrValue::Str(pattern));
                }
                RuleKind::Number { min, max } if self.kind.is_numeric() => {
                    if let Some(min) = min {
                        fill(attrs, "min", AttrValue::Float(min));
                    }
                    if let Some(max) = max {
                        fill(attrs, "max", AttrValue::Float(max));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn render_checkbox(
        &self,
        binding: &AttributeBinding<'_>,
        name: &str,
        value: Option<&str>,
        mut attrs: HtmlAttributes,
    ) -> Result<String> {
        const CHECKED_VALUE: &str = "1";

        if value == Some(CHECKED_VALUE) {
            attrs.set("checked", true);
        }
        let checkbox = self
            .renderer
            .input("checkbox", Some(name), Some(CHECKED_VALUE), &attrs);

        let mut out = self
            .unchecked_value
            .as_deref()
            .map(|unchecked| {
                self.renderer
                    .input("hidden", Some(name), Some(unchecked), &HtmlAttributes::new())
            })
            .unwrap_or_default();

        if self.show_label {
            let text = match &self.label {
                Some(text) => text.clone(),
                None => binding.label()?,
            };
            let mut label_attrs = HtmlAttributes::new();
            if let Some(class) = &self.config.label_class {
                label_attrs.add_class(class);
            }
            let inner = format!("{checkbox} {}", html_escape(&text));
            out.push_str(&self.renderer.tag("label", &label_attrs, Some(&inner)));
        } else {
            out.push_str(&checkbox);
        }
        Ok(out)
    }

    fn render_select(&self, name: &str, value: &Value, attrs: &HtmlAttributes) -> String {
        let selected = selected_values(value);

        let mut options = Vec::new();
        if let Some(prompt) = &self.prompt {
            let attrs = HtmlAttributes::new().with("value", "");
            options.push(self.renderer.tag("option", &attrs, Some(&html_escape(prompt))));
        }
        for (option_value, label) in &self.items {
            let attrs = HtmlAttributes::new()
                .with("value", option_value)
                .with("selected", selected.contains(option_value));
            options.push(self.renderer.tag("option", &attrs, Some(&html_escape(label))));
        }

        let body = if options.is_empty() {
            String::new()
        } else {
            format!("\n{}\n", options.join("\n"))
        };
        self.renderer
            .tag("select", &lead_with_name(name, attrs), Some(&body))
    }

    /// Renders one labelled checkbox or radio per item inside a `<div>`
    /// carrying the caller-set input attributes.
    fn render_list(&self, mut name: String, value: &Value) -> String {
        let input_type = if self.kind == FieldKind::CheckboxList {
            name.push_str("[]");
            "checkbox"
        } else {
            "radio"
        };
        let selected = selected_values(value);

        let choices: Vec<String> = self
            .items
            .iter()
            .map(|(item_value, label)| {
                let attrs = HtmlAttributes::new().with("checked", selected.contains(item_value));
                let input = self
                    .renderer
                    .input(input_type, Some(&name), Some(item_value), &attrs);
                let inner = format!("{input} {}", html_escape(label));
                self.renderer.tag("label", &HtmlAttributes::new(), Some(&inner))
            })
            .collect();

        let body = if choices.is_empty() {
            String::new()
        } else {
            format!("\n{}\n", choices.join("\n"))
        };
        self.renderer.tag("div", &self.input_attributes, Some(&body))
    }

    fn render_widget(
        &self,
        name: Option<&str>,
        value: Option<&Value>,
        attributes: &HtmlAttributes,
    ) -> Result<String> {
        let widget = self.widget.as_ref().ok_or(FieldError::MissingWidget)?;
        widget.render(&InputContext {
            name,
            value,
            attributes,
            renderer: &*self.renderer,
        })
    }

    fn render_button_group(&self) -> Result<String> {
        let buttons = self
            .buttons
            .iter()
            .map(|button| {
                if button.kind.is_button() {
                    Ok(button.render_button())
                } else {
                    button.render()
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(buttons.join("\n"))
    }

    fn render_button(&self) -> String {
        let button_type = match self.kind {
            FieldKind::SubmitButton => "submit",
            FieldKind::ResetButton => "reset",
            _ => "button",
        };
        let mut attrs = HtmlAttributes::new().with("type", button_type);
        attrs.merge(&self.input_attributes);
        let content = html_escape(self.content.as_deref().unwrap_or_default());
        self.renderer.tag("button", &attrs, Some(&content))
    }

    fn render_fieldset(&self) -> String {
        let mut lines = Vec::new();
        if let Some(legend) = &self.legend {
            lines.push(
                self.renderer
                    .tag("legend", &HtmlAttributes::new(), Some(&html_escape(legend))),
            );
        }
        if let Some(content) = &self.content {
            lines.push(content.clone());
        }
        let body = if lines.is_empty() {
            String::new()
        } else {
            format!("\n{}\n", lines.join("\n"))
        };
        self.renderer
            .tag("fieldset", &self.input_attributes, Some(&body))
    }

    fn render_error_summary(&self) -> Result<String> {
        let errors = self.binding()?.model().form_errors();
        let messages: Vec<String> = errors
            .first_errors()
            .into_iter()
            .filter(|(attribute, _)| {
                self.only_attributes
                    .as_ref()
                    .map_or(true, |only| only.iter().any(|a| a.as_str() == *attribute))
            })
            .map(|(_, message)| message.to_string())
            .collect();
        if messages.is_empty() {
            return Ok(String::new());
        }

        let header = self.config.error_summary_header().to_string();
        let class = self.config.error_class.clone().unwrap_or_default();
        Ok(Element::<Div>::new()
            .when(!class.is_empty(), |d| d.class(class.as_str()))
            .child::<P, _>(|p| p.text(&header))
            .child::<Ul, _>(|ul| {
                ul.children(messages.iter(), |message, li: Element<Li>| li.text(message))
            })
            .render())
    }
}

/// Puts `id` and `name` first, for tags other than `<input>`.
fn lead_with_name(name: &str, attrs: &HtmlAttributes) -> HtmlAttributes {
    let mut ordered = HtmlAttributes::new();
    if let Some(id) = attrs.get("id") {
        ordered.set("id", id.clone());
    }
    ordered.set("name", name);
    for (key, value) in attrs.iter() {
        if key != "id" && key != "name" {
            ordered.set(key, value.clone());
        }
    }
    ordered
}

/// Values a select or list marks as chosen.
fn selected_values(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

/// Fills the template line by line, dropping template lines that come out
/// blank. Line breaks inside part values are kept.
fn fill_template(template: &str, parts: &[(&str, &str)]) -> String {
    template
        .lines()
        .map(|line| substitute(line, parts))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitutes `{part}` tokens in one pass.
fn substitute(line: &str, parts: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find('{') {
        filled.push_str(&rest[..start]);
        let tail = &rest[start..];
        let token = tail
            .find('}')
            .map(|end| &tail[1..end])
            .and_then(|name| parts.iter().find(|(part, _)| *part == name));
        match token {
            Some((name, value)) => {
                filled.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                filled.push('{');
                rest = &tail[1..];
            }
        }
    }
    filled.push_str(rest);
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_drops_blank_lines() {
        let out = fill_template(
            "{label}\n{input}\n{hint}\n{error}",
            &[("label", "L"), ("input", "I"), ("hint", ""), ("error", "")],
        );
        assert_eq!(out, "L\nI");
    }

    #[test]
    fn test_fill_template_keeps_blank_lines_inside_values() {
        let out = fill_template(
            "{label}\n{input}\n{hint}",
            &[("label", ""), ("input", "<textarea>a\n\nb</textarea>"), ("hint", "")],
        );
        assert_eq!(out, "<textarea>a\n\nb</textarea>");
    }

    #[test]
    fn test_fill_template_is_single_pass() {
        let out = fill_template(
            "{label}|{input}|{unknown}",
            &[("label", "{input}"), ("input", "x")],
        );
        assert_eq!(out, "{input}|x|{unknown}");
    }

    #[test]
    fn test_lead_with_name() {
        let attrs = HtmlAttributes::new().with("rows", 3_i64).with("id", "a");
        let keys: Vec<String> = lead_with_name("n", &attrs)
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(keys, ["id", "name", "rows"]);
    }
}
