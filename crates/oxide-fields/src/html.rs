//! Markup rendering boundary.
//!
//! Fields assemble [`HtmlAttributes`] and hand them to a [`MarkupRenderer`],
//! which owns the actual tag syntax. [`HtmlRenderer`] is the default.

use std::fmt;

/// Value of one HTML attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
    /// `true` renders as a bare attribute, `false` omits it.
    Bool(bool),
    /// Unset. Setting `Null` removes the attribute.
    Null,
}

impl AttrValue {
    /// Returns the text rendered inside the attribute quotes, if any.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Bool(_) | Self::Null => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => Ok(()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Insertion-ordered HTML attribute map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlAttributes {
    entries: Vec<(String, AttrValue)>,
}

impl HtmlAttributes {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, keeping its position if already present.
    ///
    /// A [`AttrValue::Null`] value removes the attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        if value == AttrValue::Null {
            self.remove(&name);
            return;
        }
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns an attribute value.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns whether an attribute is set.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes an attribute and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let position = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(position).1)
    }

    /// Appends CSS classes to the `class` attribute, skipping classes
    /// already present.
    pub fn add_class(&mut self, classes: &str) {
        let mut current: Vec<String> = match self.get("class") {
            Some(AttrValue::Str(existing)) => {
                existing.split_whitespace().map(str::to_string).collect()
            }
            _ => Vec::new(),
        };
        for class in classes.split_whitespace() {
            if !current.iter().any(|c| c == class) {
                current.push(class.to_string());
            }
        }
        if !current.is_empty() {
            self.set("class", current.join(" "));
        }
    }

    /// Copies every attribute of `other` into `self`. Classes are appended.
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in &other.entries {
            match (name.as_str(), value) {
                ("class", AttrValue::Str(classes)) => self.add_class(classes),
                _ => self.set(name.clone(), value.clone()),
            }
        }
    }

    /// Iterates over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Emits markup for fields.
pub trait MarkupRenderer: Send + Sync {
    /// Renders a tag. `None` content renders a void element.
    ///
    /// Content is inserted as-is; callers escape text themselves.
    fn tag(&self, name: &str, attributes: &HtmlAttributes, content: Option<&str>) -> String;

    /// Renders an `<input>` with `type`, `id`, `name` and `value` leading the
    /// attribute list.
    fn input(
        &self,
        input_type: &str,
        name: Option<&str>,
        value: Option<&str>,
        attributes: &HtmlAttributes,
    ) -> String {
        let mut ordered = HtmlAttributes::new();
        ordered.set("type", input_type);
        if let Some(id) = attributes.get("id") {
            ordered.set("id", id.clone());
        }
        if let Some(name) = name {
            ordered.set("name", name);
        }
        if let Some(value) = value {
            ordered.set("value", value);
        }
        for (key, attr) in attributes.iter() {
            if !matches!(key, "type" | "id" | "name" | "value") {
                ordered.set(key, attr.clone());
            }
        }
        self.tag("input", &ordered, None)
    }
}

/// Default HTML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Renders an attribute list with a leading space, or an empty string.
    pub fn attributes(attributes: &HtmlAttributes) -> String {
        let mut out = String::new();
        for (name, value) in attributes.iter() {
            match value {
                AttrValue::Bool(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                AttrValue::Bool(false) | AttrValue::Null => {}
                other => {
                    let text = other.as_text().unwrap_or_default();
                    out.push_str(&format!(r#" {name}="{}""#, html_escape(&text)));
                }
            }
        }
        out
    }
}

impl MarkupRenderer for HtmlRenderer {
    fn tag(&self, name: &str, attributes: &HtmlAttributes, content: Option<&str>) -> String {
        let attrs = Self::attributes(attributes);
        match content {
            Some(content) => format!("<{name}{attrs}>{content}</{name}>"),
            None => format!("<{name}{attrs}>"),
        }
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
