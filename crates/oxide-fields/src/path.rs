//! Attribute path parsing.
//!
//! An attribute path names a value inside a form model. Dotted segments
//! descend into nested models (`user.login`) and bracketed keys index into
//! array or object values (`letters[0]`, `object[numbers][1]`).

use std::fmt;

use crate::error::{FieldError, Result};

/// One dotted segment of an attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Attribute name read from the model.
    pub name: String,
    /// Keys applied to the attribute value, outermost first.
    pub keys: Vec<String>,
}

/// A parsed attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    raw: String,
    segments: Vec<Segment>,
}

impl AttributePath {
    /// Parses a path such as `user.login`, `letters[0]` or `object[numbers][1]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || FieldError::InvalidPath(raw.to_string());
        let mut segments = Vec::new();
        let mut chars = raw.chars().peekable();

        loop {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' || c == '[' || c == ']' {
                    break;
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(invalid());
            }

            let mut keys = Vec::new();
            while chars.peek() == Some(&'[') {
                chars.next();
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some('[') | None => return Err(invalid()),
                        Some(c) => key.push(c),
                    }
                }
                if key.is_empty() {
                    return Err(invalid());
                }
                keys.push(key);
            }

            segments.push(Segment { name, keys });

            match chars.next() {
                None => break,
                Some('.') => {}
                Some(_) => return Err(invalid()),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Returns the path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the dotted segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the last segment, whose attribute holds the value.
    pub fn last(&self) -> &Segment {
        // parse() never produces an empty segment list
        &self.segments[self.segments.len() - 1]
    }

    /// Returns the segments leading to the owning model.
    pub fn parents(&self) -> &[Segment] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Returns whether the path descends into a nested model.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Returns the attribute name without index keys on the last segment.
    ///
    /// Errors and validation rules are recorded under this name, so
    /// `letters[0]` shares them with `letters`, and `user.login` keeps its
    /// dotted form.
    pub fn attribute_name(&self) -> String {
        let mut name = String::new();
        for segment in self.parents() {
            name.push_str(&segment.name);
            for key in &segment.keys {
                name.push('[');
                name.push_str(key);
                name.push(']');
            }
            name.push('.');
        }
        name.push_str(&self.last().name);
        name
    }

    /// Returns the HTML `name` attribute for a form called `form_name`.
    ///
    /// `LoginForm` + `login` gives `LoginForm[login]`, `NestedForm` +
    /// `letters[0]` gives `NestedForm[letters][0]`. An empty form name
    /// leaves the path unprefixed.
    pub fn input_name(&self, form_name: &str) -> String {
        let attribute = self.attribute_name();
        let suffix: String = self
            .last()
            .keys
            .iter()
            .map(|key| format!("[{key}]"))
            .collect();

        if form_name.is_empty() {
            format!("{attribute}{suffix}")
        } else {
            format!("{form_name}[{attribute}]{suffix}")
        }
    }

    /// Returns the DOM id for a form called `form_name`.
    pub fn input_id(&self, form_name: &str) -> String {
        input_id_from_name(&self.input_name(form_name))
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Derives a DOM id from an input name.
///
/// The name is lowercased, `[]` and `]` are dropped, and `][`, `[`, spaces
/// and dots become dashes.
pub fn input_id_from_name(name: &str) -> String {
    name.to_lowercase()
        .replace("[]", "")
        .replace("][", "-")
        .replace('[', "-")
        .replace(']', "")
        .replace([' ', '.'], "-")
}
