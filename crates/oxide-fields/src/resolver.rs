//! Attribute resolution against form models.
//!
//! [`AttributeResolver`] walks an [`AttributePath`] through a model: dotted
//! segments descend into nested models, bracketed keys index into the
//! attribute's JSON value. Labels, hints and placeholders are looked up on
//! the model that owns the last segment.

use serde_json::Value;

use crate::error::{FieldError, Result};
use crate::model::{generate_label, FormModel};
use crate::path::{AttributePath, Segment};

/// Stateless resolver of attribute data.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeResolver;

impl AttributeResolver {
    /// Resolves the current value at `path`.
    pub fn value(model: &dyn FormModel, path: &str) -> Result<Value> {
        Self::value_at(model, &AttributePath::parse(path)?)
    }

    /// Resolves the current value at an already parsed path.
    pub fn value_at(model: &dyn FormModel, path: &AttributePath) -> Result<Value> {
        let owner = Self::owner(model, path)?;
        let not_found = || FieldError::AttributeNotFound {
            model: owner.model_name().to_string(),
            path: path.as_str().to_string(),
        };

        let last = path.last();
        let root = owner
            .read_attribute(&last.name)
            .map_err(|message| FieldError::UnreadableAttribute {
                model: owner.model_name().to_string(),
                path: path.as_str().to_string(),
                message,
            })?
            .ok_or_else(not_found)?;

        let mut current = &root;
        for key in &last.keys {
            current = index(current, key).ok_or_else(not_found)?;
        }
        Ok(current.clone())
    }

    /// Returns the label of the attribute at `path`.
    ///
    /// Falls back to a label generated from the attribute name.
    pub fn label(model: &dyn FormModel, path: &AttributePath) -> Result<String> {
        let owner = Self::owner(model, path)?;
        let name = &path.last().name;
        Ok(owner
            .attribute_label(name)
            .unwrap_or_else(|| generate_label(name)))
    }

    /// Returns the hint of the attribute at `path`, empty if none is declared.
    pub fn hint(model: &dyn FormModel, path: &AttributePath) -> Result<String> {
        let owner = Self::owner(model, path)?;
        Ok(owner.attribute_hint(&path.last().name).unwrap_or_default())
    }

    /// Returns the placeholder of the attribute at `path`.
    ///
    /// An empty placeholder counts as no placeholder.
    pub fn placeholder(model: &dyn FormModel, path: &AttributePath) -> Result<Option<String>> {
        let owner = Self::owner(model, path)?;
        Ok(owner
            .attribute_placeholder(&path.last().name)
            .filter(|placeholder| !placeholder.is_empty()))
    }

    /// Returns the HTML `name` of the input bound to `path`.
    pub fn input_name(model: &dyn FormModel, path: &AttributePath) -> String {
        path.input_name(model.form_name())
    }

    /// Returns the DOM id of the input bound to `path`.
    pub fn input_id(model: &dyn FormModel, path: &AttributePath) -> String {
        path.input_id(model.form_name())
    }

    /// Returns the first error recorded against the attribute at `path`.
    ///
    /// Errors stored under the full path (`letters[0]`) come first, then
    /// those of the attribute itself (`letters`).
    pub fn first_error(model: &dyn FormModel, path: &AttributePath) -> Option<String> {
        let errors = model.form_errors();
        errors
            .first_error(path.as_str())
            .or_else(|| errors.first_error(&path.attribute_name()))
            .map(str::to_string)
    }

    /// Returns whether any error is recorded against `path`, under the full
    /// path or the attribute name.
    pub fn has_errors(model: &dyn FormModel, path: &AttributePath) -> bool {
        let errors = model.form_errors();
        errors.has_errors(path.as_str()) || errors.has_errors(&path.attribute_name())
    }

    /// Returns whether `path` names an attribute of the model.
    ///
    /// Nested paths are followed; any resolution failure answers `false`.
    pub fn has_attribute(model: &dyn FormModel, path: &str) -> bool {
        let Ok(path) = AttributePath::parse(path) else {
            return false;
        };
        Self::owner(model, &path).is_ok_and(|owner| owner.has_own_attribute(&path.last().name))
    }

    /// Walks the dotted prefix of `path` and returns the model owning the
    /// last segment.
    pub fn owner<'m>(model: &'m dyn FormModel, path: &AttributePath) -> Result<&'m dyn FormModel> {
        let mut current = model;
        for segment in path.parents() {
            current = descend(current, segment, path)?;
        }
        Ok(current)
    }
}

fn descend<'m>(
    current: &'m dyn FormModel,
    segment: &Segment,
    path: &AttributePath,
) -> Result<&'m dyn FormModel> {
    let not_nested = || FieldError::NotNestedAttribute {
        model: current.model_name().to_string(),
        segment: segment.name.clone(),
    };

    if !segment.keys.is_empty() {
        return Err(not_nested());
    }
    if let Some(nested) = current.nested_model(&segment.name) {
        return Ok(nested);
    }
    if current.has_own_attribute(&segment.name) {
        Err(not_nested())
    } else {
        Err(FieldError::AttributeNotFound {
            model: current.model_name().to_string(),
            path: path.as_str().to_string(),
        })
    }
}

fn index<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match value {
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(map) => map.get(key),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormErrors;
    use serde_json::json;

    struct Profile {
        errors: FormErrors,
    }

    impl FormModel for Profile {
        fn form_name(&self) -> &str {
            "Profile"
        }

        fn attribute_names(&self) -> Vec<String> {
            vec!["login".into(), "empty".into()]
        }

        fn attribute_value(&self, name: &str) -> Option<Value> {
            match name {
                "login" => Some(json!("admin")),
                "empty" => Some(Value::Null),
                _ => None,
            }
        }

        fn attribute_label(&self, name: &str) -> Option<String> {
            (name == "login").then(|| "Login:".to_string())
        }

        fn attribute_hint(&self, name: &str) -> Option<String> {
            (name == "login").then(|| "Write your id or email.".to_string())
        }

        fn attribute_placeholder(&self, name: &str) -> Option<String> {
            match name {
                "login" => Some("Type Username or Email.".to_string()),
                "empty" => Some(String::new()),
                _ => None,
            }
        }

        fn form_errors(&self) -> &FormErrors {
            &self.errors
        }

        fn form_errors_mut(&mut self) -> &mut FormErrors {
            &mut self.errors
        }
    }

    struct Outer {
        user: Profile,
        errors: FormErrors,
    }

    impl FormModel for Outer {
        fn form_name(&self) -> &str {
            "OuterForm"
        }

        fn model_name(&self) -> &str {
            "Outer"
        }

        fn attribute_names(&self) -> Vec<String> {
            vec!["id".into(), "user".into(), "letters".into(), "object".into()]
        }

        fn attribute_value(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(json!(7)),
                "letters" => Some(json!(["A", "B"])),
                "object" => Some(json!({"numbers": [41, 42]})),
                _ => None,
            }
        }

        fn nested_model(&self, name: &str) -> Option<&dyn FormModel> {
            (name == "user").then_some(&self.user as &dyn FormModel)
        }

        fn form_errors(&self) -> &FormErrors {
            &self.errors
        }

        fn form_errors_mut(&mut self) -> &mut FormErrors {
            &mut self.errors
        }
    }

    fn outer() -> Outer {
        Outer {
            user: Profile {
                errors: FormErrors::new(),
            },
            errors: FormErrors::new(),
        }
    }

    fn path(raw: &str) -> AttributePath {
        AttributePath::parse(raw).unwrap()
    }

    #[test]
    fn test_plain_and_indexed_values() {
        let model = outer();
        assert_eq!(AttributeResolver::value(&model, "id").unwrap(), json!(7));
        assert_eq!(AttributeResolver::value(&model, "letters[0]").unwrap(), json!("A"));
        assert_eq!(
            AttributeResolver::value(&model, "object[numbers][1]").unwrap(),
            json!(42)
        );
    }

    #[test]
    fn test_nested_value_matches_direct_lookup() {
        let model = outer();
        assert_eq!(
            AttributeResolver::value(&model, "user.login").unwrap(),
            AttributeResolver::value(&model.user, "login").unwrap()
        );
    }

    #[test]
    fn test_missing_segments_name_the_full_path() {
        let model = outer();
        for raw in ["missing", "letters[5]", "letters[x]", "object[words]", "id[0]", "user.missing", "ghost.login"] {
            let err = AttributeResolver::value(&model, raw).unwrap_err();
            let expected = if raw == "user.missing" { "Profile" } else { "Outer" };
            assert_eq!(
                err,
                FieldError::AttributeNotFound {
                    model: expected.to_string(),
                    path: raw.to_string(),
                },
                "{raw}"
            );
        }
    }

    #[test]
    fn test_intermediate_must_be_nested_model() {
        let model = outer();
        let err = AttributeResolver::value(&model, "id.profile").unwrap_err();
        assert_eq!(
            err,
            FieldError::NotNestedAttribute {
                model: "Outer".to_string(),
                segment: "id".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Attribute \"Outer::id\" is not a nested attribute."
        );
        assert!(matches!(
            AttributeResolver::value(&model, "letters[0].x"),
            Err(FieldError::NotNestedAttribute { .. })
        ));
    }

    #[test]
    fn test_labels_hints_placeholders() {
        let model = outer();
        assert_eq!(AttributeResolver::label(&model, &path("user.login")).unwrap(), "Login:");
        assert_eq!(AttributeResolver::label(&model, &path("letters[0]")).unwrap(), "Letters");
        assert_eq!(
            AttributeResolver::hint(&model, &path("user.login")).unwrap(),
            "Write your id or email."
        );
        assert_eq!(AttributeResolver::hint(&model, &path("id")).unwrap(), "");
        assert_eq!(
            AttributeResolver::placeholder(&model, &path("user.login")).unwrap(),
            Some("Type Username or Email.".to_string())
        );
        assert_eq!(AttributeResolver::placeholder(&model, &path("user.empty")).unwrap(), None);
        assert!(AttributeResolver::label(&model, &path("id.x")).is_err());
    }

    #[test]
    fn test_names_ids_and_errors() {
        let mut model = outer();
        let nested = path("user.login");
        assert_eq!(AttributeResolver::input_name(&model, &nested), "OuterForm[user.login]");
        assert_eq!(AttributeResolver::input_id(&model, &nested), "outerform-user-login");
        assert_eq!(AttributeResolver::first_error(&model, &nested), None);

        model.errors.add("letters", "Pick a letter.");
        assert_eq!(
            AttributeResolver::first_error(&model, &path("letters[1]")),
            Some("Pick a letter.".to_string())
        );
    }

    #[test]
    fn test_errors_under_full_path_come_first() {
        let mut model = outer();
        let first = path("letters[0]");
        model.errors.add("letters[0]", "First letter is blank.");
        assert_eq!(
            AttributeResolver::first_error(&model, &first),
            Some("First letter is blank.".to_string())
        );
        assert!(AttributeResolver::has_errors(&model, &first));
        assert!(!AttributeResolver::has_errors(&model, &path("letters[1]")));

        model.errors.add("letters", "Pick a letter.");
        assert_eq!(
            AttributeResolver::first_error(&model, &first),
            Some("First letter is blank.".to_string())
        );
        assert!(AttributeResolver::has_errors(&model, &path("letters[1]")));
    }

    #[test]
    fn test_has_attribute() {
        let model = outer();
        assert!(AttributeResolver::has_attribute(&model, "id"));
        assert!(AttributeResolver::has_attribute(&model, "user.login"));
        assert!(!AttributeResolver::has_attribute(&model, "user.noexist"));
        assert!(!AttributeResolver::has_attribute(&model, "noexist"));
        assert!(!AttributeResolver::has_attribute(&model, "id.x"));
        assert!(!AttributeResolver::has_attribute(&model, "bad["));
    }
}
