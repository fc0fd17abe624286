//! Behaviour of `#[derive(FormModel)]`.

mod common;
use common::*;

use std::collections::BTreeMap;

use oxide_fields::{FieldError, FormErrors, FormModel};
use oxide_fields_derive::FormModel;
use serde_json::json;

#[derive(FormModel)]
struct Unnamed {
    title: String,
    #[field(errors)]
    errors: FormErrors,
}

#[derive(FormModel)]
#[form(name = "")]
struct Bare {
    r#type: String,
    #[field(errors)]
    errors: FormErrors,
}

#[derive(FormModel)]
#[form(name = "GridForm")]
struct Grid {
    cells: BTreeMap<(u8, u8), String>,
    #[field(errors)]
    errors: FormErrors,
}

#[test]
fn test_form_name_defaults_to_struct_name() {
    let model = Unnamed {
        title: "Hello".into(),
        errors: FormErrors::new(),
    };
    assert_eq!(model.form_name(), "Unnamed");
    assert_eq!(model.model_name(), "Unnamed");
    assert_eq!(model.attribute_names(), ["title"]);
    assert!(model.rules().is_empty());
}

#[test]
fn test_empty_form_name_and_raw_identifier() {
    let model = Bare {
        r#type: "plain".into(),
        errors: FormErrors::new(),
    };
    assert_eq!(model.form_name(), "");
    assert_eq!(model.attribute_names(), ["type"]);
    assert_eq!(model.attribute_value("type"), Some(json!("plain")));

    let html = factory().text(&model, "type").unwrap().render().unwrap();
    assert!(html.contains(r#"<input type="text" id="type" name="type" value="plain">"#));
}

#[test]
fn test_attribute_names_skip_errors_and_skipped_fields() {
    let model = profile();
    let names = model.attribute_names();
    assert!(names.contains(&"nickname".to_string()));
    assert!(!names.contains(&"revision".to_string()));
    assert!(!names.contains(&"errors".to_string()));
    assert_eq!(names.len(), 9);
}

#[test]
fn test_declared_texts() {
    let model = profile();
    assert_eq!(model.attribute_label("name"), Some("Full name".to_string()));
    assert_eq!(model.attribute_label("email"), None);
    assert_eq!(model.attribute_placeholder("nickname"), Some(String::new()));

    let model = login();
    assert_eq!(
        model.attribute_hint("password"),
        Some("Use at least 8 characters.".to_string())
    );
}

#[test]
fn test_nested_models() {
    let model = outer();
    assert!(model.attribute_value("user").is_none());
    let user = model.nested_model("user").unwrap();
    assert_eq!(user.model_name(), "LoginForm");
    assert!(model.nested_model("id").is_none());
    assert!(model.has_own_attribute("user"));
}

#[test]
fn test_rules_and_errors_are_wired() {
    let mut model = login();
    assert_eq!(model.rules().len(), 1);
    model.form_errors_mut().add("login", "Taken.");
    assert_eq!(model.form_errors().first_error("login"), Some("Taken."));
    assert_eq!(model.errors.first_error("login"), Some("Taken."));
}

#[test]
fn test_unserializable_value_is_reported() {
    let mut cells = BTreeMap::new();
    cells.insert((0, 0), "x".to_string());
    let model = Grid {
        cells,
        errors: FormErrors::new(),
    };

    assert!(model.read_attribute("cells").is_err());
    assert_eq!(model.read_attribute("missing"), Ok(None));
    assert_eq!(model.attribute_value("cells"), None);

    let err = factory()
        .text(&model, "cells")
        .unwrap()
        .render()
        .unwrap_err();
    assert!(
        matches!(
            &err,
            FieldError::UnreadableAttribute { model, path, .. }
                if model == "Grid" && path == "cells"
        ),
        "{err:?}"
    );
}
