//! Model validation and the validation state seen by fields.

mod common;
use common::*;

use oxide_fields::{validate_model, FormModel, ValidationRuleCache, ValidationState};

#[test]
fn test_valid_model() {
    let mut model = login();
    assert!(validate_model(&mut model).unwrap());
    assert!(model.errors.is_validated());
    assert!(model.errors.is_empty());
}

#[test]
fn test_errors_are_recorded_per_attribute() {
    let mut model = ProfileForm {
        name: "R2-D2".into(),
        email: "jane".into(),
        age: 120,
        ..profile()
    };
    assert!(!validate_model(&mut model).unwrap());
    assert_eq!(model.errors.first_error("name"), Some("Value is invalid."));
    assert_eq!(
        model.errors.first_error("email"),
        Some("This value is not a valid email address.")
    );
    assert_eq!(model.errors.first_error("age"), Some("Value must be between 1 and 100."));
    assert_eq!(model.errors.len(), 3);
}

#[test]
fn test_empty_values_only_fail_required() {
    let mut model = ProfileForm {
        email: String::new(),
        bio: None,
        ..profile()
    };
    assert!(validate_model(&mut model).unwrap());
}

#[test]
fn test_conditional_rule() {
    let mut model = profile();
    assert!(validate_model(&mut model).unwrap());

    model.public = true;
    assert!(!validate_model(&mut model).unwrap());
    assert_eq!(model.errors.first_error("nickname"), Some("Value cannot be blank."));

    model.nickname = "jd".into();
    assert!(validate_model(&mut model).unwrap());
    assert!(model.errors.first_error("nickname").is_none());
}

#[test]
fn test_validation_state_of_bound_fields() {
    let mut model = LoginForm {
        password: "short".into(),
        ..login()
    };
    {
        let field = factory().password(&model, "password").unwrap();
        assert_eq!(
            field.binding().unwrap().validation_state().unwrap(),
            ValidationState::Untouched
        );
    }

    validate_model(&mut model).unwrap();
    let password = factory().password(&model, "password").unwrap();
    let login_field = factory().text(&model, "login").unwrap();
    assert_eq!(
        password.binding().unwrap().validation_state().unwrap(),
        ValidationState::Invalid
    );
    assert_eq!(
        login_field.binding().unwrap().validation_state().unwrap(),
        ValidationState::Valid
    );
}

#[test]
fn test_rule_cache_reads_rules_once() {
    let model = profile();
    let cache = ValidationRuleCache::new();
    assert!(!cache.is_primed());
    assert_eq!(cache.rules_for(&model, "name").len(), 2);
    assert!(cache.is_primed());
    assert_eq!(cache.rules_for(&model, "age").len(), 1);
    assert!(cache.rules_for(&model, "color").is_empty());
    assert_eq!(model.rules().len(), 5);
}
