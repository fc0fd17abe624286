#![allow(dead_code)]

use std::sync::Arc;

use oxide_fields::model::RuleList;
use oxide_fields::validation::{Email, Length, Number, Pattern, Required, Rule};
use oxide_fields::{FieldConfig, FieldFactory, FormErrors, FormModel};
use oxide_fields_derive::FormModel;
use serde_json::json;

pub fn rule<R: Rule + 'static>(rule: R) -> Arc<dyn Rule> {
    Arc::new(rule)
}

pub fn factory() -> FieldFactory {
    FieldFactory::new(FieldConfig::default())
}

#[derive(Debug, Default, FormModel)]
#[form(name = "LoginForm", rules = login_rules)]
pub struct LoginForm {
    pub login: String,
    #[field(hint = "Use at least 8 characters.")]
    pub password: String,
    pub remember_me: bool,
    #[field(errors)]
    pub errors: FormErrors,
}

fn login_rules(_: &LoginForm) -> RuleList {
    vec![(
        "password".into(),
        vec![rule(Required::new()), rule(Length::new(Some(8), Some(64)))],
    )]
}

pub fn login() -> LoginForm {
    LoginForm {
        login: "admin".into(),
        password: "secret-password".into(),
        remember_me: true,
        errors: FormErrors::new(),
    }
}

#[derive(Debug, Default, FormModel)]
#[form(name = "ProfileForm", rules = profile_rules)]
pub struct ProfileForm {
    #[field(label = "Full name", placeholder = "Jane Doe")]
    pub name: String,
    pub email: String,
    pub age: i64,
    pub birthday: Option<String>,
    pub bio: Option<String>,
    pub color: String,
    pub tags: Vec<String>,
    #[field(placeholder = "")]
    pub nickname: String,
    pub public: bool,
    #[field(skip)]
    pub revision: u32,
    #[field(errors)]
    pub errors: FormErrors,
}

fn profile_rules(_: &ProfileForm) -> RuleList {
    let name_pattern = Pattern::new("^[A-Za-z ]+$")
        .unwrap_or_else(|e| panic!("invalid name pattern: {e}"));
    vec![
        ("name".into(), vec![rule(Required::new()), rule(name_pattern)]),
        ("email".into(), vec![rule(Email::new())]),
        ("age".into(), vec![rule(Number::new(Some(1.0), Some(100.0)))]),
        ("bio".into(), vec![rule(Length::max(500))]),
        (
            "nickname".into(),
            vec![rule(Required::new().when(|model| {
                model.attribute_value("public") == Some(json!(true))
            }))],
        ),
    ]
}

pub fn profile() -> ProfileForm {
    ProfileForm {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        age: 42,
        birthday: Some("2024-01-15".into()),
        bio: Some("Hello <b>".into()),
        color: "green".into(),
        tags: vec!["rust".into(), "web".into()],
        nickname: String::new(),
        public: false,
        revision: 3,
        errors: FormErrors::new(),
    }
}

#[derive(Debug, Default, FormModel)]
#[form(name = "OuterForm")]
pub struct OuterForm {
    #[field(nested)]
    pub user: LoginForm,
    pub id: i64,
    #[field(errors)]
    pub errors: FormErrors,
}

pub fn outer() -> OuterForm {
    OuterForm {
        user: login(),
        id: 7,
        errors: FormErrors::new(),
    }
}

#[derive(Debug, Default, FormModel)]
#[form(name = "NestedForm")]
pub struct NestedForm {
    pub letters: Vec<String>,
    pub object: serde_json::Value,
    #[field(errors)]
    pub errors: FormErrors,
}

pub fn nested() -> NestedForm {
    NestedForm {
        letters: vec!["A".into(), "B".into()],
        object: json!({"numbers": [41, 42]}),
        errors: FormErrors::new(),
    }
}

#[derive(Debug, Default, FormModel)]
#[form(name = "IndexedForm", rules = indexed_rules)]
pub struct IndexedForm {
    pub letters: Vec<String>,
    #[field(errors)]
    pub errors: FormErrors,
}

fn indexed_rules(_: &IndexedForm) -> RuleList {
    vec![("letters[0]".into(), vec![rule(Required::new())])]
}

pub fn indexed() -> IndexedForm {
    IndexedForm {
        letters: vec![String::new()],
        errors: FormErrors::new(),
    }
}
