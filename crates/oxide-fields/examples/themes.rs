//! Themes Example
//!
//! Renders the same login form with the default, Bootstrap 5 and Bulma
//! configurations, before and after validation.
//! Run with: cargo run --example themes
//! Pass `--verbose` to see registry and rule normalization events.

use std::sync::Arc;

use oxide_fields::model::RuleList;
use oxide_fields::validation::{Length, Required, Rule};
use oxide_fields::{validate_model, ConfigRegistry, FieldConfig, FieldFactory, FormErrors};
use oxide_fields_derive::FormModel;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, FormModel)]
#[form(name = "LoginForm", rules = login_rules)]
struct LoginForm {
    #[field(label = "Login", placeholder = "Type username or email.")]
    login: String,
    #[field(hint = "Use at least 8 characters.")]
    password: String,
    remember_me: bool,
    #[field(errors)]
    errors: FormErrors,
}

fn login_rules(_: &LoginForm) -> RuleList {
    vec![
        (
            "login".into(),
            vec![Arc::new(Required::new()) as Arc<dyn Rule>],
        ),
        (
            "password".into(),
            vec![
                Arc::new(Required::new()) as Arc<dyn Rule>,
                Arc::new(Length::new(Some(8), Some(64))) as Arc<dyn Rule>,
            ],
        ),
    ]
}

fn render_form(title: &str, factory: &FieldFactory, form: &LoginForm) -> oxide_fields::Result<()> {
    println!("=== {title} ===");
    println!("{}", factory.error_summary(form)?.render()?);
    println!("{}", factory.text(form, "login")?.render()?);
    println!("{}", factory.password(form, "password")?.render()?);
    println!("{}", factory.checkbox(form, "remember_me")?.render()?);
    println!("{}", factory.submit_button(Some("Sign in")).render()?);
    println!();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let verbose = std::env::args().any(|arg| arg == "--verbose");
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = ConfigRegistry::new();
    registry.configure(
        [
            ("bootstrap5", FieldConfig::bootstrap5()),
            ("bulma", FieldConfig::bulma()),
        ],
        "bootstrap5",
    )?;
    info!(names = ?registry.names(), default = %registry.default_name(), "themes registered");

    let mut form = LoginForm {
        login: "admin".into(),
        password: "short".into(),
        remember_me: true,
        errors: FormErrors::new(),
    };

    for name in registry.names() {
        let factory = registry.factory(Some(&name))?;
        render_form(&name, &factory, &form)?;
    }

    let valid = validate_model(&mut form)?;
    info!(valid, "validated login form");

    let bootstrap = registry.factory(None)?;
    render_form("bootstrap5 (validated)", &bootstrap, &form)?;
    let bulma = registry.factory(Some("bulma"))?;
    render_form("bulma (validated)", &bulma, &form)?;

    Ok(())
}
