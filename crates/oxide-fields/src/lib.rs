//! # oxide-fields
//!
//! Server-side HTML form fields bound to model attributes.
//!
//! A field is created for one attribute of a [`FormModel`], configured with
//! chainable setters that each return a new field, and rendered to markup.
//! Values, labels, hints, placeholders and errors are read from the model;
//! validation rules declared by the model add input attributes such as
//! `required` and `maxlength`. Named themes ([`FieldConfig`]) supply CSS
//! classes and templates through a [`ConfigRegistry`].
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_fields::{FieldFactory, FieldConfig};
//! use oxide_fields_derive::FormModel;
//! use oxide_fields::validation::{Required, Rule};
//! use oxide_fields::model::RuleList;
//! use std::sync::Arc;
//!
//! #[derive(FormModel)]
//! #[form(name = "LoginForm", rules = login_rules)]
//! struct LoginForm {
//!     #[field(hint = "Write your id or email.")]
//!     login: String,
//!     #[field(errors)]
//!     errors: oxide_fields::FormErrors,
//! }
//!
//! fn login_rules(_: &LoginForm) -> RuleList {
//!     vec![("login".into(), vec![Arc::new(Required::new()) as Arc<dyn Rule>])]
//! }
//!
//! let form = LoginForm { login: "admin".into(), errors: Default::default() };
//! let html = FieldFactory::new(FieldConfig::default())
//!     .text(&form, "login")
//!     .unwrap()
//!     .render()
//!     .unwrap();
//!
//! assert_eq!(
//!     html,
//!     "<div>\n\
//!      <label for=\"loginform-login\">Login</label>\n\
//!      <input type=\"text\" id=\"loginform-login\" name=\"LoginForm[login]\" value=\"admin\" required>\n\
//!      <div>Write your id or email.</div>\n\
//!      </div>"
//! );
//! ```
//!
//! ## Themes
//!
//! ```rust
//! use oxide_fields::{ConfigRegistry, FieldConfig};
//!
//! let registry = ConfigRegistry::new();
//! registry
//!     .configure([("bootstrap5", FieldConfig::bootstrap5())], "bootstrap5")
//!     .unwrap();
//! let factory = registry.factory(None).unwrap();
//! assert_eq!(factory.config().input_class.as_deref(), Some("form-control"));
//! ```

extern crate self as oxide_fields;

pub mod config;
pub mod error;
pub mod factory;
pub mod fields;
pub mod html;
pub mod model;
pub mod path;
pub mod registry;
pub mod resolver;
pub mod rule_cache;
pub mod validation;

pub use config::FieldConfig;
pub use error::{FieldError, Result};
pub use factory::{BindingRequirement, FieldFactory, FieldKind};
pub use fields::{AttributeBinding, FormField, InputContext, InputWidget, ValidationState};
pub use html::{html_escape, AttrValue, HtmlAttributes, HtmlRenderer, MarkupRenderer};
pub use model::{FormErrors, FormModel};
pub use path::AttributePath;
pub use registry::{ConfigRegistry, Field};
pub use resolver::AttributeResolver;
pub use rule_cache::ValidationRuleCache;
pub use validation::{validate_model, Rule, RuleKind};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
