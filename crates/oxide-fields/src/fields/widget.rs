//! Caller-defined inputs.
//!
//! A [`FieldKind::Custom`](crate::FieldKind::Custom) field renders its input
//! through an [`InputWidget`]. Bound custom fields still get the label,
//! hint, error and container of the active configuration.
//!
//! ```
//! use oxide_fields::{FieldFactory, InputContext, Result};
//!
//! let stars = FieldFactory::default().custom(|input: &InputContext<'_>| -> Result<String> {
//!     Ok(input.renderer.tag("span", input.attributes, Some("*****")))
//! });
//! assert_eq!(stars.render().unwrap(), "<div>\n<span>*****</span>\n</div>");
//! ```

use serde_json::Value;

use crate::error::Result;
use crate::html::{HtmlAttributes, MarkupRenderer};

/// Data a widget renders from.
#[derive(Clone, Copy)]
pub struct InputContext<'r> {
    /// The input `name`, for bound fields.
    pub name: Option<&'r str>,
    /// The attribute value, for bound fields.
    pub value: Option<&'r Value>,
    /// Caller-set attributes plus, for bound fields, the id, theme classes
    /// and rule-derived attributes.
    pub attributes: &'r HtmlAttributes,
    pub renderer: &'r dyn MarkupRenderer,
}

/// Renders the input element of a custom field.
pub trait InputWidget: Send + Sync {
    fn render(&self, input: &InputContext<'_>) -> Result<String>;
}

impl<F> InputWidget for F
where
    F: Fn(&InputContext<'_>) -> Result<String> + Send + Sync,
{
    fn render(&self, input: &InputContext<'_>) -> Result<String> {
        self(input)
    }
}
