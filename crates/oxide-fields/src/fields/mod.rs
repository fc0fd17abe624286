//! Field objects.
//!
//! One [`FormField`] type covers every [`FieldKind`](crate::FieldKind); the
//! kind selects the markup produced by [`FormField::render`].

mod attributes;
mod binding;
mod render;
mod widget;

pub use attributes::FormField;
pub use binding::{AttributeBinding, ValidationState};
pub use widget::{InputContext, InputWidget};
