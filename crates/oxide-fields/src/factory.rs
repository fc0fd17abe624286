//! Field construction.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::trace;

use crate::config::FieldConfig;
use crate::error::{FieldError, Result};
use crate::fields::{AttributeBinding, FormField, InputWidget};
use crate::html::{HtmlRenderer, MarkupRenderer};
use crate::model::FormModel;
use crate::path::AttributePath;

/// Kinds of fields a factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Telephone,
    Url,
    Number,
    Range,
    Date,
    DateTime,
    DateTimeLocal,
    Hidden,
    Textarea,
    Checkbox,
    CheckboxList,
    RadioList,
    Select,
    File,
    Button,
    SubmitButton,
    ResetButton,
    ButtonGroup,
    Image,
    Fieldset,
    Label,
    Hint,
    Error,
    ErrorSummary,
    /// Input rendered by a caller-supplied [`InputWidget`](crate::InputWidget).
    Custom,
}

/// What a field kind must be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingRequirement {
    /// A model and one of its attributes.
    ModelAttribute,
    /// A model only.
    Model,
    /// Nothing; the field is built from options alone.
    None,
    /// A model and attribute when both are given, nothing otherwise.
    Optional,
}

impl FieldKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 28] = [
        Self::Text,
        Self::Email,
        Self::Password,
        Self::Telephone,
        Self::Url,
        Self::Number,
        Self::Range,
        Self::Date,
        Self::DateTime,
        Self::DateTimeLocal,
        Self::Hidden,
        Self::Textarea,
        Self::Checkbox,
        Self::CheckboxList,
        Self::RadioList,
        Self::Select,
        Self::File,
        Self::Button,
        Self::SubmitButton,
        Self::ResetButton,
        Self::ButtonGroup,
        Self::Image,
        Self::Fieldset,
        Self::Label,
        Self::Hint,
        Self::Error,
        Self::ErrorSummary,
        Self::Custom,
    ];

    /// Returns the name used in messages, e.g. `DateTimeLocal`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::Telephone => "Telephone",
            Self::Url => "Url",
            Self::Number => "Number",
            Self::Range => "Range",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::DateTimeLocal => "DateTimeLocal",
            Self::Hidden => "Hidden",
            Self::Textarea => "Textarea",
            Self::Checkbox => "Checkbox",
            Self::CheckboxList => "CheckboxList",
            Self::RadioList => "RadioList",
            Self::Select => "Select",
            Self::File => "File",
            Self::Button => "Button",
            Self::SubmitButton => "SubmitButton",
            Self::ResetButton => "ResetButton",
            Self::ButtonGroup => "ButtonGroup",
            Self::Image => "Image",
            Self::Fieldset => "Fieldset",
            Self::Label => "Label",
            Self::Hint => "Hint",
            Self::Error => "Error",
            Self::ErrorSummary => "ErrorSummary",
            Self::Custom => "Custom",
        }
    }

    pub const fn binding(self) -> BindingRequirement {
        match self {
            Self::ErrorSummary => BindingRequirement::Model,
            Self::Button
            | Self::SubmitButton
            | Self::ResetButton
            | Self::ButtonGroup
            | Self::Image
            | Self::Fieldset => BindingRequirement::None,
            Self::Custom => BindingRequirement::Optional,
            _ => BindingRequirement::ModelAttribute,
        }
    }

    /// Returns the `type` of the `<input>` this kind renders, if any.
    pub const fn input_type(self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Email => Some("email"),
            Self::Password => Some("password"),
            Self::Telephone => Some("tel"),
            Self::Url => Some("url"),
            Self::Number => Some("number"),
            Self::Range => Some("range"),
            Self::Date => Some("date"),
            Self::DateTime => Some("datetime"),
            Self::DateTimeLocal => Some("datetime-local"),
            Self::Hidden => Some("hidden"),
            Self::Checkbox => Some("checkbox"),
            Self::File => Some("file"),
            Self::Image => Some("image"),
            _ => None,
        }
    }

    /// Returns whether the kind holds free text (length and pattern apply).
    pub const fn is_text_like(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Email | Self::Password | Self::Telephone | Self::Url | Self::Textarea
        )
    }

    /// Returns whether the kind is a date or time input.
    pub const fn is_date_like(self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::DateTimeLocal)
    }

    /// Returns whether the kind holds a number.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Range)
    }

    pub const fn is_button(self) -> bool {
        matches!(self, Self::Button | Self::SubmitButton | Self::ResetButton)
    }

    /// Returns whether the kind renders one input per item.
    pub const fn is_list(self) -> bool {
        matches!(self, Self::CheckboxList | Self::RadioList)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = FieldError;

    /// Parses a kind name. Case, dashes and underscores are ignored, so
    /// `"datetime-local"`, `"dateTimeLocal"` and `"DateTimeLocal"` agree.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        let alias = match wanted.as_str() {
            "tel" => Some(Self::Telephone),
            "submit" => Some(Self::SubmitButton),
            "reset" => Some(Self::ResetButton),
            _ => None,
        };
        alias
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|kind| kind.name().to_lowercase() == wanted)
            })
            .ok_or_else(|| FieldError::UnknownFieldKind(s.to_string()))
    }
}

/// Builds fields with a configuration applied as defaults.
#[derive(Clone)]
pub struct FieldFactory {
    config: FieldConfig,
    renderer: Arc<dyn MarkupRenderer>,
}

impl fmt::Debug for FieldFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for FieldFactory {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

impl FieldFactory {
    /// Creates a factory rendering with [`HtmlRenderer`].
    pub fn new(config: FieldConfig) -> Self {
        Self::with_renderer(config, Arc::new(HtmlRenderer))
    }

    /// Creates a factory with a custom markup renderer.
    pub fn with_renderer(config: FieldConfig, renderer: Arc<dyn MarkupRenderer>) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Creates a field of `kind`.
    ///
    /// The factory configuration is applied first and `options` override
    /// it. Model-bound kinds need `model` (and `attribute`, except for the
    /// error summary); kinds without binding ignore both. A custom field is
    /// bound only when both are given and still needs
    /// [`FormField::widget`] before it renders.
    pub fn create<'a>(
        &self,
        kind: FieldKind,
        model: Option<&'a dyn FormModel>,
        attribute: Option<&str>,
        options: &FieldConfig,
    ) -> Result<FormField<'a>> {
        let config = self.config.merge(options);
        let binding = match kind.binding() {
            BindingRequirement::ModelAttribute => {
                let (Some(model), Some(attribute)) = (model, attribute) else {
                    return Err(FieldError::MissingBinding { kind });
                };
                Some(AttributeBinding::new(model, AttributePath::parse(attribute)?))
            }
            BindingRequirement::Model => {
                let Some(model) = model else {
                    return Err(FieldError::MissingBinding { kind });
                };
                Some(AttributeBinding::model_only(model))
            }
            BindingRequirement::None => None,
            BindingRequirement::Optional => match (model, attribute) {
                (Some(model), Some(attribute)) => {
                    Some(AttributeBinding::new(model, AttributePath::parse(attribute)?))
                }
                _ => None,
            },
        };

        trace!(
            kind = kind.name(),
            attribute = attribute.unwrap_or_default(),
            "created field"
        );
        Ok(FormField::new(kind, config, Arc::clone(&self.renderer), binding))
    }

    /// Creates a field from a kind name such as `"text"` or `"datetime-local"`.
    pub fn create_named<'a>(
        &self,
        kind: &str,
        model: Option<&'a dyn FormModel>,
        attribute: Option<&str>,
        options: &FieldConfig,
    ) -> Result<FormField<'a>> {
        self.create(kind.parse()?, model, attribute, options)
    }

    fn bound<'a>(
        &self,
        kind: FieldKind,
        model: &'a dyn FormModel,
        attribute: &str,
    ) -> Result<FormField<'a>> {
        self.create(kind, Some(model), Some(attribute), &FieldConfig::default())
    }

    pub fn text<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Text, model, attribute)
    }

    pub fn email<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Email, model, attribute)
    }

    pub fn password<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Password, model, attribute)
    }

    pub fn telephone<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Telephone, model, attribute)
    }

    pub fn url<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Url, model, attribute)
    }

    pub fn number<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Number, model, attribute)
    }

    pub fn range<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Range, model, attribute)
    }

    pub fn date<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Date, model, attribute)
    }

    pub fn date_time<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::DateTime, model, attribute)
    }

    pub fn date_time_local<'a>(
        &self,
        model: &'a dyn FormModel,
        attribute: &str,
    ) -> Result<FormField<'a>> {
        self.bound(FieldKind::DateTimeLocal, model, attribute)
    }

    pub fn hidden<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Hidden, model, attribute)
    }

    pub fn textarea<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Textarea, model, attribute)
    }

    pub fn checkbox<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Checkbox, model, attribute)
    }

    /// Creates a group of checkboxes, one per item, posting an array.
    pub fn checkbox_list<'a>(
        &self,
        model: &'a dyn FormModel,
        attribute: &str,
    ) -> Result<FormField<'a>> {
        self.bound(FieldKind::CheckboxList, model, attribute)
    }

    pub fn radio_list<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::RadioList, model, attribute)
    }

    pub fn select<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Select, model, attribute)
    }

    pub fn file<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::File, model, attribute)
    }

    pub fn label<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Label, model, attribute)
    }

    pub fn hint<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Hint, model, attribute)
    }

    pub fn error<'a>(&self, model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        self.bound(FieldKind::Error, model, attribute)
    }

    pub fn error_summary<'a>(&self, model: &'a dyn FormModel) -> Result<FormField<'a>> {
        self.create(FieldKind::ErrorSummary, Some(model), None, &FieldConfig::default())
    }

    /// Creates a field bound to `attribute` whose input `widget` renders.
    pub fn custom_input<'a, W>(
        &self,
        model: &'a dyn FormModel,
        attribute: &str,
        widget: W,
    ) -> Result<FormField<'a>>
    where
        W: InputWidget + 'static,
    {
        Ok(self.bound(FieldKind::Custom, model, attribute)?.widget(widget))
    }

    fn unbound(&self, kind: FieldKind, content: Option<&str>) -> FormField<'static> {
        let field = FormField::new(kind, self.config.clone(), Arc::clone(&self.renderer), None);
        match content {
            Some(content) => field.content(content),
            None => field,
        }
    }

    /// Creates a `<button type="button">`.
    pub fn button(&self, content: Option<&str>) -> FormField<'static> {
        self.unbound(FieldKind::Button, content)
    }

    pub fn submit_button(&self, content: Option<&str>) -> FormField<'static> {
        self.unbound(FieldKind::SubmitButton, content)
    }

    pub fn reset_button(&self, content: Option<&str>) -> FormField<'static> {
        self.unbound(FieldKind::ResetButton, content)
    }

    /// Creates an `<input type="image">` pointing at `src`.
    pub fn image(&self, src: Option<&str>) -> FormField<'static> {
        let field = self.unbound(FieldKind::Image, None);
        match src {
            Some(src) => field.src(src),
            None => field,
        }
    }

    pub fn fieldset(&self) -> FormField<'static> {
        self.unbound(FieldKind::Fieldset, None)
    }

    /// Creates an empty button group; see [`FormField::buttons`].
    pub fn button_group(&self) -> FormField<'static> {
        self.unbound(FieldKind::ButtonGroup, None)
    }

    /// Creates an unbound field whose markup `widget` renders inside the
    /// container.
    pub fn custom<W>(&self, widget: W) -> FormField<'static>
    where
        W: InputWidget + 'static,
    {
        self.unbound(FieldKind::Custom, None).widget(widget)
    }
}
