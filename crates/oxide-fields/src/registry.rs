//! Named theme configurations and their factories.
//!
//! A [`ConfigRegistry`] maps configuration names to [`FieldConfig`]s and
//! builds one [`FieldFactory`] per name on first use. A `default` entry
//! always exists. Applications usually pass a registry explicitly; the
//! process-wide instance behind [`global`] and the [`Field`] shortcuts is
//! configured once at startup and read afterwards.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::config::FieldConfig;
use crate::error::{FieldError, Result};
use crate::factory::{FieldFactory, FieldKind};
use crate::fields::{FormField, InputWidget};
use crate::html::{HtmlRenderer, MarkupRenderer};
use crate::model::FormModel;

/// Name of the built-in configuration.
pub const DEFAULT_CONFIG: &str = "default";

struct RegistryState {
    configs: HashMap<String, FieldConfig>,
    default_name: String,
    factories: HashMap<String, Arc<FieldFactory>>,
}

/// Store of named configurations with a cached factory per name.
pub struct ConfigRegistry {
    state: Mutex<RegistryState>,
    renderer: Arc<dyn MarkupRenderer>,
}

impl std::fmt::Debug for ConfigRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ConfigRegistry")
            .field("configs", &state.configs)
            .field("default_name", &state.default_name)
            .field("factories", &state.factories.len())
            .finish()
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigRegistry {
    /// Creates a registry holding only the empty `default` configuration.
    pub fn new() -> Self {
        Self::with_renderer(Arc::new(HtmlRenderer))
    }

    /// Creates a registry whose factories render with `renderer`.
    pub fn with_renderer(renderer: Arc<dyn MarkupRenderer>) -> Self {
        let mut configs = HashMap::new();
        configs.insert(DEFAULT_CONFIG.to_string(), FieldConfig::default());
        Self {
            state: Mutex::new(RegistryState {
                configs,
                default_name: DEFAULT_CONFIG.to_string(),
                factories: HashMap::new(),
            }),
            renderer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds or replaces named configurations and selects the default name.
    ///
    /// Existing entries not named in `configs` are kept, and so are their
    /// cached factories. Fails with [`FieldError::UnknownConfiguration`],
    /// leaving the registry untouched, if `default_name` would not be
    /// registered.
    pub fn configure<I, S>(&self, configs: I, default_name: &str) -> Result<()>
    where
        I: IntoIterator<Item = (S, FieldConfig)>,
        S: Into<String>,
    {
        let configs: Vec<(String, FieldConfig)> = configs
            .into_iter()
            .map(|(name, config)| (name.into(), config))
            .collect();

        let mut state = self.lock();
        let known = state.configs.contains_key(default_name)
            || configs.iter().any(|(name, _)| name == default_name);
        if !known {
            return Err(FieldError::UnknownConfiguration(default_name.to_string()));
        }

        for (name, config) in configs {
            debug!(name = %name, "registered field configuration");
            state.factories.remove(&name);
            state.configs.insert(name, config);
        }
        state.default_name = default_name.to_string();
        Ok(())
    }

    /// Parses configurations from a JSON object keyed by name, e.g.
    /// `{"bulma": {"containerClass": "field"}}`, then calls
    /// [`configure`](Self::configure).
    pub fn configure_json(&self, json: &str, default_name: &str) -> Result<()> {
        let configs: HashMap<String, FieldConfig> = serde_json::from_str(json)
            .map_err(|e| FieldError::InvalidConfiguration(e.to_string()))?;
        self.configure(configs, default_name)
    }

    /// Returns the factory of `name`, or of the default name.
    ///
    /// The factory is built on first request and the same instance is
    /// returned afterwards.
    pub fn factory(&self, name: Option<&str>) -> Result<Arc<FieldFactory>> {
        let mut state = self.lock();
        let name = name.unwrap_or(&state.default_name).to_string();

        if let Some(factory) = state.factories.get(&name) {
            return Ok(Arc::clone(factory));
        }

        let config = state
            .configs
            .get(&name)
            .cloned()
            .ok_or_else(|| FieldError::UnknownConfiguration(name.clone()))?;
        let factory = Arc::new(FieldFactory::with_renderer(config, Arc::clone(&self.renderer)));
        debug!(name = %name, "built field factory");
        state.factories.insert(name, Arc::clone(&factory));
        Ok(factory)
    }

    pub fn default_name(&self) -> String {
        self.lock().default_name.clone()
    }

    /// Returns the registered configuration names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().configs.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns a copy of a registered configuration.
    pub fn config(&self, name: &str) -> Option<FieldConfig> {
        self.lock().configs.get(name).cloned()
    }
}

static GLOBAL: LazyLock<ConfigRegistry> = LazyLock::new(ConfigRegistry::new);

/// Returns the process-wide registry.
pub fn global() -> &'static ConfigRegistry {
    &GLOBAL
}

/// Shortcuts creating fields through the default factory of [`global`].
///
/// ```
/// use oxide_fields::{registry, Field, FieldConfig};
///
/// registry::global()
///     .configure([("bootstrap5", FieldConfig::bootstrap5())], "default")
///     .unwrap();
/// let html = Field::submit_button(Some("Send")).unwrap().render().unwrap();
/// assert_eq!(html, "<div>\n<button type=\"submit\">Send</button>\n</div>");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Field;

impl Field {
    /// Returns the factory of `name`, or the default one.
    pub fn factory(name: Option<&str>) -> Result<Arc<FieldFactory>> {
        global().factory(name)
    }

    /// Creates any kind of field through the default factory.
    pub fn create<'a>(
        kind: FieldKind,
        model: Option<&'a dyn FormModel>,
        attribute: Option<&str>,
        options: &FieldConfig,
    ) -> Result<FormField<'a>> {
        Self::factory(None)?.create(kind, model, attribute, options)
    }

    pub fn text<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.text(model, attribute)
    }

    pub fn email<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.email(model, attribute)
    }

    pub fn password<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.password(model, attribute)
    }

    pub fn telephone<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.telephone(model, attribute)
    }

    pub fn url<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.url(model, attribute)
    }

    pub fn number<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.number(model, attribute)
    }

    pub fn range<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.range(model, attribute)
    }

    pub fn date<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.date(model, attribute)
    }

    pub fn date_time<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.date_time(model, attribute)
    }

    pub fn date_time_local<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.date_time_local(model, attribute)
    }

    pub fn hidden<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.hidden(model, attribute)
    }

    pub fn textarea<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.textarea(model, attribute)
    }

    pub fn checkbox<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.checkbox(model, attribute)
    }

    pub fn checkbox_list<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.checkbox_list(model, attribute)
    }

    pub fn radio_list<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.radio_list(model, attribute)
    }

    pub fn select<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.select(model, attribute)
    }

    pub fn file<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.file(model, attribute)
    }

    pub fn label<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.label(model, attribute)
    }

    pub fn hint<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.hint(model, attribute)
    }

    pub fn error<'a>(model: &'a dyn FormModel, attribute: &str) -> Result<FormField<'a>> {
        Self::factory(None)?.error(model, attribute)
    }

    pub fn error_summary(model: &dyn FormModel) -> Result<FormField<'_>> {
        Self::factory(None)?.error_summary(model)
    }

    pub fn button(content: Option<&str>) -> Result<FormField<'static>> {
        Ok(Self::factory(None)?.button(content))
    }

    pub fn submit_button(content: Option<&str>) -> Result<FormField<'static>> {
        Ok(Self::factory(None)?.submit_button(content))
    }

    pub fn reset_button(content: Option<&str>) -> Result<FormField<'static>> {
        Ok(Self::factory(None)?.reset_button(content))
    }

    pub fn image(src: Option<&str>) -> Result<FormField<'static>> {
        Ok(Self::factory(None)?.image(src))
    }

    pub fn fieldset() -> Result<FormField<'static>> {
        Ok(Self::factory(None)?.fieldset())
    }

    pub fn button_group() -> Result<FormField<'static>> {
        Ok(Self::factory(None)?.button_group())
    }

    pub fn custom_input<'a, W>(
        model: &'a dyn FormModel,
        attribute: &str,
        widget: W,
    ) -> Result<FormField<'a>>
    where
        W: InputWidget + 'static,
    {
        Self::factory(None)?.custom_input(model, attribute, widget)
    }

    pub fn custom<W>(widget: W) -> Result<FormField<'static>>
    where
        W: InputWidget + 'static,
    {
        Ok(Self::factory(None)?.custom(widget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_always_exists() {
        let registry = ConfigRegistry::new();
        assert_eq!(registry.names(), ["default"]);
        assert_eq!(registry.default_name(), "default");
        assert!(registry.factory(None).is_ok());
        assert!(registry.factory(Some("default")).is_ok());
    }

    #[test]
    fn test_factory_is_cached() {
        let registry = ConfigRegistry::new();
        registry
            .configure([("bulma", FieldConfig::bulma())], "default")
            .unwrap();
        let a = registry.factory(Some("bulma")).unwrap();
        let b = registry.factory(Some("bulma")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.config().container_class.as_deref(), Some("field"));
    }

    #[test]
    fn test_unknown_configuration() {
        let registry = ConfigRegistry::new();
        for _ in 0..2 {
            let err = registry.factory(Some("theme-x")).unwrap_err();
            assert_eq!(err, FieldError::UnknownConfiguration("theme-x".to_string()));
            assert!(err.to_string().contains("theme-x"));
        }
    }

    #[test]
    fn test_configure_merges_and_switches_default() {
        let registry = ConfigRegistry::new();
        registry
            .configure([("bulma", FieldConfig::bulma())], "default")
            .unwrap();
        let bulma = registry.factory(Some("bulma")).unwrap();
        let default = registry.factory(None).unwrap();

        registry
            .configure([("bootstrap5", FieldConfig::bootstrap5())], "bootstrap5")
            .unwrap();

        assert_eq!(registry.names(), ["bootstrap5", "bulma", "default"]);
        assert!(Arc::ptr_eq(&bulma, &registry.factory(Some("bulma")).unwrap()));
        assert!(Arc::ptr_eq(&default, &registry.factory(Some("default")).unwrap()));
        let current = registry.factory(None).unwrap();
        assert_eq!(current.config().container_class.as_deref(), Some("mb-3"));
    }

    #[test]
    fn test_reconfigured_name_gets_new_factory() {
        let registry = ConfigRegistry::new();
        registry
            .configure([("theme", FieldConfig::bulma())], "default")
            .unwrap();
        let before = registry.factory(Some("theme")).unwrap();
        registry
            .configure([("theme", FieldConfig::bootstrap5())], "default")
            .unwrap();
        let after = registry.factory(Some("theme")).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.config().container_class.as_deref(), Some("mb-3"));
    }

    #[test]
    fn test_unknown_default_name_is_rejected() {
        let registry = ConfigRegistry::new();
        let err = registry
            .configure([("bulma", FieldConfig::bulma())], "missing")
            .unwrap_err();
        assert_eq!(err, FieldError::UnknownConfiguration("missing".to_string()));
        assert_eq!(registry.names(), ["default"]);
        assert_eq!(registry.default_name(), "default");
    }

    #[test]
    fn test_configure_json() {
        let registry = ConfigRegistry::new();
        registry
            .configure_json(
                r#"{"compact": {"useContainer": false, "inputClass": "in"}}"#,
                "compact",
            )
            .unwrap();
        let factory = registry.factory(None).unwrap();
        assert!(!factory.config().uses_container());
        assert!(matches!(
            registry.configure_json("{not json", "default"),
            Err(FieldError::InvalidConfiguration(_))
        ));
    }
}
