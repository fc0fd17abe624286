//! Per-binding memo of normalized validation rules.

use std::sync::{Arc, OnceLock};

use crate::model::FormModel;
use crate::validation::{Rule, RuleMap};

/// Lazily normalizes a model's rules on first use and keeps them.
///
/// A cache belongs to one field binding. Rebinding a field to another model
/// starts from an empty cache; clones share nothing after the clone.
#[derive(Debug, Clone, Default)]
pub struct ValidationRuleCache {
    rules: OnceLock<RuleMap>,
}

impl ValidationRuleCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rules of `attribute`, normalizing the model's rules on
    /// the first call.
    ///
    /// The cache assumes every call passes the model it was created for.
    pub fn rules_for(&self, model: &dyn FormModel, attribute: &str) -> &[Arc<dyn Rule>] {
        self.rules
            .get_or_init(|| RuleMap::normalize(model))
            .get(attribute)
    }

    /// Returns whether the rules have been normalized already.
    pub fn is_primed(&self) -> bool {
        self.rules.get().is_some()
    }
}
