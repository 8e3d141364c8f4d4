//! Runtime Configuration
//!
//! Knobs that change how the component driver and the hook engine behave.
//! Everything has a default, so `RuntimeConfig::default()` is what most
//! callers want. The struct is serde-friendly and can be loaded from JSON:
//!
//! ```rust
//! use unreacted_core::{EffectDepsMode, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_json(r#"{ "effect_deps_mode": "once" }"#).unwrap();
//! assert_eq!(config.effect_deps_mode, EffectDepsMode::Once);
//! assert!(config.strict_hook_order);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How `use_effect` treats a call without a dependency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectDepsMode {
    /// No dependency list means "re-run after every render".
    #[default]
    EveryRender,

    /// No dependency list means "run after the first render only".
    Once,
}

/// Configuration for a [`Runtime`](crate::runtime::Runtime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Semantics of effects declared without dependencies.
    pub effect_deps_mode: EffectDepsMode,

    /// Fail a render whose hook count differs from the first render.
    pub strict_hook_order: bool,

    /// Upper bound on back-to-back renders of one container triggered by
    /// state changes made while it was rendering.
    pub max_rerenders: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            effect_deps_mode: EffectDepsMode::EveryRender,
            strict_hook_order: true,
            max_rerenders: 50,
        }
    }
}

impl RuntimeConfig {
    /// Parse and validate a configuration from JSON. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rerenders == 0 {
            return Err(ConfigError::Invalid {
                message: "max_rerenders must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Set how effects without a dependency list are scheduled.
    pub fn with_effect_deps_mode(mut self, mode: EffectDepsMode) -> Self {
        self.effect_deps_mode = mode;
        self
    }

    /// Make a changed hook count an error (`true`) or a warning.
    pub fn with_strict_hook_order(mut self, strict: bool) -> Self {
        self.strict_hook_order = strict;
        self
    }

    /// Set how many back-to-back renders one container may take.
    pub fn with_max_rerenders(mut self, limit: usize) -> Self {
        self.max_rerenders = limit;
        self
    }
}
