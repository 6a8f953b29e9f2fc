//! JSON logging configuration.
//!
//! A configuration names the level set and an ordered list of rules. Each
//! rule is a [`LevelUpdate`] whose driver and formatter are given by
//! [`Registry`] name.
//!
//! ```json
//! {
//!   "levels": ["error", "warning", "info"],
//!   "rules": [
//!     { "enabled": false },
//!     { "levels": ["error"], "enabled": true, "trace_depth": 3 },
//!     { "levels": ["info"], "enabled": true, "formatter": "json" }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::driver::ConsoleDriver;
use crate::error::ConfigError;
use crate::factory::Factory;
use crate::formatter::TextFormatter;
use crate::level::LevelSet;
use crate::options::LevelUpdate;
use crate::registry::Registry;

/// Logging configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level names; the default levels when absent.
    pub levels: Option<Vec<String>>,

    /// Rules applied in order.
    pub rules: Vec<LevelRule>,
}

/// One partial update of level options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRule {
    /// Levels the rule applies to; empty means all.
    pub levels: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Negative values are treated as 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_depth: Option<i64>,

    /// Registry name of the formatter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,

    /// Registry name of the driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

impl LoggingConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = ?path, rules = config.rules.len(), "logging config loaded");
        Ok(config)
    }

    /// The configured level set.
    pub fn level_set(&self) -> Result<LevelSet, ConfigError> {
        match &self.levels {
            Some(levels) => Ok(LevelSet::new(levels)?),
            None => Ok(LevelSet::default()),
        }
    }

    /// Resolve every rule into an update.
    ///
    /// All names are looked up before anything is returned, so a missing
    /// driver or formatter leaves nothing half-applied.
    pub fn updates<T: ?Sized + 'static>(
        &self,
        registry: &Registry<T>,
    ) -> Result<Vec<LevelUpdate<T>>, ConfigError> {
        let levels = self.level_set()?;
        self.rules
            .iter()
            .map(|rule| {
                if !rule.levels.is_empty() && !rule.levels.iter().any(|l| levels.contains(l)) {
                    tracing::warn!(levels = ?rule.levels, "config rule names no known level");
                }
                rule.to_update(registry)
            })
            .collect()
    }

    /// Apply every rule to `factory`, in order.
    pub fn apply_to<T: ?Sized + 'static>(
        &self,
        factory: &mut Factory<T>,
        registry: &Registry<T>,
    ) -> Result<(), ConfigError> {
        for update in self.updates(registry)? {
            factory.set_level_options(update);
        }
        Ok(())
    }

    /// Create a factory for the configured levels and apply the rules.
    ///
    /// Defaults are the registry's `text` formatter (or [`TextFormatter`])
    /// and a new console driver.
    pub fn build_factory<T>(&self, registry: &Registry<T>) -> Result<Factory<T>, ConfigError>
    where
        T: std::fmt::Display + ?Sized + 'static,
    {
        let formatter = registry
            .formatter("text")
            .unwrap_or_else(|_| Arc::new(TextFormatter));
        let mut factory = Factory::with_defaults(self.level_set()?, formatter, Arc::new(ConsoleDriver::new()));
        self.apply_to(&mut factory, registry)?;
        Ok(factory)
    }
}

impl LevelRule {
    fn to_update<T: ?Sized + 'static>(&self, registry: &Registry<T>) -> Result<LevelUpdate<T>, ConfigError> {
        let mut update = LevelUpdate::new().levels(self.levels.iter().cloned());
        if let Some(enabled) = self.enabled {
            update = update.enabled(enabled);
        }
        if let Some(depth) = self.trace_depth {
            update = update.trace_depth(depth);
        }
        if let Some(name) = &self.formatter {
            update = update.formatter(registry.formatter(name)?);
        }
        if let Some(name) = &self.driver {
            update = update.driver(registry.driver(name)?);
        }
        Ok(update)
    }
}
