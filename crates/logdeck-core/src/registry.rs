//! Name-based lookup of drivers and formatters.
//!
//! Loggers and factories take drivers and formatters as live values; the
//! registry only exists so that names from configuration files or command
//! lines can be turned into those values.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::Arc;

use serde::Serialize;

use crate::driver::{ColorfulConsoleDriver, ConsoleDriver, SharedDriver};
use crate::error::RegistryError;
use crate::formatter::{JsonFormatter, SharedFormatter, TextFormatter};

/// Named drivers and formatters.
pub struct Registry<T: ?Sized + 'static = str> {
    drivers: HashMap<String, SharedDriver>,
    formatters: HashMap<String, SharedFormatter<T>>,
}

impl<T: ?Sized + 'static> Registry<T> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            drivers: HashMap::new(),
            formatters: HashMap::new(),
        }
    }

    /// Register a driver under `name`.
    ///
    /// # Errors
    /// [`RegistryError::DriverExists`] if the name is taken.
    pub fn register_driver(
        &mut self,
        name: impl Into<String>,
        driver: SharedDriver,
    ) -> Result<&mut Self, RegistryError> {
        let name = name.into();
        if self.drivers.contains_key(&name) {
            return Err(RegistryError::DriverExists(name));
        }
        tracing::debug!(driver = %name, "driver registered");
        self.drivers.insert(name, driver);
        Ok(self)
    }

    pub fn driver(&self, name: &str) -> Result<SharedDriver, RegistryError> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::DriverNotFound(name.to_string()))
    }

    pub fn has_driver(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Registered driver names, sorted.
    pub fn driver_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Register a formatter under `name`.
    ///
    /// # Errors
    /// [`RegistryError::FormatterExists`] if the name is taken.
    pub fn register_formatter(
        &mut self,
        name: impl Into<String>,
        formatter: SharedFormatter<T>,
    ) -> Result<&mut Self, RegistryError> {
        let name = name.into();
        if self.formatters.contains_key(&name) {
            return Err(RegistryError::FormatterExists(name));
        }
        tracing::debug!(formatter = %name, "formatter registered");
        self.formatters.insert(name, formatter);
        Ok(self)
    }

    pub fn formatter(&self, name: &str) -> Result<SharedFormatter<T>, RegistryError> {
        self.formatters
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::FormatterNotFound(name.to_string()))
    }

    pub fn has_formatter(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Registered formatter names, sorted.
    pub fn formatter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<T: Display + Serialize + ?Sized + 'static> Registry<T> {
    /// Registry holding the `console` and `colorful` drivers and the `text`
    /// and `json` formatters.
    pub fn with_builtins() -> Self {
        let mut drivers: HashMap<String, SharedDriver> = HashMap::new();
        drivers.insert("console".to_string(), Arc::new(ConsoleDriver::new()));
        drivers.insert("colorful".to_string(), Arc::new(ColorfulConsoleDriver::new()));

        let mut formatters: HashMap<String, SharedFormatter<T>> = HashMap::new();
        formatters.insert("text".to_string(), Arc::new(TextFormatter));
        formatters.insert("json".to_string(), Arc::new(JsonFormatter));

        Self { drivers, formatters }
    }
}

impl<T: ?Sized + 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("drivers", &self.driver_names())
            .field("formatters", &self.formatter_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MemoryDriver;

    #[test]
    fn test_builtins() {
        let registry = Registry::<str>::with_builtins();
        assert_eq!(registry.driver_names(), vec!["colorful", "console"]);
        assert_eq!(registry.formatter_names(), vec!["json", "text"]);
        assert!(registry.driver("console").is_ok());
        assert!(registry.formatter("json").is_ok());
    }

    #[test]
    fn test_duplicate_driver_rejected() {
        let mut registry = Registry::<str>::new();
        registry
            .register_driver("memory", Arc::new(MemoryDriver::new()))
            .unwrap();

        let err = registry
            .register_driver("memory", Arc::new(MemoryDriver::new()))
            .unwrap_err();
        assert_eq!(err, RegistryError::DriverExists("memory".to_string()));
        assert_eq!(err.to_string(), "The driver of name \"memory\" already exists");
    }

    #[test]
    fn test_missing_names() {
        let registry = Registry::<str>::new();
        assert!(!registry.has_driver("file"));
        assert_eq!(
            registry.driver("file").err(),
            Some(RegistryError::DriverNotFound("file".to_string()))
        );
        assert_eq!(
            registry.formatter("xml").err(),
            Some(RegistryError::FormatterNotFound("xml".to_string()))
        );
    }

    #[test]
    fn test_registered_driver_is_shared() {
        let driver: SharedDriver = Arc::new(MemoryDriver::new());
        let mut registry = Registry::<str>::new();
        registry.register_driver("memory", driver.clone()).unwrap();

        assert!(Arc::ptr_eq(&registry.driver("memory").unwrap(), &driver));
    }
}
