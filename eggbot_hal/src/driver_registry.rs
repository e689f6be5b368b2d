//! Driver registry.
//!
//! Maps driver names, as given on the command line, to the factories that
//! build them. The binary builds one registry at startup with
//! [`DriverRegistry::with_builtin_drivers`] and selects the machine backend
//! from it by name.

use crate::drivers;
use eggbot_common::hal::driver::{DriverFactory, HalDriver, HalError};
use std::collections::HashMap;

/// Name → factory table of machine backends.
pub struct DriverRegistry {
    factories: HashMap<&'static str, DriverFactory>,
}

impl DriverRegistry {
    /// Registry with no backends.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry holding every backend compiled into this crate.
    pub fn with_builtin_drivers() -> Self {
        let mut registry = Self::new();
        drivers::register_all_drivers(&mut registry);
        registry
    }

    /// Add a backend under `name`.
    ///
    /// # Panics
    /// Two backends under one name is a wiring bug, so this panics.
    pub fn register(&mut self, name: &'static str, factory: DriverFactory) {
        let previous = self.factories.insert(name, factory);
        assert!(previous.is_none(), "Driver '{name}' is already registered");
    }

    /// Factory registered under `name`.
    pub fn get_factory(&self, name: &str) -> Option<DriverFactory> {
        self.factories.get(name).copied()
    }

    /// Instantiate the backend called `name`, not yet initialised.
    ///
    /// # Errors
    /// `HalError::DriverNotFound` carrying the requested name.
    pub fn create_driver(&self, name: &str) -> Result<Box<dyn HalDriver>, HalError> {
        self.get_factory(name)
            .map(|factory| factory())
            .ok_or_else(|| HalError::DriverNotFound(name.to_string()))
    }

    /// Registered names in sorted order, for `--list`.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
