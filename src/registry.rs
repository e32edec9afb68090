//! Resource name → controller factory map.
//!
//! Resource names arrive from the URL in underscore_case and are looked up in
//! PascalCase (`user_profile` → `UserProfile`). Names are validated when a
//! factory is registered so a bad registration fails at startup instead of
//! silently resolving to the sentinel on every request.

use crate::controller::{Controller, NoneController, ResolvedController};
use crate::exclusions::ExcludedModels;
use crate::request::RestRequest;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds a fresh controller for one request.
pub type ControllerFactory = Arc<dyn Fn(&RestRequest) -> Box<dyn Controller> + Send + Sync>;

/// Convert an underscore_case resource name to its PascalCase class name.
///
/// Each `_`-separated segment gets its first character upper-cased; the rest
/// of the segment is left as-is.
///
/// ```
/// use restgate::registry::resource_class_name;
///
/// assert_eq!(resource_class_name("user_profile"), "UserProfile");
/// assert_eq!(resource_class_name("user"), "User");
/// ```
#[must_use]
pub fn resource_class_name(name: &str) -> String {
    name.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Registration failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The resource name is empty
    Empty,
    /// The name is not a PascalCase identifier
    NotPascalCase {
        /// The rejected name
        name: String,
    },
    /// A factory is already registered under this name
    Duplicate {
        /// The rejected name
        name: String,
    },
    /// The resource is excluded from REST exposure
    Excluded {
        /// The rejected name
        name: String,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::Empty => write!(f, "Controller registration error: empty resource name"),
            RegistrationError::NotPascalCase { name } => write!(
                f,
                "Controller registration error: '{name}' is not a PascalCase resource name \
                (expected e.g. UserProfile)"
            ),
            RegistrationError::Duplicate { name } => write!(
                f,
                "Controller registration error: resource '{name}' is already registered"
            ),
            RegistrationError::Excluded { name } => write!(
                f,
                "Controller registration error: resource '{name}' is excluded from REST exposure"
            ),
        }
    }
}

impl std::error::Error for RegistrationError {}

fn is_pascal_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Maps PascalCase resource names to controller factories.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
    excluded: ExcludedModels,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a PascalCase resource name.
    ///
    /// # Errors
    ///
    /// Rejects empty, non-PascalCase, duplicate and excluded names.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), RegistrationError>
    where
        F: Fn(&RestRequest) -> Box<dyn Controller> + Send + Sync + 'static,
    {
        if name.is_empty() {
            return Err(RegistrationError::Empty);
        }
        if !is_pascal_case(name) {
            return Err(RegistrationError::NotPascalCase {
                name: name.to_string(),
            });
        }
        if self.excluded.contains(name) {
            return Err(RegistrationError::Excluded {
                name: name.to_string(),
            });
        }
        if self.factories.contains_key(name) {
            return Err(RegistrationError::Duplicate {
                name: name.to_string(),
            });
        }
        info!(resource = %name, "Controller registered");
        self.factories.insert(name.to_string(), Arc::new(factory));
        Ok(())
    }

    /// Builder-style variant of [`ControllerRegistry::register`].
    ///
    /// # Errors
    ///
    /// See [`ControllerRegistry::register`].
    pub fn with<F>(mut self, name: &str, factory: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&RestRequest) -> Box<dyn Controller> + Send + Sync + 'static,
    {
        self.register(name, factory)?;
        Ok(self)
    }

    /// Exclusions consulted by registration and resolution.
    #[must_use]
    pub fn exclusions(&self) -> &ExcludedModels {
        &self.excluded
    }

    /// Mutable access to the exclusions, for startup configuration.
    pub fn exclusions_mut(&mut self) -> &mut ExcludedModels {
        &mut self.excluded
    }

    /// Whether a PascalCase resource name is registered and not excluded.
    #[must_use]
    pub fn is_exposed(&self, class_name: &str) -> bool {
        self.factories.contains_key(class_name) && !self.excluded.contains(class_name)
    }

    /// Registered resource names, sorted.
    #[must_use]
    pub fn resources(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Resolve the request's resource to a controller instance.
    ///
    /// Unknown and excluded resources yield the sentinel; resolution never
    /// fails.
    #[must_use]
    pub fn resolve(&self, request: &RestRequest) -> ResolvedController {
        let class_name = resource_class_name(&request.controller);
        if self.excluded.contains(&class_name) {
            debug!(resource = %class_name, "Excluded resource resolved to sentinel");
            return ResolvedController::Sentinel(NoneController::new(class_name));
        }
        match self.factories.get(&class_name) {
            Some(factory) => ResolvedController::Resource(factory(request)),
            None => {
                debug!(resource = %class_name, "Unknown resource resolved to sentinel");
                ResolvedController::Sentinel(NoneController::new(class_name))
            }
        }
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("resources", &self.resources())
            .field("excluded", &self.excluded.excluded_models())
            .finish()
    }
}
