//! Registry of resource names that must never be exposed over REST.

use tracing::debug;

/// Ordered, duplicate-free set of excluded resource names.
///
/// Filled once at startup from `rest.excluded_models` and read-only after
/// that. Insertion order is preserved so listings are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedModels {
    names: Vec<String>,
}

impl ExcludedModels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a single resource. Adding a name twice keeps one entry.
    pub fn exclude_model(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.contains(&name) {
            return;
        }
        debug!(model = %name, "Resource excluded from REST exposure");
        self.names.push(name);
    }

    /// Exclude several resources, skipping names already present.
    pub fn exclude_models<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.exclude_model(name);
        }
    }

    /// Current exclusions in insertion order.
    #[must_use]
    pub fn excluded_models(&self) -> &[String] {
        &self.names
    }

    /// Whether `name` is excluded (exact, case-sensitive match).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExcludedModels {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut models = Self::new();
        models.exclude_models(iter);
        models
    }
}
