//! Definition registry.
//!
//! The [`DefinitionRegistry`] owns every registered [`Definition`] in
//! registration order and enforces name uniqueness.

use std::collections::HashSet;

use crate::definition::Definition;
use crate::error::{ConfigVarError, Result};

/// Ordered collection of definitions with unique names.
///
/// Uniqueness is checked on the environment key, so `port` and `Port` are
/// the same definition.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    definitions: Vec<Definition>,
    keys: HashSet<String>,
}

impl DefinitionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDefinition` if a definition with the same key is
    /// already registered. The registry is unchanged in that case.
    pub fn register(&mut self, definition: Definition) -> Result<()> {
        if !self.keys.insert(definition.key().to_string()) {
            return Err(ConfigVarError::DuplicateDefinition {
                key: definition.key().to_string(),
            });
        }
        tracing::debug!(
            "Registered {} definition '{}'",
            definition.kind(),
            definition.name()
        );
        self.definitions.push(definition);
        Ok(())
    }

    /// Check whether a name is already taken.
    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&crate::definition::env_key(name))
    }

    /// Iterate over definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    /// Get the number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
