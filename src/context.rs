//! The resolution context.
//!
//! A [`Context`] combines a [`DefinitionRegistry`] with the value table
//! produced by the most recent [`reload`](Context::reload). Definitions are
//! registered once; `reload` may be called any number of times against
//! different sources.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{debug, trace, warn};

use crate::definition::{Definition, ResolvedSet};
use crate::error::{ConfigVarError, Result};
use crate::registry::DefinitionRegistry;
use crate::source::Source;
use crate::value::Value;

/// Registered definitions plus their currently resolved values.
///
/// # Example
///
/// ```
/// use configvar::Context;
///
/// let mut config = Context::new();
/// config.register_required_string("database_url").unwrap();
/// config.register_optional_int("port", Some(8080)).unwrap();
///
/// config.reload(&[("DATABASE_URL", "postgres:///example")]).unwrap();
///
/// assert_eq!(config.get_str("database_url").unwrap(), "postgres:///example");
/// assert_eq!(config.get_int("port").unwrap(), 8080);
/// ```
#[derive(Default)]
pub struct Context {
    registry: DefinitionRegistry,
    values: HashMap<String, Value>,
}

impl Context {
    /// Create a context with no definitions and no values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a block of registrations and resolve it once.
    ///
    /// # Example
    ///
    /// ```
    /// use configvar::{Context, SystemEnv};
    ///
    /// let config = Context::define(&SystemEnv::capture(), |c| {
    ///     c.register_optional_string("configvar_doc_name", Some("Bob"))?;
    ///     c.register_optional_bool("configvar_doc_friendly", Some(true))?;
    ///     Ok(())
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.get_str("configvar_doc_name").unwrap(), "Bob");
    /// ```
    pub fn define<F>(source: &dyn Source, register: F) -> Result<Self>
    where
        F: FnOnce(&mut Context) -> Result<()>,
    {
        let mut context = Self::new();
        register(&mut context)?;
        context.reload(source)?;
        Ok(context)
    }

    /// Register a prepared definition.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDefinition` if the name is already registered.
    pub fn register(&mut self, definition: Definition) -> Result<()> {
        self.registry.register(definition)
    }

    /// Register a required string. See [`Definition::required_string`].
    pub fn register_required_string(&mut self, name: &str) -> Result<()> {
        self.register(Definition::required_string(name)?)
    }

    /// Register a required integer. See [`Definition::required_int`].
    pub fn register_required_int(&mut self, name: &str) -> Result<()> {
        self.register(Definition::required_int(name)?)
    }

    /// Register a required boolean. See [`Definition::required_bool`].
    pub fn register_required_bool(&mut self, name: &str) -> Result<()> {
        self.register(Definition::required_bool(name)?)
    }

    /// Register an optional string. See [`Definition::optional_string`].
    pub fn register_optional_string(&mut self, name: &str, default: Option<&str>) -> Result<()> {
        self.register(Definition::optional_string(name, default)?)
    }

    /// Register an optional integer. See [`Definition::optional_int`].
    pub fn register_optional_int(&mut self, name: &str, default: Option<i64>) -> Result<()> {
        self.register(Definition::optional_int(name, default)?)
    }

    /// Register an optional boolean. See [`Definition::optional_bool`].
    pub fn register_optional_bool(&mut self, name: &str, default: Option<bool>) -> Result<()> {
        self.register(Definition::optional_bool(name, default)?)
    }

    /// Register a required URI. See [`Definition::required_uri`].
    pub fn register_required_uri(&mut self, name: &str, prefix: Option<&str>) -> Result<()> {
        self.register(Definition::required_uri(name, prefix)?)
    }

    /// Register a custom multi-value resolver. See [`Definition::custom`].
    pub fn register_custom<F>(&mut self, name: &str, resolver: F) -> Result<()>
    where
        F: Fn(&dyn Source) -> Result<ResolvedSet> + Send + Sync + 'static,
    {
        self.register(Definition::custom(name, resolver)?)
    }

    /// Register a custom single-value resolver. See
    /// [`Definition::custom_value`].
    pub fn register_custom_value<F>(&mut self, name: &str, resolver: F) -> Result<()>
    where
        F: Fn(&dyn Source) -> Result<Value> + Send + Sync + 'static,
    {
        self.register(Definition::custom_value(name, resolver)?)
    }

    /// Resolve every definition against `source`.
    ///
    /// Definitions run in registration order and their outputs are merged
    /// into a fresh value table; when two definitions produce the same name
    /// the later one wins.
    ///
    /// # Errors
    ///
    /// Returns the first resolver failure. The table is cleared before
    /// resolution starts and filled as each definition succeeds, so after a
    /// failure it holds exactly the values produced by the definitions
    /// registered before the failing one. Nothing from an earlier `reload`
    /// survives.
    pub fn reload(&mut self, source: &dyn Source) -> Result<()> {
        self.values.clear();
        debug!(
            "Resolving {} configuration definitions",
            self.registry.len()
        );

        for definition in self.registry.iter() {
            let resolved = match definition.resolve(source) {
                Ok(resolved) => resolved,
                Err(e) => {
                    warn!(
                        "Resolution stopped at '{}' ({})",
                        definition.name(),
                        definition.key()
                    );
                    return Err(e);
                }
            };
            trace!(
                "Resolved '{}' into {} value(s)",
                definition.name(),
                resolved.len()
            );
            self.values.extend(resolved);
        }

        debug!("Resolved {} configuration values", self.values.len());
        Ok(())
    }

    /// Read a resolved value by name.
    ///
    /// Never triggers resolution.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchValue` if the current table has no entry for `name`.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| ConfigVarError::NoSuchValue {
                name: name.to_string(),
            })
    }

    /// Read a string value.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        let value = self.get(name)?;
        value.as_str().ok_or_else(|| mismatch(name, "string", value))
    }

    /// Read an integer value.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        let value = self.get(name)?;
        value.as_int().ok_or_else(|| mismatch(name, "integer", value))
    }

    /// Read a boolean value.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        let value = self.get(name)?;
        value.as_bool().ok_or_else(|| mismatch(name, "boolean", value))
    }

    /// Read a string value that may have resolved to [`Value::Absent`].
    pub fn get_opt_str(&self, name: &str) -> Result<Option<&str>> {
        match self.get(name)? {
            Value::Absent => Ok(None),
            value => value
                .as_str()
                .map(Some)
                .ok_or_else(|| mismatch(name, "string", value)),
        }
    }

    /// Read an integer value that may have resolved to [`Value::Absent`].
    pub fn get_opt_int(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name)? {
            Value::Absent => Ok(None),
            value => value
                .as_int()
                .map(Some)
                .ok_or_else(|| mismatch(name, "integer", value)),
        }
    }

    /// Read a boolean value that may have resolved to [`Value::Absent`].
    pub fn get_opt_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.get(name)? {
            Value::Absent => Ok(None),
            value => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| mismatch(name, "boolean", value)),
        }
    }

    /// Check whether a resolved entry exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no values are resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over resolved entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries.into_iter()
    }

    /// Registered definitions, in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.registry.iter()
    }

    /// Copy of the resolved values, sorted by name.
    ///
    /// The snapshot serializes to a flat JSON object.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

fn mismatch(name: &str, expected: &'static str, found: &Value) -> ConfigVarError {
    ConfigVarError::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.type_name(),
    }
}

// Values are left out: configuration commonly carries credentials.
impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Context")
            .field("registry", &self.registry)
            .field("values", &names)
            .finish()
    }
}
