//! Configuration definitions and their resolvers.
//!
//! A [`Definition`] pairs a name with a resolver: a function from a
//! [`Source`] to a [`ResolvedSet`]. Built-in constructors cover required and
//! optional strings, integers and booleans, URIs, and caller-supplied custom
//! resolvers. Every built-in is a thin adapter over the same contract, so the
//! engine treats them all alike.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::coerce::{parse_bool, parse_int};
use crate::error::{ConfigVarError, Result};
use crate::source::Source;
use crate::uri;
use crate::value::Value;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Derive the environment key for a definition name.
///
/// # Example
///
/// ```
/// assert_eq!(configvar::definition::env_key("database_url"), "DATABASE_URL");
/// ```
pub fn env_key(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Check that `name` is an identifier usable as an environment key.
pub fn validate_name(name: &str) -> Result<()> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(ConfigVarError::InvalidName {
            name: name.to_string(),
        })
    }
}

/// The named values produced by a single resolver invocation.
///
/// Usually a single entry under the definition's own name. URI and custom
/// definitions may produce several, including names unrelated to their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSet {
    entries: BTreeMap<String, Value>,
}

impl ResolvedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding one entry.
    pub fn single(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut set = Self::new();
        set.insert(name, value);
        set
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an entry.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ResolvedSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for ResolvedSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl IntoIterator for ResolvedSet {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A stored resolver function.
pub type Resolver = Box<dyn Fn(&dyn Source) -> Result<ResolvedSet> + Send + Sync>;

/// The kind of definition, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    RequiredString,
    RequiredInt,
    RequiredBool,
    OptionalString,
    OptionalInt,
    OptionalBool,
    RequiredUri,
    Custom,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RequiredString => "required string",
            Self::RequiredInt => "required integer",
            Self::RequiredBool => "required boolean",
            Self::OptionalString => "optional string",
            Self::OptionalInt => "optional integer",
            Self::OptionalBool => "optional boolean",
            Self::RequiredUri => "required URI",
            Self::Custom => "custom",
        };
        write!(f, "{}", label)
    }
}

/// A named rule for producing configuration values from a source.
///
/// # Example
///
/// ```
/// use configvar::{Definition, Value};
///
/// let port = Definition::optional_int("port", Some(8080)).unwrap();
/// assert_eq!(port.key(), "PORT");
///
/// let resolved = port.resolve(&[("PORT", "9000")]).unwrap();
/// assert_eq!(resolved.get("port"), Some(&Value::Int(9000)));
/// ```
pub struct Definition {
    name: String,
    key: String,
    kind: DefinitionKind,
    resolver: Resolver,
}

impl Definition {
    fn build<F>(name: &str, kind: DefinitionKind, resolver: F) -> Result<Self>
    where
        F: Fn(&dyn Source) -> Result<ResolvedSet> + Send + Sync + 'static,
    {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            key: env_key(name),
            kind,
            resolver: Box::new(resolver),
        })
    }

    /// A single-value definition: looks up this definition's key and stores
    /// whatever `coerce` makes of it under the definition's name.
    fn keyed<F>(name: &str, kind: DefinitionKind, coerce: F) -> Result<Self>
    where
        F: Fn(Option<&str>, &str) -> Result<Value> + Send + Sync + 'static,
    {
        let owned = name.to_string();
        let key = env_key(name);
        Self::build(name, kind, move |source| {
            let value = coerce(source.get(&key), &key)?;
            Ok(ResolvedSet::single(owned.clone(), value))
        })
    }

    /// Text value; fails when the key is absent.
    pub fn required_string(name: &str) -> Result<Self> {
        Self::keyed(name, DefinitionKind::RequiredString, |raw, key| {
            let raw = raw.ok_or_else(|| ConfigVarError::missing(key))?;
            Ok(Value::from(raw))
        })
    }

    /// Base-10 integer; fails when the key is absent or not an integer.
    pub fn required_int(name: &str) -> Result<Self> {
        Self::keyed(name, DefinitionKind::RequiredInt, |raw, key| {
            let raw = raw.ok_or_else(|| ConfigVarError::missing(key))?;
            parse_int(raw, key).map(Value::Int)
        })
    }

    /// Boolean; fails when the key is absent or not one of `0/1/true/false`.
    pub fn required_bool(name: &str) -> Result<Self> {
        Self::keyed(name, DefinitionKind::RequiredBool, |raw, key| {
            let raw = raw.ok_or_else(|| ConfigVarError::missing(key))?;
            parse_bool(raw, key).map(Value::Bool)
        })
    }

    /// Text value with a default used when the key is absent.
    ///
    /// A `None` default resolves to [`Value::Absent`].
    pub fn optional_string(name: &str, default: Option<&str>) -> Result<Self> {
        let default = Value::from(default);
        Self::keyed(name, DefinitionKind::OptionalString, move |raw, _| {
            Ok(raw.map_or_else(|| default.clone(), Value::from))
        })
    }

    /// Integer with a default used when the key is absent.
    ///
    /// A present but malformed value still fails.
    pub fn optional_int(name: &str, default: Option<i64>) -> Result<Self> {
        Self::keyed(name, DefinitionKind::OptionalInt, move |raw, key| match raw {
            Some(raw) => parse_int(raw, key).map(Value::Int),
            None => Ok(Value::from(default)),
        })
    }

    /// Boolean with a default used when the key is absent.
    ///
    /// A present but malformed value still fails.
    pub fn optional_bool(name: &str, default: Option<bool>) -> Result<Self> {
        Self::keyed(name, DefinitionKind::OptionalBool, move |raw, key| match raw {
            Some(raw) => parse_bool(raw, key).map(Value::Bool),
            None => Ok(Value::from(default)),
        })
    }

    /// Required URI, stored raw under `name` and decomposed into
    /// `{prefix}_scheme`, `{prefix}_host`, `{prefix}_path` and friends.
    ///
    /// `prefix` defaults to `name`. See [`uri`](crate::uri) for the full list
    /// of fields.
    pub fn required_uri(name: &str, prefix: Option<&str>) -> Result<Self> {
        let prefix = match prefix {
            Some(prefix) => {
                validate_name(prefix)?;
                prefix.to_string()
            }
            None => name.to_string(),
        };
        let owned = name.to_string();
        let key = env_key(name);
        Self::build(name, DefinitionKind::RequiredUri, move |source| {
            let raw = source
                .get(&key)
                .ok_or_else(|| ConfigVarError::missing(&key))?;
            let mut fields = uri::decompose(raw, &key, &prefix)?;
            fields.insert(owned.clone(), raw);
            Ok(fields)
        })
    }

    /// Caller-supplied resolver returning any number of named values.
    ///
    /// The returned set is merged wholesale into the value table, so it may
    /// populate names other than `name`. The engine does not check the
    /// output. A resolver that cannot produce required data should fail with
    /// [`ConfigVarError::MissingRequiredValue`] or
    /// [`ConfigVarError::InvalidValue`], or any error of its own through
    /// [`ConfigVarError::Custom`].
    pub fn custom<F>(name: &str, resolver: F) -> Result<Self>
    where
        F: Fn(&dyn Source) -> Result<ResolvedSet> + Send + Sync + 'static,
    {
        Self::build(name, DefinitionKind::Custom, resolver)
    }

    /// Caller-supplied resolver returning a single value, stored under `name`.
    pub fn custom_value<F>(name: &str, resolver: F) -> Result<Self>
    where
        F: Fn(&dyn Source) -> Result<Value> + Send + Sync + 'static,
    {
        let owned = name.to_string();
        Self::build(name, DefinitionKind::Custom, move |source| {
            Ok(ResolvedSet::single(owned.clone(), resolver(source)?))
        })
    }

    /// The definition's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The environment key derived from the name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// What kind of definition this is.
    pub fn kind(&self) -> DefinitionKind {
        self.kind
    }

    /// Run the resolver against `source`.
    pub fn resolve(&self, source: &dyn Source) -> Result<ResolvedSet> {
        (self.resolver)(source)
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
