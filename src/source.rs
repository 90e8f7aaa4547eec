//! Key-value sources consulted during resolution.
//!
//! The resolution engine only needs something that maps uppercase keys to
//! text and can tell "absent" apart from "present but empty". That contract
//! is the [`Source`] trait. It is implemented for the standard map types,
//! for slices of pairs (handy in tests), and for [`SystemEnv`], a snapshot of
//! the process environment.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// A read-only mapping from environment keys to text values.
///
/// `get` must return `None` only when the key is absent. A key stored with
/// an empty value returns `Some("")`.
pub trait Source {
    /// Look up the value stored under `key`.
    fn get(&self, key: &str) -> Option<&str>;

    /// Check if `key` is present.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<T: Source + ?Sized> Source for &T {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }
}

impl<T: Source + ?Sized> Source for Box<T> {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }
}

impl<K, V, S> Source for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(AsRef::as_ref)
    }
}

impl<K, V> Source for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(AsRef::as_ref)
    }
}

// Pair lists: the last pair for a key wins, like repeated `insert`s.
impl<K: AsRef<str>, V: AsRef<str>> Source for [(K, V)] {
    fn get(&self, key: &str) -> Option<&str> {
        self.iter()
            .rev()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> Source for [(K, V); N] {
    fn get(&self, key: &str) -> Option<&str> {
        Source::get(self.as_slice(), key)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Source for Vec<(K, V)> {
    fn get(&self, key: &str) -> Option<&str> {
        Source::get(self.as_slice(), key)
    }
}

/// A snapshot of the process environment.
///
/// The engine never reads the process environment itself; callers capture
/// it explicitly and pass the snapshot to
/// [`Context::reload`](crate::Context::reload). Variables whose name or
/// value is not valid Unicode are skipped.
///
/// # Example
///
/// ```
/// use configvar::{Source, SystemEnv};
///
/// let env = SystemEnv::capture();
/// assert_eq!(env.get("CONFIGVAR_SURELY_UNSET_KEY"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SystemEnv {
    vars: HashMap<String, String>,
}

impl SystemEnv {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Number of captured variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Source for SystemEnv {
    fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Build a snapshot from explicit pairs, e.g. an environment fixture.
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SystemEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { vars }
    }
}
