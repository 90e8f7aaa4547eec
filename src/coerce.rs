//! Text-to-type coercion rules for built-in definitions.
//!
//! These are the exact parsing rules applied to values found in a source.
//! They are public so custom resolvers can coerce the same way the built-in
//! definitions do.

use crate::error::{ConfigVarError, Result};

/// Parse a base-10 signed integer.
///
/// An optional leading `+` or `-` is accepted. Whitespace, digit separators
/// and radix prefixes are not.
///
/// # Example
///
/// ```
/// use configvar::coerce::parse_int;
///
/// assert_eq!(parse_int("8080", "PORT").unwrap(), 8080);
/// assert_eq!(parse_int("-1", "RETRIES").unwrap(), -1);
/// assert!(parse_int("eighty", "PORT").is_err());
/// ```
pub fn parse_int(raw: &str, key: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| ConfigVarError::invalid(raw, key, "integer"))
}

/// Parse a boolean.
///
/// Only `1`, `true`, `0` and `false` are accepted, compared
/// case-insensitively, so `TRUE` and `False` are valid while `yes` is not.
///
/// # Example
///
/// ```
/// use configvar::coerce::parse_bool;
///
/// assert!(parse_bool("TRUE", "ENABLED").unwrap());
/// assert!(!parse_bool("0", "ENABLED").unwrap());
/// assert!(parse_bool("yes", "ENABLED").is_err());
/// ```
pub fn parse_bool(raw: &str, key: &str) -> Result<bool> {
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigVarError::invalid(raw, key, "boolean"))
    }
}
