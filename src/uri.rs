//! URI decomposition for structured definitions.
//!
//! Values are parsed as RFC 3986 URI references, so relative references
//! such as `/var/run/app.sock` or `//cache.internal/0` are accepted.
//! Components are reported exactly as written: no case folding, no
//! percent-encoding, no dot-segment removal.
//!
//! A URI definition stores the raw text under its own name and each
//! component under `{prefix}_{component}`:
//!
//! | Field                  | Present                          |
//! |------------------------|----------------------------------|
//! | `{prefix}_scheme`      | always (empty if none)           |
//! | `{prefix}_host`        | always (empty if none)           |
//! | `{prefix}_path`        | always, without leading `/`      |
//! | `{prefix}_credentials` | when user-info is present        |
//! | `{prefix}_port`        | when a port number is written    |
//! | `{prefix}_query`       | when a query is present          |
//! | `{prefix}_fragment`    | when a fragment is present       |

use iri_string::types::UriReferenceStr;

use crate::definition::ResolvedSet;
use crate::error::{ConfigVarError, Result};

/// Parse `raw` and produce its component fields under `prefix`.
///
/// The raw text itself is not included; the definition adds it under its
/// own name. `key` is only used for error messages.
///
/// # Errors
///
/// Returns `InvalidValue` if `raw` is not a valid URI reference.
///
/// # Example
///
/// ```
/// use configvar::uri::decompose;
/// use configvar::Value;
///
/// let fields = decompose("https://api.example.com:8443/v1?debug=1", "API_URL", "api").unwrap();
/// assert_eq!(fields.get("api_host"), Some(&Value::from("api.example.com")));
/// assert_eq!(fields.get("api_port"), Some(&Value::Int(8443)));
/// assert_eq!(fields.get("api_path"), Some(&Value::from("v1")));
/// assert_eq!(fields.get("api_query"), Some(&Value::from("debug=1")));
/// assert_eq!(fields.get("api_credentials"), None);
/// ```
pub fn decompose(raw: &str, key: &str, prefix: &str) -> Result<ResolvedSet> {
    let invalid = || ConfigVarError::invalid(raw, key, "URI");
    let uri = UriReferenceStr::new(raw).map_err(|_| invalid())?;

    let field = |component: &str| format!("{}_{}", prefix, component);
    let authority = uri.authority_components();
    let path = uri.path_str();

    let mut fields = ResolvedSet::new();
    fields.insert(field("scheme"), uri.scheme_str().unwrap_or_default());
    fields.insert(field("host"), authority.as_ref().map_or("", |a| a.host()));
    fields.insert(field("path"), path.strip_prefix('/').unwrap_or(path));

    if let Some(userinfo) = authority.as_ref().and_then(|a| a.userinfo()) {
        fields.insert(field("credentials"), userinfo);
    }
    // `host:` carries an empty port, which is the same as no port.
    if let Some(port) = authority
        .as_ref()
        .and_then(|a| a.port())
        .filter(|port| !port.is_empty())
    {
        let port: i64 = port.parse().map_err(|_| invalid())?;
        fields.insert(field("port"), port);
    }
    if let Some(query) = uri.query_str() {
        fields.insert(field("query"), query);
    }
    if let Some(fragment) = uri.fragment_str() {
        fields.insert(field("fragment"), fragment);
    }

    Ok(fields)
}
