//! Partial-reload directives parsed from request headers.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::request::Headers;

/// Protocol header names.
pub mod header_names {
    /// Marks a request from the client-side adapter expecting a JSON page object.
    pub const X_INERTIA: &str = "X-Inertia";
    /// Asset version the client currently holds.
    pub const X_INERTIA_VERSION: &str = "X-Inertia-Version";
    /// Component a partial reload targets.
    pub const X_INERTIA_PARTIAL_COMPONENT: &str = "X-Inertia-Partial-Component";
    /// Comma-separated keys to include on a partial reload.
    pub const X_INERTIA_PARTIAL_DATA: &str = "X-Inertia-Partial-Data";
    /// Comma-separated keys to exclude on a partial reload.
    pub const X_INERTIA_PARTIAL_EXCEPT: &str = "X-Inertia-Partial-Except";
    /// Comma-separated keys to resend in full instead of merging.
    pub const X_INERTIA_RESET: &str = "X-Inertia-Reset";
    /// Comma-separated once-prop keys the client already holds.
    pub const X_INERTIA_EXCEPT_ONCE_PROPS: &str = "X-Inertia-Except-Once-Props";
    /// Named validation-error bag for error props.
    pub const X_INERTIA_ERROR_BAG: &str = "X-Inertia-Error-Bag";
}

/// Per-request reload intent, derived once and immutable after.
#[derive(Debug, Clone, Default)]
pub struct RequestDirectives {
    /// Whether partial-reload filtering applies.
    pub is_partial_reload: bool,
    /// Keys to include, when the client narrowed the reload.
    pub only: Option<BTreeSet<String>>,
    /// Keys to exclude, when the client narrowed the reload.
    pub except: Option<BTreeSet<String>>,
    /// Keys whose cached client value must be replaced, not merged.
    pub reset_keys: BTreeSet<String>,
    /// Once-prop cache keys the client already holds.
    pub client_once_keys: BTreeSet<String>,
    /// Once-prop keys the server forces to resend this request.
    pub server_forced_refresh_once_keys: BTreeSet<String>,
}

impl RequestDirectives {
    /// Parse the directives for a render of `component`.
    ///
    /// A partial reload activates only when the partial-component header
    /// exactly equals `component`; any mismatch, including an absent
    /// header, degrades to a full load. `only`/`except` lists are read only
    /// in partial mode; reset and once-exclusion lists apply regardless.
    pub fn from_request(
        headers: &Headers,
        component: &str,
        forced_refresh_once_keys: BTreeSet<String>,
    ) -> Self {
        let is_partial_reload =
            headers.get(header_names::X_INERTIA_PARTIAL_COMPONENT) == Some(component);

        let (only, except) = if is_partial_reload {
            (
                headers
                    .get(header_names::X_INERTIA_PARTIAL_DATA)
                    .map(parse_key_list),
                headers
                    .get(header_names::X_INERTIA_PARTIAL_EXCEPT)
                    .map(parse_key_list),
            )
        } else {
            (None, None)
        };

        Self {
            is_partial_reload,
            only,
            except,
            reset_keys: headers
                .get(header_names::X_INERTIA_RESET)
                .map(parse_key_list)
                .unwrap_or_default(),
            client_once_keys: headers
                .get(header_names::X_INERTIA_EXCEPT_ONCE_PROPS)
                .map(parse_key_list)
                .unwrap_or_default(),
            server_forced_refresh_once_keys: forced_refresh_once_keys,
        }
    }
}

/// Split a comma-separated header value, dropping empty entries.
fn parse_key_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Whether the client-side adapter sent this request.
pub fn is_inertia_request(headers: &Headers) -> bool {
    headers.contains(header_names::X_INERTIA)
}

/// Whether the client's cached asset version matches `current`.
///
/// Requests without a version header always match; a null current version
/// disables the check.
pub fn version_matches(headers: &Headers, current: &Value) -> bool {
    match headers.get(header_names::X_INERTIA_VERSION) {
        Some(header) => match current {
            Value::String(version) => header == version,
            Value::Null => true,
            other => other.to_string() == header,
        },
        None => true,
    }
}

/// The validation-error bag the client selected, if any.
pub fn error_bag(headers: &Headers) -> Option<&str> {
    headers.get(header_names::X_INERTIA_ERROR_BAG)
}
