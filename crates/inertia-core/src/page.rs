//! Wire types for the page object returned to the client adapter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cache descriptor for a once prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnceDescriptor {
    /// Key of the prop entry that produced this descriptor.
    pub prop: String,
    /// Unix time in milliseconds after which the client re-fetches;
    /// `null` never expires.
    pub expires_at: Option<u64>,
}

/// Client-side pagination descriptor for a scroll prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollDescriptor {
    /// Query parameter the client pages on.
    pub page_name: String,
    /// Current page, 1-based.
    pub current_page: u64,
    /// Previous page number, `null` on the first page.
    pub previous_page: Option<u64>,
    /// Next page number, `null` on the last page.
    pub next_page: Option<u64>,
    /// Whether the client should discard its accumulated pages.
    pub reset: bool,
}

/// The page object serialized to the client, or embedded in the HTML shell
/// on a full page load.
///
/// Constructed fresh per request and never persisted server-side. Metadata
/// fields are omitted from the JSON payload when empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageObject {
    /// Component the client should render.
    pub component: String,
    /// Client-facing URL of the request.
    pub url: String,
    /// Asset version; mismatch triggers a full reload by the transport.
    pub version: Value,
    /// Resolved prop values.
    pub props: Map<String, Value>,
    /// Clear client-side history state for this navigation.
    pub clear_history: bool,
    /// Encrypt client-side history state for this navigation.
    pub encrypt_history: bool,
    /// Keys to shallow-merge with the client's cached props.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merge_props: Vec<String>,
    /// Keys to deep-merge with the client's cached props.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deep_merge_props: Vec<String>,
    /// Deferred keys grouped for follow-up fetching.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub deferred_props: BTreeMap<String, Vec<String>>,
    /// Cache descriptors for once props, by effective cache key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub once_props: BTreeMap<String, OnceDescriptor>,
    /// Pagination descriptors for scroll props, by prop key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scroll_props: BTreeMap<String, ScrollDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_page() -> PageObject {
        PageObject {
            component: "Users".to_string(),
            url: "/users".to_string(),
            version: json!("v1"),
            props: Map::new(),
            clear_history: false,
            encrypt_history: false,
            merge_props: Vec::new(),
            deep_merge_props: Vec::new(),
            deferred_props: BTreeMap::new(),
            once_props: BTreeMap::new(),
            scroll_props: BTreeMap::new(),
        }
    }

    #[test]
    fn test_empty_metadata_omitted_from_json() {
        let value = serde_json::to_value(minimal_page()).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("component"));
        assert!(object.contains_key("url"));
        assert!(object.contains_key("version"));
        assert!(object.contains_key("props"));
        assert!(object.contains_key("clearHistory"));
        assert!(object.contains_key("encryptHistory"));
        assert!(!object.contains_key("mergeProps"));
        assert!(!object.contains_key("deepMergeProps"));
        assert!(!object.contains_key("deferredProps"));
        assert!(!object.contains_key("onceProps"));
        assert!(!object.contains_key("scrollProps"));
    }

    #[test]
    fn test_field_names_are_camel_case() {
        let mut page = minimal_page();
        page.merge_props.push("feed".to_string());
        page.deferred_props
            .insert("default".to_string(), vec!["stats".to_string()]);

        let value = serde_json::to_value(page).unwrap();

        assert_eq!(value["mergeProps"], json!(["feed"]));
        assert_eq!(value["deferredProps"], json!({"default": ["stats"]}));
    }

    #[test]
    fn test_once_descriptor_serializes_null_expiry() {
        let mut page = minimal_page();
        page.once_props.insert(
            "settings".to_string(),
            OnceDescriptor {
                prop: "settings".to_string(),
                expires_at: None,
            },
        );

        let value = serde_json::to_value(page).unwrap();

        assert_eq!(
            value["onceProps"]["settings"],
            json!({"prop": "settings", "expiresAt": null})
        );
    }

    #[test]
    fn test_scroll_descriptor_shape() {
        let descriptor = ScrollDescriptor {
            page_name: "page".to_string(),
            current_page: 2,
            previous_page: Some(1),
            next_page: None,
            reset: false,
        };

        let value = serde_json::to_value(descriptor).unwrap();

        assert_eq!(
            value,
            json!({
                "pageName": "page",
                "currentPage": 2,
                "previousPage": 1,
                "nextPage": null,
                "reset": false,
            })
        );
    }

    #[test]
    fn test_page_round_trips_through_json() {
        let mut page = minimal_page();
        page.props.insert("name".to_string(), json!("Ada"));
        page.merge_props.push("feed".to_string());

        let json = serde_json::to_string(&page).unwrap();
        let back: PageObject = serde_json::from_str(&json).unwrap();

        assert_eq!(back.component, "Users");
        assert_eq!(back.props["name"], json!("Ada"));
        assert_eq!(back.merge_props, vec!["feed".to_string()]);
        assert!(back.deferred_props.is_empty());
    }
}
