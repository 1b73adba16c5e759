//! Merge, defer, once, and scroll descriptors for the client.
//!
//! Builders only read the variant metadata of the pre-resolution selection;
//! no resolver is invoked here.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use inertia_core::{OnceDescriptor, Prop, RequestDirectives, ScrollDescriptor};

use crate::select::Selection;

/// Client-facing descriptors for the surviving props.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    /// Keys to shallow-merge with the client's cached props.
    pub merge_props: Vec<String>,
    /// Keys to deep-merge with the client's cached props.
    pub deep_merge_props: Vec<String>,
    /// Deferred keys grouped for follow-up fetching.
    pub deferred_props: BTreeMap<String, Vec<String>>,
    /// Cache descriptors for once props, by effective cache key.
    pub once_props: BTreeMap<String, OnceDescriptor>,
    /// Pagination descriptors for scroll props, by prop key.
    pub scroll_props: BTreeMap<String, ScrollDescriptor>,
}

/// Current Unix time in milliseconds.
pub fn unix_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Build descriptors from the selection, before any resolver runs.
///
/// `now_ms` is sampled once per request so every once descriptor in a
/// response shares the same expiry base. Once descriptors whose effective
/// keys collide overwrite each other, last write (in prop-key order) wins.
pub fn build_metadata(
    selection: &Selection,
    directives: &RequestDirectives,
    now_ms: u64,
) -> PageMetadata {
    let mut metadata = PageMetadata {
        deferred_props: selection.deferred.clone(),
        ..Default::default()
    };

    for (key, prop) in &selection.props {
        match prop {
            Prop::Merge { deep, .. } => {
                if !directives.reset_keys.contains(key) {
                    if *deep {
                        metadata.deep_merge_props.push(key.clone());
                    } else {
                        metadata.merge_props.push(key.clone());
                    }
                }
            }
            Prop::Scroll { options, .. } => {
                if !directives.reset_keys.contains(key) {
                    if options.deep {
                        metadata.deep_merge_props.push(key.clone());
                    } else {
                        metadata.merge_props.push(key.clone());
                    }
                }
                let pagination = options.pagination();
                metadata.scroll_props.insert(
                    key.clone(),
                    ScrollDescriptor {
                        page_name: options.page_name.clone(),
                        current_page: pagination.current_page,
                        previous_page: pagination.previous_page(),
                        next_page: pagination.next_page(),
                        reset: false,
                    },
                );
            }
            Prop::Once { options, .. } => {
                let effective = options.key.clone().unwrap_or_else(|| key.clone());
                metadata.once_props.insert(
                    effective,
                    OnceDescriptor {
                        prop: key.clone(),
                        expires_at: options.ttl.map(|ttl| now_ms + ttl.as_millis() as u64),
                    },
                );
            }
            _ => {}
        }
    }

    metadata
}
