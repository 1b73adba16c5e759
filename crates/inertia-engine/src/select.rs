//! Applies reload directives to the candidate prop set.

use std::collections::BTreeMap;

use serde_json::Value;

use inertia_core::{Prop, RequestDirectives};

/// The props that survive directive filtering, plus the deferred
/// announcements recorded while filtering.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Entries to resolve into the response.
    pub props: BTreeMap<String, Prop>,
    /// Deferred keys by group, for follow-up fetching. Populated on full
    /// loads only; partial reloads never re-announce deferred props.
    pub deferred: BTreeMap<String, Vec<String>>,
}

/// Filter `candidates` down to the entries this request receives.
///
/// Steps run in a fixed order; later steps re-add or remove keys earlier
/// steps decided on:
///
/// 1. full loads drop first-load-invisible props, setting deferred keys
///    aside as announcements
/// 2. an `only` list keeps exactly the listed keys, materializing a null
///    placeholder for keys with no candidate
/// 3. an `except` list deletes the listed keys
/// 4. always props are re-inserted unconditionally
/// 5. once props the client already holds are dropped unless refreshed
pub fn select(candidates: &BTreeMap<String, Prop>, directives: &RequestDirectives) -> Selection {
    let mut deferred: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut props: BTreeMap<String, Prop>;

    if directives.is_partial_reload {
        props = candidates.clone();
    } else {
        props = BTreeMap::new();
        for (key, prop) in candidates {
            match prop {
                Prop::Defer { group, .. } => {
                    deferred.entry(group.clone()).or_default().push(key.clone());
                }
                Prop::Optional { .. } => {}
                _ => {
                    props.insert(key.clone(), prop.clone());
                }
            }
        }
    }

    if let Some(only) = &directives.only {
        let mut kept = BTreeMap::new();
        for key in only {
            let prop = props
                .get(key)
                .cloned()
                .unwrap_or(Prop::Plain(Value::Null));
            kept.insert(key.clone(), prop);
        }
        props = kept;
    }

    if let Some(except) = &directives.except {
        for key in except {
            props.remove(key);
        }
    }

    for (key, prop) in candidates {
        if prop.is_always() {
            props.insert(key.clone(), prop.clone());
        }
    }

    props.retain(|key, prop| match prop {
        Prop::Once { options, .. } => {
            let effective = options.key.as_deref().unwrap_or(key.as_str());
            options.force_refresh
                || directives
                    .server_forced_refresh_once_keys
                    .contains(effective)
                || !directives.client_once_keys.contains(effective)
        }
        _ => true,
    });

    Selection { props, deferred }
}
