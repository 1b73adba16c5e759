//! Concurrent resolution of selected props.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use serde_json::{Map, Value};

use inertia_core::{PageError, Prop, ScrollOptions};

/// Resolve every surviving entry into its final value.
///
/// Resolvers run as one concurrent join with no ordering guarantee. A
/// failing resolver aborts the whole build; siblings already in flight are
/// not cancelled, their results are discarded.
pub async fn resolve_props(props: BTreeMap<String, Prop>) -> Result<Map<String, Value>, PageError> {
    let pending = props.into_iter().map(|(key, prop)| async move {
        let value = resolve_one(&key, prop).await?;
        Ok::<(String, Value), PageError>((key, value))
    });

    let resolved = try_join_all(pending).await?;
    Ok(resolved.into_iter().collect())
}

async fn resolve_one(key: &str, prop: Prop) -> Result<Value, PageError> {
    match prop {
        Prop::Plain(value) => Ok(value),
        Prop::Scroll { resolver, options } => {
            let data = resolver().await.map_err(|source| PageError::PropResolve {
                key: key.to_string(),
                source,
            })?;
            Ok(scroll_envelope(data, &options))
        }
        Prop::Always { resolver }
        | Prop::Merge { resolver, .. }
        | Prop::Defer { resolver, .. }
        | Prop::Once { resolver, .. }
        | Prop::Optional { resolver } => {
            resolver().await.map_err(|source| PageError::PropResolve {
                key: key.to_string(),
                source,
            })
        }
    }
}

/// Wrap resolved scroll data with its pagination envelope.
fn scroll_envelope(data: Value, options: &ScrollOptions) -> Value {
    let pagination = options.pagination();

    let mut meta = Map::new();
    meta.insert("currentPage".to_string(), pagination.current_page.into());
    meta.insert("perPage".to_string(), pagination.per_page.into());
    meta.insert("total".to_string(), pagination.total.into());
    meta.insert("totalPages".to_string(), pagination.total_pages.into());
    meta.insert(
        "previousPage".to_string(),
        pagination.previous_page().map_or(Value::Null, Value::from),
    );
    meta.insert(
        "nextPage".to_string(),
        pagination.next_page().map_or(Value::Null, Value::from),
    );

    let mut envelope = Map::new();
    envelope.insert(options.wrapper_key.clone(), data);
    envelope.insert("meta".to_string(), Value::Object(meta));
    Value::Object(envelope)
}
