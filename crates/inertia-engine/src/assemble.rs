//! Orchestrates a render: merge, filter, describe, resolve, assemble.

use std::collections::BTreeMap;

use serde_json::Value;

use inertia_core::{PageError, PageObject, Prop, RequestDirectives};

use crate::config::Config;
use crate::context::RequestContext;
use crate::metadata::{build_metadata, unix_time_ms};
use crate::resolve::resolve_props;
use crate::select::select;

/// The partial-reload engine.
///
/// Holds startup configuration and process-wide shared props, both
/// read-only while requests are in flight. Each [`render`](Inertia::render)
/// call is a pure function of the engine value and the request context; no
/// state survives between calls.
#[derive(Debug, Clone, Default)]
pub struct Inertia {
    config: Config,
    shared_props: BTreeMap<String, Prop>,
}

impl Inertia {
    /// Create an engine from startup configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            shared_props: BTreeMap::new(),
        }
    }

    /// Share a prop with every page render. Startup-time only; request
    /// handlers share per-request props through [`RequestContext::share`].
    pub fn share(mut self, key: impl Into<String>, prop: Prop) -> Self {
        self.shared_props.insert(key.into(), prop);
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the page object for `component` with the given page props.
    ///
    /// Candidate props are the globally shared set, overridden by the
    /// context's request-scoped set, overridden by `props`. The survivors
    /// of directive filtering are described (merge/defer/once/scroll) from
    /// their pre-resolution metadata, then resolved concurrently; any
    /// resolver failure aborts the build.
    pub async fn render(
        &self,
        ctx: &RequestContext,
        component: impl Into<String>,
        props: impl IntoIterator<Item = (String, Prop)>,
    ) -> Result<PageObject, PageError> {
        let component = component.into();

        let mut candidates = self.shared_props.clone();
        candidates.extend(ctx.shared_props().clone());
        candidates.extend(props);

        let directives = RequestDirectives::from_request(
            &ctx.request().headers,
            &component,
            ctx.refresh_once_keys().clone(),
        );

        let selection = select(&candidates, &directives);
        tracing::debug!(
            component = %component,
            partial = directives.is_partial_reload,
            selected = selection.props.len(),
            "props selected"
        );

        let metadata = build_metadata(&selection, &directives, unix_time_ms());
        let mut resolved = resolve_props(selection.props).await?;

        let flash = ctx.flash().take();
        if !flash.is_empty() {
            resolved.insert("flash".to_string(), Value::Object(flash));
        }

        tracing::debug!(component = %component, props = resolved.len(), "page assembled");

        Ok(PageObject {
            component,
            url: ctx.request().url(),
            version: self.config.version.resolve(),
            props: resolved,
            clear_history: ctx.clear_history().unwrap_or(self.config.clear_history),
            encrypt_history: ctx.encrypt_history().unwrap_or(self.config.encrypt_history),
            merge_props: metadata.merge_props,
            deep_merge_props: metadata.deep_merge_props,
            deferred_props: metadata.deferred_props,
            once_props: metadata.once_props,
            scroll_props: metadata.scroll_props,
        })
    }
}
