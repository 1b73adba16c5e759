//! Request-scoped state, threaded explicitly through a render.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use serde_json::{Map, Value};

use inertia_core::{Prop, RequestInfo};

/// One-shot flash data drained into a single response.
///
/// Entries staged here are attached under `props.flash` and removed; they
/// are never listed in merge, once, or defer metadata and cannot survive
/// the request.
#[derive(Debug, Default)]
pub struct Flash {
    data: Mutex<Map<String, Value>>,
}

impl Flash {
    /// Create an empty flash container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a flash entry for the next response.
    pub fn put(&self, key: impl Into<String>, value: impl Into<Value>) {
        if let Ok(mut data) = self.data.lock() {
            data.insert(key.into(), value.into());
        }
    }

    /// Drain the staged entries. Subsequent calls within the same request
    /// return an empty map.
    pub fn take(&self) -> Map<String, Value> {
        self.data
            .lock()
            .map(|mut data| std::mem::take(&mut *data))
            .unwrap_or_default()
    }

    /// Whether any entries are staged.
    pub fn is_empty(&self) -> bool {
        self.data.lock().map(|data| data.is_empty()).unwrap_or(true)
    }
}

/// State carried for exactly one request.
///
/// Built once before rendering and dropped with the response. Nothing in
/// here is process-wide, so concurrent requests cannot observe each
/// other's shared props, flash, or overrides.
#[derive(Debug)]
pub struct RequestContext {
    request: RequestInfo,
    shared_props: BTreeMap<String, Prop>,
    locals: Map<String, Value>,
    root_view: Option<String>,
    clear_history: Option<bool>,
    encrypt_history: Option<bool>,
    refresh_once_keys: BTreeSet<String>,
    flash: Flash,
}

impl RequestContext {
    /// Create a context for one request.
    pub fn new(request: RequestInfo) -> Self {
        Self {
            request,
            shared_props: BTreeMap::new(),
            locals: Map::new(),
            root_view: None,
            clear_history: None,
            encrypt_history: None,
            refresh_once_keys: BTreeSet::new(),
            flash: Flash::new(),
        }
    }

    /// Share a prop for this request only. Wins over globally shared props
    /// on key collision; page props win over both.
    pub fn share(mut self, key: impl Into<String>, prop: Prop) -> Self {
        self.shared_props.insert(key.into(), prop);
        self
    }

    /// Attach a request-local value for downstream collaborators.
    pub fn with_local(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.insert(key.into(), value.into());
        self
    }

    /// Render into a different root view than the configured default.
    pub fn with_root_view(mut self, view: impl Into<String>) -> Self {
        self.root_view = Some(view.into());
        self
    }

    /// Override the history-clear flag for this response.
    pub fn with_clear_history(mut self, clear: bool) -> Self {
        self.clear_history = Some(clear);
        self
    }

    /// Override the history-encrypt flag for this response.
    pub fn with_encrypt_history(mut self, encrypt: bool) -> Self {
        self.encrypt_history = Some(encrypt);
        self
    }

    /// Force a once prop, by effective cache key, to resend despite the
    /// client's cache.
    pub fn refresh_once(mut self, key: impl Into<String>) -> Self {
        self.refresh_once_keys.insert(key.into());
        self
    }

    /// The request this context belongs to.
    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    /// Props shared for this request only.
    pub fn shared_props(&self) -> &BTreeMap<String, Prop> {
        &self.shared_props
    }

    /// A request-local value by key.
    pub fn local(&self, key: &str) -> Option<&Value> {
        self.locals.get(key)
    }

    /// The root view override, if any.
    pub fn root_view(&self) -> Option<&str> {
        self.root_view.as_deref()
    }

    /// The history-clear override, if any.
    pub fn clear_history(&self) -> Option<bool> {
        self.clear_history
    }

    /// The history-encrypt override, if any.
    pub fn encrypt_history(&self) -> Option<bool> {
        self.encrypt_history
    }

    /// Once keys forced to resend this request.
    pub fn refresh_once_keys(&self) -> &BTreeSet<String> {
        &self.refresh_once_keys
    }

    /// The one-shot flash container.
    pub fn flash(&self) -> &Flash {
        &self.flash
    }
}
