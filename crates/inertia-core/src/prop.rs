//! Prop variants and their resolution metadata.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

/// Group a deferred prop lands in when none is given.
pub const DEFAULT_DEFER_GROUP: &str = "default";

/// Future returned by a prop resolver.
pub type ResolveFuture = BoxFuture<'static, anyhow::Result<Value>>;

/// A reusable lazy prop resolver.
///
/// Shared props are re-resolved on every request, so resolvers are `Fn`
/// behind an `Arc` rather than one-shot closures.
pub type Resolver = Arc<dyn Fn() -> ResolveFuture + Send + Sync>;

/// Wrap a closure returning any serializable value into a [`Resolver`].
pub fn resolver<F, Fut, T>(resolve: F) -> Resolver
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Serialize,
{
    Arc::new(move || -> ResolveFuture {
        let fut = resolve();
        Box::pin(async move {
            let value = fut.await?;
            Ok(serde_json::to_value(value)?)
        })
    })
}

/// Cache behavior for a once prop.
#[derive(Debug, Clone, Default)]
pub struct OnceOptions {
    /// Custom cache key; falls back to the prop key.
    pub key: Option<String>,
    /// Client-side lifetime; `None` never expires.
    pub ttl: Option<Duration>,
    /// Resend even when the client already holds the key.
    pub force_refresh: bool,
}

impl OnceOptions {
    /// Create options with no custom key, no expiry, no forced refresh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache under a custom key instead of the prop key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Expire the client's cached value after `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Resend regardless of the client's cache.
    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

/// Pagination description for a scroll prop.
#[derive(Debug, Clone)]
pub struct ScrollOptions {
    /// 0-based page index from the data layer.
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total item count across all pages.
    pub total: u64,
    /// Query parameter the client pages on.
    pub page_name: String,
    /// Key the resolved data is wrapped under.
    pub wrapper_key: String,
    /// Deep-merge the wrapped data instead of shallow.
    pub deep: bool,
}

impl ScrollOptions {
    /// Describe a page of `total` items, `per_page` at a time.
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            page_name: "page".to_string(),
            wrapper_key: "data".to_string(),
            deep: false,
        }
    }

    /// Set the query parameter the client pages on.
    pub fn with_page_name(mut self, name: impl Into<String>) -> Self {
        self.page_name = name.into();
        self
    }

    /// Set the key the resolved data is wrapped under.
    pub fn with_wrapper_key(mut self, key: impl Into<String>) -> Self {
        self.wrapper_key = key.into();
        self
    }

    /// Deep-merge the wrapped data on the client.
    pub fn deep_merge(mut self) -> Self {
        self.deep = true;
        self
    }

    /// 1-based pagination derived from the 0-based inputs.
    pub fn pagination(&self) -> ScrollPagination {
        ScrollPagination {
            current_page: self.page + 1,
            total_pages: self.total.div_ceil(self.per_page.max(1)).max(1),
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// 1-based pagination state reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPagination {
    /// Current page, 1-based.
    pub current_page: u64,
    /// Total page count, at least 1.
    pub total_pages: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total item count.
    pub total: u64,
}

impl ScrollPagination {
    /// Whether a page follows the current one.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether a page precedes the current one.
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// The next page number, if any.
    pub fn next_page(&self) -> Option<u64> {
        self.has_next().then(|| self.current_page + 1)
    }

    /// The previous page number, if any.
    pub fn previous_page(&self) -> Option<u64> {
        self.has_prev().then(|| self.current_page - 1)
    }
}

/// A candidate page prop.
///
/// Every variant other than [`Plain`](Prop::Plain) carries a lazy resolver
/// plus metadata that can be inspected without invoking it.
#[derive(Clone)]
pub enum Prop {
    /// Already materialized; always included, never merged.
    Plain(Value),
    /// Included on every request, overriding partial filters.
    Always {
        /// Lazy value.
        resolver: Resolver,
    },
    /// Merged client-side with the previously cached value.
    Merge {
        /// Lazy value.
        resolver: Resolver,
        /// Deep merge instead of shallow.
        deep: bool,
    },
    /// Excluded from first loads; announced by key and group so the client
    /// can fetch it in a follow-up partial request.
    Defer {
        /// Lazy value.
        resolver: Resolver,
        /// Batch the follow-up fetch with other keys in this group.
        group: String,
    },
    /// Sent at most once per client cache lifetime.
    Once {
        /// Lazy value.
        resolver: Resolver,
        /// Cache key, expiry, and refresh behavior.
        options: OnceOptions,
    },
    /// Included only when a partial request asks for it by name.
    Optional {
        /// Lazy value.
        resolver: Resolver,
    },
    /// Merge prop wrapping paginated data for infinite scroll.
    Scroll {
        /// Lazy value producing one page of data.
        resolver: Resolver,
        /// Pagination and wrapping description.
        options: ScrollOptions,
    },
}

impl Prop {
    /// An already materialized value.
    pub fn plain(value: impl Into<Value>) -> Self {
        Self::Plain(value.into())
    }

    /// A lazy value included on every request.
    pub fn always<F, Fut, T>(resolve: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Self::Always {
            resolver: resolver(resolve),
        }
    }

    /// A lazy value shallow-merged with the client's cached value.
    pub fn merge<F, Fut, T>(resolve: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Self::Merge {
            resolver: resolver(resolve),
            deep: false,
        }
    }

    /// A lazy value deep-merged with the client's cached value.
    pub fn deep_merge<F, Fut, T>(resolve: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Self::Merge {
            resolver: resolver(resolve),
            deep: true,
        }
    }

    /// A deferred value in the default group.
    pub fn defer<F, Fut, T>(resolve: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Self::defer_in(resolve, DEFAULT_DEFER_GROUP)
    }

    /// A deferred value fetched together with its group.
    pub fn defer_in<F, Fut, T>(resolve: F, group: impl Into<String>) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Self::Defer {
            resolver: resolver(resolve),
            group: group.into(),
        }
    }

    /// A value sent at most once per client cache lifetime.
    pub fn once<F, Fut, T>(resolve: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Self::once_with(resolve, OnceOptions::new())
    }

    /// A once value with a custom key, expiry, or forced refresh.
    pub fn once_with<F, Fut, T>(resolve: F, options: OnceOptions) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Self::Once {
            resolver: resolver(resolve),
            options,
        }
    }

    /// A lazy value included only when asked for by name.
    pub fn optional<F, Fut, T>(resolve: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Self::Optional {
            resolver: resolver(resolve),
        }
    }

    /// A paginated value for infinite scroll.
    pub fn scroll<F, Fut, T>(resolve: F, options: ScrollOptions) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Self::Scroll {
            resolver: resolver(resolve),
            options,
        }
    }

    /// Whether this prop is visible on a full (non-partial) load.
    pub fn included_on_first_load(&self) -> bool {
        !matches!(self, Self::Defer { .. } | Self::Optional { .. })
    }

    /// Whether this prop bypasses partial-reload filters.
    pub fn is_always(&self) -> bool {
        matches!(self, Self::Always { .. })
    }

    /// The resolver, for variants that carry one.
    pub fn resolver(&self) -> Option<&Resolver> {
        match self {
            Self::Plain(_) => None,
            Self::Always { resolver }
            | Self::Merge { resolver, .. }
            | Self::Defer { resolver, .. }
            | Self::Once { resolver, .. }
            | Self::Optional { resolver }
            | Self::Scroll { resolver, .. } => Some(resolver),
        }
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => f.debug_tuple("Plain").field(value).finish(),
            Self::Always { .. } => f.debug_struct("Always").finish_non_exhaustive(),
            Self::Merge { deep, .. } => f.debug_struct("Merge").field("deep", deep).finish_non_exhaustive(),
            Self::Defer { group, .. } => f.debug_struct("Defer").field("group", group).finish_non_exhaustive(),
            Self::Once { options, .. } => f.debug_struct("Once").field("options", options).finish_non_exhaustive(),
            Self::Optional { .. } => f.debug_struct("Optional").finish_non_exhaustive(),
            Self::Scroll { options, .. } => f.debug_struct("Scroll").field("options", options).finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === Pagination Tests ===

    #[test]
    fn test_pagination_first_page() {
        let pagination = ScrollOptions::new(0, 10, 25).pagination();

        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.next_page(), Some(2));
        assert_eq!(pagination.previous_page(), None);
    }

    #[test]
    fn test_pagination_last_page() {
        let pagination = ScrollOptions::new(2, 10, 25).pagination();

        assert_eq!(pagination.current_page, 3);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.next_page(), None);
        assert_eq!(pagination.previous_page(), Some(2));
    }

    #[test]
    fn test_pagination_middle_page() {
        let pagination = ScrollOptions::new(1, 10, 25).pagination();

        assert!(pagination.has_next());
        assert!(pagination.has_prev());
        assert_eq!(pagination.next_page(), Some(3));
        assert_eq!(pagination.previous_page(), Some(1));
    }

    #[test]
    fn test_pagination_empty_total_still_one_page() {
        let pagination = ScrollOptions::new(0, 10, 0).pagination();

        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 1);
        assert_eq!(pagination.next_page(), None);
        assert_eq!(pagination.previous_page(), None);
    }

    #[test]
    fn test_pagination_exact_multiple() {
        let pagination = ScrollOptions::new(0, 10, 30).pagination();

        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn test_pagination_zero_per_page_does_not_divide_by_zero() {
        let pagination = ScrollOptions::new(0, 0, 5).pagination();

        assert_eq!(pagination.total_pages, 5);
    }

    // === Options Tests ===

    #[test]
    fn test_once_options_defaults() {
        let options = OnceOptions::new();

        assert!(options.key.is_none());
        assert!(options.ttl.is_none());
        assert!(!options.force_refresh);
    }

    #[test]
    fn test_once_options_builder() {
        let options = OnceOptions::new()
            .with_key("dashboard")
            .with_ttl(Duration::from_secs(60))
            .force_refresh();

        assert_eq!(options.key.as_deref(), Some("dashboard"));
        assert_eq!(options.ttl, Some(Duration::from_secs(60)));
        assert!(options.force_refresh);
    }

    #[test]
    fn test_scroll_options_defaults() {
        let options = ScrollOptions::new(0, 20, 100);

        assert_eq!(options.page_name, "page");
        assert_eq!(options.wrapper_key, "data");
        assert!(!options.deep);
    }

    #[test]
    fn test_scroll_options_builder() {
        let options = ScrollOptions::new(0, 20, 100)
            .with_page_name("cursor")
            .with_wrapper_key("items")
            .deep_merge();

        assert_eq!(options.page_name, "cursor");
        assert_eq!(options.wrapper_key, "items");
        assert!(options.deep);
    }

    // === Variant Tests ===

    #[test]
    fn test_first_load_visibility() {
        assert!(Prop::plain(1).included_on_first_load());
        assert!(Prop::always(|| async { Ok(1) }).included_on_first_load());
        assert!(Prop::merge(|| async { Ok(1) }).included_on_first_load());
        assert!(Prop::once(|| async { Ok(1) }).included_on_first_load());
        assert!(Prop::scroll(|| async { Ok(1) }, ScrollOptions::new(0, 10, 10)).included_on_first_load());
        assert!(!Prop::defer(|| async { Ok(1) }).included_on_first_load());
        assert!(!Prop::optional(|| async { Ok(1) }).included_on_first_load());
    }

    #[test]
    fn test_always_flag() {
        assert!(Prop::always(|| async { Ok(1) }).is_always());
        assert!(!Prop::plain(1).is_always());
        assert!(!Prop::merge(|| async { Ok(1) }).is_always());
    }

    #[test]
    fn test_plain_carries_no_resolver() {
        assert!(Prop::plain(json!({"a": 1})).resolver().is_none());
        assert!(Prop::merge(|| async { Ok(1) }).resolver().is_some());
    }

    #[test]
    fn test_defer_default_group() {
        let prop = Prop::defer(|| async { Ok(1) });

        match prop {
            Prop::Defer { group, .. } => assert_eq!(group, DEFAULT_DEFER_GROUP),
            _ => panic!("expected defer variant"),
        }
    }

    #[test]
    fn test_deep_merge_sets_flag() {
        match Prop::deep_merge(|| async { Ok(1) }) {
            Prop::Merge { deep, .. } => assert!(deep),
            _ => panic!("expected merge variant"),
        }
        match Prop::merge(|| async { Ok(1) }) {
            Prop::Merge { deep, .. } => assert!(!deep),
            _ => panic!("expected merge variant"),
        }
    }

    #[tokio::test]
    async fn test_resolver_serializes_any_value() {
        let prop = Prop::merge(|| async { Ok(vec![1, 2, 3]) });
        let resolve = prop.resolver().unwrap();

        let value = resolve().await.unwrap();

        assert_eq!(value, json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_shared_resolver_can_run_twice() {
        let prop = Prop::always(|| async { Ok("fresh") });
        let resolve = prop.resolver().unwrap();

        assert_eq!(resolve().await.unwrap(), json!("fresh"));
        assert_eq!(resolve().await.unwrap(), json!("fresh"));
    }
}
