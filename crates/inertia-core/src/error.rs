//! Error types for the protocol engine.

use thiserror::Error;

/// Errors that abort a page build.
///
/// A failing resolver is fatal for the whole request; no partial page
/// object is emitted. The transport decides the user-visible failure.
#[derive(Debug, Error)]
pub enum PageError {
    /// A prop resolver failed.
    #[error("prop `{key}` failed to resolve")]
    PropResolve {
        /// Key of the failing prop.
        key: String,
        /// The resolver's error.
        #[source]
        source: anyhow::Error,
    },
}

impl PageError {
    /// Key of the prop that failed, for error reporting.
    pub fn prop_key(&self) -> &str {
        match self {
            Self::PropResolve { key, .. } => key,
        }
    }
}
