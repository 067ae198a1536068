use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the lagcorr workspace.
///
/// Per-series and per-pair conditions (`DataGap`, `InsufficientOverlap`,
/// `DegenerateVariance`) are absorbed by the engine and surface either as
/// warnings or as null correlations. `Configuration` is the only variant that
/// aborts a request before any computation starts.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LagcorrError {
    /// A requested attribute does not exist in the asset's feed.
    #[error("attribute '{attribute}' not found for asset {asset_id}")]
    DataGap {
        /// Asset whose feed was inspected.
        asset_id: i64,
        /// Attribute name that was requested.
        attribute: String,
    },

    /// Fewer than two aligned points were available for a correlation.
    #[error("insufficient overlap: {rows} aligned rows")]
    InsufficientOverlap {
        /// Number of aligned rows that were produced.
        rows: usize,
    },

    /// One of the aligned columns is constant, so the correlation is undefined.
    #[error("degenerate variance in aligned column")]
    DegenerateVariance,

    /// Malformed request or configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Issues with the returned or expected data.
    #[error("data issue: {0}")]
    Data(String),

    /// A trend source returned an error.
    #[error("{provider} failed: {msg}")]
    Source {
        /// Source name that failed.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual source call exceeded the configured timeout.
    #[error("source timed out: {capability} via {provider}")]
    SourceTimeout {
        /// Source name that timed out.
        provider: String,
        /// Capability label (e.g. "trend", "children").
        capability: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Capability label for which the request timed out.
        capability: String,
    },

    /// The source does not implement the requested capability.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested.
        capability: String,
    },

    /// A resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "trend for asset 42".
        what: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl LagcorrError {
    /// Helper: build a `DataGap` for an attribute missing on an asset.
    pub fn data_gap(asset_id: i64, attribute: impl Into<String>) -> Self {
        Self::DataGap {
            asset_id,
            attribute: attribute.into(),
        }
    }

    /// Helper: build a `Configuration` error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Helper: build a `Source` error with the source name and message.
    pub fn source(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Source {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `SourceTimeout` error.
    pub fn source_timeout(provider: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::SourceTimeout {
            provider: provider.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(capability: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: capability.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Returns true if this error aborts a whole request.
    ///
    /// Data gaps, per-pair correlation failures and single-source failures are
    /// reported alongside results instead.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::RequestTimeout { .. } | Self::Unsupported { .. }
        )
    }

    /// Returns true for conditions that only null out a single correlation.
    #[must_use]
    pub const fn is_correlation_gap(&self) -> bool {
        matches!(
            self,
            Self::InsufficientOverlap { .. } | Self::DegenerateVariance
        )
    }
}

impl From<serde_json::Error> for LagcorrError {
    fn from(e: serde_json::Error) -> Self {
        Self::Configuration(e.to_string())
    }
}
