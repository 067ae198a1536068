//! Correlation request DTOs.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::LagcorrError;
use crate::lag::{LagSpec, windows};

/// One series selection inside a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetSelection {
    /// Asset whose feed is fetched.
    pub asset_id: i64,
    /// Attribute to extract; `None` expands to every attribute of the asset.
    #[serde(default)]
    pub attribute_name: Option<String>,
    /// Replace values by their first difference before correlating.
    #[serde(default)]
    pub diff: bool,
}

impl AssetSelection {
    /// Select every attribute of an asset.
    #[must_use]
    pub const fn whole(asset_id: i64) -> Self {
        Self {
            asset_id,
            attribute_name: None,
            diff: false,
        }
    }

    /// Select one attribute of an asset.
    pub fn attribute(asset_id: i64, name: impl Into<String>) -> Self {
        Self {
            asset_id,
            attribute_name: Some(name.into()),
            diff: false,
        }
    }

    /// Toggle the first-difference transform.
    #[must_use]
    pub fn with_diff(mut self, yes: bool) -> Self {
        self.diff = yes;
        self
    }
}

/// A correlation request as accepted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRequest {
    /// Free-form label for the request.
    #[serde(default)]
    pub name: Option<String>,
    /// Series to include.
    #[serde(default)]
    pub assets: Vec<AssetSelection>,
    /// Independent sweep windows in request order; empty means no lag sweep.
    #[serde(default, with = "windows")]
    pub lags: Vec<LagSpec>,
    /// Inclusive lower bound of the fetch window.
    #[serde(default)]
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Upper bound of the fetch window; defaults to "now" in the reference timezone.
    #[serde(default)]
    pub end_time: Option<DateTime<FixedOffset>>,
}

impl CorrelationRequest {
    /// Parse and validate a request from JSON.
    ///
    /// # Errors
    /// Returns `Configuration` for malformed JSON, unknown lag units, negative
    /// magnitudes, or a request that fails [`validate`](Self::validate).
    pub fn from_json(s: &str) -> Result<Self, LagcorrError> {
        let req: Self = serde_json::from_str(s)?;
        req.validate()?;
        Ok(req)
    }

    /// Check structural validity before any data is fetched.
    ///
    /// # Errors
    /// Returns `Configuration` if no assets are selected, a selection names an
    /// empty attribute, a selection is repeated, or the window bounds are
    /// inverted.
    pub fn validate(&self) -> Result<(), LagcorrError> {
        if self.assets.is_empty() {
            return Err(LagcorrError::config("no assets selected"));
        }
        let mut seen = HashSet::new();
        for sel in &self.assets {
            if sel.attribute_name.as_deref().is_some_and(str::is_empty) {
                return Err(LagcorrError::config(format!(
                    "empty attribute name for asset {}",
                    sel.asset_id
                )));
            }
            if !seen.insert((sel.asset_id, sel.attribute_name.as_deref())) {
                return Err(LagcorrError::config(format!(
                    "duplicate selection for asset {} attribute {:?}",
                    sel.asset_id, sel.attribute_name
                )));
            }
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time)
            && start > end
        {
            return Err(LagcorrError::config(format!(
                "start_time {start} is after end_time {end}"
            )));
        }
        Ok(())
    }

    /// Require exactly `n` selections, for operations that are structurally pairwise.
    ///
    /// # Errors
    /// Returns `Configuration` when the selection count differs.
    pub fn require_selections(&self, n: usize) -> Result<(), LagcorrError> {
        if self.assets.len() == n {
            Ok(())
        } else {
            Err(LagcorrError::config(format!(
                "exactly {n} asset selections are required, got {}",
                self.assets.len()
            )))
        }
    }
}
