//! Configuration types for the correlation orchestrator.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// How two series are put onto common timestamps before correlating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum AlignmentPolicy {
    /// Match each sample of the higher-frequency series to the nearest sample of
    /// the other series within that series' own interval. Raw timestamps are kept.
    #[default]
    NearestTolerance,
    /// Bucket both series onto a uniform grid at the coarser interval, forward-fill
    /// gaps, and join on identical grid points.
    ResampleThenJoin,
}

/// Global configuration for the `Lagcorr` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LagcorrConfig {
    /// Timezone every series is converted to; calendar lags are applied in it.
    pub reference_timezone: Tz,
    /// Alignment strategy used for every pair and lag step.
    pub alignment: AlignmentPolicy,
    /// Timeout for a single source call.
    pub source_timeout: Duration,
    /// Optional deadline over the whole fetch fan-out.
    pub request_timeout: Option<Duration>,
    /// Optional deadline for starting pair computations.
    pub compute_deadline: Option<Duration>,
    /// Evaluate pairs on a worker pool.
    pub parallel: bool,
}

impl Default for LagcorrConfig {
    fn default() -> Self {
        Self {
            reference_timezone: chrono_tz::Europe::Berlin,
            alignment: AlignmentPolicy::default(),
            source_timeout: Duration::from_secs(30),
            request_timeout: None,
            compute_deadline: None,
            parallel: true,
        }
    }
}
