use std::collections::HashMap;

use lagcorr_core::{
    CorrelationRequest, FetchWindow, LagcorrError, NormalizedSeries, RawSample, normalize_feed,
};

use crate::Lagcorr;
use crate::core::tag_err;
use crate::router::util::join_with_deadline;

/// Series normalized from one request plus the non-fatal problems met on the way.
#[derive(Debug, Default)]
pub(crate) struct FetchedSeries {
    pub(crate) series: Vec<NormalizedSeries>,
    pub(crate) warnings: Vec<LagcorrError>,
}

impl Lagcorr {
    /// Fetch every asset named by `req` once and normalize each selection.
    ///
    /// Behavior and trade-offs:
    /// - Distinct asset ids are fetched concurrently, each call bounded by
    ///   `source_timeout`; the fan-out as a whole by `request_timeout`.
    /// - A failed asset contributes one warning and no series; its other
    ///   selections are skipped silently.
    /// - Selections on the same asset share the raw feed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "lagcorr::fetch",
            skip(self, req),
            fields(selections = req.assets.len()),
        )
    )]
    pub(crate) async fn fetch_selections(
        &self,
        req: &CorrelationRequest,
    ) -> Result<FetchedSeries, LagcorrError> {
        let tz = self.cfg.reference_timezone;
        let window = FetchWindow::resolve(req.start_time, req.end_time, tz);

        let mut ids: Vec<i64> = Vec::new();
        for sel in &req.assets {
            if !ids.contains(&sel.asset_id) {
                ids.push(sel.asset_id);
            }
        }

        let provider = self.source.name();
        let tasks = ids.iter().map(|&id| {
            let source = &self.source;
            let window = &window;
            async move {
                let res = Self::source_call_with_timeout(
                    provider,
                    "trend",
                    self.cfg.source_timeout,
                    source.trend(id, window),
                )
                .await
                .map_err(|e| tag_err(provider, e));
                (id, res)
            }
        });
        let joined = join_with_deadline(tasks, self.cfg.request_timeout, "trend").await?;

        let mut out = FetchedSeries::default();
        let mut feeds: HashMap<i64, Vec<RawSample>> = HashMap::with_capacity(joined.len());
        for (id, res) in joined {
            match res {
                Ok(raw) => {
                    feeds.insert(id, raw);
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(asset_id = id, error = %e, "trend fetch failed; asset skipped");
                    out.warnings.push(e);
                }
            }
        }

        for sel in &req.assets {
            let Some(raw) = feeds.get(&sel.asset_id) else {
                continue;
            };
            let feed = normalize_feed(sel, raw.clone(), tz);
            out.series.extend(feed.series);
            out.warnings.extend(feed.warnings);
        }
        Ok(out)
    }
}
