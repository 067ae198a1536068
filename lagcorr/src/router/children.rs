use lagcorr_core::{AssetSelection, CorrelationReport, CorrelationRequest, LagcorrError};

use crate::Lagcorr;
use crate::core::tag_err;

impl Lagcorr {
    /// Correlate the children of `parent_id` with each other.
    ///
    /// Selections in `template` that name the parent are applied to every
    /// child, keeping their attribute and `diff` flag. Without such a
    /// selection each child is taken whole, differenced if any template
    /// selection asks for it. Lags and the time window come from `template`.
    ///
    /// # Errors
    /// Returns `NotFound` when the parent has no children, the source error
    /// when the hierarchy lookup fails, and anything [`Lagcorr::correlate`]
    /// returns for the derived request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "lagcorr::correlate_children", skip(self, template))
    )]
    pub async fn correlate_children(
        &self,
        parent_id: i64,
        template: &CorrelationRequest,
    ) -> Result<CorrelationReport, LagcorrError> {
        let provider = self.source.name();
        let children = Self::source_call_with_timeout(
            provider,
            "children",
            self.cfg.source_timeout,
            self.source.children(parent_id),
        )
        .await
        .map_err(|e| tag_err(provider, e))?;
        if children.is_empty() {
            return Err(LagcorrError::not_found(format!(
                "children of asset {parent_id}"
            )));
        }

        let req = CorrelationRequest {
            assets: child_selections(parent_id, &children, &template.assets),
            ..template.clone()
        };
        self.correlate(&req).await
    }
}

fn child_selections(
    parent_id: i64,
    children: &[i64],
    template: &[AssetSelection],
) -> Vec<AssetSelection> {
    let per_child: Vec<&AssetSelection> =
        template.iter().filter(|s| s.asset_id == parent_id).collect();
    if per_child.is_empty() {
        let diff = template.iter().any(|s| s.diff);
        return children
            .iter()
            .map(|&id| AssetSelection::whole(id).with_diff(diff))
            .collect();
    }
    children
        .iter()
        .flat_map(|&id| {
            per_child.iter().map(move |t| AssetSelection {
                asset_id: id,
                ..(*t).clone()
            })
        })
        .collect()
}
