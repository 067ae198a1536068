use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lagcorr_core::{FetchWindow, LagcorrError, RawSample, TrendSource};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(LagcorrError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    trend_rules: HashMap<i64, MockBehavior<Vec<RawSample>>>,
    children_rules: HashMap<i64, MockBehavior<Vec<i64>>>,
    trend_requests: Vec<(i64, FetchWindow)>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `trend` calls for a specific asset.
    pub async fn set_trend_behavior(&self, asset_id: i64, behavior: MockBehavior<Vec<RawSample>>) {
        let mut guard = self.state.lock().await;
        guard.trend_rules.insert(asset_id, behavior);
    }

    /// Set the behavior for `children` calls for a specific parent asset.
    pub async fn set_children_behavior(&self, asset_id: i64, behavior: MockBehavior<Vec<i64>>) {
        let mut guard = self.state.lock().await;
        guard.children_rules.insert(asset_id, behavior);
    }

    /// Return a copy of the `trend` request log in call order.
    pub async fn get_trend_requests(&self) -> Vec<(i64, FetchWindow)> {
        let guard = self.state.lock().await;
        guard.trend_requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.trend_rules.clear();
        guard.children_rules.clear();
        guard.trend_requests.clear();
    }
}

/// A trend source that defers all behavior to an external controller.
///
/// Windows are not applied to returned samples; tests get back exactly what
/// they configured.
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn TrendSource>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn TrendSource>, controller)
    }
}

async fn play<T>(behavior: Option<MockBehavior<T>>, capability: &'static str) -> Result<T, LagcorrError> {
    match behavior {
        Some(MockBehavior::Return(v)) => Ok(v),
        Some(MockBehavior::Fail(e)) => Err(e),
        Some(MockBehavior::Hang) => {
            std::future::pending::<()>().await;
            unreachable!()
        }
        None => Err(LagcorrError::unsupported(capability)),
    }
}

#[async_trait]
impl TrendSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn trend(
        &self,
        asset_id: i64,
        window: &FetchWindow,
    ) -> Result<Vec<RawSample>, LagcorrError> {
        // Acquire behavior snapshot without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.trend_requests.push((asset_id, *window));
            guard.trend_rules.get(&asset_id).cloned()
        };
        play(behavior, "trend").await
    }

    async fn children(&self, asset_id: i64) -> Result<Vec<i64>, LagcorrError> {
        let behavior = {
            let guard = self.state.lock().await;
            guard.children_rules.get(&asset_id).cloned()
        };
        play(behavior, "children").await
    }
}
