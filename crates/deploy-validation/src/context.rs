//! What a validator can see while it runs

use std::future::Future;

use deploy_core::{QueryResult, Recommendation, ResourceQueryer, SettingNode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Explicit context for one option-setting validator call.
///
/// Validators never reach for shared state: the recommendation being edited,
/// the target setting, the cloud inventory and the session's cancellation
/// signal all arrive through this value.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    pub recommendation: &'a Recommendation,
    pub setting: &'a SettingNode,
    queryer: &'a dyn ResourceQueryer,
    cancel: &'a CancellationToken,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        recommendation: &'a Recommendation,
        setting: &'a SettingNode,
        queryer: &'a dyn ResourceQueryer,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            recommendation,
            setting,
            queryer,
            cancel,
        }
    }

    pub fn queryer(&self) -> &'a dyn ResourceQueryer {
        self.queryer
    }

    /// Await a resource query unless the session is cancelled first.
    ///
    /// # Errors
    ///
    /// `Error::Cancelled` when the token fires before the query answers,
    /// `Error::ResourceQuery` when the query itself fails.
    pub async fn query<T, F>(&self, query: F) -> Result<T>
    where
        F: Future<Output = QueryResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!(setting = %self.setting.fully_qualified_id, "Resource query cancelled");
                Err(Error::Cancelled)
            }
            result = query => Ok(result?),
        }
    }

    /// Resolved value of another setting of the same recommendation.
    pub fn setting_value(&self, fully_qualified_id: &str) -> Result<Value> {
        Ok(self.recommendation.get_value_by_id(fully_qualified_id)?)
    }
}
