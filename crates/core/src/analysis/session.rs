use crate::analysis::fallback::{analyze_or_fallback, AnalysisOutcome, FallbackPolicy};
use crate::analysis::AnalysisClient;
use crate::domain::contract::AnalysisRequest;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};

/// Runs analyses so that only the most recent request resolves; submitting a
/// new one aborts whatever is still in flight.
pub struct AnalysisSession {
    client: Arc<dyn AnalysisClient>,
    policy: FallbackPolicy,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

pub struct PendingAnalysis {
    pub generation: u64,
    handle: JoinHandle<AnalysisOutcome>,
}

impl PendingAnalysis {
    /// `None` when a newer request superseded this one.
    pub async fn outcome(self) -> Option<AnalysisOutcome> {
        match self.handle.await {
            Ok(outcome) => Some(outcome),
            Err(err) if err.is_cancelled() => {
                tracing::debug!(generation = self.generation, "analysis superseded");
                None
            }
            Err(err) => {
                tracing::error!(generation = self.generation, error = %err, "analysis task failed");
                None
            }
        }
    }
}

impl AnalysisSession {
    pub fn new(client: Arc<dyn AnalysisClient>, policy: FallbackPolicy) -> Self {
        Self {
            client,
            policy,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn submit(&mut self, request: AnalysisRequest) -> PendingAnalysis {
        self.cancel();
        self.generation += 1;

        let client = Arc::clone(&self.client);
        let policy = self.policy;
        let handle = tokio::spawn(async move {
            analyze_or_fallback(client.as_ref(), &request, policy).await
        });
        self.in_flight = Some(handle.abort_handle());

        PendingAnalysis {
            generation: self.generation,
            handle,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            prev.abort();
        }
    }
}

impl Drop for AnalysisSession {
    fn drop(&mut self) {
        self.cancel();
    }
}
