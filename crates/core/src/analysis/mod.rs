pub mod error;
pub mod fallback;
pub mod http;
pub mod json;
pub mod session;

use crate::analysis::error::AnalysisError;
use crate::classify::classify;
use crate::domain::contract::{AnalysisRequest, AnalysisResponse, TrendPayload};
use crate::fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Http,
    Local,
}

#[async_trait::async_trait]
pub trait AnalysisClient: Send + Sync {
    fn provider(&self) -> Provider;

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError>;
}

/// Classifies fixture or generic telemetry in-process. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAnalysisClient;

pub fn analyze_locally(topic: &str) -> AnalysisResponse {
    let telemetry = fixtures::telemetry_for_topic(topic);
    let insight = classify(&telemetry);
    AnalysisResponse {
        insight,
        trend: TrendPayload {
            history: telemetry.history,
        },
    }
}

#[async_trait::async_trait]
impl AnalysisClient for LocalAnalysisClient {
    fn provider(&self) -> Provider {
        Provider::Local
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        Ok(analyze_locally(&request.topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::insight::RiskTier;
    use crate::domain::trend::TimeWindow;

    #[tokio::test]
    async fn local_client_classifies_fixtures() {
        let req = AnalysisRequest {
            topic: "Skibidi Toilet".to_string(),
            time_window: TimeWindow::Day,
        };
        let resp = LocalAnalysisClient.analyze(&req).await.unwrap();
        assert_eq!(resp.insight.risk_tier, RiskTier::High);
        assert_eq!(resp.trend.history.len(), fixtures::HISTORY_POINTS);
        assert_eq!(LocalAnalysisClient.provider(), Provider::Local);
    }
}
