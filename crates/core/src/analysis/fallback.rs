use crate::analysis::error::AnalysisError;
use crate::analysis::{analyze_locally, AnalysisClient};
use crate::domain::contract::{AnalysisRequest, AnalysisResponse, TrendPayload};
use crate::domain::insight::{DeclineInsight, RiskTier};
use crate::domain::trend::TrendSample;

/// What to substitute when the live service cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// The fixed payload from [`fallback_payload`].
    #[default]
    StaticPayload,
    /// Classify fixture or generic telemetry for the requested topic.
    LocalClassification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub response: AnalysisResponse,
    pub source: ResponseSource,
    /// Set when `source` is `Fallback`.
    pub error: Option<AnalysisError>,
}

impl AnalysisOutcome {
    pub fn is_fallback(&self) -> bool {
        self.source == ResponseSource::Fallback
    }
}

/// Fixed payload shown when the analysis service is unavailable.
pub fn fallback_payload() -> AnalysisResponse {
    AnalysisResponse {
        insight: DeclineInsight {
            risk_tier: RiskTier::High,
            risk_score: 85,
            summary: "Feather.ai detected high volatility in this trend.".to_string(),
            signals: Vec::new(),
            recommended_actions: vec![
                "Pivot immediately".to_string(),
                "Reduce ad spend".to_string(),
                "Monitor competitors".to_string(),
            ],
            primary_driver: None,
            decline_drivers: None,
            predicted_time_to_decline: None,
            confidence: None,
        },
        trend: TrendPayload {
            history: vec![
                TrendSample::new("Mon", 100.0),
                TrendSample::new("Tue", 90.0),
                TrendSample::new("Wed", 40.0),
                TrendSample::new("Thu", 20.0),
                TrendSample::new("Fri", 10.0),
            ],
        },
    }
}

/// Turns a fetch result into an outcome, substituting per `policy` on error.
pub fn resolve(
    request: &AnalysisRequest,
    result: Result<AnalysisResponse, AnalysisError>,
    policy: FallbackPolicy,
) -> AnalysisOutcome {
    match result {
        Ok(response) => AnalysisOutcome {
            response,
            source: ResponseSource::Live,
            error: None,
        },
        Err(err) => {
            tracing::warn!(
                topic = %request.topic,
                stage = err.stage(),
                error = %err,
                ?policy,
                "analysis service unavailable; using fallback"
            );
            let response = match policy {
                FallbackPolicy::StaticPayload => fallback_payload(),
                FallbackPolicy::LocalClassification => analyze_locally(&request.topic),
            };
            AnalysisOutcome {
                response,
                source: ResponseSource::Fallback,
                error: Some(err),
            }
        }
    }
}

pub async fn analyze_or_fallback(
    client: &dyn AnalysisClient,
    request: &AnalysisRequest,
    policy: FallbackPolicy,
) -> AnalysisOutcome {
    let result = client.analyze(request).await;
    resolve(request, result, policy)
}
