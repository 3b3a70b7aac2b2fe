use crate::domain::insight::DeclineInsight;
use crate::domain::trend::{TimeWindow, TrendSample};
use anyhow::ensure;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub topic: String,
    #[serde(default)]
    pub time_window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPayload {
    pub history: Vec<TrendSample>,
}

/// What the analysis service returns, and what the fallback mirrors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub insight: DeclineInsight,
    pub trend: TrendPayload,
}

/// Response body as services actually send it. `trend` is either
/// `{ "history": [...] }` or a bare sample array.
#[derive(Debug, Clone, Deserialize)]
pub struct WireAnalysisResponse {
    pub insight: DeclineInsight,
    pub trend: WireTrend,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireTrend {
    Wrapped { history: Vec<TrendSample> },
    Bare(Vec<TrendSample>),
}

impl WireAnalysisResponse {
    pub fn validate_and_into_response(self) -> anyhow::Result<AnalysisResponse> {
        let mut insight = self.insight;

        ensure!(
            insight.risk_score <= 100,
            "riskScore out of range: {}",
            insight.risk_score
        );

        insight.summary = insight.summary.trim().to_string();
        ensure!(!insight.summary.is_empty(), "summary must be non-empty");

        for signal in &mut insight.signals {
            signal.metric = signal.metric.trim().to_string();
            ensure!(!signal.metric.is_empty(), "signal metric must be non-empty");
        }

        insight.recommended_actions = insight
            .recommended_actions
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        if let Some(drivers) = &insight.decline_drivers {
            for d in drivers {
                ensure!(
                    d.value.is_finite() && d.full_mark.is_finite() && d.full_mark >= 0.0,
                    "invalid decline driver {:?}: value={}, fullMark={}",
                    d.label,
                    d.value,
                    d.full_mark
                );
            }
        }

        if let Some(confidence) = insight.confidence {
            ensure!(
                (0.0..=1.0).contains(&confidence),
                "confidence must be between 0 and 1 (got {confidence})"
            );
        }

        let history = match self.trend {
            WireTrend::Wrapped { history } => history,
            WireTrend::Bare(history) => history,
        };
        ensure!(
            history.iter().all(|s| s.value.is_finite()),
            "trend history contains non-finite values"
        );

        Ok(AnalysisResponse {
            insight,
            trend: TrendPayload { history },
        })
    }
}
