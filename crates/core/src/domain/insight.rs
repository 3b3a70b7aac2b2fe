use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered so tiers can be compared against thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
            RiskTier::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalStatus {
    #[serde(alias = "Good")]
    Normal,
    Warning,
    Critical,
}

/// One named forensic indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub metric: String,
    pub status: SignalStatus,
    pub explanation: String,
}

impl Signal {
    pub fn new(metric: &str, status: SignalStatus, explanation: &str) -> Self {
        Self {
            metric: metric.to_string(),
            status,
            explanation: explanation.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineDriver {
    pub label: String,
    pub value: f64,
    #[serde(alias = "full_mark")]
    pub full_mark: f64,
}

/// Classifier output and the sole contract consumed by presentation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineInsight {
    #[serde(alias = "declineRisk")]
    pub risk_tier: RiskTier,
    pub risk_score: u8,
    pub summary: String,
    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default, alias = "actions")]
    pub recommended_actions: Vec<String>,
    #[serde(default, alias = "primary_driver", skip_serializing_if = "Option::is_none")]
    pub primary_driver: Option<String>,
    #[serde(default, alias = "decline_drivers", skip_serializing_if = "Option::is_none")]
    pub decline_drivers: Option<Vec<DeclineDriver>>,
    #[serde(
        default,
        alias = "predicted_time_to_decline",
        skip_serializing_if = "Option::is_none"
    )]
    pub predicted_time_to_decline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Position on the trend lifecycle timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LifecycleStage {
    Growth,
    Peak,
    Saturation,
    Decline,
    Collapse,
}

impl LifecycleStage {
    pub const ALL: [LifecycleStage; 5] = [
        LifecycleStage::Growth,
        LifecycleStage::Peak,
        LifecycleStage::Saturation,
        LifecycleStage::Decline,
        LifecycleStage::Collapse,
    ];

    pub fn from_score(risk_score: u8) -> Self {
        match risk_score {
            86.. => LifecycleStage::Collapse,
            71..=85 => LifecycleStage::Decline,
            51..=70 => LifecycleStage::Saturation,
            31..=50 => LifecycleStage::Peak,
            _ => LifecycleStage::Growth,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Fill of the timeline bar, 0 at Growth and 100 at Collapse.
    pub fn progress_percent(&self) -> f64 {
        self.index() as f64 / (Self::ALL.len() - 1) as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tiers_are_ordered() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
        assert!(RiskTier::High < RiskTier::Critical);
    }

    #[test]
    fn decodes_backend_shape_with_aliases() {
        let v = json!({
            "riskScore": 88,
            "declineRisk": "High",
            "summary": "Decline risk is HIGH.",
            "signals": [
                {"metric": "Engagement Velocity", "status": "Good", "explanation": "Growth detected."}
            ],
            "actions": ["Exit trend"],
            "decline_drivers": [{"label": "Fatigue", "value": 40, "fullMark": 100}],
            "predicted_time_to_decline": "24h"
        });
        let insight: DeclineInsight = serde_json::from_value(v).unwrap();
        assert_eq!(insight.risk_tier, RiskTier::High);
        assert_eq!(insight.signals[0].status, SignalStatus::Normal);
        assert_eq!(insight.recommended_actions, vec!["Exit trend".to_string()]);
        assert_eq!(insight.decline_drivers.as_ref().map(|d| d.len()), Some(1));
        assert_eq!(insight.predicted_time_to_decline.as_deref(), Some("24h"));
        assert!(insight.primary_driver.is_none());
    }

    #[test]
    fn serializes_camel_case_and_skips_absent_optionals() {
        let insight = DeclineInsight {
            risk_tier: RiskTier::Low,
            risk_score: 12,
            summary: "ok".into(),
            signals: vec![],
            recommended_actions: vec![],
            primary_driver: None,
            decline_drivers: None,
            predicted_time_to_decline: None,
            confidence: None,
        };
        let v = serde_json::to_value(&insight).unwrap();
        assert_eq!(v["riskTier"], "Low");
        assert_eq!(v["riskScore"], 12);
        assert!(v.get("primaryDriver").is_none());
        assert!(v.get("confidence").is_none());
    }

    #[test]
    fn lifecycle_stage_tracks_score() {
        assert_eq!(LifecycleStage::from_score(12), LifecycleStage::Growth);
        assert_eq!(LifecycleStage::from_score(40), LifecycleStage::Peak);
        assert_eq!(LifecycleStage::from_score(55), LifecycleStage::Saturation);
        assert_eq!(LifecycleStage::from_score(85), LifecycleStage::Decline);
        assert_eq!(LifecycleStage::from_score(89), LifecycleStage::Collapse);
        assert_eq!(LifecycleStage::Growth.progress_percent(), 0.0);
        assert_eq!(LifecycleStage::Saturation.progress_percent(), 50.0);
        assert_eq!(LifecycleStage::Collapse.progress_percent(), 100.0);
    }
}
