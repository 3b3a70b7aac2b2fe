use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One engagement measurement. Sequences of samples are chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSample {
    #[serde(alias = "date")]
    pub timestamp: String,
    pub value: f64,
}

impl TrendSample {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// Numeric telemetry for a single topic, the input to classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendTelemetry {
    pub topic: String,
    pub current_velocity: f64,
    pub peak_velocity: f64,
    /// 0..=100
    pub engagement_score: f64,
    /// 0..=100, high means saturated.
    pub saturation_index: f64,
    #[serde(default)]
    pub history: Vec<TrendSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "48h")]
    TwoDays,
    #[serde(rename = "7d")]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "24h",
            TimeWindow::TwoDays => "48h",
            TimeWindow::Week => "7d",
        }
    }

    pub fn hours(&self) -> u32 {
        match self {
            TimeWindow::Day => 24,
            TimeWindow::TwoDays => 48,
            TimeWindow::Week => 168,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "24h" => Ok(TimeWindow::Day),
            "48h" => Ok(TimeWindow::TwoDays),
            "7d" => Ok(TimeWindow::Week),
            other => anyhow::bail!("unknown time window {other:?} (expected 24h, 48h or 7d)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_window_uses_wire_labels() {
        assert_eq!(json!(TimeWindow::Week), json!("7d"));
        let parsed: TimeWindow = serde_json::from_value(json!("24h")).unwrap();
        assert_eq!(parsed, TimeWindow::Day);
        assert_eq!("48h".parse::<TimeWindow>().unwrap(), TimeWindow::TwoDays);
        assert!("1y".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn telemetry_reads_camel_case() {
        let v = json!({
            "topic": "AI Agents",
            "currentVelocity": 850,
            "peakVelocity": 900,
            "engagementScore": 88,
            "saturationIndex": 40,
            "history": [{"timestamp": "1h ago", "value": 10}]
        });
        let t: TrendTelemetry = serde_json::from_value(v).unwrap();
        assert_eq!(t.saturation_index, 40.0);
        assert_eq!(t.history.len(), 1);
        assert_eq!(t.peak_velocity, 900.0);
    }

    #[test]
    fn sample_accepts_date_label() {
        let s: TrendSample = serde_json::from_value(json!({"date": "Mon", "value": 100})).unwrap();
        assert_eq!(s.timestamp, "Mon");
    }
}
