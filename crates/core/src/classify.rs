//! Decline-risk classification.
//!
//! Scores are bucketed constants per tier, not interpolated. Rules are
//! evaluated top to bottom and the first match wins.

use crate::domain::insight::{DeclineDriver, DeclineInsight, RiskTier, Signal, SignalStatus};
use crate::domain::trend::TrendTelemetry;

pub const HIGH_RISK_SCORE: u8 = 89;
pub const MEDIUM_RISK_SCORE: u8 = 55;
pub const LOW_RISK_SCORE: u8 = 12;

pub const HIGH_SATURATION_THRESHOLD: f64 = 80.0;
pub const MEDIUM_SATURATION_THRESHOLD: f64 = 50.0;
/// Current velocity below this share of peak counts as a collapse in momentum.
pub const VELOCITY_COLLAPSE_RATIO: f64 = 0.2;

pub const DEFAULT_CONFIDENCE: f64 = 0.85;

const ENGAGEMENT_DROP: &str = "Engagement Drop";
const CONTENT_SATURATION: &str = "Content Saturation";
const AUDIENCE_FATIGUE: &str = "Audience Fatigue";

/// Telemetry after clamping, the values every rule below reads.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sanitized {
    current_velocity: f64,
    peak_velocity: f64,
    engagement_score: f64,
    saturation_index: f64,
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn sanitize(t: &TrendTelemetry) -> Sanitized {
    let current_velocity = finite_or_zero(t.current_velocity).max(0.0);
    let peak_velocity = finite_or_zero(t.peak_velocity).max(current_velocity);
    Sanitized {
        current_velocity,
        peak_velocity,
        engagement_score: finite_or_zero(t.engagement_score).clamp(0.0, 100.0),
        saturation_index: finite_or_zero(t.saturation_index).clamp(0.0, 100.0),
    }
}

/// Percentage drop from peak velocity, rounded to a whole number.
pub fn velocity_drop_percent(current_velocity: f64, peak_velocity: f64) -> i64 {
    if peak_velocity <= 0.0 {
        return 100;
    }
    (100.0 - (current_velocity / peak_velocity) * 100.0).round() as i64
}

pub fn classify(telemetry: &TrendTelemetry) -> DeclineInsight {
    let s = sanitize(telemetry);

    let (risk_tier, risk_score, summary, signals, actions) = if s.saturation_index
        > HIGH_SATURATION_THRESHOLD
        && s.current_velocity < s.peak_velocity * VELOCITY_COLLAPSE_RATIO
    {
        let drop = velocity_drop_percent(s.current_velocity, s.peak_velocity);
        (
            RiskTier::High,
            HIGH_RISK_SCORE,
            format!(
                "Decline risk is HIGH because engagement velocity dropped {drop}% in 36 hours. \
                 Audience fatigue detected due to repetitive content."
            ),
            vec![
                Signal::new(
                    ENGAGEMENT_DROP,
                    SignalStatus::Critical,
                    "Velocity has cratered below recovery thresholds.",
                ),
                Signal::new(
                    CONTENT_SATURATION,
                    SignalStatus::Critical,
                    "92% of posts are reposts or low-effort variations.",
                ),
                Signal::new(
                    AUDIENCE_FATIGUE,
                    SignalStatus::Warning,
                    "Negative sentiment keywords rising in comments.",
                ),
            ],
            [
                "Stop campaign spend immediately.",
                "Pivot content to 'Nostalgia' angle if continuing.",
                "Exit trend safely.",
            ],
        )
    } else if s.saturation_index > MEDIUM_SATURATION_THRESHOLD {
        (
            RiskTier::Medium,
            MEDIUM_RISK_SCORE,
            "Decline risk is MEDIUM. Growth has stalled, and early signs of saturation are \
             appearing. Monitor closely."
                .to_string(),
            vec![
                Signal::new(
                    ENGAGEMENT_DROP,
                    SignalStatus::Warning,
                    "Growth rate has flattened to near zero.",
                ),
                Signal::new(
                    CONTENT_SATURATION,
                    SignalStatus::Warning,
                    "Content variety is decreasing.",
                ),
                Signal::new(
                    AUDIENCE_FATIGUE,
                    SignalStatus::Normal,
                    "Sentiment remains neutral to positive.",
                ),
            ],
            [
                "Reduce output frequency.",
                "Introduce high-quality variation.",
                "Prepare exit strategy.",
            ],
        )
    } else {
        (
            RiskTier::Low,
            LOW_RISK_SCORE,
            "Decline risk is LOW. This trend is still in its growth or maturity phase with \
             healthy engagement."
                .to_string(),
            vec![
                Signal::new(
                    ENGAGEMENT_DROP,
                    SignalStatus::Normal,
                    "Engagement is steady or growing.",
                ),
                Signal::new(
                    CONTENT_SATURATION,
                    SignalStatus::Normal,
                    "Low volume of competitive content.",
                ),
                Signal::new(
                    AUDIENCE_FATIGUE,
                    SignalStatus::Normal,
                    "Audience is actively participating.",
                ),
            ],
            [
                "Scale up content production.",
                "Collaborate with key influencers.",
                "Ride the wave.",
            ],
        )
    };

    let drivers = decline_drivers(&s, telemetry);
    let primary_driver = primary_driver(&drivers);

    DeclineInsight {
        risk_tier,
        risk_score,
        summary,
        signals,
        recommended_actions: actions.iter().map(|a| a.to_string()).collect(),
        primary_driver,
        decline_drivers: Some(drivers),
        predicted_time_to_decline: Some(predicted_time_window(risk_score).to_string()),
        confidence: Some(DEFAULT_CONFIDENCE),
    }
}

fn percent(v: f64) -> f64 {
    finite_or_zero(v).clamp(0.0, 100.0).round()
}

fn decline_drivers(s: &Sanitized, telemetry: &TrendTelemetry) -> Vec<DeclineDriver> {
    let velocity_loss = if s.peak_velocity > 0.0 {
        100.0 - s.current_velocity / s.peak_velocity * 100.0
    } else {
        0.0
    };

    let disengagement = match (telemetry.history.first(), telemetry.history.last()) {
        (Some(first), Some(last)) if telemetry.history.len() >= 2 && first.value > 0.0 => {
            (first.value - last.value) / first.value * 100.0
        }
        _ => 0.0,
    };

    [
        ("Saturation", s.saturation_index),
        ("Velocity Loss", velocity_loss),
        ("Fatigue", 100.0 - s.engagement_score),
        ("Disengagement", disengagement),
    ]
    .into_iter()
    .map(|(label, value)| DeclineDriver {
        label: label.to_string(),
        value: percent(value),
        full_mark: 100.0,
    })
    .collect()
}

/// Label of the strongest driver; the earliest wins on ties.
pub fn primary_driver(drivers: &[DeclineDriver]) -> Option<String> {
    let mut best: Option<&DeclineDriver> = None;
    for d in drivers {
        match best {
            Some(b) if d.value <= b.value => {}
            _ => best = Some(d),
        }
    }
    best.map(|d| d.label.clone())
}

pub fn predicted_time_window(risk_score: u8) -> &'static str {
    if risk_score > 75 {
        "24h"
    } else if risk_score > 40 {
        "48h"
    } else {
        "72h"
    }
}
