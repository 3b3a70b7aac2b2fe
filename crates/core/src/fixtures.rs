//! Canned telemetry for well-known topics, plus the generic telemetry used for
//! anything else. Histories are deterministic so repeated runs agree.

use crate::domain::trend::{TrendSample, TrendTelemetry};

pub const HISTORY_POINTS: usize = 24;

/// Lower-cased, trimmed, spaces replaced by `-`.
pub fn topic_key(topic: &str) -> String {
    topic.trim().to_lowercase().replace(' ', "-")
}

/// Fixed pseudo-noise in `[0, 1)` for sample `i`.
pub fn jitter(i: usize) -> f64 {
    ((i * 37 + 11) % 100) as f64 / 100.0
}

/// Hourly samples labelled "{i}h ago", generated newest-first and returned
/// chronologically.
pub fn hourly_history(points: usize, value_at: impl Fn(usize) -> f64) -> Vec<TrendSample> {
    let mut out: Vec<TrendSample> = (0..points)
        .map(|i| TrendSample::new(format!("{i}h ago"), value_at(i).max(0.0).round()))
        .collect();
    out.reverse();
    out
}

pub fn fixture(key: &str) -> Option<TrendTelemetry> {
    let t = match key {
        "skibidi-toilet" => TrendTelemetry {
            topic: "Skibidi Toilet".to_string(),
            current_velocity: 120.0,
            peak_velocity: 5000.0,
            engagement_score: 35.0,
            saturation_index: 92.0,
            history: hourly_history(HISTORY_POINTS, |i| {
                5000.0 - i as f64 * 150.0 - jitter(i) * 500.0
            }),
        },
        "ai-agents" => TrendTelemetry {
            topic: "AI Agents".to_string(),
            current_velocity: 850.0,
            peak_velocity: 900.0,
            engagement_score: 88.0,
            saturation_index: 40.0,
            history: hourly_history(HISTORY_POINTS, |i| {
                200.0 + i as f64 * 30.0 + jitter(i) * 50.0
            }),
        },
        "grimace-shake" => TrendTelemetry {
            topic: "Grimace Shake".to_string(),
            current_velocity: 45.0,
            peak_velocity: 8000.0,
            engagement_score: 12.0,
            saturation_index: 98.0,
            history: hourly_history(HISTORY_POINTS, |i| 300.0 - i as f64 * 10.0),
        },
        _ => return None,
    };
    Some(t)
}

/// Telemetry assumed for topics with no fixture.
pub fn generic_telemetry(topic: &str) -> TrendTelemetry {
    TrendTelemetry {
        topic: topic.trim().to_string(),
        current_velocity: 500.0,
        peak_velocity: 1000.0,
        engagement_score: 50.0,
        saturation_index: 60.0,
        history: hourly_history(HISTORY_POINTS, |i| {
            1000.0 - i as f64 * 50.0 + jitter(i) * 200.0
        }),
    }
}

pub fn telemetry_for_topic(topic: &str) -> TrendTelemetry {
    fixture(&topic_key(topic)).unwrap_or_else(|| generic_telemetry(topic))
}
