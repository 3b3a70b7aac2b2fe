//! Deterministic telemetry for the reference backend.

use trendfall_core::domain::contract::AnalysisRequest;
use trendfall_core::domain::trend::{TimeWindow, TrendSample, TrendTelemetry};
use trendfall_core::fixtures::{self, jitter, HISTORY_POINTS};

/// Known fixture topics keep their canned telemetry; anything else gets a
/// synthetic series seeded from the topic.
pub fn telemetry_for(request: &AnalysisRequest) -> TrendTelemetry {
    fixtures::fixture(&fixtures::topic_key(&request.topic))
        .unwrap_or_else(|| synthetic_telemetry(&request.topic, request.time_window))
}

/// Even-length topics decline, odd-length topics grow. Longer windows spread
/// the same number of samples over more hours.
pub fn synthetic_telemetry(topic: &str, window: TimeWindow) -> TrendTelemetry {
    let topic = topic.trim();
    let seed = topic.chars().count();
    let declining = seed % 2 == 0;

    let (current, peak, engagement, saturation) = if declining {
        (250.0 + (seed % 7) as f64 * 20.0, 4000.0, 30.0, 85.0)
    } else {
        (900.0, 1000.0 + (seed % 5) as f64 * 40.0, 80.0, 35.0)
    };

    let step_hours = (window.hours() as usize / HISTORY_POINTS).max(1);
    let last = (HISTORY_POINTS - 1) as f64;
    let history = (0..HISTORY_POINTS)
        .map(|i| {
            // i counts back from the newest sample.
            let age = i as f64 / last;
            let base = if declining {
                current + (peak - current) * age
            } else {
                peak - (peak - current * 0.3) * age
            };
            let value = (base + jitter(i + seed) * 50.0).max(0.0).round();
            TrendSample::new(format!("{}h ago", i * step_hours), value)
        })
        .rev()
        .collect();

    TrendTelemetry {
        topic: topic.to_string(),
        current_velocity: current,
        peak_velocity: peak,
        engagement_score: engagement,
        saturation_index: saturation,
        history,
    }
}
