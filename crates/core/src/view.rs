//! Presentation state: topic validation, the transient input notice and the
//! landing → analyzing → dashboard flow.

use crate::analysis::fallback::AnalysisOutcome;
use crate::domain::contract::AnalysisRequest;
use crate::domain::insight::LifecycleStage;
use crate::domain::trend::TimeWindow;
use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use std::fmt;

pub const NOTICE_TTL_SECS: i64 = 3;
pub const PLAIN_TOPIC_LABEL: &str = "TREND SIGNAL FORENSICS";
pub const UNKNOWN_PLATFORM_LABEL: &str = "SOCIAL SIGNAL FORENSICS";

const PLATFORMS: [(&str, &str); 6] = [
    ("youtube.com", "YOUTUBE FORENSICS"),
    ("youtu.be", "YOUTUBE FORENSICS"),
    ("tiktok.com", "TIKTOK FORENSICS"),
    ("x.com", "X FORENSICS"),
    ("twitter.com", "X FORENSICS"),
    ("reddit.com", "REDDIT FORENSICS"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicError {
    Empty,
}

impl fmt::Display for TopicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicError::Empty => f.write_str("Enter a trend topic or URL to analyze."),
        }
    }
}

impl std::error::Error for TopicError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisType {
    #[default]
    Topic,
    Url,
}

pub fn is_url_source(topic: &str) -> bool {
    let t = topic.trim_start();
    t.starts_with("http://") || t.starts_with("https://")
}

/// Trimmed topic, or `TopicError::Empty` when nothing is left.
pub fn validate_topic(raw: &str) -> Result<String, TopicError> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(TopicError::Empty);
    }
    Ok(topic.to_string())
}

pub fn analysis_type(topic: &str) -> AnalysisType {
    if is_url_source(topic) {
        AnalysisType::Url
    } else {
        AnalysisType::Topic
    }
}

/// "SOURCE PLATFORM" value shown on reports.
pub fn platform_label(topic: &str) -> &'static str {
    if !is_url_source(topic) {
        return PLAIN_TOPIC_LABEL;
    }

    let Some(host) = Url::parse(topic.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return UNKNOWN_PLATFORM_LABEL;
    };

    PLATFORMS
        .iter()
        .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{domain}")))
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN_PLATFORM_LABEL)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputNotice {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl InputNotice {
    pub fn new(err: TopicError, raised_at: DateTime<Utc>) -> Self {
        Self {
            message: err.to_string(),
            raised_at,
        }
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now - self.raised_at < Duration::seconds(NOTICE_TTL_SECS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardMode {
    #[default]
    Overview,
    Forensics,
}

/// At most one overlay is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Simulator,
    Battle,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub topic: String,
    pub mode: DashboardMode,
    pub analysis_type: AnalysisType,
    pub overlay: Overlay,
    pub outcome: AnalysisOutcome,
}

impl Dashboard {
    /// Position on the lifecycle timeline for the shown analysis.
    pub fn lifecycle_stage(&self) -> LifecycleStage {
        LifecycleStage::from_score(self.outcome.response.insight.risk_score)
    }
}

#[derive(Debug, Clone, Default)]
pub enum ViewState {
    #[default]
    Landing,
    Analyzing {
        topic: String,
        window: TimeWindow,
    },
    Dashboard(Dashboard),
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub generation: u64,
    pub request: AnalysisRequest,
}

/// Owns the view state. Results for anything but the latest submission are
/// dropped.
#[derive(Debug, Default)]
pub struct ViewContainer {
    state: ViewState,
    generation: u64,
    notice: Option<InputNotice>,
}

impl ViewContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Validates `raw_topic` and moves to `Analyzing`. An empty topic leaves
    /// the state untouched and raises a notice instead.
    pub fn submit(
        &mut self,
        raw_topic: &str,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<Submission, TopicError> {
        let topic = match validate_topic(raw_topic) {
            Ok(t) => t,
            Err(err) => {
                tracing::debug!(error = %err, "topic rejected");
                self.notice = Some(InputNotice::new(err, now));
                return Err(err);
            }
        };

        self.notice = None;
        self.generation += 1;
        self.state = ViewState::Analyzing {
            topic: topic.clone(),
            window,
        };

        Ok(Submission {
            generation: self.generation,
            request: AnalysisRequest {
                topic,
                time_window: window,
            },
        })
    }

    /// Returns false and changes nothing when `generation` is stale or no
    /// analysis is pending.
    pub fn resolve(&mut self, generation: u64, outcome: AnalysisOutcome) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale analysis ignored");
            return false;
        }
        let ViewState::Analyzing { topic, .. } = &self.state else {
            return false;
        };

        let topic = topic.clone();
        self.state = ViewState::Dashboard(Dashboard {
            analysis_type: analysis_type(&topic),
            topic,
            mode: DashboardMode::default(),
            overlay: Overlay::None,
            outcome,
        });
        true
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.state {
            ViewState::Dashboard(d) => Some(d),
            _ => None,
        }
    }

    pub fn set_mode(&mut self, mode: DashboardMode) {
        if let ViewState::Dashboard(d) = &mut self.state {
            d.mode = mode;
        }
    }

    pub fn toggle_simulator(&mut self) {
        self.toggle_overlay(Overlay::Simulator);
    }

    pub fn toggle_battle(&mut self) {
        self.toggle_overlay(Overlay::Battle);
    }

    fn toggle_overlay(&mut self, overlay: Overlay) {
        if let ViewState::Dashboard(d) = &mut self.state {
            d.overlay = if d.overlay == overlay {
                Overlay::None
            } else {
                overlay
            };
        }
    }

    /// Back to landing. In-flight results become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = ViewState::Landing;
    }

    pub fn visible_notice(&self, now: DateTime<Utc>) -> Option<&InputNotice> {
        self.notice.as_ref().filter(|n| n.is_visible_at(now))
    }

    pub fn clear_expired(&mut self, now: DateTime<Utc>) {
        if self.notice.as_ref().is_some_and(|n| !n.is_visible_at(now)) {
            self.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fallback::{fallback_payload, ResponseSource};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn outcome() -> AnalysisOutcome {
        AnalysisOutcome {
            response: fallback_payload(),
            source: ResponseSource::Live,
            error: None,
        }
    }

    #[test]
    fn platform_labels() {
        assert_eq!(platform_label("skibidi toilet"), PLAIN_TOPIC_LABEL);
        assert_eq!(
            platform_label("https://www.youtube.com/watch?v=abc"),
            "YOUTUBE FORENSICS"
        );
        assert_eq!(platform_label("https://youtu.be/abc"), "YOUTUBE FORENSICS");
        assert_eq!(platform_label("http://vm.tiktok.com/x"), "TIKTOK FORENSICS");
        assert_eq!(platform_label("https://twitter.com/a/status/1"), "X FORENSICS");
        assert_eq!(platform_label("https://old.reddit.com/r/memes"), "REDDIT FORENSICS");
        assert_eq!(platform_label("https://box.com/file"), UNKNOWN_PLATFORM_LABEL);
        assert_eq!(platform_label("https://"), UNKNOWN_PLATFORM_LABEL);
    }

    #[test]
    fn empty_topic_raises_notice_without_request() {
        let mut view = ViewContainer::new();
        let err = view.submit("   ", TimeWindow::Day, t0()).unwrap_err();
        assert_eq!(err, TopicError::Empty);
        assert_eq!(view.generation(), 0);
        assert!(matches!(view.state(), ViewState::Landing));

        assert!(view.visible_notice(t0() + Duration::milliseconds(2999)).is_some());
        assert!(view.visible_notice(t0() + Duration::seconds(3)).is_none());

        view.clear_expired(t0() + Duration::seconds(1));
        assert!(view.visible_notice(t0() + Duration::seconds(1)).is_some());
        view.clear_expired(t0() + Duration::seconds(4));
        assert!(view.visible_notice(t0()).is_none());
    }

    #[test]
    fn valid_submit_clears_notice_and_builds_request() {
        let mut view = ViewContainer::new();
        let _ = view.submit("", TimeWindow::Day, t0());
        let sub = view.submit("  AI Agents ", TimeWindow::Week, t0()).unwrap();
        assert_eq!(sub.generation, 1);
        assert_eq!(sub.request.topic, "AI Agents");
        assert_eq!(sub.request.time_window, TimeWindow::Week);
        assert!(view.visible_notice(t0()).is_none());
        assert!(matches!(view.state(), ViewState::Analyzing { .. }));
    }

    #[test]
    fn only_latest_submission_resolves() {
        let mut view = ViewContainer::new();
        let first = view.submit("one", TimeWindow::Day, t0()).unwrap();
        let second = view.submit("https://youtube.com/x", TimeWindow::Day, t0()).unwrap();

        assert!(!view.resolve(first.generation, outcome()));
        assert!(matches!(view.state(), ViewState::Analyzing { .. }));

        assert!(view.resolve(second.generation, outcome()));
        let dash = view.dashboard().unwrap();
        assert_eq!(dash.analysis_type, AnalysisType::Url);
        assert_eq!(dash.mode, DashboardMode::Overview);
        assert_eq!(dash.overlay, Overlay::None);
        assert_eq!(dash.lifecycle_stage(), LifecycleStage::Decline);

        // Already resolved.
        assert!(!view.resolve(second.generation, outcome()));
    }

    #[test]
    fn overlays_are_mutually_exclusive() {
        let mut view = ViewContainer::new();
        let sub = view.submit("topic", TimeWindow::Day, t0()).unwrap();
        view.resolve(sub.generation, outcome());

        view.toggle_simulator();
        assert_eq!(view.dashboard().unwrap().overlay, Overlay::Simulator);
        view.toggle_battle();
        assert_eq!(view.dashboard().unwrap().overlay, Overlay::Battle);
        view.toggle_battle();
        assert_eq!(view.dashboard().unwrap().overlay, Overlay::None);

        view.set_mode(DashboardMode::Forensics);
        assert_eq!(view.dashboard().unwrap().mode, DashboardMode::Forensics);
    }

    #[test]
    fn reset_makes_pending_result_stale() {
        let mut view = ViewContainer::new();
        let sub = view.submit("topic", TimeWindow::Day, t0()).unwrap();
        view.reset();
        assert!(!view.resolve(sub.generation, outcome()));
        assert!(matches!(view.state(), ViewState::Landing));
    }
}
