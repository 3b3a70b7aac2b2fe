//! Report layout: five fixed sections built from one analysis.
//!
//! Only Key Findings may spill onto continuation pages. Summary and action
//! text pass through [`wording::soften`].

pub mod layout;
pub mod render;
pub mod wording;

use crate::classify::{self, DEFAULT_CONFIDENCE};
use crate::domain::insight::{DeclineDriver, DeclineInsight};
use crate::domain::trend::TrendSample;
use crate::view;
use chrono::{DateTime, Utc};
use layout::{
    chars_per_line, wrap_text, BAR_TRACK_LENGTH, CONTENT_WIDTH, CONTINUATION_START_Y,
    FINDINGS_START_Y, FINDINGS_Y_LIMIT, FINDING_GAP, FINDING_LINE_HEIGHT, LINE_CHART_HEIGHT,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const RUNNING_HEADER: &str = "TRENDFALL AI • CONFIDENTIAL STRATEGIC INTEL";
pub const REPORT_TITLE: &str = "Trend Decline Assessment Report";
pub const REPORT_SUBTITLE: &str = "Automated Cultural Lifecycle Forensics";
pub const DEFAULT_PRIMARY_DRIVER: &str = "Audience Saturation";
pub const DEFAULT_TIME_WINDOW: &str = "Immediate Forecast (0-48h)";
pub const NO_ACTIONS: &str = "No current action suggested based on existing signals.";

pub const METHODOLOGY: [&str; 7] = [
    "This document is an automated assessment generated by TrendFall AI. The decline risk score represents the statistical probability of a trend entering a saturation or decay phase within the observed digital environment.",
    "",
    "DATA SOURCES:",
    "Metadata captured includes engagement velocity, comment sentiment drift, interaction quality, and audience retention proxies. All data is processed via zero-shot NLP classification and ensemble risk modeling.",
    "",
    "DISCLAIMER:",
    "THIS REPORT IS FOR INFORMATIONAL PURPOSES ONLY. PREDICTIONS ARE BASED ON METADATA SIGNALS AND DO NOT GUARANTEE MARKET OUTCOMES. TRENDFALL AI DOES NOT PROVIDE FINANCIAL OR INVESTMENT ADVICE. STRATEGIC DECISIONS REMAIN THE SOLE RESPONSIBILITY OF THE USER. SYSTEMATIC RISKS OR PLATFORM ALGORITHM SHIFTS MAY ALTER TREND TRAJECTORIES WITHOUT NOTICE.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    Summary,
    KeyFindings,
    MetricsOverview,
    Recommendation,
    Methodology,
}

impl ReportSection {
    pub const ALL: [ReportSection; 5] = [
        ReportSection::Summary,
        ReportSection::KeyFindings,
        ReportSection::MetricsOverview,
        ReportSection::Recommendation,
        ReportSection::Methodology,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::Summary => "Executive Summary",
            ReportSection::KeyFindings => "Key Findings",
            ReportSection::MetricsOverview => "Metrics & Velocity Overview",
            ReportSection::Recommendation => "Strategic Recommendation",
            ReportSection::Methodology => "Methodology & Information",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    /// Height above the chart baseline.
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRow {
    pub label: String,
    pub value: f64,
    pub track: f64,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBlock {
    Heading {
        text: String,
        level: u8,
    },
    Field {
        label: String,
        value: String,
    },
    Score {
        value: u8,
        out_of: u8,
        color: String,
        caption: String,
    },
    Paragraph {
        lines: Vec<String>,
    },
    Bullet {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        detail: Vec<String>,
    },
    LineChart {
        title: String,
        width: f64,
        height: f64,
        points: Vec<ChartPoint>,
    },
    BarChart {
        title: String,
        bars: Vec<BarRow>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPage {
    pub page_number: usize,
    pub section: ReportSection,
    pub header: String,
    pub blocks: Vec<ReportBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub report_id: Uuid,
    pub topic: String,
    pub generated_at: DateTime<Utc>,
    pub pages: Vec<ReportPage>,
}

impl ReportDocument {
    /// Distinct sections in page order.
    pub fn sections(&self) -> Vec<ReportSection> {
        let mut out: Vec<ReportSection> = Vec::with_capacity(ReportSection::ALL.len());
        for page in &self.pages {
            if out.last() != Some(&page.section) {
                out.push(page.section);
            }
        }
        out
    }

    pub fn pages_in(&self, section: ReportSection) -> impl Iterator<Item = &ReportPage> {
        self.pages.iter().filter(move |p| p.section == section)
    }
}

/// Colour used for the large score on the summary page.
pub fn risk_color(risk_score: u8) -> &'static str {
    if risk_score > 80 {
        "#991b1b"
    } else if risk_score > 50 {
        "#92400e"
    } else {
        "#065f46"
    }
}

pub fn lifecycle_label(risk_score: u8) -> &'static str {
    if risk_score > 80 {
        "High Decline Risk (Saturated)"
    } else if risk_score > 60 {
        "Late-stage Trend"
    } else if risk_score > 40 {
        "Maturation Phase"
    } else {
        "Growth Phase (Emerging)"
    }
}

/// Explicit `primary_driver`, else the strongest decline driver.
pub fn resolve_primary_driver(insight: &DeclineInsight) -> String {
    if let Some(driver) = insight.primary_driver.as_deref().map(str::trim) {
        if !driver.is_empty() {
            return driver.to_string();
        }
    }

    insight
        .decline_drivers
        .as_deref()
        .and_then(classify::primary_driver)
        .unwrap_or_else(|| DEFAULT_PRIMARY_DRIVER.to_string())
}

pub fn line_chart_points(history: &[TrendSample], width: f64, height: f64) -> Vec<ChartPoint> {
    if history.len() < 2 {
        return Vec::new();
    }

    let max = history
        .iter()
        .map(|s| s.value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let step_x = width / (history.len() - 1) as f64;

    history
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let y = if max > 0.0 && s.value.is_finite() {
                (s.value / max).clamp(0.0, 1.0) * height
            } else {
                0.0
            };
            ChartPoint {
                x: i as f64 * step_x,
                y,
            }
        })
        .collect()
}

pub fn driver_bars(drivers: &[DeclineDriver]) -> Vec<BarRow> {
    drivers
        .iter()
        .map(|d| {
            let ratio = if d.full_mark > 0.0 && d.value.is_finite() {
                (d.value / d.full_mark).clamp(0.0, 1.0)
            } else {
                0.0
            };
            BarRow {
                label: d.label.clone(),
                value: d.value,
                track: BAR_TRACK_LENGTH,
                length: ratio * BAR_TRACK_LENGTH,
            }
        })
        .collect()
}

pub fn build_report(
    topic: &str,
    insight: &DeclineInsight,
    history: &[TrendSample],
) -> ReportDocument {
    build_report_at(topic, insight, history, Uuid::new_v4(), Utc::now())
}

/// Deterministic variant of [`build_report`].
pub fn build_report_at(
    topic: &str,
    insight: &DeclineInsight,
    history: &[TrendSample],
    report_id: Uuid,
    generated_at: DateTime<Utc>,
) -> ReportDocument {
    let mut pages = PageBuilder::default();

    // Summary
    pages.start(ReportSection::Summary);
    pages.push(heading(REPORT_TITLE, 1));
    pages.push(ReportBlock::Paragraph {
        lines: vec![format!("SUBTITLE: {REPORT_SUBTITLE}")],
    });
    pages.push(field("TREND ASSET NAME", topic.trim().to_uppercase()));
    pages.push(field("SOURCE PLATFORM", view::platform_label(topic)));
    pages.push(field(
        "ANALYSIS TIMESTAMP",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    ));
    pages.push(heading(ReportSection::Summary.title(), 2));
    pages.push(ReportBlock::Score {
        value: insight.risk_score,
        out_of: 100,
        color: risk_color(insight.risk_score).to_string(),
        caption: "REDUCED MOMENTUM PROBABILITY".to_string(),
    });
    pages.push(field("LIFECYCLE STAGE", lifecycle_label(insight.risk_score)));
    pages.push(ReportBlock::Paragraph {
        lines: wrap_text(
            &wording::soften(&insight.summary),
            chars_per_line(CONTENT_WIDTH, 11.0),
        ),
    });

    // Key Findings
    pages.start(ReportSection::KeyFindings);
    pages.push(heading(ReportSection::KeyFindings.title(), 2));
    pages.push(field("Primary Decline Driver", resolve_primary_driver(insight)));
    pages.push(heading("Supporting Forensic Signals", 3));

    let explanation_chars = chars_per_line(CONTENT_WIDTH - 10.0, 10.0);
    let mut y = FINDINGS_START_Y;
    for (i, signal) in insight.signals.iter().enumerate() {
        let detail = wrap_text(&signal.explanation, explanation_chars);
        y += detail.len() as f64 * FINDING_LINE_HEIGHT + FINDING_GAP;
        pages.push(ReportBlock::Bullet {
            text: signal.metric.clone(),
            detail,
        });

        let more_remaining = i + 1 < insight.signals.len();
        if y > FINDINGS_Y_LIMIT && more_remaining {
            pages.start(ReportSection::KeyFindings);
            y = CONTINUATION_START_Y;
        }
    }

    // Metrics Overview
    pages.start(ReportSection::MetricsOverview);
    pages.push(heading(ReportSection::MetricsOverview.title(), 2));
    pages.push(ReportBlock::LineChart {
        title: "Engagement Velocity Trend".to_string(),
        width: CONTENT_WIDTH,
        height: LINE_CHART_HEIGHT,
        points: line_chart_points(history, CONTENT_WIDTH, LINE_CHART_HEIGHT),
    });
    pages.push(ReportBlock::BarChart {
        title: "Saturation & Audience Fatigue Matrix".to_string(),
        bars: driver_bars(insight.decline_drivers.as_deref().unwrap_or_default()),
    });

    // Recommendation
    pages.start(ReportSection::Recommendation);
    pages.push(heading(ReportSection::Recommendation.title(), 2));
    pages.push(heading("Rationale & Protocol", 3));
    if insight.recommended_actions.is_empty() {
        pages.push(bullet(NO_ACTIONS.to_string()));
    } else {
        for action in &insight.recommended_actions {
            pages.push(bullet(wording::soften(action)));
        }
    }
    pages.push(field(
        "Projected Time Window",
        insight
            .predicted_time_to_decline
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_TIME_WINDOW),
    ));
    pages.push(field(
        "Statistical Confidence",
        format!(
            "{:.1}%",
            insight.confidence.unwrap_or(DEFAULT_CONFIDENCE) * 100.0
        ),
    ));

    // Methodology
    pages.start(ReportSection::Methodology);
    pages.push(heading(ReportSection::Methodology.title(), 2));
    pages.push(ReportBlock::Paragraph {
        lines: wrap_text(&METHODOLOGY.join("\n"), chars_per_line(CONTENT_WIDTH, 9.0)),
    });

    ReportDocument {
        report_id,
        topic: topic.trim().to_string(),
        generated_at,
        pages: pages.finish(),
    }
}

fn heading(text: &str, level: u8) -> ReportBlock {
    ReportBlock::Heading {
        text: text.to_string(),
        level,
    }
}

fn field(label: &str, value: impl Into<String>) -> ReportBlock {
    ReportBlock::Field {
        label: label.to_string(),
        value: value.into(),
    }
}

fn bullet(text: String) -> ReportBlock {
    ReportBlock::Bullet {
        text,
        detail: Vec::new(),
    }
}

#[derive(Default)]
struct PageBuilder {
    pages: Vec<ReportPage>,
}

impl PageBuilder {
    fn start(&mut self, section: ReportSection) {
        self.pages.push(ReportPage {
            page_number: self.pages.len() + 1,
            section,
            header: RUNNING_HEADER.to_string(),
            blocks: Vec::new(),
        });
    }

    fn push(&mut self, block: ReportBlock) {
        if let Some(page) = self.pages.last_mut() {
            page.blocks.push(block);
        }
    }

    fn finish(self) -> Vec<ReportPage> {
        self.pages
    }
}
