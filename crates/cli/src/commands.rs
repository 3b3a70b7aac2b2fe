use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use trendfall_core::analysis::fallback::FallbackPolicy;
use trendfall_core::analysis::http::HttpAnalysisClient;
use trendfall_core::analysis::session::AnalysisSession;
use trendfall_core::analysis::{AnalysisClient, LocalAnalysisClient};
use trendfall_core::config::Settings;
use trendfall_core::domain::trend::{TimeWindow, TrendTelemetry};
use trendfall_core::report::render::{save_report, ReportFormat};
use trendfall_core::report::build_report;
use trendfall_core::view::{Dashboard, ViewContainer};

/// Where analyses are sent.
#[derive(Debug, Clone, Default)]
pub struct Backend {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub offline: bool,
    pub local_fallback: bool,
}

impl Backend {
    pub fn policy(&self) -> FallbackPolicy {
        if self.local_fallback {
            FallbackPolicy::LocalClassification
        } else {
            FallbackPolicy::StaticPayload
        }
    }

    /// Local classification when offline or no backend URL is configured.
    pub fn client(&self, settings: &Settings) -> anyhow::Result<Arc<dyn AnalysisClient>> {
        let url = self
            .url
            .as_deref()
            .or(settings.backend_url.as_deref())
            .filter(|u| !u.trim().is_empty());

        match url {
            Some(url) if !self.offline => {
                let timeout = self
                    .timeout_secs
                    .map(|s| Duration::from_secs(s.max(1)))
                    .unwrap_or_else(|| settings.timeout());
                tracing::debug!(%url, timeout_ms = timeout.as_millis() as u64, "using analysis service");
                Ok(Arc::new(HttpAnalysisClient::new(url, timeout)?))
            }
            _ => {
                tracing::debug!(offline = self.offline, "using local classifier");
                Ok(Arc::new(LocalAnalysisClient))
            }
        }
    }
}

/// Validates the topic, runs one analysis and returns the resulting dashboard.
pub async fn run_analysis(
    client: Arc<dyn AnalysisClient>,
    policy: FallbackPolicy,
    topic: &str,
    window: TimeWindow,
) -> anyhow::Result<Dashboard> {
    let mut view = ViewContainer::new();
    let submission = view.submit(topic, window, chrono::Utc::now())?;

    let mut session = AnalysisSession::new(client, policy);
    let pending = session.submit(submission.request.clone());
    let outcome = pending
        .outcome()
        .await
        .context("analysis was cancelled before it finished")?;

    if outcome.is_fallback() {
        tracing::warn!(topic = %submission.request.topic, "showing fallback analysis");
    }

    let resolved = view.resolve(submission.generation, outcome);
    anyhow::ensure!(resolved, "analysis result arrived for a superseded request");
    view.dashboard()
        .cloned()
        .context("view did not reach the dashboard")
}

pub async fn analyze(
    settings: &Settings,
    backend: &Backend,
    topic: &str,
    window: TimeWindow,
) -> anyhow::Result<String> {
    let client = backend.client(settings)?;
    let dashboard = run_analysis(client, backend.policy(), topic, window).await?;

    let source = if dashboard.outcome.is_fallback() {
        "fallback"
    } else {
        "live"
    };
    let stage = dashboard.lifecycle_stage();
    let out = serde_json::json!({
        "topic": dashboard.topic,
        "source": source,
        "lifecycleStage": stage,
        "lifecycleProgress": stage.progress_percent(),
        "insight": dashboard.outcome.response.insight,
        "trend": dashboard.outcome.response.trend,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn classify(telemetry: &TrendTelemetry) -> anyhow::Result<String> {
    let insight = trendfall_core::classify::classify(telemetry);
    tracing::info!(
        topic = %telemetry.topic,
        risk_score = insight.risk_score,
        risk_tier = %insight.risk_tier,
        "classified"
    );
    Ok(serde_json::to_string_pretty(&insight)?)
}

pub async fn report(
    settings: &Settings,
    backend: &Backend,
    topic: &str,
    window: TimeWindow,
    format: ReportFormat,
    out: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    let client = backend.client(settings)?;
    let dashboard = run_analysis(client, backend.policy(), topic, window).await?;

    let response = &dashboard.outcome.response;
    let doc = build_report(&dashboard.topic, &response.insight, &response.trend.history);

    let dir = out
        .or_else(|| settings.report_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    match save_report(&doc, &dir, format).await {
        Ok(path) => Ok(path),
        Err(err) => {
            let message = err.user_message();
            let err = anyhow::Error::new(err);
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "report generation failed");
            Err(err.context(message))
        }
    }
}
