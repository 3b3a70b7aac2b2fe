mod synth;

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendfall_core::classify::classify;
use trendfall_core::domain::contract::{AnalysisRequest, AnalysisResponse, TrendPayload};
use trendfall_core::domain::insight::DeclineInsight;
use trendfall_core::domain::trend::TrendSample;
use trendfall_core::report::render::{render, report_file_name, ReportFormat, USER_MESSAGE};
use trendfall_core::report::build_report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = trendfall_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let app = router();

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/analyze", post(analyze))
        .route("/report", post(report))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn analyze(Json(req): Json<AnalysisRequest>) -> Result<Json<AnalysisResponse>, StatusCode> {
    let topic = req.topic.trim();
    if topic.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let req = AnalysisRequest {
        topic: topic.to_string(),
        time_window: req.time_window,
    };

    let telemetry = synth::telemetry_for(&req);
    let insight = classify(&telemetry);
    tracing::info!(
        topic = %req.topic,
        window = %req.time_window,
        risk_score = insight.risk_score,
        risk_tier = %insight.risk_tier,
        "analysis served"
    );

    Ok(Json(AnalysisResponse {
        insight,
        trend: TrendPayload {
            history: telemetry.history,
        },
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRequest {
    topic: String,
    insight: DeclineInsight,
    #[serde(default)]
    trend_history: Vec<TrendSample>,
    #[serde(default)]
    format: Option<String>,
}

async fn report(
    Json(req): Json<ReportRequest>,
) -> Result<impl IntoResponse, (StatusCode, &'static str)> {
    if req.topic.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "topic is required"));
    }
    let format = match req.format.as_deref() {
        None => ReportFormat::default(),
        Some(f) => f
            .parse::<ReportFormat>()
            .map_err(|_| (StatusCode::BAD_REQUEST, "format must be md or json"))?,
    };

    let doc = build_report(&req.topic, &req.insight, &req.trend_history);
    let body = render(&doc, format).map_err(|e| {
        sentry_anyhow::capture_anyhow(&anyhow::Error::new(e));
        (StatusCode::INTERNAL_SERVER_ERROR, USER_MESSAGE)
    })?;

    let file_name = report_file_name(&doc.topic, format);
    tracing::info!(report_id = %doc.report_id, %file_name, "report rendered");

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &trendfall_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::Response;
    use serde_json::json;
    use trendfall_core::domain::insight::RiskTier;
    use trendfall_core::domain::trend::TimeWindow;

    fn analysis_request(topic: &str) -> Json<AnalysisRequest> {
        Json(AnalysisRequest {
            topic: topic.to_string(),
            time_window: TimeWindow::TwoDays,
        })
    }

    #[tokio::test]
    async fn analyze_rejects_blank_topic() {
        let err = analyze(analysis_request("  ")).await.unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn analyze_serves_fixture_topics() {
        let Json(resp) = analyze(analysis_request(" Skibidi Toilet ")).await.unwrap();
        assert_eq!(resp.insight.risk_tier, RiskTier::High);
        assert_eq!(resp.insight.risk_score, 89);
        assert_eq!(resp.trend.history.len(), 24);

        let v = serde_json::to_value(&resp).unwrap();
        assert!(v["trend"]["history"].is_array());
        assert!(v["insight"]["riskScore"].is_number());
    }

    fn report_request(format: Option<&str>) -> Json<ReportRequest> {
        let v = json!({
            "topic": "ai agents",
            "insight": {
                "riskTier": "Low",
                "riskScore": 12,
                "summary": "Trend is healthy.",
                "signals": [],
                "recommendedActions": ["Increase content production."]
            },
            "trendHistory": [{"timestamp": "1h ago", "value": 10}, {"timestamp": "0h ago", "value": 20}],
            "format": format,
        });
        Json(serde_json::from_value(v).unwrap())
    }

    fn header_of(resp: &Response, name: header::HeaderName) -> String {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn report_is_an_attachment() {
        let resp = report(report_request(None)).await.unwrap().into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            header_of(&resp, header::CONTENT_DISPOSITION),
            "attachment; filename=\"Trend_Report_ai_agents.md\""
        );
        assert!(header_of(&resp, header::CONTENT_TYPE).starts_with("text/markdown"));

        let resp = report(report_request(Some("json"))).await.unwrap().into_response();
        assert!(header_of(&resp, header::CONTENT_DISPOSITION).ends_with(".json\""));
    }

    #[tokio::test]
    async fn report_rejects_unknown_format() {
        let err = report(report_request(Some("pdf"))).await.err().unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        assert_eq!(healthz().await, "ok");
        let _ = router();
    }
}
