use crate::analysis::error::AnalysisError;
use crate::analysis::json;
use crate::analysis::{AnalysisClient, Provider};
use crate::config::Settings;
use crate::domain::contract::{AnalysisRequest, AnalysisResponse};
use anyhow::Context;
use std::time::Duration;

const ANALYZE_PATH: &str = "/analyze";

/// Client for an external analysis service speaking the `/analyze` contract.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build analysis http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.require_backend_url()?.to_string();
        Self::new(base_url, settings.timeout())
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ANALYZE_PATH)
    }

    fn transport_error(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout {
                after: self.timeout,
            }
        } else {
            AnalysisError::Transport {
                detail: err.to_string(),
            }
        }
    }

    async fn post_once(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let res = self
            .http
            .post(self.url())
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        let text = res.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                raw_output: Some(text),
            });
        }

        json::parse_response(&text)
    }
}

#[async_trait::async_trait]
impl AnalysisClient for HttpAnalysisClient {
    fn provider(&self) -> Provider {
        Provider::Http
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        // The reqwest timeout covers the request; this also bounds body reads
        // that trickle in under it.
        match tokio::time::timeout(self.timeout, self.post_once(request)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout {
                after: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::insight::RiskTier;
    use crate::domain::trend::TimeWindow;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request(topic: &str) -> AnalysisRequest {
        AnalysisRequest {
            topic: topic.to_string(),
            time_window: TimeWindow::TwoDays,
        }
    }

    #[tokio::test]
    async fn decodes_live_response() {
        let app = Router::new().route(
            "/analyze",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["timeWindow"], "48h");
                Json(json!({
                    "insight": {
                        "riskScore": 88,
                        "declineRisk": "High",
                        "summary": format!("Decline risk is HIGH for '{}'.", body["topic"].as_str().unwrap()),
                        "signals": [{"metric": "Engagement Drop", "status": "Critical", "explanation": "x"}],
                        "actions": ["Stop ad spend immediately"]
                    },
                    "trend": [{"timestamp": "1h ago", "value": 900}, {"timestamp": "0h ago", "value": 400}]
                }))
            }),
        );
        let base = serve(app).await;

        let client = HttpAnalysisClient::new(format!("{base}/"), Duration::from_secs(5)).unwrap();
        let resp = client.analyze(&request("grimace")).await.unwrap();
        assert_eq!(resp.insight.risk_tier, RiskTier::High);
        assert_eq!(resp.insight.summary, "Decline risk is HIGH for 'grimace'.");
        assert_eq!(resp.trend.history.len(), 2);
    }

    #[tokio::test]
    async fn maps_non_success_status() {
        let app = Router::new().route(
            "/analyze",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(app).await;

        let client = HttpAnalysisClient::new(base, Duration::from_secs(5)).unwrap();
        let err = client.analyze(&request("x")).await.unwrap_err();
        match err {
            AnalysisError::Status { status, raw_output } => {
                assert_eq!(status, 500);
                assert_eq!(raw_output.as_deref(), Some("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn times_out_slow_service() {
        let app = Router::new().route(
            "/analyze",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let base = serve(app).await;

        let client = HttpAnalysisClient::new(base, Duration::from_millis(200)).unwrap();
        let err = client.analyze(&request("x")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Timeout { .. }), "{err}");
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            HttpAnalysisClient::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = client.analyze(&request("x")).await.unwrap_err();
        assert!(
            matches!(err, AnalysisError::Transport { .. } | AnalysisError::Timeout { .. }),
            "{err}"
        );
    }

    #[test]
    fn from_settings_requires_backend_url() {
        let settings = Settings::default();
        assert!(HttpAnalysisClient::from_settings(&settings).is_err());

        let settings = Settings {
            backend_url: Some("http://localhost:8000".into()),
            ..Settings::default()
        };
        let client = HttpAnalysisClient::from_settings(&settings).unwrap();
        assert_eq!(client.url(), "http://localhost:8000/analyze");
    }
}
