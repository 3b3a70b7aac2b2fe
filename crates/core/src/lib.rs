pub mod analysis;
pub mod classify;
pub mod domain;
pub mod fixtures;
pub mod report;
pub mod view;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;
    use std::time::Duration;

    pub const DEFAULT_TIMEOUT_SECS: u64 = 8;
    pub const DEFAULT_PORT: u16 = 8000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub backend_url: Option<String>,
        pub timeout_secs: u64,
        pub report_dir: Option<PathBuf>,
        pub sentry_dsn: Option<String>,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let timeout_secs = match std::env::var("TRENDFALL_TIMEOUT_SECS") {
                Ok(s) => s
                    .parse::<u64>()
                    .with_context(|| format!("TRENDFALL_TIMEOUT_SECS is not a number: {s}"))?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            };

            let port = std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT);

            Ok(Self {
                backend_url: std::env::var("TRENDFALL_BACKEND_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                timeout_secs,
                report_dir: std::env::var("TRENDFALL_REPORT_DIR").ok().map(PathBuf::from),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                port,
            })
        }

        pub fn require_backend_url(&self) -> anyhow::Result<&str> {
            self.backend_url
                .as_deref()
                .context("TRENDFALL_BACKEND_URL is required")
        }

        pub fn timeout(&self) -> Duration {
            Duration::from_secs(self.timeout_secs.max(1))
        }
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                backend_url: None,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                report_dir: None,
                sentry_dsn: None,
                port: DEFAULT_PORT,
            }
        }
    }
}
