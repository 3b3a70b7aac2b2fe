use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendfall_core::domain::trend::{TimeWindow, TrendTelemetry};
use trendfall_core::report::render::ReportFormat;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "trendfall", about = "Trend decline-risk analysis and reports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a topic or URL and print the insight as JSON.
    Analyze {
        topic: String,
        #[arg(long, default_value = "48h")]
        window: TimeWindow,
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Classify raw telemetry without any network access.
    Classify {
        #[arg(long)]
        saturation: f64,
        #[arg(long)]
        current_velocity: f64,
        #[arg(long)]
        peak_velocity: f64,
        #[arg(long, default_value_t = 50.0)]
        engagement: f64,
        #[arg(long, default_value = "manual input")]
        topic: String,
    },
    /// Analyze a topic and save the report, printing its path.
    Report {
        topic: String,
        #[arg(long, default_value = "48h")]
        window: TimeWindow,
        /// md or json
        #[arg(long, default_value = "md")]
        format: ReportFormat,
        /// Output directory. Defaults to TRENDFALL_REPORT_DIR, then the current directory.
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        backend: BackendArgs,
    },
}

#[derive(Debug, Args)]
struct BackendArgs {
    /// Analysis service base URL. Overrides TRENDFALL_BACKEND_URL.
    #[arg(long)]
    backend_url: Option<String>,

    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Classify locally without contacting the service.
    #[arg(long)]
    offline: bool,

    /// On service failure classify locally instead of showing the fixed fallback.
    #[arg(long)]
    local_fallback: bool,
}

impl From<BackendArgs> for commands::Backend {
    fn from(a: BackendArgs) -> Self {
        Self {
            url: a.backend_url,
            timeout_secs: a.timeout_secs,
            offline: a.offline,
            local_fallback: a.local_fallback,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = trendfall_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            topic,
            window,
            backend,
        } => {
            let out = commands::analyze(&settings, &backend.into(), &topic, window).await?;
            println!("{out}");
        }
        Command::Classify {
            saturation,
            current_velocity,
            peak_velocity,
            engagement,
            topic,
        } => {
            let telemetry = TrendTelemetry {
                topic,
                current_velocity,
                peak_velocity,
                engagement_score: engagement,
                saturation_index: saturation,
                history: Vec::new(),
            };
            println!("{}", commands::classify(&telemetry)?);
        }
        Command::Report {
            topic,
            window,
            format,
            out,
            backend,
        } => {
            let path =
                commands::report(&settings, &backend.into(), &topic, window, format, out).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
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

    #[test]
    fn parses_report_flags() {
        let cli = Cli::try_parse_from([
            "trendfall", "report", "ai agents", "--window", "7d", "--format", "json", "--offline",
        ])
        .unwrap();
        let Command::Report {
            topic,
            window,
            format,
            out,
            backend,
        } = cli.command
        else {
            panic!("expected report");
        };
        assert_eq!(topic, "ai agents");
        assert_eq!(window, TimeWindow::Week);
        assert_eq!(format, ReportFormat::Json);
        assert!(out.is_none());
        assert!(backend.offline);
    }

    #[test]
    fn rejects_unknown_window() {
        assert!(Cli::try_parse_from(["trendfall", "analyze", "x", "--window", "1y"]).is_err());
    }

    #[test]
    fn classify_defaults_engagement() {
        let cli = Cli::try_parse_from([
            "trendfall",
            "classify",
            "--saturation",
            "92",
            "--current-velocity",
            "120",
            "--peak-velocity",
            "5000",
        ])
        .unwrap();
        match cli.command {
            Command::Classify { engagement, .. } => assert_eq!(engagement, 50.0),
            other => panic!("unexpected {other:?}"),
        }
    }
}
