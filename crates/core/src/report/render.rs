use crate::report::{ReportBlock, ReportDocument};
use std::fmt;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const USER_MESSAGE: &str = "Report generation failed. Please try again.";

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BAR_CELLS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "text/markdown; charset=utf-8",
            ReportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => anyhow::bail!("unknown report format {other:?} (expected md or json)"),
        }
    }
}

/// Rendering or writing a report failed. Nothing partial is left on disk.
#[derive(Debug)]
pub struct ReportError {
    pub stage: &'static str,
    pub detail: String,
}

impl ReportError {
    fn new(stage: &'static str, detail: impl fmt::Display) -> Self {
        Self {
            stage,
            detail: detail.to_string(),
        }
    }

    /// Generic text safe to show to an end user.
    pub fn user_message(&self) -> &'static str {
        USER_MESSAGE
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "report {} failed: {}", self.stage, self.detail)
    }
}

impl std::error::Error for ReportError {}

/// `Trend_Report_<topic>.<ext>` with whitespace runs collapsed to `_`. Path
/// separators and other characters not allowed in file names also become `_`,
/// so the result is always a single path component.
pub fn report_file_name(topic: &str, format: ReportFormat) -> String {
    let stem: String = topic
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("Trend_Report_{stem}.{}", format.extension())
}

pub fn render(doc: &ReportDocument, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Markdown => Ok(render_markdown(doc)),
        ReportFormat::Json => {
            serde_json::to_string_pretty(doc).map_err(|e| ReportError::new("render", e))
        }
    }
}

pub fn render_markdown(doc: &ReportDocument) -> String {
    let mut out = String::new();

    for (i, page) in doc.pages.iter().enumerate() {
        if i > 0 {
            out.push_str("\n---\n\n");
        }
        let _ = writeln!(out, "> {} · Page {}\n", page.header, page.page_number);

        for block in &page.blocks {
            write_block(&mut out, block);
        }
    }

    out
}

fn write_block(out: &mut String, block: &ReportBlock) {
    match block {
        ReportBlock::Heading { text, level } => {
            let hashes = "#".repeat((*level).clamp(1, 6) as usize);
            let _ = writeln!(out, "{hashes} {text}\n");
        }
        ReportBlock::Field { label, value } => {
            let _ = writeln!(out, "**{label}:** {value}  ");
        }
        ReportBlock::Score {
            value,
            out_of,
            caption,
            ..
        } => {
            let _ = writeln!(out, "\n**{value}** / {out_of} ({caption})\n");
        }
        ReportBlock::Paragraph { lines } => {
            out.push('\n');
            for line in lines {
                let _ = writeln!(out, "{line}");
            }
            out.push('\n');
        }
        ReportBlock::Bullet { text, detail } => {
            if detail.is_empty() {
                let _ = writeln!(out, "- {text}");
            } else {
                let _ = writeln!(out, "- **{text}**");
                for line in detail {
                    let _ = writeln!(out, "  {line}");
                }
            }
        }
        ReportBlock::LineChart {
            title,
            height,
            points,
            ..
        } => {
            let _ = writeln!(out, "\n#### {title}\n");
            if points.is_empty() {
                out.push_str("_No history available._\n\n");
            } else {
                let _ = writeln!(out, "`{}`\n", sparkline(points.iter().map(|p| p.y), *height));
            }
        }
        ReportBlock::BarChart { title, bars } => {
            let _ = writeln!(out, "\n#### {title}\n");
            if bars.is_empty() {
                out.push_str("_No driver breakdown available._\n\n");
                return;
            }
            out.push_str("| Driver | Level | Value |\n|---|---|---|\n");
            for bar in bars {
                let filled = if bar.track > 0.0 {
                    ((bar.length / bar.track) * BAR_CELLS as f64).round() as usize
                } else {
                    0
                };
                let filled = filled.min(BAR_CELLS);
                let _ = writeln!(
                    out,
                    "| {} | {}{} | {} |",
                    bar.label,
                    "█".repeat(filled),
                    "░".repeat(BAR_CELLS - filled),
                    bar.value
                );
            }
            out.push('\n');
        }
    }
}

fn sparkline(values: impl Iterator<Item = f64>, height: f64) -> String {
    values
        .map(|y| {
            let ratio = if height > 0.0 { (y / height).clamp(0.0, 1.0) } else { 0.0 };
            let idx = (ratio * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect()
}

/// Renders and writes the report into `dir` atomically, returning the final path.
pub async fn save_report(
    doc: &ReportDocument,
    dir: &Path,
    format: ReportFormat,
) -> Result<PathBuf, ReportError> {
    let body = render(doc, format)?;
    let dir = dir.to_path_buf();
    let target = dir.join(report_file_name(&doc.topic, format));

    let path = tokio::task::spawn_blocking(move || write_atomically(&dir, &target, body.as_bytes()))
        .await
        .map_err(|e| ReportError::new("write", e))??;

    tracing::info!(path = %path.display(), report_id = %doc.report_id, "report saved");
    Ok(path)
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir).map_err(|e| ReportError::new("write", e))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ReportError::new("write", e))?;
    tmp.write_all(bytes).map_err(|e| ReportError::new("write", e))?;
    tmp.flush().map_err(|e| ReportError::new("write", e))?;
    tmp.persist(target)
        .map_err(|e| ReportError::new("write", e.error))?;
    Ok(target.to_path_buf())
}
