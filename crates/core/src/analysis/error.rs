use std::fmt;
use std::time::Duration;

/// Why a live analysis could not be used. Every variant is recoverable by
/// substituting the fallback payload.
#[derive(Debug, Clone)]
pub enum AnalysisError {
    Timeout {
        after: Duration,
    },
    Transport {
        detail: String,
    },
    Status {
        status: u16,
        raw_output: Option<String>,
    },
    Decode {
        detail: String,
        raw_output: Option<String>,
    },
    Invalid {
        detail: String,
    },
}

impl AnalysisError {
    pub fn stage(&self) -> &'static str {
        match self {
            AnalysisError::Timeout { .. } => "timeout",
            AnalysisError::Transport { .. } => "transport",
            AnalysisError::Status { .. } => "http",
            AnalysisError::Decode { .. } => "decode",
            AnalysisError::Invalid { .. } => "validate",
        }
    }

    pub fn raw_output(&self) -> Option<&str> {
        match self {
            AnalysisError::Status { raw_output, .. } | AnalysisError::Decode { raw_output, .. } => {
                raw_output.as_deref()
            }
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Timeout { after } => {
                write!(f, "analysis service timed out after {}ms", after.as_millis())
            }
            AnalysisError::Transport { detail } => {
                write!(f, "analysis service unreachable: {detail}")
            }
            AnalysisError::Status { status, .. } => {
                write!(f, "analysis service returned status={status}")
            }
            AnalysisError::Decode { detail, .. } => {
                write!(f, "analysis response could not be decoded: {detail}")
            }
            AnalysisError::Invalid { detail } => {
                write!(f, "analysis response failed validation: {detail}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
