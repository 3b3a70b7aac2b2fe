use crate::analysis::error::AnalysisError;
use crate::domain::contract::{AnalysisResponse, WireAnalysisResponse};

/// Decodes and validates an analysis response body.
pub fn parse_response(text: &str) -> Result<AnalysisResponse, AnalysisError> {
    let wire = serde_json::from_str::<WireAnalysisResponse>(text.trim()).map_err(|e| {
        AnalysisError::Decode {
            detail: e.to_string(),
            raw_output: Some(text.to_string()),
        }
    })?;
    wire.validate_and_into_response()
        .map_err(|e| AnalysisError::Invalid {
            detail: format!("{e:#}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> String {
        json!({
            "insight": {
                "riskScore": 12,
                "declineRisk": "Low",
                "summary": "Decline risk is LOW.",
                "signals": [],
                "actions": ["Ride the wave"]
            },
            "trend": [{"timestamp": "0h ago", "value": 1000}]
        })
        .to_string()
    }

    #[test]
    fn wrapped_or_fenced_bodies_are_decode_errors() {
        let fenced = format!("```json\n{}\n```\n", valid_body());
        let err = parse_response(&fenced).unwrap_err();
        assert_eq!(err.stage(), "decode");
        assert_eq!(err.raw_output(), Some(fenced.as_str()));

        let padded = format!("junk {} junk", valid_body());
        assert_eq!(parse_response(&padded).unwrap_err().stage(), "decode");
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let resp = parse_response(&format!("\n  {}\n", valid_body())).unwrap();
        assert_eq!(resp.insight.risk_score, 12);
    }

    #[test]
    fn parse_response_accepts_valid_body() {
        let resp = parse_response(&valid_body()).unwrap();
        assert_eq!(resp.insight.risk_score, 12);
        assert_eq!(resp.trend.history.len(), 1);
    }

    #[test]
    fn parse_response_reports_decode_errors_with_raw_output() {
        let err = parse_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert_eq!(err.stage(), "decode");
        assert_eq!(err.raw_output(), Some("<html>502 Bad Gateway</html>"));
    }

    #[test]
    fn parse_response_reports_validation_errors() {
        let body = json!({
            "insight": {"riskScore": 12, "declineRisk": "Low", "summary": " "},
            "trend": []
        })
        .to_string();
        let err = parse_response(&body).unwrap_err();
        assert_eq!(err.stage(), "validate");
    }
}
