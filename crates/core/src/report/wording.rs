//! Softened wording for exported reports. The live insight text is left as is.

use regex::Regex;
use std::sync::OnceLock;

const SUBSTITUTIONS: [(&str, &str); 4] = [
    (r"(?i)critical alert", "Strategic caution advised"),
    (r"(?i)immediate exit", "Reduced scaling recommended"),
    (r"(?i)capital risk", "Investment momentum plateau"),
    (r"(?i)collapse", "Late-stage decline phase"),
];

fn patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SUBSTITUTIONS
            .iter()
            .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
            .collect()
    })
}

/// Applies every substitution in order. No replacement contains a pattern,
/// so applying this twice is the same as applying it once.
pub fn soften(text: &str) -> String {
    let mut out = text.to_string();
    for (re, replacement) in patterns() {
        out = re.replace_all(&out, regex::NoExpand(*replacement)).into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_case_insensitively() {
        assert_eq!(
            soften("CRITICAL ALERT: immediate EXIT advised"),
            "Strategic caution advised: Reduced scaling recommended advised"
        );
        assert_eq!(
            soften("Capital Risk ahead before the Collapse."),
            "Investment momentum plateau ahead before the Late-stage decline phase."
        );
    }

    #[test]
    fn leaves_unrelated_text_alone() {
        let text = "Stop campaign spend immediately. Exit trend safely.";
        assert_eq!(soften(text), text);
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "critical alert",
            "collapse collapse COLLAPSE",
            "capital riskimmediate exit",
            "Trend collapsed after a critical alertcollapse",
            "",
        ];
        for input in inputs {
            let once = soften(input);
            assert_eq!(soften(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn no_replacement_reintroduces_a_pattern() {
        for (re, _) in patterns() {
            for (_, replacement) in SUBSTITUTIONS {
                assert!(!re.is_match(replacement));
            }
        }
    }
}
