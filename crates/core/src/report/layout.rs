//! A4 page geometry (millimetres) and text wrapping.

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 25.0;
pub const CONTENT_WIDTH: f64 = PAGE_WIDTH - MARGIN * 2.0;

/// Key Findings content past this y starts a continuation page.
pub const FINDINGS_Y_LIMIT: f64 = PAGE_HEIGHT - 30.0;
pub const FINDINGS_START_Y: f64 = 90.0;
pub const CONTINUATION_START_Y: f64 = 40.0;
pub const FINDING_LINE_HEIGHT: f64 = 5.0;
pub const FINDING_GAP: f64 = 12.0;

pub const LINE_CHART_HEIGHT: f64 = 50.0;
pub const BAR_TRACK_LENGTH: f64 = 100.0;

const POINTS_TO_MM: f64 = 0.3528;
/// Average Helvetica glyph width as a share of the font size.
const AVG_GLYPH_EM: f64 = 0.5;

pub fn chars_per_line(width_mm: f64, font_size_pt: f64) -> usize {
    let glyph = font_size_pt * POINTS_TO_MM * AVG_GLYPH_EM;
    if glyph <= 0.0 {
        return 1;
    }
    ((width_mm / glyph).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than a line are split. Explicit newlines
/// are kept, and an empty input line yields an empty output line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        lines.push(current);
    }

    lines
}
