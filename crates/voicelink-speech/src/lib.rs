//! Rewrites backend text into speech-friendly output.
//!
//! Conversational backends format replies for screens: headings, blank-line
//! paragraph breaks, bullet hyphens, snake_case identifiers. A speech
//! synthesizer reads all of that out loud, so [`normalize`] flattens the
//! markup into plain sentences and, for decimal-comma regions, rewrites
//! `2.4` into `2,4` so the number is spoken in the local convention.

use regex::Regex;
use std::sync::LazyLock;

/// Region code whose numeric convention uses a decimal comma.
pub const DECIMAL_COMMA_REGION: &str = "DE";

/// Matches a numeral run `digits.digits`; up to three digits after the
/// point, with any overflow digits caught in the third group. The `regex`
/// crate has no negative lookahead, so "not followed by another digit" is
/// expressed by checking that the overflow group is empty.
static DECIMAL_POINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d{1,3})(\d*)").expect("valid decimal pattern"));

/// Flattens display formatting out of `text` and localizes decimal
/// separators for the given region code. Pure; the input is never mutated.
pub fn normalize(text: &str, region: &str) -> String {
    let mut speech = text
        .replace(":\n\n", "")
        .replace("\n\n", ". ")
        .replace('\n', ",")
        .replace('-', "")
        .replace('_', " ");

    if region == DECIMAL_COMMA_REGION {
        speech = rewrite_decimal_points(&speech);
    }

    speech
}

/// Rewrites `2.4` into `2,4` wherever at most three digits follow the
/// point. A non-empty overflow group means the run is not a decimal; the
/// scan then resumes one byte past the run's start rather than past its
/// end, so a qualifying run ending inside the rejected one still matches
/// the way a backtracking engine would find it.
fn rewrite_decimal_points(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut search = 0;
    while let Some(caps) = DECIMAL_POINT_RE.captures_at(text, search) {
        let Some(m) = caps.get(0) else { break };
        if caps[3].is_empty() {
            out.push_str(&text[copied..m.start()]);
            out.push_str(&caps[1]);
            out.push(',');
            out.push_str(&caps[2]);
            copied = m.end();
            search = m.end();
        } else {
            search = m.start() + 1;
        }
    }
    out.push_str(&text[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_paragraph_breaks_and_markup() {
        let text = "Here is the forecast:\n\nSunny all day\n\nHigh of 21\nLow of 12";
        assert_eq!(
            normalize(text, "US"),
            "Here is the forecastSunny all day. High of 21,Low of 12"
        );
    }

    #[test]
    fn strips_hyphens_and_spaces_underscores() {
        assert_eq!(normalize("well-known snake_case", "US"), "wellknown snake case");
    }

    #[test]
    fn decimal_rewrite_applies_only_to_comma_region() {
        assert_eq!(normalize("2.4", "DE"), "2,4");
        assert_eq!(normalize("2.4", "US"), "2.4");
        assert_eq!(normalize("It is 21.5 degrees", "DE"), "It is 21,5 degrees");
    }

    #[test]
    fn long_digit_runs_are_not_decimals() {
        // 4+ digits after the point fall outside the decimal heuristic.
        assert_eq!(normalize("1.2345", "DE"), "1.2345");
        // The first group of a dotted thousands number still has <=3 trailing
        // digits, so it is rewritten; the remainder is left alone.
        assert_eq!(normalize("1.234.567", "DE"), "1,234.567");
    }

    #[test]
    fn overlapping_runs_still_rewrite_the_trailing_decimal() {
        // "1.2345" is rejected for its fourth trailing digit, but the
        // "2345.6" run ending inside it is a decimal and is rewritten.
        assert_eq!(normalize("1.2345.6", "DE"), "1.2345,6");
        assert_eq!(normalize("1.23456.7.8", "DE"), "1.23456,7.8");
    }

    #[test]
    fn normalization_is_stable_on_normalized_text() {
        let once = normalize("Temperature:\n\nnow 2.4 to-day_x\n\nmore", "DE");
        let twice = normalize(&once, "DE");
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize("", "DE"), "");
    }
}
