use once_cell::sync::Lazy;
use regex::Regex;

/// Footnote / citation markers such as `[1]` or `[note 3]`. Non-greedy, one line.
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").expect("valid bracket regex"));

static NOT_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").expect("valid numeric regex"));

pub fn strip_brackets(raw: &str) -> String {
    BRACKETED.replace_all(raw, "").into_owned()
}

/// Header label cleanup: drop citation markers and the `(s)` plural suffix.
pub fn clean_header(raw: &str) -> String {
    strip_brackets(raw).replace("(s)", "").trim().to_string()
}

/// Cell text cleanup: drop citation markers and double quotes, then trim.
pub fn clean_text(raw: &str) -> String {
    strip_brackets(raw).replace('"', "").trim().to_string()
}

/// Read a number out of free text like `4.8 billion[4]`.
/// Anything that doesn't leave a finite float behind is `None`.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let cleaned = clean_text(raw);
    let digits = NOT_NUMERIC.replace_all(&cleaned, "");
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_cleanup() {
        assert_eq!(clean_header("Song[1]"), "Song");
        assert_eq!(clean_header("Artist(s)"), "Artist");
        assert_eq!(clean_header(" Streams (billions)[2] "), "Streams (billions)");
        assert_eq!(clean_header("Date published[a][b]"), "Date published");
        assert_eq!(clean_header("[1]"), "");
    }

    #[test]
    fn bracket_match_is_non_greedy() {
        assert_eq!(strip_brackets("a[1] b [2]c"), "a b c");
        assert_eq!(strip_brackets("keep ] this [ and"), "keep ] this [ and");
    }

    #[test]
    fn text_cleanup() {
        assert_eq!(clean_text("\"Blinding Lights\"[3]"), "Blinding Lights");
        assert_eq!(clean_text("  The Weeknd  "), "The Weeknd");
        assert_eq!(clean_text("Ed Sheeran[note 1]"), "Ed Sheeran");
    }

    #[test]
    fn text_cleanup_is_idempotent() {
        let samples = [
            "\"Blinding Lights\"[3]",
            "[[x]]",
            "[[x]y]",
            "a]b[c",
            "\"\" [\"] \"",
            "multi\n[line]\nvalue[",
            "  ",
            "",
            "Shape of You",
        ];
        for s in samples {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn numbers() {
        assert_eq!(coerce_number("4.8 billion[4]"), Some(4.8));
        assert_eq!(coerce_number("3,912,337,219"), Some(3_912_337_219.0));
        assert_eq!(coerce_number("\"2.1\""), Some(2.1));
        assert_eq!(coerce_number(".5"), Some(0.5));
    }

    #[test]
    fn numbers_never_fail() {
        for s in ["N/A", "", "—", ".", "1.2.3", "[4.8]", "nan", "inf"] {
            assert_eq!(coerce_number(s), None, "input {s:?}");
        }
        let huge = "9".repeat(400);
        assert_eq!(coerce_number(&huge), None);
    }
}
