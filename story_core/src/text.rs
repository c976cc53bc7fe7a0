use std::borrow::Cow;

pub const ELLIPSIS: char = '…';

pub const DEFAULT_TRUNCATE: usize = 56;
pub const EVENT_TRUNCATE: usize = 46;
pub const INTERVENTION_TRUNCATE: usize = 48;

/// Cut `text` to at most `max` characters, marking the cut with a trailing
/// ellipsis. Text already within the limit is returned unchanged, so
/// truncating twice gives the same result as truncating once.
pub fn truncate(text: &str, max: usize) -> Cow<'_, str> {
    if text.chars().count() <= max {
        return Cow::Borrowed(text);
    }
    if max == 0 {
        return Cow::Borrowed("");
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Signed two-decimal delta, `+` only for positive values.
pub fn format_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{delta:.2}")
    } else {
        format!("{delta:.2}")
    }
}

/// `0.85` -> `"85%"`
pub fn format_percent(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

pub fn format_coordinate(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through() {
        let text = "Joins to test wild ideas.";
        assert!(matches!(truncate(text, 56), Cow::Borrowed(t) if t == text));
    }

    #[test]
    fn text_at_limit_passes_through() {
        let text = "x".repeat(46);
        assert_eq!(truncate(&text, 46), text.as_str());
    }

    #[test]
    fn long_text_is_cut_with_ellipsis() {
        let text = "Deadline to enroll in Future Escape hits with group sign-ups trending.";
        let cut = truncate(text, 46);
        assert_eq!(cut.chars().count(), 46);
        assert!(cut.ends_with(ELLIPSIS));
        let expected: String = text.chars().take(45).collect();
        assert_eq!(cut.trim_end_matches(ELLIPSIS), expected);
    }

    #[test]
    fn truncation_is_idempotent() {
        let text = "Surfaces an optimized schedule that reduces friction without changing intent.";
        let once = truncate(text, 48).into_owned();
        let twice = truncate(&once, 48).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "Lets the default “neutral” choice stand";
        assert_eq!(truncate(text, 39), text);
        assert_eq!(truncate(text, 18), "Lets the default …");
    }

    #[test]
    fn zero_limit_yields_empty() {
        assert_eq!(truncate("anything", 0), "");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn length_never_exceeds_limit() {
        let text = "Matches them with complementary co-hosts and drafts a facilitation kit.";
        for max in 0..80 {
            assert!(truncate(text, max).chars().count() <= max);
        }
    }

    #[test]
    fn delta_formatting() {
        assert_eq!(format_delta(0.06), "+0.06");
        assert_eq!(format_delta(-0.02), "-0.02");
        assert_eq!(format_delta(0.0), "0.00");
        assert_eq!(format_delta(0.1), "+0.10");
    }

    #[test]
    fn percent_and_coordinate_formatting() {
        assert_eq!(format_percent(0.85), "85%");
        assert_eq!(format_percent(0.92), "92%");
        assert_eq!(format_coordinate(0.3), "0.30");
    }
}
