use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Longest meta description search engines display without cutting.
pub const DESCRIPTION_MAX_CHARS: usize = 160;
const DESCRIPTION_CUT_CHARS: usize = 157;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `s` when it fits in `max` characters, else its first `max - 1`
/// characters (trailing whitespace dropped) followed by `…`.
#[must_use]
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Cap a meta description at 160 characters: longer text is cut to 157
/// characters and `...` appended.
#[must_use]
pub fn clamp_description(s: &str) -> String {
    if s.chars().count() <= DESCRIPTION_MAX_CHARS {
        return s.to_string();
    }
    let kept: String = s.chars().take(DESCRIPTION_CUT_CHARS).collect();
    format!("{kept}...")
}

#[must_use]
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Number formatted like JavaScript's `String(n)` for the values prices take:
/// integral values lose the fractional part, others keep their shortest form.
#[must_use]
pub fn js_number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate_with_ellipsis("Galaxy S21", 42), "Galaxy S21");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let s = "Ä".repeat(50);
        let out = truncate_with_ellipsis(&s, 42);
        assert_eq!(out.chars().count(), 42);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn truncate_drops_trailing_space_before_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcd efgh", 6), "abcd…");
    }

    #[test]
    fn clamp_description_bounds() {
        let exact = "a".repeat(160);
        assert_eq!(clamp_description(&exact), exact);

        let long = "b".repeat(200);
        let out = clamp_description(&long);
        assert_eq!(out.chars().count(), 160);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn encode_uri_component_matches_js() {
        assert_eq!(encode_uri_component("tv-audio"), "tv-audio");
        assert_eq!(encode_uri_component("a b&c/d"), "a%20b%26c%2Fd");
        assert_eq!(encode_uri_component("küche"), "k%C3%BCche");
        assert_eq!(encode_uri_component("it's(ok)!"), "it's(ok)!");
    }

    #[test]
    fn js_number_formatting() {
        assert_eq!(js_number(699.0), "699");
        assert_eq!(js_number(19.99), "19.99");
        assert_eq!(js_number(0.5), "0.5");
    }
}
