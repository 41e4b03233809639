//! Turn arbitrary strings into safe css identifiers and readable labels

use std::sync::LazyLock;

use regex::Regex;

/// Matches anything that looks like a html tag
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "Pattern is a constant")]
    Regex::new(r"(?s)<[^>]*>?").expect("tag pattern")
});

/// Matches percent encoded octets
static OCTET: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "Pattern is a constant")]
    Regex::new(r"%[a-fA-F0-9]{2}").expect("octet pattern")
});

/// Remove html tags, leaving their text content in place.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    TAG.replace_all(input, "").into_owned()
}

/// Reduce a string to the characters allowed in a html class name.
///
/// Percent encoded octets are removed first, then anything outside `[A-Za-z0-9_-]`.
#[must_use]
pub fn sanitize_html_class(input: &str) -> String {
    OCTET
        .replace_all(input, "")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Convert a title into a dash separated slug.
///
/// Accented letters are transliterated, `_` is kept, `.` and whitespace become dashes.
///
/// ```rust
/// # use pulsar_style::css::sanitize::sanitize_title;
/// assert_eq!(sanitize_title("<b>Arrow</b> Right!"), "arrow-right");
/// assert_eq!(sanitize_title("Café_Menu"), "cafe_menu");
/// ```
#[must_use]
pub fn sanitize_title(input: &str) -> String {
    let stripped = deunicode::deunicode(&strip_tags(input)).to_lowercase();

    let mut result = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            result.push(c);
        } else if (c == '-' || c == '.' || c.is_whitespace()) && !result.ends_with('-') {
            result.push('-');
        }
    }

    result.trim_matches('-').to_owned()
}

/// Normalize a user supplied name into a slug.
#[must_use]
pub fn sanitize_slug(input: &str) -> String {
    sanitize_title(&input.to_lowercase())
}

/// Convert a slug into a human readable label, `arrow-right` becomes `Arrow Right`.
#[must_use]
pub fn format_label(slug: &str) -> String {
    let spaced = slug.replace('-', " ");

    let mut result = String::with_capacity(spaced.len());
    let mut word_start = true;
    for c in spaced.chars() {
        if word_start {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        word_start = c.is_whitespace();
    }
    result
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn strips_tags() {
        assert_eq!(strip_tags("<em>top</em>"), "top");
        assert_eq!(strip_tags("color<script>"), "color");
        assert_eq!(strip_tags("plain"), "plain");
    }

    #[test]
    fn html_class_drops_octets_and_symbols() {
        assert_eq!(sanitize_html_class("arrow%20right"), "arrowright");
        assert_eq!(sanitize_html_class("a.b c!d"), "abcd");
        assert_eq!(sanitize_html_class("Keep_Me-1"), "Keep_Me-1");
    }

    #[test]
    fn title_slugs() {
        assert_eq!(sanitize_title("Hello   World"), "hello-world");
        assert_eq!(sanitize_title("--edge--case--"), "edge-case");
        assert_eq!(sanitize_title("snake_case.name"), "snake_case-name");
        assert_eq!(sanitize_title("arrow_right"), "arrow_right");
        assert_eq!(sanitize_title("Café"), "cafe");
        assert_eq!(sanitize_title("Über Größe"), "uber-grosse");
        assert_eq!(sanitize_title("!!!"), "");
    }

    #[test]
    fn labels() {
        assert_eq!(format_label("arrow-right"), "Arrow Right");
        assert_eq!(format_label("x"), "X");
        assert_eq!(format_label(""), "");
    }

    proptest! {
        #[test]
        fn html_class_is_identifier_safe(input in ".*") {
            let result = sanitize_html_class(&input);
            prop_assert!(result.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }

        #[test]
        fn slugs_are_stable(input in ".*") {
            let once = sanitize_slug(&input);
            prop_assert_eq!(sanitize_slug(&once), once.clone());
            prop_assert!(!once.starts_with('-') && !once.ends_with('-'));
        }
    }
}
