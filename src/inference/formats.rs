//! Format detection for string values
//!
//! Two checks feed the classifier: calendar dates and embedded markup. Both
//! are cheap pattern checks; dates are additionally validated with chrono so
//! that `2024-13-45` is not mistaken for a date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Regex patterns for format detection
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Known HTML element names that mark a string as rich text
const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "audio", "b", "blockquote", "body", "br",
    "button", "caption", "code", "col", "colgroup", "dd", "del", "details", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hr", "html", "i", "iframe", "img", "input", "ins", "label",
    "li", "link", "main", "mark", "meta", "nav", "ol", "p", "picture", "pre", "s", "section",
    "small", "source", "span", "strong", "sub", "sup", "table", "tbody", "td", "tfoot", "th",
    "thead", "tr", "u", "ul", "video",
];

static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)</?(?:{})\b[^>]*>", HTML_TAGS.join("|"))).unwrap()
});

/// Whether a string parses as a calendar date or date-time
pub fn is_date_like(value: &str) -> bool {
    let value = value.trim();

    if DATE_REGEX.is_match(value) {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    }

    if !DATETIME_REGEX.is_match(value) {
        return false;
    }

    DateTime::parse_from_rfc3339(value).is_ok()
        || NAIVE_DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
}

/// Whether a string contains an HTML element tag
pub fn contains_markup(value: &str) -> bool {
    MARKUP_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_date() {
        assert!(is_date_like("2024-01-15"));
        assert!(is_date_like("2024-12-31"));
        assert!(!is_date_like("2024-1-15"));
        assert!(!is_date_like("2024-13-45"));
    }

    #[test]
    fn test_detect_datetime() {
        assert!(is_date_like("2024-01-15T10:30:00"));
        assert!(is_date_like("2024-01-15T10:30:00Z"));
        assert!(is_date_like("2020-11-19T00:24:07.845Z"));
        assert!(is_date_like("2024-01-15T10:30:00+05:00"));
        assert!(is_date_like("2024-01-15 10:30:00"));
    }

    #[test]
    fn test_plain_strings_are_not_dates() {
        assert!(!is_date_like("Hello"));
        assert!(!is_date_like("3"));
        assert!(!is_date_like(""));
        assert!(!is_date_like("5fb5b2c74ed9430012005246"));
    }

    #[test]
    fn test_detect_markup() {
        assert!(contains_markup("<p>x</p>"));
        assert!(contains_markup("line<br/>break"));
        assert!(contains_markup("<DIV class=\"a\">x"));
        assert!(contains_markup("text then </strong>"));
    }

    #[test]
    fn test_plain_text_is_not_markup() {
        assert!(!contains_markup("Hello"));
        assert!(!contains_markup("a < b and c > d"));
        assert!(!contains_markup("<notatag>"));
        assert!(!contains_markup("<pizza>"));
    }
}
