use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,6}\s[^\n]*)$").expect("HEADING_LINE is a valid regex"));
static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("EXCESS_NEWLINES is a valid regex"));
static TRAILING_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)[ \t]+$").expect("TRAILING_SPACES is a valid regex"));

/// Puts Markdown headings on their own paragraph and squeezes runs of blank
/// lines down to one.
pub fn format_notes(notes: &str) -> String {
    let normalized = notes.replace("\r\n", "\n");
    let without_trailing = TRAILING_SPACES.replace_all(&normalized, "");
    let spaced = HEADING_LINE.replace_all(&without_trailing, "\n$1\n");
    EXCESS_NEWLINES
        .replace_all(&spaced, "\n\n")
        .trim()
        .to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
