use regex::Regex;
use std::sync::LazyLock;

// Whitespace, quote markers, bullets, dashes, check marks (with the emoji
// variation selector), digits, ")" and "." in any combination.
static RE_LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s>*•·\-–—✅☑✔\u{FE0F}0-9).]+").unwrap()
});

/// Drop list-marker noise ("1)", "2.", "•", "- ", "✅") from the start of a line.
pub fn sanitize_line(line: &str) -> String {
    let line = line.trim();
    RE_LIST_MARKER.replace(line, "").trim().to_string()
}
