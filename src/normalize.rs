use unicode_normalization::UnicodeNormalization;

/// Canonicalize chat text before any matching happens.
///
/// Carriage returns, BOM and zero-width characters go first, so a letter and
/// a combining mark they separated still compose. Then NFKC, so look-alike
/// code points collapse to one spelling, then the remaining transport
/// artifacts: Unicode line/paragraph separators, exotic spaces, fullwidth
/// commas and long dashes. The result is trimmed.
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text: String = text
        .chars()
        .filter(|ch| !is_invisible(*ch))
        .nfkc()
        .collect();
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2028}' | '\u{2029}' => out.push('\n'),
            '\u{00A0}' | '\u{2006}' | '\u{2007}' | '\u{2009}' | '\u{202F}' => out.push(' '),
            '\u{FF0C}' => out.push(','),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            _ => out.push(ch),
        }
    }
    out.trim().to_string()
}

fn is_invisible(ch: char) -> bool {
    matches!(ch, '\r' | '\u{FEFF}' | '\u{200B}' | '\u{200C}' | '\u{200D}')
}
