use crate::city::normalize_city;
use crate::config::Config;
use crate::line::parse_line;
use crate::normalize::normalize_text;
use log::{debug, info, warn};
use serde::Serialize;

/// One delivery-date update, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecord {
    pub city: String,
    pub original_city: String,
    pub date: String,
    pub restrictions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedLine {
    /// 1-based, counting non-blank lines only.
    pub line_no: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub records: Vec<ParsedRecord>,
    pub total_lines: usize,
    pub unrecognized: Vec<UnrecognizedLine>,
}

impl BatchResult {
    pub fn recognized_lines(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse a whole chat message, one record per recognized line.
///
/// Lines are split on line breaks only; commas inside an exception clause
/// never start a new line. Output keeps input order, duplicates included.
pub fn parse_batch(text: &str, config: &Config) -> BatchResult {
    let normalized = normalize_text(text);
    let lines: Vec<&str> = normalized
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let with_keyword: Vec<&&str> = lines
        .iter()
        .filter(|l| l.to_lowercase().contains("кроме"))
        .collect();
    debug!("lines with exception keyword: {}", with_keyword.len());
    for (i, l) in with_keyword.iter().take(20).enumerate() {
        debug!("  [кроме {}] raw={:?} norm={:?}", i, l, normalize_text(l));
    }

    let mut result = BatchResult {
        total_lines: lines.len(),
        ..BatchResult::default()
    };

    for (i, line) in lines.iter().enumerate() {
        match parse_line(line, config) {
            Some(parsed) => result.records.push(ParsedRecord {
                city: normalize_city(&parsed.city, &config.city_aliases),
                original_city: parsed.city,
                date: parsed.start_date,
                restrictions: parsed.restrictions,
            }),
            None => {
                let preview: String = line.chars().take(50).collect();
                let ellipsis = if line.chars().count() > 50 { "..." } else { "" };
                warn!("line {} not recognized: {:?}{}", i + 1, preview, ellipsis);
                result.unrecognized.push(UnrecognizedLine {
                    line_no: i + 1,
                    text: line.to_string(),
                });
            }
        }
    }

    info!(
        "recognized {} of {} lines",
        result.recognized_lines(),
        result.total_lines
    );
    result
}

/// Like [`parse_batch`], for raw message bytes.
///
/// Input that is not valid UTF-8 is not a message; it yields an empty
/// result instead of an error.
pub fn parse_bytes(bytes: &[u8], config: &Config) -> BatchResult {
    match std::str::from_utf8(bytes) {
        Ok(text) => parse_batch(text, config),
        Err(e) => {
            warn!("input is not valid UTF-8: {}", e);
            BatchResult::default()
        }
    }
}
