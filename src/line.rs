use crate::config::Config;
use crate::dates::normalize_date_token;
use crate::normalize::normalize_text;
use crate::sanitize::sanitize_line;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

// City, "с"/"со", start date. Anchored at the start only: whatever follows the
// date (an exception clause, transport garbage) is left alone.
static RE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(?:с|со)\s+([0-9]{1,2}\.[0-9]{1,2})(?:[^0-9A-Za-z_]|$)").unwrap()
});
static RE_EXCEPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)кроме").unwrap());
static RE_CLAUSE_LEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s:,\-]+").unwrap());
static RE_CLAUSE_TAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s)\]]+$").unwrap());
static RE_AND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+и\s+").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_COMMAS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",+").unwrap());

/// One recognized line, before city canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub city: String,
    pub start_date: String,
    pub restrictions: Option<String>,
}

/// Parse `"<city> с <D.M> [(кроме <dates>)]"`.
///
/// Returns `None` only when the city/date head is missing; once the head
/// matches, a record always comes back.
pub fn parse_line(raw_line: &str, config: &Config) -> Option<ParsedLine> {
    let s = sanitize_line(&normalize_text(raw_line));
    if s.is_empty() {
        return None;
    }

    let caps = RE_HEAD.captures(&s)?;
    let city = caps[1].trim().to_string();
    let start_date = normalize_date_token(caps[2].trim());
    let restrictions = RE_EXCEPT
        .find(&s)
        .and_then(|m| parse_exception_clause(&s[m.end()..], &config.sentinel_phrases));

    match &restrictions {
        Some(r) => debug!("recognized with restrictions: {} - {}, кроме {}", city, start_date, r),
        None => debug!("recognized: {} - {}", city, start_date),
    }

    Some(ParsedLine {
        city,
        start_date,
        restrictions,
    })
}

/// Clean up the text following the exception keyword.
///
/// Sentinel phrases are kept verbatim; anything else is treated as a date
/// list separated by commas or "и". Bare day numbers ("16") are not dates
/// to [`normalize_date_token`] and pass through as typed.
fn parse_exception_clause(tail: &str, sentinel_phrases: &[String]) -> Option<String> {
    let clause = RE_CLAUSE_LEAD.replace(tail, "");
    let clause = RE_CLAUSE_TAIL.replace(&clause, "");
    let clause = clause.trim();
    if clause.is_empty() {
        return None;
    }

    let lower = clause.to_lowercase();
    if sentinel_phrases
        .iter()
        .any(|p| !p.is_empty() && lower.contains(&p.to_lowercase()))
    {
        return Some(clause.to_string());
    }

    let list = RE_AND.replace_all(clause, ", ");
    let list = RE_WHITESPACE.replace_all(&list, " ");
    let list = RE_COMMAS.replace_all(&list, ",");
    let list = list.trim().trim_matches(',');

    let dates: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(normalize_date_token)
        .collect();

    if dates.is_empty() {
        None
    } else {
        Some(dates.join(", "))
    }
}
