/// Zero-pad a `D.M` token to `DD.MM`.
///
/// Tokens that are not exactly two non-empty dot-separated parts come back
/// unchanged. Day and month ranges are not checked.
pub fn normalize_date_token(token: &str) -> String {
    let parts: Vec<&str> = token.split('.').map(str::trim).collect();
    match parts.as_slice() {
        [day, month] if !day.is_empty() && !month.is_empty() => {
            format!("{:0>2}.{:0>2}", day, month)
        }
        _ => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(normalize_date_token("9.2"), "09.02");
        assert_eq!(normalize_date_token("9.02"), "09.02");
        assert_eq!(normalize_date_token("12.02"), "12.02");
        assert_eq!(normalize_date_token("1.1"), "01.01");
    }

    #[test]
    fn test_no_range_check() {
        assert_eq!(normalize_date_token("99.7"), "99.07");
    }

    #[test]
    fn test_bare_day_passes_through() {
        assert_eq!(normalize_date_token("16"), "16");
        assert_eq!(normalize_date_token("20)"), "20)");
    }

    #[test]
    fn test_malformed_passes_through() {
        assert_eq!(normalize_date_token("1.2.3"), "1.2.3");
        assert_eq!(normalize_date_token(".02"), ".02");
        assert_eq!(normalize_date_token("9."), "9.");
        assert_eq!(normalize_date_token(""), "");
    }
}
