/// Utility functions used throughout the application

use std::path::PathBuf;

/// Get platform-specific debug log path
pub fn get_debug_log_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("wargatui-debug.log");
    path
}

/// Get platform-specific cache fallback path
pub fn get_cache_fallback_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("wargatui-cache");
    path
}

/// Parse a rupiah amount typed by the user ("150000", "150.000", "Rp 150.000")
pub fn parse_amount(raw: &str) -> Option<f64> {
    let digits: String = raw
        .trim()
        .trim_start_matches("Rp")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    digits.parse::<f64>().ok().filter(|n| *n >= 0.0)
}

/// Parse a comma-separated list of ids, skipping blanks
pub fn parse_id_list(raw: &str) -> Option<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().ok())
        .collect()
}

/// Split a comma-separated list of labels, skipping blanks
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Optional local file path typed into a form (empty means none)
pub fn optional_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let expanded = match (trimmed.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(trimmed),
    };
    Some(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("150000"), Some(150000.0));
        assert_eq!(parse_amount("150.000"), Some(150000.0));
        assert_eq!(parse_amount("Rp 1.500.000"), Some(1500000.0));
        assert_eq!(parse_amount("2500,50"), Some(2500.5));
        assert_eq!(parse_amount("lima ribu"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 2,3"), Some(vec![1, 2, 3]));
        assert_eq!(parse_id_list("4,,"), Some(vec![4]));
        assert_eq!(parse_id_list(""), Some(vec![]));
        assert_eq!(parse_id_list("1,x"), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Setuju, Tidak setuju ,"), vec!["Setuju", "Tidak setuju"]);
    }

    #[test]
    fn test_optional_path() {
        assert_eq!(optional_path("   "), None);
        assert_eq!(
            optional_path("/tmp/bukti.jpg"),
            Some(PathBuf::from("/tmp/bukti.jpg"))
        );
    }
}
