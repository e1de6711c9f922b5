//! Display formatting shared by the site's views.
//!
//! All functions are pure. Timestamps are shown in the wall-clock time they
//! carry; an empty or unparsable input formats to an empty string.

use api::ClientConfig;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `YYYY-MM-DD`
pub fn format_date(input: &str) -> String {
    parse_timestamp(input)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// `YYYY-MM-DD HH:MM`
pub fn format_datetime(input: &str) -> String {
    parse_timestamp(input)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// `¥` followed by the amount with two decimals. A missing price is `¥0.00`.
pub fn format_price(price: Option<f64>) -> String {
    format!("¥{:.2}", price.unwrap_or(0.0))
}

/// Price given as text, as the backend serialises decimals.
pub fn format_price_str(price: &str) -> String {
    format_price(price.trim().parse::<f64>().ok().filter(|p| p.is_finite()))
}

/// Keep the first `max_chars` characters, adding `...` only when something was cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Resolve an image path from the API into something an `<img>` can load.
pub fn image_url(path: Option<&str>, config: &ClientConfig) -> String {
    let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
        return config.placeholder_image.clone();
    };
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with('/') {
        return path.to_string();
    }
    format!("{}/{}", config.media_root.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_variants() {
        assert_eq!(format_date("2024-03-07T15:04:05+08:00"), "2024-03-07");
        assert_eq!(format_date("2024-03-07 15:04:05.123456"), "2024-03-07");
        assert_eq!(format_date("2024-03-07"), "2024-03-07");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("yesterday"), "");
    }

    #[test]
    fn test_format_datetime_keeps_wall_clock() {
        assert_eq!(format_datetime("2024-12-31T23:59:30Z"), "2024-12-31 23:59");
        assert_eq!(format_datetime("2024-01-02T08:05:00+08:00"), "2024-01-02 08:05");
        assert_eq!(format_datetime("2024-01-02"), "2024-01-02 00:00");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(None), "¥0.00");
        assert_eq!(format_price(Some(9.5)), "¥9.50");
        assert_eq!(format_price(Some(1200.0)), "¥1200.00");
        assert_eq!(format_price_str("88.8"), "¥88.80");
        assert_eq!(format_price_str("n/a"), "¥0.00");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abcdefgh", 5), "abcde...");
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("abcde", 5), "abcde");
        assert_eq!(truncate_text("", 5), "");
        assert_eq!(truncate_text("保定古莲花池", 2), "保定...");
    }

    #[test]
    fn test_image_url() {
        let config = ClientConfig::default();
        assert_eq!(image_url(None, &config), "/static/images/placeholder.jpg");
        assert_eq!(image_url(Some(""), &config), "/static/images/placeholder.jpg");
        assert_eq!(
            image_url(Some("https://cdn.example.com/a.jpg"), &config),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(image_url(Some("/static/b.png"), &config), "/static/b.png");
        assert_eq!(image_url(Some("scenic/c.jpg"), &config), "/media/scenic/c.jpg");
    }
}
