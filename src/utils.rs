use chrono::TimeDelta;

/// Formats a price per litre the way listings show it ("$1.65").
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Parses "$1.65", "1.65" or "1.65 AUD" back into a number.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// "1 hour ago", "5 hours ago".
pub fn format_hours_ago(hours: u32) -> String {
    format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
}

/// Parses labels such as "just now", "15 minutes ago", "2 hours ago" or "1 day ago".
pub fn parse_age_label(label: &str) -> Option<TimeDelta> {
    let label = label.trim().to_lowercase();
    if label == "just now" {
        return Some(TimeDelta::zero());
    }
    let mut parts = label.split_whitespace();
    let amount: i64 = parts.next()?.parse().ok()?;
    let unit = parts.next()?;
    if parts.next() != Some("ago") || parts.next().is_some() {
        return None;
    }
    match unit.trim_end_matches('s') {
        "minute" | "min" => TimeDelta::try_minutes(amount),
        "hour" | "hr" => TimeDelta::try_hours(amount),
        "day" => TimeDelta::try_days(amount),
        "week" => TimeDelta::try_weeks(amount),
        _ => None,
    }
}

/// Splits a comma or semicolon separated list, dropping blank entries.
pub fn split_list(text: &str) -> Vec<String> {
    text.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(1.6512), "$1.65");
        assert_eq!(format_price(2.0), "$2.00");
    }

    #[test]
    fn test_price_parsing() {
        assert_eq!(parse_price("$1.65"), Some(1.65));
        assert_eq!(parse_price(" 1.72 "), Some(1.72));
        assert_eq!(parse_price("1.59 AUD"), Some(1.59));
        assert_eq!(parse_price("n/a"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn test_age_labels() {
        assert_eq!(parse_age_label("just now"), Some(TimeDelta::zero()));
        assert_eq!(parse_age_label("1 hour ago"), Some(TimeDelta::hours(1)));
        assert_eq!(parse_age_label("12 hours ago"), Some(TimeDelta::hours(12)));
        assert_eq!(parse_age_label("30 minutes ago"), Some(TimeDelta::minutes(30)));
        assert_eq!(parse_age_label("2 days ago"), Some(TimeDelta::days(2)));
        assert_eq!(parse_age_label("yesterday"), None);
        assert_eq!(parse_age_label("3 hours"), None);
        assert_eq!(
            parse_age_label(&format_hours_ago(7)),
            Some(TimeDelta::hours(7))
        );
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("ATM, Car Wash,, 24/7 "),
            vec!["ATM", "Car Wash", "24/7"]
        );
        assert_eq!(split_list("ATM; Shop"), vec!["ATM", "Shop"]);
        assert!(split_list(" , ").is_empty());
    }
}
