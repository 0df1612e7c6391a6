use chrono::{Datelike, NaiveDate};

/// Format a float as a currency amount with thousands separators: ₱1,234.56
/// Infinite or NaN amounts print as `n/a`.
pub fn money(val: f64, symbol: &str) -> String {
    if !val.is_finite() {
        return "n/a".to_string();
    }
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    // -0.001 rounds to 0.00 and should not print as negative.
    if negative && cents != "0.00" {
        format!("-{symbol}{with_commas}.{dec_part}")
    } else {
        format!("{symbol}{with_commas}.{dec_part}")
    }
}

/// One decimal place; infinite or NaN ratios (zero denominators) print as `n/a`.
pub fn percent(val: f64) -> String {
    if val.is_finite() {
        format!("{val:.1}%")
    } else {
        "n/a".to_string()
    }
}

pub fn date(d: NaiveDate) -> String {
    d.format("%b %-d, %Y").to_string()
}

/// `Jan 1 - Jan 15, 2024`, or `Dec 16, 2023 - Jan 5, 2024` across years.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> String {
    if start.year() == end.year() {
        format!("{} - {}", start.format("%b %-d"), date(end))
    } else {
        format!("{} - {}", date(start), date(end))
    }
}
