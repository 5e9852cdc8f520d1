//! Calendar date recognition for the X column

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::types::{CellValue, DateParsing, Row};

/// Date-time layouts tried before date-only layouts
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Parse a cell as a calendar date-time
///
/// Only text cells are considered in strict mode. Month-only forms such as
/// `2024-03` or `Mar 2024` resolve to the first of the month.
pub fn parse_date(cell: &CellValue, mode: DateParsing) -> Option<NaiveDateTime> {
    match cell {
        CellValue::Text(s) => parse_date_str(s.trim(), mode),
        CellValue::Number(v) if mode == DateParsing::Lenient => year_start(*v),
        _ => None,
    }
}

fn parse_date_str(s: &str, mode: DateParsing) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    // Two-digit years would otherwise land in the first century
    parse_layouts(s, mode).filter(|dt| dt.year() >= 1000)
}

fn parse_layouts(s: &str, mode: DateParsing) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }

    // Month granularity before day layouts: "Mar 2024" also fits "%b %d %Y"
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    for format in ["%d %b %Y", "%d %B %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("1 {}", s), format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    if mode == DateParsing::Lenient && s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<f64>().ok().and_then(year_start);
    }

    None
}

fn year_start(year: f64) -> Option<NaiveDateTime> {
    if year.fract() != 0.0 || !(1000.0..=9999.0).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, 1, 1)?.and_hms_opt(0, 0, 0)
}

/// True when the column is present and parses as a date in every row
pub fn is_date_column(rows: &[Row], col: &str, mode: DateParsing) -> bool {
    !rows.is_empty()
        && rows
            .iter()
            .all(|row| row.get(col).and_then(|cell| parse_date(cell, mode)).is_some())
}

/// Render as an ISO calendar date (YYYY-MM-DD)
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_common_layouts() {
        let strict = DateParsing::Strict;
        assert_eq!(parse_date(&text("2024-03-05"), strict), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(&text("2024/03/05"), strict), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(&text("03/05/2024"), strict), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(&text("Mar 5, 2024"), strict), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(&text("5 March 2024"), strict), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(&text("2024-03"), strict), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date(&text("Mar 2024"), strict), Some(ymd(2024, 3, 1)));
        assert!(parse_date(&text("2024-03-05T10:30:00Z"), strict).is_some());
        assert!(parse_date(&text("2024-03-05 10:30:00"), strict).is_some());
    }

    #[test]
    fn test_month_year_is_first_of_month() {
        let strict = DateParsing::Strict;
        assert_eq!(parse_date(&text("Jan 2024"), strict), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_date(&text("July 2024"), strict), Some(ymd(2024, 7, 1)));
        assert_eq!(parse_date(&text("Mar 20 2024"), strict), Some(ymd(2024, 3, 20)));
        // two-digit years are not read as the first century
        assert_eq!(parse_date(&text("Mar 20 24"), strict), None);
    }

    #[test]
    fn test_rejects_non_dates() {
        let strict = DateParsing::Strict;
        assert_eq!(parse_date(&text("abc"), strict), None);
        assert_eq!(parse_date(&text("12"), strict), None);
        assert_eq!(parse_date(&text(""), strict), None);
        assert_eq!(parse_date(&text("2024-13-01"), strict), None);
        assert_eq!(parse_date(&CellValue::Number(5.0), strict), None);
        assert_eq!(parse_date(&CellValue::Null, strict), None);
    }

    #[test]
    fn test_bare_years_only_when_lenient() {
        assert_eq!(parse_date(&text("2021"), DateParsing::Strict), None);
        assert_eq!(parse_date(&CellValue::Number(2021.0), DateParsing::Strict), None);
        assert_eq!(parse_date(&text("2021"), DateParsing::Lenient), Some(ymd(2021, 1, 1)));
        assert_eq!(
            parse_date(&CellValue::Number(2021.0), DateParsing::Lenient),
            Some(ymd(2021, 1, 1))
        );
        assert_eq!(parse_date(&CellValue::Number(7.0), DateParsing::Lenient), None);
    }

    #[test]
    fn test_is_date_column_requires_every_row() {
        let rows: Vec<Row> = ["2024-01-01", "2024-01-02", "soon"]
            .iter()
            .map(|d| std::iter::once(("d".to_string(), text(d))).collect())
            .collect();
        assert!(is_date_column(&rows[..2], "d", DateParsing::Strict));
        assert!(!is_date_column(&rows, "d", DateParsing::Strict));
        assert!(!is_date_column(&rows[..2], "missing", DateParsing::Strict));
        assert!(!is_date_column(&[], "d", DateParsing::Strict));
    }
}
