use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use regex::Regex;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse a "YYYY-MM" month argument into (year, month).
pub fn parse_month(s: &str) -> AppResult<(i32, u32)> {
    let re = Regex::new(r"^(\d{4})-(\d{2})$").expect("static regex");
    let caps = re
        .captures(s.trim())
        .ok_or_else(|| AppError::InvalidPeriod(s.to_string()))?;

    let year: i32 = caps[1].parse().map_err(|_| AppError::InvalidPeriod(s.to_string()))?;
    let month: u32 = caps[2].parse().map_err(|_| AppError::InvalidPeriod(s.to_string()))?;
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidPeriod(s.to_string()));
    }
    Ok((year, month))
}

pub fn all_days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut d = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return out,
    };

    while d.month() == month {
        out.push(d);
        d = match d.succ_opt() {
            Some(n) => n,
            None => break,
        };
    }

    out
}

/// Generate the (year, month) pairs covering [start, end], oldest first.
/// Used by the ledger recompute to iterate month-by-month.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let mut out = Vec::new();
    if start > end {
        return out;
    }

    let (mut y, mut m) = (start.year(), start.month());
    loop {
        out.push((y, m));
        if (y, m) == (end.year(), end.month()) {
            break;
        }
        if m == 12 {
            y += 1;
            m = 1;
        } else {
            m += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_parsing_accepts_only_yyyy_mm() {
        assert_eq!(parse_month("2025-03").unwrap(), (2025, 3));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("2025-3").is_err());
        assert!(parse_month("2025-03-01").is_err());
    }

    #[test]
    fn months_between_spans_year_boundary() {
        let s = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
        let e = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        assert_eq!(
            months_between(s, e),
            vec![(2024, 11), (2024, 12), (2025, 1), (2025, 2)]
        );
    }

    #[test]
    fn months_between_empty_when_inverted() {
        let s = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let e = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(months_between(s, e).is_empty());
    }
}
