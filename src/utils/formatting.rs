//! Formatting utilities for CLI outputs.

use unicode_width::UnicodeWidthStr;

pub fn pad_right(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

pub fn pad_left(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - w), s)
    }
}

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 && want_sign {
        "-"
    } else {
        ""
    };

    if short {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Fixed 2-decimal hour rendering used in reports.
pub fn hours2str(h: f64) -> String {
    format!("{:.2}", h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_minutes_carry_sign() {
        assert_eq!(mins2readable(145, true, false), "+02h 25m");
        assert_eq!(mins2readable(-70, true, true), "-01:10");
        assert_eq!(mins2readable(0, true, true), "00:00");
    }
}
