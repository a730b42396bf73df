//! Terminal color helpers for report output.

use ansi_term::Colour;

/// Balance / surplus coloring: positive green, negative red.
pub fn paint_signed(value: i64, text: &str) -> String {
    if value > 0 {
        Colour::Green.paint(text).to_string()
    } else if value < 0 {
        Colour::Red.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Divergent days are highlighted in yellow.
pub fn paint_day_status(divergent: bool, text: &str) -> String {
    if divergent {
        Colour::Yellow.paint(text).to_string()
    } else {
        text.to_string()
    }
}
