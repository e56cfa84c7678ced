//! Partial numeric coercion over cell contents.
//!
//! Cells are strings; aggregation and the `min`/`max` selectors coerce them
//! to numbers only when the whole string reads as one. The acceptance rules
//! deliberately follow C `strtold` endptr semantics, which the rest of the
//! engine's behavior is calibrated against:
//! * the empty string coerces to `0.0` (no digits consumed, nothing left
//!   over), so freshly padded cells count as numeric zeros;
//! * leading ASCII whitespace is skipped, but a whitespace-only string is
//!   not numeric (the leftover is non-empty);
//! * anything left after the number, trailing whitespace included,
//!   makes the string non-numeric.
//!
//! Integer coercion for coordinates is stricter: no whitespace tolerance,
//! the whole string must be one integer.

/// Coerce a cell content to a number, `strtold`-style.
pub fn to_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(0.0);
    }
    let trimmed = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Strict integer coercion for coordinate and slot tokens.
pub fn to_index(s: &str) -> Option<i64> {
    s.parse::<i64>().ok()
}

/// Render a computed value back into cell text: shortest representation
/// that round-trips, integers without a fractional part.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Strip one layer of matching `"…"` or `'…'` wrapping, if present.
/// Used by the `min`/`max` selectors before numeric coercion.
pub fn unwrap_quotes(s: &str) -> &str {
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"'))
            || (s.starts_with('\'') && s.ends_with('\'')))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_numeric_zero() {
        assert_eq!(to_number(""), Some(0.0));
    }

    #[test]
    fn whitespace_only_is_not_numeric() {
        assert_eq!(to_number(" "), None);
        assert_eq!(to_number("\t\t"), None);
    }

    #[test]
    fn leading_whitespace_is_skipped() {
        assert_eq!(to_number("  5"), Some(5.0));
        // ...but trailing leftovers disqualify.
        assert_eq!(to_number("5 "), None);
        assert_eq!(to_number("5abc"), None);
    }

    #[test]
    fn accepts_usual_float_shapes() {
        assert_eq!(to_number("-3.5"), Some(-3.5));
        assert_eq!(to_number("1e3"), Some(1000.0));
        assert_eq!(to_number("+2"), Some(2.0));
        assert_eq!(to_number(".5"), Some(0.5));
    }

    #[test]
    fn index_is_strict() {
        assert_eq!(to_index("12"), Some(12));
        assert_eq!(to_index("-1"), Some(-1));
        assert_eq!(to_index(" 1"), None);
        assert_eq!(to_index("1.5"), None);
        assert_eq!(to_index(""), None);
    }

    #[test]
    fn formats_integers_without_fraction() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn quote_unwrapping() {
        assert_eq!(unwrap_quotes("\"5\""), "5");
        assert_eq!(unwrap_quotes("'5'"), "5");
        assert_eq!(unwrap_quotes("5"), "5");
        // Mismatched or too short to be a wrapped pair: untouched.
        assert_eq!(unwrap_quotes("\"5'"), "\"5'");
        assert_eq!(unwrap_quotes("\""), "\"");
    }
}
