use super::cell::CellValue;

/// Format a cell value for display.
pub fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => format_number(*n),
        CellValue::Text(s) => s.clone(),
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Render a number so it can be spliced into an arithmetic expression
/// and parsed back to the same value. Negative numbers are parenthesised
/// so a preceding operator stays well-formed (`2-A1` with `A1 = -3`).
pub fn number_literal(n: f64) -> String {
    if n < 0.0 {
        format!("({})", n)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(f64::NAN), "#NAN!");
    }

    #[test]
    fn test_number_literal_round_trips() {
        for n in [0.1, 1.0 / 3.0, 1e21, 123456.789, 5e-324] {
            assert_eq!(number_literal(n).parse::<f64>(), Ok(n));
        }
        assert_eq!(number_literal(-2.5), "(-2.5)");
    }
}
