/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use hitstat_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    // Group the absolute value, re-attach the sign at the end.
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints
    // round the way they read in decimal.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        // "0.50" → ".50"
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a hit or user count for display.
///
/// Whole numbers print without decimals; fractional values keep up to three
/// decimal places with trailing zeros removed.
///
/// # Examples
///
/// ```
/// use hitstat_core::formatting::format_count;
///
/// assert_eq!(format_count(1234.0), "1,234");
/// assert_eq!(format_count(1234.5), "1,234.5");
/// assert_eq!(format_count(0.125), "0.125");
/// ```
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        return format_number(value, 0);
    }
    let formatted = format_number(value, 3);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Render an optional label, falling back to `"-"`.
pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
