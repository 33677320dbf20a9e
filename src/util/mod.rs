#[macro_export]
#[cfg(debug_assertions)]
macro_rules! println_debug {
    ($($x:tt)*) => {{
        eprint!("[debug] ");
        eprintln!($($x)*);
    }}
}

#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! println_debug {
    ($($x:tt)*) => {}
}

/// Writes a `[verbose]` line to stderr when the given config asks for it.
#[macro_export]
macro_rules! verbose {
    ($config:expr, $($x:tt)*) => {{
        if $config.verbose {
            eprint!("[verbose] ");
            eprintln!($($x)*);
        }
    }}
}

#[inline]
pub fn is_alphabetic(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c)
}

/// Formats a float the way the language prints it: whole numbers keep a `.0`.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else if value.is_finite() && (value.abs() >= 1e16 || (value != 0.0 && value.abs() < 1e-4)) {
        format_exponent(value)
    } else if value.is_nan() {
        String::from("nan")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "inf" } else { "-inf" })
    } else {
        format!("{}", value)
    }
}

/// Exponent form with a signed, two-digit exponent: `1e-05`, `1.5e+16`.
fn format_exponent(value: f64) -> String {
    let formatted = format!("{:e}", value);

    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.strip_prefix('-') {
            Some(digits) => format!("{}e-{:0>2}", mantissa, digits),
            None => format!("{}e+{:0>2}", mantissa, exponent),
        },
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_floats_with_fraction() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(-3.0), "-3.0");
    }

    #[test]
    fn formats_extreme_floats_with_exponent() {
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(-1.5e16), "-1.5e+16");
        assert_eq!(format_float(2.5e-120), "2.5e-120");
        assert_eq!(format_float(0.0001), "0.0001");
    }

    #[test]
    fn accepts_unicode_identifiers() {
        assert!(is_alphabetic('ñ'));
        assert!(is_alphanumeric('7'));
        assert!(!is_alphabetic('.'));
    }
}
