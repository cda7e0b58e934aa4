//! printf-style number rendering for the simulator's fixed-format reader.
//!
//! Rust's `{:e}` writes `1e10`; the simulator's input files use the C forms
//! `1.0000000000e+10` (`%.Ne`) and `1e+10` (`%g`).

/// Render `value` like C's `%<width>.<precision>e`.
pub fn sci(value: f64, width: usize, precision: usize) -> String {
    let body = c_exponent(&format!("{:.*e}", precision, value));
    format!("{:>width$}", body, width = width)
}

/// Render `value` like C's `%g` (six significant digits).
pub fn general(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    // The exponent after rounding to the target precision decides the form.
    let rounded = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let exponent: i32 = rounded
        .rsplit('e')
        .next()
        .and_then(|e| e.parse().ok())
        .unwrap_or(0);

    if exponent < -4 || exponent >= PRECISION {
        let (mantissa, exp) = rounded.split_once('e').unwrap_or((&rounded, "0"));
        c_exponent(&format!("{}e{}", strip_zeros(mantissa), exp))
    } else {
        let decimals = (PRECISION - 1 - exponent).max(0) as usize;
        strip_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Render an integer like C's `%i`.
pub fn int(value: i64) -> String {
    value.to_string()
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Rewrite a Rust exponent suffix (`e10`, `e-3`) as C does (`e+10`, `e-03`).
fn c_exponent(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sci_matches_c() {
        assert_eq!(sci(0.0, 16, 10), "0.0000000000e+00");
        assert_eq!(sci(1e10, 16, 10), "1.0000000000e+10");
        assert_eq!(sci(10.0, 16, 10), "1.0000000000e+01");
        assert_eq!(sci(0.01, 16, 10), "1.0000000000e-02");
        assert_eq!(sci(-120.5, 20, 10), "   -1.2050000000e+02");
        assert_eq!(sci(-120.5, 16, 10), "-1.2050000000e+02");
        assert_eq!(sci(1.5e-123, 16, 10), "1.5000000000e-123");
    }

    #[test]
    fn test_general_matches_c() {
        assert_eq!(general(0.0), "0");
        assert_eq!(general(10.0), "10");
        assert_eq!(general(0.01), "0.01");
        assert_eq!(general(1e10), "1e+10");
        assert_eq!(general(123456.0), "123456");
        assert_eq!(general(1234567.0), "1.23457e+06");
        assert_eq!(general(0.0001), "0.0001");
        assert_eq!(general(0.00001), "1e-05");
        assert_eq!(general(-2.5), "-2.5");
        assert_eq!(general(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn test_int() {
        assert_eq!(int(3), "3");
        assert_eq!(int(-1), "-1");
    }
}
