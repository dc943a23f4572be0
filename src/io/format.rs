//! Number formatting compatible with C's `%g`.

use num_traits::Float;

/// Significant digits used by a default-configured C++ output stream.
const PRECISION: i32 = 6;

/// Formats `value` like `printf("%g", value)`.
///
/// Six significant digits, trailing zeros removed, and scientific notation
/// with a signed exponent of at least two digits when the exponent is below
/// -4 or at least 6.
pub(crate) fn format_g<F: Float>(value: F) -> String {
    let x = value.to_f64().unwrap_or(f64::NAN);
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.*e}", (PRECISION - 1) as usize, x);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        strip_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
