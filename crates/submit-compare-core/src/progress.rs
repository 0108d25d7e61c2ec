//! Presentation strings derived from settings and attempt state.

use crate::traits::Localizer;

/// CSS class that hides the submit button once attempts run out.
pub const SUBMIT_HIDDEN_CLASS: &str = "nodisplay";

/// Significant digits used by [`format_general`].
const PRECISION: usize = 6;

/// Format a number the way `%g` does: six significant digits, trailing zeros
/// and a trailing decimal point removed, scientific notation for very large
/// or very small magnitudes.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{:.*e}", PRECISION - 1, value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= PRECISION as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (PRECISION as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Progress statement shown next to the display name.
///
/// Empty for ungraded blocks; otherwise `(3 points possible)` before any
/// credit and `(1.5/3 points)` after. The plural form follows `weight`.
pub fn problem_progress(weight: u32, score: f64, localizer: &dyn Localizer) -> String {
    if weight == 0 {
        return String::new();
    }

    let text = if score == 0.0 {
        localizer
            .ngettext(
                "{weight} point possible",
                "{weight} points possible",
                u64::from(weight),
            )
            .replace("{weight}", &weight.to_string())
    } else {
        let scaled = format_general(score * f64::from(weight));
        localizer
            .ngettext(
                "{score}/{weight} point",
                "{score}/{weight} points",
                u64::from(weight),
            )
            .replace("{score}", &scaled)
            .replace("{weight}", &weight.to_string())
    };

    format!("({text})")
}

/// Attempts-used feedback. Empty when attempts are unlimited.
pub fn used_attempts_feedback(
    count_attempts: u32,
    max_attempts: u32,
    localizer: &dyn Localizer,
) -> String {
    if max_attempts == 0 {
        return String::new();
    }

    localizer
        .ngettext(
            "You have used {count_attempts} of {max_attempts} submission",
            "You have used {count_attempts} of {max_attempts} submissions",
            u64::from(max_attempts),
        )
        .replace("{count_attempts}", &count_attempts.to_string())
        .replace("{max_attempts}", &max_attempts.to_string())
}

/// CSS class for the submit button.
pub fn submit_class(count_attempts: u32, max_attempts: u32) -> &'static str {
    if max_attempts > 0 && count_attempts >= max_attempts {
        SUBMIT_HIDDEN_CLASS
    } else {
        ""
    }
}
