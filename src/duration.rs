//! Compound duration text such as `10h9m8.007006005s` or `-1h30m`.
//!
//! Parsing accepts an optional sign followed by a sequence of
//! `<decimal><unit>` terms with units `ns`, `us` (also `µs`/`μs`), `ms`, `s`,
//! `m` and `h`, or a bare `0`. The total must fit in a signed 64-bit count of
//! nanoseconds. Formatting produces the canonical form: whole hours and
//! minutes followed by fractional seconds (`1h0m0s`, `-1m30s`, `1.5s`), or a
//! single sub-second unit (`100ms`, `1.5µs`, `5ns`), or `0s`.

use chrono::TimeDelta;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Magnitude limit of a negative duration: `i64::MIN` nanoseconds.
const MAX_NEGATIVE: u128 = 1 << 63;

/// Parse compound duration text. Errors are human-readable reasons.
pub fn parse(text: &str) -> Result<TimeDelta, String> {
    let (negative, mut rest) = match text.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(format!("invalid duration '{text}'"));
    }

    let out_of_range = || format!("duration '{text}' is out of range");
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, fraction, after_number) = take_number(rest)
            .ok_or_else(|| format!("invalid duration '{text}': expected a number"))?;
        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, after_unit) = after_number.split_at(unit_len);
        let scale = unit_nanos(unit).ok_or_else(|| {
            if unit.is_empty() {
                format!("missing unit in duration '{text}'")
            } else {
                format!("unknown unit '{unit}' in duration '{text}'")
            }
        })?;

        let mut term = whole.checked_mul(scale).ok_or_else(out_of_range)?;
        if let Some((digits, len)) = fraction {
            term += digits * scale / 10u128.pow(len);
        }
        total = total.checked_add(term).ok_or_else(out_of_range)?;
        rest = after_unit;
    }

    let limit = if negative {
        MAX_NEGATIVE
    } else {
        MAX_NEGATIVE - 1
    };
    if total > limit {
        return Err(out_of_range());
    }
    let signed = if negative {
        -(total as i128)
    } else {
        total as i128
    };
    let nanos = i64::try_from(signed).map_err(|_| out_of_range())?;
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Split a leading decimal number off `text`.
///
/// Returns the integer part, the fraction as `(digits, digit count)` and the
/// remaining text. At least one digit must be present on either side of the
/// point. Fraction digits past nanosecond-times-hour precision are dropped.
fn take_number(text: &str) -> Option<(u128, Option<(u128, u32)>, &str)> {
    let int_len = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (int_digits, mut rest) = text.split_at(int_len);

    let mut fraction = None;
    let mut frac_len = 0;
    if let Some(after_point) = rest.strip_prefix('.') {
        frac_len = after_point
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after_point.len());
        let (frac_digits, after) = after_point.split_at(frac_len);
        let kept = &frac_digits[..frac_digits.len().min(18)];
        if !kept.is_empty() {
            fraction = Some((kept.parse().ok()?, kept.len() as u32));
        }
        rest = after;
    }

    if int_digits.is_empty() && frac_len == 0 {
        return None;
    }
    let whole = if int_digits.is_empty() {
        0
    } else {
        int_digits.parse().ok()?
    };
    Some((whole, fraction, rest))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(3600 * NANOS_PER_SECOND),
        _ => None,
    }
}

/// Whether `delta` can be written as text [`parse`] reads back.
pub fn in_range(delta: TimeDelta) -> bool {
    delta.num_nanoseconds().is_some()
}

/// Format a duration in the canonical compound form.
pub fn format(delta: TimeDelta) -> String {
    // seconds and subsec_nanos carry the same sign
    let signed = i128::from(delta.num_seconds()) * NANOS_PER_SECOND as i128
        + i128::from(delta.subsec_nanos());
    if signed == 0 {
        return "0s".into();
    }
    let sign = if signed < 0 { "-" } else { "" };
    let nanos = signed.unsigned_abs();

    if nanos < NANOS_PER_SECOND {
        let (scale, unit) = if nanos < 1_000 {
            (1, "ns")
        } else if nanos < 1_000_000 {
            (1_000, "µs")
        } else {
            (1_000_000, "ms")
        };
        return format!("{sign}{}{unit}", decimal(nanos, scale));
    }

    let secs = nanos / NANOS_PER_SECOND;
    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    let seconds = nanos % (60 * NANOS_PER_SECOND);

    let mut out = String::from(sign);
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&decimal(seconds, NANOS_PER_SECOND));
    out.push('s');
    out
}

/// `value / scale` as a decimal with trailing fraction zeros trimmed.
fn decimal(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(secs: i64, nanos: i64) -> TimeDelta {
        TimeDelta::seconds(secs) + TimeDelta::nanoseconds(nanos)
    }

    #[test]
    fn parse_compound() {
        assert_eq!(
            parse("10h9m8.007006005s").unwrap(),
            d(10 * 3600 + 9 * 60 + 8, 7_006_005)
        );
    }

    #[test]
    fn parse_single_units() {
        assert_eq!(parse("1s").unwrap(), d(1, 0));
        assert_eq!(parse("1.5s").unwrap(), d(1, 500_000_000));
        assert_eq!(parse("100ms").unwrap(), d(0, 100_000_000));
        assert_eq!(parse("3us").unwrap(), d(0, 3_000));
        assert_eq!(parse("3µs").unwrap(), d(0, 3_000));
        assert_eq!(parse("5ns").unwrap(), d(0, 5));
        assert_eq!(parse("2h").unwrap(), d(7200, 0));
        assert_eq!(parse(".5m").unwrap(), d(30, 0));
    }

    #[test]
    fn parse_signs_and_zero() {
        assert_eq!(parse("0").unwrap(), TimeDelta::zero());
        assert_eq!(parse("0s").unwrap(), TimeDelta::zero());
        assert_eq!(parse("-0").unwrap(), TimeDelta::zero());
        assert_eq!(parse("+1m").unwrap(), d(60, 0));
        assert_eq!(parse("-1s").unwrap(), d(-1, 0));
        assert_eq!(parse("-1h30m").unwrap(), d(-5400, 0));
        assert_eq!(parse("-1.5ms").unwrap(), d(0, -1_500_000));
    }

    #[test]
    fn parse_rejects_malformed() {
        for text in ["", "-", "+", "s", "10", "1x", "1.s.", "h1", "1h2", "--5s", "."] {
            assert!(parse(text).is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn parse_checks_signed_64_bit_range() {
        // i64::MAX nanoseconds and i64::MIN nanoseconds are the limits
        assert_eq!(
            parse("9223372036854775807ns").unwrap(),
            TimeDelta::nanoseconds(i64::MAX)
        );
        assert_eq!(
            parse("-9223372036854775808ns").unwrap(),
            TimeDelta::nanoseconds(i64::MIN)
        );
        assert!(parse("9223372036854775808ns").is_err());
        assert!(parse("-9223372036854775809ns").is_err());
        assert!(parse("2562048h").is_err());
        assert!(parse("99999999999999h").is_err());
    }

    #[test]
    fn format_canonical_forms() {
        assert_eq!(format(TimeDelta::zero()), "0s");
        assert_eq!(format(d(3600, 0)), "1h0m0s");
        assert_eq!(format(d(90, 0)), "1m30s");
        assert_eq!(format(d(1, 500_000_000)), "1.5s");
        assert_eq!(format(d(0, 100_000_000)), "100ms");
        assert_eq!(format(d(0, 1_500)), "1.5µs");
        assert_eq!(format(d(0, 5)), "5ns");
        assert_eq!(
            format(d(10 * 3600 + 9 * 60 + 8, 7_006_005)),
            "10h9m8.007006005s"
        );
    }

    #[test]
    fn format_negative() {
        assert_eq!(format(d(-1, 0)), "-1s");
        assert_eq!(format(d(-5400, 0)), "-1h30m0s");
        assert_eq!(format(d(0, -1_500_000)), "-1.5ms");
        assert_eq!(format(d(-1, -500_000_000)), "-1.5s");
        assert_eq!(
            format(TimeDelta::nanoseconds(i64::MIN)),
            "-2562047h47m16.854775808s"
        );
    }

    #[test]
    fn canonical_text_round_trips() {
        for text in [
            "10h9m8.007006005s",
            "1h0m0s",
            "2m3s",
            "1.5ms",
            "42ns",
            "0s",
            "-1h30m0s",
            "-2.5s",
            "2562047h47m16.854775807s",
        ] {
            assert_eq!(format(parse(text).unwrap()), text);
        }
    }

    #[test]
    fn range_check() {
        assert!(in_range(TimeDelta::nanoseconds(i64::MAX)));
        assert!(!in_range(TimeDelta::seconds(i64::MAX / 1000)));
    }
}
