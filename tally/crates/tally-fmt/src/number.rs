//! Plain number rendering: precision ladder, digit grouping,
//! separators.

use tally_util::{GroupSize, Settings};

/// How many fraction digits to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    /// The automatic ladder, trailing zeros trimmed
    Auto,
    /// Exactly `n` fraction digits
    Fixed(u32),
    /// `n` significant digits
    SigFigs(u32),
    /// Exponential notation with `n` fraction digits
    Scientific(u32),
}

/// Format a number under the given settings.
pub fn format_number(x: f64, settings: &Settings, precision: Precision) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let effective = match precision {
        Precision::Auto if settings.precision >= 0 => Precision::Fixed(settings.precision as u32),
        other => other,
    };

    match effective {
        Precision::Scientific(digits) => scientific(x, digits),
        Precision::SigFigs(digits) => {
            let rendered = sig_figs(x, digits);
            group_and_separate(&rendered, settings)
        }
        Precision::Fixed(digits) => {
            let rendered = format!("{x:.prec$}", prec = digits as usize);
            group_and_separate(&rendered, settings)
        }
        Precision::Auto => {
            let magnitude = x.abs();
            if magnitude != 0.0 && !(1e-4..1e6).contains(&magnitude) {
                return scientific(x, 5);
            }
            let decimals: usize = if magnitude == 0.0 {
                return "0".to_string();
            } else if magnitude >= 100.0 {
                2
            } else if magnitude >= 1.0 {
                4
            } else {
                6
            };
            let rendered = format!("{x:.decimals$}");
            let trimmed = trim_trailing_zeros(&rendered);
            group_and_separate(&trimmed, settings)
        }
    }
}

/// Exponential with `digits` fraction digits: `1.23457e6`.
fn scientific(x: f64, digits: u32) -> String {
    format!("{x:.prec$e}", prec = digits as usize)
}

fn sig_figs(x: f64, digits: u32) -> String {
    if x == 0.0 {
        return format!("{x:.prec$}", prec = digits.saturating_sub(1) as usize);
    }
    let digits = digits.max(1) as i32;
    let exponent = x.abs().log10().floor() as i32;
    let decimals = digits - 1 - exponent;
    if decimals <= 0 {
        let scale = 10f64.powi(-decimals);
        format!("{:.0}", (x / scale).round() * scale)
    } else {
        format!("{x:.prec$}", prec = decimals as usize)
    }
}

fn trim_trailing_zeros(rendered: &str) -> String {
    if !rendered.contains('.') {
        return rendered.to_string();
    }
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Apply digit grouping to the integer part and swap in the
/// configured separators. Input uses `.` as the decimal separator.
fn group_and_separate(rendered: &str, settings: &Settings) -> String {
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let grouped = group_digits(int_part, settings.group_size, settings.group_separator.as_str());

    let mut out = String::with_capacity(rendered.len() + 4);
    out.push_str(sign);
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(settings.decimal_separator.as_char());
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str, size: GroupSize, separator: &str) -> String {
    if separator.is_empty() || digits.len() <= 3 {
        return digits.to_string();
    }
    let boundaries: Vec<usize> = match size {
        GroupSize::Off => return digits.to_string(),
        // Positions measured from the right edge.
        GroupSize::Three => (1..)
            .map(|k| k * 3)
            .take_while(|&p| p < digits.len())
            .collect(),
        GroupSize::Four => (1..)
            .map(|k| k * 4)
            .take_while(|&p| p < digits.len())
            .collect(),
        // South-Asian 2-3: one group of three, then twos.
        GroupSize::SouthAsian => std::iter::once(3)
            .chain((1..).map(|k| 3 + k * 2))
            .take_while(|&p| p < digits.len())
            .collect(),
    };

    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::new();
    for (i, c) in chars.iter().enumerate() {
        let from_right = chars.len() - i;
        if i > 0 && boundaries.contains(&from_right) {
            out.push_str(separator);
        }
        out.push(*c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_util::{DecimalSeparator, GroupSeparator};

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_auto_integer() {
        assert_eq!(format_number(4.0, &settings(), Precision::Auto), "4");
        assert_eq!(format_number(0.0, &settings(), Precision::Auto), "0");
        assert_eq!(format_number(-12.0, &settings(), Precision::Auto), "-12");
    }

    #[test]
    fn test_auto_precision_ladder() {
        // >= 100: two decimals.
        assert_eq!(format_number(123.456, &settings(), Precision::Auto), "123.46");
        // >= 1: four decimals.
        assert_eq!(
            format_number(37.77777777, &settings(), Precision::Auto),
            "37.7778"
        );
        // < 1: six decimals.
        assert_eq!(
            format_number(0.1234567, &settings(), Precision::Auto),
            "0.123457"
        );
    }

    #[test]
    fn test_auto_exponential_extremes() {
        assert_eq!(
            format_number(1234567.0, &settings(), Precision::Auto),
            "1.23457e6"
        );
        assert_eq!(
            format_number(0.00001234, &settings(), Precision::Auto),
            "1.23400e-5"
        );
    }

    #[test]
    fn test_grouping_space() {
        assert_eq!(format_number(5200.0, &settings(), Precision::Auto), "5 200");
        assert_eq!(
            format_number(1234567.89, &settings(), Precision::Fixed(2)),
            "1 234 567.89"
        );
    }

    #[test]
    fn test_grouping_south_asian() {
        let mut s = settings();
        s.group_size = GroupSize::SouthAsian;
        assert_eq!(
            format_number(12345678.0, &s, Precision::Fixed(0)),
            "1 23 45 678"
        );
    }

    #[test]
    fn test_grouping_four() {
        let mut s = settings();
        s.group_size = GroupSize::Four;
        assert_eq!(format_number(12345678.0, &s, Precision::Fixed(0)), "1234 5678");
    }

    #[test]
    fn test_grouping_off() {
        let mut s = settings();
        s.group_size = GroupSize::Off;
        assert_eq!(format_number(5200.0, &s, Precision::Auto), "5200");
        let mut s = settings();
        s.group_separator = GroupSeparator::None;
        assert_eq!(format_number(5200.0, &s, Precision::Auto), "5200");
    }

    #[test]
    fn test_decimal_comma() {
        let mut s = settings();
        s.decimal_separator = DecimalSeparator::Comma;
        s.group_separator = GroupSeparator::Period;
        assert_eq!(format_number(1234.5, &s, Precision::Auto), "1.234,5");
    }

    #[test]
    fn test_fixed_keeps_zeros() {
        assert_eq!(format_number(4.0, &settings(), Precision::Fixed(2)), "4.00");
    }

    #[test]
    fn test_sig_figs() {
        assert_eq!(format_number(123.456, &settings(), Precision::SigFigs(4)), "123.5");
        assert_eq!(format_number(0.001234, &settings(), Precision::SigFigs(2)), "0.0012");
        assert_eq!(format_number(98765.0, &settings(), Precision::SigFigs(2)), "99000");
    }

    #[test]
    fn test_explicit_settings_precision() {
        let mut s = settings();
        s.precision = 1;
        assert_eq!(format_number(2.345, &s, Precision::Auto), "2.3");
    }
}
