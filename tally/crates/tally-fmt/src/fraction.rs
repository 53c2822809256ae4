//! Continued-fraction rendering.

/// Largest denominator considered.
const MAX_DENOMINATOR: i64 = 1000;

/// Render a number as `n/d` or `w n/d` using the best
/// continued-fraction approximation with denominator ≤ 1000.
pub fn format_fraction(x: f64) -> String {
    let sign = if x < 0.0 { "-" } else { "" };
    let magnitude = x.abs();
    let whole = magnitude.trunc() as i64;
    let frac = magnitude.fract();

    if frac == 0.0 {
        return format!("{sign}{whole}");
    }

    let (num, den) = approximate(frac);
    if num == 0 {
        return format!("{sign}{whole}");
    }
    if num == den {
        return format!("{sign}{}", whole + 1);
    }
    if whole == 0 {
        format!("{sign}{num}/{den}")
    } else {
        format!("{sign}{whole} {num}/{den}")
    }
}

/// Best rational approximation of `x` in (0, 1) by continued-fraction
/// convergents with denominator ≤ [`MAX_DENOMINATOR`].
fn approximate(x: f64) -> (i64, i64) {
    let (mut h0, mut h1) = (0i64, 1i64);
    let (mut k0, mut k1) = (1i64, 0i64);
    let mut value = x;

    for _ in 0..64 {
        let a = value.floor() as i64;
        let h2 = a * h1 + h0;
        let k2 = a * k1 + k0;
        if k2 > MAX_DENOMINATOR {
            break;
        }
        (h0, h1) = (h1, h2);
        (k0, k1) = (k1, k2);
        let rest = value - a as f64;
        if rest.abs() < 1e-12 {
            break;
        }
        value = 1.0 / rest;
    }
    (h1, k1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_fractions() {
        assert_eq!(format_fraction(0.5), "1/2");
        assert_eq!(format_fraction(0.75), "3/4");
        assert_eq!(format_fraction(0.2), "1/5");
    }

    #[test]
    fn test_mixed_number() {
        assert_eq!(format_fraction(2.5), "2 1/2");
        assert_eq!(format_fraction(1.25), "1 1/4");
    }

    #[test]
    fn test_whole_number() {
        assert_eq!(format_fraction(3.0), "3");
        assert_eq!(format_fraction(0.0), "0");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_fraction(-0.5), "-1/2");
        assert_eq!(format_fraction(-2.75), "-2 3/4");
    }

    #[test]
    fn test_denominator_cap() {
        // 1/1024 is out of reach; the best small-denominator
        // convergent is used instead.
        let rendered = format_fraction(1.0 / 1024.0);
        let (num, den) = rendered.split_once('/').unwrap();
        let num: i64 = num.parse().unwrap();
        let den: i64 = den.parse().unwrap();
        assert!(den <= 1000);
        let err = (num as f64 / den as f64 - 1.0 / 1024.0).abs();
        assert!(err < 1e-3);
    }

    #[test]
    fn test_pi_like() {
        assert_eq!(format_fraction(std::f64::consts::PI), "3 16/113");
    }
}
