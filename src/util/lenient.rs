//! Lenient attribute parsing.
//!
//! CI-generated XML is frequently partial, so numeric attributes never fail a
//! parse. Each helper resolves a missing or malformed value to a fixed
//! default and reports which [`Fallback`] was applied, so callers and tests
//! can tell a real zero from a substituted one.

use tracing::trace;

/// Why a default was substituted for an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The attribute was not present (or empty).
    Missing,
    /// The attribute was present but not a valid value.
    Malformed,
}

/// Outcome of a lenient parse: the value used plus the fallback, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lenient<T> {
    pub value: T,
    pub fallback: Option<Fallback>,
}

impl<T> Lenient<T> {
    const fn parsed(value: T) -> Self {
        Self {
            value,
            fallback: None,
        }
    }

    const fn defaulted(value: T, fallback: Fallback) -> Self {
        Self {
            value,
            fallback: Some(fallback),
        }
    }
}

/// Parse a non-negative integer count, defaulting to 0.
#[must_use]
pub fn count_or_zero(attr: &str, raw: Option<&str>) -> Lenient<usize> {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Lenient::defaulted(0, Fallback::Missing);
    };
    match text.parse::<usize>() {
        Ok(value) => Lenient::parsed(value),
        Err(_) => {
            trace!(attr, value = text, "non-numeric count, using 0");
            Lenient::defaulted(0, Fallback::Malformed)
        }
    }
}

/// Parse a duration in seconds, defaulting to 0.0.
///
/// Negative and non-finite values count as malformed.
#[must_use]
pub fn seconds_or_zero(attr: &str, raw: Option<&str>) -> Lenient<f64> {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Lenient::defaulted(0.0, Fallback::Missing);
    };
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Lenient::parsed(value),
        _ => {
            trace!(attr, value = text, "invalid duration, using 0.0");
            Lenient::defaulted(0.0, Fallback::Malformed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_parsed() {
        let res = count_or_zero("failures", Some(" 3 "));
        assert_eq!(res.value, 3);
        assert_eq!(res.fallback, None);
    }

    #[test]
    fn test_count_fallbacks() {
        assert_eq!(count_or_zero("failures", None).fallback, Some(Fallback::Missing));
        assert_eq!(count_or_zero("failures", Some("")).fallback, Some(Fallback::Missing));

        let bad = count_or_zero("failures", Some("abc"));
        assert_eq!(bad.value, 0);
        assert_eq!(bad.fallback, Some(Fallback::Malformed));

        assert_eq!(count_or_zero("failures", Some("-1")).value, 0);
        assert_eq!(count_or_zero("failures", Some("1.5")).value, 0);
    }

    #[test]
    fn test_seconds_parsed() {
        let res = seconds_or_zero("time", Some("0.125"));
        assert!((res.value - 0.125).abs() < f64::EPSILON);
        assert_eq!(res.fallback, None);
        assert!((seconds_or_zero("time", Some("2")).value - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seconds_fallbacks() {
        for raw in ["-1", "NaN", "inf", "fast"] {
            let res = seconds_or_zero("time", Some(raw));
            assert!(res.value.abs() < f64::EPSILON, "{raw}");
            assert_eq!(res.fallback, Some(Fallback::Malformed), "{raw}");
        }
        assert_eq!(seconds_or_zero("time", None).fallback, Some(Fallback::Missing));
    }
}
