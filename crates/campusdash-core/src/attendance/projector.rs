//! Attendance projection arithmetic.
//!
//! Turns raw attended/total counts into the numbers a student acts on:
//! the current percentage, how many consecutive classes must be attended to
//! climb back to the threshold, and how many may be missed while staying at
//! or above it.
//!
//! Inputs are validated up front: `attended > total` is rejected with
//! [`ProjectionError::InvalidInput`] rather than clamped.

use serde::{Deserialize, Serialize};

use super::{AttendanceStanding, SubjectAttendanceSummary, Tally};
use crate::error::ProjectionError;

/// Threshold used when none is configured (75%).
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// Largest power of ten tried when reading a threshold as a decimal fraction.
const MAX_DECIMAL_PLACES: u32 = 9;

/// Slack per counted class for thresholds that are not short decimals.
///
/// `0.7 * 10.0` is `7.000000000000001` in binary floating point; without the
/// slack an exact boundary would round up to the next whole class. Even at
/// `u32::MAX` classes this stays well below one class.
const FLOAT_EPSILON: f64 = 1e-12;

/// Minimum acceptable attendance fraction, strictly between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// Validate a fraction such as `0.75`.
    pub fn new(value: f64) -> Result<Self, ProjectionError> {
        if value.is_finite() && value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(ProjectionError::InvalidThreshold { value })
        }
    }

    /// Build from a whole percentage such as `75`.
    pub fn from_percent(percent: u32) -> Result<Self, ProjectionError> {
        Self::new(f64::from(percent) / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn as_percent(self) -> f64 {
        self.0 * 100.0
    }

    /// `(numerator, denominator)` with a power-of-ten denominator, when the
    /// threshold has at most nine decimal places (0.75 is `(75, 100)`).
    /// Thresholds such as 2/3 return `None`.
    fn decimal_ratio(self) -> Option<(u64, u64)> {
        let mut denominator = 1u64;
        for _ in 0..=MAX_DECIMAL_PLACES {
            let scaled = self.0 * denominator as f64;
            let numerator = scaled.round();
            if (scaled - numerator).abs() <= 1e-6 {
                let numerator = numerator as u64;
                return (numerator > 0 && numerator < denominator)
                    .then_some((numerator, denominator));
            }
            denominator *= 10;
        }
        None
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ProjectionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

/// All projected values for one attended/total pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProjection {
    pub attended: u32,
    pub total: u32,
    /// Unrounded percentage (0.0 to 100.0)
    pub percentage: f64,
    pub classes_needed: u32,
    pub max_absences: u32,
    pub standing: AttendanceStanding,
}

fn check_counts(attended: u32, total: u32) -> Result<(), ProjectionError> {
    if attended > total {
        return Err(ProjectionError::InvalidInput { attended, total });
    }
    Ok(())
}

fn float_tolerance(total: u32) -> f64 {
    FLOAT_EPSILON * f64::from(total).max(1.0)
}

fn saturate(value: u128) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Percentage without validation; callers guarantee `attended <= total`.
pub(crate) fn raw_percentage(attended: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * f64::from(attended) / f64::from(total)
    }
}

/// `100 * attended / total`, or 0 when no classes were held.
pub fn percentage(attended: u32, total: u32) -> Result<f64, ProjectionError> {
    check_counts(attended, total)?;
    Ok(raw_percentage(attended, total))
}

/// Round a percentage to `decimals` places (0 for whole-percent display).
pub fn round_percent(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// Decimal thresholds are solved exactly in integers: with t = p / q,
// (a + x) / (n + x) >= t  <=>  x >= (p*n - q*a) / (q - p)
// a / (n + x) >= t        <=>  x <= (q*a - p*n) / p
fn unchecked_classes_needed(attended: u32, total: u32, threshold: Threshold) -> u32 {
    if total == 0 {
        return 0;
    }
    if let Some((p, q)) = threshold.decimal_ratio() {
        let (p, q) = (u128::from(p), u128::from(q));
        let deficit = (p * u128::from(total)).saturating_sub(q * u128::from(attended));
        return saturate(deficit.div_ceil(q - p));
    }

    let t = threshold.value();
    let needed = (t * f64::from(total) - f64::from(attended)) / (1.0 - t);
    let x = (needed - float_tolerance(total)).ceil();
    if x <= 0.0 {
        0
    } else {
        x as u32
    }
}

fn unchecked_max_absences(attended: u32, total: u32, threshold: Threshold) -> u32 {
    if total == 0 {
        return 0;
    }
    if let Some((p, q)) = threshold.decimal_ratio() {
        let (p, q) = (u128::from(p), u128::from(q));
        let surplus = (q * u128::from(attended)).saturating_sub(p * u128::from(total));
        return saturate(surplus / p);
    }

    let t = threshold.value();
    let slack = (f64::from(attended) - t * f64::from(total)) / t;
    let x = (slack + float_tolerance(total)).floor();
    if x <= 0.0 {
        0
    } else {
        x as u32
    }
}

fn meets_threshold(attended: u32, total: u32, threshold: Threshold) -> bool {
    match threshold.decimal_ratio() {
        Some((p, q)) => {
            u128::from(q) * u128::from(attended) >= u128::from(p) * u128::from(total)
        }
        None => {
            f64::from(attended) + float_tolerance(total) >= threshold.value() * f64::from(total)
        }
    }
}

/// Smallest `x >= 0` with `(attended + x) / (total + x) >= threshold`,
/// assuming every one of the next `x` classes is attended.
pub fn classes_needed_for_threshold(
    attended: u32,
    total: u32,
    threshold: Threshold,
) -> Result<u32, ProjectionError> {
    check_counts(attended, total)?;
    Ok(unchecked_classes_needed(attended, total, threshold))
}

/// Largest `x >= 0` with `attended / (total + x) >= threshold`, i.e. how many
/// future classes can be missed. Always 0 when already below threshold.
pub fn max_absences_for_threshold(
    attended: u32,
    total: u32,
    threshold: Threshold,
) -> Result<u32, ProjectionError> {
    check_counts(attended, total)?;
    Ok(unchecked_max_absences(attended, total, threshold))
}

/// Projector bound to one threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttendanceProjector {
    threshold: Threshold,
}

impl AttendanceProjector {
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn percentage(&self, attended: u32, total: u32) -> Result<f64, ProjectionError> {
        percentage(attended, total)
    }

    pub fn classes_needed(&self, attended: u32, total: u32) -> Result<u32, ProjectionError> {
        classes_needed_for_threshold(attended, total, self.threshold)
    }

    pub fn max_absences(&self, attended: u32, total: u32) -> Result<u32, ProjectionError> {
        max_absences_for_threshold(attended, total, self.threshold)
    }

    /// Which of the two projections applies.
    ///
    /// With no classes held the student is treated as safe with no slack.
    pub fn standing(&self, attended: u32, total: u32) -> Result<AttendanceStanding, ProjectionError> {
        check_counts(attended, total)?;
        Ok(self.unchecked_standing(attended, total))
    }

    fn unchecked_standing(&self, attended: u32, total: u32) -> AttendanceStanding {
        if meets_threshold(attended, total, self.threshold) {
            AttendanceStanding::Safe {
                can_miss: unchecked_max_absences(attended, total, self.threshold),
            }
        } else {
            AttendanceStanding::Short {
                must_attend: unchecked_classes_needed(attended, total, self.threshold),
            }
        }
    }

    pub fn project(&self, attended: u32, total: u32) -> Result<SubjectProjection, ProjectionError> {
        check_counts(attended, total)?;
        Ok(SubjectProjection {
            attended,
            total,
            percentage: raw_percentage(attended, total),
            classes_needed: unchecked_classes_needed(attended, total, self.threshold),
            max_absences: unchecked_max_absences(attended, total, self.threshold),
            standing: self.unchecked_standing(attended, total),
        })
    }

    /// Summary row for one subject. A [`Tally`] always satisfies
    /// `attended <= total`, so this cannot fail.
    pub fn summarize(&self, subject: impl Into<String>, tally: Tally) -> SubjectAttendanceSummary {
        let (attended, total) = (tally.attended(), tally.total());
        SubjectAttendanceSummary {
            subject: subject.into(),
            attended,
            total,
            percentage: round_percent(raw_percentage(attended, total), 0),
            classes_needed: unchecked_classes_needed(attended, total, self.threshold),
            max_absences: unchecked_max_absences(attended, total, self.threshold),
            standing: self.unchecked_standing(attended, total),
        }
    }
}
