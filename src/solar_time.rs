//! True Solar Time Correction
//!
//! Civil clock time (UTC+8) is shifted by the longitude offset from the zone
//! meridian (4 minutes per degree) and by an approximate equation of time:
//!
//! ```text
//! B   = 2π (dayOfYear − 81) / 365
//! EoT = 9.87 sin 2B − 7.53 cos B − 1.5 sin B      (minutes)
//! ```
//!
//! A corrected total outside [0, 1440) rolls the date by one day.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Corrected wall time, serialized as its calendar fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrueSolarTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl TrueSolarTime {
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }
}

/// Equation of time in minutes for a 1-based day of year
pub fn equation_of_time(day_of_year: u32) -> f64 {
    let b = 2.0 * PI * (day_of_year as f64 - 81.0) / 365.0;
    9.87 * libm::sin(2.0 * b) - 7.53 * libm::cos(b) - 1.5 * libm::sin(b)
}

/// Longitude correction in minutes relative to the zone meridian
pub fn longitude_correction(longitude: f64, reference_longitude: f64) -> f64 {
    (longitude - reference_longitude) * 4.0
}

/// Shift a civil date and time to true solar time
///
/// # Arguments
/// * `date` - civil calendar date
/// * `hour`, `minute` - civil clock time
/// * `longitude` - birth place longitude in degrees east
/// * `reference_longitude` - meridian of the civil time zone (120 for UTC+8)
pub fn true_solar_time(
    date: NaiveDate,
    hour: u32,
    minute: u32,
    longitude: f64,
    reference_longitude: f64,
) -> NaiveDateTime {
    let eot = equation_of_time(date.ordinal());
    let mut total = (hour * 60 + minute) as f64
        + longitude_correction(longitude, reference_longitude)
        + eot;

    let mut day_offset = 0;
    if total < 0.0 {
        total += MINUTES_PER_DAY;
        day_offset = -1;
    } else if total >= MINUTES_PER_DAY {
        total -= MINUTES_PER_DAY;
        day_offset = 1;
    }

    let new_hour = libm::floor(total / 60.0) as i64;
    // A minute that rounds up to 60 carries into the hour
    let new_minute = libm::round(total % 60.0) as i64;

    date.and_time(chrono::NaiveTime::MIN)
        + Duration::days(day_offset)
        + Duration::minutes(new_hour * 60 + new_minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_equation_of_time_values() {
        // Day 166 (mid June) is close to a zero crossing
        assert_relative_eq!(equation_of_time(166), -0.192, epsilon = 0.01);
        // Early November peak, late February trough
        assert!(equation_of_time(307) > 16.0);
        assert!(equation_of_time(42) < -14.0);
    }

    #[test]
    fn test_beijing_mid_june() {
        let t = true_solar_time(ymd(1990, 6, 15), 10, 30, 116.4, 120.0);
        assert_eq!(t, ymd(1990, 6, 15).and_hms_opt(10, 15, 0).unwrap());
    }

    #[test]
    fn test_reference_meridian_only_applies_eot() {
        let date = ymd(2024, 3, 21);
        let t = true_solar_time(date, 12, 0, 120.0, 120.0);
        let eot = equation_of_time(date.ordinal());
        let expected = 720.0 + eot;
        let minutes = (t.hour() * 60 + t.minute()) as f64;
        assert!((minutes - expected).abs() <= 0.5);
    }

    #[test]
    fn test_rolls_back_a_day() {
        // Kashgar at 00:30: about −176 minutes of longitude correction
        let t = true_solar_time(ymd(2000, 1, 1), 0, 30, 75.989, 120.0);
        assert_eq!(t.date(), ymd(1999, 12, 31));
        assert!(t.hour() >= 21);
    }

    #[test]
    fn test_rolls_forward_a_day() {
        // Far east at 23:50 in early November: positive longitude and EoT
        let t = true_solar_time(ymd(2001, 11, 3), 23, 50, 129.5, 120.0);
        assert_eq!(t.date(), ymd(2001, 11, 4));
    }

    #[test]
    fn test_from_datetime_fields() {
        let dt = ymd(1999, 12, 31).and_hms_opt(23, 42, 0).unwrap();
        let tst = TrueSolarTime::from_datetime(dt);
        assert_eq!((tst.year, tst.month, tst.day, tst.hour, tst.minute), (1999, 12, 31, 23, 42));
    }
}
