//! Calendar Provider
//!
//! The engine asks a `CalendarProvider` for raw calendrical primitives:
//! pillars at an instant, luck cycles, annual pillars, lunar conversion and
//! leap months. `AstronomicalCalendar` computes them from a low-precision
//! ephemeris; other providers can be plugged into the engine instead.
//!
//! - `astro`: solar longitude, solar terms, new moons
//! - `lunar`: lunisolar months, leap months, lunar ↔ solar dates
//! - `eight_char`: pillars and auxiliary markers
//! - `yun`: luck-cycle start and decade windows
//! - `shen_sha`: built-in shen-sha markers

pub mod astro;
pub mod eight_char;
pub mod lunar;
pub mod shen_sha;
pub mod yun;

pub use eight_char::EightChar;
pub use lunar::LunarDate;
pub use yun::{RawDaYun, RawYun, StartOffset};

use crate::error::{BaziError, BaziResult};
use crate::model::{GanZhi, Gender, PillarPosition};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Earliest Gregorian year the built-in calendar resolves
pub const MIN_CALENDAR_YEAR: i32 = 1800;
/// Latest Gregorian year the built-in calendar resolves
pub const MAX_CALENDAR_YEAR: i32 = 2200;

pub trait CalendarProvider: Send + Sync {
    /// Four pillars and lunar date at a true solar date-time
    fn eight_char(&self, at: NaiveDateTime) -> BaziResult<EightChar>;

    /// Direction, start offset and raw decade windows
    fn luck_cycles(&self, at: NaiveDateTime, gender: Gender) -> BaziResult<RawYun>;

    /// Annual pillar in effect on `date`
    fn year_pillar(&self, date: NaiveDate) -> BaziResult<GanZhi>;

    fn lunar_to_solar(&self, year: i32, month: u32, day: u32, leap: bool) -> BaziResult<NaiveDate>;

    /// Leap month of a lunar year, 0 if none
    fn leap_month(&self, year: i32) -> BaziResult<u32>;

    /// Best-effort shen-sha for one pillar; providers without the capability
    /// return nothing
    fn shen_sha(&self, _chart: &EightChar, _position: PillarPosition) -> Vec<String> {
        Vec::new()
    }
}

/// Built-in provider backed by the `astro` ephemeris
#[derive(Debug, Clone, Copy, Default)]
pub struct AstronomicalCalendar;

impl AstronomicalCalendar {
    pub fn new() -> Self {
        Self
    }

    fn check_year(year: i32) -> BaziResult<()> {
        if (MIN_CALENDAR_YEAR..=MAX_CALENDAR_YEAR).contains(&year) {
            Ok(())
        } else {
            Err(BaziError::YearOutOfRange {
                year,
                min: MIN_CALENDAR_YEAR,
                max: MAX_CALENDAR_YEAR,
            })
        }
    }
}

impl CalendarProvider for AstronomicalCalendar {
    fn eight_char(&self, at: NaiveDateTime) -> BaziResult<EightChar> {
        Self::check_year(at.year())?;
        eight_char::eight_char_at(at)
    }

    fn luck_cycles(&self, at: NaiveDateTime, gender: Gender) -> BaziResult<RawYun> {
        let chart = self.eight_char(at)?;
        yun::luck_cycles_at(at, &chart, gender)
    }

    fn year_pillar(&self, date: NaiveDate) -> BaziResult<GanZhi> {
        Self::check_year(date.year())?;
        Ok(eight_char::year_pillar_at(date.and_time(NaiveTime::MIN)))
    }

    fn lunar_to_solar(&self, year: i32, month: u32, day: u32, leap: bool) -> BaziResult<NaiveDate> {
        Self::check_year(year)?;
        lunar::lunar_to_solar(year, month, day, leap)
    }

    fn leap_month(&self, year: i32) -> BaziResult<u32> {
        Self::check_year(year)?;
        Ok(lunar::leap_month(year))
    }

    fn shen_sha(&self, chart: &EightChar, position: PillarPosition) -> Vec<String> {
        shen_sha::shen_sha_for(chart, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Provider that only knows pillars, to exercise trait defaults
    struct PillarsOnly;

    impl CalendarProvider for PillarsOnly {
        fn eight_char(&self, at: NaiveDateTime) -> BaziResult<EightChar> {
            eight_char::eight_char_at(at)
        }
        fn luck_cycles(&self, at: NaiveDateTime, gender: Gender) -> BaziResult<RawYun> {
            let chart = self.eight_char(at)?;
            yun::luck_cycles_at(at, &chart, gender)
        }
        fn year_pillar(&self, date: NaiveDate) -> BaziResult<GanZhi> {
            Ok(eight_char::year_pillar_at(date.and_time(NaiveTime::MIN)))
        }
        fn lunar_to_solar(&self, year: i32, month: u32, day: u32, leap: bool) -> BaziResult<NaiveDate> {
            lunar::lunar_to_solar(year, month, day, leap)
        }
        fn leap_month(&self, year: i32) -> BaziResult<u32> {
            Ok(lunar::leap_month(year))
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_shen_sha_default_is_empty() {
        let at = ymd(1990, 6, 15).and_hms_opt(10, 15, 0).unwrap();
        let provider = PillarsOnly;
        let chart = provider.eight_char(at).unwrap();
        assert!(provider.shen_sha(&chart, PillarPosition::Year).is_empty());
        assert!(!AstronomicalCalendar.shen_sha(&chart, PillarPosition::Year).is_empty());
    }

    #[test]
    fn test_year_pillar_mid_year() {
        let cal = AstronomicalCalendar::new();
        assert_eq!(cal.year_pillar(ymd(2024, 7, 1)).unwrap().to_string(), "甲辰");
        assert_eq!(cal.year_pillar(ymd(1901, 7, 1)).unwrap().to_string(), "辛丑");
        // Before 立春 the previous year's pillar still holds
        assert_eq!(cal.year_pillar(ymd(2024, 1, 15)).unwrap().to_string(), "癸卯");
    }

    #[test]
    fn test_out_of_range_years_error() {
        let cal = AstronomicalCalendar::new();
        assert!(matches!(
            cal.leap_month(1700),
            Err(BaziError::YearOutOfRange { year: 1700, .. })
        ));
        assert!(cal.year_pillar(ymd(2500, 7, 1)).is_err());
    }

    #[test]
    fn test_provider_leap_month() {
        assert_eq!(AstronomicalCalendar.leap_month(2023).unwrap(), 2);
        assert_eq!(AstronomicalCalendar.leap_month(2024).unwrap(), 0);
    }
}
