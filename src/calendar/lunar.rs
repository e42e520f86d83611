//! Chinese Lunisolar Calendar
//!
//! Months start on the Beijing civil day of a new moon. The month containing
//! the winter solstice is month 11. When thirteen new moons separate two
//! consecutive month-11 starts, the first month without a principal term
//! (中气) becomes the leap month, carrying the previous month's number.

use crate::calendar::astro::{
    date_from_jdn, jdn, local_day_number, new_moon_jde, new_moon_on_or_before, solar_term_jde,
};
use crate::error::{BaziError, BaziResult};
use chrono::{Datelike, NaiveDate};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "正", "二", "三", "四", "五", "六", "七", "八", "九", "十", "冬", "腊",
];

const DIGITS: [&str; 10] = ["〇", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// One lunar month, with its first day as a Julian Day Number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarMonth {
    pub year: i32,
    pub month: u32,
    pub leap: bool,
    pub first_day: i64,
    pub days: u32,
}

impl LunarMonth {
    fn contains(&self, day_number: i64) -> bool {
        day_number >= self.first_day && day_number < self.first_day + self.days as i64
    }
}

/// A date in the lunar calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub leap: bool,
}

impl LunarDate {
    pub fn year_in_chinese(&self) -> String {
        self.year
            .to_string()
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| DIGITS[d as usize])
            .collect()
    }

    pub fn month_in_chinese(&self) -> String {
        let name = MONTH_NAMES[((self.month + 11) % 12) as usize];
        if self.leap {
            format!("闰{}", name)
        } else {
            name.to_string()
        }
    }

    pub fn day_in_chinese(&self) -> String {
        day_name(self.day)
    }
}

/// 初一 … 初十, 十一 … 十九, 二十, 廿一 … 廿九, 三十
fn day_name(day: u32) -> String {
    let unit = |n: u32| DIGITS[n as usize];
    match day {
        1..=9 => format!("初{}", unit(day)),
        10 => "初十".to_string(),
        11..=19 => format!("十{}", unit(day - 10)),
        20 => "二十".to_string(),
        21..=29 => format!("廿{}", unit(day - 20)),
        30 => "三十".to_string(),
        _ => String::new(),
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}年{}月{}",
            self.year_in_chinese(),
            self.month_in_chinese(),
            self.day_in_chinese()
        )
    }
}

// ============================================================================
// Month tables
// ============================================================================

fn winter_solstice_day(year: i32) -> i64 {
    local_day_number(solar_term_jde(year, 270.0))
}

/// Civil days of the twelve principal terms (longitudes 0°, 30°, …) of each
/// Gregorian year in the range
fn principal_term_days(first_year: i32, last_year: i32) -> Vec<i64> {
    (first_year..=last_year)
        .flat_map(|y| (0..12).map(move |i| local_day_number(solar_term_jde(y, i as f64 * 30.0))))
        .collect()
}

/// Months from the month-11 start on or before the winter solstice of
/// `year - 1` up to (excluding) the one for `year`, as (first day, end day,
/// number, leap)
fn sui_months(year: i32) -> Vec<(i64, i64, u32, bool)> {
    let ka = new_moon_on_or_before(winter_solstice_day(year - 1));
    let kb = new_moon_on_or_before(winter_solstice_day(year));
    let starts: Vec<i64> = (ka..=kb).map(|k| local_day_number(new_moon_jde(k))).collect();
    let count = starts.len().saturating_sub(1);
    let zhongqi = principal_term_days(year - 1, year);

    let mut leap_pending = count == 13;
    let mut number = 11;
    let mut months = Vec::with_capacity(count);
    for i in 0..count {
        let (first, end) = (starts[i], starts[i + 1]);
        let has_zhongqi = zhongqi.iter().any(|&d| d >= first && d < end);
        if leap_pending && i > 0 && !has_zhongqi {
            months.push((first, end, number, true));
            leap_pending = false;
        } else {
            if i > 0 {
                number = number % 12 + 1;
            }
            months.push((first, end, number, false));
        }
    }
    months
}

/// All months of lunar year `year`, 正月 first
pub fn months_of_year(year: i32) -> Vec<LunarMonth> {
    let mut months = Vec::with_capacity(13);
    for sui_year in [year, year + 1] {
        let mut reached_first_month = false;
        for (first, end, number, leap) in sui_months(sui_year) {
            if number == 1 && !leap {
                reached_first_month = true;
            }
            let lunar_year = if reached_first_month { sui_year } else { sui_year - 1 };
            if lunar_year == year {
                months.push(LunarMonth {
                    year,
                    month: number,
                    leap,
                    first_day: first,
                    days: (end - first) as u32,
                });
            }
        }
    }
    months
}

/// Leap month number of lunar year `year`, 0 if none
pub fn leap_month(year: i32) -> u32 {
    months_of_year(year)
        .iter()
        .find(|m| m.leap)
        .map(|m| m.month)
        .unwrap_or(0)
}

pub fn solar_to_lunar(date: NaiveDate) -> Option<LunarDate> {
    let day_number = jdn(date);
    [date.year() - 1, date.year()]
        .into_iter()
        .flat_map(months_of_year)
        .find(|m| m.contains(day_number))
        .map(|m| LunarDate {
            year: m.year,
            month: m.month,
            day: (day_number - m.first_day) as u32 + 1,
            leap: m.leap,
        })
}

pub fn lunar_to_solar(year: i32, month: u32, day: u32, leap: bool) -> BaziResult<NaiveDate> {
    let invalid = || BaziError::InvalidLunarDate {
        year,
        month,
        day,
        leap,
    };
    if !(1..=12).contains(&month) || day == 0 {
        return Err(invalid());
    }
    let found = months_of_year(year)
        .into_iter()
        .find(|m| m.month == month && m.leap == leap)
        .ok_or_else(invalid)?;
    if day > found.days {
        return Err(invalid());
    }
    date_from_jdn(found.first_day + day as i64 - 1).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_known_leap_months() {
        let known = [
            (1903, 5),
            (1984, 10),
            (1990, 5),
            (2001, 4),
            (2014, 9),
            (2017, 6),
            (2020, 4),
            (2023, 2),
            (2025, 6),
            (2033, 11),
        ];
        for (year, expected) in known {
            assert_eq!(leap_month(year), expected, "leap month of {}", year);
        }
        assert_eq!(leap_month(2024), 0);
        assert_eq!(leap_month(2000), 0);
    }

    #[test]
    fn test_spring_festival_dates() {
        for (year, date) in [
            (1990, ymd(1990, 1, 27)),
            (2000, ymd(2000, 2, 5)),
            (2024, ymd(2024, 2, 10)),
            (2025, ymd(2025, 1, 29)),
        ] {
            assert_eq!(lunar_to_solar(year, 1, 1, false).unwrap(), date);
        }
    }

    #[test]
    fn test_solar_to_lunar() {
        let d = solar_to_lunar(ymd(1990, 6, 15)).unwrap();
        assert_eq!(
            d,
            LunarDate {
                year: 1990,
                month: 5,
                day: 23,
                leap: false
            }
        );
        assert_eq!(d.to_string(), "一九九〇年五月廿三");

        let d = solar_to_lunar(ymd(2000, 1, 1)).unwrap();
        assert_eq!((d.year, d.month, d.day), (1999, 11, 25));
        assert_eq!(d.to_string(), "一九九九年冬月廿五");
    }

    #[test]
    fn test_leap_month_roundtrip() {
        assert_eq!(lunar_to_solar(2023, 2, 1, true).unwrap(), ymd(2023, 3, 22));
        let d = solar_to_lunar(ymd(2023, 4, 19)).unwrap();
        assert!(d.leap);
        assert_eq!(d.to_string(), "二〇二三年闰二月廿九");
        // Leap 11th month sits at the end of lunar year 2033
        assert_eq!(lunar_to_solar(2033, 11, 1, true).unwrap(), ymd(2033, 12, 22));
    }

    #[test]
    fn test_invalid_lunar_dates() {
        assert!(lunar_to_solar(2024, 2, 1, true).is_err());
        assert!(lunar_to_solar(2024, 13, 1, false).is_err());
        assert!(lunar_to_solar(2024, 1, 31, false).is_err());
        assert!(lunar_to_solar(2024, 1, 0, false).is_err());
    }

    #[test]
    fn test_year_has_twelve_or_thirteen_months() {
        for year in [1950, 1990, 2023, 2024, 2033] {
            let months = months_of_year(year);
            let expected = if leap_month(year) > 0 { 13 } else { 12 };
            assert_eq!(months.len(), expected, "months in {}", year);
            assert!(months.iter().all(|m| m.days == 29 || m.days == 30));
        }
    }

    #[test]
    fn test_day_names() {
        assert_eq!(day_name(1), "初一");
        assert_eq!(day_name(10), "初十");
        assert_eq!(day_name(15), "十五");
        assert_eq!(day_name(20), "二十");
        assert_eq!(day_name(23), "廿三");
        assert_eq!(day_name(30), "三十");
    }
}
