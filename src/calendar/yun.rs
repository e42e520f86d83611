//! Raw Luck Cycles (大运)
//!
//! Direction: forward when a yang year stem meets a male chart or a yin year
//! stem meets a female chart, backward otherwise.
//!
//! Start offset: the span from birth to the next 节 (forward) or from the
//! previous 节 to birth (backward), converted at 3 days = 1 year,
//! 1 day = 4 months, 1 时辰 = 10 days.
//!
//! Window 0 is the childhood span before luck starts and carries no pillar.
//! Windows 1..=9 step the month pillar by their index.

use crate::calendar::astro::{jde_to_local, jie_bounds, local_to_jde};
use crate::calendar::eight_char::{hour_branch_index, EightChar};
use crate::error::{BaziError, BaziResult};
use crate::model::{GanZhi, Gender};
use chrono::{Datelike, Duration, Months, NaiveDateTime, Timelike};

/// Number of decade windows produced, including the childhood window
pub const DA_YUN_COUNT: usize = 10;

/// Years, months and days from birth until luck starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOffset {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

/// One decade window before annual pillars are attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDaYun {
    pub index: usize,
    pub start_age: i32,
    pub end_age: i32,
    pub start_year: i32,
    pub end_year: i32,
    /// `None` for the childhood window
    pub gan_zhi: Option<GanZhi>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawYun {
    pub forward: bool,
    pub start_offset: StartOffset,
    pub start_solar: NaiveDateTime,
    pub da_yun: Vec<RawDaYun>,
}

pub fn is_forward(chart: &EightChar, gender: Gender) -> bool {
    let yang = chart.year.stem.is_yang();
    (yang && gender == Gender::Male) || (!yang && gender == Gender::Female)
}

/// 时辰 index used for the offset count; 23:xx counts as the last one
fn offset_hour_index(dt: NaiveDateTime) -> i64 {
    if dt.hour() == 23 {
        11
    } else {
        hour_branch_index(dt.hour()) as i64
    }
}

/// Convert the span between two instants into a start offset
pub fn start_offset(start: NaiveDateTime, end: NaiveDateTime) -> StartOffset {
    let mut hour_diff = offset_hour_index(end) - offset_hour_index(start);
    let mut day_diff = (end.date() - start.date()).num_days();
    if hour_diff < 0 {
        hour_diff += 12;
        day_diff -= 1;
    }
    let month_diff = hour_diff * 10 / 30;
    let total_months = day_diff * 4 + month_diff;
    let days = hour_diff * 10 - month_diff * 30;
    StartOffset {
        years: (total_months / 12).max(0) as u32,
        months: (total_months % 12).max(0) as u32,
        days: days.max(0) as u32,
    }
}

/// Add a start offset to the birth instant; month arithmetic clamps the day
fn add_offset(birth: NaiveDateTime, offset: StartOffset) -> Option<NaiveDateTime> {
    birth
        .checked_add_months(Months::new(offset.years * 12))?
        .checked_add_months(Months::new(offset.months))?
        .checked_add_signed(Duration::days(offset.days as i64))
}

/// The ten decade windows for a luck start year
pub fn da_yun_windows(
    birth_year: i32,
    start_year: i32,
    month_pillar: GanZhi,
    forward: bool,
) -> Vec<RawDaYun> {
    (0..DA_YUN_COUNT)
        .map(|index| {
            if index == 0 {
                return RawDaYun {
                    index,
                    start_age: 1,
                    end_age: start_year - birth_year,
                    start_year: birth_year,
                    end_year: start_year - 1,
                    gan_zhi: None,
                };
            }
            let window_start = start_year + (index as i32 - 1) * 10;
            let start_age = window_start - birth_year + 1;
            let step = if forward { index as i64 } else { -(index as i64) };
            RawDaYun {
                index,
                start_age,
                end_age: start_age + 9,
                start_year: window_start,
                end_year: window_start + 9,
                gan_zhi: Some(month_pillar.offset(step)),
            }
        })
        .collect()
}

/// Luck cycles for a chart resolved at `birth` (true solar time)
pub fn luck_cycles_at(birth: NaiveDateTime, chart: &EightChar, gender: Gender) -> BaziResult<RawYun> {
    let invalid = || BaziError::InvalidSolarDate {
        year: birth.year(),
        month: birth.month(),
        day: birth.day(),
        hour: birth.hour(),
        minute: birth.minute(),
    };

    let forward = is_forward(chart, gender);
    let (prev_jie, next_jie) = jie_bounds(local_to_jde(birth));
    let (start, end) = if forward {
        (birth, jde_to_local(next_jie).ok_or_else(invalid)?)
    } else {
        (jde_to_local(prev_jie).ok_or_else(invalid)?, birth)
    };

    let offset = start_offset(start, end);
    let start_solar = add_offset(birth, offset).ok_or_else(invalid)?;
    let da_yun = da_yun_windows(birth.year(), start_solar.year(), chart.month, forward);

    Ok(RawYun {
        forward,
        start_offset: offset,
        start_solar,
        da_yun,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::eight_char::eight_char_at;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_start_offset_arithmetic() {
        // 22 days and four 时辰 (巳 → 酉)
        let offset = start_offset(at(1990, 6, 15, 10, 15), at(1990, 7, 7, 17, 0));
        assert_eq!(
            offset,
            StartOffset {
                years: 7,
                months: 5,
                days: 10
            }
        );
    }

    #[test]
    fn test_negative_hour_diff_borrows_a_day() {
        // 亥 (23:xx counts as 11) to 子 the next day: 0 days, 1 时辰
        let offset = start_offset(at(2000, 1, 1, 23, 10), at(2000, 1, 2, 0, 30));
        assert_eq!(
            offset,
            StartOffset {
                years: 0,
                months: 0,
                days: 10
            }
        );
    }

    #[test]
    fn test_forward_male_1990() {
        let birth = at(1990, 6, 15, 10, 15);
        let chart = eight_char_at(birth).unwrap();
        let yun = luck_cycles_at(birth, &chart, Gender::Male).unwrap();
        assert!(yun.forward);
        assert_eq!(yun.start_solar.date(), NaiveDate::from_ymd_opt(1997, 11, 25).unwrap());
        assert_eq!(yun.da_yun.len(), DA_YUN_COUNT);

        let first = yun.da_yun[0];
        assert_eq!((first.start_year, first.end_year), (1990, 1996));
        assert_eq!((first.start_age, first.end_age), (1, 7));
        assert!(first.gan_zhi.is_none());

        let second = yun.da_yun[1];
        assert_eq!(second.gan_zhi.unwrap().to_string(), "癸未");
        assert_eq!((second.start_year, second.end_year), (1997, 2006));
        assert_eq!((second.start_age, second.end_age), (8, 17));
        assert_eq!(yun.da_yun[3].gan_zhi.unwrap().to_string(), "乙酉");
    }

    #[test]
    fn test_backward_male_yin_year() {
        let birth = at(1999, 12, 31, 23, 42);
        let chart = eight_char_at(birth).unwrap();
        let yun = luck_cycles_at(birth, &chart, Gender::Male).unwrap();
        assert!(!yun.forward);
        assert_eq!(yun.start_offset.years, 8);
        assert_eq!(yun.da_yun[1].gan_zhi.unwrap().to_string(), "乙亥");
        assert_eq!((yun.da_yun[1].start_year, yun.da_yun[1].end_year), (2007, 2016));
    }

    #[test]
    fn test_zero_offset_childhood_window_is_empty() {
        // Born minutes after 立春: backward female, luck starts at once
        let birth = at(1984, 2, 4, 23, 22);
        let chart = eight_char_at(birth).unwrap();
        let yun = luck_cycles_at(birth, &chart, Gender::Female).unwrap();
        assert!(!yun.forward);
        assert_eq!(yun.start_solar.year(), 1984);
        assert_eq!(yun.da_yun[0].end_year, 1983);
        assert_eq!(yun.da_yun[0].end_age, 0);
        assert_eq!(yun.da_yun[1].gan_zhi.unwrap().to_string(), "乙丑");
    }
}
