//! Four Pillars from a True Solar Date-Time
//!
//! - Year pillar switches at the 立春 instant.
//! - Month pillar switches at each of the twelve 节 (solar longitude
//!   315° + 30°k); its stem follows the year stem.
//! - Day pillar is `(JDN + 49) mod 60`. From 23:00 the next day's pillar is
//!   used (晚子时日柱算明天).
//! - Hour pillar branch is the two-hour 时辰, stem follows the day stem.

use crate::calendar::astro::{apparent_solar_longitude, jdn, local_to_jde, solar_term_jde};
use crate::calendar::lunar::{solar_to_lunar, LunarDate};
use crate::error::{BaziError, BaziResult};
use crate::model::{Branch, FourPillars, GanZhi, PillarPosition, Stem};
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Solar longitude of 立春
pub const LI_CHUN_LONGITUDE: f64 = 315.0;

/// Day pillar index is `(JDN + 49) mod 60`; 2000-01-07 (JDN 2451551) is 甲子
const DAY_CYCLE_OFFSET: i64 = 49;

/// A fully resolved chart: four pillars plus the lunar date they fall on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EightChar {
    pub year: GanZhi,
    pub month: GanZhi,
    pub day: GanZhi,
    pub hour: GanZhi,
    pub lunar_date: LunarDate,
}

impl EightChar {
    pub fn pillar(&self, position: PillarPosition) -> GanZhi {
        self.four_pillars().get(position)
    }

    pub fn four_pillars(&self) -> FourPillars {
        FourPillars::new(self.year, self.month, self.day, self.hour)
    }

    pub fn day_master(&self) -> Stem {
        self.day.stem
    }

    /// 纳音 of one pillar
    pub fn nayin(&self, position: PillarPosition) -> &'static str {
        self.pillar(position).nayin()
    }

    /// Zodiac animal of the 立春-bounded year
    pub fn sheng_xiao(&self) -> &'static str {
        self.year.branch.zodiac()
    }

    /// 胎元: month stem +1, month branch +3
    pub fn tai_yuan(&self) -> GanZhi {
        GanZhi::new(
            Stem::from_index(self.month.stem.index() + 1),
            Branch::from_index(self.month.branch.index() + 3),
        )
    }

    /// 命宫
    pub fn ming_gong(&self) -> GanZhi {
        let sum = month_order(self.month.branch) + month_order(self.hour.branch);
        let offset = if sum >= 14 { 26 - sum } else { 14 - sum };
        self.palace(offset)
    }

    /// 身宫
    pub fn shen_gong(&self) -> GanZhi {
        let mut offset = month_order(self.month.branch) + month_order(self.hour.branch);
        while offset > 12 {
            offset -= 12;
        }
        self.palace(offset)
    }

    /// Day pillar 空亡 branches, e.g. "寅卯"
    pub fn day_xun_kong(&self) -> String {
        self.day.xun_kong_string()
    }

    /// Palace at 1-based month order `offset` (寅 = 1); its stem follows the
    /// year stem the way month stems do
    fn palace(&self, offset: usize) -> GanZhi {
        let mut gan = (self.year.stem.index() + 1) * 2 + offset;
        while gan > 10 {
            gan -= 10;
        }
        GanZhi::new(Stem::from_index(gan + 9), Branch::from_index(offset + 1))
    }
}

/// 1-based month order of a branch, 寅 = 1 … 丑 = 12
fn month_order(branch: Branch) -> usize {
    (branch.index() + 10) % 12 + 1
}

/// 时辰 index of an hour, 子 = 0 (23:00 and 00:00 both map to 子)
pub fn hour_branch_index(hour: u32) -> usize {
    ((hour as usize + 1) / 2) % 12
}

/// Year pillar at a local instant, switching at 立春
pub fn year_pillar_at(at: NaiveDateTime) -> GanZhi {
    GanZhi::from_index(sexagenary_year(solar_year(at)))
}

/// Gregorian year whose 立春 most recently passed at `at`
fn solar_year(at: NaiveDateTime) -> i32 {
    let year = at.year();
    if local_to_jde(at) >= solar_term_jde(year, LI_CHUN_LONGITUDE) {
        year
    } else {
        year - 1
    }
}

fn sexagenary_year(year: i32) -> usize {
    (year as i64 - 4).rem_euclid(60) as usize
}

/// Month pillar from the Sun's position and the year stem
fn month_pillar_at(at: NaiveDateTime, year_stem: Stem) -> GanZhi {
    let longitude = apparent_solar_longitude(local_to_jde(at));
    let since_li_chun = (longitude - LI_CHUN_LONGITUDE).rem_euclid(360.0);
    let offset = libm::floor(since_li_chun / 30.0) as usize % 12;
    let first_month_stem = (year_stem.index() % 5) * 2 + 2;
    GanZhi::new(
        Stem::from_index(first_month_stem + offset),
        Branch::from_index(2 + offset),
    )
}

fn day_pillar_at(at: NaiveDateTime) -> GanZhi {
    let mut day_number = jdn(at.date());
    if at.hour() >= 23 {
        day_number += 1;
    }
    GanZhi::from_index((day_number + DAY_CYCLE_OFFSET).rem_euclid(60) as usize)
}

fn hour_pillar_at(at: NaiveDateTime, day_stem: Stem) -> GanZhi {
    let branch = hour_branch_index(at.hour());
    GanZhi::new(
        Stem::from_index((day_stem.index() % 5) * 2 + branch),
        Branch::from_index(branch),
    )
}

/// Resolve the four pillars for a (true solar) local date-time
pub fn eight_char_at(at: NaiveDateTime) -> BaziResult<EightChar> {
    let lunar_date = solar_to_lunar(at.date()).ok_or(BaziError::InvalidSolarDate {
        year: at.year(),
        month: at.month(),
        day: at.day(),
        hour: at.hour(),
        minute: at.minute(),
    })?;
    let year = year_pillar_at(at);
    let month = month_pillar_at(at, year.stem);
    let day = day_pillar_at(at);
    let hour = hour_pillar_at(at, day.stem);
    Ok(EightChar {
        year,
        month,
        day,
        hour,
        lunar_date,
    })
}
