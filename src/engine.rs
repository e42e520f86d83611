//! Chart Engine
//!
//! Runs the full pipeline for one birth request:
//!
//! 1. Validate the request; convert a lunar date to its solar date
//! 2. Resolve the location's longitude and shift to true solar time
//! 3. Ask the calendar provider for the four pillars
//! 4. Annotate pillars; analyze day master, five elements, ten gods, pattern
//! 5. Attach luck cycles with annual pillars and shen-sha markers
//!
//! The engine holds only read-only state and is shared freely across threads.

use crate::analysis::{
    analyze_day_master, analyze_five_elements, analyze_ten_gods, build_pillars, classify_pattern,
    day_master_characteristics, enrich_luck_cycles, DayMaster, FiveElementsAnalysis,
    PatternContext, PatternInfo, PillarSet, TenGodsAnalysis, YunInfo,
};
use crate::calendar::{AstronomicalCalendar, CalendarProvider, EightChar};
use crate::config::EngineConfig;
use crate::error::{BaziError, BaziResult};
use crate::geo::{Coordinates, GeoLocator};
use crate::model::{Gender, PillarPosition};
use crate::request::{BirthRequest, CalendarType};
use crate::solar_time::{true_solar_time, TrueSolarTime};
use anyhow::Result;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XunKongInfo {
    pub day_xun_kong: String,
}

/// Shen-sha markers per pillar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShenShaInfo {
    pub year: Vec<String>,
    pub month: Vec<String>,
    pub day: Vec<String>,
    pub hour: Vec<String>,
}

impl ShenShaInfo {
    pub fn get(&self, position: PillarPosition) -> &[String] {
        match position {
            PillarPosition::Year => &self.year,
            PillarPosition::Month => &self.month,
            PillarPosition::Day => &self.day,
            PillarPosition::Hour => &self.hour,
        }
    }
}

/// A complete chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaziChart {
    pub gender: Gender,
    /// True solar date-time, `YYYY-MM-DD HH:MM:SS`
    pub solar_date: String,
    pub lunar_date: String,
    pub true_solar_time: TrueSolarTime,
    pub four_pillars: PillarSet,
    /// yearGan / monthGan / hourGan → ten-god name
    pub four_pillars_shi_shen: BTreeMap<String, String>,
    pub four_pillars_xun_kong: XunKongInfo,
    pub day_master: DayMaster,
    pub five_elements: FiveElementsAnalysis,
    pub ten_gods: TenGodsAnalysis,
    pub pattern: PatternInfo,
    pub yun: YunInfo,
    pub shen_sha: ShenShaInfo,
    pub sheng_xiao: String,
    pub tai_yuan: String,
    pub ming_gong: String,
    pub shen_gong: String,
    pub xun_kong: String,
    pub day_master_characteristics: Vec<String>,
}

pub struct BaziEngine {
    config: EngineConfig,
    locator: GeoLocator,
    provider: Arc<dyn CalendarProvider>,
}

impl BaziEngine {
    /// Engine with the configured geo dataset and the built-in calendar
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_provider(config, Arc::new(AstronomicalCalendar::new()))
    }

    /// Engine with a caller-supplied calendar provider
    pub fn with_provider(config: EngineConfig, provider: Arc<dyn CalendarProvider>) -> Result<Self> {
        let locator = GeoLocator::from_config(&config)?;
        info!("Bazi engine ready ({} geo rows)", locator.len());
        Ok(Self::from_parts(config, locator, provider))
    }

    pub fn from_parts(
        config: EngineConfig,
        locator: GeoLocator,
        provider: Arc<dyn CalendarProvider>,
    ) -> Self {
        Self {
            config,
            locator,
            provider,
        }
    }

    /// Leap month of a lunar year, 0 if none
    pub fn leap_month(&self, year: i32) -> BaziResult<u32> {
        self.provider.leap_month(year)
    }

    pub fn coordinates(&self, location: &str) -> Coordinates {
        self.locator.coordinates(location)
    }

    /// Civil solar date of the request
    fn civil_date(&self, request: &BirthRequest) -> BaziResult<NaiveDate> {
        match request.calendar_type {
            CalendarType::Solar => NaiveDate::from_ymd_opt(request.year, request.month, request.day)
                .ok_or(BaziError::InvalidSolarDate {
                    year: request.year,
                    month: request.month,
                    day: request.day,
                    hour: request.hour,
                    minute: request.minute,
                }),
            CalendarType::Lunar => {
                let date = self.provider.lunar_to_solar(
                    request.year,
                    request.month,
                    request.day,
                    request.is_leap_month,
                )?;
                debug!(
                    "Lunar {}-{}-{} (leap: {}) is solar {}",
                    request.year, request.month, request.day, request.is_leap_month, date
                );
                Ok(date)
            }
        }
    }

    fn shen_sha(&self, chart: &EightChar) -> ShenShaInfo {
        let mark = |position| self.provider.shen_sha(chart, position);
        ShenShaInfo {
            year: mark(PillarPosition::Year),
            month: mark(PillarPosition::Month),
            day: mark(PillarPosition::Day),
            hour: mark(PillarPosition::Hour),
        }
    }

    /// Calculate one chart
    pub fn calculate(&self, request: &BirthRequest) -> BaziResult<BaziChart> {
        let start = Instant::now();
        request.validate(self.config.min_request_year)?;

        let date = self.civil_date(request)?;
        let longitude = self.locator.longitude(&request.location);
        let at = true_solar_time(
            date,
            request.hour,
            request.minute,
            longitude,
            self.config.reference_longitude,
        );
        debug!(
            "{} {:02}:{:02} at {} (lng {}) → true solar {}",
            date, request.hour, request.minute, request.location, longitude, at
        );

        let eight_char = self.provider.eight_char(at)?;
        let pillars = eight_char.four_pillars();

        let four_pillars = build_pillars(&pillars, |p| eight_char.nayin(p));
        let day_master = analyze_day_master(&pillars);
        let five_elements = analyze_five_elements(&pillars, &day_master);
        let ten_gods = analyze_ten_gods(&pillars);
        let pattern = classify_pattern(&PatternContext {
            pillars: &pillars,
            day_master: &day_master,
            five_elements: &five_elements,
        });

        let raw_yun = self.provider.luck_cycles(at, request.gender)?;
        let yun = enrich_luck_cycles(&raw_yun, self.provider.as_ref(), &self.config);
        let shen_sha = self.shen_sha(&eight_char);

        info!(
            "Chart {} {} {} {}: {} {}, {} in {:?}",
            pillars.year,
            pillars.month,
            pillars.day,
            pillars.hour,
            day_master.gan,
            day_master.strength.chinese(),
            pattern.name,
            start.elapsed()
        );

        let day_xun_kong = eight_char.day_xun_kong();
        Ok(BaziChart {
            gender: request.gender,
            solar_date: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            lunar_date: eight_char.lunar_date.to_string(),
            true_solar_time: TrueSolarTime::from_datetime(at),
            four_pillars,
            four_pillars_shi_shen: ten_gods.position_map(),
            four_pillars_xun_kong: XunKongInfo {
                day_xun_kong: day_xun_kong.clone(),
            },
            day_master_characteristics: day_master_characteristics(day_master.gan),
            day_master,
            five_elements,
            ten_gods,
            pattern,
            yun,
            shen_sha,
            sheng_xiao: eight_char.sheng_xiao().to_string(),
            tai_yuan: eight_char.tai_yuan().to_string(),
            ming_gong: eight_char.ming_gong().to_string(),
            shen_gong: eight_char.shen_gong().to_string(),
            xun_kong: day_xun_kong,
        })
    }

    /// Calculate many charts in parallel; results keep the input order
    pub fn calculate_batch(&self, requests: &[BirthRequest]) -> Vec<BaziResult<BaziChart>> {
        let start = Instant::now();
        let results: Vec<BaziResult<BaziChart>> =
            requests.par_iter().map(|r| self.calculate(r)).collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!("{} of {} charts failed", failed, requests.len());
        }
        info!("Batch of {} charts in {:?}", requests.len(), start.elapsed());
        results
    }
}
