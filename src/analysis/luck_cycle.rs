//! Luck Cycle Enrichment
//!
//! Turns the provider's raw decade windows into output records and attaches
//! the annual pillars (流年) of every year a window covers. Years outside the
//! configured annual-pillar range are skipped.

use crate::calendar::{CalendarProvider, RawDaYun, RawYun};
use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiuNian {
    pub year: i32,
    pub age: i32,
    pub gan_zhi: String,
    pub gan: String,
    pub zhi: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaYun {
    pub index: usize,
    pub start_age: i32,
    pub end_age: i32,
    /// Empty for the childhood window
    pub gan_zhi: String,
    pub gan: String,
    pub zhi: String,
    pub start_year: i32,
    pub end_year: i32,
    pub liu_nian: Vec<LiuNian>,
}

impl DaYun {
    pub fn contains_year(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }

    pub fn liu_nian_for(&self, year: i32) -> Option<&LiuNian> {
        self.liu_nian.iter().find(|ln| ln.year == year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YunInfo {
    pub start_age: i32,
    pub forward: bool,
    pub da_yun_list: Vec<DaYun>,
}

impl YunInfo {
    /// Window covering `year`, with its position in the list
    pub fn current(&self, year: i32) -> Option<(usize, &DaYun)> {
        self.da_yun_list
            .iter()
            .enumerate()
            .find(|(_, dy)| dy.contains_year(year))
    }
}

/// Annual pillars for every in-range year of one window
fn liu_nian_for_window(
    window: &RawDaYun,
    provider: &dyn CalendarProvider,
    config: &EngineConfig,
) -> Vec<LiuNian> {
    let mut years = Vec::new();
    for year in window.start_year..=window.end_year {
        if year < config.liu_nian_min_year || year > config.liu_nian_max_year {
            debug!(year, "skipping annual pillar outside supported range");
            continue;
        }

        let Some(sample) = chrono::NaiveDate::from_ymd_opt(
            year,
            config.liu_nian_sample_month,
            config.liu_nian_sample_day,
        ) else {
            warn!(year, "annual pillar sample day does not exist");
            continue;
        };

        match provider.year_pillar(sample) {
            Ok(gz) => years.push(LiuNian {
                year,
                age: window.start_age + (year - window.start_year),
                gan_zhi: gz.to_string(),
                gan: gz.stem.to_string(),
                zhi: gz.branch.to_string(),
            }),
            Err(e) => warn!(year, error = %e, "annual pillar lookup failed"),
        }
    }
    years
}

fn enrich_window(window: &RawDaYun, provider: &dyn CalendarProvider, config: &EngineConfig) -> DaYun {
    let (gan_zhi, gan, zhi) = match window.gan_zhi {
        Some(gz) => (gz.to_string(), gz.stem.to_string(), gz.branch.to_string()),
        None => (String::new(), String::new(), String::new()),
    };
    DaYun {
        index: window.index,
        start_age: window.start_age,
        end_age: window.end_age,
        gan_zhi,
        gan,
        zhi,
        start_year: window.start_year,
        end_year: window.end_year,
        liu_nian: liu_nian_for_window(window, provider, config),
    }
}

/// Attach annual pillars to raw luck cycles
///
/// # Arguments
/// * `raw` - direction and decade windows from the calendar provider
/// * `provider` - source of annual pillars
/// * `config` - annual-pillar year range and sample day
pub fn enrich_luck_cycles(
    raw: &RawYun,
    provider: &dyn CalendarProvider,
    config: &EngineConfig,
) -> YunInfo {
    let da_yun_list: Vec<DaYun> = raw
        .da_yun
        .iter()
        .map(|w| enrich_window(w, provider, config))
        .collect();

    YunInfo {
        start_age: da_yun_list.first().map_or(0, |dy| dy.start_age),
        forward: raw.forward,
        da_yun_list,
    }
}
