//! Chart Summary
//!
//! A compact, all-string projection of a chart for prompts and quick display.
//! Element names are rendered in Chinese; lists are joined with "、".

use crate::analysis::PillarSet;
use crate::engine::BaziChart;
use crate::model::{FiveElement, PillarPosition};
use serde::{Deserialize, Serialize};

/// One string per pillar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarStrings {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
}

impl PillarStrings {
    fn from_fn(mut f: impl FnMut(PillarPosition) -> String) -> Self {
        Self {
            year: f(PillarPosition::Year),
            month: f(PillarPosition::Month),
            day: f(PillarPosition::Day),
            hour: f(PillarPosition::Hour),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FourPillarsSummary {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub na_yin: PillarStrings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMasterSummary {
    pub stem: String,
    pub element: String,
    pub strength: String,
    pub characteristics: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiveElementsSummary {
    pub distribution: String,
    pub strongest: String,
    pub weakest: String,
    pub favorable: String,
    pub unfavorable: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YunSummary {
    pub start_age: i32,
    pub forward: bool,
    pub current_da_yun: Option<String>,
    pub current_da_yun_age: Option<String>,
    pub adjacent_da_yun: Vec<String>,
    pub current_liu_nian: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSummary {
    pub four_pillars: FourPillarsSummary,
    pub hidden_stems: PillarStrings,
    pub day_master: DayMasterSummary,
    pub five_elements: FiveElementsSummary,
    /// One `positions：name` line per ten god
    pub ten_gods: String,
    pub yun: YunSummary,
    pub shen_sha: PillarStrings,
    pub sheng_xiao: String,
    pub lunar_date: String,
    pub tai_yuan: String,
    pub ming_gong: String,
    pub shen_gong: String,
    pub xun_kong: String,
}

fn join_elements(elements: &[FiveElement]) -> String {
    elements
        .iter()
        .map(|e| e.chinese())
        .collect::<Vec<_>>()
        .join("、")
}

fn four_pillars_summary(set: &PillarSet) -> FourPillarsSummary {
    let gz = |p| set.get(p).gan_zhi().to_string();
    FourPillarsSummary {
        year: gz(PillarPosition::Year),
        month: gz(PillarPosition::Month),
        day: gz(PillarPosition::Day),
        hour: gz(PillarPosition::Hour),
        na_yin: PillarStrings::from_fn(|p| set.get(p).na_yin.clone()),
    }
}

fn yun_summary(chart: &BaziChart, current_year: i32) -> YunSummary {
    let yun = &chart.yun;
    let age_span = |start: i32, end: i32| format!("{}-{}岁", start, end);

    let current = yun.current(current_year);
    let mut adjacent = Vec::new();
    if let Some((pos, _)) = current {
        let neighbours = [pos.checked_sub(1), Some(pos + 1)];
        for dy in neighbours.into_iter().flatten().filter_map(|i| yun.da_yun_list.get(i)) {
            adjacent.push(format!("{}({})", dy.gan_zhi, age_span(dy.start_age, dy.end_age)));
        }
    }

    YunSummary {
        start_age: yun.start_age,
        forward: yun.forward,
        current_da_yun: current.map(|(_, dy)| dy.gan_zhi.clone()),
        current_da_yun_age: current.map(|(_, dy)| age_span(dy.start_age, dy.end_age)),
        adjacent_da_yun: adjacent,
        current_liu_nian: current
            .and_then(|(_, dy)| dy.liu_nian_for(current_year))
            .map(|ln| format!("{}年 {}({}岁)", ln.year, ln.gan_zhi, ln.age)),
    }
}

impl ChartSummary {
    /// Condense a chart; `current_year` picks the current luck window
    pub fn from_chart(chart: &BaziChart, current_year: i32) -> Self {
        let fe = &chart.five_elements;
        let dist = &fe.distribution;
        let distribution = format!(
            "金{:.1} 木{:.1} 水{:.1} 火{:.1} 土{:.1}",
            dist.metal, dist.wood, dist.water, dist.fire, dist.earth
        );

        let ten_gods = chart
            .ten_gods
            .gods
            .values()
            .map(|info| format!("{}：{}", info.positions.join("、"), info.name))
            .collect::<Vec<_>>()
            .join("\n");

        ChartSummary {
            four_pillars: four_pillars_summary(&chart.four_pillars),
            hidden_stems: PillarStrings::from_fn(|p| chart.four_pillars.get(p).hidden_stems_text()),
            day_master: DayMasterSummary {
                stem: chart.day_master.gan.to_string(),
                element: chart.day_master.element().chinese().to_string(),
                strength: chart.day_master.strength.chinese().to_string(),
                characteristics: chart.day_master_characteristics.join("、"),
            },
            five_elements: FiveElementsSummary {
                distribution,
                strongest: fe.strongest.chinese().to_string(),
                weakest: fe.weakest.chinese().to_string(),
                favorable: join_elements(&fe.favorable),
                unfavorable: join_elements(&fe.unfavorable),
            },
            ten_gods,
            yun: yun_summary(chart, current_year),
            shen_sha: PillarStrings::from_fn(|p| chart.shen_sha.get(p).join("、")),
            sheng_xiao: chart.sheng_xiao.clone(),
            lunar_date: chart.lunar_date.clone(),
            tai_yuan: chart.tai_yuan.clone(),
            ming_gong: chart.ming_gong.clone(),
            shen_gong: chart.shen_gong.clone(),
            xun_kong: chart.xun_kong.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::AstronomicalCalendar;
    use crate::config::EngineConfig;
    use crate::engine::BaziEngine;
    use crate::geo::GeoLocator;
    use crate::model::Gender;
    use crate::request::BirthRequest;
    use std::sync::Arc;

    fn make_test_chart() -> BaziChart {
        let engine = BaziEngine::from_parts(
            EngineConfig::default(),
            GeoLocator::from_items(Vec::new()),
            Arc::new(AstronomicalCalendar::new()),
        );
        let req = BirthRequest::solar(1990, 6, 15, 10, 30, Gender::Male, "北京市");
        engine.calculate(&req).unwrap()
    }

    #[test]
    fn test_pillars_and_day_master() {
        let s = ChartSummary::from_chart(&make_test_chart(), 2026);
        assert_eq!(s.four_pillars.year, "庚午");
        assert_eq!(s.four_pillars.na_yin.year, "路旁土");
        assert_eq!(s.hidden_stems.hour, "丙、庚、戊");
        assert_eq!(s.day_master.stem, "辛");
        assert_eq!(s.day_master.element, "金");
        assert_eq!(s.day_master.strength, "身弱");
        assert_eq!(s.day_master.characteristics, "细腻敏锐、追求完美、善于分析、注重品质");
    }

    #[test]
    fn test_five_elements_text() {
        let s = ChartSummary::from_chart(&make_test_chart(), 2026);
        assert_eq!(s.five_elements.distribution, "金1.1 木0.3 水1.9 火3.0 土1.0");
        assert_eq!(s.five_elements.strongest, "火");
        assert_eq!(s.five_elements.favorable, "土、金");
    }

    #[test]
    fn test_ten_gods_lines() {
        let s = ChartSummary::from_chart(&make_test_chart(), 2026);
        assert_eq!(s.ten_gods, "年干：劫财\n时干：食神\n月干：伤官");
    }

    #[test]
    fn test_current_luck_window() {
        let s = ChartSummary::from_chart(&make_test_chart(), 2026);
        // windows: 1997-2006 癸未, 2007-2016 甲申, 2017-2026 乙酉, 2027-2036 丙戌
        assert_eq!(s.yun.current_da_yun.as_deref(), Some("乙酉"));
        assert_eq!(s.yun.current_da_yun_age.as_deref(), Some("28-37岁"));
        assert_eq!(s.yun.adjacent_da_yun, vec!["甲申(18-27岁)", "丙戌(38-47岁)"]);
        assert_eq!(s.yun.current_liu_nian.as_deref(), Some("2026年 丙午(37岁)"));

        let s = ChartSummary::from_chart(&make_test_chart(), 2300);
        assert!(s.yun.current_da_yun.is_none());
        assert!(s.yun.adjacent_da_yun.is_empty());
    }
}
