//! Pillar Builder
//!
//! Annotates a raw stem-branch pair with elements, polarity, hidden stems and
//! ten-god relations to the day master.

use crate::analysis::ten_gods::{ten_god, TenGod};
use crate::model::{Branch, FiveElement, FourPillars, GanZhi, PillarPosition, Stem, YinYang};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeavenlyStemInfo {
    pub chinese: Stem,
    pub element: FiveElement,
    pub yin_yang: YinYang,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthlyBranchInfo {
    pub chinese: Branch,
    pub element: FiveElement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenStemInfo {
    pub chinese: Stem,
    pub element: FiveElement,
    pub yin_yang: YinYang,
    pub ten_god: TenGod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pillar {
    pub heavenly_stem: HeavenlyStemInfo,
    pub earthly_branch: EarthlyBranchInfo,
    pub na_yin: String,
    pub hidden_stems: Vec<HiddenStemInfo>,
    /// Absent on the day pillar, whose stem is the day master itself
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ten_god: Option<TenGod>,
}

impl Pillar {
    pub fn gan_zhi(&self) -> GanZhi {
        GanZhi::new(self.heavenly_stem.chinese, self.earthly_branch.chinese)
    }

    /// Hidden stem characters joined by "、"
    pub fn hidden_stems_text(&self) -> String {
        self.hidden_stems
            .iter()
            .map(|h| h.chinese.chinese())
            .collect::<Vec<_>>()
            .join("、")
    }
}

/// Build one annotated pillar
///
/// # Arguments
/// * `gan_zhi` - the pillar's stem and branch
/// * `na_yin` - nayin name supplied by the calendar provider
/// * `day_master` - day stem of the chart
/// * `position` - which pillar this is; the day pillar gets no ten god
pub fn build_pillar(
    gan_zhi: GanZhi,
    na_yin: &str,
    day_master: Stem,
    position: PillarPosition,
) -> Pillar {
    let stem = gan_zhi.stem;
    let branch = gan_zhi.branch;
    let hidden_stems = branch
        .hidden_stems()
        .iter()
        .map(|&hidden| HiddenStemInfo {
            chinese: hidden,
            element: hidden.element(),
            yin_yang: hidden.yin_yang(),
            ten_god: ten_god(day_master, hidden),
        })
        .collect();

    Pillar {
        heavenly_stem: HeavenlyStemInfo {
            chinese: stem,
            element: stem.element(),
            yin_yang: stem.yin_yang(),
        },
        earthly_branch: EarthlyBranchInfo {
            chinese: branch,
            element: branch.element(),
        },
        na_yin: na_yin.to_string(),
        hidden_stems,
        ten_god: (position != PillarPosition::Day).then(|| ten_god(day_master, stem)),
    }
}

/// The four annotated pillars of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarSet {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl PillarSet {
    pub fn get(&self, position: PillarPosition) -> &Pillar {
        match position {
            PillarPosition::Year => &self.year,
            PillarPosition::Month => &self.month,
            PillarPosition::Day => &self.day,
            PillarPosition::Hour => &self.hour,
        }
    }
}

/// Build all four pillars with nayin names from `nayin`
pub fn build_pillars<'a>(
    pillars: &FourPillars,
    nayin: impl Fn(PillarPosition) -> &'a str,
) -> PillarSet {
    let day_master = pillars.day_master();
    let build = |position: PillarPosition| {
        build_pillar(pillars.get(position), nayin(position), day_master, position)
    };
    PillarSet {
        year: build(PillarPosition::Year),
        month: build(PillarPosition::Month),
        day: build(PillarPosition::Day),
        hour: build(PillarPosition::Hour),
    }
}
