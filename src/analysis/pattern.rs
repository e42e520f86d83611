//! Pattern (格局) Classification
//!
//! An ordered cascade; the first rule that fires decides the pattern:
//!
//! 1. 建禄格: month branch is the day master's 禄
//! 2. 羊刃格: month branch is the day master's 刃
//! 3. 从格: total score below 20 and a dominant element the day master
//!    yields to
//! 4. 专旺格: total score above 75, named by the day master's element
//! 5. 正格: first month hidden stem that is not a companion
//!
//! When nothing fires the chart is 杂格.

use crate::analysis::day_master::DayMaster;
use crate::analysis::five_elements::FiveElementsAnalysis;
use crate::analysis::ten_gods::{ten_god, TenGod};
use crate::model::{FiveElement, FourPillars, Stem};
use serde::{Deserialize, Serialize};

pub const CONG_GE_THRESHOLD: f64 = 20.0;
pub const ZHUAN_WANG_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    Normal,
    Special,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInfo {
    pub name: String,
    pub category: PatternCategory,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub month_stem: Option<Stem>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub month_stem_ten_god: Option<TenGod>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_transparent: Option<bool>,
}

impl PatternInfo {
    fn new(name: &str, category: PatternCategory, description: &str) -> Self {
        Self {
            name: name.to_string(),
            category,
            description: description.to_string(),
            month_stem: None,
            month_stem_ten_god: None,
            is_transparent: None,
        }
    }
}

/// Everything a rule may look at
pub struct PatternContext<'a> {
    pub pillars: &'a FourPillars,
    pub day_master: &'a DayMaster,
    pub five_elements: &'a FiveElementsAnalysis,
}

type Rule = fn(&PatternContext) -> Option<PatternInfo>;

/// Rules in precedence order
const CASCADE: [(&str, Rule); 5] = [
    ("建禄格", jian_lu),
    ("羊刃格", yang_ren),
    ("从格", cong_ge),
    ("专旺格", zhuan_wang),
    ("正格", zheng_ge),
];

/// 建禄格 and 羊刃格 report the month 本气 as the month stem
fn month_root_pattern(ctx: &PatternContext, name: &str, description: &str) -> PatternInfo {
    PatternInfo {
        month_stem: ctx.pillars.month_branch().hidden_stems().first().copied(),
        is_transparent: Some(false),
        ..PatternInfo::new(name, PatternCategory::Normal, description)
    }
}

fn jian_lu(ctx: &PatternContext) -> Option<PatternInfo> {
    (ctx.pillars.month_branch() == ctx.pillars.day_master().lu_branch()).then(|| {
        month_root_pattern(ctx, "建禄格", "月支为日主之禄，主身旺有根，宜见财官食伤")
    })
}

fn yang_ren(ctx: &PatternContext) -> Option<PatternInfo> {
    (ctx.pillars.month_branch() == ctx.pillars.day_master().ren_branch()).then(|| {
        month_root_pattern(ctx, "羊刃格", "月支为日主之刃，主身强刚烈，宜见官杀制刃")
    })
}

/// Strongest element other than the day master's, if any is positive
fn dominant_other_element(ctx: &PatternContext) -> Option<FiveElement> {
    let me = ctx.day_master.element();
    let mut best: Option<(FiveElement, f64)> = None;
    for (element, value) in ctx.five_elements.distribution.iter() {
        let floor = best.map_or(0.0, |(_, v)| v);
        if element != me && value > floor {
            best = Some((element, value));
        }
    }
    best.map(|(e, _)| e)
}

fn cong_ge(ctx: &PatternContext) -> Option<PatternInfo> {
    if ctx.day_master.total_score() >= CONG_GE_THRESHOLD {
        return None;
    }
    let me = ctx.day_master.element();
    let dominant = dominant_other_element(ctx)?;
    let (name, description) = if me.restricts() == dominant {
        ("从财格", "日主极弱而财星极旺，弃命从财，宜顺从财势")
    } else if dominant.restricts() == me {
        ("从官格", "日主极弱而官杀极旺，弃命从官，宜顺从官势")
    } else if me.generates() == dominant {
        ("从儿格", "日主极弱而食伤极旺，弃命从儿，宜顺从食伤之势")
    } else {
        return None;
    };
    Some(PatternInfo::new(name, PatternCategory::Special, description))
}

fn zhuan_wang(ctx: &PatternContext) -> Option<PatternInfo> {
    if ctx.day_master.total_score() <= ZHUAN_WANG_THRESHOLD {
        return None;
    }
    let (name, description) = match ctx.day_master.element() {
        FiveElement::Wood => ("曲直格", "木气专旺成局，主仁慈正直，宜水木运"),
        FiveElement::Fire => ("炎上格", "火气炎上成局，主热情礼仪，宜木火运"),
        FiveElement::Earth => ("稼穑格", "土气稼穑成局，主忠厚信实，宜火土运"),
        FiveElement::Metal => ("从革格", "金气从革成局，主刚毅果决，宜土金运"),
        FiveElement::Water => ("润下格", "水气润下成局，主聪慧灵活，宜金水运"),
    };
    Some(PatternInfo::new(name, PatternCategory::Special, description))
}

fn zheng_ge_text(god: TenGod) -> Option<(&'static str, &'static str)> {
    match god {
        TenGod::ZhengGuan => Some(("正官格", "月令透正官，主贵气端正，宜见财印相生")),
        TenGod::QiSha => Some(("七杀格", "月令透七杀，主威严果决，宜见食伤制杀或印化杀")),
        TenGod::ZhengCai => Some(("正财格", "月令透正财，主务实勤俭，宜见官杀护财")),
        TenGod::PianCai => Some(("偏财格", "月令透偏财，主豪爽大方，宜见官杀护财")),
        TenGod::ZhengYin => Some(("正印格", "月令透正印，主聪慧仁厚，宜见官杀生印")),
        TenGod::PianYin => Some(("偏印格", "月令透偏印，主机敏多思，宜见财星制印")),
        TenGod::ShiShen => Some(("食神格", "月令透食神，主温和福厚，宜见财星泄秀")),
        TenGod::ShangGuan => Some(("伤官格", "月令透伤官，主聪明傲气，宜见财星或印星")),
        _ => None,
    }
}

fn zheng_ge(ctx: &PatternContext) -> Option<PatternInfo> {
    let day_master = ctx.pillars.day_master();
    ctx.pillars
        .month_branch()
        .hidden_stems()
        .iter()
        .find_map(|&hidden| {
            let god = ten_god(day_master, hidden);
            if god.is_companion() {
                return None;
            }
            let (name, description) = zheng_ge_text(god)?;
            let transparent = ctx.pillars.non_day_stems().any(|(_, s)| s == hidden);
            Some(PatternInfo {
                month_stem: Some(hidden),
                month_stem_ten_god: Some(god),
                is_transparent: Some(transparent),
                ..PatternInfo::new(name, PatternCategory::Normal, description)
            })
        })
}

fn za_ge() -> PatternInfo {
    PatternInfo::new(
        "杂格",
        PatternCategory::Normal,
        "月令无明显成格条件，需综合分析八字整体格局",
    )
}

pub fn classify_pattern(ctx: &PatternContext) -> PatternInfo {
    for (label, rule) in CASCADE.iter() {
        if let Some(pattern) = rule(ctx) {
            tracing::debug!(rule = *label, pattern = %pattern.name, "pattern rule fired");
            return pattern;
        }
    }
    za_ge()
}
