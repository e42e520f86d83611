//! Day Master Strength
//!
//! Three independent signals, summed:
//!
//! - 得令: the month element's relation to the day master (−20 … +40)
//! - 得地: roots and seals among all hidden stems (0 … 30)
//! - 天干帮扶: support or drain from the year, month and hour stems (−20 … 20)
//!
//! A total of at least 50 is strong, at most 25 is weak.

use crate::model::{FiveElement, FourPillars, Stem};
use serde::{Deserialize, Serialize};

pub const STRONG_THRESHOLD: f64 = 50.0;
pub const WEAK_THRESHOLD: f64 = 25.0;
pub const DE_DI_CAP: f64 = 30.0;
pub const TIAN_GAN_HELP_LIMIT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Balanced,
    Weak,
}

impl Strength {
    pub fn from_total(total: f64) -> Self {
        if total >= STRONG_THRESHOLD {
            Strength::Strong
        } else if total <= WEAK_THRESHOLD {
            Strength::Weak
        } else {
            Strength::Balanced
        }
    }

    pub fn chinese(self) -> &'static str {
        match self {
            Strength::Strong => "身强",
            Strength::Balanced => "中和",
            Strength::Weak => "身弱",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMasterAnalysis {
    pub de_ling: f64,
    pub de_ling_desc: String,
    pub de_di: f64,
    pub de_di_desc: String,
    pub tian_gan_help: f64,
    pub tian_gan_help_desc: String,
    pub total_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMaster {
    pub gan: Stem,
    pub strength: Strength,
    pub analysis: DayMasterAnalysis,
}

impl DayMaster {
    pub fn element(&self) -> FiveElement {
        self.gan.element()
    }

    pub fn total_score(&self) -> f64 {
        self.analysis.total_score
    }
}

/// 得令 score and label from the day and month elements
fn de_ling(day: FiveElement, month: FiveElement) -> (f64, &'static str) {
    if day == month {
        (40.0, "日主当令")
    } else if day.generated_by() == month {
        (30.0, "月令生扶")
    } else if day.generates() == month {
        (-10.0, "月令泄气")
    } else if month.restricts() == day {
        (-20.0, "月令克制")
    } else {
        (-5.0, "日主耗气")
    }
}

/// 得地 score (capped) and the roots found
fn de_di(pillars: &FourPillars, day: FiveElement) -> (f64, Vec<String>) {
    let mut score: f64 = 0.0;
    let mut roots = Vec::new();
    for (position, gz) in pillars.iter() {
        for (_, hidden, weight) in gz.branch.weighted_hidden_stems() {
            let element = hidden.element();
            if element == day {
                score += weight * 15.0;
                roots.push(format!("{}藏{}", position.branch_label(), hidden));
            } else if element == day.generated_by() {
                score += weight * 10.0;
                roots.push(format!("{}藏{}(印)", position.branch_label(), hidden));
            }
        }
    }
    (score.min(DE_DI_CAP), roots)
}

/// 天干帮扶 score (clamped) and the helpers found
fn tian_gan_help(pillars: &FourPillars, day: FiveElement) -> (f64, Vec<String>) {
    let mut score: f64 = 0.0;
    let mut helpers = Vec::new();
    for (position, stem) in pillars.non_day_stems() {
        let element = stem.element();
        let (delta, kind) = if element == day {
            (8.0, "比劫")
        } else if element == day.generated_by() {
            (6.0, "印星")
        } else if element.restricts() == day {
            (-5.0, "官杀")
        } else if day.generates() == element {
            (-3.0, "食伤")
        } else {
            continue;
        };
        score += delta;
        helpers.push(format!("{}{}{}", position.stem_label(), stem, kind));
    }
    (
        score.clamp(-TIAN_GAN_HELP_LIMIT, TIAN_GAN_HELP_LIMIT),
        helpers,
    )
}

fn join_or(items: Vec<String>, empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join("、")
    }
}

pub fn analyze_day_master(pillars: &FourPillars) -> DayMaster {
    let gan = pillars.day_master();
    let day = gan.element();
    let month = pillars.month_branch().element();

    let (ling, ling_desc) = de_ling(day, month);
    let (di, roots) = de_di(pillars, day);
    let (help, helpers) = tian_gan_help(pillars, day);
    let total = ling + di + help;

    DayMaster {
        gan,
        strength: Strength::from_total(total),
        analysis: DayMasterAnalysis {
            de_ling: ling,
            de_ling_desc: ling_desc.to_string(),
            de_di: di,
            de_di_desc: join_or(roots, "无根"),
            tian_gan_help: help,
            tian_gan_help_desc: join_or(helpers, "无帮扶"),
            total_score: total,
        },
    }
}

/// Fixed personality phrases for a day master
pub fn day_master_characteristics(stem: Stem) -> Vec<String> {
    let traits: [&str; 4] = match stem {
        Stem::Jia => ["积极进取", "有领导力", "刚直不阿", "富有创造力"],
        Stem::Yi => ["温和柔顺", "适应力强", "善于协调", "注重细节"],
        Stem::Bing => ["热情开朗", "光明磊落", "富有激情", "善于表达"],
        Stem::Ding => ["细腻敏感", "文雅有礼", "富有艺术气质", "善解人意"],
        Stem::Wu => ["稳重踏实", "诚实守信", "包容大度", "责任心强"],
        Stem::Ji => ["温和谦逊", "细心周到", "善于理财", "注重实际"],
        Stem::Geng => ["刚毅果断", "正直坦率", "意志坚定", "富有正义感"],
        Stem::Xin => ["细腻敏锐", "追求完美", "善于分析", "注重品质"],
        Stem::Ren => ["聪明灵活", "善于变通", "富有智慧", "适应力强"],
        Stem::Gui => ["温柔体贴", "富有想象力", "善于思考", "内敛含蓄"],
    };
    traits.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn analyze(pairs: [&str; 4]) -> DayMaster {
        analyze_day_master(&FourPillars::parse(pairs).unwrap())
    }

    #[test]
    fn test_mid_june_1990_chart() {
        let dm = analyze(["庚午", "壬午", "辛亥", "癸巳"]);
        let a = &dm.analysis;
        assert_eq!(dm.gan, Stem::Xin);
        assert_relative_eq!(a.de_ling, -20.0);
        assert_eq!(a.de_ling_desc, "月令克制");
        assert_relative_eq!(a.de_di, 11.0, epsilon = 1e-9);
        assert_eq!(a.de_di_desc, "年支藏己(印)、月支藏己(印)、时支藏庚、时支藏戊(印)");
        assert_relative_eq!(a.tian_gan_help, 2.0);
        assert_eq!(a.tian_gan_help_desc, "年干庚比劫、月干壬食伤、时干癸食伤");
        assert_relative_eq!(a.total_score, -7.0, epsilon = 1e-9);
        assert_eq!(dm.strength, Strength::Weak);
    }

    #[test]
    fn test_de_ling_branches() {
        use FiveElement::*;
        assert_eq!(de_ling(Wood, Wood), (40.0, "日主当令"));
        assert_eq!(de_ling(Wood, Water), (30.0, "月令生扶"));
        assert_eq!(de_ling(Wood, Fire), (-10.0, "月令泄气"));
        assert_eq!(de_ling(Wood, Metal), (-20.0, "月令克制"));
        assert_eq!(de_ling(Wood, Earth), (-5.0, "日主耗气"));
    }

    #[test]
    fn test_de_di_is_capped() {
        // 甲 with four 寅/卯 branches: well over 30 before the cap
        let dm = analyze(["甲寅", "丙寅", "甲寅", "丁卯"]);
        assert_relative_eq!(dm.analysis.de_di, DE_DI_CAP);
    }

    #[test]
    fn test_tian_gan_help_is_clamped_and_labelled() {
        let dm = analyze(["庚申", "庚申", "甲申", "庚午"]);
        // three 七杀 stems: −15, inside the clamp
        assert_relative_eq!(dm.analysis.tian_gan_help, -15.0);
        assert!(dm.analysis.tian_gan_help_desc.starts_with("年干庚官杀"));

        let dm = analyze(["甲子", "乙亥", "甲子", "壬子"]);
        // 比劫 + 比劫 + 印星 = 22, clamped to 20
        assert_relative_eq!(dm.analysis.tian_gan_help, 20.0);
    }

    #[test]
    fn test_tian_gan_help_ceiling() {
        // 甲 with 甲, 乙, 甲 stems: 8 + 8 + 8 = 24 before the clamp
        let pillars = FourPillars::parse(["甲子", "乙丑", "甲寅", "甲戌"]).unwrap();
        let (score, helpers) = tian_gan_help(&pillars, FiveElement::Wood);
        assert_relative_eq!(score, TIAN_GAN_HELP_LIMIT);
        assert_eq!(helpers, vec!["年干甲比劫", "月干乙比劫", "时干甲比劫"]);

        // 庚 with three 甲 stems: wealth is neither help nor drain
        let (score, helpers) = tian_gan_help(&pillars, FiveElement::Metal);
        assert_relative_eq!(score, 0.0);
        assert!(helpers.is_empty());
    }

    #[test]
    fn test_empty_descriptions() {
        // 丙 day master among metal and water: no roots, no helpers except drains
        let dm = analyze(["庚申", "庚申", "丙申", "庚申"]);
        assert_eq!(dm.analysis.de_di_desc, "无根");
        assert_relative_eq!(dm.analysis.de_di, 0.0);
        // 庚 is wealth to 丙: neither help nor drain
        assert_eq!(dm.analysis.tian_gan_help_desc, "无帮扶");
    }

    #[test]
    fn test_strength_boundaries_are_inclusive() {
        assert_eq!(Strength::from_total(50.0), Strength::Strong);
        assert_eq!(Strength::from_total(49.9), Strength::Balanced);
        assert_eq!(Strength::from_total(25.0), Strength::Weak);
        assert_eq!(Strength::from_total(25.1), Strength::Balanced);
    }

    #[test]
    fn test_characteristics() {
        assert_eq!(
            day_master_characteristics(Stem::Xin),
            vec!["细腻敏锐", "追求完美", "善于分析", "注重品质"]
        );
        for stem in Stem::ALL {
            assert_eq!(day_master_characteristics(stem).len(), 4);
        }
    }
}
