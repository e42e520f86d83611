//! Built-in Shen-Sha (神煞) Markers
//!
//! A small, commonly used subset. Stem-keyed markers look up the day
//! master; trine-keyed markers look up the year and day branches. Each
//! pillar is marked when its branch matches.

use crate::calendar::eight_char::EightChar;
use crate::model::{Branch, PillarPosition, Stem};

/// 天乙贵人 branches for a day master
fn tian_yi(stem: Stem) -> [Branch; 2] {
    match stem {
        Stem::Jia | Stem::Wu => [Branch::Chou, Branch::Wei],
        Stem::Yi | Stem::Ji => [Branch::Zi, Branch::Shen],
        Stem::Bing | Stem::Ding => [Branch::Hai, Branch::You],
        Stem::Ren | Stem::Gui => [Branch::Mao, Branch::Si],
        Stem::Geng | Stem::Xin => [Branch::Yin, Branch::Wu],
    }
}

/// 文昌贵人 branch for a day master
fn wen_chang(stem: Stem) -> Branch {
    match stem {
        Stem::Jia => Branch::Si,
        Stem::Yi => Branch::Wu,
        Stem::Bing | Stem::Wu => Branch::Shen,
        Stem::Ding | Stem::Ji => Branch::You,
        Stem::Geng => Branch::Hai,
        Stem::Xin => Branch::Zi,
        Stem::Ren => Branch::Yin,
        Stem::Gui => Branch::Mao,
    }
}

/// (驿马, 桃花, 华盖) of the trine a branch belongs to
fn trine_markers(branch: Branch) -> (Branch, Branch, Branch) {
    match branch {
        Branch::Shen | Branch::Zi | Branch::Chen => (Branch::Yin, Branch::You, Branch::Chen),
        Branch::Yin | Branch::Wu | Branch::Xu => (Branch::Shen, Branch::Mao, Branch::Xu),
        Branch::Si | Branch::You | Branch::Chou => (Branch::Hai, Branch::Wu, Branch::Chou),
        Branch::Hai | Branch::Mao | Branch::Wei => (Branch::Si, Branch::Zi, Branch::Wei),
    }
}

/// Markers that fall on one pillar, in a fixed order without duplicates
pub fn shen_sha_for(chart: &EightChar, position: PillarPosition) -> Vec<String> {
    let target = chart.pillar(position).branch;
    let day_master = chart.day_master();
    let keys = [chart.year.branch, chart.day.branch];
    let trines = keys.map(trine_markers);

    let checks: [(&str, bool); 7] = [
        ("天乙贵人", tian_yi(day_master).contains(&target)),
        ("文昌贵人", wen_chang(day_master) == target),
        ("禄神", day_master.lu_branch() == target),
        ("羊刃", day_master.ren_branch() == target),
        ("驿马", trines.iter().any(|t| t.0 == target)),
        ("桃花", trines.iter().any(|t| t.1 == target)),
        ("华盖", trines.iter().any(|t| t.2 == target)),
    ];

    checks
        .iter()
        .filter(|(_, hit)| *hit)
        .map(|(name, _)| name.to_string())
        .collect()
}
