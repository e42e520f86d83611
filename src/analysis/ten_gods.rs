//! Ten Gods (十神)
//!
//! Relation of any stem to the day master, from element relation and
//! polarity. Same polarity takes the first name of each pair:
//!
//! | relation               | same polarity | different |
//! |------------------------|---------------|-----------|
//! | same element           | 比肩          | 劫财      |
//! | day master generates   | 食神          | 伤官      |
//! | day master restricts   | 偏财          | 正财      |
//! | restricts day master   | 七杀          | 正官      |
//! | generates day master   | 偏印          | 正印      |

use crate::model::{FourPillars, PillarPosition, Stem};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TenGod {
    BiJian,
    JieCai,
    ShiShen,
    ShangGuan,
    PianCai,
    ZhengCai,
    QiSha,
    ZhengGuan,
    PianYin,
    ZhengYin,
}

impl TenGod {
    pub const ALL: [TenGod; 10] = [
        TenGod::BiJian,
        TenGod::JieCai,
        TenGod::ShiShen,
        TenGod::ShangGuan,
        TenGod::PianCai,
        TenGod::ZhengCai,
        TenGod::QiSha,
        TenGod::ZhengGuan,
        TenGod::PianYin,
        TenGod::ZhengYin,
    ];

    pub fn chinese(self) -> &'static str {
        match self {
            TenGod::BiJian => "比肩",
            TenGod::JieCai => "劫财",
            TenGod::ShiShen => "食神",
            TenGod::ShangGuan => "伤官",
            TenGod::PianCai => "偏财",
            TenGod::ZhengCai => "正财",
            TenGod::QiSha => "七杀",
            TenGod::ZhengGuan => "正官",
            TenGod::PianYin => "偏印",
            TenGod::ZhengYin => "正印",
        }
    }

    pub fn from_chinese(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.chinese() == name.trim())
    }

    /// 比肩 or 劫财
    pub fn is_companion(self) -> bool {
        matches!(self, TenGod::BiJian | TenGod::JieCai)
    }
}

impl fmt::Display for TenGod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.chinese())
    }
}

impl Serialize for TenGod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.chinese())
    }
}

impl<'de> Deserialize<'de> for TenGod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        TenGod::from_chinese(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown ten god: {}", name)))
    }
}

/// Relation of `other` to `day_master`
pub fn ten_god(day_master: Stem, other: Stem) -> TenGod {
    if day_master == other {
        return TenGod::BiJian;
    }
    let me = day_master.element();
    let it = other.element();
    let same_polarity = day_master.yin_yang() == other.yin_yang();
    let pick = |same: TenGod, different: TenGod| if same_polarity { same } else { different };

    if me == it {
        pick(TenGod::BiJian, TenGod::JieCai)
    } else if me.generates() == it {
        pick(TenGod::ShiShen, TenGod::ShangGuan)
    } else if me.restricts() == it {
        pick(TenGod::PianCai, TenGod::ZhengCai)
    } else if it.restricts() == me {
        pick(TenGod::QiSha, TenGod::ZhengGuan)
    } else {
        pick(TenGod::PianYin, TenGod::ZhengYin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenGodInfo {
    pub name: TenGod,
    pub count: usize,
    pub positions: Vec<String>,
}

/// Ten gods of the year, month and hour stems, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenGodsAnalysis {
    pub gods: BTreeMap<TenGod, TenGodInfo>,
}

impl TenGodsAnalysis {
    /// Stem position key (yearGan, monthGan, hourGan) → ten-god name
    pub fn position_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for info in self.gods.values() {
            for label in &info.positions {
                let key = PillarPosition::NON_DAY
                    .into_iter()
                    .find(|p| p.stem_label() == label.as_str())
                    .map_or(label.as_str(), |p| p.gan_key());
                map.insert(key.to_string(), info.name.chinese().to_string());
            }
        }
        map
    }
}

pub fn analyze_ten_gods(pillars: &FourPillars) -> TenGodsAnalysis {
    let day_master = pillars.day_master();
    let mut gods: BTreeMap<TenGod, TenGodInfo> = BTreeMap::new();
    for (position, stem) in pillars.non_day_stems() {
        let god = ten_god(day_master, stem);
        let info = gods.entry(god).or_insert_with(|| TenGodInfo {
            name: god,
            count: 0,
            positions: Vec::new(),
        });
        info.count += 1;
        info.positions.push(position.stem_label().to_string());
    }
    TenGodsAnalysis { gods }
}
