//! Heavenly Stems, Earthly Branches and the Sexagenary Cycle
//!
//! Static lookup tables for the ten stems (天干), twelve branches (地支) with
//! their hidden stems (藏干) and weights, and the sixty-pair cycle (六十甲子)
//! with its nayin (纳音) names.

use crate::error::BaziError;
use crate::model::element::{FiveElement, YinYang};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Heavenly stems
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

const STEM_NAMES: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Wraps modulo 10
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 10]
    }

    pub fn chinese(self) -> &'static str {
        STEM_NAMES[self.index()]
    }

    pub fn from_chinese(name: &str) -> Option<Self> {
        let name = name.trim();
        STEM_NAMES.iter().position(|&n| n == name).map(Self::from_index)
    }

    pub fn element(self) -> FiveElement {
        match self {
            Stem::Jia | Stem::Yi => FiveElement::Wood,
            Stem::Bing | Stem::Ding => FiveElement::Fire,
            Stem::Wu | Stem::Ji => FiveElement::Earth,
            Stem::Geng | Stem::Xin => FiveElement::Metal,
            Stem::Ren | Stem::Gui => FiveElement::Water,
        }
    }

    /// Odd positions (甲丙戊庚壬) are yang
    pub fn yin_yang(self) -> YinYang {
        if self.index() % 2 == 0 {
            YinYang::Yang
        } else {
            YinYang::Yin
        }
    }

    pub fn is_yang(self) -> bool {
        self.yin_yang() == YinYang::Yang
    }

    /// 禄: the branch where this stem is at its prime
    pub fn lu_branch(self) -> Branch {
        match self {
            Stem::Jia => Branch::Yin,
            Stem::Yi => Branch::Mao,
            Stem::Bing | Stem::Wu => Branch::Si,
            Stem::Ding | Stem::Ji => Branch::Wu,
            Stem::Geng => Branch::Shen,
            Stem::Xin => Branch::You,
            Stem::Ren => Branch::Hai,
            Stem::Gui => Branch::Zi,
        }
    }

    /// 羊刃: the branch one step past the prime (yin stems step back)
    pub fn ren_branch(self) -> Branch {
        match self {
            Stem::Jia => Branch::Mao,
            Stem::Yi => Branch::Yin,
            Stem::Bing | Stem::Wu => Branch::Wu,
            Stem::Ding | Stem::Ji => Branch::Si,
            Stem::Geng => Branch::You,
            Stem::Xin => Branch::Shen,
            Stem::Ren => Branch::Zi,
            Stem::Gui => Branch::Hai,
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.chinese())
    }
}

impl FromStr for Stem {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stem::from_chinese(s).ok_or_else(|| BaziError::UnknownStem(s.to_string()))
    }
}

// ============================================================================
// Earthly branches
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

const BRANCH_NAMES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

const ZODIAC_NAMES: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
];

/// Hidden stems per branch, 本气 first
static HIDDEN_STEMS: [&[Stem]; 12] = [
    &[Stem::Gui],                      // 子
    &[Stem::Ji, Stem::Gui, Stem::Xin], // 丑
    &[Stem::Jia, Stem::Bing, Stem::Wu], // 寅
    &[Stem::Yi],                       // 卯
    &[Stem::Wu, Stem::Yi, Stem::Gui],  // 辰
    &[Stem::Bing, Stem::Geng, Stem::Wu], // 巳
    &[Stem::Ding, Stem::Ji],           // 午
    &[Stem::Ji, Stem::Ding, Stem::Yi], // 未
    &[Stem::Geng, Stem::Ren, Stem::Wu], // 申
    &[Stem::Xin],                      // 酉
    &[Stem::Wu, Stem::Xin, Stem::Ding], // 戌
    &[Stem::Ren, Stem::Jia],           // 亥
];

/// Hidden stem weights, parallel to `HIDDEN_STEMS`. Each row sums to 1.0.
static HIDDEN_STEM_WEIGHTS: [&[f64]; 12] = [
    &[1.0],
    &[0.6, 0.2, 0.2],
    &[0.6, 0.2, 0.2],
    &[1.0],
    &[0.6, 0.2, 0.2],
    &[0.6, 0.2, 0.2],
    &[0.7, 0.3],
    &[0.6, 0.2, 0.2],
    &[0.6, 0.2, 0.2],
    &[1.0],
    &[0.6, 0.2, 0.2],
    &[0.7, 0.3],
];

/// Weight used when a hidden stem has no explicit weight entry
pub const DEFAULT_HIDDEN_WEIGHT: f64 = 0.2;

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Wraps modulo 12
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn chinese(self) -> &'static str {
        BRANCH_NAMES[self.index()]
    }

    pub fn from_chinese(name: &str) -> Option<Self> {
        let name = name.trim();
        BRANCH_NAMES.iter().position(|&n| n == name).map(Self::from_index)
    }

    /// Dominant element, also used as the month element when this branch
    /// rules the month
    pub fn element(self) -> FiveElement {
        match self {
            Branch::Yin | Branch::Mao => FiveElement::Wood,
            Branch::Si | Branch::Wu => FiveElement::Fire,
            Branch::Shen | Branch::You => FiveElement::Metal,
            Branch::Hai | Branch::Zi => FiveElement::Water,
            Branch::Chen | Branch::Wei | Branch::Xu | Branch::Chou => FiveElement::Earth,
        }
    }

    pub fn hidden_stems(self) -> &'static [Stem] {
        HIDDEN_STEMS[self.index()]
    }

    /// Weight of the `position`-th hidden stem
    pub fn hidden_weight(self, position: usize) -> f64 {
        HIDDEN_STEM_WEIGHTS[self.index()]
            .get(position)
            .copied()
            .unwrap_or(DEFAULT_HIDDEN_WEIGHT)
    }

    /// Hidden stems paired with their weights, 本气 first
    pub fn weighted_hidden_stems(self) -> impl Iterator<Item = (usize, Stem, f64)> {
        self.hidden_stems()
            .iter()
            .enumerate()
            .map(move |(i, &stem)| (i, stem, self.hidden_weight(i)))
    }

    pub fn zodiac(self) -> &'static str {
        ZODIAC_NAMES[self.index()]
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.chinese())
    }
}

impl FromStr for Branch {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::from_chinese(s).ok_or_else(|| BaziError::UnknownBranch(s.to_string()))
    }
}

// Stems and branches travel as their Chinese characters on the wire.

impl Serialize for Stem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.chinese())
    }
}

impl<'de> Deserialize<'de> for Stem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Branch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.chinese())
    }
}

impl<'de> Deserialize<'de> for Branch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Sexagenary cycle
// ============================================================================

/// Nayin names, one per consecutive pair of the sixty-cycle
static NAYIN: [&str; 30] = [
    "海中金", "炉中火", "大林木", "路旁土", "剑锋金", "山头火",
    "涧下水", "城头土", "白蜡金", "杨柳木", "泉中水", "屋上土",
    "霹雳火", "松柏木", "长流水", "沙中金", "山下火", "平地木",
    "壁上土", "金箔金", "覆灯火", "天河水", "大驿土", "钗钏金",
    "桑柘木", "大溪水", "沙中土", "天上火", "石榴木", "大海水",
];

/// A stem-branch pair (干支)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GanZhi {
    pub stem: Stem,
    pub branch: Branch,
}

impl GanZhi {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }

    /// Pair at position `index` of the sixty-cycle (甲子 = 0), wrapping
    pub fn from_index(index: usize) -> Self {
        let i = index % 60;
        Self {
            stem: Stem::from_index(i),
            branch: Branch::from_index(i),
        }
    }

    /// Position in the sixty-cycle. Stems and branches of a valid pair share
    /// parity, so the index solves i ≡ stem (mod 10), i ≡ branch (mod 12).
    pub fn index(self) -> usize {
        let s = self.stem.index() as i64;
        let b = self.branch.index() as i64;
        (6 * s - 5 * b).rem_euclid(60) as usize
    }

    /// Step forward (positive) or backward (negative) around the cycle
    pub fn offset(self, steps: i64) -> Self {
        Self::from_index((self.index() as i64 + steps).rem_euclid(60) as usize)
    }

    pub fn nayin(self) -> &'static str {
        NAYIN[self.index() / 2]
    }

    /// The two branches left empty (空亡) by this pair's decade (旬)
    pub fn xun_kong(self) -> [Branch; 2] {
        let first = (self.branch.index() + 12 - self.stem.index() + 10) % 12;
        [Branch::from_index(first), Branch::from_index(first + 1)]
    }

    pub fn xun_kong_string(self) -> String {
        let [a, b] = self.xun_kong();
        format!("{}{}", a, b)
    }
}

impl fmt::Display for GanZhi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl FromStr for GanZhi {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let stem = chars
            .next()
            .map(|c| c.to_string())
            .ok_or_else(|| BaziError::UnknownStem(s.to_string()))?;
        let branch = chars
            .next()
            .map(|c| c.to_string())
            .ok_or_else(|| BaziError::UnknownBranch(s.to_string()))?;
        Ok(Self::new(stem.parse()?, branch.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stem_tables() {
        assert_eq!(Stem::Jia.element(), FiveElement::Wood);
        assert_eq!(Stem::Gui.element(), FiveElement::Water);
        assert_eq!(Stem::Jia.yin_yang(), YinYang::Yang);
        assert_eq!(Stem::Yi.yin_yang(), YinYang::Yin);
        assert_eq!(Stem::Ren.yin_yang(), YinYang::Yang);
        for stem in Stem::ALL {
            assert_eq!(Stem::from_chinese(stem.chinese()), Some(stem));
        }
        assert_eq!(Stem::from_chinese("子"), None);
    }

    #[test]
    fn test_hidden_weights_sum_to_one() {
        for branch in Branch::ALL {
            let total: f64 = branch.weighted_hidden_stems().map(|(_, _, w)| w).sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-9);
            assert!(!branch.hidden_stems().is_empty());
        }
    }

    #[test]
    fn test_hidden_stem_lookup() {
        assert_eq!(Branch::Wu.hidden_stems(), &[Stem::Ding, Stem::Ji]);
        assert_relative_eq!(Branch::Wu.hidden_weight(1), 0.3);
        assert_relative_eq!(Branch::Zi.hidden_weight(5), DEFAULT_HIDDEN_WEIGHT);
        assert_eq!(Branch::Chen.element(), FiveElement::Earth);
    }

    #[test]
    fn test_ganzhi_index_roundtrip_and_nayin() {
        for i in 0..60 {
            assert_eq!(GanZhi::from_index(i).index(), i);
        }
        let gz: GanZhi = "庚午".parse().unwrap();
        assert_eq!(gz.index(), 6);
        assert_eq!(gz.nayin(), "路旁土");
        assert_eq!(GanZhi::from_index(59).to_string(), "癸亥");
        assert_eq!(GanZhi::from_index(59).offset(1).to_string(), "甲子");
        assert_eq!(GanZhi::from_index(0).offset(-1).to_string(), "癸亥");
    }

    #[test]
    fn test_lu_and_ren_branches() {
        assert_eq!(Stem::Jia.lu_branch(), Branch::Yin);
        assert_eq!(Stem::Jia.ren_branch(), Branch::Mao);
        assert_eq!(Stem::Wu.lu_branch(), Branch::Si);
        assert_eq!(Stem::Gui.ren_branch(), Branch::Hai);
        for stem in Stem::ALL {
            assert_ne!(stem.lu_branch(), stem.ren_branch());
        }
    }

    #[test]
    fn test_xun_kong() {
        let gz: GanZhi = "甲子".parse().unwrap();
        assert_eq!(gz.xun_kong_string(), "戌亥");
        let gz: GanZhi = "辛亥".parse().unwrap();
        assert_eq!(gz.xun_kong_string(), "寅卯");
        let gz: GanZhi = "癸亥".parse().unwrap();
        assert_eq!(gz.xun_kong_string(), "子丑");
    }

    #[test]
    fn test_stem_serializes_as_chinese() {
        assert_eq!(serde_json::to_string(&Stem::Xin).unwrap(), "\"辛\"");
        let b: Branch = serde_json::from_str("\"亥\"").unwrap();
        assert_eq!(b, Branch::Hai);
    }
}
