//! Pillar positions and gender

use serde::{Deserialize, Serialize};

/// One of the four pillars of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarPosition {
    pub const ALL: [PillarPosition; 4] = [
        PillarPosition::Year,
        PillarPosition::Month,
        PillarPosition::Day,
        PillarPosition::Hour,
    ];

    /// The three stems compared against the day master
    pub const NON_DAY: [PillarPosition; 3] = [
        PillarPosition::Year,
        PillarPosition::Month,
        PillarPosition::Hour,
    ];

    /// Position label of the pillar's stem (年干, 月干, ...)
    pub fn stem_label(self) -> &'static str {
        match self {
            PillarPosition::Year => "年干",
            PillarPosition::Month => "月干",
            PillarPosition::Day => "日干",
            PillarPosition::Hour => "时干",
        }
    }

    /// Position label of the pillar's branch (年支, 月支, ...)
    pub fn branch_label(self) -> &'static str {
        match self {
            PillarPosition::Year => "年支",
            PillarPosition::Month => "月支",
            PillarPosition::Day => "日支",
            PillarPosition::Hour => "时支",
        }
    }

    /// camelCase key used for the stem in position maps (yearGan, ...)
    pub fn gan_key(self) -> &'static str {
        match self {
            PillarPosition::Year => "yearGan",
            PillarPosition::Month => "monthGan",
            PillarPosition::Day => "dayGan",
            PillarPosition::Hour => "hourGan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(PillarPosition::Hour.stem_label(), "时干");
        assert_eq!(PillarPosition::Month.branch_label(), "月支");
        assert!(!PillarPosition::NON_DAY.contains(&PillarPosition::Day));
    }

    #[test]
    fn test_gan_keys_follow_stem_labels() {
        assert_eq!(PillarPosition::Year.gan_key(), "yearGan");
        assert_eq!(PillarPosition::Hour.gan_key(), "hourGan");
    }

    #[test]
    fn test_gender_serde() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"male\"");
        assert_eq!(serde_json::from_str::<Gender>("\"female\"").unwrap(), Gender::Female);
        assert!(serde_json::from_str::<Gender>("\"other\"").is_err());
    }
}
