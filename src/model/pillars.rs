//! The four stem-branch pairs of a chart

use crate::error::BaziResult;
use crate::model::position::PillarPosition;
use crate::model::stem_branch::{Branch, GanZhi, Stem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourPillars {
    pub year: GanZhi,
    pub month: GanZhi,
    pub day: GanZhi,
    pub hour: GanZhi,
}

impl FourPillars {
    pub fn new(year: GanZhi, month: GanZhi, day: GanZhi, hour: GanZhi) -> Self {
        Self {
            year,
            month,
            day,
            hour,
        }
    }

    /// Parse from four two-character pairs, year first
    pub fn parse(pairs: [&str; 4]) -> BaziResult<Self> {
        Ok(Self::new(
            pairs[0].parse()?,
            pairs[1].parse()?,
            pairs[2].parse()?,
            pairs[3].parse()?,
        ))
    }

    pub fn get(&self, position: PillarPosition) -> GanZhi {
        match position {
            PillarPosition::Year => self.year,
            PillarPosition::Month => self.month,
            PillarPosition::Day => self.day,
            PillarPosition::Hour => self.hour,
        }
    }

    pub fn day_master(&self) -> Stem {
        self.day.stem
    }

    pub fn month_branch(&self) -> Branch {
        self.month.branch
    }

    /// Pillars with their positions, year first
    pub fn iter(&self) -> impl Iterator<Item = (PillarPosition, GanZhi)> + '_ {
        PillarPosition::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// Year, month and hour stems with their positions
    pub fn non_day_stems(&self) -> impl Iterator<Item = (PillarPosition, Stem)> + '_ {
        PillarPosition::NON_DAY
            .into_iter()
            .map(move |p| (p, self.get(p).stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_access() {
        let p = FourPillars::parse(["庚午", "壬午", "辛亥", "癸巳"]).unwrap();
        assert_eq!(p.day_master(), Stem::Xin);
        assert_eq!(p.month_branch(), Branch::Wu);
        assert_eq!(p.get(PillarPosition::Hour).to_string(), "癸巳");
        let stems: Vec<Stem> = p.non_day_stems().map(|(_, s)| s).collect();
        assert_eq!(stems, vec![Stem::Geng, Stem::Ren, Stem::Gui]);
        assert!(FourPillars::parse(["庚午", "壬午", "辛X", "癸巳"]).is_err());
    }
}
