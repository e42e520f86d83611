//! Chart analysis
//!
//! Pure functions over a chart's four pillars:
//! - `pillar`: annotated pillars
//! - `day_master`: day-master strength
//! - `five_elements`: seasonal distribution and favorable elements
//! - `ten_gods`: ten-god relations
//! - `pattern`: 格局 cascade
//! - `luck_cycle`: decade and annual pillars

pub mod day_master;
pub mod five_elements;
pub mod luck_cycle;
pub mod pattern;
pub mod pillar;
pub mod ten_gods;

pub use day_master::{analyze_day_master, day_master_characteristics, DayMaster, DayMasterAnalysis, Strength};
pub use five_elements::{analyze_five_elements, FiveElementsAnalysis};
pub use luck_cycle::{enrich_luck_cycles, DaYun, LiuNian, YunInfo};
pub use pattern::{classify_pattern, PatternCategory, PatternContext, PatternInfo};
pub use pillar::{build_pillar, build_pillars, Pillar, PillarSet};
pub use ten_gods::{analyze_ten_gods, ten_god, TenGod, TenGodInfo, TenGodsAnalysis};
