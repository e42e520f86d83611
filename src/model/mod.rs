//! Core symbolic model
//!
//! - `element`: five elements, polarity, seasonal states
//! - `stem_branch`: stems, branches with hidden stems, the sixty-cycle
//! - `position`: pillar positions and gender
//! - `pillars`: the four pairs of a chart

pub mod element;
pub mod pillars;
pub mod position;
pub mod stem_branch;

pub use element::{ElementState, ElementTable, FiveElement, YinYang};
pub use pillars::FourPillars;
pub use position::{Gender, PillarPosition};
pub use stem_branch::{Branch, GanZhi, Stem, DEFAULT_HIDDEN_WEIGHT};
