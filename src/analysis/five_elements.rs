//! Five-Element Distribution
//!
//! Every stem contributes 1.0 and every hidden stem its branch weight, both
//! scaled by the element's seasonal state in the birth month. Counts only
//! see stems and 本气 hidden stems.
//!
//! Favorable elements follow day-master strength:
//! - strong: 官杀, 食伤, 财 favorable; 印, 比劫 unfavorable
//! - weak: the reverse
//! - balanced: the two weakest favorable, the two strongest unfavorable

use crate::analysis::day_master::{DayMaster, Strength};
use crate::model::{ElementState, ElementTable, FiveElement, FourPillars};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiveElementsAnalysis {
    pub distribution: ElementTable<f64>,
    pub counts: ElementTable<u32>,
    pub strongest: FiveElement,
    pub weakest: FiveElement,
    pub favorable: Vec<FiveElement>,
    pub unfavorable: Vec<FiveElement>,
    pub element_states: ElementTable<ElementState>,
    pub month_element: FiveElement,
}

/// Seasonal state of every element in a month ruled by `month_element`
pub fn element_states(month_element: FiveElement) -> ElementTable<ElementState> {
    ElementTable::from_fn(|e| ElementState::of(e, month_element))
}

/// Weighted distribution and 本气 counts
pub fn distribution(
    pillars: &FourPillars,
    states: &ElementTable<ElementState>,
) -> (ElementTable<f64>, ElementTable<u32>) {
    let mut dist = ElementTable::<f64>::default();
    let mut counts = ElementTable::<u32>::default();

    for (_, gz) in pillars.iter() {
        let element = gz.stem.element();
        *dist.get_mut(element) += states.get(element).weight();
        *counts.get_mut(element) += 1;
    }

    for (_, gz) in pillars.iter() {
        for (i, hidden, weight) in gz.branch.weighted_hidden_stems() {
            let element = hidden.element();
            *dist.get_mut(element) += weight * states.get(element).weight();
            if i == 0 {
                *counts.get_mut(element) += 1;
            }
        }
    }

    (dist, counts)
}

/// Strongest and weakest elements; ties go to the earliest in element order
pub fn extremes(dist: &ElementTable<f64>) -> (FiveElement, FiveElement) {
    let mut strongest = (FiveElement::Wood, f64::NEG_INFINITY);
    let mut weakest = (FiveElement::Wood, f64::INFINITY);
    for (element, value) in dist.iter() {
        if value > strongest.1 {
            strongest = (element, value);
        }
        if value < weakest.1 {
            weakest = (element, value);
        }
    }
    (strongest.0, weakest.0)
}

/// Favorable and unfavorable elements for a day master
pub fn favorable_elements(
    day_master: &DayMaster,
    dist: &ElementTable<f64>,
) -> (Vec<FiveElement>, Vec<FiveElement>) {
    let me = day_master.element();
    let yin = me.generated_by();
    let shi_shang = me.generates();
    let cai = me.restricts();
    let guan_sha = me.restricted_by();

    match day_master.strength {
        Strength::Strong => (vec![guan_sha, shi_shang, cai], vec![yin, me]),
        Strength::Weak => (vec![yin, me], vec![guan_sha, shi_shang, cai]),
        Strength::Balanced => {
            let mut sorted: Vec<FiveElement> = FiveElement::all().to_vec();
            // Stable sort keeps element order among equal values
            sorted.sort_by(|a, b| dist.get(*a).total_cmp(&dist.get(*b)));
            (vec![sorted[0], sorted[1]], vec![sorted[4], sorted[3]])
        }
    }
}

pub fn analyze_five_elements(pillars: &FourPillars, day_master: &DayMaster) -> FiveElementsAnalysis {
    let month_element = pillars.month_branch().element();
    let states = element_states(month_element);
    let (dist, counts) = distribution(pillars, &states);
    let (strongest, weakest) = extremes(&dist);
    let (favorable, unfavorable) = favorable_elements(day_master, &dist);

    FiveElementsAnalysis {
        distribution: dist,
        counts,
        strongest,
        weakest,
        favorable,
        unfavorable,
        element_states: states,
        month_element,
    }
}
