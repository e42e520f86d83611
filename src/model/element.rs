//! Five Elements (五行) and Seasonal States
//!
//! The generation cycle (wood → fire → earth → metal → water → wood) and the
//! restriction cycle (wood → earth → water → fire → metal → wood) drive every
//! downstream rule. The month branch's element fixes a seasonal state for each
//! element, and each state carries a weight used by the distribution scoring.

use serde::{Deserialize, Serialize};

/// One of the five phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiveElement {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl FiveElement {
    /// Fixed iteration order. Ties in strongest/weakest scans resolve to the
    /// earliest element in this order.
    pub fn all() -> &'static [FiveElement; 5] {
        &[
            FiveElement::Wood,
            FiveElement::Fire,
            FiveElement::Earth,
            FiveElement::Metal,
            FiveElement::Water,
        ]
    }

    pub fn index(self) -> usize {
        match self {
            FiveElement::Wood => 0,
            FiveElement::Fire => 1,
            FiveElement::Earth => 2,
            FiveElement::Metal => 3,
            FiveElement::Water => 4,
        }
    }

    /// Single-character Chinese name used in condensed summaries
    pub fn chinese(self) -> &'static str {
        match self {
            FiveElement::Wood => "木",
            FiveElement::Fire => "火",
            FiveElement::Earth => "土",
            FiveElement::Metal => "金",
            FiveElement::Water => "水",
        }
    }

    /// The element this one generates (生)
    pub fn generates(self) -> FiveElement {
        match self {
            FiveElement::Wood => FiveElement::Fire,
            FiveElement::Fire => FiveElement::Earth,
            FiveElement::Earth => FiveElement::Metal,
            FiveElement::Metal => FiveElement::Water,
            FiveElement::Water => FiveElement::Wood,
        }
    }

    /// The element that generates this one
    pub fn generated_by(self) -> FiveElement {
        match self {
            FiveElement::Wood => FiveElement::Water,
            FiveElement::Fire => FiveElement::Wood,
            FiveElement::Earth => FiveElement::Fire,
            FiveElement::Metal => FiveElement::Earth,
            FiveElement::Water => FiveElement::Metal,
        }
    }

    /// The element this one restricts (克)
    pub fn restricts(self) -> FiveElement {
        match self {
            FiveElement::Wood => FiveElement::Earth,
            FiveElement::Earth => FiveElement::Water,
            FiveElement::Water => FiveElement::Fire,
            FiveElement::Fire => FiveElement::Metal,
            FiveElement::Metal => FiveElement::Wood,
        }
    }

    /// The element that restricts this one
    pub fn restricted_by(self) -> FiveElement {
        match self {
            FiveElement::Wood => FiveElement::Metal,
            FiveElement::Earth => FiveElement::Wood,
            FiveElement::Water => FiveElement::Earth,
            FiveElement::Fire => FiveElement::Water,
            FiveElement::Metal => FiveElement::Fire,
        }
    }
}

/// Polarity of a stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YinYang {
    Yang,
    Yin,
}

/// Seasonal state of an element relative to the month element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    /// Same as the month element (旺)
    Wang,
    /// Generated by the month element (相)
    Xiang,
    /// Generates the month element (休)
    Xiu,
    /// Restricts the month element (囚)
    Qiu,
    /// Restricted by the month element (死)
    Si,
}

impl ElementState {
    /// Derive the state of `element` in a month ruled by `month_element`
    pub fn of(element: FiveElement, month_element: FiveElement) -> Self {
        if element == month_element {
            ElementState::Wang
        } else if month_element.generates() == element {
            ElementState::Xiang
        } else if month_element.generated_by() == element {
            ElementState::Xiu
        } else if month_element.restricted_by() == element {
            ElementState::Qiu
        } else {
            ElementState::Si
        }
    }

    /// Multiplier applied to stem and hidden-stem contributions
    pub fn weight(self) -> f64 {
        match self {
            ElementState::Wang => 1.5,
            ElementState::Xiang => 1.2,
            ElementState::Xiu => 1.0,
            ElementState::Qiu => 0.7,
            ElementState::Si => 0.5,
        }
    }
}

/// One value per element, serialized as `{"wood": .., "fire": .., ...}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementTable<T> {
    pub wood: T,
    pub fire: T,
    pub earth: T,
    pub metal: T,
    pub water: T,
}

impl<T: Copy> ElementTable<T> {
    /// Build a table by evaluating `f` once per element
    pub fn from_fn(mut f: impl FnMut(FiveElement) -> T) -> Self {
        Self {
            wood: f(FiveElement::Wood),
            fire: f(FiveElement::Fire),
            earth: f(FiveElement::Earth),
            metal: f(FiveElement::Metal),
            water: f(FiveElement::Water),
        }
    }

    pub fn get(&self, element: FiveElement) -> T {
        match element {
            FiveElement::Wood => self.wood,
            FiveElement::Fire => self.fire,
            FiveElement::Earth => self.earth,
            FiveElement::Metal => self.metal,
            FiveElement::Water => self.water,
        }
    }

    pub fn get_mut(&mut self, element: FiveElement) -> &mut T {
        match element {
            FiveElement::Wood => &mut self.wood,
            FiveElement::Fire => &mut self.fire,
            FiveElement::Earth => &mut self.earth,
            FiveElement::Metal => &mut self.metal,
            FiveElement::Water => &mut self.water,
        }
    }

    /// (element, value) pairs in the fixed element order
    pub fn iter(&self) -> impl Iterator<Item = (FiveElement, T)> + '_ {
        FiveElement::all().iter().map(move |&e| (e, self.get(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_single_five_cycle() {
        for &e in FiveElement::all() {
            let mut cur = e;
            for step in 1..=5 {
                cur = cur.generates();
                if step < 5 {
                    assert_ne!(cur, e, "generation returned to {:?} after {} steps", e, step);
                }
            }
            assert_eq!(cur, e);
            assert_eq!(e.generates().generated_by(), e);
        }
    }

    #[test]
    fn test_restriction_is_single_five_cycle() {
        for &e in FiveElement::all() {
            let mut cur = e;
            for step in 1..=5 {
                cur = cur.restricts();
                if step < 5 {
                    assert_ne!(cur, e);
                }
            }
            assert_eq!(cur, e);
            assert_eq!(e.restricts().restricted_by(), e);
            // No 2-cycles
            assert_ne!(e.restricts().restricts(), e);
            assert_ne!(e.generates().generates(), e);
        }
    }

    #[test]
    fn test_states_cover_all_elements_once() {
        for &month in FiveElement::all() {
            let states: Vec<ElementState> = FiveElement::all()
                .iter()
                .map(|&e| ElementState::of(e, month))
                .collect();
            for s in [
                ElementState::Wang,
                ElementState::Xiang,
                ElementState::Xiu,
                ElementState::Qiu,
                ElementState::Si,
            ] {
                assert_eq!(states.iter().filter(|&&x| x == s).count(), 1);
            }
        }
    }

    #[test]
    fn test_fire_month_states() {
        let month = FiveElement::Fire;
        assert_eq!(ElementState::of(FiveElement::Fire, month), ElementState::Wang);
        assert_eq!(ElementState::of(FiveElement::Earth, month), ElementState::Xiang);
        assert_eq!(ElementState::of(FiveElement::Wood, month), ElementState::Xiu);
        assert_eq!(ElementState::of(FiveElement::Water, month), ElementState::Qiu);
        assert_eq!(ElementState::of(FiveElement::Metal, month), ElementState::Si);
    }

    #[test]
    fn test_element_table_serializes_with_code_keys() {
        let table = ElementTable::from_fn(|e| e.index() as u32);
        let json = serde_json::to_value(table).unwrap();
        assert_eq!(json["wood"], 0);
        assert_eq!(json["water"], 4);
    }
}
