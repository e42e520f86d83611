//! Bazi Engine
//!
//! Four Pillars (八字) charts from a birth date, time and place, with
//! day-master strength, seasonal five-element distribution, ten gods,
//! pattern (格局) classification and luck cycles.
//!
//! Module layout:
//! - `model/`: elements, stems, branches, the sixty-cycle
//! - `geo/`: place name → longitude
//! - `solar_time`: civil time → true solar time
//! - `calendar/`: the `CalendarProvider` seam and the built-in ephemeris
//! - `analysis/`: pure analyzers over four pillars
//! - `engine`: the end-to-end pipeline and chart output
//! - `summary`: compact string projection of a chart
//!
//! ```no_run
//! use bazi_engine::{BaziEngine, BirthRequest, EngineConfig, Gender};
//!
//! let engine = BaziEngine::new(EngineConfig::default())?;
//! let chart = engine.calculate(&BirthRequest::solar(1990, 6, 15, 10, 30, Gender::Male, "北京市"))?;
//! println!("{}", chart.pattern.name);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analysis;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod model;
pub mod request;
pub mod solar_time;
pub mod summary;

// Re-export commonly used types
pub use calendar::{AstronomicalCalendar, CalendarProvider};
pub use config::EngineConfig;
pub use engine::{BaziChart, BaziEngine};
pub use error::{BaziError, BaziResult};
pub use geo::GeoLocator;
pub use model::{FiveElement, GanZhi, Gender, PillarPosition, Stem};
pub use request::{BirthRequest, CalendarType};
pub use summary::ChartSummary;
