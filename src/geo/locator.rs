//! City Longitude Lookup
//!
//! Resolves free-form Chinese place names ("广东省/深圳市/南山区", "深圳",
//! "大理州") to a longitude for true solar time correction.
//!
//! Resolution order:
//! 1. Split on "/": third part against the area index, second part against
//!    the city index, then the first part against area, city and province.
//! 2. Each index lookup tries the exact name, then adds an administrative
//!    suffix, then strips a suffix (bare name, then each other suffix).
//! 3. Fuzzy containment (either direction) against every row's area, then
//!    city, in dataset order.
//! 4. The configured default longitude.
//!
//! Lookup never fails. Indexes are built once; the first row carrying a name
//! wins.

use crate::config::EngineConfig;
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fs;
use std::path::Path;

/// Embedded dataset, used unless a path is configured
const EMBEDDED_GEO_DATA: &str = include_str!("../../data/city_geo_data.json");

/// Administrative suffixes, tried in this order
const SUFFIXES: [&str; 6] = ["市", "区", "县", "地区", "州", "盟"];

/// Regions missing from (or coarse in) the dataset
static EXTRA_LONGITUDES: &[(&str, f64)] = &[
    ("香港特别行政区", 114.2),
    ("澳门特别行政区", 113.5),
    ("台湾省", 121.5),
    ("金门县", 118.3774),
    ("澳门半岛", 113.5429),
];

/// Province-level name endings for supplemental entries
const PROVINCE_ENDINGS: [&str; 3] = ["省", "自治区", "特别行政区"];

/// One dataset row. Coordinates are stored as strings; rows that fail to
/// parse are skipped by every index.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CityGeoItem {
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl CityGeoItem {
    fn longitude(&self) -> Option<f64> {
        self.lng.trim().parse().ok()
    }

    fn latitude(&self) -> Option<f64> {
        self.lat.trim().parse().ok()
    }
}

/// Longitude/latitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexKind {
    Province,
    City,
    Area,
}

pub struct GeoLocator {
    items: Vec<CityGeoItem>,
    area_index: FxHashMap<String, f64>,
    city_index: FxHashMap<String, f64>,
    province_index: FxHashMap<String, f64>,
    default_longitude: f64,
    default_latitude: f64,
}

impl GeoLocator {
    /// Build from the dataset compiled into the crate
    pub fn embedded() -> Result<Self> {
        let items: Vec<CityGeoItem> = serde_json::from_str(EMBEDDED_GEO_DATA)
            .with_context(|| "Failed to parse embedded city geo data")?;
        Ok(Self::from_items(items))
    }

    /// Build from a JSON array of rows on disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read city geo data: {:?}", path))?;
        let items: Vec<CityGeoItem> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse city geo data: {:?}", path))?;
        Ok(Self::from_items(items))
    }

    /// Build using the configured dataset and defaults
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let locator = match &config.geo_data_path {
            Some(path) => Self::from_path(path)?,
            None => Self::embedded()?,
        };
        Ok(locator.with_defaults(config.default_longitude, config.default_latitude))
    }

    pub fn from_items(items: Vec<CityGeoItem>) -> Self {
        let defaults = EngineConfig::default();
        let mut area_index = FxHashMap::default();
        let mut city_index = FxHashMap::default();
        let mut province_index = FxHashMap::default();

        for item in &items {
            let Some(lng) = item.longitude() else {
                continue;
            };
            for (index, name) in [
                (&mut province_index, &item.province),
                (&mut city_index, &item.city),
                (&mut area_index, &item.area),
            ] {
                if !name.is_empty() {
                    index.entry(name.clone()).or_insert(lng);
                }
            }
        }

        for &(name, lng) in EXTRA_LONGITUDES {
            area_index.entry(name.to_string()).or_insert(lng);
            city_index.entry(name.to_string()).or_insert(lng);
            if PROVINCE_ENDINGS.iter().any(|end| name.ends_with(end)) {
                province_index.entry(name.to_string()).or_insert(lng);
            }
        }

        tracing::debug!(
            "Geo indexes built: {} rows, {} areas, {} cities, {} provinces",
            items.len(),
            area_index.len(),
            city_index.len(),
            province_index.len()
        );

        Self {
            items,
            area_index,
            city_index,
            province_index,
            default_longitude: defaults.default_longitude,
            default_latitude: defaults.default_latitude,
        }
    }

    pub fn with_defaults(mut self, longitude: f64, latitude: f64) -> Self {
        self.default_longitude = longitude;
        self.default_latitude = latitude;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Longitude for `location`, falling back to the default
    pub fn longitude(&self, location: &str) -> f64 {
        match self.resolve_longitude(location) {
            Some(lng) => lng,
            None => {
                tracing::debug!(
                    "Location {:?} unresolved, using default longitude {}",
                    location,
                    self.default_longitude
                );
                self.default_longitude
            }
        }
    }

    /// Longitude for `location`, or `None` when nothing matches
    pub fn resolve_longitude(&self, location: &str) -> Option<f64> {
        if location.trim().is_empty() {
            return None;
        }

        let parts: SmallVec<[&str; 3]> = location.split('/').collect();

        if parts.len() >= 3 {
            if let Some(lng) = self.find_by_name(parts[2].trim(), IndexKind::Area) {
                return Some(lng);
            }
        }

        if parts.len() >= 2 {
            if let Some(lng) = self.find_by_name(parts[1].trim(), IndexKind::City) {
                return Some(lng);
            }
        }

        let head = parts[0].trim();
        [IndexKind::Area, IndexKind::City, IndexKind::Province]
            .into_iter()
            .find_map(|kind| self.find_by_name(head, kind))
            .or_else(|| self.fuzzy_match(location))
    }

    fn index(&self, kind: IndexKind) -> &FxHashMap<String, f64> {
        match kind {
            IndexKind::Province => &self.province_index,
            IndexKind::City => &self.city_index,
            IndexKind::Area => &self.area_index,
        }
    }

    fn find_by_name(&self, name: &str, kind: IndexKind) -> Option<f64> {
        if name.is_empty() {
            return None;
        }
        let index = self.index(kind);

        if let Some(&lng) = index.get(name) {
            return Some(lng);
        }

        // Add a suffix
        for suffix in SUFFIXES {
            if !name.ends_with(suffix) {
                if let Some(&lng) = index.get(&format!("{}{}", name, suffix)) {
                    return Some(lng);
                }
            }
        }

        // Strip a suffix, then try the bare name and each other suffix
        for suffix in SUFFIXES {
            if let Some(bare) = name.strip_suffix(suffix) {
                if let Some(&lng) = index.get(bare) {
                    return Some(lng);
                }
                for other in SUFFIXES {
                    if other != suffix {
                        if let Some(&lng) = index.get(&format!("{}{}", bare, other)) {
                            return Some(lng);
                        }
                    }
                }
            }
        }

        None
    }

    fn fuzzy_match(&self, location: &str) -> Option<f64> {
        let overlaps = |field: &str| {
            !field.is_empty() && (location.contains(field) || field.contains(location))
        };
        self.items.iter().find_map(|item| {
            let lng = item.longitude()?;
            if overlaps(&item.area) || overlaps(&item.city) {
                Some(lng)
            } else {
                None
            }
        })
    }

    /// Coordinates by row match: exact province/city/area for three parts,
    /// exact province/city for two, containment in any field for one.
    pub fn coordinates(&self, location: &str) -> Coordinates {
        let fallback = Coordinates {
            lng: self.default_longitude,
            lat: self.default_latitude,
        };

        let parts: SmallVec<[&str; 3]> = location.split('/').map(str::trim).collect();
        let found = match parts.as_slice() {
            [province, city, area] => self.items.iter().find(|item| {
                item.province == *province && item.city == *city && item.area == *area
            }),
            [province, city] => self
                .items
                .iter()
                .find(|item| item.province == *province && item.city == *city),
            [term] if !term.is_empty() => self.items.iter().find(|item| {
                item.area.contains(term) || item.city.contains(term) || item.province.contains(term)
            }),
            _ => None,
        };

        match found {
            Some(item) => match (item.longitude(), item.latitude()) {
                (Some(lng), Some(lat)) => {
                    tracing::info!(
                        "Matched {:?} to {}/{}/{} ({}, {})",
                        location,
                        item.province,
                        item.city,
                        item.area,
                        lng,
                        lat
                    );
                    Coordinates { lng, lat }
                }
                _ => {
                    tracing::warn!("Unparseable coordinates for location {:?}", location);
                    fallback
                }
            },
            None => {
                tracing::warn!("No geo match for location {:?}", location);
                fallback
            }
        }
    }
}
