//! Place name resolution for true solar time

pub mod locator;

pub use locator::{CityGeoItem, Coordinates, GeoLocator};
