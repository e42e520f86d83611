//! Typed engine errors
//!
//! Library operations that can reject caller input return `BaziError`.
//! Loaders and the CLI wrap these in `anyhow` with context.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BaziError {
    #[error("invalid request field `{field}`: {reason}")]
    InvalidRequest { field: &'static str, reason: String },

    #[error("unknown heavenly stem: {0}")]
    UnknownStem(String),

    #[error("unknown earthly branch: {0}")]
    UnknownBranch(String),

    #[error("lunar date {year}-{month}-{day} (leap: {leap}) does not exist")]
    InvalidLunarDate {
        year: i32,
        month: u32,
        day: u32,
        leap: bool,
    },

    #[error("solar date {year}-{month}-{day} {hour}:{minute} does not exist")]
    InvalidSolarDate {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },

    #[error("year {year} outside supported range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
}

pub type BaziResult<T> = std::result::Result<T, BaziError>;
