//! Birth Request
//!
//! The engine's single input, deserializable from camelCase JSON:
//!
//! ```json
//! {"year": 1990, "month": 6, "day": 15, "hour": 10, "minute": 30,
//!  "calendarType": "solar", "gender": "male", "isLeapMonth": false,
//!  "location": "北京市"}
//! ```
//!
//! For lunar requests `month`/`day` are lunar and `isLeapMonth` selects the
//! leap month of that number.

use crate::error::{BaziError, BaziResult};
use crate::model::Gender;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    Solar,
    Lunar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthRequest {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub calendar_type: CalendarType,
    pub gender: Gender,
    #[serde(default)]
    pub is_leap_month: bool,
    pub location: String,
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> BaziResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(BaziError::InvalidRequest {
            field,
            reason: format!("{} outside {}..={}", value, min, max),
        })
    }
}

impl BirthRequest {
    /// Solar request with no leap flag
    pub fn solar(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        gender: Gender,
        location: &str,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            calendar_type: CalendarType::Solar,
            gender,
            is_leap_month: false,
            location: location.to_string(),
        }
    }

    /// Lunar request
    #[allow(clippy::too_many_arguments)]
    pub fn lunar(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        is_leap_month: bool,
        gender: Gender,
        location: &str,
    ) -> Self {
        Self {
            calendar_type: CalendarType::Lunar,
            is_leap_month,
            ..Self::solar(year, month, day, hour, minute, gender, location)
        }
    }

    /// Field ranges; whether the date exists is checked during calculation
    pub fn validate(&self, min_year: i32) -> BaziResult<()> {
        check_range("year", self.year as i64, min_year as i64, i32::MAX as i64)?;
        check_range("month", self.month as i64, 1, 12)?;
        check_range("day", self.day as i64, 1, 31)?;
        check_range("hour", self.hour as i64, 0, 23)?;
        check_range("minute", self.minute as i64, 0, 59)?;
        if self.location.trim().is_empty() {
            return Err(BaziError::InvalidRequest {
                field: "location",
                reason: "must not be blank".to_string(),
            });
        }
        if self.is_leap_month && self.calendar_type == CalendarType::Solar {
            tracing::debug!("isLeapMonth ignored for a solar request");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_request() -> BirthRequest {
        BirthRequest::solar(1990, 6, 15, 10, 30, Gender::Male, "北京市")
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"year": 2023, "month": 2, "day": 1, "hour": 8, "minute": 0,
            "calendarType": "lunar", "gender": "female", "isLeapMonth": true,
            "location": "上海市"}"#;
        let req: BirthRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.calendar_type, CalendarType::Lunar);
        assert_eq!(req.gender, Gender::Female);
        assert!(req.is_leap_month);
        assert!(req.validate(1900).is_ok());
    }

    #[test]
    fn test_leap_flag_defaults_to_false() {
        let json = r#"{"year": 1990, "month": 6, "day": 15, "hour": 10, "minute": 30,
            "calendarType": "solar", "gender": "male", "location": "北京市"}"#;
        let req: BirthRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req, make_test_request());
    }

    #[test]
    fn test_unknown_enum_values_rejected() {
        let json = r#"{"year": 1990, "month": 6, "day": 15, "hour": 10, "minute": 30,
            "calendarType": "julian", "gender": "male", "location": "北京市"}"#;
        assert!(serde_json::from_str::<BirthRequest>(json).is_err());
    }

    #[test]
    fn test_range_errors_name_the_field() {
        let mut req = make_test_request();
        req.year = 1899;
        assert!(matches!(
            req.validate(1900),
            Err(BaziError::InvalidRequest { field: "year", .. })
        ));

        let mut req = make_test_request();
        req.minute = 60;
        assert!(matches!(
            req.validate(1900),
            Err(BaziError::InvalidRequest { field: "minute", .. })
        ));

        let mut req = make_test_request();
        req.location = "  ".to_string();
        assert!(matches!(
            req.validate(1900),
            Err(BaziError::InvalidRequest { field: "location", .. })
        ));
    }

    #[test]
    fn test_boundaries_accepted() {
        let req = BirthRequest::solar(1900, 12, 31, 23, 59, Gender::Female, "深圳");
        assert!(req.validate(1900).is_ok());
        let req = BirthRequest::solar(2000, 1, 1, 0, 0, Gender::Male, "深圳");
        assert!(req.validate(1900).is_ok());
    }
}
