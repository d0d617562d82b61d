use chrono::NaiveDate;

use crate::error::PlanError;
use crate::model::{Flight, Leg, UserProfile};
use crate::offset;

pub fn validate_airport(code: &str) -> Result<(), PlanError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(PlanError::InvalidAirport(code.to_string()));
    }
    Ok(())
}

pub fn validate_timestamp(timestamp: &str) -> Result<(), PlanError> {
    offset::local_datetime(timestamp)
        .map(|_| ())
        .ok_or_else(|| PlanError::InvalidTimestamp(timestamp.to_string()))
}

pub fn validate_date(date: &str) -> Result<(), PlanError> {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) if d.format("%Y-%m-%d").to_string() == date => Ok(()),
        _ => Err(PlanError::InvalidDate(date.to_string())),
    }
}

/// Strips all whitespace and uppercases: `"lx 64"` becomes `"LX64"`.
pub fn normalize_flight_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Two-character airline designator followed by one to four digits and an
/// optional suffix letter.
pub fn validate_flight_number(number: &str) -> Result<(), PlanError> {
    let invalid = || PlanError::InvalidFlightNumber(number.to_string());

    if !number.is_ascii() || number.len() < 3 {
        return Err(invalid());
    }
    let (airline, rest) = number.split_at(2);
    if !airline.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    let rest = rest
        .strip_suffix(|c: char| c.is_ascii_uppercase())
        .unwrap_or(rest);
    if rest.is_empty() || rest.len() > 4 || !rest.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub flight: Flight,
    pub profile: UserProfile,
}

impl PlanRequest {
    pub fn validate(&self) -> Result<(), PlanError> {
        for leg in [&self.flight.departure, &self.flight.arrival] {
            validate_airport(&leg.airport)?;
            validate_timestamp(&leg.time)?;
        }

        if self.profile.id.trim().is_empty() {
            return Err(PlanError::Validation("user id must not be empty".into()));
        }

        Ok(())
    }

    /// Legs whose timestamp carries no usable UTC offset.
    pub fn legs_missing_offset(&self) -> Vec<(&'static str, &Leg)> {
        [
            ("departure", &self.flight.departure),
            ("arrival", &self.flight.arrival),
        ]
        .into_iter()
        .filter(|(_, leg)| offset::parse_offset(&leg.time).is_none())
        .collect()
    }
}

#[derive(Debug, Clone)]
pub struct LookupQuery {
    pub flight_number: String,
    pub date: Option<String>,
}

impl LookupQuery {
    pub fn new(flight_number: &str, date: Option<&str>) -> Self {
        Self {
            flight_number: normalize_flight_number(flight_number),
            date: date.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.flight_number.is_empty() {
            return Err(PlanError::MissingFlightNumber);
        }
        validate_flight_number(&self.flight_number)?;
        if let Some(ref date) = self.date {
            validate_date(date)?;
        }
        Ok(())
    }

    pub fn to_url_params(&self, api_key: &str) -> Vec<(String, String)> {
        let mut params = vec![
            ("access_key".to_string(), api_key.to_string()),
            ("flight_iata".to_string(), self.flight_number.clone()),
            ("limit".to_string(), "1".to_string()),
        ];

        if let Some(ref date) = self.date {
            params.push(("flight_date".to_string(), date.clone()));
        }

        params
    }
}
