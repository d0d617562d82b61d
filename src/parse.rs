use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::PlanError;
use crate::model::{Flight, Leg};

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Option<Vec<ApiFlight>>,
}

#[derive(Debug, Deserialize)]
struct ApiFlight {
    #[serde(default)]
    flight: Option<ApiFlightCode>,
    #[serde(default)]
    departure: Option<ApiEndpoint>,
    #[serde(default)]
    arrival: Option<ApiEndpoint>,
}

#[derive(Debug, Deserialize)]
struct ApiFlightCode {
    #[serde(default)]
    iata: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEndpoint {
    #[serde(default)]
    iata: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    scheduled: Option<String>,
    #[serde(default)]
    estimated: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// `"America/Port_of_Spain"` becomes `"Port of Spain"`.
pub fn city_from_timezone(timezone: &str) -> Option<String> {
    let (_, place) = timezone.rsplit_once('/')?;
    (!place.is_empty()).then(|| place.replace('_', " "))
}

fn parse_leg(endpoint: Option<ApiEndpoint>, which: &str) -> Result<Leg, PlanError> {
    let endpoint =
        endpoint.ok_or_else(|| PlanError::JsonParse(format!("{which} block missing")))?;

    let airport = non_empty(endpoint.iata)
        .ok_or_else(|| PlanError::JsonParse(format!("{which} airport code missing")))?
        .to_uppercase();

    let time = non_empty(endpoint.scheduled)
        .or_else(|| non_empty(endpoint.estimated))
        .ok_or_else(|| PlanError::JsonParse(format!("{which} time missing")))?;

    let timezone = non_empty(endpoint.timezone).unwrap_or_default();
    let city = city_from_timezone(&timezone).unwrap_or_else(|| airport.clone());

    Ok(Leg {
        city,
        airport,
        time,
        timezone,
    })
}

fn parse_flight(flight: ApiFlight, requested: &str) -> Result<Flight, PlanError> {
    let flight_number = flight
        .flight
        .and_then(|f| non_empty(f.iata))
        .unwrap_or_else(|| requested.to_string());

    Ok(Flight {
        flight_number,
        departure: parse_leg(flight.departure, "departure")?,
        arrival: parse_leg(flight.arrival, "arrival")?,
    })
}

fn error_message(payload: &Value) -> Option<String> {
    let error = payload.get("error").filter(|e| !e.is_null())?;
    let message = error
        .get("message")
        .or_else(|| error.get("code"))
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .unwrap_or("unknown error");
    Some(message.to_string())
}

pub fn parse_payload(payload: Value, requested: &str) -> Result<Flight, PlanError> {
    if let Some(message) = error_message(&payload) {
        return Err(PlanError::Upstream(message));
    }

    let response: ApiResponse =
        serde_json::from_value(payload).map_err(|e| PlanError::JsonParse(e.to_string()))?;

    let first = response
        .data
        .and_then(|flights| flights.into_iter().next())
        .ok_or_else(|| PlanError::FlightNotFound(requested.to_string()))?;

    let flight = parse_flight(first, requested)?;
    debug!(flight = %flight.flight_number, route = %flight.route(), "parsed flight");
    Ok(flight)
}

pub fn parse_body(body: &str, requested: &str) -> Result<Flight, PlanError> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| PlanError::JsonParse(e.to_string()))?;
    parse_payload(payload, requested)
}

/// Message out of an `{"error": {...}}` body, if there is one.
pub fn upstream_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;
    error_message(&payload)
}
