use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PlanError;
use crate::fetch::LookupOptions;
use crate::model::{FitnessLevel, Flight, Leg, LookupResponse, UserProfile};
use crate::plan::RecoveryPlanEngine;
use crate::query::{LookupQuery, PlanRequest};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct PlanArgs {
    #[schemars(description = "Departure airport IATA code, exactly 3 uppercase letters. Example: ZRH")]
    from: String,
    #[schemars(description = "Arrival airport IATA code, exactly 3 uppercase letters. Example: MIA")]
    to: String,
    #[schemars(
        description = "Local departure time, ISO-8601 with UTC offset. Example: 2025-08-18T13:05:00+02:00"
    )]
    depart: String,
    #[schemars(
        description = "Local arrival time, ISO-8601 with UTC offset. Example: 2025-08-18T17:30:00-04:00"
    )]
    arrive: String,
    #[schemars(description = "Departure city name. Defaults to the airport code")]
    from_city: Option<String>,
    #[schemars(description = "Arrival city name. Defaults to the airport code")]
    to_city: Option<String>,
    #[schemars(description = "Departure IANA timezone name, informational. Example: Europe/Zurich")]
    from_tz: Option<String>,
    #[schemars(description = "Arrival IANA timezone name, informational. Example: America/New_York")]
    to_tz: Option<String>,
    #[schemars(description = "Flight number, informational. Example: LX64")]
    flight_number: Option<String>,
    #[schemars(description = "One of: beginner, intermediate, advanced, athlete. Default: beginner")]
    fitness: Option<String>,
    #[schemars(description = "Health condition tags, carried through unchanged")]
    health_conditions: Option<Vec<String>>,
    #[schemars(description = "Fail instead of assuming no time shift when a UTC offset is missing")]
    strict: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct LookupArgs {
    #[schemars(description = "Flight number, IATA airline code plus number. Example: LX64")]
    flight_number: String,
    #[schemars(description = "Flight date in YYYY-MM-DD format. Optional")]
    date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct PlanForFlightArgs {
    #[schemars(description = "Flight number, IATA airline code plus number. Example: LX64")]
    flight_number: String,
    #[schemars(description = "Flight date in YYYY-MM-DD format. Optional")]
    date: Option<String>,
    #[schemars(description = "One of: beginner, intermediate, advanced, athlete. Default: beginner")]
    fitness: Option<String>,
    #[schemars(description = "Health condition tags, carried through unchanged")]
    health_conditions: Option<Vec<String>>,
}

fn tool_error(msg: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.into())]))
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
        Err(e) => tool_error(format!("failed to encode result: {e}")),
    }
}

fn build_profile(
    fitness: Option<&str>,
    health_conditions: Option<Vec<String>>,
) -> Result<UserProfile, PlanError> {
    let fitness_level = fitness
        .map(FitnessLevel::from_str_loose)
        .transpose()?
        .unwrap_or(FitnessLevel::Beginner);

    Ok(UserProfile {
        id: "mcp".into(),
        fitness_level,
        health_conditions: health_conditions.unwrap_or_default(),
    })
}

fn build_flight(args: &PlanArgs) -> Flight {
    let from = args.from.trim().to_uppercase();
    let to = args.to.trim().to_uppercase();
    Flight {
        flight_number: args.flight_number.clone().unwrap_or_default(),
        departure: Leg {
            city: args.from_city.clone().unwrap_or_else(|| from.clone()),
            airport: from,
            time: args.depart.trim().to_string(),
            timezone: args.from_tz.clone().unwrap_or_default(),
        },
        arrival: Leg {
            city: args.to_city.clone().unwrap_or_else(|| to.clone()),
            airport: to,
            time: args.arrive.trim().to_string(),
            timezone: args.to_tz.clone().unwrap_or_default(),
        },
    }
}

fn plan_request(request: &PlanRequest, strict: bool) -> Result<CallToolResult, McpError> {
    if let Err(e) = request.validate() {
        return tool_error(e.to_string());
    }

    let engine = RecoveryPlanEngine::default();
    if strict {
        match engine.compute_strict(&request.flight, &request.profile) {
            Ok(plan) => json_result(&plan),
            Err(e) => tool_error(e.to_string()),
        }
    } else {
        json_result(&engine.compute(&request.flight, &request.profile))
    }
}

#[derive(Debug, Clone)]
struct JetlagMcp {
    tool_router: ToolRouter<Self>,
    lookup: LookupOptions,
}

#[tool_router]
impl JetlagMcp {
    fn new(lookup: LookupOptions) -> Self {
        Self {
            tool_router: Self::tool_router(),
            lookup,
        }
    }

    #[tool(
        description = "Compute a jet-lag recovery plan (one exercise recommendation plus fixed sleep and light advice) from a flight's local departure and arrival times. Times must be ISO-8601 with a UTC offset; the offset difference drives the recommendation. Returns the plan as JSON."
    )]
    async fn jetlag_plan(
        &self,
        Parameters(args): Parameters<PlanArgs>,
    ) -> Result<CallToolResult, McpError> {
        let profile = match build_profile(args.fitness.as_deref(), args.health_conditions.clone()) {
            Ok(p) => p,
            Err(e) => return tool_error(e.to_string()),
        };

        let request = PlanRequest {
            flight: build_flight(&args),
            profile,
        };

        plan_request(&request, args.strict.unwrap_or(false))
    }

    #[tool(
        description = "Look up a flight by number and return its departure and arrival legs as {\"flightData\": ...}. Requires AVIATIONSTACK_API_KEY in the server environment."
    )]
    async fn jetlag_lookup_flight(
        &self,
        Parameters(args): Parameters<LookupArgs>,
    ) -> Result<CallToolResult, McpError> {
        let query = LookupQuery::new(&args.flight_number, args.date.as_deref());
        match crate::lookup(query, self.lookup.clone()).await {
            Ok(flight) => json_result(&LookupResponse {
                flight_data: flight,
            }),
            Err(e) => tool_error(e.to_string()),
        }
    }

    #[tool(
        description = "Look up a flight by number, then compute the jet-lag recovery plan for it. Combines jetlag_lookup_flight and jetlag_plan. Requires AVIATIONSTACK_API_KEY in the server environment."
    )]
    async fn jetlag_plan_for_flight(
        &self,
        Parameters(args): Parameters<PlanForFlightArgs>,
    ) -> Result<CallToolResult, McpError> {
        let profile = match build_profile(args.fitness.as_deref(), args.health_conditions) {
            Ok(p) => p,
            Err(e) => return tool_error(e.to_string()),
        };

        let query = LookupQuery::new(&args.flight_number, args.date.as_deref());
        let flight = match crate::lookup(query, self.lookup.clone()).await {
            Ok(f) => f,
            Err(e) => return tool_error(e.to_string()),
        };

        plan_request(&PlanRequest { flight, profile }, false)
    }
}

#[tool_handler]
impl ServerHandler for JetlagMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "jetlag".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Jet-lag recovery planner. Use jetlag_plan when departure and arrival times are known (ISO-8601 with UTC offsets). Use jetlag_plan_for_flight or jetlag_lookup_flight when only a flight number is known.".into(),
            ),
        }
    }
}

pub async fn run(lookup: LookupOptions) -> Result<(), PlanError> {
    info!(api_key = lookup.api_key.is_some(), "starting MCP server on stdio");
    let service = JetlagMcp::new(lookup)
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| PlanError::Server(e.to_string()))?;
    service
        .waiting()
        .await
        .map_err(|e| PlanError::Server(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_args() -> PlanArgs {
        PlanArgs {
            from: "zrh".into(),
            to: " mia ".into(),
            depart: "2025-08-18T13:05:00+02:00".into(),
            arrive: "2025-08-18T17:30:00-04:00".into(),
            from_city: Some("Zurich".into()),
            to_city: None,
            from_tz: Some("Europe/Zurich".into()),
            to_tz: None,
            flight_number: Some("LX64".into()),
            fitness: None,
            health_conditions: None,
            strict: None,
        }
    }

    #[test]
    fn build_flight_uppercases_and_defaults_city() {
        let flight = build_flight(&plan_args());
        assert_eq!(flight.departure.airport, "ZRH");
        assert_eq!(flight.departure.city, "Zurich");
        assert_eq!(flight.arrival.airport, "MIA");
        assert_eq!(flight.arrival.city, "MIA");
        assert_eq!(flight.flight_number, "LX64");
        assert_eq!(flight.departure.timezone, "Europe/Zurich");
        assert_eq!(flight.arrival.timezone, "");
    }

    #[test]
    fn build_profile_defaults_to_beginner() {
        let profile = build_profile(None, None).unwrap();
        assert_eq!(profile.fitness_level, FitnessLevel::Beginner);
        assert!(profile.health_conditions.is_empty());
    }

    #[test]
    fn build_profile_keeps_conditions() {
        let profile =
            build_profile(Some("Athlete"), Some(vec!["Asthma".into()])).unwrap();
        assert_eq!(profile.fitness_level, FitnessLevel::Athlete);
        assert_eq!(profile.health_conditions, vec!["Asthma".to_string()]);
    }

    #[test]
    fn build_profile_rejects_unknown_level() {
        assert!(build_profile(Some("couch"), None).is_err());
    }

    fn text(result: &CallToolResult) -> &str {
        result.content[0]
            .as_text()
            .map(|t| t.text.as_str())
            .unwrap_or_default()
    }

    fn request(args: &PlanArgs) -> PlanRequest {
        PlanRequest {
            flight: build_flight(args),
            profile: build_profile(None, None).unwrap(),
        }
    }

    #[test]
    fn invalid_airport_is_tool_error() {
        let mut args = plan_args();
        args.from = "Z1".into();

        let result = plan_request(&request(&args), false).unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("3 letters"));
    }

    #[test]
    fn strict_missing_offset_is_tool_error() {
        let mut args = plan_args();
        args.arrive = "2025-08-18T17:30:00".into();

        let result = plan_request(&request(&args), true).unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("no UTC offset"));
    }

    #[test]
    fn missing_offset_plans_zero_shift_when_lenient() {
        let mut args = plan_args();
        args.arrive = "2025-08-18T17:30:00".into();

        let result = plan_request(&request(&args), false).unwrap();
        assert_eq!(result.is_error, Some(false));
        let plan: serde_json::Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(plan["route"], "ZRH-MIA");
        assert_eq!(plan["timeOffset"], 0);
        assert_eq!(plan["recommendations"]["exercise"][0]["type"], "Light Walk");
    }

    #[tokio::test]
    async fn plan_tool_rejects_unknown_fitness() {
        let server = JetlagMcp::new(LookupOptions::default());
        let mut args = plan_args();
        args.fitness = Some("couch".into());

        let result = server.jetlag_plan(Parameters(args)).await.unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn lookup_tool_without_key_is_tool_error() {
        let server = JetlagMcp::new(LookupOptions::default());
        let args = LookupArgs {
            flight_number: "LX64".into(),
            date: None,
        };

        let result = server.jetlag_lookup_flight(Parameters(args)).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("API key not configured"));
    }

    #[tokio::test]
    async fn plan_for_flight_without_number_is_tool_error() {
        let server = JetlagMcp::new(LookupOptions {
            api_key: Some("test-key".into()),
            ..LookupOptions::default()
        });
        let args = PlanForFlightArgs {
            flight_number: " ".into(),
            date: None,
            fitness: None,
            health_conditions: None,
        };

        let result = server.jetlag_plan_for_flight(Parameters(args)).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("flight number is required"));
    }
}
