pub mod error;
pub mod fetch;
pub mod mcp;
pub mod model;
pub mod offset;
pub mod parse;
pub mod plan;
pub mod query;
pub mod rules;
pub mod table;

use error::PlanError;
use fetch::LookupOptions;
use model::Flight;
use query::LookupQuery;

pub use plan::{analyze, compute, RecoveryPlanEngine, ShiftAnalysis};

/// Looks a flight up by number through the AviationStack API.
pub async fn lookup(query: LookupQuery, options: LookupOptions) -> Result<Flight, PlanError> {
    query.validate()?;
    let api_key = options.require_api_key()?;
    let params = query.to_url_params(api_key);
    let body = fetch::fetch_flights_json(&params, &options).await?;
    parse::parse_body(&body, &query.flight_number)
}
