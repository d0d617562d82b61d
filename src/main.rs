use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jetlag::error::PlanError;
use jetlag::fetch::{LookupOptions, DEFAULT_BASE_URL};
use jetlag::model::{FitnessLevel, Flight, Leg, LookupResponse, RecoveryPlan, UserProfile};
use jetlag::query::{LookupQuery, PlanRequest};
use jetlag::table;
use jetlag::RecoveryPlanEngine;

#[derive(Parser)]
#[command(
    name = "jetlag",
    about = "Jet-lag recovery plans from the terminal",
    version,
    after_help = "\
Examples:
  jetlag plan --sample
  jetlag plan -f ZRH -t MIA --depart 2025-08-18T13:05:00+02:00 --arrive 2025-08-18T17:30:00-04:00
  jetlag plan -n LX64 --fitness athlete
  jetlag lookup LX64 --date 2025-08-18 --json

Agent-optimized:
  jetlag plan -n LX64 --compact"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(
        about = "Compute a jet-lag recovery plan",
        long_about = "Compute a jet-lag recovery plan for one flight.\n\
            Give the route with -f/-t/--depart/--arrive, or only -n to look the flight up.\n\
            Timestamps are local ISO-8601 with a UTC offset; the offset difference drives \
            the exercise recommendation.",
        after_help = "\
Examples:
  From flags:   jetlag plan -f ZRH -t MIA --depart 2025-08-18T13:05:00+02:00 --arrive 2025-08-18T17:30:00-04:00
  By number:    jetlag plan -n LX64 --date 2025-08-18
  Sample:       jetlag plan --sample --fitness intermediate
  JSON output:  jetlag plan --sample --json --pretty
  Strict:       jetlag plan --sample --strict"
    )]
    Plan(PlanArgs),
    #[command(about = "Look up a flight by number")]
    Lookup(LookupArgs),
    #[command(about = "Start MCP server for AI agents (stdio transport)")]
    Mcp,
}

#[derive(clap::Args, Clone)]
struct ApiArgs {
    #[arg(
        long,
        env = "AVIATIONSTACK_API_KEY",
        hide_env_values = true,
        value_name = "KEY",
        help = "AviationStack API key for flight lookup"
    )]
    api_key: Option<String>,

    #[arg(
        long,
        env = "JETLAG_API_URL",
        default_value = DEFAULT_BASE_URL,
        value_name = "URL",
        hide = true
    )]
    api_url: String,

    #[arg(long, value_name = "URL", help = "HTTP or SOCKS5 proxy")]
    proxy: Option<String>,

    #[arg(long, default_value = "30", value_name = "SECS", help = "Request timeout")]
    timeout: u64,
}

impl ApiArgs {
    fn lookup_options(&self) -> LookupOptions {
        LookupOptions {
            api_key: self.api_key.clone(),
            base_url: self.api_url.clone(),
            proxy: self.proxy.clone(),
            timeout: self.timeout,
        }
    }
}

#[derive(clap::Args)]
struct PlanArgs {
    #[arg(short, long, value_name = "IATA", help = "Departure airport code")]
    from: Option<String>,

    #[arg(short, long, value_name = "IATA", help = "Arrival airport code")]
    to: Option<String>,

    #[arg(
        long,
        value_name = "TIMESTAMP",
        help = "Local departure time",
        long_help = "Local departure time, ISO-8601 with UTC offset \
            (e.g. 2025-08-18T13:05:00+02:00)."
    )]
    depart: Option<String>,

    #[arg(
        long,
        value_name = "TIMESTAMP",
        help = "Local arrival time",
        long_help = "Local arrival time, ISO-8601 with UTC offset \
            (e.g. 2025-08-18T17:30:00-04:00)."
    )]
    arrive: Option<String>,

    #[arg(long, value_name = "NAME", help = "Departure city (defaults to airport code)")]
    from_city: Option<String>,

    #[arg(long, value_name = "NAME", help = "Arrival city (defaults to airport code)")]
    to_city: Option<String>,

    #[arg(long, value_name = "TZ", help = "Departure timezone name, informational")]
    from_tz: Option<String>,

    #[arg(long, value_name = "TZ", help = "Arrival timezone name, informational")]
    to_tz: Option<String>,

    #[arg(
        short = 'n',
        long,
        value_name = "NUMBER",
        help = "Flight number (looked up when no route is given)"
    )]
    flight: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD", help = "Flight date for lookup")]
    date: Option<String>,

    #[arg(long, help = "Use the LX64 Zurich to Miami sample flight")]
    sample: bool,

    #[arg(
        long,
        default_value = "beginner",
        value_name = "LEVEL",
        help = "Fitness level [beginner, intermediate, advanced, athlete]"
    )]
    fitness: String,

    #[arg(long = "condition", value_name = "TAG", help = "Health condition (repeatable)")]
    conditions: Vec<String>,

    #[arg(long, default_value = "cli", value_name = "ID", help = "User id")]
    user_id: String,

    #[arg(long, help = "Fail when a timestamp has no UTC offset")]
    strict: bool,

    #[arg(long, help = "One-line-per-item output (recommended for scripts and AI agents)")]
    compact: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[command(flatten)]
    api: ApiArgs,
}

#[derive(clap::Args)]
struct LookupArgs {
    #[arg(value_name = "NUMBER", help = "Flight number (e.g. LX64)")]
    flight: String,

    #[arg(long, value_name = "YYYY-MM-DD", help = "Flight date")]
    date: Option<String>,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[command(flatten)]
    api: ApiArgs,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("jetlag=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn error_code(err: &PlanError) -> i32 {
    match err {
        PlanError::InvalidAirport(_)
        | PlanError::InvalidTimestamp(_)
        | PlanError::InvalidDate(_)
        | PlanError::InvalidFlightNumber(_)
        | PlanError::MissingFlightNumber
        | PlanError::MissingOffset { .. }
        | PlanError::Validation(_) => 2,
        PlanError::Timeout
        | PlanError::ConnectionFailed(_)
        | PlanError::DnsResolution(_)
        | PlanError::TlsError(_)
        | PlanError::ProxyError(_) => 3,
        PlanError::RateLimited => 4,
        PlanError::HttpStatus(_) | PlanError::Upstream(_) => 5,
        PlanError::JsonParse(_) => 6,
        PlanError::FlightNotFound(_) => 7,
        PlanError::MissingApiKey => 8,
        PlanError::Server(_) => 1,
    }
}

fn error_kind(err: &PlanError) -> &'static str {
    match err {
        PlanError::InvalidAirport(_) => "invalid_airport",
        PlanError::InvalidTimestamp(_) => "invalid_timestamp",
        PlanError::InvalidDate(_) => "invalid_date",
        PlanError::InvalidFlightNumber(_) => "invalid_flight_number",
        PlanError::MissingFlightNumber => "missing_flight_number",
        PlanError::MissingOffset { .. } => "missing_offset",
        PlanError::Validation(_) => "validation_error",
        PlanError::Timeout => "timeout",
        PlanError::ConnectionFailed(_) => "connection_failed",
        PlanError::DnsResolution(_) => "dns_error",
        PlanError::TlsError(_) => "tls_error",
        PlanError::ProxyError(_) => "proxy_error",
        PlanError::RateLimited => "rate_limited",
        PlanError::HttpStatus(_) => "http_error",
        PlanError::Upstream(_) => "upstream_error",
        PlanError::JsonParse(_) => "parse_error",
        PlanError::FlightNotFound(_) => "not_found",
        PlanError::MissingApiKey => "missing_api_key",
        PlanError::Server(_) => "server_error",
    }
}

fn die(err: &PlanError, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": error_kind(err),
                "message": err.to_string(),
            }
        });
        println!("{json}");
    } else {
        eprintln!("error: {err}");
    }
    process::exit(error_code(err));
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), PlanError> {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| PlanError::Validation(format!("failed to encode output: {e}")))?;
    println!("{output}");
    Ok(())
}

fn has_route(args: &PlanArgs) -> bool {
    args.from.is_some() || args.to.is_some() || args.depart.is_some() || args.arrive.is_some()
}

fn required<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str, PlanError> {
    value
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| PlanError::Validation(format!("{flag} is required (or use -n/--flight or --sample)")))
}

fn build_flight_from_flags(args: &PlanArgs) -> Result<Flight, PlanError> {
    let from = required(&args.from, "--from")?.to_uppercase();
    let to = required(&args.to, "--to")?.to_uppercase();
    let depart = required(&args.depart, "--depart")?;
    let arrive = required(&args.arrive, "--arrive")?;

    Ok(Flight {
        flight_number: args.flight.clone().unwrap_or_default(),
        departure: Leg {
            city: args.from_city.clone().unwrap_or_else(|| from.clone()),
            airport: from,
            time: depart.to_string(),
            timezone: args.from_tz.clone().unwrap_or_default(),
        },
        arrival: Leg {
            city: args.to_city.clone().unwrap_or_else(|| to.clone()),
            airport: to,
            time: arrive.to_string(),
            timezone: args.to_tz.clone().unwrap_or_default(),
        },
    })
}

async fn resolve_flight(args: &PlanArgs) -> Result<Flight, PlanError> {
    if args.date.is_some() && (args.sample || has_route(args)) {
        return Err(PlanError::Validation(
            "--date only applies when looking a flight up with -n/--flight alone".into(),
        ));
    }

    if args.sample {
        if has_route(args) || args.flight.is_some() {
            return Err(PlanError::Validation(
                "--sample cannot be combined with route flags or --flight".into(),
            ));
        }
        return Ok(Flight::sample());
    }

    match (&args.flight, has_route(args)) {
        (Some(number), false) => {
            let query = LookupQuery::new(number, args.date.as_deref());
            jetlag::lookup(query, args.api.lookup_options()).await
        }
        _ => build_flight_from_flags(args),
    }
}

async fn run_plan(args: &PlanArgs) -> Result<RecoveryPlan, PlanError> {
    let profile = UserProfile {
        id: args.user_id.clone(),
        fitness_level: FitnessLevel::from_str_loose(&args.fitness)?,
        health_conditions: args.conditions.clone(),
    };

    let request = PlanRequest {
        flight: resolve_flight(args).await?,
        profile,
    };
    request.validate()?;

    let engine = RecoveryPlanEngine::default();
    if args.strict {
        return engine.compute_strict(&request.flight, &request.profile);
    }

    for (leg, missing) in request.legs_missing_offset() {
        eprintln!(
            "warning: {leg} time \"{}\" has no UTC offset — planning with zero time shift",
            missing.time
        );
    }

    Ok(engine.compute(&request.flight, &request.profile))
}

fn print_plan(plan: &RecoveryPlan, args: &PlanArgs) -> Result<(), PlanError> {
    if args.compact {
        println!("{}", table::render_compact(plan));
    } else if args.json || args.pretty {
        print_json(plan, args.pretty)?;
    } else {
        println!("{}", table::render(plan));
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Mcp => {
            if let Err(e) = jetlag::mcp::run(LookupOptions::from_env()).await {
                die(&e, false);
            }
        }
        Commands::Plan(args) => {
            let json_mode = args.json || args.pretty;
            let result = match run_plan(&args).await {
                Ok(plan) => print_plan(&plan, &args),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                die(&e, json_mode);
            }
        }
        Commands::Lookup(args) => {
            let json_mode = args.json || args.pretty;
            let query = LookupQuery::new(&args.flight, args.date.as_deref());
            match jetlag::lookup(query, args.api.lookup_options()).await {
                Ok(flight) if json_mode => {
                    let response = LookupResponse {
                        flight_data: flight,
                    };
                    if let Err(e) = print_json(&response, args.pretty) {
                        die(&e, json_mode);
                    }
                }
                Ok(flight) => println!("{}", table::render_flight(&flight)),
                Err(e) => die(&e, json_mode),
            }
        }
    }
}
