use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(
        "request timed out — the flight data service may be slow or unreachable. \
         Try increasing --timeout or check your connection"
    )]
    Timeout,

    #[error("connection failed — check your internet connection ({0})")]
    ConnectionFailed(String),

    #[error("DNS resolution failed for {0} — check your internet connection")]
    DnsResolution(String),

    #[error("proxy error — check your --proxy URL is correct ({0})")]
    ProxyError(String),

    #[error("TLS/SSL error — connection to the flight data service failed ({0})")]
    TlsError(String),

    #[error(
        "rate limited by the flight data service (HTTP 429) — \
         your plan's monthly request quota may be exhausted"
    )]
    RateLimited,

    #[error("unexpected HTTP status {0} from the flight data service")]
    HttpStatus(u16),

    #[error("flight data service error — {0}")]
    Upstream(String),

    #[error("failed to parse flight data response — {0}")]
    JsonParse(String),

    #[error("flight \"{0}\" not found — check the flight number and date")]
    FlightNotFound(String),

    #[error(
        "API key not configured — pass --api-key or set AVIATIONSTACK_API_KEY \
         (free keys at aviationstack.com)"
    )]
    MissingApiKey,

    #[error("flight number is required (e.g. LX64, BA 117)")]
    MissingFlightNumber,

    #[error("invalid flight number \"{0}\" — expected an airline code and number (e.g. LX64)")]
    InvalidFlightNumber(String),

    #[error("invalid airport code \"{0}\" — must be exactly 3 letters (e.g. ZRH, MIA, NRT)")]
    InvalidAirport(String),

    #[error(
        "invalid timestamp \"{0}\" — must be ISO-8601 local time with UTC offset \
         (e.g. 2025-08-18T13:05:00+02:00)"
    )]
    InvalidTimestamp(String),

    #[error("invalid date \"{0}\" — must be YYYY-MM-DD format (e.g. 2025-08-18)")]
    InvalidDate(String),

    #[error(
        "{leg} time \"{timestamp}\" has no UTC offset — append one such as +02:00 \
         or drop --strict to plan with a zero time shift"
    )]
    MissingOffset {
        leg: &'static str,
        timestamp: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("MCP server error: {0}")]
    Server(String),
}

/// The request URI carries the API key in its query string, so the message
/// keeps only scheme, host, port and path.
pub fn from_http_error(err: wreq::Error) -> PlanError {
    let endpoint = err.uri().map(|uri| {
        let port = uri.port_u16().map(|p| format!(":{p}")).unwrap_or_default();
        format!(
            "{}://{}{port}{}",
            uri.scheme_str().unwrap_or("http"),
            uri.host().unwrap_or_default(),
            uri.path()
        )
    });
    let err = err.without_uri();
    let msg = match endpoint {
        Some(endpoint) => format!("{endpoint}: {err}"),
        None => err.to_string(),
    };
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return PlanError::Timeout;
    }

    if err.is_dns() {
        return PlanError::DnsResolution(msg);
    }

    if err.is_proxy_connect() || lower.contains("proxy") || lower.contains("socks") {
        return PlanError::ProxyError(msg);
    }

    if err.is_connect() {
        return PlanError::ConnectionFailed(msg);
    }

    if err.is_tls() || lower.contains("certificate") {
        return PlanError::TlsError(msg);
    }

    PlanError::ConnectionFailed(msg)
}
