//! Network-related constants.

/// Default port for the lens API server.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default per-request deadline applied by the API layer, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response header carrying the generated request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
