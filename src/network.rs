//! Network URL constants for the Beacon SDK.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Path of the price event stream, relative to the API base URL.
pub const PRICE_STREAM_PATH: &str = "/api/prices/stream";
