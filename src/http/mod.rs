//! HTTP client layer — `BeaconHttp`, one method per endpoint.

pub mod client;

pub use client::BeaconHttp;
