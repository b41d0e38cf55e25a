//! Core connector: configuration, request shaping, transport and client

/// Connector and capability handles
pub mod client;
/// Credentials, options and file/env configuration
pub mod config;
/// Error types
pub mod errors;
/// Capabilities, parameters and wire bodies
pub mod models;
/// Parameter normalization
pub mod params;
/// Request descriptors and the HTTP transport seam
pub mod transport;
