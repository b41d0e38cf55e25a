//! Intento SDK - async Rust client for the Intento AI aggregation API
//!
//! This library shapes requests for the Intento REST endpoints (translation,
//! sentiment, dictionary, OCR, transcription and more), normalizes flexible
//! caller parameters into the wire schema and classifies API responses.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Command line interface
pub mod cli;
/// Connector, models and transport
pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    client::{CapabilityClient, IntentoConnector},
    config::{ClientOptions, ConnectorConfig, Credentials},
    errors::{IntentoError, Result},
    models::{
        AuthSpec, Capability, FulfillBody, FulfillParams, LanguagesQuery, ListParam,
        NewDelegatedCredential, Operation, ProviderSpec, ProvidersQuery, TextInput, UsageParams,
        Viewpoint,
    },
    transport::{RequestDescriptor, ReqwestTransport, Transport, TransportRequest, TransportResponse},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
