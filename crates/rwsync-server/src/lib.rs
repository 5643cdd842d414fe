//! rwsync Server - REST API for the registration connector
//!
//! This crate provides the HTTP surface of the connector:
//!
//! - **Registration**: inbound "register dataset" requests, recorded as the
//!   dataset's lifecycle status in the registry
//! - **Data access**: query, download and field listing, always rejected
//! - **Health**: liveness and configured provider
//!
//! The server binary also runs batch resync on a fixed interval.
//!
//! # API Documentation
//!
//! When running the server, interactive API documentation is available
//! at `/swagger-ui`.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::create_router;
pub use state::{AppState, ConnectorService, build_service};
