//! # Graph Client Core
//!
//! Shared foundation for the Microsoft Graph client crates.
//!
//! ## Overview
//!
//! This crate provides:
//! - The `HttpClient` abstraction and its reqwest-backed implementation
//! - The shared `GraphError` taxonomy used by every remote call
//! - Validated client configuration (`GraphConfig`)
//! - `tracing` subscriber setup for host applications

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;

pub use client::ReqwestHttpClient;
pub use config::{ConfigError, GraphConfig, GraphConfigBuilder};
pub use error::{GraphError, Result};
pub use http::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{init_logging, LogFormat, LoggingConfig};
