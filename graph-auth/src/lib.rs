//! # Application-Only Authentication
//!
//! OAuth 2.0 client-credentials token acquisition for the Microsoft Graph
//! client crates.
//!
//! ## Overview
//!
//! This module provides:
//! - The immutable [`AccessToken`] value with its cache lifetime
//! - [`TokenFetcher`], the single client-credentials exchange against the
//!   identity platform
//! - [`TokenCache`], a one-slot cache that collapses concurrent misses into
//!   a single in-flight fetch
//!
//! Tokens are cached for 45 minutes, deliberately below the identity
//! platform's usual 60-minute expiry, so a cached token is always presented
//! to Graph with headroom remaining.

pub mod cache;
pub mod fetcher;
pub mod token;

pub use cache::TokenCache;
pub use fetcher::{TokenFetcher, TokenSource};
pub use token::{AccessToken, TOKEN_TTL_SECONDS};

pub use graph_core::error::{GraphError, Result};
