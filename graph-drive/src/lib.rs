//! # Drive Access over Microsoft Graph
//!
//! Path-addressed file operations against a Graph drive, authenticated with
//! the same application-only token cache as the mail crate.
//!
//! ## Overview
//!
//! This module provides:
//! - [`DriveClient`] with item metadata, folder listing, download, upload,
//!   and delete operations
//! - [`DriveItem`] and its file/folder facets as the API returns them
//!
//! Pagination cursors and delta sync are out of scope; a listing returns the
//! first page the API serves.

pub mod client;
pub mod types;

pub use client::DriveClient;
pub use types::{DriveChildrenResponse, DriveItem, FileFacet, FolderFacet};

pub use graph_core::error::{GraphError, Result};
