//! # Mail over Microsoft Graph
//!
//! Sends e-mail through the Graph `sendMail` endpoint using an
//! application-only bearer token.
//!
//! ## Overview
//!
//! This module provides:
//! - The [`Message`] model with addresses, bodies, priority, and attachments
//! - [`build_payload`], the pure transformation from a [`Message`] into the
//!   JSON shape the API expects
//! - [`MailTransport`], the authenticated dispatcher that posts the payload
//!   and classifies every remote failure

pub mod message;
pub mod payload;
pub mod transport;

pub use message::{Address, Attachment, Message};
pub use payload::{build_payload, Importance, MailPayload};
pub use transport::MailTransport;

pub use graph_core::error::{GraphError, Result};
