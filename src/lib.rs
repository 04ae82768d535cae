//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`graph-mail`, `graph-drive`). Host applications can
//! depend on `graph-client-workspace` and enable the documented features
//! without needing to wire each crate individually.
