//! core
//!
//! Core domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Points, ids, and boundary curves
//! - [`graph`] - Lane graph of lanelets and shared curves
//! - [`version`] - Dotted format version parsing and gating
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Curves are referenced by id, never owned by lanelets
//! - Version problems are values, not errors

pub mod config;
pub mod graph;
pub mod types;
pub mod version;
