//! Compliance core for fleet and asset administration.
//!
//! - [`compliance`]: expiry classification, scoring, hierarchy assembly, and fleet reports.
//! - [`notifications`]: preference matrix and channel routing.
//! - [`import`]: CSV loading of entities and dated items.

pub mod compliance;
pub mod config;
pub mod error;
pub mod import;
pub mod notifications;
pub mod telemetry;
