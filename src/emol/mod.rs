//! Emol feed module.
//!
//! This module handles:
//! - Wire types for the Emol CSV/JSON feeds and the poll API
//! - The feed client (roster CSV, zone database, encuestas)

pub mod client;
pub mod types;

pub use client::EmolClient;
pub use types::{zone_code, PollEntry, RosterRow, ZoneDb, ZoneEntry};
