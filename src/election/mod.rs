//! Electoral domain module.
//!
//! This module handles:
//! - Domain types and response shapes
//! - The D'Hondt seat allocator
//! - Text normalization and poll-to-candidate fuzzy matching
//! - The pact registry (names and display colors)
//! - The service orchestrating fetch, match, group and allocate

pub mod dhondt;
pub mod matching;
pub mod pactos;
pub mod service;
pub mod types;

pub use dhondt::dhondt_alloc;
pub use matching::{normalize, normalize_district, similarity};
pub use pactos::{PactInfo, PactRegistry};
pub use service::ElectoralService;
pub use types::{AllocationLevel, Candidate, District, Pact, Party};
