//! Start-list drawing for multi-heat race events.
//!
//! Assigns N competitors to H heats and, within each heat, to an ordered
//! sequence of start timeslots, subject to the fairness and logistics
//! rules of multi-heat racing: one start per competitor, one competitor
//! per slot, federation balance across heats, spreading of similarly
//! seeded competitors, no same-federation back-to-back starts,
//! starting-block requests, and one pinned anchor per heat.
//!
//! The rules are encoded as a 0/1 linear feasibility problem with no
//! objective; an iterative repair loop widens the starting-block windows
//! by an integer correction factor until the solver finds any satisfying
//! assignment.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Entry`, `Competitor`, `NationSummary`,
//!   `AssignedCompetitor`, `StartList`
//! - **`solver`**: The draw core — context building, constraint-model
//!   assembly, and the feasibility-repair loop
//! - **`ip`**: Minimal integer-programming provider abstraction and the
//!   bundled `good_lp`/microlp backend
//! - **`validation`**: Roster checks before the draw, bijection checks
//!   after it
//! - **`io`**: JSON entry import, JSON/XML start-list export
//! - **`config`**: Settings file with closed importer/exporter enums and
//!   ordered log verbosity

pub mod config;
pub mod error;
pub mod io;
pub mod ip;
pub mod models;
pub mod solver;
pub mod validation;
