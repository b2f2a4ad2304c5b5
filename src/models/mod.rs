//! Start-draw domain models.
//!
//! Core data types for the draw: imported entries, the seeded competitor
//! roster, per-federation summaries, and the solved start list.
//!
//! | Type | Role |
//! |------|------|
//! | `Entry` | Raw imported roster record |
//! | `Competitor` | Seeded roster member (no heat yet) |
//! | `NationSummary` | Federation → competitor count |
//! | `AssignedCompetitor` | Competitor + resolved heat/timeslot |
//! | `StartList` | Ordered solution container |

mod competitor;
mod nation;
mod startlist;

pub use competitor::{roster_from_entries, Competitor, CompetitorId, Entry, StartingBlock};
pub use nation::NationSummary;
pub use startlist::{AssignedCompetitor, StartList};
