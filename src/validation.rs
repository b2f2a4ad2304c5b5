//! Roster and start-list validation.
//!
//! Checks structural integrity of the roster before the draw and of the
//! drawn start list after it. Detects:
//! - Duplicate or non-dense competitor IDs
//! - Gaps in the dense seed ranking
//! - Rosters too small for the heat count
//! - Start lists that are not a bijection onto the valid slots
//!
//! A post-draw failure is fatal to the caller: the assignment is
//! discarded, never exported.

use std::collections::HashSet;

use crate::models::{Competitor, CompetitorId, StartList};
use crate::solver::heat_sizes;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The roster has no competitors.
    EmptyRoster,
    /// Fewer competitors than heats.
    TooFewCompetitors,
    /// A competitor ID is duplicated or out of dense order.
    NonDenseId,
    /// Seed ranks are not exactly 1..=N.
    SeedRankGap,
    /// A drawn competitor is missing from, or foreign to, the roster.
    RosterMismatch,
    /// A (heat, timeslot) pair was drawn more than once.
    SlotCollision,
    /// A heat or timeslot index is outside the valid range.
    SlotOutOfRange,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the roster before any modeling work.
///
/// Checks:
/// 1. The roster is non-empty and at least as large as the heat count.
/// 2. Competitor IDs are dense ordinals (position `i` carries ID `i`).
/// 3. Seed ranks are exactly 1..=N in roster order.
pub fn validate_roster(heats: usize, roster: &[Competitor]) -> ValidationResult {
    let mut errors = Vec::new();

    if roster.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRoster,
            "competitor roster is empty",
        ));
        return Err(errors);
    }

    if roster.len() < heats {
        errors.push(ValidationError::new(
            ValidationErrorKind::TooFewCompetitors,
            format!("roster of {} cannot fill {} heats", roster.len(), heats),
        ));
    }

    for (index, competitor) in roster.iter().enumerate() {
        if competitor.id != CompetitorId(index) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonDenseId,
                format!(
                    "competitor at position {index} carries ID {:?}",
                    competitor.id
                ),
            ));
        }
        if competitor.seed_rank != index + 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::SeedRankGap,
                format!(
                    "competitor at position {index} carries seed rank {}",
                    competitor.seed_rank
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a drawn start list against the roster it was drawn from.
///
/// Checks:
/// 1. Exactly the roster's competitors appear, each once.
/// 2. Heat indexes lie in [0, heats) and timeslots in [0, size(heat)).
/// 3. The (heat, timeslot) pairs are all distinct — together with the
///    counts this makes the assignment a bijection onto the valid slots.
pub fn validate_start_list(
    roster: &[Competitor],
    start_list: &StartList,
    heats: usize,
) -> ValidationResult {
    let mut errors = Vec::new();
    let sizes = heat_sizes(roster.len(), heats);

    let roster_ids: HashSet<CompetitorId> = roster.iter().map(|c| c.id).collect();
    let mut seen_ids: HashSet<CompetitorId> = HashSet::new();
    let mut seen_slots: HashSet<(usize, usize)> = HashSet::new();

    for entry in start_list.entries() {
        let id = entry.competitor.id;
        if !roster_ids.contains(&id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::RosterMismatch,
                format!("{} was not in the roster", entry.competitor.full_name()),
            ));
        }
        if !seen_ids.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::RosterMismatch,
                format!("{} drawn more than once", entry.competitor.full_name()),
            ));
        }

        if entry.heat >= heats || entry.timeslot >= sizes[entry.heat] {
            errors.push(ValidationError::new(
                ValidationErrorKind::SlotOutOfRange,
                format!(
                    "heat {} timeslot {} outside the draw",
                    entry.heat, entry.timeslot
                ),
            ));
        } else if !seen_slots.insert((entry.heat, entry.timeslot)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SlotCollision,
                format!("heat {} timeslot {} drawn twice", entry.heat, entry.timeslot),
            ));
        }
    }

    for competitor in roster {
        if !seen_ids.contains(&competitor.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::RosterMismatch,
                format!("{} missing from the start list", competitor.full_name()),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
