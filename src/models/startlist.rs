//! Start list (solution) model.
//!
//! A start list is a complete assignment of competitors to heats and
//! start timeslots. Entries are kept in start order: by heat, then by
//! timeslot within the heat.

use serde::{Deserialize, Serialize};

use super::Competitor;

/// A competitor with its resolved heat and start timeslot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedCompetitor {
    /// The competitor, with all roster attributes.
    #[serde(flatten)]
    pub competitor: Competitor,
    /// Resolved heat index (0-based).
    pub heat: usize,
    /// Resolved start timeslot within the heat (0-based).
    pub timeslot: usize,
}

/// A drawn start list in start order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartList {
    entries: Vec<AssignedCompetitor>,
}

impl StartList {
    /// Creates a start list, ordering entries by (heat, timeslot).
    pub fn from_entries(mut entries: Vec<AssignedCompetitor>) -> Self {
        entries.sort_by_key(|entry| (entry.heat, entry.timeslot));
        Self { entries }
    }

    /// All entries in start order.
    pub fn entries(&self) -> &[AssignedCompetitor] {
        &self.entries
    }

    /// Consumes the list, returning its entries in start order.
    pub fn into_entries(self) -> Vec<AssignedCompetitor> {
        self.entries
    }

    /// Number of assigned competitors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of heats present (highest heat index + 1).
    pub fn heat_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.heat + 1)
            .max()
            .unwrap_or(0)
    }

    /// Entries of one heat, in timeslot order.
    pub fn entries_for_heat(&self, heat: usize) -> Vec<&AssignedCompetitor> {
        self.entries
            .iter()
            .filter(|entry| entry.heat == heat)
            .collect()
    }

    /// Distinct grades, in order of first appearance.
    pub fn grades(&self) -> Vec<&str> {
        let mut grades: Vec<&str> = Vec::new();
        for entry in &self.entries {
            let grade = entry.competitor.grade.as_str();
            if !grades.contains(&grade) {
                grades.push(grade);
            }
        }
        grades
    }
}
