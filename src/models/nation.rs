//! Per-federation roster summary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Competitor;

/// A federation together with its competitor count in the roster.
///
/// The federation-balance constraints derive their per-heat bounds from
/// these counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationSummary {
    /// Federation name.
    pub name: String,
    /// Number of roster competitors representing it.
    pub competitors: usize,
}

impl NationSummary {
    /// Creates a summary for one federation.
    pub fn new(name: impl Into<String>, competitors: usize) -> Self {
        Self {
            name: name.into(),
            competitors,
        }
    }

    /// Tallies a roster into per-federation summaries, sorted by name.
    pub fn tally(roster: &[Competitor]) -> Vec<NationSummary> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for competitor in roster {
            *counts.entry(competitor.federation.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(name, competitors)| NationSummary::new(name, competitors))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompetitorId, roster_from_entries, Entry};

    fn competitor(id: usize, federation: &str) -> Competitor {
        let mut roster = roster_from_entries(vec![Entry {
            federation: federation.into(),
            first_name: "X".into(),
            last_name: "Y".into(),
            grade: "M21".into(),
            rank: 0,
            group: None,
            id: 0,
        }]);
        let mut c = roster.remove(0);
        c.id = CompetitorId(id);
        c
    }

    #[test]
    fn test_tally_counts_and_sorts() {
        let roster = vec![
            competitor(0, "SWE"),
            competitor(1, "FIN"),
            competitor(2, "SWE"),
            competitor(3, "NOR"),
        ];

        let nations = NationSummary::tally(&roster);
        assert_eq!(
            nations,
            vec![
                NationSummary::new("FIN", 1),
                NationSummary::new("NOR", 1),
                NationSummary::new("SWE", 2),
            ]
        );
    }

    #[test]
    fn test_tally_empty_roster() {
        assert!(NationSummary::tally(&[]).is_empty());
    }
}
