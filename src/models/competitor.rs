//! Competitor roster models.
//!
//! A competitor enters the draw with identity, federation, grade, and an
//! optional starting-block preference. Seed ranks are dense (1..=N) and
//! assigned by descending imported rank, so seed 1 is the strongest entry.

use serde::{Deserialize, Serialize};

/// Stable competitor identity within one draw.
///
/// IDs are dense roster ordinals: the competitor at roster position `i`
/// carries `CompetitorId(i)`. [`roster_from_entries`] establishes this
/// invariant; the solver relies on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CompetitorId(pub usize);

/// A coarse preferred start-order tier, requested by team managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartingBlock {
    /// Early start (block 1).
    Early,
    /// Mid-field start (block 2).
    Mid,
    /// Late start (block 3).
    Late,
}

impl StartingBlock {
    /// Maps a raw imported block number to a preference.
    ///
    /// `0` and values outside 1..=3 carry no preference.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Early),
            2 => Some(Self::Mid),
            3 => Some(Self::Late),
            _ => None,
        }
    }

    /// Numeric block value (1..=3).
    #[inline]
    pub fn value(self) -> u8 {
        match self {
            Self::Early => 1,
            Self::Mid => 2,
            Self::Late => 3,
        }
    }
}

/// An imported roster entry, as produced by the entry-list source.
///
/// Field names follow the interchange format (camelCase); the PascalCase
/// aliases accept files written by older tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Representing federation (nation) name.
    #[serde(alias = "Federation")]
    pub federation: String,
    /// Given name.
    #[serde(alias = "FirstName")]
    pub first_name: String,
    /// Family name.
    #[serde(alias = "LastName")]
    pub last_name: String,
    /// Competition class, e.g. "M21".
    #[serde(alias = "Grade")]
    pub grade: String,
    /// Imported ranking points (higher = stronger).
    #[serde(alias = "Rank")]
    pub rank: i32,
    /// Raw starting-block request (0 or absent = no preference).
    #[serde(default, alias = "Group")]
    pub group: Option<u8>,
    /// External (federation-issued) identifier.
    #[serde(alias = "Id")]
    pub id: i64,
}

/// A competitor in the draw roster, before heats are assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    /// Draw-internal identity (dense roster ordinal).
    pub id: CompetitorId,
    /// External (federation-issued) identifier.
    pub external_id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Representing federation (nation) name.
    pub federation: String,
    /// Competition class.
    pub grade: String,
    /// Imported ranking points.
    pub rank: i32,
    /// Dense seed rank (1..=N, 1 = strongest).
    pub seed_rank: usize,
    /// Starting-block preference, if any.
    pub block: Option<StartingBlock>,
}

impl Competitor {
    /// "First Last" display form.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Builds the draw roster from imported entries.
///
/// Entries are ordered by descending imported rank (ties keep input order),
/// then assigned dense seed ranks 1..=N and dense internal IDs.
pub fn roster_from_entries(mut entries: Vec<Entry>) -> Vec<Competitor> {
    entries.sort_by(|a, b| b.rank.cmp(&a.rank));

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| Competitor {
            id: CompetitorId(index),
            external_id: entry.id,
            first_name: entry.first_name,
            last_name: entry.last_name,
            federation: entry.federation,
            grade: entry.grade,
            rank: entry.rank,
            seed_rank: index + 1,
            block: entry.group.and_then(StartingBlock::from_raw),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, federation: &str, rank: i32, group: Option<u8>) -> Entry {
        Entry {
            federation: federation.into(),
            first_name: name.into(),
            last_name: "Tester".into(),
            grade: "M21".into(),
            rank,
            group,
            id: rank as i64,
        }
    }

    #[test]
    fn test_roster_ordering_and_seed_ranks() {
        let entries = vec![
            entry("Mid", "FIN", 5000, None),
            entry("Top", "SWE", 8000, Some(1)),
            entry("Low", "NOR", 3000, Some(0)),
        ];

        let roster = roster_from_entries(entries);

        assert_eq!(roster[0].first_name, "Top");
        assert_eq!(roster[1].first_name, "Mid");
        assert_eq!(roster[2].first_name, "Low");
        for (i, competitor) in roster.iter().enumerate() {
            assert_eq!(competitor.id, CompetitorId(i));
            assert_eq!(competitor.seed_rank, i + 1);
        }
    }

    #[test]
    fn test_block_preference_mapping() {
        assert_eq!(StartingBlock::from_raw(0), None);
        assert_eq!(StartingBlock::from_raw(1), Some(StartingBlock::Early));
        assert_eq!(StartingBlock::from_raw(2), Some(StartingBlock::Mid));
        assert_eq!(StartingBlock::from_raw(3), Some(StartingBlock::Late));
        assert_eq!(StartingBlock::from_raw(4), None);

        let roster = roster_from_entries(vec![
            entry("A", "FIN", 2, Some(3)),
            entry("B", "FIN", 1, None),
        ]);
        assert_eq!(roster[0].block, Some(StartingBlock::Late));
        assert_eq!(roster[1].block, None);
    }

    #[test]
    fn test_entry_accepts_legacy_field_names() {
        let raw = r#"{
            "Federation": "FIN",
            "FirstName": "Aino",
            "LastName": "Virtanen",
            "Grade": "W21",
            "Rank": 7400,
            "Group": 2,
            "Id": 12345
        }"#;

        let parsed: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.federation, "FIN");
        assert_eq!(parsed.group, Some(2));
    }
}
