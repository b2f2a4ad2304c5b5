//! Per-solve draw context.
//!
//! Derived once from the roster at the start of a solve call and shared,
//! read-only, by every repair attempt: heat sizes, starting-block
//! populations, and the anchor set.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::error::DrawError;
use crate::models::{Competitor, CompetitorId, NationSummary};

/// Immutable context for one draw.
#[derive(Debug, Clone)]
pub struct SolveContext {
    /// Number of heats.
    pub heats: usize,
    /// The seeded roster, in dense-ID order.
    pub competitors: Vec<Competitor>,
    /// Per-federation competitor counts.
    pub nations: Vec<NationSummary>,
    /// Timeslot count per heat. Sums to the roster size; counts differ
    /// across heats by at most 1.
    pub timeslots_per_heat: Vec<usize>,
    /// `(block value, population)` per observed starting block, ascending
    /// by block, with no-preference competitors folded into the smallest
    /// population (ties: lowest block).
    pub block_populations: Vec<(u8, usize)>,
    /// One anchor competitor per heat, pinned there to break symmetry and
    /// randomize the draw.
    pub anchors: Vec<CompetitorId>,
}

impl SolveContext {
    /// Builds the context for one draw.
    ///
    /// Fails fast on a zero heat count, an empty roster, a roster smaller
    /// than the heat count, or non-dense competitor IDs.
    pub fn build<R: Rng + ?Sized>(
        heats: usize,
        competitors: Vec<Competitor>,
        nations: Vec<NationSummary>,
        rng: &mut R,
    ) -> Result<Self, DrawError> {
        if heats == 0 {
            return Err(DrawError::Config("heat count must be positive".into()));
        }
        if competitors.is_empty() {
            return Err(DrawError::Config("competitor roster is empty".into()));
        }
        if competitors.len() < heats {
            return Err(DrawError::Config(format!(
                "roster of {} cannot fill {} heats",
                competitors.len(),
                heats
            )));
        }
        if competitors
            .iter()
            .enumerate()
            .any(|(index, c)| c.id != CompetitorId(index))
        {
            return Err(DrawError::Config(
                "roster IDs must be dense ordinals".into(),
            ));
        }

        let timeslots_per_heat = heat_sizes(competitors.len(), heats);
        debug!(?timeslots_per_heat, "competitors per heat");

        let block_populations = block_populations(&competitors);
        debug!(?block_populations, "competitors per starting block");

        let anchors = draw_anchors(&competitors, heats, rng);
        for (heat, id) in anchors.iter().enumerate() {
            info!(
                "{} fixed to heat {} as anchor",
                competitors[id.0].full_name(),
                heat + 1
            );
        }

        Ok(Self {
            heats,
            competitors,
            nations,
            timeslots_per_heat,
            block_populations,
            anchors,
        })
    }

    /// Roster size N.
    pub fn roster_size(&self) -> usize {
        self.competitors.len()
    }

    /// Cumulative population of blocks strictly below `block`.
    pub fn population_below(&self, block: u8) -> usize {
        self.block_populations
            .iter()
            .filter(|(b, _)| *b < block)
            .map(|(_, count)| count)
            .sum()
    }

    /// Cumulative population of blocks up to and including `block`.
    pub fn population_through(&self, block: u8) -> usize {
        self.block_populations
            .iter()
            .filter(|(b, _)| *b <= block)
            .map(|(_, count)| count)
            .sum()
    }
}

/// Splits `n` competitors into `heats` timeslot counts, as evenly as
/// possible: floor(n/heats) everywhere, with the remainder added to the
/// first heats.
pub fn heat_sizes(n: usize, heats: usize) -> Vec<usize> {
    let mut sizes = vec![n / heats; heats];
    for size in sizes.iter_mut().take(n % heats) {
        *size += 1;
    }
    sizes
}

/// Tallies competitors per observed starting block, then folds everyone
/// without a preference into the block with the smallest population
/// (ties broken by the lowest block value).
fn block_populations(competitors: &[Competitor]) -> Vec<(u8, usize)> {
    let mut populations: Vec<(u8, usize)> = Vec::new();
    let mut unassigned = 0usize;

    for competitor in competitors {
        match competitor.block {
            Some(block) => {
                let value = block.value();
                match populations.binary_search_by_key(&value, |(b, _)| *b) {
                    Ok(index) => populations[index].1 += 1,
                    Err(index) => populations.insert(index, (value, 1)),
                }
            }
            None => unassigned += 1,
        }
    }

    if unassigned > 0 {
        if let Some(min_index) = populations
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, count))| *count)
            .map(|(index, _)| index)
        {
            populations[min_index].1 += unassigned;
        }
    }

    populations
}

/// Draws one anchor per heat via a uniform shuffle of the roster.
fn draw_anchors<R: Rng + ?Sized>(
    competitors: &[Competitor],
    heats: usize,
    rng: &mut R,
) -> Vec<CompetitorId> {
    let mut ids: Vec<CompetitorId> = competitors.iter().map(|c| c.id).collect();
    ids.shuffle(rng);
    ids.truncate(heats);
    ids
}
