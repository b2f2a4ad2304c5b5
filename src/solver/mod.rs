//! Start-list drawing by iterative feasibility repair.
//!
//! The solver turns a seeded roster into a heat/timeslot assignment:
//! build a [`SolveContext`], then solve the full constraint model with
//! correction factor z = 0. If the model is infeasible, discard it,
//! widen the starting-block windows by one, and try again with a fresh
//! model — no warm starts, no carryover of solver state. The loop is
//! bounded; exhausting it is a hard error, not a degraded result.
//!
//! Attempts run strictly sequentially; the provider call is one opaque,
//! blocking operation.

mod context;
mod model;

pub use context::{heat_sizes, SolveContext};

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::error::DrawError;
use crate::ip::{IpSolution, SolveStatus, SolverError, SolverProvider};
use crate::models::{AssignedCompetitor, Competitor, NationSummary, StartList};
use model::{DrawModelBuilder, VarTable};

/// Default bound on the correction factor (so at most
/// `DEFAULT_MAX_CORRECTION + 1` attempts).
pub const DEFAULT_MAX_CORRECTION: u32 = 16;

/// Draws start lists against a [`SolverProvider`].
pub struct StartListSolver<P> {
    provider: P,
    max_correction: u32,
    deadline: Option<Duration>,
}

impl<P: SolverProvider> StartListSolver<P> {
    /// Creates a solver with the default correction bound and no deadline.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_correction: DEFAULT_MAX_CORRECTION,
            deadline: None,
        }
    }

    /// Sets the upper bound on the correction factor.
    pub fn with_max_correction(mut self, max_correction: u32) -> Self {
        self.max_correction = max_correction;
        self
    }

    /// Sets an overall deadline, checked between attempts.
    ///
    /// A single in-flight provider call is opaque and cannot be
    /// interrupted; the deadline bounds the loop, not one solve.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Draws a start list for `heats` heats from the given roster.
    ///
    /// The context is built once; each attempt rebuilds the variable
    /// space and every constraint family from scratch, with the
    /// starting-block windows widened by the current correction factor.
    pub fn solve<R: Rng + ?Sized>(
        &self,
        heats: usize,
        roster: Vec<Competitor>,
        nations: Vec<NationSummary>,
        rng: &mut R,
    ) -> Result<StartList, DrawError> {
        let context = SolveContext::build(heats, roster, nations, rng)?;
        let started = Instant::now();

        for correction in 0..=self.max_correction {
            if let Some(deadline) = self.deadline {
                if started.elapsed() >= deadline {
                    return Err(DrawError::Timeout {
                        attempts: correction,
                    });
                }
            }

            match self.attempt(&context, correction)? {
                Some(entries) => {
                    if correction == 0 {
                        info!("start times: optimal solution found");
                    } else {
                        info!(correction, "start times: solution found with correction factor");
                    }
                    return Ok(StartList::from_entries(entries));
                }
                None => {
                    debug!(correction, "attempt infeasible, widening block windows");
                }
            }
        }

        Err(DrawError::Infeasible {
            attempts: self.max_correction + 1,
            final_correction: self.max_correction,
        })
    }

    /// One independent attempt: fresh variables, fresh constraints, one
    /// blocking solve. `Ok(None)` means infeasible at this correction.
    fn attempt(
        &self,
        context: &SolveContext,
        correction: u32,
    ) -> Result<Option<Vec<AssignedCompetitor>>, DrawError> {
        let mut model = self.provider.create_model();
        let table = DrawModelBuilder::new(context).assemble(model.as_mut(), correction);
        debug!(
            correction,
            constraints = model.constraint_count(),
            "solving draw model"
        );

        let solution = model.solve()?;
        debug!(elapsed = ?solution.elapsed, "solver finished");

        match solution.status() {
            SolveStatus::Optimal => Ok(Some(materialize(context, &table, &solution))),
            SolveStatus::Infeasible => Ok(None),
            SolveStatus::Other(status) => Err(DrawError::Solver(SolverError::new(format!(
                "unexpected solver status: {status}"
            )))),
        }
    }
}

/// Decodes the chosen variables into assigned competitors.
fn materialize(
    context: &SolveContext,
    table: &VarTable,
    solution: &IpSolution,
) -> Vec<AssignedCompetitor> {
    let mut entries = Vec::with_capacity(context.roster_size());
    for (index, competitor) in context.competitors.iter().enumerate() {
        for heat in 0..context.heats {
            for timeslot in 0..context.timeslots_per_heat[heat] {
                if solution.value(table.get(index, heat, timeslot)) {
                    entries.push(AssignedCompetitor {
                        competitor: competitor.clone(),
                        heat,
                        timeslot,
                    });
                }
            }
        }
    }
    entries
}
