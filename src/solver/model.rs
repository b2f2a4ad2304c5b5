//! Feasibility-model assembly.
//!
//! Creates one boolean decision variable per (competitor, heat, timeslot)
//! triple and adds the seven start-draw constraint families. The model
//! has no objective; any satisfying assignment is a valid draw.
//!
//! Families:
//! 1. Each competitor starts exactly once.
//! 2. Each (heat, timeslot) is taken by exactly one competitor.
//! 3. Federation counts per heat stay within the balance bounds.
//! 4. Consecutively seeded competitors spread across heats.
//! 5. No same-federation competitors in adjacent timeslots.
//! 6. Starting-block windows, widened by the correction factor.
//! 7. Each heat contains its anchor competitor.

use std::collections::HashMap;

use tracing::trace;

use super::context::SolveContext;
use crate::ip::{Comparison, IpModel, LinearExpr, VarId};

/// Variable handles for the full (competitor, heat, timeslot) space.
pub(crate) struct VarTable {
    heat_offsets: Vec<usize>,
    slots_total: usize,
    vars: Vec<VarId>,
}

impl VarTable {
    fn with_layout(timeslots_per_heat: &[usize], competitors: usize) -> Self {
        let mut heat_offsets = Vec::with_capacity(timeslots_per_heat.len());
        let mut offset = 0;
        for count in timeslots_per_heat {
            heat_offsets.push(offset);
            offset += count;
        }
        Self {
            heat_offsets,
            slots_total: offset,
            vars: Vec::with_capacity(offset * competitors),
        }
    }

    fn push(&mut self, var: VarId) {
        self.vars.push(var);
    }

    /// Handle of the variable for (competitor index, heat, timeslot).
    pub fn get(&self, competitor: usize, heat: usize, timeslot: usize) -> VarId {
        self.vars[competitor * self.slots_total + self.heat_offsets[heat] + timeslot]
    }
}

/// Assembles the draw feasibility model for one repair attempt.
pub(crate) struct DrawModelBuilder<'a> {
    context: &'a SolveContext,
}

impl<'a> DrawModelBuilder<'a> {
    pub fn new(context: &'a SolveContext) -> Self {
        Self { context }
    }

    /// Creates the full variable space and all seven constraint families.
    ///
    /// `correction` widens the starting-block windows (family 6); all
    /// other families are identical across attempts.
    pub fn assemble(&self, model: &mut dyn IpModel, correction: u32) -> VarTable {
        let table = self.create_variables(model);

        self.assign_each_competitor_once(model, &table);
        self.fill_each_slot_once(model, &table);
        self.balance_federations(model, &table);
        self.spread_similar_ranks(model, &table);
        self.separate_federation_neighbours(model, &table);
        self.apply_block_windows(model, &table, correction);
        self.pin_anchors(model, &table);

        table
    }

    fn create_variables(&self, model: &mut dyn IpModel) -> VarTable {
        let ctx = self.context;
        let mut table = VarTable::with_layout(&ctx.timeslots_per_heat, ctx.roster_size());

        for competitor in 0..ctx.roster_size() {
            for heat in 0..ctx.heats {
                for timeslot in 0..ctx.timeslots_per_heat[heat] {
                    table.push(model.add_bool_var(&format!("c{competitor}_h{heat}_t{timeslot}")));
                }
            }
        }

        table
    }

    /// Family 1: each competitor takes exactly one (heat, timeslot).
    fn assign_each_competitor_once(&self, model: &mut dyn IpModel, table: &VarTable) {
        let ctx = self.context;
        for competitor in 0..ctx.roster_size() {
            let mut expr = LinearExpr::new();
            for heat in 0..ctx.heats {
                for timeslot in 0..ctx.timeslots_per_heat[heat] {
                    expr.add_var(table.get(competitor, heat, timeslot));
                }
            }
            model.add_constraint(expr, Comparison::Equal, 1.0);
        }
        trace!(constraints = model.constraint_count(), "one slot per competitor");
    }

    /// Family 2: each (heat, timeslot) is taken by exactly one competitor.
    fn fill_each_slot_once(&self, model: &mut dyn IpModel, table: &VarTable) {
        let ctx = self.context;
        for heat in 0..ctx.heats {
            for timeslot in 0..ctx.timeslots_per_heat[heat] {
                let mut expr = LinearExpr::new();
                for competitor in 0..ctx.roster_size() {
                    expr.add_var(table.get(competitor, heat, timeslot));
                }
                model.add_constraint(expr, Comparison::Equal, 1.0);
            }
        }
        trace!(constraints = model.constraint_count(), "one competitor per slot");
    }

    /// Family 3: per heat, each federation's count stays within
    /// `[floor(c/H), 1 + floor((c-1)/H)]`.
    fn balance_federations(&self, model: &mut dyn IpModel, table: &VarTable) {
        let ctx = self.context;
        for nation in &ctx.nations {
            let count = nation.competitors as i64;
            let heats = ctx.heats as i64;
            let lower = 1 + (count - 1) / heats;
            let upper = count / heats;
            trace!(nation = %nation.name, lower, upper, "federation balance bounds");

            let members: Vec<usize> = ctx
                .competitors
                .iter()
                .enumerate()
                .filter(|(_, c)| c.federation == nation.name)
                .map(|(index, _)| index)
                .collect();

            for heat in 0..ctx.heats {
                let mut expr = LinearExpr::new();
                for &competitor in &members {
                    for timeslot in 0..ctx.timeslots_per_heat[heat] {
                        expr.add_var(table.get(competitor, heat, timeslot));
                    }
                }
                model.add_constraint(expr.clone(), Comparison::LessOrEqual, lower as f64);
                model.add_constraint(expr, Comparison::GreaterOrEqual, upper as f64);
            }
        }
        trace!(constraints = model.constraint_count(), "federation balance");
    }

    /// Family 4: of any three consecutively seeded competitors starting a
    /// seed group (rank ≡ 1 mod H), at most one per heat.
    fn spread_similar_ranks(&self, model: &mut dyn IpModel, table: &VarTable) {
        let ctx = self.context;
        let by_rank: HashMap<usize, usize> = ctx
            .competitors
            .iter()
            .enumerate()
            .map(|(index, c)| (c.seed_rank, index))
            .collect();

        for (index, competitor) in ctx.competitors.iter().enumerate() {
            if ctx.heats < 2 || competitor.seed_rank % ctx.heats != 1 {
                continue;
            }
            let (Some(&second), Some(&third)) = (
                by_rank.get(&(competitor.seed_rank + 1)),
                by_rank.get(&(competitor.seed_rank + 2)),
            ) else {
                continue;
            };

            for heat in 0..ctx.heats {
                let mut expr = LinearExpr::new();
                for timeslot in 0..ctx.timeslots_per_heat[heat] {
                    expr.add_var(table.get(index, heat, timeslot));
                    expr.add_var(table.get(second, heat, timeslot));
                    expr.add_var(table.get(third, heat, timeslot));
                }
                model.add_constraint(expr, Comparison::LessOrEqual, 1.0);
            }
        }
        trace!(constraints = model.constraint_count(), "similar-rank spreading");
    }

    /// Family 5: no federation occupies two adjacent timeslots of a heat.
    fn separate_federation_neighbours(&self, model: &mut dyn IpModel, table: &VarTable) {
        let ctx = self.context;
        for (first, c1) in ctx.competitors.iter().enumerate() {
            for (second, c2) in ctx.competitors.iter().enumerate() {
                if first == second || c1.federation != c2.federation {
                    continue;
                }
                for heat in 0..ctx.heats {
                    for timeslot in 0..ctx.timeslots_per_heat[heat].saturating_sub(1) {
                        let mut expr = LinearExpr::new();
                        expr.add_var(table.get(first, heat, timeslot));
                        expr.add_var(table.get(second, heat, timeslot + 1));
                        model.add_constraint(expr, Comparison::LessOrEqual, 1.0);
                    }
                }
            }
        }
        trace!(constraints = model.constraint_count(), "federation non-adjacency");
    }

    /// Family 6: starting-block windows.
    ///
    /// A competitor's "resolved timeslot" (the timeslot-weighted sum of
    /// its variables) must fall within the heat-equivalent window of its
    /// requested block, widened by ∓`correction`.
    fn apply_block_windows(&self, model: &mut dyn IpModel, table: &VarTable, correction: u32) {
        let ctx = self.context;
        let heats = ctx.heats as i64;
        let z = correction as i64;

        for (index, competitor) in ctx.competitors.iter().enumerate() {
            let Some(block) = competitor.block else {
                continue;
            };
            let value = block.value();

            let below = ctx.population_below(value) as i64;
            let through = ctx.population_through(value) as i64;
            let lower = (below - 1).div_euclid(heats) - z;
            let upper = (through - 1).div_euclid(heats) + z;
            trace!(
                competitor = %competitor.full_name(),
                block = value,
                lower,
                upper,
                "starting-block window"
            );

            let mut resolved_timeslot = LinearExpr::new();
            for heat in 0..ctx.heats {
                for timeslot in 0..ctx.timeslots_per_heat[heat] {
                    resolved_timeslot.add_term(table.get(index, heat, timeslot), timeslot as f64);
                }
            }

            if value > 1 {
                model.add_constraint(
                    resolved_timeslot.clone(),
                    Comparison::GreaterOrEqual,
                    lower as f64,
                );
            }
            if (value as usize) < ctx.heats {
                model.add_constraint(resolved_timeslot, Comparison::LessOrEqual, upper as f64);
            }
        }
        trace!(constraints = model.constraint_count(), "starting-block windows");
    }

    /// Family 7: each heat's anchor starts somewhere in that heat.
    fn pin_anchors(&self, model: &mut dyn IpModel, table: &VarTable) {
        let ctx = self.context;
        for (heat, anchor) in ctx.anchors.iter().enumerate() {
            let expr = LinearExpr::sum(
                (0..ctx.timeslots_per_heat[heat]).map(|timeslot| table.get(anchor.0, heat, timeslot)),
            );
            model.add_constraint(expr, Comparison::Equal, 1.0);
        }
        trace!(constraints = model.constraint_count(), "anchor fixing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DrawError;
    use crate::ip::{IpSolution, SolveStatus, SolverError};
    use crate::models::{roster_from_entries, Entry, NationSummary};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    /// Records variables and constraints without solving anything.
    #[derive(Default)]
    struct RecordingModel {
        vars: usize,
        constraints: Vec<(LinearExpr, Comparison, f64)>,
    }

    impl IpModel for RecordingModel {
        fn add_bool_var(&mut self, _name: &str) -> VarId {
            self.vars += 1;
            self.vars - 1
        }

        fn add_constraint(&mut self, expr: LinearExpr, comparison: Comparison, bound: f64) {
            self.constraints.push((expr, comparison, bound));
        }

        fn constraint_count(&self) -> usize {
            self.constraints.len()
        }

        fn solve(self: Box<Self>) -> Result<IpSolution, SolverError> {
            Ok(IpSolution::new(
                SolveStatus::Infeasible,
                Vec::new(),
                Duration::ZERO,
            ))
        }
    }

    fn context(
        heats: usize,
        specs: &[(&str, Option<u8>)],
    ) -> Result<SolveContext, DrawError> {
        let entries: Vec<Entry> = specs
            .iter()
            .enumerate()
            .map(|(i, (federation, group))| Entry {
                federation: federation.to_string(),
                first_name: format!("c{i}"),
                last_name: "T".into(),
                grade: "M21".into(),
                rank: 1000 - i as i32,
                group: *group,
                id: i as i64,
            })
            .collect();
        let competitors = roster_from_entries(entries);
        let nations = NationSummary::tally(&competitors);
        let mut rng = StdRng::seed_from_u64(9);
        SolveContext::build(heats, competitors, nations, &mut rng)
    }

    #[test]
    fn test_variable_space_covers_every_triple() {
        // 4 competitors, 2 heats of 2 slots → 4 × 4 variables.
        let ctx = context(2, &[("A", None), ("A", None), ("B", None), ("B", None)]).unwrap();
        let mut model = RecordingModel::default();
        DrawModelBuilder::new(&ctx).assemble(&mut model, 0);
        assert_eq!(model.vars, 16);
    }

    #[test]
    fn test_constraint_family_counts() {
        let ctx = context(2, &[("A", None), ("A", None), ("B", None), ("B", None)]).unwrap();
        let builder = DrawModelBuilder::new(&ctx);

        let mut model = RecordingModel::default();
        let table = builder.create_variables(&mut model);

        builder.assign_each_competitor_once(&mut model, &table);
        assert_eq!(model.constraint_count(), 4);

        builder.fill_each_slot_once(&mut model, &table);
        assert_eq!(model.constraint_count(), 8);

        // 2 nations × 2 heats × 2 inequalities.
        builder.balance_federations(&mut model, &table);
        assert_eq!(model.constraint_count(), 16);

        // Only the (1,2,3) triple exists; rank 3 lacks a rank-5 partner.
        builder.spread_similar_ranks(&mut model, &table);
        assert_eq!(model.constraint_count(), 18);

        // 4 ordered same-federation pairs × 2 heats × 1 adjacent pair.
        builder.separate_federation_neighbours(&mut model, &table);
        assert_eq!(model.constraint_count(), 26);

        // No block preferences.
        builder.apply_block_windows(&mut model, &table, 0);
        assert_eq!(model.constraint_count(), 26);

        builder.pin_anchors(&mut model, &table);
        assert_eq!(model.constraint_count(), 28);
    }

    #[test]
    fn test_federation_balance_bounds() {
        // 3 FIN competitors over 2 heats: lower = 1 + (3-1)/2 = 2, upper = 1.
        let ctx = context(2, &[("FIN", None), ("FIN", None), ("FIN", None), ("SWE", None)])
            .unwrap();
        let mut model = RecordingModel::default();
        let builder = DrawModelBuilder::new(&ctx);
        let table = builder.create_variables(&mut model);
        builder.balance_federations(&mut model, &table);

        let fin_bounds: Vec<(Comparison, f64)> = model
            .constraints
            .iter()
            .filter(|(expr, _, _)| expr.len() == 6) // 3 members × 2 slots
            .map(|(_, comparison, bound)| (*comparison, *bound))
            .collect();
        assert_eq!(
            fin_bounds,
            vec![
                (Comparison::LessOrEqual, 2.0),
                (Comparison::GreaterOrEqual, 1.0),
                (Comparison::LessOrEqual, 2.0),
                (Comparison::GreaterOrEqual, 1.0),
            ]
        );
    }

    #[test]
    fn test_block_windows_widen_with_correction() {
        // Blocks 1,1,1,2,2,2,3,3,3 over 3 heats.
        let specs: Vec<(&str, Option<u8>)> = (0..9)
            .map(|i| ("FIN", Some((i / 3 + 1) as u8)))
            .collect();
        let ctx = context(3, &specs).unwrap();
        let builder = DrawModelBuilder::new(&ctx);

        let bounds = |correction: u32| -> Vec<(Comparison, f64)> {
            let mut model = RecordingModel::default();
            let table = builder.create_variables(&mut model);
            builder.apply_block_windows(&mut model, &table, correction);
            model
                .constraints
                .iter()
                .map(|(_, comparison, bound)| (*comparison, *bound))
                .collect()
        };

        // Block 1: upper only (floor(2/3) = 0). Block 2: window [0, 1].
        // Block 3: lower only (floor(5/3) = 1).
        let at_zero = bounds(0);
        assert_eq!(at_zero.len(), 12);
        assert_eq!(
            at_zero.iter().filter(|(c, b)| *c == Comparison::LessOrEqual && *b == 0.0).count(),
            3
        );
        assert_eq!(
            at_zero.iter().filter(|(c, b)| *c == Comparison::GreaterOrEqual && *b == 1.0).count(),
            3
        );

        // z = 1 widens every bound by one.
        let at_one = bounds(1);
        assert_eq!(
            at_one.iter().filter(|(c, b)| *c == Comparison::LessOrEqual && *b == 1.0).count(),
            3
        );
        assert_eq!(
            at_one.iter().filter(|(c, b)| *c == Comparison::GreaterOrEqual && *b == 0.0).count(),
            3
        );
    }

    #[test]
    fn test_block_window_expression_weights_timeslots() {
        let specs: Vec<(&str, Option<u8>)> =
            vec![("FIN", Some(2)), ("SWE", Some(1)), ("NOR", Some(1)), ("EST", Some(1))];
        let ctx = context(2, &specs).unwrap();
        let builder = DrawModelBuilder::new(&ctx);

        let mut model = RecordingModel::default();
        let table = builder.create_variables(&mut model);
        builder.apply_block_windows(&mut model, &table, 0);

        // Every window expression spans all four slots with the timeslot
        // index as coefficient.
        for (expr, _, _) in &model.constraints {
            assert_eq!(expr.len(), 4);
            let coefficients: Vec<f64> = expr.terms().map(|(_, c)| c).collect();
            assert_eq!(coefficients, vec![0.0, 1.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_single_heat_has_no_rank_or_window_constraints() {
        let ctx = context(1, &[("A", Some(1)), ("B", Some(1)), ("C", Some(1))]).unwrap();
        let builder = DrawModelBuilder::new(&ctx);
        let mut model = RecordingModel::default();
        let table = builder.create_variables(&mut model);

        builder.spread_similar_ranks(&mut model, &table);
        // Block 1 in a single heat: no lower (block = 1), no upper (1 < 1 fails).
        builder.apply_block_windows(&mut model, &table, 0);
        assert_eq!(model.constraint_count(), 0);
    }
}
