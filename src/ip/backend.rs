//! Default provider: `good_lp` with the pure-Rust microlp engine.

use std::time::Instant;

use good_lp::{constraint, default_solver, Expression, ProblemVariables, ResolutionError,
    Solution, SolverModel, Variable, variable};

use super::{Comparison, IpModel, IpSolution, LinearExpr, SolveStatus, SolverError,
    SolverProvider, VarId};

/// `good_lp`/microlp-backed solver provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpProvider;

impl MicroLpProvider {
    /// Creates the provider.
    pub fn new() -> Self {
        Self
    }
}

impl SolverProvider for MicroLpProvider {
    fn create_model(&self) -> Box<dyn IpModel> {
        Box::new(GoodLpModel {
            variables: ProblemVariables::new(),
            handles: Vec::new(),
            constraints: Vec::new(),
        })
    }
}

struct GoodLpModel {
    variables: ProblemVariables,
    handles: Vec<Variable>,
    constraints: Vec<(LinearExpr, Comparison, f64)>,
}

impl IpModel for GoodLpModel {
    fn add_bool_var(&mut self, name: &str) -> VarId {
        let handle = self.variables.add(variable().binary().name(name));
        self.handles.push(handle);
        self.handles.len() - 1
    }

    fn add_constraint(&mut self, expr: LinearExpr, comparison: Comparison, bound: f64) {
        self.constraints.push((expr, comparison, bound));
    }

    fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    fn solve(self: Box<Self>) -> Result<IpSolution, SolverError> {
        let Self {
            variables,
            handles,
            constraints,
        } = *self;

        let started = Instant::now();

        // Feasibility only: constant objective.
        let mut problem = variables.minimise(0.0).using(default_solver);

        for (expr, comparison, bound) in &constraints {
            let mut lhs = Expression::default();
            for (var, coefficient) in expr.terms() {
                lhs += coefficient * handles[var];
            }
            problem = problem.with(match comparison {
                Comparison::LessOrEqual => constraint::leq(lhs, *bound),
                Comparison::Equal => constraint::eq(lhs, *bound),
                Comparison::GreaterOrEqual => constraint::geq(lhs, *bound),
            });
        }

        match problem.solve() {
            Ok(solution) => {
                let values = handles.iter().map(|h| solution.value(*h)).collect();
                Ok(IpSolution::new(
                    SolveStatus::Optimal,
                    values,
                    started.elapsed(),
                ))
            }
            Err(ResolutionError::Infeasible) => Ok(IpSolution::new(
                SolveStatus::Infeasible,
                Vec::new(),
                started.elapsed(),
            )),
            Err(err) => Err(SolverError::new(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solves_tiny_feasibility_model() {
        let provider = MicroLpProvider::new();
        let mut model = provider.create_model();

        let x = model.add_bool_var("x");
        let y = model.add_bool_var("y");
        // Exactly one of x, y.
        model.add_constraint(LinearExpr::sum([x, y]), Comparison::Equal, 1.0);
        // And it must be y.
        model.add_constraint(LinearExpr::sum([x]), Comparison::LessOrEqual, 0.0);

        let solution = model.solve().unwrap();
        assert!(solution.is_optimal());
        assert!(!solution.value(x));
        assert!(solution.value(y));
    }

    #[test]
    fn test_reports_infeasibility_as_status() {
        let provider = MicroLpProvider::new();
        let mut model = provider.create_model();

        let x = model.add_bool_var("x");
        model.add_constraint(LinearExpr::sum([x]), Comparison::GreaterOrEqual, 1.0);
        model.add_constraint(LinearExpr::sum([x]), Comparison::LessOrEqual, 0.0);

        let solution = model.solve().unwrap();
        assert_eq!(*solution.status(), SolveStatus::Infeasible);
    }

    #[test]
    fn test_weighted_terms() {
        let provider = MicroLpProvider::new();
        let mut model = provider.create_model();

        let vars: Vec<VarId> = (0..3).map(|i| model.add_bool_var(&format!("v{i}"))).collect();
        // v0 + 2·v1 + 3·v2 = 3, v0 forced on → v1 on, v2 off.
        let mut expr = LinearExpr::new();
        for (i, var) in vars.iter().enumerate() {
            expr.add_term(*var, (i + 1) as f64);
        }
        model.add_constraint(expr, Comparison::Equal, 3.0);
        model.add_constraint(LinearExpr::sum([vars[0]]), Comparison::GreaterOrEqual, 1.0);

        let solution = model.solve().unwrap();
        assert!(solution.is_optimal());
        assert!(solution.value(vars[0]));
        assert!(solution.value(vars[1]));
        assert!(!solution.value(vars[2]));
    }
}
