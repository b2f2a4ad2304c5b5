//! Integer-programming solver abstraction.
//!
//! The draw core formulates a pure 0/1 feasibility problem — boolean
//! variables, linear constraints, no objective — and hands it to an
//! opaque provider. Any engine exposing this minimal surface can back
//! the draw; [`MicroLpProvider`] is the bundled default.
//!
//! One model is built per repair attempt and solved exactly once; there
//! is no incremental re-solving and no shared solver state.

mod backend;

pub use backend::MicroLpProvider;

use std::time::Duration;

use thiserror::Error;

/// Handle to a boolean decision variable within one model.
pub type VarId = usize;

/// A sparse linear expression over model variables.
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sums the given variables with unit coefficients.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        let mut expr = Self::new();
        for var in vars {
            expr.add_var(var);
        }
        expr
    }

    /// Appends a variable with coefficient 1.
    pub fn add_var(&mut self, var: VarId) {
        self.add_term(var, 1.0);
    }

    /// Appends a `coefficient × variable` term.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// Iterates the `(variable, coefficient)` terms.
    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().copied()
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the expression has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Direction of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// expression ≤ bound
    LessOrEqual,
    /// expression = bound
    Equal,
    /// expression ≥ bound
    GreaterOrEqual,
}

/// Terminal status reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// A satisfying assignment was found.
    Optimal,
    /// The constraint set admits no assignment.
    Infeasible,
    /// Any other terminal status the engine reports.
    Other(String),
}

/// A provider fault: resource exhaustion, numeric failure, or any
/// engine-internal error distinct from infeasibility.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SolverError {
    /// Engine-reported description.
    pub message: String,
}

impl SolverError {
    /// Creates a fault with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of one solve call.
#[derive(Debug, Clone)]
pub struct IpSolution {
    status: SolveStatus,
    values: Vec<f64>,
    /// Wall time the engine spent solving.
    pub elapsed: Duration,
}

impl IpSolution {
    /// Creates a solution from raw engine output.
    pub fn new(status: SolveStatus, values: Vec<f64>, elapsed: Duration) -> Self {
        Self {
            status,
            values,
            elapsed,
        }
    }

    /// Terminal status of the solve.
    pub fn status(&self) -> &SolveStatus {
        &self.status
    }

    /// Whether a satisfying assignment was found.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Rounded 0/1 value of a boolean variable.
    ///
    /// Unknown variables read as 0.
    pub fn value(&self, var: VarId) -> bool {
        self.values.get(var).is_some_and(|v| *v > 0.5)
    }
}

/// A feasibility model under construction.
pub trait IpModel {
    /// Adds a boolean decision variable and returns its handle.
    fn add_bool_var(&mut self, name: &str) -> VarId;

    /// Adds a linear constraint `expr <op> bound`.
    fn add_constraint(&mut self, expr: LinearExpr, comparison: Comparison, bound: f64);

    /// Number of constraints added so far.
    fn constraint_count(&self) -> usize;

    /// Solves the model, consuming it.
    ///
    /// Infeasibility is a status, not an error; `Err` means the engine
    /// itself faulted.
    fn solve(self: Box<Self>) -> Result<IpSolution, SolverError>;
}

/// Factory for fresh models; the repair loop creates one per attempt.
pub trait SolverProvider {
    /// Creates an empty model.
    fn create_model(&self) -> Box<dyn IpModel>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_expr_sum() {
        let expr = LinearExpr::sum([0, 2, 5]);
        assert_eq!(expr.len(), 3);
        let terms: Vec<(VarId, f64)> = expr.terms().collect();
        assert_eq!(terms, vec![(0, 1.0), (2, 1.0), (5, 1.0)]);
    }

    #[test]
    fn test_linear_expr_weighted_terms() {
        let mut expr = LinearExpr::new();
        expr.add_term(3, 2.0);
        expr.add_term(4, -1.0);
        assert!(!expr.is_empty());
        let terms: Vec<(VarId, f64)> = expr.terms().collect();
        assert_eq!(terms, vec![(3, 2.0), (4, -1.0)]);
    }

    #[test]
    fn test_solution_reads_rounded_values() {
        let solution = IpSolution::new(
            SolveStatus::Optimal,
            vec![1.0, 0.0, 0.9999],
            Duration::from_millis(3),
        );
        assert!(solution.is_optimal());
        assert!(solution.value(0));
        assert!(!solution.value(1));
        assert!(solution.value(2));
        assert!(!solution.value(99));
    }
}
