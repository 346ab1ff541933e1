//! Identity residuals of a snapshot.
//!
//! Diagnostic only: the solver never consults these, and inconsistent inputs
//! are accepted as they are.
use crate::compute::formulas::formula;
use crate::store::{Model, Variable};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub variable: Variable,
    /// `formula(model) - model[variable]`
    pub gap: f64,
}

pub fn residuals(model: &Model) -> Vec<Residual> {
    Variable::ALL
        .into_iter()
        .map(|variable| Residual {
            variable,
            gap: formula(variable).evaluate(model) - model.get(variable),
        })
        .collect()
}

/// True when every identity holds within `tolerance`. NaN gaps count as violations.
pub fn is_consistent(model: &Model, tolerance: f64) -> bool {
    residuals(model).iter().all(|r| r.gap.abs() <= tolerance)
}
