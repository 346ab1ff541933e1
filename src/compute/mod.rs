//! Evaluates the identity table over snapshots.
pub mod formulas;
pub mod ledger;
pub mod solver;

pub use formulas::{formula, Formula};
pub use ledger::{Ledger, LedgerConfig, LedgerError};
pub use solver::{apply_batch, apply_single, solve, solve_named};
