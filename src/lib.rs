//! Identity solver for national-accounts variables.
//!
//! A `Model` holds ten variables (taxes, expenses, consumption, savings,
//! investments, exports, imports, fni, gdp, gni). Each update pins some of them
//! and recomputes the rest from a fixed table of accounting identities in one
//! simultaneous pass. See `compute::solver`.

pub mod analysis;
pub mod compute;
pub mod display {
    pub mod trace;
}
pub mod sources;
pub mod store;

#[cfg(feature = "python")]
mod bindings {
    pub mod python;
}

pub use compute::{apply_batch, apply_single, solve, Ledger, LedgerConfig, LedgerError};
pub use sources::{select_country, AssignmentSource, CountryCode, CountryTable, Scale, SourceError};
pub use store::{Assignments, Model, PinnedSet, Variable, VariableError};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// This function defines the `_core` Python module.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<bindings::python::PyLedger>()?;
    m.add_function(wrap_pyfunction!(bindings::python::solve_record, m)?)?;
    Ok(())
}
