use crate::compute::ledger::{Ledger, LedgerConfig, LedgerError};
use crate::compute::solver;
use crate::store::{Assignments, Model, PinnedSet, VariableError};
use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use std::collections::{BTreeMap, HashMap};

fn variable_err(e: VariableError) -> PyErr {
    PyKeyError::new_err(e.to_string())
}

fn ledger_err(e: LedgerError) -> PyErr {
    match e {
        LedgerError::Variable(v) => variable_err(v),
        other => PyValueError::new_err(other.to_string()),
    }
}

#[pyclass(name = "_Ledger")]
#[derive(Debug, Clone, Default)]
pub struct PyLedger {
    inner: Ledger,
}

#[pymethods]
impl PyLedger {
    #[new]
    #[pyo3(signature = (config_json=None))]
    pub fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => LedgerConfig::from_json(json).map_err(ledger_err)?,
            None => LedgerConfig::default(),
        };
        Ok(Self { inner: Ledger::new(config) })
    }

    pub fn model(&self) -> BTreeMap<String, f64> {
        self.inner.current().to_record()
    }

    pub fn pin(&mut self, name: &str, value: f64) -> PyResult<()> {
        self.inner.pin_named(name, value).map_err(ledger_err)?;
        Ok(())
    }

    pub fn pin_batch(&mut self, record: HashMap<String, f64>) -> PyResult<()> {
        let batch = Assignments::from_record(record).map_err(variable_err)?;
        self.inner.pin_batch(&batch);
        Ok(())
    }

    pub fn pin_text(&mut self, name: &str, text: &str) -> PyResult<bool> {
        self.inner.pin_text(name, text).map_err(ledger_err)
    }

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }
}

/// Stateless solve over a complete record.
#[pyfunction]
pub fn solve_record(model: HashMap<String, f64>, pinned: Vec<String>) -> PyResult<BTreeMap<String, f64>> {
    let model = Model::from_record(model).map_err(variable_err)?;
    let pinned = PinnedSet::from_names(pinned).map_err(variable_err)?;
    Ok(solver::solve(&model, pinned).to_record())
}
