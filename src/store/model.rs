//! Snapshots of the ten national-accounts variables and partial input records.

use super::types::{PinnedSet, Variable, VariableError};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::ops::Index;

/// One complete assignment of values to all ten variables.
///
/// Dense storage indexed by `Variable::index()`, so a snapshot can never be
/// missing a key. Updates go through `with` / `overwrite`, which return a new
/// snapshot and leave `self` untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ModelRecord", into = "ModelRecord")]
pub struct Model {
    values: [f64; Variable::COUNT],
}

impl Model {
    /// The start-of-process snapshot: every variable at zero.
    pub fn zero() -> Self { Self::default() }

    pub fn from_values(values: [f64; Variable::COUNT]) -> Self {
        Self { values }
    }

    #[inline(always)]
    pub fn get(&self, var: Variable) -> f64 {
        self.values[var.index()]
    }

    pub fn values(&self) -> &[f64; Variable::COUNT] { &self.values }

    /// Returns a copy with one entry replaced.
    pub fn with(&self, var: Variable, value: f64) -> Self {
        let mut next = *self;
        next.values[var.index()] = value;
        next
    }

    /// Returns a copy with every entry of `assignments` written over this snapshot.
    pub fn overwrite(&self, assignments: &Assignments) -> Self {
        let mut next = *self;
        for (var, value) in assignments.iter() {
            next.values[var.index()] = value;
        }
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        Variable::ALL.into_iter().map(move |v| (v, self.get(v)))
    }

    /// Reads a complete name-keyed record. Every one of the ten names must be
    /// present and no other name is accepted.
    pub fn from_record<I, S>(record: I) -> Result<Self, VariableError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let assigned = Assignments::from_record(record)?;
        let mut values = [0.0; Variable::COUNT];
        for var in Variable::ALL {
            values[var.index()] = assigned
                .get(var)
                .ok_or_else(|| VariableError::MissingVariable { name: var.name().to_string() })?;
        }
        Ok(Self { values })
    }

    /// Output record keyed by canonical name.
    pub fn to_record(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(v, x)| (v.name().to_string(), x)).collect()
    }
}

impl Index<Variable> for Model {
    type Output = f64;

    fn index(&self, var: Variable) -> &f64 {
        &self.values[var.index()]
    }
}

/// Wire shape of a `Model`: all ten keys required, nothing else accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelRecord {
    taxes: f64,
    expenses: f64,
    consumption: f64,
    savings: f64,
    investments: f64,
    exports: f64,
    imports: f64,
    fni: f64,
    gdp: f64,
    gni: f64,
}

impl From<ModelRecord> for Model {
    fn from(r: ModelRecord) -> Self {
        Model::from_values([
            r.taxes, r.expenses, r.consumption, r.savings, r.investments,
            r.exports, r.imports, r.fni, r.gdp, r.gni,
        ])
    }
}

impl From<Model> for ModelRecord {
    fn from(m: Model) -> Self {
        ModelRecord {
            taxes: m.get(Variable::Taxes),
            expenses: m.get(Variable::Expenses),
            consumption: m.get(Variable::Consumption),
            savings: m.get(Variable::Savings),
            investments: m.get(Variable::Investments),
            exports: m.get(Variable::Exports),
            imports: m.get(Variable::Imports),
            fni: m.get(Variable::Fni),
            gdp: m.get(Variable::Gdp),
            gni: m.get(Variable::Gni),
        }
    }
}

/// A partial record: one atomic batch of values for some of the ten variables.
///
/// Setting the same variable twice keeps the last value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "HashMap<String, f64>")]
pub struct Assignments {
    values: BTreeMap<Variable, f64>,
}

impl Assignments {
    pub fn new() -> Self { Self::default() }

    pub fn single(var: Variable, value: f64) -> Self {
        let mut a = Self::new();
        a.set(var, value);
        a
    }

    /// Converts an adapter's name-keyed record. Unknown names are rejected, never dropped.
    pub fn from_record<I, S>(record: I) -> Result<Self, VariableError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut a = Self::new();
        for (name, value) in record {
            a.set(name.as_ref().parse()?, value);
        }
        Ok(a)
    }

    pub fn set(&mut self, var: Variable, value: f64) {
        self.values.insert(var, value);
    }

    pub fn get(&self, var: Variable) -> Option<f64> {
        self.values.get(&var).copied()
    }

    /// Layers `other` on top of `self`; `other` wins on shared keys.
    pub fn merge(&mut self, other: &Assignments) {
        for (var, value) in other.iter() {
            self.set(var, value);
        }
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.values.iter().map(|(v, x)| (*v, *x))
    }

    pub fn keys(&self) -> PinnedSet {
        self.values.keys().copied().collect()
    }
}

impl TryFrom<HashMap<String, f64>> for Assignments {
    type Error = VariableError;

    fn try_from(record: HashMap<String, f64>) -> Result<Self, Self::Error> {
        Assignments::from_record(record)
    }
}

impl Serialize for Assignments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl FromIterator<(Variable, f64)> for Assignments {
    fn from_iter<T: IntoIterator<Item = (Variable, f64)>>(iter: T) -> Self {
        let mut a = Self::new();
        for (var, value) in iter {
            a.set(var, value);
        }
        a
    }
}
