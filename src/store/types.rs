use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use self::error::VariableError;
mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum VariableError {
        #[error("Unknown variable '{name}'")]
        UnknownVariable { name: String },
        #[error("Missing variable '{name}' in complete record")]
        MissingVariable { name: String },
    }
}

/// One of the ten national-accounts quantities tracked by a `Model`.
///
/// The discriminant doubles as the storage slot inside a snapshot, so the
/// declaration order is also the canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Variable {
    Taxes = 0,
    Expenses = 1,
    Consumption = 2,
    Savings = 3,
    Investments = 4,
    Exports = 5,
    Imports = 6,
    /// Net factor income from abroad.
    Fni = 7,
    Gdp = 8,
    Gni = 9,
}

impl Variable {
    pub const COUNT: usize = 10;

    pub const ALL: [Variable; Variable::COUNT] = [
        Variable::Taxes,
        Variable::Expenses,
        Variable::Consumption,
        Variable::Savings,
        Variable::Investments,
        Variable::Exports,
        Variable::Imports,
        Variable::Fni,
        Variable::Gdp,
        Variable::Gni,
    ];

    #[inline(always)]
    pub fn index(self) -> usize { self as usize }

    pub fn name(self) -> &'static str {
        match self {
            Variable::Taxes => "taxes",
            Variable::Expenses => "expenses",
            Variable::Consumption => "consumption",
            Variable::Savings => "savings",
            Variable::Investments => "investments",
            Variable::Exports => "exports",
            Variable::Imports => "imports",
            Variable::Fni => "fni",
            Variable::Gdp => "gdp",
            Variable::Gni => "gni",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = VariableError;

    /// Names are matched exactly; no trimming or case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .iter()
            .copied()
            .find(|v| v.name() == s)
            .ok_or_else(|| VariableError::UnknownVariable { name: s.to_string() })
    }
}

/// The set of variables taken as authoritative for one solver pass.
///
/// Stored as a bitmask over `Variable::index()`; iteration yields canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PinnedSet(u16);

impl PinnedSet {
    pub fn empty() -> Self { Self(0) }

    pub fn insert(&mut self, var: Variable) {
        self.0 |= 1 << var.index();
    }

    #[inline(always)]
    pub fn contains(&self, var: Variable) -> bool {
        self.0 & (1 << var.index()) != 0
    }

    pub fn len(&self) -> usize { self.0.count_ones() as usize }

    pub fn is_empty(&self) -> bool { self.0 == 0 }

    pub fn iter(&self) -> impl Iterator<Item = Variable> + '_ {
        Variable::ALL.into_iter().filter(move |v| self.contains(*v))
    }

    /// Builds a pinned set from caller-supplied names. Any unknown name fails the whole set.
    pub fn from_names<I, S>(names: I) -> Result<Self, VariableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for name in names {
            set.insert(name.as_ref().parse()?);
        }
        Ok(set)
    }
}

impl FromIterator<Variable> for PinnedSet {
    fn from_iter<T: IntoIterator<Item = Variable>>(iter: T) -> Self {
        let mut set = Self::empty();
        for var in iter {
            set.insert(var);
        }
        set
    }
}

impl fmt::Display for PinnedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Variable::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
