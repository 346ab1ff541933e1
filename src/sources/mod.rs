//! Adapters that turn externally sourced figures into input batches.
//!
//! Fetching and decoding remote data happens outside this crate. A source only
//! has to hand back an `Assignments` batch in the canonical unit for a country.

use crate::compute::ledger::{Ledger, LedgerError};
use crate::store::{Assignments, Model, Variable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

pub use self::error::SourceError;
mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum SourceError {
        #[error("Unknown country code '{0}'")]
        UnknownCountry(String),
        #[error("Data source '{source_name}' unavailable: {reason}")]
        Unavailable { source_name: String, reason: String },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountryCode {
    Fr,
    De,
    Uk,
    Us,
}

impl CountryCode {
    pub const ALL: [CountryCode; 4] = [CountryCode::Fr, CountryCode::De, CountryCode::Uk, CountryCode::Us];

    pub fn code(self) -> &'static str {
        match self {
            CountryCode::Fr => "fr",
            CountryCode::De => "de",
            CountryCode::Uk => "uk",
            CountryCode::Us => "us",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CountryCode {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CountryCode::ALL
            .iter()
            .copied()
            .find(|c| c.code() == s)
            .ok_or_else(|| SourceError::UnknownCountry(s.to_string()))
    }
}

/// Magnitude of a raw figure, used to bring it into the canonical unit (billions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Units,
    Thousands,
    Millions,
    Billions,
}

impl Scale {
    fn per_billion(self) -> f64 {
        match self {
            Scale::Units => 1.0e9,
            Scale::Thousands => 1.0e6,
            Scale::Millions => 1.0e3,
            Scale::Billions => 1.0,
        }
    }

    /// Converts `raw` (in this scale) to billions.
    pub fn to_canonical(self, raw: f64) -> f64 {
        raw / self.per_billion()
    }
}

/// Something that can supply a batch of values for a country.
///
/// `Ok(None)` means the source has nothing for that country; the ledger is
/// then left as it is.
pub trait AssignmentSource {
    fn name(&self) -> &str;

    fn assignments(&self, country: CountryCode) -> Result<Option<Assignments>, SourceError>;
}

/// A pre-fetched, in-memory table of per-country batches.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    name: String,
    rows: HashMap<CountryCode, Assignments>,
}

impl CountryTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), rows: HashMap::new() }
    }

    /// Records one figure, converting it from `scale` to the canonical unit.
    pub fn record(&mut self, country: CountryCode, var: Variable, raw: f64, scale: Scale) {
        self.rows
            .entry(country)
            .or_default()
            .set(var, scale.to_canonical(raw));
    }

    pub fn insert(&mut self, country: CountryCode, assignments: Assignments) {
        self.rows.insert(country, assignments);
    }

    pub fn get(&self, country: CountryCode) -> Option<&Assignments> {
        self.rows.get(&country)
    }
}

impl AssignmentSource for CountryTable {
    fn name(&self) -> &str { &self.name }

    fn assignments(&self, country: CountryCode) -> Result<Option<Assignments>, SourceError> {
        Ok(self.rows.get(&country).cloned())
    }
}

/// Merges every source's batch for `country`, in order, into one batch.
/// Later sources win on shared keys; disagreements are not reported.
pub fn collect_batch(
    sources: &[&dyn AssignmentSource],
    country: CountryCode,
) -> Result<Assignments, SourceError> {
    let mut merged = Assignments::new();
    for source in sources {
        if let Some(batch) = source.assignments(country)? {
            merged.merge(&batch);
        } else {
            warn!(source = source.name(), %country, "source has no data for country");
        }
    }
    Ok(merged)
}

/// Applies a country selection as ONE solver pass over the merged batch.
///
/// If any source fails, or none has data, the current snapshot is kept.
pub fn select_country(
    ledger: &mut Ledger,
    sources: &[&dyn AssignmentSource],
    country: CountryCode,
) -> Result<Arc<Model>, LedgerError> {
    let batch = collect_batch(sources, country)?;
    if batch.is_empty() {
        warn!(%country, "no figures available; keeping current model");
        return Ok(ledger.current());
    }
    info!(%country, pinned = %batch.keys(), "applying country batch");
    Ok(ledger.pin_batch(&batch))
}
