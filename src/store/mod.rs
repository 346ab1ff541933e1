//! Variables, snapshots and input records.
pub mod model;
pub mod types;

pub use model::{Assignments, Model};
pub use types::{PinnedSet, Variable, VariableError};
