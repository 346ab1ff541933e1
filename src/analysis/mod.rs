//! Static analysis over the identity table and snapshots.
pub mod dependencies;
pub mod residuals;

pub use residuals::{is_consistent, residuals, Residual};
