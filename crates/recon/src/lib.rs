//! `marksync-recon` — SIS-keyed reconciliation engine.
//!
//! Pure engine crate: receives already-fetched records and already-read
//! local keys, returns a write plan. No HTTP or sheet dependencies.

pub mod engine;
pub mod model;

pub use engine::reconcile;
pub use model::{CellWrite, ReconEntry, ReconReport};
