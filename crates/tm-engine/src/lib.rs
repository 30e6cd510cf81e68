//! tm-engine - Migration engine for tidemark
//!
//! This crate reconciles the migration catalog against the history ledger
//! and applies, rolls back, generates and cleans migrations.

pub mod cleaner;
pub mod error;
pub mod generator;
pub mod reconcile;
pub mod runner;

pub use cleaner::Cleaner;
pub use error::{EngineError, EngineResult};
pub use generator::{GenerateOptions, Generator};
pub use reconcile::Position;
pub use runner::{Migrator, RunOutcome, Status};

#[cfg(test)]
pub(crate) mod test_utils;
