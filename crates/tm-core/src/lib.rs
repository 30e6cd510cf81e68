//! tm-core - Core library for tidemark
//!
//! This crate provides the migration record, the catalog file-name codec,
//! the file repository over a catalog directory and configuration parsing
//! shared by the database, engine and CLI crates.

pub mod catalog;
pub mod config;
pub mod direction;
pub mod error;
pub mod file_repo;
pub mod migration;

pub use catalog::{format_stem, parse_stem};
pub use config::{Config, Dialect, HistoryBackend};
pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use file_repo::{FileRepository, FsRepository};
pub use migration::Migration;
