//! `kiln`: a local, Git-compatible-in-spirit version control engine —
//! content-addressed object store, staging index, and history subsystem,
//! plus the snapshot, checkout, and three-way-merge algorithms built on
//! top of it. See `internal` for the engine components and `command` for
//! the CLI surface over them.

pub mod cli;
pub mod command;
pub mod errors;
pub mod internal;
pub mod repository;
pub mod utils;

pub use errors::{KilnError, Result};
pub use repository::Repository;
