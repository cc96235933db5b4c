//! Checksummed schema migrations.
//!
//! SQL files are embedded at compile time and applied in order; the runner
//! refuses databases whose recorded history it does not recognise.

mod checksums;
mod embedded;
mod runner;

pub use runner::apply_migrations;
