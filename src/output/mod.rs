//! Output module for reporting on stored prospects
//!
//! This module handles:
//! - Loading prospect statistics from the store
//! - Printing them for the `--stats` command

pub mod stats;

pub use stats::{load_statistics, print_statistics, ProspectStatistics};
