//! Running one algorithm on one instance and reporting the result.
//!
//! [`Runner::run`] is the single entry point used by the binary. It checks
//! the [`RunConfig`], starts the clock, builds the distance model and the
//! neighbor lists, seeds one random stream and hands everything to the
//! selected algorithm. The returned [`RunReport`] formats the summary line
//! and can be written to disk with [`write_tour_file`].

mod config;
mod output;
mod runner;

pub use config::{Algorithm, OutputMode, RunConfig};
pub use output::{write_tour_file, WrittenFiles};
pub use runner::{RunReport, Runner};
