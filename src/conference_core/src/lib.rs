//! Conference Core - Monte Carlo odds for a round-robin conference season.
//!
//! Simulates the conference schedule game by game, resolves the top two
//! places with the conference tie-break rules, and tallies championship
//! game appearances across many trials. Python bindings are available
//! behind the `python` feature.

pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod report;
pub mod rng;
pub mod schedule;
pub mod season;
pub mod simulation;
pub mod standings;
pub mod tiebreak;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod testing;

pub use config::{CliArgs, Config};
pub use error::{ConfigError, LoadError, ScheduleError};
pub use loader::{load_schedule, read_rows, save_schedule, write_schedule};
pub use report::SimulationReport;
pub use rng::{RandomSource, SequenceSource};
pub use schedule::{Fixture, Game, Schedule, ScheduleRow, TeamId};
pub use season::{simulate, Outcome, Placement, SeasonState};
pub use simulation::{SimulationConfig, Simulator, Tally};
pub use standings::{resolve_standings, Standings};
pub use tiebreak::{resolve, resolve_pair, Criterion, TieBreak};
