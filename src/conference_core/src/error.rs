//! Error types for schedule construction, loading and run configuration.

use thiserror::Error;

/// A fixture list that cannot describe a season.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("expected {expected} games, found {found}")]
    FixtureCount { expected: usize, found: usize },

    #[error("probability {value} for {team} vs {opponent} is outside [0, 1]")]
    InvalidProbability {
        team: String,
        opponent: String,
        value: f64,
    },

    #[error("{0} is scheduled against itself")]
    SelfMatch(String),

    #[error("schedule has no games")]
    Empty,

    #[error("unknown team: {0}")]
    UnknownTeam(String),
}

/// Failure reading or writing the delimited schedule table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("row {row}: could not parse probability {value:?}")]
    UnparsableProbability { row: usize, value: String },

    #[error("row {row}: expected 3 fields, found {found}")]
    ShortRow { row: usize, found: usize },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Invalid run parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("number of trials must be positive")]
    NoTrials,

    #[error("no distinguished team given (use --team or `team` in the config file)")]
    MissingTeam,

    #[error("distinguished team {0:?} does not appear in the schedule")]
    UnknownTeam(String),

    #[error("season length {season_games} exceeds the limit of {limit} games")]
    SeasonGames { season_games: u32, limit: u32 },

    #[error("matchup threshold {0} is outside [0, 1]")]
    Threshold(f64),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}
