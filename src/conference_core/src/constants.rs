/// Simulated seasons per run
pub const DEFAULT_TRIALS: usize = 100_000;

/// Conference games each team plays
pub const DEFAULT_GAMES_PER_TEAM: u32 = 9;

/// Non-conference wins added to the distinguished team's conference record
pub const DEFAULT_EXTERNAL_WINS: i64 = 3;

/// Games in a full regular season (conference plus non-conference)
pub const DEFAULT_SEASON_GAMES: u32 = 12;

/// Most non-conference games a season may add on top of the conference slate
pub const MAX_EXTERNAL_GAMES: u32 = 256;

/// Matchups below this share of trials are left out of the report
pub const DEFAULT_MATCHUP_THRESHOLD: f64 = 0.005;

/// Sequential runs log progress every this many trials
pub const PROGRESS_INTERVAL: usize = 10_000;

/// Trials handed to each rayon task in parallel runs
pub const PARALLEL_CHUNK_SIZE: usize = 5_000;

/// Confidence level for the intervals attached to reported rates
pub const CONFIDENCE_LEVEL: f64 = 0.95;
