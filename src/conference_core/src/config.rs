use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_EXTERNAL_WINS, DEFAULT_GAMES_PER_TEAM, DEFAULT_MATCHUP_THRESHOLD,
    DEFAULT_SEASON_GAMES, DEFAULT_TRIALS,
};
use crate::error::ConfigError;
use crate::simulation::SimulationConfig;

/// Conference championship odds by Monte Carlo season simulation
#[derive(Parser, Debug)]
#[command(name = "conference_sim", version, about)]
pub struct CliArgs {
    /// Schedule table (teamName,opponent,teamPercentage)
    #[arg(short, long, default_value = "conferenceGames.csv")]
    pub schedule: PathBuf,

    /// Optional TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the report as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the validated schedule, in canonical team order, to this path
    #[arg(long)]
    pub export_schedule: Option<PathBuf>,

    // --- Overrides ---
    #[arg(short, long)]
    pub trials: Option<usize>,

    /// Team whose record distribution is tracked
    #[arg(long)]
    pub team: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub external_wins: Option<i64>,

    #[arg(long)]
    pub games_per_team: Option<u32>,

    #[arg(long)]
    pub season_games: Option<u32>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub matchup_threshold: Option<f64>,

    /// Run trials on all cores
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default = "default_external_wins")]
    pub external_wins: i64,
    #[serde(default = "default_games_per_team")]
    pub games_per_team: u32,
    #[serde(default = "default_season_games")]
    pub season_games: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_matchup_threshold")]
    pub matchup_threshold: f64,
    #[serde(default)]
    pub parallel: bool,
}

fn default_trials() -> usize {
    DEFAULT_TRIALS
}
fn default_external_wins() -> i64 {
    DEFAULT_EXTERNAL_WINS
}
fn default_games_per_team() -> u32 {
    DEFAULT_GAMES_PER_TEAM
}
fn default_season_games() -> u32 {
    DEFAULT_SEASON_GAMES
}
fn default_matchup_threshold() -> f64 {
    DEFAULT_MATCHUP_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trials: default_trials(),
            team: None,
            external_wins: default_external_wins(),
            games_per_team: default_games_per_team(),
            season_games: default_season_games(),
            seed: None,
            matchup_threshold: default_matchup_threshold(),
            parallel: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// File values (or defaults), then command-line overrides.
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.apply_overrides(args);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(trials) = args.trials {
            self.trials = trials;
        }
        if let Some(team) = &args.team {
            self.team = Some(team.clone());
        }
        if let Some(external_wins) = args.external_wins {
            self.external_wins = external_wins;
        }
        if let Some(games_per_team) = args.games_per_team {
            self.games_per_team = games_per_team;
        }
        if let Some(season_games) = args.season_games {
            self.season_games = season_games;
        }
        if let Some(seed) = args.seed {
            self.seed = Some(seed);
        }
        if let Some(threshold) = args.matchup_threshold {
            self.matchup_threshold = threshold;
        }
        self.parallel |= args.parallel;
    }

    pub fn simulation_config(&self) -> Result<SimulationConfig, ConfigError> {
        let team = self.team.clone().ok_or(ConfigError::MissingTeam)?;
        Ok(SimulationConfig {
            trials: self.trials,
            distinguished_team: team,
            external_wins: self.external_wins,
            season_games: self.season_games,
            seed: self.seed,
            matchup_threshold: self.matchup_threshold,
            parallel: self.parallel,
        })
    }
}
