//! Monte Carlo driver: repeated season simulation and standings
//! resolution, accumulated into a [`Tally`].

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXTERNAL_WINS, DEFAULT_MATCHUP_THRESHOLD, DEFAULT_SEASON_GAMES, DEFAULT_TRIALS,
    MAX_EXTERNAL_GAMES, PARALLEL_CHUNK_SIZE, PROGRESS_INTERVAL,
};
use crate::error::ConfigError;
use crate::rng::RandomSource;
use crate::schedule::{Schedule, TeamId};
use crate::season::{simulate, SeasonState};
use crate::standings::{resolve_standings, Standings};

/// Run parameters supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub trials: usize,

    /// Team whose full-season record is tracked
    pub distinguished_team: String,

    /// Non-conference wins added to the distinguished team's conference wins
    pub external_wins: i64,

    /// Games in the full season; adjusted totals above this are not recorded
    pub season_games: u32,

    pub seed: Option<u64>,

    /// Smallest share of trials for a matchup to be reported
    pub matchup_threshold: f64,

    /// Spread trials over the rayon thread pool
    pub parallel: bool,
}

impl SimulationConfig {
    pub fn new(distinguished_team: impl Into<String>) -> Self {
        SimulationConfig {
            trials: DEFAULT_TRIALS,
            distinguished_team: distinguished_team.into(),
            external_wins: DEFAULT_EXTERNAL_WINS,
            season_games: DEFAULT_SEASON_GAMES,
            seed: None,
            matchup_threshold: DEFAULT_MATCHUP_THRESHOLD,
            parallel: false,
        }
    }
}

/// Counters accumulated across trials.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tally {
    pub trials: u64,
    /// First-place finishes per team
    pub first: Vec<u64>,
    /// Second-place finishes per team
    pub second: Vec<u64>,
    /// Championship pairings keyed by (lower id, higher id)
    pub matchups: BTreeMap<(TeamId, TeamId), u64>,
    /// Distinguished team's adjusted win totals, indexed by wins
    pub record_histogram: Vec<u64>,
    /// Championship appearances by the distinguished team, indexed by wins
    pub championship_histogram: Vec<u64>,
    /// Trials where at least one place needed a random draw
    pub random_trials: u64,
    /// Random draws across all trials
    pub random_fallbacks: u64,
    /// Trials whose adjusted win total fell outside the histogram
    pub skipped_records: u64,
}

impl Tally {
    pub fn new(team_count: usize, season_games: u32) -> Self {
        let buckets = season_games as usize + 1;
        Tally {
            first: vec![0; team_count],
            second: vec![0; team_count],
            record_histogram: vec![0; buckets],
            championship_histogram: vec![0; buckets],
            ..Tally::default()
        }
    }

    /// Fold one finished trial into the counters.
    pub fn record(
        &mut self,
        standings: &Standings,
        season: &SeasonState,
        distinguished: TeamId,
        external_wins: i64,
    ) {
        self.trials += 1;
        self.first[standings.first] += 1;
        self.second[standings.second] += 1;

        let pair = if standings.first < standings.second {
            (standings.first, standings.second)
        } else {
            (standings.second, standings.first)
        };
        *self.matchups.entry(pair).or_insert(0) += 1;

        if standings.used_random() {
            self.random_trials += 1;
        }
        self.random_fallbacks += u64::from(standings.random_fallbacks);

        let adjusted = i64::from(season.wins(distinguished)) + external_wins;
        match usize::try_from(adjusted)
            .ok()
            .filter(|&w| w < self.record_histogram.len())
        {
            Some(wins) => {
                self.record_histogram[wins] += 1;
                if standings.contains(distinguished) {
                    self.championship_histogram[wins] += 1;
                }
            }
            None => {
                log::debug!("adjusted win total {} outside histogram, skipping", adjusted);
                self.skipped_records += 1;
            }
        }
    }

    /// Combine partial tallies from independent workers.
    pub fn merge(mut self, other: Tally) -> Tally {
        if self.first.is_empty() {
            return other;
        }
        self.trials += other.trials;
        add_into(&mut self.first, &other.first);
        add_into(&mut self.second, &other.second);
        add_into(&mut self.record_histogram, &other.record_histogram);
        add_into(&mut self.championship_histogram, &other.championship_histogram);
        for (pair, count) in other.matchups {
            *self.matchups.entry(pair).or_insert(0) += count;
        }
        self.random_trials += other.random_trials;
        self.random_fallbacks += other.random_fallbacks;
        self.skipped_records += other.skipped_records;
        self
    }

    pub fn matchup(&self, a: TeamId, b: TeamId) -> u64 {
        let key = if a < b { (a, b) } else { (b, a) };
        self.matchups.get(&key).copied().unwrap_or(0)
    }
}

fn add_into(target: &mut [u64], source: &[u64]) {
    for (t, s) in target.iter_mut().zip(source) {
        *t += s;
    }
}

/// Runs trials against one schedule.
#[derive(Debug)]
pub struct Simulator<'a> {
    schedule: &'a Schedule,
    config: SimulationConfig,
    distinguished: TeamId,
}

impl<'a> Simulator<'a> {
    pub fn new(schedule: &'a Schedule, config: SimulationConfig) -> Result<Self, ConfigError> {
        if config.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        if !(0.0..=1.0).contains(&config.matchup_threshold) {
            return Err(ConfigError::Threshold(config.matchup_threshold));
        }
        let limit = schedule.games_per_team().saturating_add(MAX_EXTERNAL_GAMES);
        if config.season_games > limit {
            return Err(ConfigError::SeasonGames {
                season_games: config.season_games,
                limit,
            });
        }
        let distinguished = schedule
            .require_team(&config.distinguished_team)
            .map_err(|_| ConfigError::UnknownTeam(config.distinguished_team.clone()))?;

        Ok(Simulator {
            schedule,
            config,
            distinguished,
        })
    }

    fn master_rng(&self) -> ChaCha8Rng {
        match self.config.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Run the configured number of trials.
    pub fn run(&self) -> Tally {
        log::info!(
            "Running {} simulations ({})",
            self.config.trials,
            if self.config.parallel { "parallel" } else { "sequential" }
        );

        let tally = if self.config.parallel {
            self.run_parallel()
        } else {
            let mut rng = self.master_rng();
            self.run_trials(self.config.trials, &mut rng, true)
        };

        if tally.skipped_records > 0 {
            log::warn!(
                "{} trials left {}'s adjusted record outside 0..={}",
                tally.skipped_records,
                self.config.distinguished_team,
                self.config.season_games
            );
        }
        log::info!(
            "Finished {} simulations, {} needed a random tie-breaker",
            tally.trials,
            tally.random_trials
        );

        tally
    }

    /// Run `trials` sequential trials with one scratch state.
    pub fn run_trials<R: RandomSource + ?Sized>(
        &self,
        trials: usize,
        rng: &mut R,
        log_progress: bool,
    ) -> Tally {
        let mut tally = Tally::new(self.schedule.team_count(), self.config.season_games);
        let mut season = SeasonState::new(self.schedule);

        for trial in 0..trials {
            simulate(self.schedule, &mut season, rng);
            let standings = resolve_standings(self.schedule, &mut season, rng);
            tally.record(&standings, &season, self.distinguished, self.config.external_wins);

            if log_progress && (trial + 1) % PROGRESS_INTERVAL == 0 {
                log::info!("Completed {} simulations", trial + 1);
            }
        }

        tally
    }

    /// Split the trials into chunks, each with its own scratch state and
    /// an RNG seeded from the master RNG, and merge the partial tallies.
    pub fn run_parallel(&self) -> Tally {
        let mut master = self.master_rng();
        let chunks: Vec<(usize, u64)> = (0..self.config.trials)
            .step_by(PARALLEL_CHUNK_SIZE)
            .map(|start| {
                let len = PARALLEL_CHUNK_SIZE.min(self.config.trials - start);
                (len, master.gen::<u64>())
            })
            .collect();

        log::debug!("{} chunks of up to {} trials", chunks.len(), PARALLEL_CHUNK_SIZE);

        chunks
            .par_iter()
            .map(|&(len, seed)| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                self.run_trials(len, &mut rng, false)
            })
            .reduce(Tally::default, Tally::merge)
    }
}
