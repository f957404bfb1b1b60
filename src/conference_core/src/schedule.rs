use std::collections::{BTreeSet, HashMap};

use crate::error::ScheduleError;

/// Index of a team in the schedule's alphabetical team list.
pub type TeamId = usize;

/// One raw row of the schedule table: `probability` is the chance that
/// `team` beats `opponent`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleRow {
    pub team: String,
    pub opponent: String,
    pub probability: f64,
}

impl ScheduleRow {
    pub fn new(team: impl Into<String>, opponent: impl Into<String>, probability: f64) -> Self {
        ScheduleRow {
            team: team.into(),
            opponent: opponent.into(),
            probability,
        }
    }
}

/// A fixture with names in canonical order.
///
/// The alphabetically earlier team is the reference side and
/// `probability` is always the reference side's chance of winning.
#[derive(Clone, Debug, PartialEq)]
pub struct Fixture {
    pub reference: String,
    pub other: String,
    pub probability: f64,
}

impl Fixture {
    pub fn canonical(team: &str, opponent: &str, probability: f64) -> Self {
        if team < opponent {
            Fixture {
                reference: team.to_string(),
                other: opponent.to_string(),
                probability,
            }
        } else {
            Fixture {
                reference: opponent.to_string(),
                other: team.to_string(),
                probability: 1.0 - probability,
            }
        }
    }
}

/// Indexed fixture used during simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Game {
    pub reference: TeamId,
    pub other: TeamId,
    pub probability: f64,
}

impl Game {
    /// The team on the other side of this game from `team`.
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if team == self.reference {
            Some(self.other)
        } else if team == self.other {
            Some(self.reference)
        } else {
            None
        }
    }
}

/// Immutable season fixtures and win probabilities, shared by every trial.
#[derive(Clone, Debug)]
pub struct Schedule {
    teams: Vec<String>,
    index: HashMap<String, TeamId>,
    games: Vec<Game>,
    games_by_team: Vec<Vec<usize>>,
    opponents: Vec<Vec<TeamId>>,
    games_per_team: u32,
}

impl Schedule {
    /// Build the schedule from raw rows.
    ///
    /// Fails if any probability is outside `[0, 1]`, a team is scheduled
    /// against itself, or the number of rows is not
    /// `games_per_team * team_count / 2`.
    pub fn new(rows: &[ScheduleRow], games_per_team: u32) -> Result<Self, ScheduleError> {
        if rows.is_empty() {
            return Err(ScheduleError::Empty);
        }

        let mut fixtures = Vec::with_capacity(rows.len());
        for row in rows {
            if row.team == row.opponent {
                return Err(ScheduleError::SelfMatch(row.team.clone()));
            }
            if !(0.0..=1.0).contains(&row.probability) {
                return Err(ScheduleError::InvalidProbability {
                    team: row.team.clone(),
                    opponent: row.opponent.clone(),
                    value: row.probability,
                });
            }
            fixtures.push(Fixture::canonical(&row.team, &row.opponent, row.probability));
        }

        let teams: Vec<String> = fixtures
            .iter()
            .flat_map(|f| [f.reference.clone(), f.other.clone()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let expected = games_per_team as usize * teams.len() / 2;
        if fixtures.len() != expected {
            return Err(ScheduleError::FixtureCount {
                expected,
                found: fixtures.len(),
            });
        }

        let index: HashMap<String, TeamId> = teams
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        let games: Vec<Game> = fixtures
            .iter()
            .map(|f| Game {
                reference: index[&f.reference],
                other: index[&f.other],
                probability: f.probability,
            })
            .collect();

        let mut games_by_team = vec![Vec::new(); teams.len()];
        let mut opponent_sets = vec![BTreeSet::new(); teams.len()];
        for (game_index, game) in games.iter().enumerate() {
            games_by_team[game.reference].push(game_index);
            games_by_team[game.other].push(game_index);
            opponent_sets[game.reference].insert(game.other);
            opponent_sets[game.other].insert(game.reference);
        }
        let opponents = opponent_sets
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect();

        log::debug!(
            "schedule built: {} teams, {} games, {} per team",
            teams.len(),
            games.len(),
            games_per_team
        );

        Ok(Schedule {
            teams,
            index,
            games,
            games_by_team,
            opponents,
            games_per_team,
        })
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn team_names(&self) -> &[String] {
        &self.teams
    }

    pub fn team_name(&self, team: TeamId) -> &str {
        &self.teams[team]
    }

    pub fn team_id(&self, name: &str) -> Option<TeamId> {
        self.index.get(name).copied()
    }

    /// Like [`Schedule::team_id`] but reports unknown names as an error.
    pub fn require_team(&self, name: &str) -> Result<TeamId, ScheduleError> {
        self.team_id(name)
            .ok_or_else(|| ScheduleError::UnknownTeam(name.to_string()))
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn games_per_team(&self) -> u32 {
        self.games_per_team
    }

    /// Indices into [`Schedule::games`] of every game `team` plays.
    pub fn games_of(&self, team: TeamId) -> &[usize] {
        &self.games_by_team[team]
    }

    /// Distinct opponents of `team`, in id order.
    pub fn opponents(&self, team: TeamId) -> &[TeamId] {
        &self.opponents[team]
    }

    pub fn plays(&self, team: TeamId, opponent: TeamId) -> bool {
        self.opponents[team].binary_search(&opponent).is_ok()
    }

    /// Index of the first game between `a` and `b`, if they meet.
    pub fn game_between(&self, a: TeamId, b: TeamId) -> Option<usize> {
        self.games_by_team[a]
            .iter()
            .copied()
            .find(|&g| self.games[g].opponent_of(a) == Some(b))
    }

    /// Canonical fixture between two named teams.
    pub fn fixture(&self, team: &str, opponent: &str) -> Option<Fixture> {
        let a = self.team_id(team)?;
        let b = self.team_id(opponent)?;
        let game = &self.games[self.game_between(a, b)?];
        Some(Fixture {
            reference: self.teams[game.reference].clone(),
            other: self.teams[game.other].clone(),
            probability: game.probability,
        })
    }

    /// Probability that `team` beats `opponent`, if they meet.
    pub fn probability(&self, team: &str, opponent: &str) -> Option<f64> {
        let fixture = self.fixture(team, opponent)?;
        if fixture.reference == team {
            Some(fixture.probability)
        } else {
            Some(1.0 - fixture.probability)
        }
    }

    /// Rows in canonical orientation, suitable for writing back out.
    pub fn rows(&self) -> Vec<ScheduleRow> {
        self.games
            .iter()
            .map(|g| ScheduleRow::new(&self.teams[g.reference], &self.teams[g.other], g.probability))
            .collect()
    }
}
