use crate::rng::RandomSource;
use crate::schedule::{Schedule, TeamId};

/// Result of one game in one simulated season.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Unset,
    ReferenceWon,
    OtherWon,
}

/// Standing assigned to a team. Only the top two places are ever filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Unplaced,
    First,
    Second,
}

/// Per-trial scratch state: game outcomes, win totals and placements.
///
/// One value is owned by each worker and reused across its trials.
#[derive(Clone, Debug)]
pub struct SeasonState {
    outcomes: Vec<Outcome>,
    wins: Vec<u32>,
    placements: Vec<Placement>,
}

impl SeasonState {
    pub fn new(schedule: &Schedule) -> Self {
        SeasonState {
            outcomes: vec![Outcome::Unset; schedule.games().len()],
            wins: vec![0; schedule.team_count()],
            placements: vec![Placement::Unplaced; schedule.team_count()],
        }
    }

    pub fn reset(&mut self) {
        self.outcomes.fill(Outcome::Unset);
        self.wins.fill(0);
        self.placements.fill(Placement::Unplaced);
    }

    /// Record a decided game and credit the winner.
    pub fn record(&mut self, schedule: &Schedule, game: usize, outcome: Outcome) {
        let fixture = &schedule.games()[game];
        match outcome {
            Outcome::ReferenceWon => self.wins[fixture.reference] += 1,
            Outcome::OtherWon => self.wins[fixture.other] += 1,
            Outcome::Unset => {}
        }
        self.outcomes[game] = outcome;
    }

    pub fn outcome(&self, game: usize) -> Outcome {
        self.outcomes[game]
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Winner of a decided game.
    pub fn winner_of(&self, schedule: &Schedule, game: usize) -> Option<TeamId> {
        let fixture = &schedule.games()[game];
        match self.outcomes[game] {
            Outcome::ReferenceWon => Some(fixture.reference),
            Outcome::OtherWon => Some(fixture.other),
            Outcome::Unset => None,
        }
    }

    pub fn wins(&self, team: TeamId) -> u32 {
        self.wins[team]
    }

    pub fn win_totals(&self) -> &[u32] {
        &self.wins
    }

    /// Highest win total in the conference.
    pub fn max_wins(&self) -> u32 {
        self.wins.iter().copied().max().unwrap_or(0)
    }

    pub fn placement(&self, team: TeamId) -> Placement {
        self.placements[team]
    }

    pub fn set_placement(&mut self, team: TeamId, placement: Placement) {
        self.placements[team] = placement;
    }
}

/// Play out one season: one uniform draw per game, compared against the
/// reference side's win probability.
pub fn simulate<R: RandomSource + ?Sized>(schedule: &Schedule, state: &mut SeasonState, rng: &mut R) {
    state.reset();
    for (index, game) in schedule.games().iter().enumerate() {
        let outcome = if rng.next_uniform() < game.probability {
            Outcome::ReferenceWon
        } else {
            Outcome::OtherWon
        };
        state.record(schedule, index, outcome);
    }
}
