use crate::rng::RandomSource;
use crate::schedule::{Schedule, TeamId};
use crate::season::{Placement, SeasonState};
use crate::tiebreak::resolve;

/// Top two finishers of one simulated season.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Standings {
    pub first: TeamId,
    pub second: TeamId,
    /// Places (0, 1 or 2) that needed a random draw
    pub random_fallbacks: u32,
}

impl Standings {
    pub fn used_random(&self) -> bool {
        self.random_fallbacks > 0
    }

    pub fn contains(&self, team: TeamId) -> bool {
        self.first == team || self.second == team
    }
}

/// Unplaced teams with the most wins.
fn leaders(season: &SeasonState, team_count: usize) -> Vec<TeamId> {
    let unplaced: Vec<TeamId> = (0..team_count)
        .filter(|&t| season.placement(t) == Placement::Unplaced)
        .collect();
    let best = unplaced.iter().map(|&t| season.wins(t)).max().unwrap_or(0);
    unplaced
        .into_iter()
        .filter(|&t| season.wins(t) == best)
        .collect()
}

/// Fill first and then second place, breaking ties as needed.
///
/// The schedule must contain at least two teams, which
/// [`Schedule::new`] guarantees.
pub fn resolve_standings<R: RandomSource + ?Sized>(
    schedule: &Schedule,
    season: &mut SeasonState,
    rng: &mut R,
) -> Standings {
    let mut random_fallbacks = 0;
    let mut placed = [0; 2];

    for (slot, placement) in [Placement::First, Placement::Second].into_iter().enumerate() {
        let candidates = leaders(season, schedule.team_count());
        let team = if let [only] = candidates[..] {
            only
        } else {
            let tie = resolve(schedule, season, &candidates, rng);
            if tie.used_random {
                random_fallbacks += 1;
            }
            tie.winner
        };
        season.set_placement(team, placement);
        placed[slot] = team;
    }

    Standings {
        first: placed[0],
        second: placed[1],
        random_fallbacks,
    }
}
