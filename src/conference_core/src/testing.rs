//! Fixtures shared by unit tests.

use crate::rng::SequenceSource;
use crate::schedule::{Schedule, ScheduleRow, TeamId};
use crate::season::{simulate, SeasonState};

/// Schedule where every `(winner, loser)` pair is a certain result.
pub fn decided_schedule(results: &[(&str, &str)], games_per_team: u32) -> Schedule {
    let rows: Vec<ScheduleRow> = results
        .iter()
        .map(|(winner, loser)| ScheduleRow::new(*winner, *loser, 1.0))
        .collect();
    Schedule::new(&rows, games_per_team).unwrap()
}

/// Build a fully decided season from `(winner, loser)` pairs.
pub fn decided_season(results: &[(&str, &str)], games_per_team: u32) -> (Schedule, SeasonState) {
    let schedule = decided_schedule(results, games_per_team);
    let mut state = SeasonState::new(&schedule);
    simulate(&schedule, &mut state, &mut SequenceSource::constant(0.5));
    (schedule, state)
}

pub fn ids(schedule: &Schedule, names: &[&str]) -> Vec<TeamId> {
    names.iter().map(|n| schedule.team_id(n).unwrap()).collect()
}
