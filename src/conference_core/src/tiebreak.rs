//! Tie-break engine for teams level on conference wins.
//!
//! Criteria, in priority order:
//! 1. head-to-head
//! 2. record against common opponents, best opponents first
//! 3. record against all common opponents
//! 4. strength of schedule (opponents' combined wins)
//! 5. random draw
//!
//! Each criterion is a pure function from a candidate set to a subset of
//! it. Groups of three or more restart from criterion 1 after every
//! shrink and hand off to the two-team procedure once two remain.

use crate::rng::RandomSource;
use crate::schedule::{Schedule, TeamId};
use crate::season::SeasonState;

/// Rule that decided a tie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Criterion {
    /// Only one candidate to begin with
    Unopposed,
    HeadToHead,
    TieredCommonOpponents,
    CommonOpponents,
    StrengthOfSchedule,
    Random,
}

/// Outcome of resolving one tie.
#[derive(Clone, Debug, PartialEq)]
pub struct TieBreak {
    pub winner: TeamId,
    pub used_random: bool,
    /// Rule that produced the final single winner
    pub criterion: Criterion,
    /// Candidate-set size at the start and after every step
    pub sizes: Vec<usize>,
}

type Rule = fn(&Schedule, &SeasonState, &[TeamId]) -> Vec<TeamId>;

const GROUP_RULES: [(Criterion, Rule); 4] = [
    (Criterion::HeadToHead, head_to_head),
    (Criterion::TieredCommonOpponents, tiered_common_record),
    (Criterion::CommonOpponents, overall_common_record),
    (Criterion::StrengthOfSchedule, strength_of_schedule_rule),
];

/// Candidates whose score equals the best score.
fn keep_max(candidates: &[TeamId], scores: &[u32]) -> Vec<TeamId> {
    let best = scores.iter().copied().max().unwrap_or(0);
    candidates
        .iter()
        .zip(scores)
        .filter(|(_, &score)| score == best)
        .map(|(&team, _)| team)
        .collect()
}

/// Wins each candidate earned against the teams in `opponents`.
pub fn record_against(
    schedule: &Schedule,
    season: &SeasonState,
    candidates: &[TeamId],
    opponents: &[TeamId],
) -> Vec<u32> {
    candidates
        .iter()
        .map(|&team| {
            schedule
                .games_of(team)
                .iter()
                .filter(|&&g| {
                    let opponent = schedule.games()[g].opponent_of(team);
                    opponent.is_some_and(|o| opponents.contains(&o))
                        && season.winner_of(schedule, g) == Some(team)
                })
                .count() as u32
        })
        .collect()
}

/// Teams outside the candidate set that every candidate played.
pub fn common_opponents(schedule: &Schedule, candidates: &[TeamId]) -> Vec<TeamId> {
    let Some((&first, rest)) = candidates.split_first() else {
        return Vec::new();
    };
    schedule
        .opponents(first)
        .iter()
        .copied()
        .filter(|o| !candidates.contains(o))
        .filter(|&o| rest.iter().all(|&team| schedule.plays(team, o)))
        .collect()
}

/// Sum of the current win totals of every distinct opponent `team` played.
pub fn strength_of_schedule(schedule: &Schedule, season: &SeasonState, team: TeamId) -> u32 {
    schedule
        .opponents(team)
        .iter()
        .map(|&o| season.wins(o))
        .sum()
}

/// Head-to-head among the group.
///
/// When every pair in the group has met, the best intra-group record
/// survives. Otherwise only teams that beat every other member
/// (k - 1 wins) survive, and if none did the group is unchanged.
pub fn head_to_head(
    schedule: &Schedule,
    season: &SeasonState,
    candidates: &[TeamId],
) -> Vec<TeamId> {
    if candidates.len() < 2 {
        return candidates.to_vec();
    }
    let wins = record_against(schedule, season, candidates, candidates);
    let k = candidates.len() as u32;
    let played: u32 = wins.iter().sum();

    if played == k * (k - 1) / 2 {
        return keep_max(candidates, &wins);
    }

    let unbeaten: Vec<TeamId> = candidates
        .iter()
        .zip(&wins)
        .filter(|(_, &w)| w == k - 1)
        .map(|(&team, _)| team)
        .collect();
    if unbeaten.is_empty() {
        candidates.to_vec()
    } else {
        unbeaten
    }
}

/// Record against common opponents one win-total tier at a time, from the
/// conference's best record down. The first tier that separates the
/// group decides.
pub fn tiered_common_record(
    schedule: &Schedule,
    season: &SeasonState,
    candidates: &[TeamId],
) -> Vec<TeamId> {
    let common = common_opponents(schedule, candidates);
    if common.is_empty() {
        return candidates.to_vec();
    }

    for tier in (0..=season.max_wins()).rev() {
        let at_tier: Vec<TeamId> = common
            .iter()
            .copied()
            .filter(|&o| season.wins(o) == tier)
            .collect();
        if at_tier.is_empty() {
            continue;
        }

        let record = record_against(schedule, season, candidates, &at_tier);
        let kept = keep_max(candidates, &record);
        if kept.len() < candidates.len() {
            log::trace!("tier {} separated {:?} -> {:?}", tier, candidates, kept);
            return kept;
        }
    }

    candidates.to_vec()
}

/// Record against the full set of common opponents.
pub fn overall_common_record(
    schedule: &Schedule,
    season: &SeasonState,
    candidates: &[TeamId],
) -> Vec<TeamId> {
    let common = common_opponents(schedule, candidates);
    if common.is_empty() {
        return candidates.to_vec();
    }
    let record = record_against(schedule, season, candidates, &common);
    keep_max(candidates, &record)
}

pub fn strength_of_schedule_rule(
    schedule: &Schedule,
    season: &SeasonState,
    candidates: &[TeamId],
) -> Vec<TeamId> {
    let strength: Vec<u32> = candidates
        .iter()
        .map(|&team| strength_of_schedule(schedule, season, team))
        .collect();
    keep_max(candidates, &strength)
}

/// Break a tie between exactly two teams.
pub fn resolve_pair<R: RandomSource + ?Sized>(
    schedule: &Schedule,
    season: &SeasonState,
    pair: [TeamId; 2],
    rng: &mut R,
) -> TieBreak {
    let mut sizes = vec![2];
    let [a, b] = pair;

    if let Some(winner) = schedule
        .game_between(a, b)
        .and_then(|g| season.winner_of(schedule, g))
    {
        sizes.push(1);
        return TieBreak {
            winner,
            used_random: false,
            criterion: Criterion::HeadToHead,
            sizes,
        };
    }

    for (criterion, rule) in &GROUP_RULES[1..] {
        if let [winner] = rule(schedule, season, &pair[..])[..] {
            sizes.push(1);
            return TieBreak {
                winner,
                used_random: false,
                criterion: *criterion,
                sizes,
            };
        }
    }

    sizes.push(1);
    TieBreak {
        winner: pair[rng.pick_index(2)],
        used_random: true,
        criterion: Criterion::Random,
        sizes,
    }
}

/// Break a tie among any non-empty set of teams.
pub fn resolve<R: RandomSource + ?Sized>(
    schedule: &Schedule,
    season: &SeasonState,
    candidates: &[TeamId],
    rng: &mut R,
) -> TieBreak {
    assert!(!candidates.is_empty(), "tie-break needs at least one candidate");

    let mut group = candidates.to_vec();
    group.sort_unstable();
    group.dedup();
    let mut sizes = vec![group.len()];

    while group.len() > 2 {
        let step = GROUP_RULES.iter().find_map(|(criterion, rule)| {
            let next = rule(schedule, season, &group[..]);
            (next.len() < group.len()).then_some((*criterion, next))
        });

        match step {
            Some((criterion, next)) => {
                log::trace!("{:?} reduced {:?} -> {:?}", criterion, group, next);
                group = next;
                sizes.push(group.len());
                if group.len() == 1 {
                    return TieBreak {
                        winner: group[0],
                        used_random: false,
                        criterion,
                        sizes,
                    };
                }
            }
            None => {
                let winner = group[rng.pick_index(group.len())];
                log::trace!("random draw among {:?} -> {}", group, winner);
                sizes.push(1);
                return TieBreak {
                    winner,
                    used_random: true,
                    criterion: Criterion::Random,
                    sizes,
                };
            }
        }
    }

    match group[..] {
        [a, b] => {
            let mut result = resolve_pair(schedule, season, [a, b], rng);
            sizes.extend_from_slice(&result.sizes[1..]);
            result.sizes = sizes;
            result
        }
        _ => TieBreak {
            winner: group[0],
            used_random: false,
            criterion: Criterion::Unopposed,
            sizes,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceSource;
    use crate::schedule::ScheduleRow;
    use crate::season::simulate;
    use crate::testing::{decided_season, ids};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_single_candidate() {
        let (schedule, season) = decided_season(&[("A", "B")], 1);
        let result = resolve(&schedule, &season, &[1], &mut SequenceSource::constant(0.0));
        assert_eq!(result.winner, 1);
        assert_eq!(result.criterion, Criterion::Unopposed);
        assert!(!result.used_random);
    }

    #[test]
    fn test_pair_head_to_head() {
        // A beat B, B beat C, C beat A: everyone has one win
        let (schedule, season) = decided_season(&[("A", "B"), ("B", "C"), ("C", "A")], 2);
        let [a, b] = [0, 1];
        let mut source = SequenceSource::constant(0.99);

        let first = resolve_pair(&schedule, &season, [a, b], &mut source);
        let second = resolve_pair(&schedule, &season, [b, a], &mut source);

        assert_eq!(first.winner, a);
        assert_eq!(first.criterion, Criterion::HeadToHead);
        assert!(!first.used_random);
        assert_eq!(first, second);
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_pair_tiered_common_opponents() {
        // C (2 wins) outranks D (1 win); A beat C, B lost to C
        let (schedule, season) = decided_season(
            &[("A", "C"), ("C", "B"), ("D", "A"), ("B", "D"), ("C", "E")],
            2,
        );
        let t = ids(&schedule, &["A", "B", "C", "D"]);
        assert_eq!(season.wins(t[2]), 2);
        assert_eq!(common_opponents(&schedule, &t[..2]), vec![t[2], t[3]]);

        let result = resolve(&schedule, &season, &t[..2], &mut SequenceSource::constant(0.0));
        assert_eq!(result.winner, t[0]);
        assert_eq!(result.criterion, Criterion::TieredCommonOpponents);
    }

    #[test]
    fn test_pair_strength_of_schedule() {
        let (schedule, season) = decided_season(
            &[("A", "C"), ("B", "D"), ("C", "E"), ("F", "D"), ("E", "F"), ("C", "F")],
            2,
        );
        let t = ids(&schedule, &["A", "B"]);
        assert!(common_opponents(&schedule, &t).is_empty());
        assert_eq!(strength_of_schedule(&schedule, &season, t[0]), 2);
        assert_eq!(strength_of_schedule(&schedule, &season, t[1]), 0);

        let result = resolve(&schedule, &season, &t, &mut SequenceSource::constant(0.9));
        assert_eq!(result.winner, t[0]);
        assert_eq!(result.criterion, Criterion::StrengthOfSchedule);
    }

    #[test]
    fn test_three_isolated_teams_fall_back_to_random() {
        // No games among A, B, C and no shared opponents
        let (schedule, season) = decided_season(&[("A", "X"), ("B", "Y"), ("C", "Z")], 1);
        let group = ids(&schedule, &["A", "B", "C"]);
        assert!(group.iter().all(|&t| season.wins(t) == 1));

        let result = resolve(&schedule, &season, &group, &mut SequenceSource::constant(0.5));
        assert!(result.used_random);
        assert_eq!(result.criterion, Criterion::Random);
        assert_eq!(result.winner, group[1]);
        assert_eq!(result.sizes, vec![3, 1]);
    }

    #[test]
    fn test_cyclic_three_way_tie_is_random() {
        let (schedule, season) = decided_season(&[("A", "B"), ("B", "C"), ("C", "A")], 2);
        let mut source = SequenceSource::constant(0.0);

        let result = resolve(&schedule, &season, &[0, 1, 2], &mut source);
        assert!(result.used_random);
        assert_eq!(result.winner, 0);
        assert_eq!(source.draws(), 1);
    }

    #[test]
    fn test_group_head_to_head_full_round_robin() {
        // A beats B and C, B beats C; all tied on overall wins via other games
        let (schedule, season) = decided_season(
            &[
                ("A", "B"),
                ("A", "C"),
                ("B", "C"),
                ("D", "A"),
                ("E", "A"),
                ("B", "D"),
                ("C", "D"),
                ("C", "E"),
                ("D", "E"),
                ("E", "B"),
            ],
            4,
        );
        let group = ids(&schedule, &["A", "B", "C"]);
        assert!(group.iter().all(|&t| season.wins(t) == 2));

        assert_eq!(head_to_head(&schedule, &season, &group), vec![group[0]]);
        let result = resolve(&schedule, &season, &group, &mut SequenceSource::constant(0.5));
        assert_eq!(result.winner, group[0]);
        assert_eq!(result.criterion, Criterion::HeadToHead);
        assert!(!result.used_random);
    }

    #[test]
    fn test_group_head_to_head_partial_requires_unbeaten() {
        // A beat B and C, B and C never met
        let (schedule, season) =
            decided_season(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")], 2);
        let group = ids(&schedule, &["A", "B", "C"]);
        assert_eq!(head_to_head(&schedule, &season, &group), vec![group[0]]);

        // B beat C, nobody beat both others: unchanged
        let (schedule, season) = decided_season(&[("B", "C"), ("A", "D")], 1);
        let group = ids(&schedule, &["A", "B", "C"]);
        assert_eq!(head_to_head(&schedule, &season, &group), group);
    }

    #[test]
    fn test_group_shrinks_to_pair_then_head_to_head() {
        // B, C and D finish 2-1. Only B-D was played inside the group.
        // A (2 wins) and E (1 win) are their common opponents.
        let (schedule, season) = decided_season(
            &[
                ("B", "D"),
                ("B", "A"),
                ("D", "A"),
                ("A", "C"),
                ("E", "B"),
                ("D", "E"),
                ("C", "E"),
                ("C", "F"),
                ("A", "F"),
            ],
            3,
        );
        let group = ids(&schedule, &["B", "C", "D"]);
        assert!(group.iter().all(|&t| season.wins(t) == 2));
        assert_eq!(head_to_head(&schedule, &season, &group), group);
        assert_eq!(common_opponents(&schedule, &group), ids(&schedule, &["A", "E"]));
        assert_eq!(
            tiered_common_record(&schedule, &season, &group),
            ids(&schedule, &["B", "D"])
        );

        let result = resolve(&schedule, &season, &group, &mut SequenceSource::constant(0.0));
        assert_eq!(result.winner, group[0]);
        assert_eq!(result.criterion, Criterion::HeadToHead);
        assert_eq!(result.sizes, vec![3, 2, 1]);
        assert!(!result.used_random);
    }

    #[test]
    fn test_overall_common_record() {
        let (schedule, season) = decided_season(&[("A", "C"), ("C", "B"), ("A", "D"), ("B", "D")], 2);
        let pair = ids(&schedule, &["A", "B"]);
        assert_eq!(overall_common_record(&schedule, &season, &pair), vec![pair[0]]);
        assert_eq!(record_against(&schedule, &season, &pair, &ids(&schedule, &["C", "D"])), vec![2, 1]);
    }

    #[test]
    fn test_strength_of_schedule_counts_each_opponent_once() {
        let rows = vec![
            ScheduleRow::new("A", "B", 1.0),
            ScheduleRow::new("A", "B", 0.0),
            ScheduleRow::new("B", "C", 1.0),
        ];
        let schedule = Schedule::new(&rows, 2).unwrap();
        let mut season = SeasonState::new(&schedule);
        simulate(&schedule, &mut season, &mut SequenceSource::constant(0.5));

        assert_eq!(season.wins(1), 2);
        assert_eq!(strength_of_schedule(&schedule, &season, 0), 2);
        assert_eq!(strength_of_schedule(&schedule, &season, 2), 2);
    }

    fn round_robin(n: usize) -> Schedule {
        let names: Vec<String> = (0..n).map(|i| format!("T{:02}", i)).collect();
        let mut rows = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                rows.push(ScheduleRow::new(&names[i], &names[j], 0.5));
            }
        }
        Schedule::new(&rows, (n - 1) as u32).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn resolution_always_terminates_with_a_member(seed in any::<u64>(), n in 3usize..9) {
            let schedule = round_robin(n);
            let mut season = SeasonState::new(&schedule);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            simulate(&schedule, &mut season, &mut rng);

            let top = season.max_wins();
            let group: Vec<TeamId> = (0..n).filter(|&t| season.wins(t) == top).collect();
            let result = resolve(&schedule, &season, &group, &mut rng);

            prop_assert!(group.contains(&result.winner));
            prop_assert_eq!(result.sizes[0], group.len());
            prop_assert_eq!(*result.sizes.last().unwrap(), 1);
            prop_assert!(result.sizes.windows(2).all(|w| w[1] <= w[0]));
            prop_assert!(result.sizes.len() <= group.len() + 1);

            if !result.used_random {
                let again = resolve(&schedule, &season, &group, &mut SequenceSource::constant(0.0));
                prop_assert_eq!(again, result);
            }
        }
    }
}
