//! Summaries of a finished run, for printing or JSON export.

use std::fmt;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::constants::CONFIDENCE_LEVEL;
use crate::schedule::Schedule;
use crate::simulation::{SimulationConfig, Tally};

/// Two-sided confidence interval on a rate, in percent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

/// Wilson score interval for `successes` out of `trials`.
pub fn wilson_interval(successes: u64, trials: u64, confidence: f64) -> Interval {
    if trials == 0 {
        return Interval { low: 0.0, high: 0.0 };
    }
    let normal = Normal::new(0.0, 1.0).expect("standard normal parameters are valid");
    let z = normal.inverse_cdf(0.5 + confidence / 2.0);

    let n = trials as f64;
    let p = successes as f64 / n;
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let half = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;

    Interval {
        low: 100.0 * (center - half).max(0.0),
        high: 100.0 * (center + half).min(1.0),
    }
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TeamOdds {
    pub team: String,
    pub first: u64,
    pub second: u64,
    pub first_pct: f64,
    pub second_pct: f64,
    pub championship_pct: f64,
    pub championship_interval: Interval,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchupOdds {
    pub team_a: String,
    pub team_b: String,
    pub count: u64,
    pub pct: f64,
}

/// One row of the distinguished team's record distribution.
#[derive(Clone, Debug, Serialize)]
pub struct RecordBucket {
    pub wins: u32,
    pub losses: u32,
    pub count: u64,
    pub pct: f64,
    /// Share of these seasons ending in a championship game appearance
    pub championship_pct: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    pub trials: u64,
    pub teams: Vec<TeamOdds>,
    pub matchups: Vec<MatchupOdds>,
    pub distinguished_team: String,
    pub records: Vec<RecordBucket>,
    pub random_trials: u64,
    pub random_fallbacks: u64,
    pub skipped_records: u64,
}

impl SimulationReport {
    pub fn new(schedule: &Schedule, config: &SimulationConfig, tally: &Tally) -> Self {
        let trials = tally.trials;

        let mut teams: Vec<TeamOdds> = schedule
            .team_names()
            .iter()
            .enumerate()
            .map(|(id, name)| {
                let first = tally.first[id];
                let second = tally.second[id];
                TeamOdds {
                    team: name.clone(),
                    first,
                    second,
                    first_pct: percent(first, trials),
                    second_pct: percent(second, trials),
                    championship_pct: percent(first + second, trials),
                    championship_interval: wilson_interval(first + second, trials, CONFIDENCE_LEVEL),
                }
            })
            .collect();
        teams.sort_by(|a, b| {
            (b.first + b.second)
                .cmp(&(a.first + a.second))
                .then_with(|| a.team.cmp(&b.team))
        });

        let cutoff = trials as f64 * config.matchup_threshold;
        let mut matchups: Vec<MatchupOdds> = tally
            .matchups
            .iter()
            .filter(|(_, &count)| count as f64 > cutoff)
            .map(|(&(a, b), &count)| MatchupOdds {
                team_a: schedule.team_name(a).to_string(),
                team_b: schedule.team_name(b).to_string(),
                count,
                pct: percent(count, trials),
            })
            .collect();
        matchups.sort_by(|a, b| b.count.cmp(&a.count));

        let records = tally
            .record_histogram
            .iter()
            .zip(&tally.championship_histogram)
            .enumerate()
            .filter(|(_, (&count, _))| count > 0)
            .map(|(wins, (&count, &championships))| RecordBucket {
                wins: wins as u32,
                losses: config.season_games.saturating_sub(wins as u32),
                count,
                pct: percent(count, trials),
                championship_pct: percent(championships, count),
            })
            .collect();

        SimulationReport {
            trials,
            teams,
            matchups,
            distinguished_team: config.distinguished_team.clone(),
            records,
            random_trials: tally.random_trials,
            random_fallbacks: tally.random_fallbacks,
            skipped_records: tally.skipped_records,
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(40);
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "CONFERENCE CHAMPIONSHIP SIMULATION RESULTS")?;
        writeln!(f, "{}", "=".repeat(60))?;

        writeln!(f, "\nCHAMPIONSHIP GAME ODDS:\n{}", rule)?;
        for team in &self.teams {
            writeln!(
                f,
                "{:<15}: {:.1}% ({:.1}% 1st, {:.1}% 2nd) [{:.1}-{:.1}]",
                team.team,
                team.championship_pct,
                team.first_pct,
                team.second_pct,
                team.championship_interval.low,
                team.championship_interval.high
            )?;
        }

        writeln!(f, "\nMOST LIKELY CHAMPIONSHIP MATCHUPS:\n{}", rule)?;
        for matchup in &self.matchups {
            let label = format!("{} vs {}", matchup.team_a, matchup.team_b);
            writeln!(f, "{:<30}: {:.1}%", label, matchup.pct)?;
        }

        let name = self.distinguished_team.to_uppercase();
        writeln!(f, "\n{} RECORD DISTRIBUTION:\n{}", name, rule)?;
        for bucket in &self.records {
            writeln!(f, "{}-{} record: {:.1}%", bucket.wins, bucket.losses, bucket.pct)?;
        }

        writeln!(f, "\n{} CHAMPIONSHIP ODDS BY RECORD:\n{}", name, rule)?;
        for bucket in &self.records {
            writeln!(
                f,
                "{}-{} record: {:.1}%",
                bucket.wins, bucket.losses, bucket.championship_pct
            )?;
        }

        writeln!(f, "\nSIMULATION STATISTICS:\n{}", rule)?;
        writeln!(f, "Total simulations: {}", self.trials)?;
        writeln!(f, "Random tiebreakers used: {}", self.random_fallbacks)?;
        write!(f, "Seasons needing a random tiebreaker: {}", self.random_trials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Simulator;
    use crate::testing::decided_schedule;

    #[test]
    fn test_wilson_interval_brackets_rate() {
        let interval = wilson_interval(500, 1000, 0.95);
        assert!(interval.low < 50.0 && interval.high > 50.0);
        assert!((interval.high - interval.low - 6.2).abs() < 0.1);

        let certain = wilson_interval(1000, 1000, 0.95);
        assert!((certain.high - 100.0).abs() < 1e-9);
        assert!(certain.low > 99.0);

        assert_eq!(wilson_interval(0, 0, 0.95), Interval { low: 0.0, high: 0.0 });
    }

    #[test]
    fn test_report_from_deterministic_run() {
        let schedule = decided_schedule(
            &[("A", "B"), ("A", "C"), ("A", "D"), ("B", "C"), ("B", "D"), ("C", "D")],
            3,
        );
        let config = SimulationConfig {
            trials: 200,
            seed: Some(1),
            ..SimulationConfig::new("C")
        };
        let tally = Simulator::new(&schedule, config.clone()).unwrap().run();
        let report = SimulationReport::new(&schedule, &config, &tally);

        assert_eq!(report.teams[0].team, "A");
        assert!((report.teams[0].first_pct - 100.0).abs() < 1e-9);
        assert_eq!(report.teams[1].team, "B");
        assert!((report.teams[1].championship_pct - 100.0).abs() < 1e-9);
        assert_eq!(report.matchups.len(), 1);
        assert_eq!(report.matchups[0].team_a, "A");
        assert_eq!(report.matchups[0].team_b, "B");

        // C: 1 conference win + 3 external = 4-8
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].wins, 4);
        assert_eq!(report.records[0].losses, 8);
        assert_eq!(report.records[0].championship_pct, 0.0);

        let text = report.to_string();
        assert!(text.contains("A vs B"));
        assert!(text.contains("C RECORD DISTRIBUTION"));
        assert!(text.contains("4-8 record: 100.0%"));
        assert!(text.contains("Random tiebreakers used: 0"));
    }

    #[test]
    fn test_report_serializes() {
        let schedule = decided_schedule(&[("A", "B")], 1);
        let config = SimulationConfig {
            trials: 10,
            seed: Some(1),
            ..SimulationConfig::new("A")
        };
        let tally = Simulator::new(&schedule, config.clone()).unwrap().run();
        let json = serde_json::to_value(SimulationReport::new(&schedule, &config, &tally)).unwrap();
        assert_eq!(json["trials"], 10);
        assert_eq!(json["teams"][0]["team"], "A");
    }
}
