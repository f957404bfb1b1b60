use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::report::SimulationReport;
use crate::schedule::{Schedule, ScheduleRow};
use crate::simulation::{SimulationConfig, Simulator};

/// Aggregated results of a simulation run.
#[pyclass]
#[derive(Clone, Debug)]
pub struct SimulationSummary {
    #[pyo3(get)]
    pub trials: u64,

    /// Team name -> (first-place finishes, second-place finishes)
    #[pyo3(get)]
    pub placements: HashMap<String, (u64, u64)>,

    /// (team, team, count) for every pairing above the report threshold
    #[pyo3(get)]
    pub matchups: Vec<(String, String, u64)>,

    /// Adjusted wins -> (seasons, championship appearance rate in percent)
    #[pyo3(get)]
    pub records: HashMap<u32, (u64, f64)>,

    #[pyo3(get)]
    pub random_tiebreakers: u64,

    report_text: String,
}

#[pymethods]
impl SimulationSummary {
    fn __str__(&self) -> String {
        self.report_text.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationSummary({} trials, {} teams)",
            self.trials,
            self.placements.len()
        )
    }
}

impl SimulationSummary {
    fn from_report(report: &SimulationReport) -> Self {
        SimulationSummary {
            trials: report.trials,
            placements: report
                .teams
                .iter()
                .map(|t| (t.team.clone(), (t.first, t.second)))
                .collect(),
            matchups: report
                .matchups
                .iter()
                .map(|m| (m.team_a.clone(), m.team_b.clone(), m.count))
                .collect(),
            records: report
                .records
                .iter()
                .map(|r| (r.wins, (r.count, r.championship_pct)))
                .collect(),
            random_tiebreakers: report.random_fallbacks,
            report_text: report.to_string(),
        }
    }
}

/// Simulate a conference season many times.
///
/// `rows` are `(team, opponent, probability team wins)` tuples.
#[pyfunction]
#[pyo3(signature = (rows, team, games_per_team = 9, trials = 100_000, external_wins = 3, season_games = 12, seed = None, parallel = false))]
#[allow(clippy::too_many_arguments)]
fn simulate_conference(
    rows: Vec<(String, String, f64)>,
    team: String,
    games_per_team: u32,
    trials: usize,
    external_wins: i64,
    season_games: u32,
    seed: Option<u64>,
    parallel: bool,
) -> PyResult<SimulationSummary> {
    let rows: Vec<ScheduleRow> = rows
        .into_iter()
        .map(|(a, b, p)| ScheduleRow::new(a, b, p))
        .collect();
    let schedule =
        Schedule::new(&rows, games_per_team).map_err(|e| PyValueError::new_err(e.to_string()))?;

    let config = SimulationConfig {
        trials,
        external_wins,
        season_games,
        seed,
        parallel,
        ..SimulationConfig::new(team)
    };
    let simulator =
        Simulator::new(&schedule, config.clone()).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let tally = simulator.run();

    Ok(SimulationSummary::from_report(&SimulationReport::new(&schedule, &config, &tally)))
}

/// Python module definition
#[pymodule]
fn conference_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<SimulationSummary>()?;
    m.add_function(wrap_pyfunction!(simulate_conference, m)?)?;
    m.add("DEFAULT_TRIALS", crate::constants::DEFAULT_TRIALS)?;
    Ok(())
}
