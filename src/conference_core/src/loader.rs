//! Reading and writing the delimited schedule table.
//!
//! Format: a `teamName,opponent,teamPercentage` header followed by one row
//! per conference game, where `teamPercentage` is the chance that
//! `teamName` wins.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::LoadError;
use crate::schedule::{Schedule, ScheduleRow};

pub const HEADER: [&str; 3] = ["teamName", "opponent", "teamPercentage"];

/// Parse schedule rows from any reader.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ScheduleRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let row = i + 2;
        if record.len() < 3 {
            return Err(LoadError::ShortRow {
                row,
                found: record.len(),
            });
        }

        let value = &record[2];
        let probability: f64 = value
            .parse()
            .map_err(|_| LoadError::UnparsableProbability {
                row,
                value: value.to_string(),
            })?;

        rows.push(ScheduleRow::new(&record[0], &record[1], probability));
    }

    Ok(rows)
}

/// Load and validate a schedule file.
pub fn load_schedule(path: &Path, games_per_team: u32) -> Result<Schedule, LoadError> {
    let file = std::fs::File::open(path)?;
    let rows = read_rows(file)?;
    let schedule = Schedule::new(&rows, games_per_team)?;

    log::info!(
        "Loaded {} games for {} teams from {}",
        schedule.games().len(),
        schedule.team_count(),
        path.display()
    );

    Ok(schedule)
}

/// Write the schedule in canonical orientation.
pub fn write_schedule<W: Write>(schedule: &Schedule, writer: W) -> Result<(), LoadError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;
    for row in schedule.rows() {
        writer.write_record([
            row.team.as_str(),
            row.opponent.as_str(),
            &row.probability.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_schedule(schedule: &Schedule, path: &Path) -> Result<(), LoadError> {
    let file = std::fs::File::create(path)?;
    write_schedule(schedule, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;

    const SMALL: &str = "teamName,opponent,teamPercentage
Kansas,Baylor,0.65
TCU,Kansas, 1.0
Baylor,TCU,0
";

    #[test]
    fn test_read_rows() {
        let rows = read_rows(SMALL.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ScheduleRow::new("Kansas", "Baylor", 0.65));
        assert_eq!(rows[1].probability, 1.0);
    }

    #[test]
    fn test_unparsable_probability_is_fatal() {
        let data = "teamName,opponent,teamPercentage\nKansas,Baylor,65%\n";
        match read_rows(data.as_bytes()) {
            Err(LoadError::UnparsableProbability { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "65%");
            }
            other => panic!("expected parse failure, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_rejected() {
        let data = "teamName,opponent,teamPercentage\nKansas,Baylor\n";
        assert!(matches!(
            read_rows(data.as_bytes()),
            Err(LoadError::ShortRow { row: 2, found: 2 })
        ));
    }

    #[test]
    fn test_write_then_read_preserves_schedule() {
        let rows = read_rows(SMALL.as_bytes()).unwrap();
        let schedule = Schedule::new(&rows, 2).unwrap();

        let mut buffer = Vec::new();
        write_schedule(&schedule, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("teamName,opponent,teamPercentage"));

        let reread = Schedule::new(&read_rows(text.as_bytes()).unwrap(), 2).unwrap();
        assert_eq!(reread.games(), schedule.games());
    }

    #[test]
    fn test_load_schedule_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.csv");
        std::fs::write(&path, SMALL).unwrap();

        let err = load_schedule(&path, 9).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Schedule(ScheduleError::FixtureCount {
                expected: 13,
                found: 3
            })
        ));
    }
}
