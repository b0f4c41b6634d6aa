use std::{
    collections::HashSet,
    fs,
    io::{BufRead, BufReader, Write},
    path::Path
};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    error::{EloError, Result},
    model::{
        rating_history::RatingHistory,
        structures::{home_away_neutral::HomeAwayNeutral, match_record::MatchRecord}
    }
};

pub use self::column_mapping::{ColumnMapping, ResolvedColumns};

pub mod column_mapping;

pub type Row = Map<String, Value>;

/// An in-memory table of match results: ordered rows of named, JSON-typed cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTable {
    rows: Vec<Row>
}

impl MatchTable {
    pub fn new(rows: Vec<Row>) -> MatchTable {
        MatchTable { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parses a JSON array of objects
    pub fn from_json_str(json: &str) -> Result<MatchTable> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| into_row(i, v))
                .collect::<Result<Vec<Row>>>()
                .map(MatchTable::new),
            _ => Err(EloError::InvalidTable("expected a JSON array of objects".to_string()))
        }
    }

    /// Parses one JSON object per line, skipping blank lines
    pub fn from_json_lines(reader: impl BufRead) -> Result<MatchTable> {
        let mut rows = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let row = into_row(rows.len(), serde_json::from_str(&line)?)?;
            rows.push(row);
        }

        Ok(MatchTable::new(rows))
    }

    /// Loads a table from disk. Files ending in `.jsonl` are read as JSON lines.
    pub fn from_path(path: impl AsRef<Path>) -> Result<MatchTable> {
        let path = path.as_ref();
        info!("Loading match table from {}", path.display());

        let table = match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") => MatchTable::from_json_lines(BufReader::new(fs::File::open(path)?))?,
            _ => MatchTable::from_json_str(&fs::read_to_string(path)?)?
        };

        info!("Loaded {} rows", table.len());
        Ok(table)
    }

    /// Resolves every row into a [`MatchRecord`] using the column mapping.
    /// Fails on the first row with a missing column or an invalid value.
    pub fn records(&self, mapping: &ColumnMapping) -> Result<Vec<MatchRecord>> {
        let columns = mapping.resolve();
        debug!(?columns, "Resolved column mapping");

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| record_from_row(i, row, &columns))
            .collect()
    }
}

fn into_row(idx: usize, value: Value) -> Result<Row> {
    match value {
        Value::Object(row) => Ok(row),
        _ => Err(EloError::InvalidTable(format!("row {} is not a JSON object", idx)))
    }
}

fn record_from_row(row_idx: usize, row: &Row, columns: &ResolvedColumns) -> Result<MatchRecord> {
    Ok(MatchRecord {
        competitor_id: id_cell(row_idx, row, &columns.id)?,
        opponent_id: id_cell(row_idx, row, &columns.opp_id)?,
        own_score: number_cell(row_idx, row, &columns.score)?,
        opponent_score: number_cell(row_idx, row, &columns.opp_score)?,
        season: integer_cell(row_idx, row, &columns.season)?,
        period: period_cell(row_idx, row, &columns.period)?,
        home_away_neutral: han_cell(row_idx, row, &columns.han)?
    })
}

fn cell<'a>(row_idx: usize, row: &'a Row, column: &str) -> Result<&'a Value> {
    match row.get(column) {
        Some(Value::Null) | None => Err(EloError::MissingColumn {
            row: row_idx,
            column: column.to_string()
        }),
        Some(value) => Ok(value)
    }
}

fn invalid(row_idx: usize, column: &str, reason: impl Into<String>) -> EloError {
    EloError::InvalidValue {
        row: row_idx,
        column: column.to_string(),
        reason: reason.into()
    }
}

fn id_cell(row_idx: usize, row: &Row, column: &str) -> Result<String> {
    match cell(row_idx, row, column)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid(row_idx, column, format!("expected an id, found {}", other)))
    }
}

fn number_cell(row_idx: usize, row: &Row, column: &str) -> Result<f64> {
    match cell(row_idx, row, column)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(row_idx, column, format!("{} is not representable as a float", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(row_idx, column, e.to_string())),
        other => Err(invalid(row_idx, column, format!("expected a number, found {}", other)))
    }
}

fn integer_cell(row_idx: usize, row: &Row, column: &str) -> Result<i32> {
    let value = cell(row_idx, row, column)?;
    let parsed = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            // Whole floats such as 3.0 are accepted
            None => n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)
        },
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None
    };

    parsed
        .and_then(|i| i32::try_from(i).ok())
        .ok_or_else(|| invalid(row_idx, column, format!("expected an integer, found {}", value)))
}

/// Periods need a successor to stamp the ratings that leave them
fn period_cell(row_idx: usize, row: &Row, column: &str) -> Result<i32> {
    match integer_cell(row_idx, row, column)? {
        i32::MAX => Err(invalid(row_idx, column, format!("periods must be below {}", i32::MAX))),
        period => Ok(period)
    }
}

/// A missing or null flag is left unset and treated as neutral downstream
fn han_cell(row_idx: usize, row: &Row, column: &str) -> Result<Option<HomeAwayNeutral>> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s.parse::<HomeAwayNeutral>().map(Some),
        Some(other) => Err(EloError::UnknownHomeAwayNeutral(other.to_string()))
    }
}

/// Output rows `{id, season, period, rating}` named with the mapped columns
pub fn history_rows(history: &RatingHistory, mapping: &ColumnMapping) -> Vec<Row> {
    let columns = mapping.resolve();

    history
        .entries()
        .iter()
        .map(|entry| {
            let mut row = Row::new();
            row.insert(columns.id.clone(), Value::from(entry.competitor_id.clone()));
            row.insert(columns.season.clone(), Value::from(entry.season));
            row.insert(columns.period.clone(), Value::from(entry.period));
            // Non-finite ratings have no JSON representation and are written as null
            row.insert(columns.rating.clone(), Value::from(entry.rating));
            row
        })
        .collect()
}

pub fn write_history(history: &RatingHistory, mapping: &ColumnMapping, writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(writer, &history_rows(history, mapping))?;
    Ok(())
}

type SymmetryKey<'a> = (i32, i32, &'a str, &'a str, u64, u64, Option<HomeAwayNeutral>);

fn symmetry_key(m: &MatchRecord) -> SymmetryKey<'_> {
    (
        m.season,
        m.period,
        m.competitor_id.as_str(),
        m.opponent_id.as_str(),
        m.own_score.to_bits(),
        m.opponent_score.to_bits(),
        m.home_away_neutral
    )
}

/// Records without a mirror record: same season and period, ids and scores
/// swapped, home/away flag inverted.
pub fn asymmetric_records(records: &[MatchRecord]) -> Vec<&MatchRecord> {
    let keys: HashSet<SymmetryKey> = records.iter().map(symmetry_key).collect();

    records
        .iter()
        .filter(|m| {
            let mirror_key = (
                m.season,
                m.period,
                m.opponent_id.as_str(),
                m.competitor_id.as_str(),
                m.opponent_score.to_bits(),
                m.own_score.to_bits(),
                m.home_away_neutral.map(HomeAwayNeutral::mirror)
            );
            !keys.contains(&mirror_key)
        })
        .collect()
}
