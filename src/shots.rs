use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Columns every shot table must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    "game_id",
    "player_id",
    "player_name",
    "team",
    "period",
    "minutes_remaining",
    "seconds_remaining",
    "shot_made",
    "shot_type",
    "shot_distance",
    "loc_x",
    "loc_y",
    "shot_zone",
    "action_type",
];

/// One untyped cell as delivered by a CSV file or the stats API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// NaN floats count as missing, like an empty CSV cell.
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Int(i)
                } else {
                    n.as_f64().map(RawValue::Float).unwrap_or(RawValue::Null)
                }
            }
            serde_json::Value::String(s) => RawValue::Text(s.clone()),
            other => RawValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => Ok(()),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(i) => write!(f, "{i}"),
            RawValue::Float(x) if x.is_nan() => Ok(()),
            RawValue::Float(x) => write!(f, "{x}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

/// A header row plus untyped rows, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawValue>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row`/`col`; short rows read as missing.
    pub fn cell(&self, row: usize, col: usize) -> &RawValue {
        static MISSING: RawValue = RawValue::Null;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&MISSING)
    }

    /// Renames headers found in `mapping`, leaving others untouched.
    pub fn rename_columns(&self, mapping: &[(&str, &str)]) -> RawTable {
        let headers = self
            .headers
            .iter()
            .map(|h| {
                mapping
                    .iter()
                    .find(|(from, _)| *from == h)
                    .map(|(_, to)| (*to).to_string())
                    .unwrap_or_else(|| h.clone())
            })
            .collect();
        RawTable {
            headers,
            rows: self.rows.clone(),
        }
    }

    /// Projects onto the listed columns that exist, in the listed order.
    pub fn select(&self, columns: &[&str]) -> RawTable {
        let picks: Vec<(String, usize)> = columns
            .iter()
            .filter_map(|c| self.column_index(c).map(|idx| ((*c).to_string(), idx)))
            .collect();
        let headers = picks.iter().map(|(name, _)| name.clone()).collect();
        let rows = (0..self.rows.len())
            .map(|r| picks.iter().map(|(_, c)| self.cell(r, *c).clone()).collect())
            .collect();
        RawTable { headers, rows }
    }

    /// Appends a column computed from each existing row.
    pub fn with_column(
        &self,
        name: &str,
        mut f: impl FnMut(&[RawValue]) -> RawValue,
    ) -> RawTable {
        let mut headers = self.headers.clone();
        headers.push(name.to_string());
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = row.clone();
                out.resize(self.headers.len(), RawValue::Null);
                out.push(f(row));
                out
            })
            .collect();
        RawTable { headers, rows }
    }
}

/// Outcome of a shot: made, missed, or not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotMade {
    Made,
    Missed,
    Unknown,
}

impl ShotMade {
    pub fn from_option(value: Option<bool>) -> Self {
        match value {
            Some(true) => ShotMade::Made,
            Some(false) => ShotMade::Missed,
            None => ShotMade::Unknown,
        }
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            ShotMade::Made => Some(true),
            ShotMade::Missed => Some(false),
            ShotMade::Unknown => None,
        }
    }

    pub fn is_made(self) -> bool {
        self == ShotMade::Made
    }

    pub fn is_missed(self) -> bool {
        self == ShotMade::Missed
    }
}

/// One field-goal attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRecord {
    pub game_id: String,
    pub player_id: Option<i64>,
    pub player_name: Option<String>,
    pub team: Option<String>,
    pub period: Option<i64>,
    pub minutes_remaining: Option<i64>,
    pub seconds_remaining: Option<i64>,
    pub shot_made: ShotMade,
    pub shot_type: Option<String>,
    pub shot_distance: Option<f64>,
    pub loc_x: Option<f64>,
    pub loc_y: Option<f64>,
    pub shot_zone: Option<String>,
    pub action_type: Option<String>,
    /// Values of pass-through columns, aligned with `ShotTable::extra_columns`.
    pub extra: Vec<RawValue>,
}

impl ShotRecord {
    /// True when `shot_type` mentions `tag` (case-insensitive).
    pub fn shot_type_contains(&self, tag: &str) -> bool {
        contains_ignore_case(self.shot_type.as_deref(), tag)
    }

    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.loc_x, self.loc_y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        }
    }

    fn schema_cell(&self, column: &str) -> Option<String> {
        let text = match column {
            "game_id" => Some(self.game_id.clone()),
            "player_id" => self.player_id.map(|v| v.to_string()),
            "player_name" => self.player_name.clone(),
            "team" => self.team.clone(),
            "period" => self.period.map(|v| v.to_string()),
            "minutes_remaining" => self.minutes_remaining.map(|v| v.to_string()),
            "seconds_remaining" => self.seconds_remaining.map(|v| v.to_string()),
            "shot_made" => self.shot_made.as_option().map(|v| v.to_string()),
            "shot_type" => self.shot_type.clone(),
            "shot_distance" => self.shot_distance.map(|v| v.to_string()),
            "loc_x" => self.loc_x.map(|v| v.to_string()),
            "loc_y" => self.loc_y.map(|v| v.to_string()),
            "shot_zone" => self.shot_zone.clone(),
            "action_type" => self.action_type.clone(),
            _ => return None,
        };
        Some(text.unwrap_or_default())
    }
}

pub(crate) fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

/// Normalized, read-only table of shots. Transformations return new tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotTable {
    columns: Arc<[String]>,
    extra_columns: Arc<[String]>,
    rows: Arc<[ShotRecord]>,
}

impl ShotTable {
    pub(crate) fn from_parts(
        columns: Vec<String>,
        extra_columns: Vec<String>,
        rows: Vec<ShotRecord>,
    ) -> Self {
        Self {
            columns: columns.into(),
            extra_columns: extra_columns.into(),
            rows: rows.into(),
        }
    }

    /// Builds a table with exactly the required columns.
    pub fn from_records(rows: Vec<ShotRecord>) -> Self {
        let columns = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.extra.clear();
                r
            })
            .collect();
        Self::from_parts(columns, Vec::new(), rows)
    }

    /// Same column set, different rows.
    pub(crate) fn with_rows(&self, rows: Vec<ShotRecord>) -> Self {
        Self {
            columns: Arc::clone(&self.columns),
            extra_columns: Arc::clone(&self.extra_columns),
            rows: rows.into(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn rows(&self) -> &[ShotRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShotRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text rendition of a cell, empty for missing values.
    pub fn cell_text(&self, row: &ShotRecord, column: &str) -> String {
        if let Some(text) = row.schema_cell(column) {
            return text;
        }
        self.extra_columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| row.extra.get(idx))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// Distinct non-null player names in first-seen order.
    pub fn player_names(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in self.rows.iter().filter_map(|r| r.player_name.as_ref()) {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a ShotTable {
    type Item = &'a ShotRecord;
    type IntoIter = std::slice::Iter<'a, ShotRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
