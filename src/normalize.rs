//! Schema checks and type coercion from raw cells to [`ShotTable`].

use crate::error::ShotDataError;
use crate::shots::{REQUIRED_COLUMNS, RawTable, RawValue, ShotMade, ShotRecord, ShotTable};

const TRUE_LITERALS: [&str; 5] = ["true", "1", "yes", "made", "y"];
const FALSE_LITERALS: [&str; 5] = ["false", "0", "no", "missed", "n"];

static MISSING: RawValue = RawValue::Null;

/// Fails with every required column absent from `headers`, in schema order.
pub fn validate_columns(headers: &[String]) -> Result<(), ShotDataError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ShotDataError::MissingColumns(missing))
    }
}

/// Maps an already trimmed, lowercased literal onto a shot outcome.
pub fn shot_made_from_literal(literal: &str) -> Option<ShotMade> {
    if TRUE_LITERALS.contains(&literal) {
        Some(ShotMade::Made)
    } else if FALSE_LITERALS.contains(&literal) {
        Some(ShotMade::Missed)
    } else {
        None
    }
}

pub fn parse_shot_made(value: &RawValue) -> Result<ShotMade, ShotDataError> {
    if value.is_missing() {
        return Ok(ShotMade::Unknown);
    }
    match value {
        RawValue::Bool(b) => Ok(ShotMade::from_option(Some(*b))),
        RawValue::Int(i) => Ok(ShotMade::from_option(Some(*i != 0))),
        RawValue::Float(f) => Ok(ShotMade::from_option(Some(*f != 0.0))),
        RawValue::Text(s) => {
            let lowered = s.trim().to_lowercase();
            if let Some(made) = shot_made_from_literal(&lowered) {
                return Ok(made);
            }
            // Numeric text is numeric input.
            match lowered.parse::<f64>() {
                Ok(f) if f.is_nan() => Ok(ShotMade::Unknown),
                Ok(f) => Ok(ShotMade::from_option(Some(f != 0.0))),
                Err(_) => Err(ShotDataError::InvalidValue(s.clone())),
            }
        }
        RawValue::Null => Ok(ShotMade::Unknown),
    }
}

/// Checks the schema and coerces every required column to its canonical type.
///
/// Unknown columns are carried through untouched. Any column-level failure
/// aborts the whole normalization; no partial table is returned.
pub fn normalize(raw: &RawTable) -> Result<ShotTable, ShotDataError> {
    validate_columns(&raw.headers)?;

    let game_id = identifier_column(raw, "game_id");
    let player_id = integer_column(raw, "player_id")?;
    let player_name = text_column(raw, "player_name");
    let team = text_column(raw, "team");
    let shot_type = text_column(raw, "shot_type");
    let shot_zone = text_column(raw, "shot_zone");
    let action_type = text_column(raw, "action_type");
    let period = integer_column(raw, "period")?;
    let minutes = integer_column(raw, "minutes_remaining")?;
    let seconds = integer_column(raw, "seconds_remaining")?;
    let shot_made = shot_made_column(raw)?;
    let distance = float_column(raw, "shot_distance");
    let loc_x = float_column(raw, "loc_x");
    let loc_y = float_column(raw, "loc_y");

    let extra_idx: Vec<usize> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.as_str()))
        .map(|(idx, _)| idx)
        .collect();
    let extra_columns = extra_idx.iter().map(|i| raw.headers[*i].clone()).collect();

    let mut rows = Vec::with_capacity(raw.len());
    for r in 0..raw.len() {
        rows.push(ShotRecord {
            game_id: game_id[r].clone(),
            player_id: player_id[r],
            player_name: player_name[r].clone(),
            team: team[r].clone(),
            period: period[r],
            minutes_remaining: minutes[r],
            seconds_remaining: seconds[r],
            shot_made: shot_made[r],
            shot_type: shot_type[r].clone(),
            shot_distance: distance[r],
            loc_x: loc_x[r],
            loc_y: loc_y[r],
            shot_zone: shot_zone[r].clone(),
            action_type: action_type[r].clone(),
            extra: extra_idx.iter().map(|c| raw.cell(r, *c).clone()).collect(),
        });
    }

    Ok(ShotTable::from_parts(raw.headers.clone(), extra_columns, rows))
}

fn column_cells<'a>(raw: &'a RawTable, column: &str) -> impl Iterator<Item = &'a RawValue> {
    let idx = raw.column_index(column);
    (0..raw.len()).map(move |r| match idx {
        Some(c) => raw.cell(r, c),
        None => &MISSING,
    })
}

fn identifier_column(raw: &RawTable, column: &str) -> Vec<String> {
    column_cells(raw, column)
        .map(|v| match v {
            RawValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .collect()
}

fn text_column(raw: &RawTable, column: &str) -> Vec<Option<String>> {
    column_cells(raw, column)
        .map(|v| {
            if v.is_missing() {
                return None;
            }
            let text = v.to_string();
            if text == "nan" { None } else { Some(text) }
        })
        .collect()
}

fn integer_column(raw: &RawTable, column: &str) -> Result<Vec<Option<i64>>, ShotDataError> {
    column_cells(raw, column)
        .map(|v| {
            let number = match v {
                RawValue::Null => None,
                RawValue::Bool(b) => Some(i64::from(*b) as f64),
                RawValue::Int(i) => return Ok(Some(*i)),
                RawValue::Float(f) => Some(*f),
                RawValue::Text(s) => {
                    let trimmed = s.trim();
                    if let Ok(i) = trimmed.parse::<i64>() {
                        return Ok(Some(i));
                    }
                    trimmed.parse::<f64>().ok()
                }
            };
            match number {
                None => Ok(None),
                Some(f) if !f.is_finite() => Ok(None),
                Some(f) if f.fract() != 0.0 => Err(ShotDataError::InvalidDataType {
                    column: column.to_string(),
                    expected: "integer".to_string(),
                    detail: format!("cannot safely cast non-equivalent float {f} to integer"),
                }),
                Some(f) => Ok(Some(f as i64)),
            }
        })
        .collect()
}

fn float_column(raw: &RawTable, column: &str) -> Vec<Option<f64>> {
    column_cells(raw, column)
        .map(|v| match v {
            RawValue::Null => None,
            RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            RawValue::Int(i) => Some(*i as f64),
            RawValue::Float(f) => Some(*f).filter(|f| !f.is_nan()),
            RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
        })
        .collect()
}

fn shot_made_column(raw: &RawTable) -> Result<Vec<ShotMade>, ShotDataError> {
    column_cells(raw, "shot_made")
        .map(|v| {
            parse_shot_made(v).map_err(|err| ShotDataError::InvalidDataType {
                column: "shot_made".to_string(),
                expected: "boolean".to_string(),
                detail: err.to_string(),
            })
        })
        .collect()
}
