use crate::error::ShotDataError;
use crate::shots::{ShotRecord, ShotTable};

struct RangeCheck {
    value: fn(&ShotRecord) -> Option<f64>,
    min: f64,
    max: f64,
    message: &'static str,
}

const RANGE_CHECKS: [RangeCheck; 6] = [
    RangeCheck {
        value: |r| r.period.map(|v| v as f64),
        min: 1.0,
        max: 10.0,
        message: "shots with unusual period values",
    },
    RangeCheck {
        value: |r| r.minutes_remaining.map(|v| v as f64),
        min: 0.0,
        max: 12.0,
        message: "shots with minutes outside 0-12 range",
    },
    RangeCheck {
        value: |r| r.seconds_remaining.map(|v| v as f64),
        min: 0.0,
        max: 59.0,
        message: "shots with seconds outside 0-59 range",
    },
    RangeCheck {
        value: |r| r.shot_distance,
        min: 0.0,
        max: 50.0,
        message: "shots with distance outside 0-50 feet",
    },
    RangeCheck {
        value: |r| r.loc_x,
        min: -300.0,
        max: 300.0,
        message: "shots with loc_x outside court bounds",
    },
    RangeCheck {
        value: |r| r.loc_y,
        min: -100.0,
        max: 500.0,
        message: "shots with loc_y outside court bounds",
    },
];

/// Flags implausible values, one warning per violated range.
///
/// In strict mode any warning becomes a single [`ShotDataError::Validation`]
/// carrying all warning lines.
pub fn validate_ranges(table: &ShotTable, strict: bool) -> Result<Vec<String>, ShotDataError> {
    let mut warnings = Vec::new();
    for check in &RANGE_CHECKS {
        // Null cells never count; an all-null column yields no warning.
        let violations = table
            .iter()
            .filter_map(check.value)
            .filter(|v| *v < check.min || *v > check.max)
            .count();
        if violations > 0 {
            warnings.push(format!("Found {violations} {}", check.message));
        }
    }

    if strict && !warnings.is_empty() {
        return Err(ShotDataError::Validation(format!(
            "Data validation warnings:\n{}",
            warnings.join("\n")
        )));
    }
    Ok(warnings)
}
