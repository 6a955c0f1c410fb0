use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{TeamInfo, team_by_abbreviation};
use crate::error::ApiError;
use crate::shots::{RawTable, RawValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: i64,
    pub full_name: String,
}

/// Exact case-insensitive name first, then substring; the first match wins.
pub fn find_player<'a>(players: &'a [PlayerRef], name: &str) -> Result<&'a PlayerRef, ApiError> {
    let needle = name.trim().to_lowercase();
    if let Some(p) = players.iter().find(|p| p.full_name.to_lowercase() == needle) {
        return Ok(p);
    }
    let mut matches = players
        .iter()
        .filter(|p| p.full_name.to_lowercase().contains(&needle));
    let Some(first) = matches.next() else {
        return Err(ApiError::PlayerNotFound(name.to_string()));
    };
    let others = matches.count();
    if others > 0 {
        debug!(
            query = name,
            picked = %first.full_name,
            others,
            "ambiguous player name, using first match"
        );
    }
    Ok(first)
}

pub fn find_team(abbrev: &str) -> Result<&'static TeamInfo, ApiError> {
    team_by_abbreviation(abbrev).ok_or_else(|| ApiError::TeamNotFound(abbrev.to_string()))
}

/// Player list from a `commonallplayers` result set.
pub fn players_from_table(raw: &RawTable) -> Vec<PlayerRef> {
    let (Some(id_col), Some(name_col)) = (
        raw.column_index("PERSON_ID"),
        raw.column_index("DISPLAY_FIRST_LAST"),
    ) else {
        return Vec::new();
    };
    (0..raw.len())
        .filter_map(|r| {
            let id = match raw.cell(r, id_col) {
                RawValue::Int(i) => *i,
                RawValue::Text(s) => s.trim().parse().ok()?,
                _ => return None,
            };
            let full_name = match raw.cell(r, name_col) {
                RawValue::Text(s) if !s.trim().is_empty() => s.trim().to_string(),
                _ => return None,
            };
            Some(PlayerRef { id, full_name })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{PlayerRef, find_player, find_team};
    use crate::error::ApiError;

    fn roster() -> Vec<PlayerRef> {
        vec![
            PlayerRef {
                id: 1628368,
                full_name: "De'Aaron Fox".into(),
            },
            PlayerRef {
                id: 1627734,
                full_name: "Domantas Sabonis".into(),
            },
            PlayerRef {
                id: 203992,
                full_name: "Fox Junior".into(),
            },
        ]
    }

    #[test]
    fn exact_match_beats_earlier_substring_match() {
        let players = vec![
            PlayerRef {
                id: 1,
                full_name: "Keegan Murray Jr".into(),
            },
            PlayerRef {
                id: 2,
                full_name: "Keegan Murray".into(),
            },
        ];
        assert_eq!(find_player(&players, "keegan murray").unwrap().id, 2);
    }

    #[test]
    fn ambiguous_substring_takes_first() {
        assert_eq!(find_player(&roster(), "fox").unwrap().id, 1628368);
    }

    #[test]
    fn unknown_player_is_a_lookup_error() {
        assert!(matches!(
            find_player(&roster(), "Nobody"),
            Err(ApiError::PlayerNotFound(_))
        ));
    }

    #[test]
    fn team_lookup_ignores_case() {
        assert_eq!(find_team("sac").unwrap().id, 1610612758);
        assert!(matches!(find_team("XYZ"), Err(ApiError::TeamNotFound(_))));
    }
}
