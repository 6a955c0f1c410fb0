use crate::shots::{ShotMade, ShotRecord, ShotTable, contains_ignore_case};

/// Which outcomes to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Either,
    Made,
    Missed,
}

impl Outcome {
    fn accepts(self, made: ShotMade) -> bool {
        match self {
            Outcome::Either => true,
            Outcome::Made => made.is_made(),
            Outcome::Missed => made.is_missed(),
        }
    }
}

/// Criteria combined with logical AND; `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotFilter {
    pub player_name: Option<String>,
    pub player_id: Option<i64>,
    pub game_id: Option<String>,
    pub team: Option<String>,
    pub period: Option<i64>,
    pub shot_type: Option<String>,
    pub outcome: Outcome,
}

impl ShotFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = Some(name.into());
        self
    }

    pub fn player_id(mut self, id: i64) -> Self {
        self.player_id = Some(id);
        self
    }

    pub fn game_id(mut self, id: impl Into<String>) -> Self {
        self.game_id = Some(id.into());
        self
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn period(mut self, period: i64) -> Self {
        self.period = Some(period);
        self
    }

    pub fn shot_type(mut self, shot_type: impl Into<String>) -> Self {
        self.shot_type = Some(shot_type.into());
        self
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn made_only(self, made: Option<bool>) -> Self {
        self.outcome(match made {
            Some(true) => Outcome::Made,
            Some(false) => Outcome::Missed,
            None => Outcome::Either,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == ShotFilter::default()
    }

    pub fn matches(&self, shot: &ShotRecord) -> bool {
        if let Some(name) = self.player_name.as_deref() {
            if !contains_ignore_case(shot.player_name.as_deref(), name) {
                return false;
            }
        }
        if let Some(id) = self.player_id {
            if shot.player_id != Some(id) {
                return false;
            }
        }
        if let Some(game) = self.game_id.as_deref() {
            if shot.game_id != game {
                return false;
            }
        }
        if let Some(team) = self.team.as_deref() {
            let same = shot
                .team
                .as_deref()
                .is_some_and(|t| t.to_uppercase() == team.to_uppercase());
            if !same {
                return false;
            }
        }
        if let Some(period) = self.period {
            if shot.period != Some(period) {
                return false;
            }
        }
        if let Some(kind) = self.shot_type.as_deref() {
            if !shot.shot_type_contains(kind) {
                return false;
            }
        }
        self.outcome.accepts(shot.shot_made)
    }
}

/// Returns a new table holding the rows of `table` that satisfy `filter`.
pub fn filter_shots(table: &ShotTable, filter: &ShotFilter) -> ShotTable {
    let rows = table
        .iter()
        .filter(|shot| filter.matches(shot))
        .cloned()
        .collect();
    table.with_rows(rows)
}
