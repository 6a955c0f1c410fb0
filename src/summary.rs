use std::collections::HashSet;

use serde::Serialize;

use crate::shots::{ShotRecord, ShotTable};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotSummary {
    pub total_shots: usize,
    pub made_shots: usize,
    pub missed_shots: usize,
    pub unknown_shots: usize,
    pub fg_pct: f64,
    pub two_pt_made: usize,
    pub two_pt_total: usize,
    pub two_pt_pct: f64,
    pub three_pt_made: usize,
    pub three_pt_total: usize,
    pub three_pt_pct: f64,
    pub unique_players: usize,
    pub unique_games: usize,
}

// A shot_type holding both tags counts in both splits.
pub fn summarize(table: &ShotTable) -> ShotSummary {
    let shots = table.rows();
    let (made, missed) = outcome_counts(shots.iter());
    let (two_made, two_total) = split(shots, "2PT");
    let (three_made, three_total) = split(shots, "3PT");

    let players: HashSet<&str> = shots
        .iter()
        .filter_map(|s| s.player_name.as_deref())
        .collect();
    let games: HashSet<&str> = shots.iter().map(|s| s.game_id.as_str()).collect();

    ShotSummary {
        total_shots: shots.len(),
        made_shots: made,
        missed_shots: missed,
        unknown_shots: shots.len() - made - missed,
        fg_pct: pct(made, shots.len()),
        two_pt_made: two_made,
        two_pt_total: two_total,
        two_pt_pct: pct(two_made, two_total),
        three_pt_made: three_made,
        three_pt_total: three_total,
        three_pt_pct: pct(three_made, three_total),
        unique_players: players.len(),
        unique_games: games.len(),
    }
}

fn outcome_counts<'a>(shots: impl Iterator<Item = &'a ShotRecord>) -> (usize, usize) {
    shots.fold((0, 0), |(made, missed), s| {
        (
            made + usize::from(s.shot_made.is_made()),
            missed + usize::from(s.shot_made.is_missed()),
        )
    })
}

fn split(shots: &[ShotRecord], tag: &str) -> (usize, usize) {
    let subset: Vec<&ShotRecord> = shots.iter().filter(|s| s.shot_type_contains(tag)).collect();
    let (made, _) = outcome_counts(subset.iter().copied());
    (made, subset.len())
}

fn pct(made: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        made as f64 / total as f64
    }
}

impl ShotSummary {
    /// `made/total (pct%)` with one decimal, e.g. `12/30 (40.0%)`.
    pub fn fg_line(&self) -> String {
        format!(
            "{}/{} ({:.1}%)",
            self.made_shots,
            self.total_shots,
            self.fg_pct * 100.0
        )
    }

    /// 2PT/3PT breakdown, skipping empty splits.
    pub fn breakdown_line(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.two_pt_total > 0 {
            parts.push(format!(
                "2PT: {}/{} ({:.1}%)",
                self.two_pt_made,
                self.two_pt_total,
                self.two_pt_pct * 100.0
            ));
        }
        if self.three_pt_total > 0 {
            parts.push(format!(
                "3PT: {}/{} ({:.1}%)",
                self.three_pt_made,
                self.three_pt_total,
                self.three_pt_pct * 100.0
            ));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("  |  "))
        }
    }
}
