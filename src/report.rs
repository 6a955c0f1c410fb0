use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::shots::ShotTable;
use crate::summary::{ShotSummary, summarize};

pub struct ExportReport {
    pub players: usize,
    pub shots: usize,
}

/// Writes a `Summary` sheet (overall row, then one row per player) and a
/// `Shots` sheet holding every column of `table`.
pub fn export_report(table: &ShotTable, path: &Path) -> Result<ExportReport> {
    let mut summary_rows = vec![vec![
        "Player".to_string(),
        "FGA".to_string(),
        "FGM".to_string(),
        "FG%".to_string(),
        "2PA".to_string(),
        "2PM".to_string(),
        "2P%".to_string(),
        "3PA".to_string(),
        "3PM".to_string(),
        "3P%".to_string(),
        "Games".to_string(),
    ]];
    summary_rows.push(summary_row("All shots", &summarize(table)));

    let players = table.player_names();
    for name in &players {
        let rows = table
            .iter()
            .filter(|r| r.player_name.as_deref() == Some(name.as_str()))
            .cloned()
            .collect();
        summary_rows.push(summary_row(name, &summarize(&table.with_rows(rows))));
    }

    let mut shot_rows = vec![table.columns().to_vec()];
    for shot in table {
        shot_rows.push(
            table
                .columns()
                .iter()
                .map(|c| table.cell_text(shot, c))
                .collect(),
        );
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create report dir {}", dir.display()))?;
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Shots")?;
        write_rows(sheet, &shot_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        players: players.len(),
        shots: table.len(),
    })
}

fn summary_row(label: &str, s: &ShotSummary) -> Vec<String> {
    vec![
        label.to_string(),
        s.total_shots.to_string(),
        s.made_shots.to_string(),
        format!("{:.1}", s.fg_pct * 100.0),
        s.two_pt_total.to_string(),
        s.two_pt_made.to_string(),
        format!("{:.1}", s.two_pt_pct * 100.0),
        s.three_pt_total.to_string(),
        s.three_pt_made.to_string(),
        format!("{:.1}", s.three_pt_pct * 100.0),
        s.unique_games.to_string(),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::summary_row;
    use crate::shots::{ShotMade, ShotRecord, ShotTable};
    use crate::summary::summarize;

    fn two_pointer(made: bool) -> ShotRecord {
        ShotRecord {
            game_id: "g1".into(),
            player_id: Some(7),
            player_name: Some("A".into()),
            team: Some("SAC".into()),
            period: Some(1),
            minutes_remaining: Some(3),
            seconds_remaining: Some(0),
            shot_made: ShotMade::from_option(Some(made)),
            shot_type: Some("2PT Field Goal".into()),
            shot_distance: Some(12.0),
            loc_x: Some(0.0),
            loc_y: Some(120.0),
            shot_zone: None,
            action_type: None,
            extra: Vec::new(),
        }
    }

    #[test]
    fn percentage_cells_are_percent_with_one_decimal() {
        let rows = (0..15).map(|i| two_pointer(i < 7)).collect();
        let row = summary_row("A", &summarize(&ShotTable::from_records(rows)));
        assert_eq!(row[1], "15");
        assert_eq!(row[2], "7");
        assert_eq!(row[3], "46.7");
        assert_eq!(row[6], "46.7");
        assert_eq!(row[9], "0.0");
    }
}
