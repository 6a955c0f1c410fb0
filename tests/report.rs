use std::path::PathBuf;

use shotchart::filter::{ShotFilter, filter_shots};
use shotchart::loader::{LoadOptions, load_shots_csv};
use shotchart::report::export_report;

#[test]
fn report_counts_players_and_shots() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("sample_shots.csv");
    let table = load_shots_csv(&path, LoadOptions::default()).unwrap().table;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports").join("shots.xlsx");
    let report = export_report(&table, &out).unwrap();
    assert_eq!(report.players, 4);
    assert_eq!(report.shots, 10);
    assert!(out.metadata().unwrap().len() > 0);

    let sac = filter_shots(&table, &ShotFilter::new().team("SAC"));
    let report = export_report(&sac, &dir.path().join("sac.xlsx")).unwrap();
    assert_eq!(report.players, 3);
    assert_eq!(report.shots, 8);
}
