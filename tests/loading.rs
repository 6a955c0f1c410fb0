use std::fs;
use std::path::PathBuf;

use shotchart::error::ShotDataError;
use shotchart::loader::{LoadOptions, load_shots_csv, parse_csv, read_raw_csv, write_shots_csv};
use shotchart::normalize::{normalize, parse_shot_made, validate_columns};
use shotchart::shots::{REQUIRED_COLUMNS, RawTable, RawValue, ShotMade};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn schema_headers() -> Vec<String> {
    REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn one_row(shot_made: RawValue) -> RawTable {
    let mut row = vec![RawValue::Null; REQUIRED_COLUMNS.len()];
    row[0] = RawValue::text("0022400101");
    row[7] = shot_made;
    RawTable::new(schema_headers(), vec![row])
}

#[test]
fn loads_fixture_with_extra_column() {
    let loaded = load_shots_csv(&fixture_path("sample_shots.csv"), LoadOptions::default())
        .expect("fixture should load");
    let table = loaded.table;
    assert_eq!(table.len(), 10);
    assert!(loaded.warnings.is_empty());
    assert_eq!(table.extra_columns(), ["game_date".to_string()]);
    assert_eq!(table.columns().last().map(String::as_str), Some("game_date"));

    let first = &table.rows()[0];
    assert_eq!(first.game_id, "0022400101");
    assert_eq!(first.player_id, Some(1628368));
    assert_eq!(first.period, Some(1));
    assert_eq!(first.shot_made, ShotMade::Made);
    assert_eq!(first.loc_x, Some(-12.0));
    assert_eq!(table.cell_text(first, "game_date"), "2024-10-24");

    let outcomes: Vec<ShotMade> = table.iter().map(|s| s.shot_made).collect();
    assert_eq!(outcomes[2], ShotMade::Made);
    assert_eq!(outcomes[3], ShotMade::Missed);
    assert_eq!(outcomes[4], ShotMade::Made);
    assert_eq!(outcomes[5], ShotMade::Unknown);
    assert_eq!(outcomes[6], ShotMade::Made);
    assert_eq!(outcomes[7], ShotMade::Missed);
}

#[test]
fn missing_team_column_is_reported_alone() {
    let headers: Vec<String> = schema_headers().into_iter().filter(|h| h != "team").collect();
    let err = validate_columns(&headers).unwrap_err();
    assert_eq!(err.missing_columns(), Some(&["team".to_string()][..]));
    assert_eq!(err.to_string(), "Missing required columns: team");
}

#[test]
fn every_missing_column_is_listed_in_schema_order() {
    let headers = vec!["loc_y".to_string(), "game_id".to_string()];
    let err = validate_columns(&headers).unwrap_err();
    let missing = err.missing_columns().expect("structural failure");
    assert_eq!(missing.len(), 12);
    assert_eq!(missing[0], "player_id");
    assert_eq!(missing[11], "action_type");
}

#[test]
fn literal_outcomes_normalize_case_insensitively() {
    for lit in ["TRUE", " Yes ", "MADE", "y", "1"] {
        let table = normalize(&one_row(RawValue::text(lit))).unwrap();
        assert_eq!(table.rows()[0].shot_made, ShotMade::Made, "{lit}");
    }
    for lit in ["False", "NO", "missed", "N", "0"] {
        let table = normalize(&one_row(RawValue::text(lit))).unwrap();
        assert_eq!(table.rows()[0].shot_made, ShotMade::Missed, "{lit}");
    }
    let table = normalize(&one_row(RawValue::Null)).unwrap();
    assert_eq!(table.rows()[0].shot_made, ShotMade::Unknown);
}

#[test]
fn unknown_outcome_literal_fails_normalization() {
    assert!(matches!(
        parse_shot_made(&RawValue::text("maybe")),
        Err(ShotDataError::InvalidValue(ref lit)) if lit == "maybe"
    ));
    let err = normalize(&one_row(RawValue::text("maybe"))).unwrap_err();
    match err {
        ShotDataError::InvalidDataType { column, expected, detail } => {
            assert_eq!(column, "shot_made");
            assert_eq!(expected, "boolean");
            assert!(detail.contains("maybe"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fractional_period_is_a_type_error() {
    let mut raw = one_row(RawValue::Int(1));
    raw.rows[0][4] = RawValue::Float(2.5);
    let err = normalize(&raw).unwrap_err();
    assert!(matches!(
        err,
        ShotDataError::InvalidDataType { ref column, .. } if column == "period"
    ));
}

#[test]
fn unparseable_numbers_become_missing() {
    let mut raw = one_row(RawValue::Int(0));
    raw.rows[0][9] = RawValue::text("far");
    raw.rows[0][5] = RawValue::text("soon");
    let table = normalize(&raw).unwrap();
    assert_eq!(table.rows()[0].shot_distance, None);
    assert_eq!(table.rows()[0].minutes_remaining, None);
}

#[test]
fn file_errors_are_distinguished() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.csv");
    assert!(matches!(
        read_raw_csv(&missing),
        Err(ShotDataError::FileNotFound(_))
    ));

    let txt = dir.path().join("shots.txt");
    fs::write(&txt, "game_id\n1\n").unwrap();
    let err = read_raw_csv(&txt).unwrap_err();
    assert_eq!(err.to_string(), "Expected CSV file, got: .txt");

    let upper = dir.path().join("SHOTS.CSV");
    fs::write(&upper, "game_id\n1\n").unwrap();
    assert!(read_raw_csv(&upper).is_ok());

    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "").unwrap();
    assert!(matches!(read_raw_csv(&empty), Err(ShotDataError::Empty)));

    let header_only = dir.path().join("header.csv");
    fs::write(&header_only, REQUIRED_COLUMNS.join(",") + "\n").unwrap();
    assert!(matches!(read_raw_csv(&header_only), Err(ShotDataError::Empty)));
}

#[test]
fn out_of_range_values_warn_or_fail() {
    let csv = format!(
        "{}\n\
         g1,1,A,SAC,1,5,10,1,2PT Field Goal,3,0,10,Restricted Area,Layup\n\
         g1,1,A,SAC,14,5,10,0,2PT Field Goal,3,0,10,Restricted Area,Layup\n\
         g1,1,A,SAC,2,5,10,0,3PT Field Goal,75,400,10,Above the Break 3,Heave\n",
        REQUIRED_COLUMNS.join(",")
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.csv");
    fs::write(&path, csv).unwrap();

    let loaded = load_shots_csv(&path, LoadOptions::default()).unwrap();
    assert_eq!(loaded.table.len(), 3);
    assert_eq!(
        loaded.warnings,
        vec![
            "Found 1 shots with unusual period values".to_string(),
            "Found 1 shots with distance outside 0-50 feet".to_string(),
            "Found 1 shots with loc_x outside court bounds".to_string(),
        ]
    );

    let strict = LoadOptions {
        check_ranges: true,
        strict: true,
    };
    let err = load_shots_csv(&path, strict).unwrap_err();
    assert!(matches!(err, ShotDataError::Validation(_)));
    assert!(err.to_string().starts_with("Data validation warnings:"));

    let unchecked = LoadOptions {
        check_ranges: false,
        strict: true,
    };
    assert!(load_shots_csv(&path, unchecked).unwrap().warnings.is_empty());
}

#[test]
fn written_csv_loads_back_with_same_rows() {
    let table = load_shots_csv(&fixture_path("sample_shots.csv"), LoadOptions::default())
        .unwrap()
        .table;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("copy.csv");
    write_shots_csv(&table, &out).unwrap();

    let again = load_shots_csv(&out, LoadOptions::default()).unwrap().table;
    assert_eq!(again.columns(), table.columns());
    assert_eq!(again.rows(), table.rows());
}

#[test]
fn parse_csv_keeps_header_order() {
    let raw = parse_csv(b"b,a\n1,\n").unwrap();
    assert_eq!(raw.headers, vec!["b", "a"]);
    assert_eq!(raw.rows[0], vec![RawValue::text("1"), RawValue::Null]);
}
