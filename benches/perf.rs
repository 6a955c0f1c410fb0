use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use shotchart::api::parse_result_set;
use shotchart::config::CourtSpec;
use shotchart::court::court_geometry;
use shotchart::filter::{Outcome, ShotFilter, filter_shots};
use shotchart::normalize::normalize;
use shotchart::shots::{REQUIRED_COLUMNS, RawTable, RawValue, ShotTable};
use shotchart::summary::summarize;

const PLAYERS: [&str; 4] = ["De'Aaron Fox", "Domantas Sabonis", "Keegan Murray", "Malik Monk"];

fn sample_raw(rows: usize) -> RawTable {
    let headers = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows = (0..rows)
        .map(|i| {
            let three = i % 3 == 0;
            vec![
                RawValue::text(format!("00224{:05}", i / 80)),
                RawValue::Int(1_628_000 + (i % 4) as i64),
                RawValue::text(PLAYERS[i % 4]),
                RawValue::text(if i % 5 == 0 { "GSW" } else { "SAC" }),
                RawValue::text(((i % 4) + 1).to_string()),
                RawValue::text((i % 12).to_string()),
                RawValue::text((i % 60).to_string()),
                RawValue::text(if i % 2 == 0 { "made" } else { "0" }),
                RawValue::text(if three { "3PT Field Goal" } else { "2PT Field Goal" }),
                RawValue::Float((i % 30) as f64),
                RawValue::Int((i % 500) as i64 - 250),
                RawValue::Int((i % 300) as i64),
                RawValue::text("Mid-Range"),
                RawValue::text("Jump Shot"),
            ]
        })
        .collect();
    RawTable::new(headers, rows)
}

fn sample_table(rows: usize) -> ShotTable {
    normalize(&sample_raw(rows)).expect("synthetic rows normalize")
}

fn sample_api_body(rows: usize) -> String {
    let row_json = (0..rows)
        .map(|i| {
            format!(
                r#"["0022400101", {}, "Player {}", "Sacramento Kings", 1, 5, 30, 1, "2PT Field Goal", 10, {}, {}, "Mid-Range", "Jump Shot"]"#,
                1_628_000 + i,
                i % 10,
                (i % 500) as i64 - 250,
                i % 300
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"resultSets":[{{"name":"Shot_Chart_Detail","headers":["GAME_ID","PLAYER_ID","PLAYER_NAME","TEAM_NAME","PERIOD","MINUTES_REMAINING","SECONDS_REMAINING","SHOT_MADE_FLAG","SHOT_TYPE","SHOT_DISTANCE","LOC_X","LOC_Y","SHOT_ZONE_BASIC","ACTION_TYPE"],"rowSet":[{row_json}]}}]}}"#
    )
}

fn bench_normalize(c: &mut Criterion) {
    let raw = sample_raw(5_000);
    c.bench_function("normalize_5k", |b| {
        b.iter(|| {
            let table = normalize(black_box(&raw)).unwrap();
            black_box(table.len());
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    let table = sample_table(5_000);
    let filter = ShotFilter::new()
        .player_name("fox")
        .team("sac")
        .shot_type("3pt")
        .outcome(Outcome::Made);
    c.bench_function("filter_5k", |b| {
        b.iter(|| {
            let picked = filter_shots(black_box(&table), black_box(&filter));
            black_box(picked.len());
        })
    });
}

fn bench_summary(c: &mut Criterion) {
    let table = sample_table(5_000);
    c.bench_function("summary_5k", |b| {
        b.iter(|| {
            let summary = summarize(black_box(&table));
            black_box(summary.fg_pct);
        })
    });
}

fn bench_court_geometry(c: &mut Criterion) {
    c.bench_function("court_geometry", |b| {
        b.iter(|| {
            let geometry = court_geometry(black_box(&CourtSpec::NBA), black_box(true));
            black_box(geometry.markings.len());
        })
    });
}

fn bench_parse_result_set(c: &mut Criterion) {
    let body = sample_api_body(2_000);
    c.bench_function("parse_result_set_2k", |b| {
        b.iter(|| {
            let raw = parse_result_set(black_box(&body), Some("Shot_Chart_Detail")).unwrap();
            black_box(raw.len());
        })
    });
}

criterion_group!(
    perf,
    bench_normalize,
    bench_filter,
    bench_summary,
    bench_court_geometry,
    bench_parse_result_set
);
criterion_main!(perf);
