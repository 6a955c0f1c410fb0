use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use shotchart::loader::write_shots_csv;
use shotchart::shots::{ShotMade, ShotRecord, ShotTable};

const ROSTER: &[(i64, &str)] = &[
    (1628368, "De'Aaron Fox"),
    (1627734, "Domantas Sabonis"),
    (1631099, "Keegan Murray"),
    (201942, "DeMar DeRozan"),
    (1630169, "Malik Monk"),
];

const ZONES: &[&str] = &[
    "Restricted Area",
    "In The Paint (Non-RA)",
    "Mid-Range",
    "Left Corner 3",
    "Right Corner 3",
    "Above the Break 3",
];

/// Writes a synthetic shot CSV for demos and manual testing.
#[derive(Parser)]
#[command(name = "sample_shots")]
struct Args {
    #[arg(short, long, default_value = "data/sample_shots.csv")]
    output: PathBuf,
    #[arg(long, default_value_t = 3)]
    games: usize,
    #[arg(long, default_value_t = 40)]
    shots_per_game: usize,
    #[arg(long, default_value = "SAC")]
    team: String,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut rows = Vec::with_capacity(args.games * args.shots_per_game);
    for game in 0..args.games {
        let game_id = format!("00224{:05}", 100 + game);
        for _ in 0..args.shots_per_game {
            rows.push(random_shot(&mut rng, &game_id, &args.team));
        }
    }
    let table = ShotTable::from_records(rows);
    write_shots_csv(&table, &args.output)
        .with_context(|| format!("failed writing {}", args.output.display()))?;
    println!("Wrote {} shots to {}", table.len(), args.output.display());
    Ok(())
}

fn random_shot(rng: &mut impl Rng, game_id: &str, team: &str) -> ShotRecord {
    let (player_id, player_name) = ROSTER[rng.gen_range(0..ROSTER.len())];
    let zone = ZONES[rng.gen_range(0..ZONES.len())];

    // Location in tenths of a foot, basket at the origin.
    let (x, y) = match zone {
        "Restricted Area" => polar(rng, 0.0, 40.0, 0.0, 180.0),
        "In The Paint (Non-RA)" => (rng.gen_range(-80.0..80.0), rng.gen_range(40.0..140.0)),
        "Mid-Range" => polar(rng, 100.0, 225.0, 15.0, 165.0),
        "Left Corner 3" => (rng.gen_range(-245.0..-222.0), rng.gen_range(-40.0..85.0)),
        "Right Corner 3" => (rng.gen_range(222.0..245.0), rng.gen_range(-40.0..85.0)),
        _ => polar(rng, 240.0, 280.0, 25.0, 155.0),
    };
    let distance = (x * x + y * y).sqrt() / 10.0;
    let three = zone.ends_with('3');
    let make_prob = if distance < 4.0 {
        0.62
    } else if three {
        0.36
    } else {
        0.42
    };

    let period = rng.gen_range(1..=4);
    let action = if distance < 4.0 {
        "Driving Layup Shot"
    } else if three {
        "Jump Shot"
    } else {
        "Pullup Jump shot"
    };

    ShotRecord {
        game_id: game_id.to_string(),
        player_id: Some(player_id),
        player_name: Some(player_name.to_string()),
        team: Some(team.to_uppercase()),
        period: Some(period),
        minutes_remaining: Some(rng.gen_range(0..12)),
        seconds_remaining: Some(rng.gen_range(0..60)),
        shot_made: ShotMade::from_option(Some(rng.gen_bool(make_prob))),
        shot_type: Some(if three { "3PT Field Goal" } else { "2PT Field Goal" }.to_string()),
        shot_distance: Some(distance.round()),
        loc_x: Some(x.round()),
        loc_y: Some(y.round()),
        shot_zone: Some(zone.to_string()),
        action_type: Some(action.to_string()),
        extra: Vec::new(),
    }
}

fn polar(rng: &mut impl Rng, r_min: f64, r_max: f64, deg_min: f64, deg_max: f64) -> (f64, f64) {
    let r = rng.gen_range(r_min..r_max);
    let theta = rng.gen_range(deg_min..deg_max).to_radians();
    (r * theta.cos(), r * theta.sin())
}
