use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use shotchart::api::StatsClient;
use shotchart::chart::{ChartOptions, SaveOptions, ShotChart};
use shotchart::config::{AppConfig, DEFAULT_TEAM};
use shotchart::filter::{Outcome, ShotFilter, filter_shots};
use shotchart::loader::{LoadOptions, load_shots_csv, write_shots_csv};
use shotchart::logging;
use shotchart::report::export_report;
use shotchart::shots::ShotTable;
use shotchart::summary::summarize;

#[derive(Parser)]
#[command(name = "shotchart")]
#[command(about = "Basketball shot charts from CSV files or the NBA stats API", long_about = None)]
struct Cli {
    /// Season override, e.g. 2024-25
    #[arg(long, global = true)]
    season: Option<String>,

    /// Bypass the on-disk response cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Response cache directory
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct FilterArgs {
    #[arg(long)]
    player: Option<String>,
    #[arg(long)]
    player_id: Option<i64>,
    #[arg(long)]
    game: Option<String>,
    #[arg(long)]
    team: Option<String>,
    #[arg(long)]
    period: Option<i64>,
    /// Substring of the shot type, e.g. 3PT
    #[arg(long)]
    shot_type: Option<String>,
    #[arg(long, conflicts_with = "missed")]
    made: bool,
    #[arg(long)]
    missed: bool,
}

impl FilterArgs {
    fn to_filter(&self) -> ShotFilter {
        let mut filter = ShotFilter::new();
        if let Some(name) = &self.player {
            filter = filter.player_name(name);
        }
        if let Some(id) = self.player_id {
            filter = filter.player_id(id);
        }
        if let Some(game) = &self.game {
            filter = filter.game_id(game);
        }
        if let Some(team) = &self.team {
            filter = filter.team(team);
        }
        if let Some(period) = self.period {
            filter = filter.period(period);
        }
        if let Some(kind) = &self.shot_type {
            filter = filter.shot_type(kind);
        }
        if self.made {
            filter = filter.outcome(Outcome::Made);
        } else if self.missed {
            filter = filter.outcome(Outcome::Missed);
        }
        filter
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print shooting totals for a CSV file
    Summary {
        input: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        /// Fail on out-of-range values instead of warning
        #[arg(long)]
        strict: bool,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Render an SVG or PNG shot chart from a CSV file
    Chart {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        title: Option<String>,
        /// Use the purple/grey team color scheme
        #[arg(long)]
        team_colors: bool,
        /// Draw baseline and sidelines
        #[arg(long)]
        outer_lines: bool,
        #[arg(long)]
        dpi: Option<u32>,
    },
    /// Fetch every shot of one game
    FetchGame {
        game_id: String,
        /// Restrict to one team (abbreviation)
        #[arg(long)]
        team: Option<String>,
        /// Write the shots to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also render a chart here (.svg or .png)
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Fetch a player's season of shots
    FetchPlayer {
        name: String,
        #[arg(long)]
        team: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// List a team's games, most recent first
    Schedule {
        #[arg(default_value = DEFAULT_TEAM)]
        team: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Export an XLSX report for a CSV file
    Report {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Delete cached API responses
    ClearCache,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    logging::init(&config.log_filter);

    if let Some(season) = cli.season {
        config.season = season;
    }
    if cli.no_cache {
        config.api.use_cache = false;
    }
    if let Some(dir) = cli.cache_dir {
        config.api.cache_dir = Some(dir);
    }

    match cli.command {
        Commands::Summary {
            input,
            filter,
            strict,
            json,
        } => {
            let shots = load(&input, strict)?;
            let shots = filter_shots(&shots, &filter.to_filter());
            let summary = summarize(&shots);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Shots: {}", summary.total_shots);
                println!("FG: {}", summary.fg_line());
                if let Some(line) = summary.breakdown_line() {
                    println!("{line}");
                }
                println!(
                    "Players: {}  Games: {}",
                    summary.unique_players, summary.unique_games
                );
            }
        }
        Commands::Chart {
            input,
            output,
            filter,
            title,
            team_colors,
            outer_lines,
            dpi,
        } => {
            let shots = load(&input, false)?;
            let shots = filter_shots(&shots, &filter.to_filter());
            if shots.is_empty() {
                bail!("no shots match the given filters");
            }
            let mut options = ChartOptions {
                title,
                outer_lines,
                ..ChartOptions::default()
            };
            if team_colors {
                options = options.team_colors();
            }
            let mut save = SaveOptions::default();
            if let Some(dpi) = dpi {
                save.dpi = dpi;
            }
            render(&shots, options, &output, &save)?;
        }
        Commands::FetchGame {
            game_id,
            team,
            output,
            chart,
        } => {
            let client = StatsClient::new(config.api.clone())?;
            let team_id = team
                .as_deref()
                .map(|t| client.find_team_id(t))
                .transpose()?;
            let shots = client.game_shots(&game_id, team_id)?;
            println!("Game {game_id}: {}", summarize(&shots).fg_line());
            emit(&shots, output.as_deref(), chart.as_deref(), &format!("Game {game_id}"))?;
        }
        Commands::FetchPlayer {
            name,
            team,
            output,
            chart,
        } => {
            let client = StatsClient::new(config.api.clone())?;
            let team_id = team
                .as_deref()
                .map(|t| client.find_team_id(t))
                .transpose()?;
            let shots = client.player_shots(&name, &config.season, team_id)?;
            if shots.is_empty() {
                println!("{name}: no shots in {}", config.season);
                return Ok(());
            }
            let label = shots
                .player_names()
                .into_iter()
                .next()
                .unwrap_or_else(|| name.clone());
            println!("{label} {}: {}", config.season, summarize(&shots).fg_line());
            emit(&shots, output.as_deref(), chart.as_deref(), &label)?;
        }
        Commands::Schedule { team, limit } => {
            let client = StatsClient::new(config.api.clone())?;
            let games = client.team_schedule(&team, &config.season)?;
            for game in games.iter().take(limit) {
                println!(
                    "{}  {:<12} {:<14} {:<2} {:>4}",
                    game.game_id,
                    game.game_date.as_deref().unwrap_or("-"),
                    game.matchup.as_deref().unwrap_or("-"),
                    game.wl.as_deref().unwrap_or("-"),
                    game.pts.map(|p| p.to_string()).unwrap_or_default(),
                );
            }
        }
        Commands::Report {
            input,
            output,
            filter,
        } => {
            let shots = load(&input, false)?;
            let shots = filter_shots(&shots, &filter.to_filter());
            let report = export_report(&shots, &output)?;
            println!(
                "Wrote {} ({} players, {} shots)",
                output.display(),
                report.players,
                report.shots
            );
        }
        Commands::ClearCache => {
            let client = StatsClient::new(config.api.clone())?;
            let removed = client.clear_cache();
            let dir = client
                .cache()
                .dir()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "(none)".to_string());
            println!("Removed {removed} cached responses from {dir}");
        }
    }

    Ok(())
}

fn load(path: &Path, strict: bool) -> Result<ShotTable> {
    let loaded = load_shots_csv(
        path,
        LoadOptions {
            check_ranges: true,
            strict,
        },
    )
    .with_context(|| format!("failed loading {}", path.display()))?;
    Ok(loaded.table)
}

fn render(
    shots: &ShotTable,
    options: ChartOptions,
    output: &Path,
    save: &SaveOptions,
) -> Result<()> {
    let mut chart = ShotChart::new(shots, options);
    let written = chart.save(output, save)?;
    chart.close();
    info!(path = %written.display(), "chart saved");
    println!("Chart: {}", written.display());
    Ok(())
}

fn emit(shots: &ShotTable, csv: Option<&Path>, chart: Option<&Path>, title: &str) -> Result<()> {
    if let Some(path) = csv {
        write_shots_csv(shots, path)?;
        println!("Shots: {}", path.display());
    }
    if let Some(path) = chart {
        let options = ChartOptions::default().titled(title);
        render(shots, options, path, &SaveOptions::default())?;
    }
    Ok(())
}

