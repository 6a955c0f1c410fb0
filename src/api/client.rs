use std::thread;

use chrono::NaiveDate;
use once_cell::unsync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::cache::ResponseCache;
use crate::api::reference::{PlayerRef, find_player, find_team, players_from_table};
use crate::api::throttle::Throttle;
use crate::api::transport::{FetchFailure, HttpTransport, StatsTransport};
use crate::config::{ApiSettings, team_by_name};
use crate::error::ApiError;
use crate::normalize::normalize;
use crate::shots::{REQUIRED_COLUMNS, RawTable, RawValue, ShotTable};

/// Stats API column names mapped onto the shot schema.
pub const COLUMN_MAPPING: &[(&str, &str)] = &[
    ("GAME_ID", "game_id"),
    ("PLAYER_ID", "player_id"),
    ("PLAYER_NAME", "player_name"),
    ("TEAM_NAME", "team_name"),
    ("TEAM_ABBREVIATION", "team"),
    ("PERIOD", "period"),
    ("MINUTES_REMAINING", "minutes_remaining"),
    ("SECONDS_REMAINING", "seconds_remaining"),
    ("SHOT_MADE_FLAG", "shot_made"),
    ("SHOT_TYPE", "shot_type"),
    ("SHOT_DISTANCE", "shot_distance"),
    ("LOC_X", "loc_x"),
    ("LOC_Y", "loc_y"),
    ("SHOT_ZONE_BASIC", "shot_zone"),
    ("ACTION_TYPE", "action_type"),
    ("EVENT_TYPE", "event_type"),
    ("SHOT_ZONE_AREA", "shot_zone_area"),
    ("SHOT_ZONE_RANGE", "shot_zone_range"),
    ("GAME_DATE", "game_date"),
    ("HTM", "home_team"),
    ("VTM", "away_team"),
];

const SCHEDULE_MAPPING: &[(&str, &str)] = &[
    ("GAME_ID", "game_id"),
    ("GAME_DATE", "game_date"),
    ("MATCHUP", "matchup"),
    ("WL", "wl"),
    ("PTS", "pts"),
    ("PLUS_MINUS", "plus_minus"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledGame {
    pub game_id: String,
    pub game_date: Option<String>,
    pub matchup: Option<String>,
    pub wl: Option<String>,
    pub pts: Option<i64>,
    pub plus_minus: Option<f64>,
}

pub struct StatsClient<T: StatsTransport = HttpTransport> {
    transport: T,
    settings: ApiSettings,
    cache: ResponseCache,
    throttle: Throttle,
    players: OnceCell<Vec<PlayerRef>>,
}

impl StatsClient<HttpTransport> {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&settings.base_url, settings.timeout)?;
        Ok(Self::with_transport(transport, settings))
    }
}

impl<T: StatsTransport> StatsClient<T> {
    pub fn with_transport(transport: T, settings: ApiSettings) -> Self {
        let cache = ResponseCache::new(settings.cache_dir.clone(), settings.use_cache);
        let throttle = Throttle::new(settings.request_delay);
        Self {
            transport,
            settings,
            cache,
            throttle,
            players: OnceCell::new(),
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn find_team_id(&self, abbrev: &str) -> Result<u32, ApiError> {
        find_team(abbrev).map(|t| t.id)
    }

    pub fn find_player_id(&self, name: &str, season: &str) -> Result<i64, ApiError> {
        let players = self.players(season)?;
        find_player(players, name).map(|p| p.id)
    }

    fn players(&self, season: &str) -> Result<&[PlayerRef], ApiError> {
        let list = self.players.get_or_try_init(|| {
            let key = format!("players_{season}");
            let raw = self.cached(&key, || {
                self.request(
                    "commonallplayers",
                    &[
                        ("LeagueID", "00".to_string()),
                        ("Season", season.to_string()),
                        ("IsOnlyCurrentSeason", "0".to_string()),
                    ],
                    Some("CommonAllPlayers"),
                )
            })?;
            Ok::<_, ApiError>(players_from_table(&raw))
        })?;
        Ok(list)
    }

    /// Every field-goal attempt of one game, optionally for one team.
    pub fn game_shots(&self, game_id: &str, team_id: Option<u32>) -> Result<ShotTable, ApiError> {
        let key = format!("game_shots_{game_id}_{}", id_or_all(team_id));
        if let Some(raw) = self.cache.load(&key) {
            return Ok(normalize(&raw)?);
        }
        let raw = self
            .request(
                "shotchartdetail",
                &shot_params(team_id, 0, Some(game_id), None),
                Some("Shot_Chart_Detail"),
            )
            .map_err(|e| wrap("Failed to fetch game shots", e))?;
        if raw.is_empty() {
            return Err(ApiError::GameNotFound(game_id.to_string()));
        }
        let shots = transform_shot_data(&raw);
        self.cache.store(&key, &shots);
        let table = normalize(&shots)?;
        info!(game_id, shots = table.len(), "fetched game shots");
        Ok(table)
    }

    /// A player's season of field-goal attempts; may be empty.
    pub fn player_shots(
        &self,
        player_name: &str,
        season: &str,
        team_id: Option<u32>,
    ) -> Result<ShotTable, ApiError> {
        let player_id = self.find_player_id(player_name, season)?;
        let key = format!("player_shots_{player_id}_{season}_{}", id_or_all(team_id));
        if let Some(raw) = self.cache.load(&key) {
            return Ok(normalize(&raw)?);
        }
        let raw = self
            .request(
                "shotchartdetail",
                &shot_params(team_id, player_id, None, Some(season)),
                Some("Shot_Chart_Detail"),
            )
            .map_err(|e| wrap("Failed to fetch player shots", e))?;
        let shots = transform_shot_data(&raw);
        self.cache.store(&key, &shots);
        let table = normalize(&shots)?;
        info!(player_id, season, shots = table.len(), "fetched player shots");
        Ok(table)
    }

    /// Games of `team` in `season`, most recent first.
    pub fn team_schedule(&self, team: &str, season: &str) -> Result<Vec<ScheduledGame>, ApiError> {
        let team_id = self.find_team_id(team)?;
        let key = format!("team_schedule_{}_{season}", team.to_uppercase());
        let raw = self.cached(&key, || {
            let raw = self
                .request(
                    "leaguegamefinder",
                    &[
                        ("PlayerOrTeam", "T".to_string()),
                        ("TeamID", team_id.to_string()),
                        ("Season", season.to_string()),
                        ("LeagueID", "00".to_string()),
                    ],
                    None,
                )
                .map_err(|e| wrap("Failed to fetch team schedule", e))?;
            Ok(raw.rename_columns(SCHEDULE_MAPPING).select(
                &SCHEDULE_MAPPING.iter().map(|(_, to)| *to).collect::<Vec<_>>(),
            ))
        })?;
        Ok(schedule_from_table(&raw))
    }

    pub fn recent_game(&self, team: &str, season: &str) -> Result<ScheduledGame, ApiError> {
        self.team_schedule(team, season)?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::GameNotFound(format!("{} {season}", team.to_uppercase())))
    }

    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    fn cached(
        &self,
        key: &str,
        fetch: impl FnOnce() -> Result<RawTable, ApiError>,
    ) -> Result<RawTable, ApiError> {
        if let Some(raw) = self.cache.load(key) {
            return Ok(raw);
        }
        let raw = fetch()?;
        self.cache.store(key, &raw);
        Ok(raw)
    }

    /// Throttled, retried call returning the named (or first) result set.
    fn request(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        result_set: Option<&str>,
    ) -> Result<RawTable, ApiError> {
        let attempts = self.settings.retries.max(1);
        let mut last: Option<FetchFailure> = None;
        for attempt in 1..=attempts {
            self.throttle.wait();
            match self.transport.get(endpoint, params) {
                Ok(body) => return parse_result_set(&body, result_set),
                Err(failure) if failure.is_rate_limit() => {
                    return Err(ApiError::RateLimit(failure.to_string()));
                }
                Err(failure) => {
                    warn!(endpoint, attempt, "stats request failed: {failure}");
                    last = Some(failure);
                    if attempt < attempts {
                        thread::sleep(self.settings.retry_delay * attempt);
                    }
                }
            }
        }
        let cause = last.map(|f| f.to_string()).unwrap_or_default();
        Err(ApiError::Api(format!(
            "API request failed after {attempts} attempts: {cause}"
        )))
    }
}

fn wrap(context: &str, err: ApiError) -> ApiError {
    match err {
        ApiError::Api(msg) => ApiError::Api(format!("{context}: {msg}")),
        other => other,
    }
}

fn id_or_all<I: ToString>(id: Option<I>) -> String {
    id.map(|i| i.to_string()).unwrap_or_else(|| "all".to_string())
}

fn shot_params(
    team_id: Option<u32>,
    player_id: i64,
    game_id: Option<&str>,
    season: Option<&str>,
) -> Vec<(&'static str, String)> {
    vec![
        ("TeamID", team_id.unwrap_or(0).to_string()),
        ("PlayerID", player_id.to_string()),
        ("GameID", game_id.unwrap_or_default().to_string()),
        ("Season", season.unwrap_or_default().to_string()),
        ("SeasonType", "Regular Season".to_string()),
        ("ContextMeasure", "FGA".to_string()),
        ("LeagueID", "00".to_string()),
        ("LastNGames", "0".to_string()),
        ("Month", "0".to_string()),
        ("OpponentTeamID", "0".to_string()),
        ("Period", "0".to_string()),
        ("PlayerPosition", String::new()),
        ("RookieYear", String::new()),
        ("DateFrom", String::new()),
        ("DateTo", String::new()),
        ("GameSegment", String::new()),
        ("Location", String::new()),
        ("Outcome", String::new()),
        ("SeasonSegment", String::new()),
        ("VsConference", String::new()),
        ("VsDivision", String::new()),
    ]
}

/// Extracts one result set from a stats response as untyped cells.
pub fn parse_result_set(body: &str, name: Option<&str>) -> Result<RawTable, ApiError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(RawTable::default());
    }
    let root: Value = serde_json::from_str(trimmed)
        .map_err(|e| ApiError::Api(format!("invalid stats json: {e}")))?;
    let sets: Vec<&Value> = match root.get("resultSets").or_else(|| root.get("resultSet")) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(obj @ Value::Object(_)) => vec![obj],
        _ => return Err(ApiError::Api("stats response has no result sets".to_string())),
    };
    let picked = name
        .and_then(|n| {
            sets.iter()
                .find(|s| s.get("name").and_then(|v| v.as_str()) == Some(n))
        })
        .or_else(|| sets.first());
    let Some(set) = picked else {
        return Ok(RawTable::default());
    };

    let headers = set
        .get("headers")
        .and_then(|h| h.as_array())
        .map(|h| {
            h.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let rows: Vec<Vec<RawValue>> = set
        .get("rowSet")
        .and_then(|r| r.as_array())
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row.as_array())
                .map(|cells| cells.iter().map(RawValue::from_json).collect())
                .collect()
        })
        .unwrap_or_default();
    Ok(RawTable::new(headers, rows))
}

/// Renames API columns to the shot schema and keeps only schema columns.
pub fn transform_shot_data(raw: &RawTable) -> RawTable {
    if raw.is_empty() {
        return RawTable::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            Vec::new(),
        );
    }
    let mut source = raw.clone();
    if !raw.has_column("TEAM_ABBREVIATION") {
        if let Some(name_col) = raw.column_index("TEAM_NAME") {
            source = raw.with_column("TEAM_ABBREVIATION", |row| match row.get(name_col) {
                Some(RawValue::Text(name)) => team_by_name(name)
                    .map(|t| RawValue::text(t.abbreviation))
                    .unwrap_or(RawValue::Null),
                _ => RawValue::Null,
            });
        }
    }
    source
        .rename_columns(COLUMN_MAPPING)
        .select(&REQUIRED_COLUMNS)
}

fn schedule_from_table(raw: &RawTable) -> Vec<ScheduledGame> {
    let text = |r: usize, col: &str| -> Option<String> {
        let idx = raw.column_index(col)?;
        let value = raw.cell(r, idx);
        (!value.is_missing()).then(|| value.to_string())
    };
    let mut games: Vec<ScheduledGame> = (0..raw.len())
        .filter_map(|r| {
            Some(ScheduledGame {
                game_id: text(r, "game_id")?,
                game_date: text(r, "game_date"),
                matchup: text(r, "matchup"),
                wl: text(r, "wl"),
                pts: text(r, "pts").and_then(|v| v.parse::<f64>().ok()).map(|v| v as i64),
                plus_minus: text(r, "plus_minus").and_then(|v| v.parse().ok()),
            })
        })
        .collect();
    games.sort_by(|a, b| sort_date(b).cmp(&sort_date(a)));
    games
}

fn sort_date(game: &ScheduledGame) -> (Option<NaiveDate>, Option<String>) {
    let parsed = game
        .game_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok());
    (parsed, game.game_date.clone())
}
