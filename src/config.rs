use std::path::PathBuf;
use std::time::Duration;

/// Scale between feet and the shot coordinate system (tenths of a foot).
pub const COORD_SCALE: f64 = 10.0;

/// Regulation court dimensions in feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtSpec {
    pub court_length: f64,
    pub court_width: f64,
    pub half_court_length: f64,
    pub basket_diameter: f64,
    pub backboard_width: f64,
    // Baseline to the center of the rim.
    pub backboard_offset: f64,
    // Baseline-side inset of the backboard face relative to the baseline.
    pub backboard_inset: f64,
    pub three_point_radius: f64,
    pub three_point_corner_distance: f64,
    pub three_point_side_length: f64,
    pub paint_width: f64,
    pub paint_length: f64,
    pub free_throw_line_distance: f64,
    pub free_throw_circle_radius: f64,
    pub restricted_area_radius: f64,
    pub center_circle_radius: f64,
    pub scale: f64,
}

impl CourtSpec {
    pub const NBA: CourtSpec = CourtSpec {
        court_length: 94.0,
        court_width: 50.0,
        half_court_length: 47.0,
        basket_diameter: 1.5,
        backboard_width: 6.0,
        backboard_offset: 4.0,
        backboard_inset: 0.75,
        three_point_radius: 23.75,
        three_point_corner_distance: 22.0,
        three_point_side_length: 14.0,
        paint_width: 16.0,
        paint_length: 19.0,
        free_throw_line_distance: 15.0,
        free_throw_circle_radius: 6.0,
        restricted_area_radius: 4.0,
        center_circle_radius: 6.0,
        scale: COORD_SCALE,
    };

    /// Converts a length in feet to record coordinate units.
    pub fn units(&self, feet: f64) -> f64 {
        feet * self.scale
    }
}

impl Default for CourtSpec {
    fn default() -> Self {
        Self::NBA
    }
}

// Plausible coordinate envelope of the record coordinate system.
pub const COURT_X_MIN: f64 = -250.0;
pub const COURT_X_MAX: f64 = 250.0;
pub const COURT_Y_MIN: f64 = -52.5;
pub const COURT_Y_MAX: f64 = 417.5;

pub const DEFAULT_FIGURE_SIZE: (f64, f64) = (12.0, 11.0);
pub const DEFAULT_DPI: u32 = 150;

pub const COURT_LINE_COLOR: &str = "#000000";
pub const COURT_BG_COLOR: &str = "#F5F5F5";
pub const COURT_LINE_WIDTH: f64 = 2.0;

pub const MADE_SHOT_COLOR: &str = "#228B22";
pub const MISSED_SHOT_COLOR: &str = "#DC143C";
pub const TEAM_MADE_SHOT_COLOR: &str = "#5A2D82";
pub const TEAM_MISSED_SHOT_COLOR: &str = "#8B8B8B";

pub const SHOT_MARKER_SIZE: f64 = 80.0;
pub const SHOT_MARKER_ALPHA: f64 = 0.7;

pub const DEFAULT_SEASON: &str = "2024-25";
pub const DEFAULT_TEAM: &str = "SAC";

#[derive(Debug, Clone, Copy)]
pub struct TeamInfo {
    pub id: u32,
    pub abbreviation: &'static str,
    pub full_name: &'static str,
}

pub const TEAMS: &[TeamInfo] = &[
    TeamInfo {
        id: 1610612737,
        abbreviation: "ATL",
        full_name: "Atlanta Hawks",
    },
    TeamInfo {
        id: 1610612738,
        abbreviation: "BOS",
        full_name: "Boston Celtics",
    },
    TeamInfo {
        id: 1610612751,
        abbreviation: "BKN",
        full_name: "Brooklyn Nets",
    },
    TeamInfo {
        id: 1610612766,
        abbreviation: "CHA",
        full_name: "Charlotte Hornets",
    },
    TeamInfo {
        id: 1610612741,
        abbreviation: "CHI",
        full_name: "Chicago Bulls",
    },
    TeamInfo {
        id: 1610612739,
        abbreviation: "CLE",
        full_name: "Cleveland Cavaliers",
    },
    TeamInfo {
        id: 1610612742,
        abbreviation: "DAL",
        full_name: "Dallas Mavericks",
    },
    TeamInfo {
        id: 1610612743,
        abbreviation: "DEN",
        full_name: "Denver Nuggets",
    },
    TeamInfo {
        id: 1610612765,
        abbreviation: "DET",
        full_name: "Detroit Pistons",
    },
    TeamInfo {
        id: 1610612744,
        abbreviation: "GSW",
        full_name: "Golden State Warriors",
    },
    TeamInfo {
        id: 1610612745,
        abbreviation: "HOU",
        full_name: "Houston Rockets",
    },
    TeamInfo {
        id: 1610612754,
        abbreviation: "IND",
        full_name: "Indiana Pacers",
    },
    TeamInfo {
        id: 1610612746,
        abbreviation: "LAC",
        full_name: "LA Clippers",
    },
    TeamInfo {
        id: 1610612747,
        abbreviation: "LAL",
        full_name: "Los Angeles Lakers",
    },
    TeamInfo {
        id: 1610612763,
        abbreviation: "MEM",
        full_name: "Memphis Grizzlies",
    },
    TeamInfo {
        id: 1610612748,
        abbreviation: "MIA",
        full_name: "Miami Heat",
    },
    TeamInfo {
        id: 1610612749,
        abbreviation: "MIL",
        full_name: "Milwaukee Bucks",
    },
    TeamInfo {
        id: 1610612750,
        abbreviation: "MIN",
        full_name: "Minnesota Timberwolves",
    },
    TeamInfo {
        id: 1610612740,
        abbreviation: "NOP",
        full_name: "New Orleans Pelicans",
    },
    TeamInfo {
        id: 1610612752,
        abbreviation: "NYK",
        full_name: "New York Knicks",
    },
    TeamInfo {
        id: 1610612760,
        abbreviation: "OKC",
        full_name: "Oklahoma City Thunder",
    },
    TeamInfo {
        id: 1610612753,
        abbreviation: "ORL",
        full_name: "Orlando Magic",
    },
    TeamInfo {
        id: 1610612755,
        abbreviation: "PHI",
        full_name: "Philadelphia 76ers",
    },
    TeamInfo {
        id: 1610612756,
        abbreviation: "PHX",
        full_name: "Phoenix Suns",
    },
    TeamInfo {
        id: 1610612757,
        abbreviation: "POR",
        full_name: "Portland Trail Blazers",
    },
    TeamInfo {
        id: 1610612758,
        abbreviation: "SAC",
        full_name: "Sacramento Kings",
    },
    TeamInfo {
        id: 1610612759,
        abbreviation: "SAS",
        full_name: "San Antonio Spurs",
    },
    TeamInfo {
        id: 1610612761,
        abbreviation: "TOR",
        full_name: "Toronto Raptors",
    },
    TeamInfo {
        id: 1610612762,
        abbreviation: "UTA",
        full_name: "Utah Jazz",
    },
    TeamInfo {
        id: 1610612764,
        abbreviation: "WAS",
        full_name: "Washington Wizards",
    },
];

const STATS_BASE_URL: &str = "https://stats.nba.com/stats";
const CACHE_DIR: &str = "shotchart";

/// Settings for the remote statistics client.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub cache_dir: Option<PathBuf>,
    pub use_cache: bool,
    pub request_delay: Duration,
    pub timeout: Duration,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: STATS_BASE_URL.to_string(),
            cache_dir: default_cache_dir(),
            use_cache: true,
            request_delay: Duration::from_millis(600),
            timeout: Duration::from_secs(30),
            retries: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub season: String,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = ApiSettings::default();
        let cache_dir = env_string("SHOTCHART_CACHE_DIR")
            .map(PathBuf::from)
            .or(defaults.cache_dir);
        let api = ApiSettings {
            base_url: env_string("SHOTCHART_STATS_URL").unwrap_or(defaults.base_url),
            cache_dir,
            use_cache: env_bool("SHOTCHART_USE_CACHE").unwrap_or(defaults.use_cache),
            request_delay: env_u64("SHOTCHART_REQUEST_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_delay),
            timeout: env_u64("SHOTCHART_TIMEOUT_SECS")
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or(defaults.timeout),
            retries: env_u64("SHOTCHART_RETRIES")
                .map(|n| n.clamp(1, 10) as u32)
                .unwrap_or(defaults.retries),
            retry_delay: env_u64("SHOTCHART_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
        };
        Self {
            api,
            season: env_string("SHOTCHART_SEASON").unwrap_or_else(|| DEFAULT_SEASON.to_string()),
            log_filter: env_string("SHOTCHART_LOG")
                .or_else(|| env_string("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
        }
    }
}

pub fn default_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key).and_then(|v| v.parse::<u64>().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    let raw = env_string(key)?.to_ascii_lowercase();
    match raw.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn team_by_abbreviation(abbrev: &str) -> Option<&'static TeamInfo> {
    let needle = abbrev.trim();
    TEAMS
        .iter()
        .find(|t| t.abbreviation.eq_ignore_ascii_case(needle))
}

pub fn team_by_name(full_name: &str) -> Option<&'static TeamInfo> {
    let needle = full_name.trim();
    TEAMS
        .iter()
        .find(|t| t.full_name.eq_ignore_ascii_case(needle))
}
