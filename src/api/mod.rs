//! Client for the stats.nba.com shot and schedule endpoints.

pub mod cache;
pub mod client;
pub mod reference;
pub mod throttle;
pub mod transport;

pub use client::{ScheduledGame, StatsClient, parse_result_set, transform_shot_data};
pub use reference::PlayerRef;
pub use transport::{FetchFailure, HttpTransport, StatsTransport};
