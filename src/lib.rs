pub mod api;
pub mod chart;
pub mod config;
pub mod court;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod report;
pub mod shots;
pub mod summary;
pub mod validate;
