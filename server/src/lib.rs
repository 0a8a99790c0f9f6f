pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod kingdom;
pub mod metrics;
pub mod session;
pub mod state;
pub mod twitch;
