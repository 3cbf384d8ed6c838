pub mod agent;
pub mod api;
pub mod assignment;
pub mod config;
pub mod duration;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod output;
pub mod queue;
pub mod state;
