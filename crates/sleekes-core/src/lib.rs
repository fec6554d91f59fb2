pub mod config;
pub mod control;
pub mod logging;

pub mod engine;
pub mod job;
pub mod options;
pub mod stealth;
