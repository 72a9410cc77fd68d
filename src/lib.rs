// Library surface for headless/integration tests and reuse.
// The terminal front end (ui, CLI) lives in main.rs.
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod game;
pub mod ledger;
pub mod round;
pub mod runtime;
