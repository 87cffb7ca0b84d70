//! # Arealog - area time tracker
//!
//! Tracks which work area a user is in, records each entry/exit interval
//! and reports time spent per area, per department code and per day.
//!
//! ## Features
//!
//! - **Session timer**: start / switch / stop state machine, one open interval at a time
//! - **Recording**: closed intervals become immutable log entries
//! - **Reporting**: totals by area or department, daily series, timelines
//! - **Storage**: SQLite database or append-only CSV file
//! - **Export**: CSV, JSON and Excel
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arealog::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
