//! Fantasy League Dashboard
//!
//! Statistics core for a fantasy-football league dashboard: loads the league's
//! published spreadsheet exports, joins them in memory and computes the
//! per-owner and per-season reports.
//!
//! This library provides:
//! - `source` / `schema`: table loading and normalization into typed records
//! - `join`: owner, season and playoff-phase resolution across tables
//! - `power_rankings`, `hall_of_fame`, `owner_profile`, `team_season`,
//!   `season`, `draft_board`, `final_rosters`: the report aggregations
//! - `report` / `workbook`: text, CSV and Excel output
//!
//! Binaries:
//! - `league-cli`: print any report, export CSV or an Excel workbook
//! - `league-ui`: desktop dashboard with one tab per report

pub mod config;
pub mod draft_board;
pub mod final_rosters;
pub mod hall_of_fame;
pub mod join;
pub mod owner_profile;
pub mod power_rankings;
pub mod ranking;
pub mod report;
pub mod rules;
pub mod schema;
pub mod season;
pub mod source;
pub mod stats;
pub mod team_season;
pub mod workbook;

pub use config::{DashboardConfig, LeagueRules, SourceConfig};
pub use schema::League;
pub use source::{load_league, TableSource};
