//! Data source locations and league business rules.
//!
//! Both are persisted together in `~/.league-dashboard.conf` as `key=value`
//! lines so the CLI and the UI pick up the last loaded league.

use crate::source::TableSource;
use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Where each league table is read from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceConfig {
    pub teams: Option<TableSource>,
    pub matchups: Option<TableSource>,
    pub players: Option<TableSource>,
    pub draft_roster: Option<TableSource>,
    pub final_roster: Option<TableSource>,
}

impl SourceConfig {
    /// Conventional file names inside one export folder. Absent files stay unset.
    pub fn from_data_dir(dir: &Path) -> Self {
        let pick = |name: &str| {
            let path = dir.join(name);
            if path.exists() {
                Some(TableSource::File(path))
            } else {
                None
            }
        };
        SourceConfig {
            teams: pick("teams.csv"),
            matchups: pick("matchups.csv"),
            players: pick("players.csv"),
            draft_roster: pick("draft_roster.csv"),
            final_roster: pick("final_roster.csv"),
        }
    }

    /// Fill unset tables from `other`.
    pub fn or(self, other: SourceConfig) -> Self {
        SourceConfig {
            teams: self.teams.or(other.teams),
            matchups: self.matchups.or(other.matchups),
            players: self.players.or(other.players),
            draft_roster: self.draft_roster.or(other.draft_roster),
            final_roster: self.final_roster.or(other.final_roster),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.teams.is_some() && self.matchups.is_some() && self.players.is_some()
    }
}

/// League-specific constants applied by the aggregations.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueRules {
    /// Season left out of playoff-appearance %, per-owner averages and the owner
    /// season selector. It still counts toward trophies.
    pub excluded_playoff_year: Option<i32>,
    /// Seasons an owner needs before appearing in best/worst superlatives.
    pub min_superlative_seasons: usize,
    /// Length of top-player and top-performance lists.
    pub top_n: usize,
}

impl Default for LeagueRules {
    fn default() -> Self {
        LeagueRules {
            excluded_playoff_year: Some(2017),
            min_superlative_seasons: 2,
            top_n: 10,
        }
    }
}

impl LeagueRules {
    pub fn with_excluded_year(mut self, year: Option<i32>) -> Self {
        self.excluded_playoff_year = year;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn is_excluded(&self, year: Option<i32>) -> bool {
        year.is_some() && year == self.excluded_playoff_year
    }
}

/// Everything stored in the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardConfig {
    pub sources: SourceConfig,
    pub rules: LeagueRules,
}

pub fn config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".league-dashboard.conf"))
}

impl DashboardConfig {
    /// Parse `key=value` lines. Unknown keys and bad values are skipped.
    pub fn parse(content: &str) -> Self {
        let mut config = DashboardConfig::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("config: ignoring line without '=': {}", line);
                continue;
            };
            let value = value.trim();
            let source = || (!value.is_empty()).then(|| TableSource::parse(value));
            match key.trim() {
                "teams" => config.sources.teams = source(),
                "matchups" => config.sources.matchups = source(),
                "players" => config.sources.players = source(),
                "draft_roster" => config.sources.draft_roster = source(),
                "final_roster" => config.sources.final_roster = source(),
                "excluded_playoff_year" => {
                    if value.eq_ignore_ascii_case("none") || value.is_empty() {
                        config.rules.excluded_playoff_year = None;
                    } else if let Ok(year) = value.parse() {
                        config.rules.excluded_playoff_year = Some(year);
                    } else {
                        log::warn!("config: bad excluded_playoff_year '{}'", value);
                    }
                }
                "min_superlative_seasons" => match value.parse() {
                    Ok(n) => config.rules.min_superlative_seasons = n,
                    Err(_) => log::warn!("config: bad min_superlative_seasons '{}'", value),
                },
                "top_n" => match value.parse() {
                    Ok(n) => config.rules.top_n = n,
                    Err(_) => log::warn!("config: bad top_n '{}'", value),
                },
                other => log::warn!("config: unknown key '{}'", other),
            }
        }
        config
    }

    pub fn to_file_string(&self) -> String {
        let mut out = String::new();
        let sources = [
            ("teams", &self.sources.teams),
            ("matchups", &self.sources.matchups),
            ("players", &self.sources.players),
            ("draft_roster", &self.sources.draft_roster),
            ("final_roster", &self.sources.final_roster),
        ];
        for (key, source) in sources {
            if let Some(source) = source {
                let _ = writeln!(out, "{}={}", key, source);
            }
        }
        let excluded = self
            .rules
            .excluded_playoff_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "none".to_string());
        let _ = writeln!(out, "excluded_playoff_year={}", excluded);
        let _ = writeln!(
            out,
            "min_superlative_seasons={}",
            self.rules.min_superlative_seasons
        );
        let _ = writeln!(out, "top_n={}", self.rules.top_n);
        out
    }

    /// Read the config file, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(_) => DashboardConfig::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_file_string())
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    pub fn load() -> Self {
        config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let path = config_path().ok_or_else(|| anyhow::anyhow!("HOME is not set"))?;
        self.save_to(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = LeagueRules::default();
        assert_eq!(rules.excluded_playoff_year, Some(2017));
        assert_eq!(rules.min_superlative_seasons, 2);
        assert!(rules.is_excluded(Some(2017)));
        assert!(!rules.is_excluded(None));
    }

    #[test]
    fn test_parse_and_round_trip() {
        let content = "teams=https://example.com/teams.csv\nplayers=/tmp/p.csv\n\
                       excluded_playoff_year=none\ntop_n=5\nbogus=1\n";
        let config = DashboardConfig::parse(content);
        assert_eq!(
            config.sources.teams,
            Some(TableSource::Url("https://example.com/teams.csv".to_string()))
        );
        assert_eq!(
            config.sources.players,
            Some(TableSource::File(PathBuf::from("/tmp/p.csv")))
        );
        assert_eq!(config.rules.excluded_playoff_year, None);
        assert_eq!(config.rules.top_n, 5);
        assert_eq!(DashboardConfig::parse(&config.to_file_string()), config);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = DashboardConfig::parse("excluded_playoff_year=abc\ntop_n=-1");
        assert_eq!(config.rules, LeagueRules::default());
    }

    #[test]
    fn test_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("teams.csv"), "team_key\n").unwrap();
        let sources = SourceConfig::from_data_dir(dir.path());
        assert!(sources.teams.is_some());
        assert!(sources.matchups.is_none());
        assert!(!sources.is_complete());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("league.conf");
        let config = DashboardConfig {
            rules: LeagueRules::default().with_excluded_year(Some(2019)),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(DashboardConfig::load_from(&path), config);
    }
}
