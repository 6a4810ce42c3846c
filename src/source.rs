//! Fetching league tables from published spreadsheet exports or local files.

use crate::config::SourceConfig;
use crate::join;
use crate::schema::{self, League, RawTable};
use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;

/// Location of one table: a local CSV file or a published CSV URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    File(PathBuf),
    Url(String),
}

impl TableSource {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            TableSource::Url(s.to_string())
        } else {
            TableSource::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::File(path) => write!(f, "{}", path.display()),
            TableSource::Url(url) => f.write_str(url),
        }
    }
}

/// Read a whole table in one request. No retries.
pub fn fetch_table(source: &TableSource) -> Result<RawTable> {
    match source {
        TableSource::File(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            RawTable::from_csv_reader(file)
                .with_context(|| format!("Failed to parse {}", path.display()))
        }
        TableSource::Url(url) => {
            let client = reqwest::blocking::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .context("Failed to create HTTP client")?;
            let body = client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
                .with_context(|| format!("Failed to fetch {}", url))?;
            RawTable::from_csv_reader(body.as_bytes())
                .with_context(|| format!("Failed to parse CSV from {}", url))
        }
    }
}

fn fetch_named(name: &str, source: Option<&TableSource>) -> Result<Option<RawTable>> {
    let Some(source) = source else {
        return Ok(None);
    };
    let table = fetch_table(source).with_context(|| format!("Loading {} table", name))?;
    log::info!("{}: {} rows from {}", name, table.rows.len(), source);
    Ok(Some(table))
}

/// Load and normalize every configured table.
///
/// Teams, matchups and players are required; a missing draft roster yields an
/// empty pick list and a missing final roster stays `None`.
pub fn load_league(config: &SourceConfig) -> Result<League> {
    let require = |name: &str, source: &Option<TableSource>| -> Result<RawTable> {
        fetch_named(name, source.as_ref())?
            .ok_or_else(|| anyhow::anyhow!("No source configured for the {} table", name))
    };

    let teams = schema::teams_from_raw(&require("teams", &config.teams)?)?;
    let matchups = schema::matchups_from_raw(&require("matchups", &config.matchups)?)?;
    let players = schema::players_from_raw(&require("players", &config.players)?)?;
    let draft_picks = match fetch_named("draft_roster", config.draft_roster.as_ref())? {
        Some(raw) => schema::draft_picks_from_raw(&raw)?,
        None => Vec::new(),
    };
    let final_rosters = match fetch_named("final_roster", config.final_roster.as_ref())? {
        Some(raw) => Some(schema::final_roster_from_raw(&raw)?),
        None => None,
    };

    Ok(assemble(teams, matchups, players, draft_picks, final_rosters))
}

/// Stamp cross-table fields that later stages expect to be present.
pub fn assemble(
    teams: Vec<schema::TeamSeason>,
    matchups: Vec<schema::Matchup>,
    players: Vec<schema::PlayerWeek>,
    draft_picks: Vec<schema::DraftPick>,
    final_rosters: Option<Vec<schema::FinalRosterEntry>>,
) -> League {
    let matchups = join::stamp_matchup_years(matchups, &teams);
    let draft_picks = join::stamp_draft_years(draft_picks, &teams);
    let teams = join::backfill_team_records(teams, &matchups);
    League {
        teams,
        matchups,
        players,
        draft_picks,
        final_rosters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_source_parse() {
        assert_eq!(
            TableSource::parse(" https://docs.example.com/pub?output=csv "),
            TableSource::Url("https://docs.example.com/pub?output=csv".to_string())
        );
        assert_eq!(
            TableSource::parse("data/teams.csv"),
            TableSource::File(PathBuf::from("data/teams.csv"))
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = fetch_table(&TableSource::File(PathBuf::from("/nonexistent/teams.csv")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }

    #[test]
    fn test_missing_required_source() {
        let err = load_league(&SourceConfig::default()).unwrap_err();
        assert!(err.to_string().contains("teams"));
    }
}
