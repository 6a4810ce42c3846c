//! End-of-season rosters, one season at a time.

use crate::join;
use crate::schema::League;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalRosterRow {
    #[serde(rename = "Season")]
    pub season: Option<i32>,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Team")]
    pub team_name: String,
    #[serde(rename = "Player Key")]
    pub player_key: String,
    #[serde(rename = "Player")]
    pub player_name: String,
}

/// Every final-roster row with season, owner and team resolved.
/// `None` when the league has no final-roster table.
pub fn final_roster_rows(league: &League) -> Option<Vec<FinalRosterRow>> {
    let rosters = league.final_rosters.as_ref()?;
    let index = join::TeamIndex::new(&league.teams);
    Some(
        rosters
            .iter()
            .map(|entry| {
                let team = index.lookup(&entry.team_key, None);
                FinalRosterRow {
                    season: team.and_then(|t| t.year),
                    owner: team.map(|t| t.owner().to_string()).unwrap_or_default(),
                    team_name: team.and_then(|t| t.team_name.clone()).unwrap_or_default(),
                    player_key: entry.player_key.clone(),
                    player_name: entry.player_name.clone(),
                }
            })
            .collect(),
    )
}

/// Seasons present in the final rosters, newest first.
pub fn final_roster_years(rows: &[FinalRosterRow]) -> Vec<i32> {
    let mut years: Vec<i32> = rows.iter().filter_map(|r| r.season).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// One season's rows sorted by owner, then player key. Empty when the season
/// has no roster data.
pub fn final_rosters_for(rows: &[FinalRosterRow], year: i32) -> Vec<FinalRosterRow> {
    let mut season: Vec<FinalRosterRow> = rows
        .iter()
        .filter(|r| r.season == Some(year))
        .cloned()
        .collect();
    season.sort_by(|a, b| a.owner.cmp(&b.owner).then(a.player_key.cmp(&b.player_key)));
    season
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FinalRosterEntry, TeamSeason};

    fn entry(team: &str, key: &str) -> FinalRosterEntry {
        FinalRosterEntry {
            team_key: team.to_string(),
            player_key: key.to_string(),
            player_name: format!("Player {}", key),
            ..Default::default()
        }
    }

    #[test]
    fn test_rows_sorted_by_owner_then_key() {
        let league = League {
            teams: vec![
                TeamSeason {
                    team_key: "t1".into(),
                    owner_name: Some("Zed".into()),
                    team_name: Some("Zoomers".into()),
                    year: Some(2021),
                    ..Default::default()
                },
                TeamSeason {
                    team_key: "t2".into(),
                    owner_name: Some("Amy".into()),
                    year: Some(2021),
                    ..Default::default()
                },
            ],
            final_rosters: Some(vec![entry("t1", "p.9"), entry("t2", "p.5"), entry("t2", "p.1")]),
            ..Default::default()
        };
        let rows = final_roster_rows(&league).unwrap();
        assert_eq!(final_roster_years(&rows), vec![2021]);
        let season = final_rosters_for(&rows, 2021);
        let keys: Vec<&str> = season.iter().map(|r| r.player_key.as_str()).collect();
        assert_eq!(keys, vec!["p.1", "p.5", "p.9"]);
        assert_eq!(season[2].team_name, "Zoomers");
        assert!(final_rosters_for(&rows, 2020).is_empty());
    }

    #[test]
    fn test_missing_table_is_none() {
        assert!(final_roster_rows(&League::default()).is_none());
    }
}
