//! Owner, season and playoff-phase resolution across the league tables.
//!
//! Joins never drop rows: an unmatched team key yields `owner: None`, which
//! the aggregations treat as "unknown owner" and leave out of owner tables.

use crate::schema::{
    DraftPick, FinalRosterEntry, Matchup, PlayerWeek, TeamSeason, WeekResult,
};
use std::collections::{BTreeSet, HashMap, HashSet};

// ============================================================================
// Traits at the join seam
// ============================================================================

/// Any row that belongs to a team-season through its `team_key`.
pub trait TeamKeyed {
    fn team_key(&self) -> &str;

    /// Season carried by the row itself, if the source table had one.
    fn row_year(&self) -> Option<i32> {
        None
    }
}

impl TeamKeyed for Matchup {
    fn team_key(&self) -> &str {
        &self.team_key
    }
    fn row_year(&self) -> Option<i32> {
        self.year
    }
}

impl TeamKeyed for PlayerWeek {
    fn team_key(&self) -> &str {
        &self.team_key
    }
}

impl TeamKeyed for DraftPick {
    fn team_key(&self) -> &str {
        &self.team_key
    }
    fn row_year(&self) -> Option<i32> {
        self.year
    }
}

impl TeamKeyed for FinalRosterEntry {
    fn team_key(&self) -> &str {
        &self.team_key
    }
}

/// Rows that know whether they were played in the playoffs.
pub trait SeasonPhase {
    fn is_playoffs(&self) -> Option<bool>;

    /// A missing flag counts as regular season.
    fn is_regular_season(&self) -> bool {
        self.is_playoffs() != Some(true)
    }
}

impl SeasonPhase for Matchup {
    fn is_playoffs(&self) -> Option<bool> {
        self.is_playoffs
    }
}

// ============================================================================
// Team lookup
// ============================================================================

/// Team-seasons indexed by team key.
pub struct TeamIndex<'a> {
    by_key: HashMap<&'a str, Vec<&'a TeamSeason>>,
}

impl<'a> TeamIndex<'a> {
    pub fn new(teams: &'a [TeamSeason]) -> Self {
        let mut by_key: HashMap<&str, Vec<&TeamSeason>> = HashMap::new();
        for team in teams {
            by_key.entry(team.team_key.as_str()).or_default().push(team);
        }
        TeamIndex { by_key }
    }

    /// With a year, only a team of that season matches; without one the first
    /// team carrying the key does.
    pub fn lookup(&self, team_key: &str, year: Option<i32>) -> Option<&'a TeamSeason> {
        let candidates = self.by_key.get(team_key)?;
        match year {
            Some(y) => candidates.iter().find(|t| t.year == Some(y)).copied(),
            None => candidates.first().copied(),
        }
    }
}

/// A row with its owner and season resolved.
#[derive(Debug, Clone, Copy)]
pub struct Owned<'a, T> {
    pub row: &'a T,
    pub year: Option<i32>,
    pub owner: Option<&'a str>,
}

/// Left-join owner and season onto rows keyed by `team_key`.
///
/// With `by_year`, a row that carries its own season only matches a team of
/// that season, so reused team keys cannot bleed across years.
pub fn attach_owner<'a, T: TeamKeyed>(
    rows: &'a [T],
    teams: &'a [TeamSeason],
    by_year: bool,
) -> Vec<Owned<'a, T>> {
    let index = TeamIndex::new(teams);
    rows.iter()
        .map(|row| {
            let year = if by_year { row.row_year() } else { None };
            let team = index.lookup(row.team_key(), year);
            Owned {
                row,
                year: row.row_year().or(team.and_then(|t| t.year)),
                owner: team.and_then(|t| t.owner_name.as_deref()),
            }
        })
        .collect()
}

/// A matchup with both owners resolved for its season.
#[derive(Debug, Clone, Copy)]
pub struct MatchupView<'a> {
    pub matchup: &'a Matchup,
    pub year: Option<i32>,
    pub owner: Option<&'a str>,
    pub opponent_owner: Option<&'a str>,
}

impl SeasonPhase for MatchupView<'_> {
    fn is_playoffs(&self) -> Option<bool> {
        self.matchup.is_playoffs
    }
}

/// Resolve owner and opponent owner on `(team_key, year)` and
/// `(opponent_team_key, year)`.
pub fn attach_opponent<'a>(
    matchups: &'a [Matchup],
    teams: &'a [TeamSeason],
) -> Vec<MatchupView<'a>> {
    let index = TeamIndex::new(teams);
    matchups
        .iter()
        .map(|m| {
            let team = index.lookup(&m.team_key, m.year);
            let year = m.year.or(team.and_then(|t| t.year));
            let opponent = m
                .opponent_team_key
                .as_deref()
                .and_then(|k| index.lookup(k, year));
            MatchupView {
                matchup: m,
                year,
                owner: team.and_then(|t| t.owner_name.as_deref()),
                opponent_owner: opponent.and_then(|t| t.owner_name.as_deref()),
            }
        })
        .collect()
}

/// Keep only rows not flagged as playoffs.
pub fn restrict_regular_season<'a, T: SeasonPhase + 'a>(
    rows: impl IntoIterator<Item = &'a T>,
) -> Vec<&'a T> {
    rows.into_iter().filter(|r| r.is_regular_season()).collect()
}

/// A player-week with owner, season and the matching matchup's playoff flag.
#[derive(Debug, Clone, Copy)]
pub struct PlayerRow<'a> {
    pub player: &'a PlayerWeek,
    pub year: Option<i32>,
    pub owner: Option<&'a str>,
    pub is_playoffs: Option<bool>,
    /// A matchup exists for this team and week.
    pub scheduled: bool,
}

impl SeasonPhase for PlayerRow<'_> {
    fn is_playoffs(&self) -> Option<bool> {
        self.is_playoffs
    }
}

/// Join players to teams (owner, season) and to matchups on `(team_key, week)`.
pub fn player_rows<'a>(
    players: &'a [PlayerWeek],
    teams: &'a [TeamSeason],
    matchups: &'a [Matchup],
) -> Vec<PlayerRow<'a>> {
    let index = TeamIndex::new(teams);
    let mut phase: HashMap<(&str, u32), Option<bool>> = HashMap::new();
    for m in matchups {
        if let Some(week) = m.week {
            phase.entry((m.team_key.as_str(), week)).or_insert(m.is_playoffs);
        }
    }
    players
        .iter()
        .map(|p| {
            let team = index.lookup(&p.team_key, None);
            let matched = p.week.and_then(|w| phase.get(&(p.team_key.as_str(), w)));
            PlayerRow {
                player: p,
                year: team.and_then(|t| t.year),
                owner: team.and_then(|t| t.owner_name.as_deref()),
                is_playoffs: matched.copied().flatten(),
                scheduled: matched.is_some(),
            }
        })
        .collect()
}

// ============================================================================
// Load-time stamping
// ============================================================================

/// Give matchups without a season the season of their team.
pub fn stamp_matchup_years(matchups: Vec<Matchup>, teams: &[TeamSeason]) -> Vec<Matchup> {
    let index = TeamIndex::new(teams);
    matchups
        .into_iter()
        .map(|mut m| {
            if m.year.is_none() {
                m.year = index.lookup(&m.team_key, None).and_then(|t| t.year);
            }
            m
        })
        .collect()
}

pub fn stamp_draft_years(picks: Vec<DraftPick>, teams: &[TeamSeason]) -> Vec<DraftPick> {
    let index = TeamIndex::new(teams);
    picks
        .into_iter()
        .map(|mut p| {
            if p.year.is_none() {
                p.year = index.lookup(&p.team_key, None).and_then(|t| t.year);
            }
            p
        })
        .collect()
}

/// Fill absent wins, losses, points for and points against from regular-season
/// matchups. Values present in the teams table are kept.
pub fn backfill_team_records(teams: Vec<TeamSeason>, matchups: &[Matchup]) -> Vec<TeamSeason> {
    #[derive(Default)]
    struct Totals {
        games: u32,
        wins: u32,
        losses: u32,
        points_for: f64,
        points_against: f64,
    }

    let mut totals: HashMap<(&str, Option<i32>), Totals> = HashMap::new();
    for m in matchups.iter().filter(|m| m.is_regular_season()) {
        let t = totals.entry((m.team_key.as_str(), m.year)).or_default();
        t.games += 1;
        match m.result() {
            Some(WeekResult::Win) => t.wins += 1,
            Some(WeekResult::Loss) => t.losses += 1,
            _ => {}
        }
        t.points_for += m.points_for.unwrap_or(0.0);
        t.points_against += m.points_against.unwrap_or(0.0);
    }

    teams
        .into_iter()
        .map(|mut team| {
            let found = totals
                .get(&(team.team_key.as_str(), team.year))
                .or_else(|| totals.get(&(team.team_key.as_str(), None)));
            if let Some(t) = found.filter(|t| t.games > 0) {
                team.wins = team.wins.or(Some(t.wins));
                team.losses = team.losses.or(Some(t.losses));
                team.points_for_total = team.points_for_total.or(Some(t.points_for));
                team.points_against_total = team.points_against_total.or(Some(t.points_against));
            }
            team
        })
        .collect()
}

// ============================================================================
// Selectors
// ============================================================================

/// Distinct seasons, ascending.
pub fn seasons(teams: &[TeamSeason]) -> Vec<i32> {
    teams
        .iter()
        .filter_map(|t| t.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct owner names, sorted.
pub fn owners(teams: &[TeamSeason]) -> Vec<String> {
    teams
        .iter()
        .filter_map(|t| t.owner_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Owners with a team in the most recent season.
pub fn current_owners(teams: &[TeamSeason]) -> HashSet<String> {
    let Some(latest) = teams.iter().filter_map(|t| t.year).max() else {
        return HashSet::new();
    };
    teams
        .iter()
        .filter(|t| t.year == Some(latest))
        .filter_map(|t| t.owner_name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(key: &str, owner: &str, year: i32) -> TeamSeason {
        TeamSeason {
            team_key: key.to_string(),
            owner_name: Some(owner.to_string()),
            year: Some(year),
            ..Default::default()
        }
    }

    fn matchup(key: &str, opp: &str, week: u32, year: Option<i32>) -> Matchup {
        Matchup {
            team_key: key.to_string(),
            opponent_team_key: Some(opp.to_string()),
            week: Some(week),
            year,
            ..Default::default()
        }
    }

    #[test]
    fn test_attach_opponent_does_not_cross_years() {
        // team key "t1" reused across two seasons by different owners
        let teams = vec![
            team("t1", "Ann", 2020),
            team("t2", "Bob", 2020),
            team("t1", "Cat", 2021),
            team("t2", "Dan", 2021),
        ];
        let matchups = vec![matchup("t1", "t2", 1, Some(2021))];
        let views = attach_opponent(&matchups, &teams);
        assert_eq!(views[0].owner, Some("Cat"));
        assert_eq!(views[0].opponent_owner, Some("Dan"));
    }

    #[test]
    fn test_unmatched_owner_is_none() {
        let teams = vec![team("t1", "Ann", 2020)];
        let matchups = vec![matchup("zz", "t1", 1, Some(2020))];
        let owned = attach_owner(&matchups, &teams, true);
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].owner, None);
    }

    #[test]
    fn test_missing_playoff_flag_is_regular_season() {
        let mut playoff = matchup("t1", "t2", 15, Some(2020));
        playoff.is_playoffs = Some(true);
        let rows = vec![matchup("t1", "t2", 1, Some(2020)), playoff];
        assert_eq!(restrict_regular_season(&rows).len(), 1);
    }

    #[test]
    fn test_player_rows_pick_up_playoff_flag() {
        let teams = vec![team("t1", "Ann", 2020)];
        let mut playoff = matchup("t1", "t2", 15, None);
        playoff.is_playoffs = Some(true);
        let matchups = vec![playoff];
        let players = vec![
            PlayerWeek {
                team_key: "t1".to_string(),
                week: Some(15),
                ..Default::default()
            },
            PlayerWeek {
                team_key: "t1".to_string(),
                week: Some(3),
                ..Default::default()
            },
        ];
        let rows = player_rows(&players, &teams, &matchups);
        assert!(!rows[0].is_regular_season());
        assert!(rows[0].scheduled);
        assert!(rows[1].is_regular_season());
        assert!(!rows[1].scheduled);
        assert_eq!(rows[1].owner, Some("Ann"));
        assert_eq!(rows[1].year, Some(2020));
    }

    #[test]
    fn test_backfill_keeps_existing_values() {
        let mut t = team("t1", "Ann", 2020);
        t.wins = Some(9);
        let mut m1 = matchup("t1", "t2", 1, Some(2020));
        m1.points_for = Some(100.0);
        m1.points_against = Some(90.0);
        let mut m2 = matchup("t1", "t2", 2, Some(2020));
        m2.points_for = Some(80.0);
        m2.points_against = Some(95.0);
        let teams = backfill_team_records(vec![t], &[m1, m2]);
        assert_eq!(teams[0].wins, Some(9));
        assert_eq!(teams[0].losses, Some(1));
        assert_eq!(teams[0].points_for_total, Some(180.0));
    }

    #[test]
    fn test_current_owners() {
        let teams = vec![
            team("a", "Ann", 2020),
            team("b", "Bob", 2021),
            team("c", "Cat", 2021),
        ];
        let current = current_owners(&teams);
        assert_eq!(current.len(), 2);
        assert!(current.contains("Bob"));
        assert_eq!(seasons(&teams), vec![2020, 2021]);
    }
}
