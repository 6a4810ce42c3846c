//! Career view of a single owner: trophies, averages, rank history,
//! head-to-head record and a per-season team summary.

use crate::config::LeagueRules;
use crate::join;
use crate::power_rankings::{trophy_counts, TrophyCounts};
use crate::schema::{League, TeamSeason, WeekResult};
use crate::stats::{mean, percent, round_to};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadRow {
    #[serde(rename = "Opponent")]
    pub opponent: String,
    #[serde(rename = "Games")]
    pub games: usize,
    #[serde(rename = "Wins")]
    pub wins: usize,
    #[serde(rename = "Losses")]
    pub losses: usize,
    #[serde(rename = "Win %")]
    pub win_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummaryRow {
    #[serde(rename = "Year")]
    pub year: Option<i32>,
    #[serde(rename = "Team")]
    pub team_name: Option<String>,
    #[serde(rename = "Result")]
    pub league_result: Option<String>,
    #[serde(rename = "Rank")]
    pub regular_season_ranking: Option<u32>,
    #[serde(rename = "W")]
    pub wins: Option<u32>,
    #[serde(rename = "L")]
    pub losses: Option<u32>,
    #[serde(rename = "PF")]
    pub points_for: Option<f64>,
    #[serde(rename = "PA")]
    pub points_against: Option<f64>,
    #[serde(rename = "Waivers")]
    pub waiver_moves: Option<u32>,
    #[serde(rename = "Trades")]
    pub trades: Option<u32>,
    #[serde(rename = "High Scores")]
    pub high_scores: usize,
    #[serde(rename = "Low Scores")]
    pub low_scores: usize,
    #[serde(rename = "Draft Grade")]
    pub draft_grade: Option<String>,
    #[serde(rename = "URL")]
    pub team_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnerProfile {
    pub owner: String,
    /// Counted over every season, the excluded one included.
    pub trophies: TrophyCounts,
    /// Two decimals, excluded season left out.
    pub avg_rank: Option<f64>,
    /// 0-100 with one decimal, excluded season left out.
    pub win_pct: Option<f64>,
    pub playoff_pct: Option<f64>,
    pub rank_by_year: Vec<(i32, u32)>,
    pub head_to_head: Vec<HeadToHeadRow>,
    pub seasons: Vec<TeamSummaryRow>,
}

/// Regular-season record against every opponent, best win % first.
///
/// Only decided games count. Recorded results are used as-is; rows without
/// one fall back to comparing points.
pub fn head_to_head(league: &League, owner: &str) -> Vec<HeadToHeadRow> {
    let views = join::attach_opponent(&league.matchups, &league.teams);
    let mut tally: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for v in join::restrict_regular_season(&views) {
        if v.owner != Some(owner) {
            continue;
        }
        let entry = tally
            .entry(v.opponent_owner.unwrap_or("Unknown").to_string())
            .or_default();
        match v.matchup.result() {
            Some(WeekResult::Win) => entry.0 += 1,
            Some(WeekResult::Loss) => entry.1 += 1,
            _ => {}
        }
    }
    let mut rows: Vec<HeadToHeadRow> = tally
        .into_iter()
        .filter(|(_, (w, l))| w + l > 0)
        .map(|(opponent, (wins, losses))| HeadToHeadRow {
            opponent,
            games: wins + losses,
            wins,
            losses,
            win_pct: percent(wins as f64, (wins + losses) as f64).unwrap_or(0.0),
        })
        .collect();
    rows.sort_by(|a, b| b.win_pct.total_cmp(&a.win_pct));
    rows
}

fn summary_row(team: &TeamSeason, flags: &HashMap<&str, (usize, usize)>) -> TeamSummaryRow {
    let (high_scores, low_scores) = flags.get(team.team_key.as_str()).copied().unwrap_or((0, 0));
    TeamSummaryRow {
        year: team.year,
        team_name: team.team_name.clone(),
        league_result: team.league_result.as_ref().map(|r| r.label().to_string()),
        regular_season_ranking: team.regular_season_ranking,
        wins: team.wins,
        losses: team.losses,
        points_for: team.points_for_total,
        points_against: team.points_against_total,
        waiver_moves: team.number_of_waiver_moves,
        trades: team.number_of_trades,
        high_scores,
        low_scores,
        draft_grade: team.draft_grade.clone(),
        team_url: team.team_url.clone(),
    }
}

pub fn owner_profile(league: &League, owner: &str, rules: &LeagueRules) -> OwnerProfile {
    let trophies = trophy_counts(&league.teams, owner, rules);
    let mut teams: Vec<&TeamSeason> = league
        .teams
        .iter()
        .filter(|t| t.owner_name.as_deref() == Some(owner) && !rules.is_excluded(t.year))
        .collect();
    teams.sort_by_key(|t| t.year);

    let ranks: Vec<f64> = teams
        .iter()
        .filter_map(|t| t.regular_season_ranking.map(f64::from))
        .collect();
    let (wins, losses) = teams
        .iter()
        .filter_map(|t| Some((t.wins?, t.losses?)))
        .fold((0u32, 0u32), |(w, l), (tw, tl)| (w + tw, l + tl));

    let rank_by_year = teams
        .iter()
        .filter_map(|t| Some((t.year?, t.regular_season_ranking?)))
        .collect();

    let views = join::attach_opponent(&league.matchups, &league.teams);
    let mut flags: HashMap<&str, (usize, usize)> = HashMap::new();
    for v in join::restrict_regular_season(&views) {
        if v.owner != Some(owner) || rules.is_excluded(v.year) {
            continue;
        }
        let entry = flags.entry(v.matchup.team_key.as_str()).or_default();
        entry.0 += usize::from(v.matchup.high_score_flag);
        entry.1 += usize::from(v.matchup.low_score_flag);
    }

    OwnerProfile {
        owner: owner.to_string(),
        avg_rank: mean(&ranks).map(|r| round_to(r, 2)),
        win_pct: percent(wins as f64, (wins + losses) as f64),
        playoff_pct: trophies.playoff_pct(),
        trophies,
        rank_by_year,
        head_to_head: head_to_head(league, owner),
        seasons: teams.iter().map(|t| summary_row(t, &flags)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LeagueResult, Matchup};

    fn team(key: &str, owner: &str, year: i32) -> TeamSeason {
        TeamSeason {
            team_key: key.to_string(),
            owner_name: Some(owner.to_string()),
            year: Some(year),
            ..Default::default()
        }
    }

    fn game(key: &str, opp: &str, week: u32, result: &str) -> Matchup {
        Matchup {
            team_key: key.to_string(),
            opponent_team_key: Some(opp.to_string()),
            week: Some(week),
            year: Some(2020),
            week_result: WeekResult::parse(result),
            is_playoffs: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn test_head_to_head_three_wins_one_loss() {
        let league = League {
            teams: vec![team("a", "Ann", 2020), team("b", "Bob", 2020)],
            matchups: vec![
                game("a", "b", 1, "win"),
                game("a", "b", 2, "win"),
                game("a", "b", 3, "loss"),
                game("a", "b", 4, "win"),
                game("b", "a", 1, "loss"),
            ],
            ..Default::default()
        };
        let h2h = head_to_head(&league, "Ann");
        assert_eq!(h2h.len(), 1);
        assert_eq!(h2h[0].opponent, "Bob");
        assert_eq!(h2h[0].games, 4);
        assert_eq!(h2h[0].win_pct, 75.0);
    }

    #[test]
    fn test_recorded_result_beats_points() {
        let mut m = game("a", "b", 1, "loss");
        m.points_for = Some(120.0);
        m.points_against = Some(100.0);
        let league = League {
            teams: vec![team("a", "Ann", 2020), team("b", "Bob", 2020)],
            matchups: vec![m],
            ..Default::default()
        };
        assert_eq!(head_to_head(&league, "Ann")[0].losses, 1);
    }

    #[test]
    fn test_playoff_games_are_not_head_to_head() {
        let mut m = game("a", "b", 15, "win");
        m.is_playoffs = Some(true);
        let league = League {
            teams: vec![team("a", "Ann", 2020), team("b", "Bob", 2020)],
            matchups: vec![m],
            ..Default::default()
        };
        assert!(head_to_head(&league, "Ann").is_empty());
    }

    #[test]
    fn test_excluded_year_only_affects_averages() {
        let mut t17 = team("a17", "Ann", 2017);
        t17.league_result = Some(LeagueResult::Winner);
        t17.regular_season_ranking = Some(1);
        t17.wins = Some(13);
        t17.losses = Some(0);
        let mut t18 = team("a18", "Ann", 2018);
        t18.regular_season_ranking = Some(5);
        t18.wins = Some(6);
        t18.losses = Some(8);
        let mut m = game("a18", "zz", 3, "win");
        m.year = Some(2018);
        m.high_score_flag = true;
        let league = League {
            teams: vec![t17, t18],
            matchups: vec![m],
            ..Default::default()
        };
        let profile = owner_profile(&league, "Ann", &LeagueRules::default());
        assert_eq!(profile.trophies.championships, 1);
        assert_eq!(profile.avg_rank, Some(5.0));
        assert_eq!(profile.win_pct, Some(42.9));
        assert_eq!(profile.playoff_pct, Some(0.0));
        assert_eq!(profile.rank_by_year, vec![(2018, 5)]);
        assert_eq!(profile.seasons.len(), 1);
        assert_eq!(profile.seasons[0].high_scores, 1);
    }
}
