//! All-time owner power rankings.

use crate::config::LeagueRules;
use crate::join;
use crate::ranking::rank_min_descending;
use crate::schema::{LeagueResult, TeamSeason};
use crate::stats::{mean, percent, ratio, round_to};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Per-owner records
// ============================================================================

/// Rank and win-loss totals for one owner over a set of team-seasons.
#[derive(Debug, Default, Clone)]
pub struct OwnerRecord {
    /// Regular-season rankings of finished seasons.
    pub ranks: Vec<f64>,
    pub ranked_seasons: BTreeSet<i32>,
    pub wins: u32,
    pub losses: u32,
    /// Seasons with at least one decided game.
    pub win_seasons: BTreeSet<i32>,
}

impl OwnerRecord {
    pub fn avg_rank(&self) -> Option<f64> {
        mean(&self.ranks)
    }

    /// Pooled `wins / (wins + losses)` in `[0, 1]`.
    pub fn win_ratio(&self) -> Option<f64> {
        ratio(self.wins as f64, (self.wins + self.losses) as f64)
    }
}

/// Group rank and win-loss data by owner. Rows without an owner are skipped.
pub fn owner_records<'a>(
    teams: impl IntoIterator<Item = &'a TeamSeason>,
) -> BTreeMap<String, OwnerRecord> {
    let mut records: BTreeMap<String, OwnerRecord> = BTreeMap::new();
    for team in teams {
        let Some(owner) = team.owner_name.as_ref() else {
            continue;
        };
        let record = records.entry(owner.clone()).or_default();
        if team.is_finished {
            if let Some(rank) = team.regular_season_ranking {
                record.ranks.push(rank as f64);
                record.ranked_seasons.extend(team.year);
            }
        }
        if let (Some(w), Some(l)) = (team.wins, team.losses) {
            if w + l > 0 {
                record.wins += w;
                record.losses += l;
                record.win_seasons.extend(team.year);
            }
        }
    }
    records
}

// ============================================================================
// Power rankings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerRankingRow {
    #[serde(rename = "Power Ranking")]
    pub power_rank: usize,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Seasons Played")]
    pub seasons_played: usize,
    #[serde(rename = "Avg Regular Season Rank")]
    pub avg_rank: f64,
    #[serde(rename = "Win %")]
    pub win_pct: Option<f64>,
    #[serde(rename = "Playoff Appearance %")]
    pub playoff_pct: Option<f64>,
    #[serde(rename = "# Championships")]
    pub championships: usize,
    #[serde(rename = "# Runner-Ups")]
    pub runner_ups: usize,
    #[serde(rename = "# League Losers")]
    pub losers: usize,
    #[serde(rename = "Power Ranking Score")]
    pub power_score: f64,
}

/// `5·champs + 3·runner-ups − 2·losers − avg rank + 0.5·seasons`, to 2 decimals.
pub fn power_score(
    championships: usize,
    runner_ups: usize,
    losers: usize,
    avg_rank: f64,
    seasons: usize,
) -> f64 {
    round_to(
        5.0 * championships as f64 + 3.0 * runner_ups as f64 - 2.0 * losers as f64 - avg_rank
            + 0.5 * seasons as f64,
        2,
    )
}

/// Trophy and playoff counts for one owner.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrophyCounts {
    pub seasons: usize,
    pub championships: usize,
    pub runner_ups: usize,
    pub losers: usize,
    /// Playoff appearances outside the excluded season.
    pub playoff_seasons: usize,
    /// Seasons outside the excluded season.
    pub playoff_eligible_seasons: usize,
}

impl TrophyCounts {
    pub fn playoff_pct(&self) -> Option<f64> {
        percent(
            self.playoff_seasons as f64,
            self.playoff_eligible_seasons as f64,
        )
    }
}

/// Trophies count every season; playoff appearances skip the excluded one.
pub fn trophy_counts(teams: &[TeamSeason], owner: &str, rules: &LeagueRules) -> TrophyCounts {
    let mut counts = TrophyCounts::default();
    for team in teams.iter().filter(|t| t.owner_name.as_deref() == Some(owner)) {
        counts.seasons += 1;
        match &team.league_result {
            Some(LeagueResult::Winner) => counts.championships += 1,
            Some(LeagueResult::RunnerUp) => counts.runner_ups += 1,
            Some(LeagueResult::Loser) => counts.losers += 1,
            _ => {}
        }
        if !rules.is_excluded(team.year) {
            counts.playoff_eligible_seasons += 1;
            if team.league_result.as_ref().is_some_and(|r| r.made_playoffs()) {
                counts.playoff_seasons += 1;
            }
        }
    }
    counts
}

/// Rank every owner with at least one finished, ranked season.
///
/// With `current_only`, owners without a team in the latest season are
/// dropped after ranking, so ranks keep their all-owner positions.
pub fn power_rankings(
    teams: &[TeamSeason],
    rules: &LeagueRules,
    current_only: bool,
) -> Vec<PowerRankingRow> {
    let records = owner_records(teams);
    let mut rows: Vec<PowerRankingRow> = records
        .iter()
        .filter_map(|(owner, record)| {
            let avg_rank = round_to(record.avg_rank()?, 2);
            let trophies = trophy_counts(teams, owner, rules);
            Some(PowerRankingRow {
                power_rank: 0,
                owner: owner.clone(),
                seasons_played: trophies.seasons,
                avg_rank,
                win_pct: record.win_ratio().map(|r| round_to(r * 100.0, 1)),
                playoff_pct: trophies.playoff_pct(),
                championships: trophies.championships,
                runner_ups: trophies.runner_ups,
                losers: trophies.losers,
                power_score: power_score(
                    trophies.championships,
                    trophies.runner_ups,
                    trophies.losers,
                    avg_rank,
                    trophies.seasons,
                ),
            })
        })
        .collect();

    let scores: Vec<f64> = rows.iter().map(|r| r.power_score).collect();
    for (row, rank) in rows.iter_mut().zip(rank_min_descending(&scores)) {
        row.power_rank = rank;
    }

    if current_only {
        let current = join::current_owners(teams);
        rows.retain(|r| current.contains(&r.owner));
    }
    rows.sort_by(|a, b| a.power_rank.cmp(&b.power_rank).then(a.owner.cmp(&b.owner)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(owner: &str, year: i32, rank: u32, result: Option<LeagueResult>) -> TeamSeason {
        TeamSeason {
            team_key: format!("{}.{}", year, owner),
            owner_name: Some(owner.to_string()),
            year: Some(year),
            regular_season_ranking: Some(rank),
            is_finished: true,
            league_result: result,
            wins: Some(7),
            losses: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_power_score_formula() {
        assert_eq!(power_score(1, 1, 1, 3.5, 4), 4.5);
        assert_eq!(power_score(0, 0, 0, 2.333, 3), -0.83);
    }

    #[test]
    fn test_win_pct_is_pooled() {
        let mut a = season("A", 2020, 1, None);
        a.wins = Some(10);
        a.losses = Some(4);
        let mut b = season("A", 2021, 2, None);
        b.wins = Some(6);
        b.losses = Some(8);
        let records = owner_records(&[a, b]);
        let r = &records["A"];
        assert!((r.win_ratio().unwrap() - 16.0 / 28.0).abs() < 1e-12);
        assert_eq!(r.ranked_seasons.len(), 2);
    }

    #[test]
    fn test_zero_game_seasons_are_skipped() {
        let mut a = season("A", 2020, 1, None);
        a.wins = Some(0);
        a.losses = Some(0);
        let records = owner_records(&[a]);
        assert_eq!(records["A"].win_ratio(), None);
        assert!(records["A"].win_seasons.is_empty());
    }

    #[test]
    fn test_excluded_year_counts_trophy_not_playoff_pct() {
        let rules = LeagueRules::default();
        let teams = vec![
            season("A", 2017, 1, Some(LeagueResult::Winner)),
            season("A", 2018, 2, Some(LeagueResult::Playoffs)),
            season("A", 2019, 5, None),
        ];
        let counts = trophy_counts(&teams, "A", &rules);
        assert_eq!(counts.championships, 1);
        assert_eq!(counts.seasons, 3);
        assert_eq!(counts.playoff_eligible_seasons, 2);
        assert_eq!(counts.playoff_pct(), Some(50.0));
    }

    #[test]
    fn test_three_way_tie_shares_min_rank() {
        let rules = LeagueRules::default();
        let teams = vec![
            season("A", 2020, 2, None),
            season("B", 2020, 2, None),
            season("C", 2020, 2, None),
            season("D", 2020, 5, None),
        ];
        let rows = power_rankings(&teams, &rules, false);
        let ranks: Vec<usize> = rows.iter().map(|r| r.power_rank).collect();
        assert_eq!(ranks, vec![1, 1, 1, 4]);
        assert_eq!(rows[3].owner, "D");
        assert_eq!(power_rankings(&teams, &rules, false), rows);
    }

    #[test]
    fn test_unfinished_only_owner_is_not_ranked() {
        let mut t = season("Z", 2022, 1, None);
        t.is_finished = false;
        assert!(power_rankings(&[t], &LeagueRules::default(), false).is_empty());
    }

    #[test]
    fn test_current_only_filter() {
        let teams = vec![season("A", 2020, 1, None), season("B", 2021, 2, None)];
        let rows = power_rankings(&teams, &LeagueRules::default(), true);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].owner, "B");
    }
}
