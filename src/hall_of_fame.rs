//! Hall of Fame and Hall of Shame: all-time bests and worsts over finished seasons.

use crate::config::LeagueRules;
use crate::join;
use crate::power_rankings::{owner_records, OwnerRecord};
use crate::schema::{LeagueResult, League, Matchup, PlayerWeek, TeamSeason};
use crate::stats::{first_max_by, first_min_by, round_to};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampsRow {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Winner")]
    pub winner: Option<String>,
    #[serde(rename = "Runner-up")]
    pub runner_up: Option<String>,
    #[serde(rename = "Loser")]
    pub loser: Option<String>,
}

/// An owner and the value that earned them the card.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerValue {
    pub owner: String,
    pub value: f64,
}

/// Every owner tied at the highest count.
#[derive(Debug, Clone, PartialEq)]
pub struct TiedCount {
    pub owners: Vec<String>,
    pub count: usize,
}

impl fmt::Display for TiedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .owners
            .iter()
            .map(|o| format!("{} ({})", o, self.count))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyScore {
    pub owner: Option<String>,
    pub year: Option<i32>,
    pub week: Option<u32>,
    pub points_for: f64,
    pub points_against: Option<f64>,
    pub margin: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerWeekRecord {
    pub player_name: String,
    pub position: String,
    pub owner: Option<String>,
    pub year: Option<i32>,
    pub week: Option<u32>,
    pub points: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legends {
    pub best_avg_rank: Option<OwnerValue>,
    pub highest_win_pct: Option<OwnerValue>,
    pub most_high_scores: Option<TiedCount>,
    pub highest_weekly_score: Option<WeeklyScore>,
    pub biggest_margin: Option<WeeklyScore>,
    pub top_starter: Option<PlayerWeekRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Duds {
    pub worst_avg_rank: Option<OwnerValue>,
    pub lowest_win_pct: Option<OwnerValue>,
    pub most_low_scores: Option<TiedCount>,
    pub lowest_weekly_score: Option<WeeklyScore>,
    pub most_goose_eggs: Option<TiedCount>,
    pub top_bench: Option<PlayerWeekRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HallOfFame {
    pub champs_and_chumps: Vec<ChampsRow>,
    pub legends: Legends,
    pub duds: Duds,
}

/// Winner, runner-up and loser per season, oldest first.
pub fn champs_and_chumps(teams: &[TeamSeason]) -> Vec<ChampsRow> {
    let mut by_year: BTreeMap<i32, ChampsRow> = BTreeMap::new();
    for team in teams {
        let (Some(year), Some(result)) = (team.year, team.league_result.as_ref()) else {
            continue;
        };
        let slot = match result {
            LeagueResult::Winner | LeagueResult::RunnerUp | LeagueResult::Loser => result,
            _ => continue,
        };
        let row = by_year.entry(year).or_insert_with(|| ChampsRow {
            year,
            winner: None,
            runner_up: None,
            loser: None,
        });
        let owner = team.owner_name.clone();
        match slot {
            LeagueResult::Winner => row.winner = owner,
            LeagueResult::RunnerUp => row.runner_up = owner,
            _ => row.loser = owner,
        }
    }
    by_year.into_values().collect()
}

/// Owners tied at the maximum of a per-owner count; `None` when nobody counted.
pub fn most_counted(counts: &BTreeMap<String, usize>) -> Option<TiedCount> {
    let max = counts.values().copied().max().filter(|&m| m > 0)?;
    Some(TiedCount {
        owners: counts
            .iter()
            .filter(|(_, &c)| c == max)
            .map(|(o, _)| o.clone())
            .collect(),
        count: max,
    })
}

fn avg_rank_card(
    records: &BTreeMap<String, OwnerRecord>,
    rules: &LeagueRules,
    best: bool,
) -> Option<OwnerValue> {
    let candidates = records
        .iter()
        .filter(|(_, r)| r.ranked_seasons.len() >= rules.min_superlative_seasons)
        .filter_map(|(o, r)| r.avg_rank().map(|v| (o, v)));
    let pick = if best {
        first_min_by(candidates, |(_, v)| *v)
    } else {
        first_max_by(candidates, |(_, v)| *v)
    };
    pick.map(|(o, v)| OwnerValue {
        owner: o.clone(),
        value: round_to(v, 1),
    })
}

fn win_pct_card(
    records: &BTreeMap<String, OwnerRecord>,
    rules: &LeagueRules,
    best: bool,
) -> Option<OwnerValue> {
    let candidates = records
        .iter()
        .filter(|(_, r)| r.win_seasons.len() >= rules.min_superlative_seasons)
        .filter_map(|(o, r)| r.win_ratio().map(|v| (o, v)));
    let pick = if best {
        first_max_by(candidates, |(_, v)| *v)
    } else {
        first_min_by(candidates, |(_, v)| *v)
    };
    pick.map(|(o, v)| OwnerValue {
        owner: o.clone(),
        value: round_to(v * 100.0, 0),
    })
}

fn weekly_score(view: &join::MatchupView<'_>) -> Option<WeeklyScore> {
    Some(WeeklyScore {
        owner: view.owner.map(str::to_string),
        year: view.year,
        week: view.matchup.week,
        points_for: view.matchup.points_for?,
        points_against: view.matchup.points_against,
        margin: view.matchup.margin(),
    })
}

fn player_record(row: &join::PlayerRow<'_>) -> PlayerWeekRecord {
    PlayerWeekRecord {
        player_name: row.player.display_name().to_string(),
        position: row.player.player_position.clone(),
        owner: row.owner.map(str::to_string),
        year: row.year,
        week: row.player.week,
        points: row.player.player_week_points,
    }
}

fn flag_counts<'a>(
    views: &[&join::MatchupView<'a>],
    flag: impl Fn(&Matchup) -> bool,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for v in views {
        if let (true, Some(owner)) = (flag(v.matchup), v.owner) {
            *counts.entry(owner.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Build every Hall of Fame table and card from finished seasons only.
pub fn hall_of_fame(league: &League, rules: &LeagueRules) -> HallOfFame {
    let teams: Vec<TeamSeason> = league
        .teams
        .iter()
        .filter(|t| t.is_finished)
        .cloned()
        .collect();
    // Team keys can repeat across seasons, so matchups match on (key, year).
    let finished: HashSet<(&str, Option<i32>)> =
        teams.iter().map(|t| (t.team_key.as_str(), t.year)).collect();
    let finished_keys: HashSet<&str> = finished.iter().map(|(key, _)| *key).collect();
    let (matchups, open): (Vec<&Matchup>, Vec<&Matchup>) = league
        .matchups
        .iter()
        .partition(|m| finished.contains(&(m.team_key.as_str(), m.year)));
    let open_weeks: HashSet<(&str, Option<u32>)> =
        open.iter().map(|m| (m.team_key.as_str(), m.week)).collect();
    let matchups: Vec<Matchup> = matchups.into_iter().cloned().collect();
    // Player weeks carry no season: drop the weeks an unfinished season scheduled.
    let players: Vec<PlayerWeek> = league
        .players
        .iter()
        .filter(|p| {
            finished_keys.contains(p.team_key.as_str())
                && !open_weeks.contains(&(p.team_key.as_str(), p.week))
        })
        .cloned()
        .collect();

    let records = owner_records(&teams);
    let views = join::attach_opponent(&matchups, &teams);
    let regular = join::restrict_regular_season(&views);
    let player_rows = join::player_rows(&players, &teams, &matchups);
    let regular_players = join::restrict_regular_season(&player_rows);
    let starters: Vec<_> = regular_players
        .iter()
        .filter(|r| r.player.is_started())
        .collect();

    let high_counts = flag_counts(&regular, |m| m.high_score_flag);
    let low_counts = flag_counts(&regular, |m| m.low_score_flag);

    let mut goose_eggs: BTreeMap<String, usize> = BTreeMap::new();
    for row in starters.iter().filter(|r| r.player.player_week_points <= 0.0) {
        if let Some(owner) = row.owner {
            *goose_eggs.entry(owner.to_string()).or_insert(0) += 1;
        }
    }

    let scored = regular.iter().filter_map(|v| weekly_score(v));

    let legends = Legends {
        best_avg_rank: avg_rank_card(&records, rules, true),
        highest_win_pct: win_pct_card(&records, rules, true),
        most_high_scores: most_counted(&high_counts),
        highest_weekly_score: first_max_by(scored.clone(), |s| s.points_for),
        biggest_margin: first_max_by(
            scored.clone().filter(|s| s.margin.is_some()),
            |s| s.margin.unwrap_or(f64::MIN),
        ),
        top_starter: first_max_by(starters.iter(), |r| r.player.player_week_points)
            .map(|r| player_record(r)),
    };

    let duds = Duds {
        worst_avg_rank: avg_rank_card(&records, rules, false),
        lowest_win_pct: win_pct_card(&records, rules, false),
        most_low_scores: most_counted(&low_counts),
        lowest_weekly_score: first_min_by(scored, |s| s.points_for),
        most_goose_eggs: most_counted(&goose_eggs),
        top_bench: first_max_by(
            regular_players.iter().filter(|r| r.player.is_benched()),
            |r| r.player.player_week_points,
        )
        .map(|r| player_record(r)),
    };

    HallOfFame {
        champs_and_chumps: champs_and_chumps(&teams),
        legends,
        duds,
    }
}
