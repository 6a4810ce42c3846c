//! Season Insights: everything shown for one selected season.
//!
//! All statistics here are regular season only. Playoff weeks are dropped by
//! the matchup flag and player rows without a matching matchup are dropped.

use crate::config::LeagueRules;
use crate::join::{self, PlayerRow, SeasonPhase};
use crate::ranking::{rank_dense_descending, rank_dense_descending_within};
use crate::schema::{League, LeagueResult, Matchup, SlotGroup, WeekResult, BASE_POSITIONS};
use crate::stats::{first_max_by, first_min_by, mean, median, sample_std};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

// ============================================================================
// Report types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Podium {
    pub winner: String,
    pub runner_up: String,
    pub loser: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Team")]
    pub team_name: String,
    #[serde(rename = "Record")]
    pub record: String,
    #[serde(rename = "Points For")]
    pub points_for: f64,
    #[serde(rename = "Points Against")]
    pub points_against: f64,
    #[serde(rename = "High Scores")]
    pub high_scores: usize,
    #[serde(rename = "Low Scores")]
    pub low_scores: usize,
    #[serde(rename = "Waiver Moves")]
    pub waiver_moves: u32,
    #[serde(rename = "Trades")]
    pub trades: u32,
    #[serde(rename = "FAAB Used")]
    pub faab_used: i64,
}

/// One owner's value per slot group, aligned with [`SlotGroup::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRankRow {
    pub owner: String,
    /// Mean over weeks of points per started player in the group.
    pub averages: Vec<Option<f64>>,
    /// Dense rank of `averages` within the group, highest first.
    pub ranks: Vec<Option<usize>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionDiffRow {
    pub owner: String,
    /// Mean weekly difference to the league-excluding-self average; 0.0 when
    /// the owner never started anyone in the group.
    pub diffs: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyRow {
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Avg")]
    pub mean: f64,
    #[serde(rename = "Std")]
    pub std: f64,
    #[serde(rename = "Median")]
    pub median: f64,
    #[serde(rename = "Weeks")]
    pub weeks: usize,
    #[serde(rename = "Min")]
    pub min: f64,
    #[serde(rename = "Max")]
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Consistency {
    /// Highest average first.
    pub rows: Vec<ConsistencyRow>,
    pub median_of_means: f64,
    pub median_of_stds: f64,
}

impl Consistency {
    /// Quadrant label against the league medians, e.g. `Elite & Consistent`.
    pub fn quadrant(&self, row: &ConsistencyRow) -> &'static str {
        let elite = row.mean >= self.median_of_means;
        let steady = row.std <= self.median_of_stds;
        match (elite, steady) {
            (true, true) => "Elite & Consistent",
            (true, false) => "Elite & Volatile",
            (false, true) => "Bad & Consistent",
            (false, false) => "Bad & Volatile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftedShareRow {
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Drafted Points")]
    pub drafted_points: f64,
    #[serde(rename = "Non-Drafted Points")]
    pub non_drafted_points: f64,
    #[serde(rename = "Drafted %")]
    pub drafted_pct: f64,
    #[serde(rename = "Non-Drafted %")]
    pub non_drafted_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPlayerRow {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Player")]
    pub player_name: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Total Points")]
    pub points: f64,
}

/// A player-week or team-week score in a top list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRow {
    #[serde(rename = "Rank")]
    pub rank: usize,
    /// `Player (Wk 3)` or `Owner (Wk 3)`.
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Week")]
    pub week: Option<u32>,
    #[serde(rename = "Points")]
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameCard {
    pub owner: String,
    pub opponent: String,
    pub week: Option<u32>,
    pub points_for: f64,
    pub points_against: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Highlights {
    pub highest_score: Option<GameCard>,
    pub lowest_score: Option<GameCard>,
    pub biggest_win: Option<GameCard>,
    pub closest_win: Option<GameCard>,
    /// Fewest points scored in a win.
    pub luckiest_win: Option<GameCard>,
    /// Most points scored in a loss.
    pub unluckiest_loss: Option<GameCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonReport {
    pub year: i32,
    pub podium: Option<Podium>,
    pub standings: Vec<StandingRow>,
    pub position_ranks: Vec<PositionRankRow>,
    pub position_diffs: Vec<PositionDiffRow>,
    pub consistency: Option<Consistency>,
    pub drafted_share: Vec<DraftedShareRow>,
    /// Per base position, in display order.
    pub top_players: Vec<(String, Vec<TopPlayerRow>)>,
    /// `None` without draft data for the season.
    pub top_undrafted: Option<Vec<TopPlayerRow>>,
    pub top_started: Vec<PerformanceRow>,
    pub top_benched: Vec<PerformanceRow>,
    pub top_teams: Vec<PerformanceRow>,
    pub highlights: Highlights,
}

// ============================================================================
// Season context
// ============================================================================

/// Owners and filtered rows of one season, built once per report.
pub struct SeasonContext<'a> {
    pub year: i32,
    league: &'a League,
    owners: HashMap<&'a str, &'a str>,
    matchups: Vec<&'a Matchup>,
    players: Vec<PlayerRow<'a>>,
}

impl<'a> SeasonContext<'a> {
    pub fn new(league: &'a League, year: i32) -> Self {
        let owners = league
            .teams
            .iter()
            .filter(|t| t.year == Some(year))
            .filter_map(|t| Some((t.team_key.as_str(), t.owner_name.as_deref()?)))
            .collect();
        let matchups = league
            .matchups
            .iter()
            .filter(|m| m.year == Some(year) && m.is_regular_season())
            .collect();
        let players = join::player_rows(&league.players, &league.teams, &league.matchups)
            .into_iter()
            .filter(|r| r.year == Some(year) && r.scheduled && r.is_regular_season())
            .collect();
        SeasonContext {
            year,
            league,
            owners,
            matchups,
            players,
        }
    }

    fn owner(&self, team_key: &str) -> Option<&'a str> {
        self.owners.get(team_key).copied()
    }

    fn started(&self) -> impl Iterator<Item = &PlayerRow<'a>> {
        self.players.iter().filter(|r| r.player.is_started())
    }

    /// Drafted player keys per team for this season; `None` without draft data.
    fn drafted_by_team(&self) -> Option<HashMap<&'a str, HashSet<&'a str>>> {
        let picks: Vec<_> = self
            .league
            .draft_picks
            .iter()
            .filter(|p| p.year == Some(self.year))
            .collect();
        if picks.is_empty() {
            return None;
        }
        let mut map: HashMap<&str, HashSet<&str>> = HashMap::new();
        for p in picks {
            map.entry(p.team_key.as_str())
                .or_default()
                .insert(p.player_key.as_str());
        }
        Some(map)
    }
}

// ============================================================================
// Podium and standings
// ============================================================================

pub fn podium(league: &League, year: i32) -> Option<Podium> {
    let teams: Vec<_> = league.teams.iter().filter(|t| t.year == Some(year)).collect();
    if !teams.iter().any(|t| t.is_finished) {
        return None;
    }
    let owner_with = |result: LeagueResult| {
        teams
            .iter()
            .find(|t| t.has_result(&result))
            .and_then(|t| t.owner_name.clone())
            .unwrap_or_else(|| "-".to_string())
    };
    Some(Podium {
        winner: owner_with(LeagueResult::Winner),
        runner_up: owner_with(LeagueResult::RunnerUp),
        loser: owner_with(LeagueResult::Loser),
    })
}

/// Sorted by wins, then points for; ranked 1..n in that order.
pub fn standings(ctx: &SeasonContext) -> Vec<StandingRow> {
    let mut flags: HashMap<&str, (usize, usize)> = HashMap::new();
    for m in &ctx.matchups {
        let entry = flags.entry(m.team_key.as_str()).or_default();
        entry.0 += usize::from(m.high_score_flag);
        entry.1 += usize::from(m.low_score_flag);
    }

    let mut teams: Vec<_> = ctx
        .league
        .teams
        .iter()
        .filter(|t| t.year == Some(ctx.year))
        .collect();
    teams.sort_by(|a, b| {
        b.wins
            .unwrap_or(0)
            .cmp(&a.wins.unwrap_or(0))
            .then(
                b.points_for_total
                    .unwrap_or(0.0)
                    .total_cmp(&a.points_for_total.unwrap_or(0.0)),
            )
    });

    teams
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let (high_scores, low_scores) = flags.get(t.team_key.as_str()).copied().unwrap_or((0, 0));
            StandingRow {
                rank: i + 1,
                owner: t.owner().to_string(),
                team_name: t.team_name.clone().unwrap_or_default(),
                record: format!("{}-{}", t.wins.unwrap_or(0), t.losses.unwrap_or(0)),
                points_for: t.points_for_total.unwrap_or(0.0),
                points_against: t.points_against_total.unwrap_or(0.0),
                high_scores,
                low_scores,
                waiver_moves: t.number_of_waiver_moves.unwrap_or(0),
                trades: t.number_of_trades.unwrap_or(0),
                faab_used: t.faab_balance_used.map(|f| f.round() as i64).unwrap_or(0),
            }
        })
        .collect()
}

// ============================================================================
// Positional scoring
// ============================================================================

/// Average points per started player for each (team, week, slot group).
fn weekly_group_averages<'a>(ctx: &SeasonContext<'a>) -> BTreeMap<(&'a str, u32, SlotGroup), f64> {
    let mut sums: BTreeMap<(&str, u32, SlotGroup), (f64, usize)> = BTreeMap::new();
    for r in ctx.started() {
        let Some(week) = r.player.week else {
            continue;
        };
        let group = SlotGroup::from_slot(&r.player.selected_position);
        let entry = sums
            .entry((r.player.team_key.as_str(), week, group))
            .or_insert((0.0, 0));
        entry.0 += r.player.player_week_points;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Owners of the season in standings order.
fn owners_in_standings_order(ctx: &SeasonContext) -> Vec<String> {
    let mut seen = HashSet::new();
    standings(ctx)
        .into_iter()
        .map(|r| r.owner)
        .filter(|o| !o.is_empty() && seen.insert(o.clone()))
        .collect()
}

pub fn position_ranks(ctx: &SeasonContext) -> Vec<PositionRankRow> {
    let mut per_owner: HashMap<(&str, SlotGroup), Vec<f64>> = HashMap::new();
    for ((team_key, _, group), avg) in weekly_group_averages(ctx) {
        if let Some(owner) = ctx.owner(team_key) {
            per_owner.entry((owner, group)).or_default().push(avg);
        }
    }
    let means: HashMap<(&str, SlotGroup), f64> = per_owner
        .iter()
        .filter_map(|(k, v)| Some((*k, mean(v)?)))
        .collect();

    let keys: Vec<(&str, SlotGroup)> = means.keys().copied().collect();
    let groups: Vec<SlotGroup> = keys.iter().map(|k| k.1).collect();
    let values: Vec<f64> = keys.iter().map(|k| means[k]).collect();
    let ranks: HashMap<(&str, SlotGroup), usize> = keys
        .iter()
        .copied()
        .zip(rank_dense_descending_within(&groups, &values))
        .collect();

    owners_in_standings_order(ctx)
        .into_iter()
        .filter(|o| SlotGroup::ALL.iter().any(|g| means.contains_key(&(o.as_str(), *g))))
        .map(|owner| PositionRankRow {
            averages: SlotGroup::ALL
                .iter()
                .map(|g| means.get(&(owner.as_str(), *g)).copied())
                .collect(),
            ranks: SlotGroup::ALL
                .iter()
                .map(|g| ranks.get(&(owner.as_str(), *g)).copied())
                .collect(),
            owner,
        })
        .collect()
}

/// League average excluding one team: `(sum - own) / (count - 1)`, or the
/// team's own value when it is the only one.
pub fn leave_one_out(sum_all: f64, count_all: usize, own: f64) -> f64 {
    if count_all > 1 {
        (sum_all - own) / (count_all - 1) as f64
    } else {
        own
    }
}

pub fn position_diffs(ctx: &SeasonContext) -> Vec<PositionDiffRow> {
    let weekly = weekly_group_averages(ctx);
    let mut totals: HashMap<(u32, SlotGroup), (f64, usize)> = HashMap::new();
    for ((_, week, group), avg) in &weekly {
        let entry = totals.entry((*week, *group)).or_insert((0.0, 0));
        entry.0 += avg;
        entry.1 += 1;
    }

    let mut per_owner: HashMap<(&str, SlotGroup), Vec<f64>> = HashMap::new();
    for ((team_key, week, group), avg) in &weekly {
        let Some(owner) = ctx.owner(team_key) else {
            continue;
        };
        let (sum_all, count_all) = totals[&(*week, *group)];
        per_owner
            .entry((owner, *group))
            .or_default()
            .push(avg - leave_one_out(sum_all, count_all, *avg));
    }

    owners_in_standings_order(ctx)
        .into_iter()
        .filter(|o| SlotGroup::ALL.iter().any(|g| per_owner.contains_key(&(o.as_str(), *g))))
        .map(|owner| PositionDiffRow {
            diffs: SlotGroup::ALL
                .iter()
                .map(|g| {
                    per_owner
                        .get(&(owner.as_str(), *g))
                        .and_then(|d| mean(d))
                        .unwrap_or(0.0)
                })
                .collect(),
            owner,
        })
        .collect()
}

// ============================================================================
// Consistency
// ============================================================================

pub fn consistency(ctx: &SeasonContext) -> Option<Consistency> {
    let mut weekly: BTreeMap<&str, BTreeMap<u32, f64>> = BTreeMap::new();
    for m in &ctx.matchups {
        let (Some(owner), Some(week)) = (ctx.owner(&m.team_key), m.week) else {
            continue;
        };
        *weekly.entry(owner).or_default().entry(week).or_insert(0.0) += m.points_for.unwrap_or(0.0);
    }

    let mut rows: Vec<ConsistencyRow> = weekly
        .into_iter()
        .filter_map(|(owner, weeks)| {
            let points: Vec<f64> = weeks.into_values().collect();
            Some(ConsistencyRow {
                owner: owner.to_string(),
                mean: mean(&points)?,
                std: sample_std(&points),
                median: median(&points)?,
                weeks: points.len(),
                min: points.iter().copied().fold(f64::INFINITY, f64::min),
                max: points.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
        })
        .collect();
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| b.mean.total_cmp(&a.mean));

    let means: Vec<f64> = rows.iter().map(|r| r.mean).collect();
    let stds: Vec<f64> = rows.iter().map(|r| r.std).collect();
    Some(Consistency {
        median_of_means: median(&means)?,
        median_of_stds: median(&stds)?,
        rows,
    })
}

// ============================================================================
// Drafted vs non-drafted
// ============================================================================

/// Share of each owner's started points scored by players the team drafted.
/// Sorted by drafted share ascending. Empty when the season has no draft roster.
pub fn drafted_share(ctx: &SeasonContext) -> Vec<DraftedShareRow> {
    let Some(drafted) = ctx.drafted_by_team() else {
        return Vec::new();
    };
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for r in ctx.started() {
        let Some(owner) = ctx.owner(&r.player.team_key) else {
            continue;
        };
        let was_drafted = drafted
            .get(r.player.team_key.as_str())
            .is_some_and(|set| set.contains(r.player.player_key.as_str()));
        let entry = totals.entry(owner).or_insert((0.0, 0.0));
        if was_drafted {
            entry.0 += r.player.player_week_points;
        } else {
            entry.1 += r.player.player_week_points;
        }
    }

    let mut rows: Vec<DraftedShareRow> = totals
        .into_iter()
        .map(|(owner, (d, n))| {
            let total = if d + n == 0.0 { 1e-9 } else { d + n };
            DraftedShareRow {
                owner: owner.to_string(),
                drafted_points: d,
                non_drafted_points: n,
                drafted_pct: d / total * 100.0,
                non_drafted_pct: n / total * 100.0,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.drafted_pct.total_cmp(&b.drafted_pct));
    rows
}

// ============================================================================
// Top lists
// ============================================================================

/// Dense-rank `(name, owner, points)` entries and keep the best `n`.
fn ranked_top(mut entries: Vec<(String, String, f64)>, n: usize) -> Vec<TopPlayerRow> {
    entries.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));
    let points: Vec<f64> = entries.iter().map(|e| e.2).collect();
    entries
        .into_iter()
        .zip(rank_dense_descending(&points))
        .take(n)
        .map(|((player_name, owner, points), rank)| TopPlayerRow {
            rank,
            player_name,
            owner,
            points,
        })
        .collect()
}

/// Season totals of started players by position, best `top_n` each.
pub fn top_players(ctx: &SeasonContext, top_n: usize) -> Vec<(String, Vec<TopPlayerRow>)> {
    let mut totals: BTreeMap<(&str, &str, &str), f64> = BTreeMap::new();
    for r in ctx.started() {
        let owner = ctx.owner(&r.player.team_key).unwrap_or("");
        *totals
            .entry((r.player.player_position.as_str(), r.player.display_name(), owner))
            .or_insert(0.0) += r.player.player_week_points;
    }
    BASE_POSITIONS
        .iter()
        .map(|pos| {
            let entries = totals
                .iter()
                .filter(|((p, _, _), _)| p == pos)
                .map(|((_, name, owner), pts)| (name.to_string(), owner.to_string(), *pts))
                .collect();
            (pos.to_string(), ranked_top(entries, top_n))
        })
        .collect()
}

/// Best started players nobody drafted this season, all positions together.
pub fn top_undrafted(ctx: &SeasonContext, top_n: usize) -> Option<Vec<TopPlayerRow>> {
    let drafted: HashSet<&str> = ctx
        .drafted_by_team()?
        .into_values()
        .flatten()
        .collect();
    let mut totals: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for r in ctx
        .started()
        .filter(|r| !drafted.contains(r.player.player_key.as_str()))
    {
        let owner = ctx.owner(&r.player.team_key).unwrap_or("");
        *totals.entry((r.player.display_name(), owner)).or_insert(0.0) += r.player.player_week_points;
    }
    let entries = totals
        .into_iter()
        .map(|((name, owner), pts)| (name.to_string(), owner.to_string(), pts))
        .collect();
    Some(ranked_top(entries, top_n))
}

fn ranked_performances(mut rows: Vec<PerformanceRow>, n: usize) -> Vec<PerformanceRow> {
    rows.sort_by(|a, b| b.points.total_cmp(&a.points));
    let points: Vec<f64> = rows.iter().map(|r| r.points).collect();
    for (row, rank) in rows.iter_mut().zip(rank_dense_descending(&points)) {
        row.rank = rank;
    }
    rows.truncate(n);
    rows
}

fn week_label(name: &str, week: Option<u32>) -> String {
    match week {
        Some(w) => format!("{} (Wk {})", name, w),
        None => format!("{} (Wk -)", name),
    }
}

/// Best single-week player scores, started (`benched == false`) or on the bench.
pub fn top_player_weeks(ctx: &SeasonContext, benched: bool, top_n: usize) -> Vec<PerformanceRow> {
    let rows = ctx
        .players
        .iter()
        .filter(|r| {
            if benched {
                r.player.is_benched()
            } else {
                r.player.is_started()
            }
        })
        .map(|r| PerformanceRow {
            rank: 0,
            label: week_label(r.player.display_name(), r.player.week),
            owner: ctx.owner(&r.player.team_key).unwrap_or("-").to_string(),
            week: r.player.week,
            points: r.player.player_week_points,
        })
        .collect();
    ranked_performances(rows, top_n)
}

pub fn top_team_weeks(ctx: &SeasonContext, top_n: usize) -> Vec<PerformanceRow> {
    let rows = ctx
        .matchups
        .iter()
        .map(|m| {
            let owner = ctx.owner(&m.team_key).unwrap_or("-");
            PerformanceRow {
                rank: 0,
                label: week_label(owner, m.week),
                owner: owner.to_string(),
                week: m.week,
                points: m.points_for.unwrap_or(0.0),
            }
        })
        .collect();
    ranked_performances(rows, top_n)
}

// ============================================================================
// Highlights
// ============================================================================

pub fn highlights(ctx: &SeasonContext) -> Highlights {
    let scored: Vec<(&Matchup, f64, f64)> = ctx
        .matchups
        .iter()
        .filter_map(|m| Some((*m, m.points_for?, m.points_against?)))
        .collect();
    let card = |(m, pf, pa): (&Matchup, f64, f64)| GameCard {
        owner: ctx.owner(&m.team_key).unwrap_or("-").to_string(),
        opponent: m
            .opponent_team_key
            .as_deref()
            .and_then(|k| ctx.owner(k))
            .unwrap_or("-")
            .to_string(),
        week: m.week,
        points_for: pf,
        points_against: pa,
    };
    let wins: Vec<(&Matchup, f64, f64)> = scored
        .iter()
        .copied()
        .filter(|(_, pf, pa)| WeekResult::from_margin(pf - pa) == WeekResult::Win)
        .collect();
    let losses: Vec<(&Matchup, f64, f64)> = scored
        .iter()
        .copied()
        .filter(|(_, pf, pa)| WeekResult::from_margin(pf - pa) == WeekResult::Loss)
        .collect();

    Highlights {
        highest_score: first_max_by(scored.iter().copied(), |g| g.1).map(card),
        lowest_score: first_min_by(scored.iter().copied(), |g| g.1).map(card),
        biggest_win: first_max_by(wins.iter().copied(), |g| g.1 - g.2).map(card),
        closest_win: first_min_by(wins.iter().copied(), |g| g.1 - g.2).map(card),
        luckiest_win: first_min_by(wins.iter().copied(), |g| g.1).map(card),
        unluckiest_loss: first_max_by(losses.iter().copied(), |g| g.1).map(card),
    }
}

// ============================================================================
// Report
// ============================================================================

/// Seasons selectable in the season view, newest first.
pub fn season_years(league: &League) -> Vec<i32> {
    let mut years = join::seasons(&league.teams);
    years.reverse();
    years
}

pub fn season_report(league: &League, year: i32, rules: &LeagueRules) -> Option<SeasonReport> {
    if !league.teams.iter().any(|t| t.year == Some(year)) {
        return None;
    }
    let ctx = SeasonContext::new(league, year);
    log::debug!(
        "season {}: {} regular-season matchups, {} player rows",
        year,
        ctx.matchups.len(),
        ctx.players.len()
    );
    Some(SeasonReport {
        year,
        podium: podium(league, year),
        standings: standings(&ctx),
        position_ranks: position_ranks(&ctx),
        position_diffs: position_diffs(&ctx),
        consistency: consistency(&ctx),
        drafted_share: drafted_share(&ctx),
        top_players: top_players(&ctx, rules.top_n),
        top_undrafted: top_undrafted(&ctx, rules.top_n),
        top_started: top_player_weeks(&ctx, false, rules.top_n),
        top_benched: top_player_weeks(&ctx, true, rules.top_n),
        top_teams: top_team_weeks(&ctx, rules.top_n),
        highlights: highlights(&ctx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DraftPick, PlayerWeek, TeamSeason};

    fn team(key: &str, owner: &str, wins: u32, pf: f64) -> TeamSeason {
        TeamSeason {
            team_key: key.to_string(),
            owner_name: Some(owner.to_string()),
            year: Some(2020),
            wins: Some(wins),
            losses: Some(10 - wins),
            points_for_total: Some(pf),
            ..Default::default()
        }
    }

    fn game(key: &str, opp: &str, week: u32, pf: f64, pa: f64) -> Matchup {
        Matchup {
            team_key: key.to_string(),
            opponent_team_key: Some(opp.to_string()),
            week: Some(week),
            year: Some(2020),
            points_for: Some(pf),
            points_against: Some(pa),
            is_playoffs: Some(false),
            ..Default::default()
        }
    }

    fn player(key: &str, week: u32, pkey: &str, slot: &str, pts: f64) -> PlayerWeek {
        PlayerWeek {
            team_key: key.to_string(),
            week: Some(week),
            player_key: pkey.to_string(),
            player_name: pkey.to_uppercase(),
            player_position: if slot == "W/R/T" || slot == "BN" { "WR".into() } else { slot.into() },
            selected_position: slot.to_string(),
            player_week_points: pts,
            ..Default::default()
        }
    }

    fn three_team_league() -> League {
        League {
            teams: vec![
                team("a", "Ann", 7, 900.0),
                team("b", "Bob", 7, 950.0),
                team("c", "Cy", 3, 800.0),
            ],
            matchups: vec![
                game("a", "b", 1, 80.0, 100.0),
                game("b", "a", 1, 100.0, 80.0),
                game("c", "zz", 1, 90.0, 89.5),
                game("a", "c", 2, 120.0, 70.0),
                game("c", "a", 2, 70.0, 120.0),
            ],
            players: vec![
                player("a", 1, "qa", "QB", 10.0),
                player("b", 1, "qb", "QB", 20.0),
                player("c", 1, "qc", "QB", 30.0),
                player("a", 1, "ka", "K", 8.0),
                player("a", 1, "fa", "W/R/T", 12.0),
                player("a", 1, "ba", "BN", 40.0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_leave_one_out_formula() {
        assert_eq!(leave_one_out(60.0, 3, 10.0), 25.0);
        assert_eq!(leave_one_out(7.5, 1, 7.5), 7.5);
    }

    #[test]
    fn test_position_diffs_against_rest_of_league() {
        let league = three_team_league();
        let ctx = SeasonContext::new(&league, 2020);
        let diffs = position_diffs(&ctx);
        let ann = diffs.iter().find(|r| r.owner == "Ann").unwrap();
        // QB: 10 vs (20 + 30) / 2
        assert_eq!(ann.diffs[0], -15.0);
        // Ann alone at K and FLEX falls back to her own value
        assert_eq!(ann.diffs[4], 0.0);
        assert_eq!(ann.diffs[5], 0.0);
        let cy = diffs.iter().find(|r| r.owner == "Cy").unwrap();
        assert_eq!(cy.diffs[0], 15.0);
        assert_eq!(cy.diffs[1], 0.0);
    }

    #[test]
    fn test_position_ranks_are_dense_per_group() {
        let league = three_team_league();
        let ctx = SeasonContext::new(&league, 2020);
        let ranks = position_ranks(&ctx);
        // standings order: Bob (7 W, 950), Ann (7 W, 900), Cy
        let owners: Vec<&str> = ranks.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["Bob", "Ann", "Cy"]);
        assert_eq!(ranks[2].ranks[0], Some(1));
        assert_eq!(ranks[1].ranks[0], Some(3));
        assert_eq!(ranks[1].ranks[5], Some(1));
        assert_eq!(ranks[0].ranks[5], None);
    }

    #[test]
    fn test_standings_order_and_flags() {
        let mut league = three_team_league();
        league.matchups[0].high_score_flag = true;
        league.teams[0].faab_balance_used = Some(12.6);
        let ctx = SeasonContext::new(&league, 2020);
        let rows = standings(&ctx);
        assert_eq!(rows[0].owner, "Bob");
        assert_eq!(rows[1].owner, "Ann");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].record, "7-3");
        assert_eq!(rows[1].high_scores, 1);
        assert_eq!(rows[1].faab_used, 13);
        assert_eq!(rows[0].faab_used, 0);
    }

    #[test]
    fn test_consistency_stats() {
        let league = three_team_league();
        let ctx = SeasonContext::new(&league, 2020);
        let c = consistency(&ctx).unwrap();
        let ann = c.rows.iter().find(|r| r.owner == "Ann").unwrap();
        assert_eq!(ann.mean, 100.0);
        assert_eq!(ann.weeks, 2);
        assert_eq!(ann.min, 80.0);
        assert_eq!(ann.max, 120.0);
        let bob = c.rows.iter().find(|r| r.owner == "Bob").unwrap();
        assert_eq!(bob.std, 0.0);
        assert_eq!(c.rows[2].owner, "Cy");
        assert_eq!(c.quadrant(bob), "Elite & Consistent");
    }

    #[test]
    fn test_drafted_share_and_zero_total() {
        let mut league = three_team_league();
        league.draft_picks = vec![DraftPick {
            team_key: "a".into(),
            player_key: "qa".into(),
            year: Some(2020),
            ..Default::default()
        }];
        league.players.push(player("b", 1, "zero", "QB", 0.0));
        league.players[1].player_week_points = 0.0;
        let ctx = SeasonContext::new(&league, 2020);
        let rows = drafted_share(&ctx);
        let ann = rows.iter().find(|r| r.owner == "Ann").unwrap();
        assert_eq!(ann.drafted_points, 10.0);
        assert_eq!(ann.non_drafted_points, 20.0);
        assert!((ann.drafted_pct - 100.0 / 3.0).abs() < 1e-9);
        let bob = rows.iter().find(|r| r.owner == "Bob").unwrap();
        assert_eq!(bob.drafted_pct, 0.0);
        assert_eq!(bob.non_drafted_pct, 0.0);
        assert_eq!(rows[0].drafted_pct, 0.0);
    }

    #[test]
    fn test_drafted_share_needs_a_draft_roster() {
        let league = three_team_league();
        let ctx = SeasonContext::new(&league, 2020);
        assert!(ctx.started().next().is_some());
        assert!(drafted_share(&ctx).is_empty());
        assert!(top_undrafted(&ctx, 5).is_none());

        let report = season_report(&league, 2020, &LeagueRules::default()).unwrap();
        let text = crate::report::season_text(&report).unwrap();
        let section = text.split("Drafted vs Non-Drafted Points").nth(1).unwrap();
        assert_eq!(section.lines().nth(1), Some("No data"));
    }

    #[test]
    fn test_top_lists() {
        let league = three_team_league();
        let ctx = SeasonContext::new(&league, 2020);
        let top = top_players(&ctx, 2);
        assert_eq!(top[0].0, "QB");
        assert_eq!(top[0].1.len(), 2);
        assert_eq!(top[0].1[0].player_name, "QC");
        assert_eq!(top[0].1[0].rank, 1);
        assert!(top_undrafted(&ctx, 5).is_none());

        let benched = top_player_weeks(&ctx, true, 10);
        assert_eq!(benched.len(), 1);
        assert_eq!(benched[0].label, "BA (Wk 1)");
        let started = top_player_weeks(&ctx, false, 10);
        assert!(started.iter().all(|r| r.points < 40.0));

        let teams = top_team_weeks(&ctx, 2);
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].label, "Ann (Wk 2)");
    }

    #[test]
    fn test_highlights() {
        let league = three_team_league();
        let ctx = SeasonContext::new(&league, 2020);
        let h = highlights(&ctx);
        assert_eq!(h.highest_score.as_ref().unwrap().points_for, 120.0);
        assert_eq!(h.lowest_score.as_ref().unwrap().owner, "Cy");
        assert_eq!(h.biggest_win.as_ref().unwrap().opponent, "Cy");
        let closest = h.closest_win.unwrap();
        assert_eq!(closest.owner, "Cy");
        assert_eq!(closest.opponent, "-");
        assert_eq!(h.luckiest_win.unwrap().points_for, 90.0);
        assert_eq!(h.unluckiest_loss.unwrap().points_for, 80.0);
    }

    #[test]
    fn test_podium_needs_a_finished_team() {
        let mut league = three_team_league();
        assert_eq!(podium(&league, 2020), None);
        league.teams[1].is_finished = true;
        league.teams[1].league_result = Some(LeagueResult::Winner);
        let p = podium(&league, 2020).unwrap();
        assert_eq!(p.winner, "Bob");
        assert_eq!(p.loser, "-");
    }

    #[test]
    fn test_unknown_season_has_no_report() {
        let league = three_team_league();
        assert!(season_report(&league, 1999, &LeagueRules::default()).is_none());
        let report = season_report(&league, 2020, &LeagueRules::default()).unwrap();
        assert_eq!(report.standings.len(), 3);
    }
}
