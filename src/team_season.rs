//! One owner's team in one season: header cards, weekly breakdown and
//! season points by rostered starter.

use crate::config::LeagueRules;
use crate::join::{self, SeasonPhase};
use crate::schema::{League, Matchup, WeekResult, BASE_POSITIONS};
use crate::stats::{median, mode};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct TeamCard {
    pub owner: String,
    pub year: i32,
    pub team_key: String,
    pub team_name: Option<String>,
    pub team_url: Option<String>,
    pub logo_url: Option<String>,
    pub league_result: Option<String>,
    pub regular_season_ranking: Option<u32>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub points_for: Option<f64>,
    pub points_against: Option<f64>,
    pub points_diff: Option<f64>,
    pub waiver_moves: Option<u32>,
    pub faab_used: Option<f64>,
    pub trades: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarterPoints {
    pub player_name: String,
    pub position: String,
    pub points: f64,
}

/// One scheduled regular-season week from the team's point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBreakdown {
    pub week: u32,
    /// `None` when the team had no game that week.
    pub result: Option<WeekResult>,
    pub points_for: f64,
    pub league_median: f64,
    pub high_score: bool,
    pub low_score: bool,
    /// Ordered by the player's season total, highest first.
    pub starters: Vec<StarterPoints>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeasonPoints {
    pub player_name: String,
    pub primary_position: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamSeasonReport {
    pub card: TeamCard,
    pub weeks: Vec<WeekBreakdown>,
    pub roster_points: Vec<PlayerSeasonPoints>,
}

/// Seasons selectable for an owner, newest first, without the excluded season.
pub fn owner_years(league: &League, owner: &str, rules: &LeagueRules) -> Vec<i32> {
    let years: BTreeSet<i32> = league
        .teams
        .iter()
        .filter(|t| t.owner_name.as_deref() == Some(owner))
        .filter_map(|t| t.year)
        .filter(|y| !rules.is_excluded(Some(*y)))
        .collect();
    years.into_iter().rev().collect()
}

fn title_case(s: &str) -> String {
    s.split_inclusive(|c: char| !c.is_alphanumeric())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Player position to display: the most common listed position, then the most
/// common base-position slot they started in, else `UNK`.
pub fn primary_position(listed: &[&str], slots: &[&str]) -> String {
    let listed: Vec<&str> = listed.iter().copied().filter(|p| !p.is_empty()).collect();
    if let Some(p) = mode(&listed).filter(|p| BASE_POSITIONS.contains(p)) {
        return p.to_string();
    }
    let slots: Vec<String> = slots
        .iter()
        .map(|s| crate::schema::normalize_position(s))
        .filter(|s| BASE_POSITIONS.contains(&s.as_str()))
        .collect();
    mode(&slots).unwrap_or_else(|| "UNK".to_string())
}

pub fn team_season_report(league: &League, owner: &str, year: i32) -> Option<TeamSeasonReport> {
    let team = league
        .teams
        .iter()
        .filter(|t| t.owner_name.as_deref() == Some(owner) && t.year == Some(year))
        .min_by(|a, b| a.team_key.cmp(&b.team_key))?;

    let card = TeamCard {
        owner: owner.to_string(),
        year,
        team_key: team.team_key.clone(),
        team_name: team.team_name.clone(),
        team_url: team.team_url.clone(),
        logo_url: team.logo_url.clone(),
        league_result: team.league_result.as_ref().map(|r| title_case(r.label())),
        regular_season_ranking: team.regular_season_ranking,
        wins: team.wins,
        losses: team.losses,
        points_for: team.points_for_total,
        points_against: team.points_against_total,
        points_diff: team
            .points_for_total
            .zip(team.points_against_total)
            .map(|(pf, pa)| pf - pa),
        waiver_moves: team.number_of_waiver_moves,
        faab_used: team.faab_balance_used,
        trades: team.number_of_trades,
    };

    let regular: Vec<&Matchup> = league
        .matchups
        .iter()
        .filter(|m| m.year == Some(year) && m.is_regular_season())
        .collect();
    let weeks: BTreeSet<u32> = regular.iter().filter_map(|m| m.week).collect();

    let mut league_points: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for m in &regular {
        if let (Some(w), Some(pf)) = (m.week, m.points_for) {
            league_points.entry(w).or_default().push(pf);
        }
    }
    let team_games: HashMap<u32, &Matchup> = regular
        .iter()
        .filter(|m| m.team_key == team.team_key)
        .filter_map(|m| Some((m.week?, *m)))
        .rev()
        .collect();

    // started players in weeks the team actually played a regular-season game
    let rows = join::player_rows(&league.players, &league.teams, &league.matchups);
    let started: Vec<_> = rows
        .iter()
        .filter(|r| r.player.team_key == team.team_key && r.scheduled && r.is_regular_season())
        .filter(|r| r.player.is_started())
        .filter(|r| r.player.week.is_some_and(|w| team_games.contains_key(&w)))
        .collect();

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut listed: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut slots: HashMap<&str, Vec<&str>> = HashMap::new();
    for r in &started {
        let name = r.player.display_name();
        *totals.entry(name).or_insert(0.0) += r.player.player_week_points;
        listed.entry(name).or_default().push(&r.player.player_position);
        slots.entry(name).or_default().push(&r.player.selected_position);
    }
    let positions: HashMap<&str, String> = totals
        .keys()
        .map(|name| {
            let l = listed.get(name).map(Vec::as_slice).unwrap_or(&[]);
            let s = slots.get(name).map(Vec::as_slice).unwrap_or(&[]);
            (*name, primary_position(l, s))
        })
        .collect();
    let mut order: Vec<(&str, f64)> = totals.iter().map(|(n, p)| (*n, *p)).collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(b.0)));
    let rank: HashMap<&str, usize> = order.iter().enumerate().map(|(i, (n, _))| (*n, i)).collect();

    let weeks = weeks
        .into_iter()
        .map(|week| {
            let game = team_games.get(&week);
            let mut per_player: BTreeMap<&str, f64> = BTreeMap::new();
            for r in started.iter().filter(|r| r.player.week == Some(week)) {
                *per_player.entry(r.player.display_name()).or_insert(0.0) +=
                    r.player.player_week_points;
            }
            let mut starters: Vec<StarterPoints> = per_player
                .into_iter()
                .map(|(name, points)| StarterPoints {
                    player_name: name.to_string(),
                    position: positions.get(name).cloned().unwrap_or_default(),
                    points,
                })
                .collect();
            starters.sort_by_key(|s| rank.get(s.player_name.as_str()).copied());
            WeekBreakdown {
                week,
                result: game.and_then(|m| m.result()),
                points_for: game.and_then(|m| m.points_for).unwrap_or(0.0),
                league_median: league_points
                    .get(&week)
                    .and_then(|p| median(p))
                    .unwrap_or(0.0),
                high_score: game.is_some_and(|m| m.high_score_flag),
                low_score: game.is_some_and(|m| m.low_score_flag),
                starters,
            }
        })
        .collect();

    let mut roster_points: Vec<PlayerSeasonPoints> = order
        .iter()
        .filter(|(_, points)| *points > 0.0)
        .map(|(name, points)| PlayerSeasonPoints {
            player_name: name.to_string(),
            primary_position: positions.get(name).cloned().unwrap_or_default(),
            points: *points,
        })
        .collect();
    // keep UNK only when no player resolved to a base position
    if roster_points
        .iter()
        .any(|p| BASE_POSITIONS.contains(&p.primary_position.as_str()))
    {
        roster_points.retain(|p| BASE_POSITIONS.contains(&p.primary_position.as_str()));
    }

    Some(TeamSeasonReport {
        card,
        weeks,
        roster_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LeagueResult, PlayerWeek, TeamSeason};

    fn team(key: &str, owner: &str, year: i32) -> TeamSeason {
        TeamSeason {
            team_key: key.to_string(),
            owner_name: Some(owner.to_string()),
            year: Some(year),
            ..Default::default()
        }
    }

    fn game(key: &str, week: u32, pf: f64, pa: f64) -> Matchup {
        Matchup {
            team_key: key.to_string(),
            week: Some(week),
            year: Some(2021),
            points_for: Some(pf),
            points_against: Some(pa),
            is_playoffs: Some(false),
            ..Default::default()
        }
    }

    fn player(key: &str, week: u32, name: &str, pos: &str, slot: &str, pts: f64) -> PlayerWeek {
        PlayerWeek {
            team_key: key.to_string(),
            week: Some(week),
            player_key: name.to_lowercase(),
            player_name: name.to_string(),
            player_position: pos.to_string(),
            selected_position: slot.to_string(),
            player_week_points: pts,
            ..Default::default()
        }
    }

    fn league() -> League {
        let mut a = team("a", "Ann", 2021);
        a.league_result = Some(LeagueResult::RunnerUp);
        a.points_for_total = Some(250.0);
        a.points_against_total = Some(240.0);
        let mut playoff = game("a", 15, 140.0, 100.0);
        playoff.is_playoffs = Some(true);
        League {
            teams: vec![a, team("b", "Bob", 2021), team("c", "Cat", 2021)],
            matchups: vec![
                game("a", 1, 100.0, 90.0),
                game("b", 1, 90.0, 100.0),
                game("c", 1, 120.0, 80.0),
                game("a", 2, 150.0, 150.0),
                game("b", 2, 150.0, 150.0),
                playoff,
            ],
            players: vec![
                player("a", 1, "Qb One", "QB", "QB", 25.0),
                player("a", 1, "Wr One", "WR", "W/R/T", 12.0),
                player("a", 1, "Bench Guy", "RB", "BN", 30.0),
                player("a", 2, "Qb One", "QB", "QB", 18.0),
                player("a", 2, "Mystery", "", "W/R/T", 4.0),
                player("a", 15, "Qb One", "QB", "QB", 40.0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_card_values() {
        let report = team_season_report(&league(), "Ann", 2021).unwrap();
        assert_eq!(report.card.league_result.as_deref(), Some("Runner-Up"));
        assert_eq!(report.card.points_diff, Some(10.0));
        assert!(team_season_report(&league(), "Ann", 1999).is_none());
    }

    #[test]
    fn test_weekly_breakdown() {
        let report = team_season_report(&league(), "Ann", 2021).unwrap();
        assert_eq!(report.weeks.len(), 2);
        let w1 = &report.weeks[0];
        assert_eq!(w1.result, Some(WeekResult::Win));
        assert_eq!(w1.league_median, 100.0);
        assert_eq!(w1.starters.len(), 2);
        assert_eq!(w1.starters[0].player_name, "Qb One");
        assert_eq!(report.weeks[1].result, Some(WeekResult::Tie));
    }

    #[test]
    fn test_roster_points_exclude_playoffs_and_unknown_positions() {
        let report = team_season_report(&league(), "Ann", 2021).unwrap();
        let names: Vec<&str> = report
            .roster_points
            .iter()
            .map(|p| p.player_name.as_str())
            .collect();
        assert_eq!(names, vec!["Qb One", "Wr One"]);
        assert_eq!(report.roster_points[0].points, 43.0);
    }

    #[test]
    fn test_primary_position_fallbacks() {
        assert_eq!(primary_position(&["WR", "WR", "RB"], &["W/R/T"]), "WR");
        assert_eq!(primary_position(&[""], &["TE", "W/R/T", "TE"]), "TE");
        assert_eq!(primary_position(&[], &["W/R/T"]), "UNK");
    }

    #[test]
    fn test_owner_years_skip_excluded_season() {
        let league = League {
            teams: vec![
                team("x", "Ann", 2017),
                team("y", "Ann", 2018),
                team("z", "Ann", 2019),
            ],
            ..Default::default()
        };
        assert_eq!(owner_years(&league, "Ann", &LeagueRules::default()), vec![2019, 2018]);
    }
}
