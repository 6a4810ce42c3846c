//! Draft board: every pick with its positional draft rank next to the rank the
//! player actually finished at over the regular season.

use crate::join::{self, SeasonPhase};
use crate::ranking::{rank_min_descending_within, sequential_rank_within};
use crate::schema::{normalize_position, League};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Split a player key like `423.p.32692` into its season code (`423`) and
/// the player id after the last `p.` (`32692`).
pub fn split_player_key(key: &str) -> (&str, &str) {
    let year_code = key.split('.').next().unwrap_or("");
    let clean = key.rsplit("p.").next().unwrap_or(key);
    (year_code, clean)
}

/// `Draft/Finish Rank: 5 / 2 (↑3)`; `finish - draft > 0` means the player
/// finished worse than drafted.
pub fn rank_line(draft_rank: usize, finish_rank: Option<usize>) -> String {
    let Some(finish) = finish_rank else {
        return format!("Draft/Finish Rank: {} / N/A", draft_rank);
    };
    let delta = finish as i64 - draft_rank as i64;
    let arrow = match delta {
        0 => "(=)".to_string(),
        d if d > 0 => format!("(↓{})", d),
        d => format!("(↑{})", d.abs()),
    };
    format!("Draft/Finish Rank: {} / {} {}", draft_rank, finish, arrow)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftBoardEntry {
    #[serde(rename = "Year")]
    pub year: Option<i32>,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Round")]
    pub round_num: Option<u32>,
    #[serde(rename = "Pick")]
    pub pick_num: Option<u32>,
    #[serde(rename = "Player")]
    pub player_name: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Keeper")]
    pub is_keeper: bool,
    #[serde(rename = "Draft Rank")]
    pub draft_rank: usize,
    #[serde(rename = "Finish Rank")]
    pub finish_rank: Option<usize>,
}

impl DraftBoardEntry {
    /// `12. Player Name (WR)`
    pub fn cell(&self) -> String {
        let pick = self.pick_num.map(|p| p.to_string()).unwrap_or_else(|| "?".to_string());
        format!("{}. {} ({})", pick, self.player_name, self.position)
    }

    pub fn rank_line(&self) -> String {
        rank_line(self.draft_rank, self.finish_rank)
    }
}

/// Regular-season finish ranks, keyed by `(year_code, player id)`.
struct FinishRanks<'a> {
    by_id: HashMap<(&'a str, &'a str), Vec<(String, usize)>>,
}

impl<'a> FinishRanks<'a> {
    /// Sum regular-season points per (season code, id, position) and rank
    /// them within (season code, position), `min` method.
    fn build(league: &'a League, key_of: fn(&'a str) -> &'a str) -> Self {
        let rows = join::player_rows(&league.players, &league.teams, &league.matchups);
        let mut totals: BTreeMap<(&str, &str, &str), f64> = BTreeMap::new();
        for r in rows.iter().filter(|r| r.is_regular_season()) {
            let key = r.player.player_key.as_str();
            let (year_code, _) = split_player_key(key);
            *totals
                .entry((year_code, key_of(key), r.player.player_position.as_str()))
                .or_insert(0.0) += r.player.player_week_points;
        }
        let keys: Vec<(&str, &str, &str)> = totals.keys().copied().collect();
        let groups: Vec<(&str, &str)> = keys.iter().map(|(y, _, p)| (*y, *p)).collect();
        let values: Vec<f64> = totals.values().copied().collect();
        let mut by_id: HashMap<(&str, &str), Vec<(String, usize)>> = HashMap::new();
        for ((year_code, id, pos), rank) in keys.into_iter().zip(rank_min_descending_within(&groups, &values)) {
            by_id
                .entry((year_code, id))
                .or_default()
                .push((pos.to_string(), rank));
        }
        FinishRanks { by_id }
    }

    /// The entry at `position` when the player scored at several, else the first.
    fn get(&self, year_code: &str, id: &str, position: &str) -> Option<usize> {
        let entries = self.by_id.get(&(year_code, id))?;
        entries
            .iter()
            .find(|(p, _)| p == position)
            .or_else(|| entries.first())
            .map(|(_, rank)| *rank)
    }
}

fn clean_id(key: &str) -> &str {
    split_player_key(key).1
}

fn full_id(key: &str) -> &str {
    key
}

/// Every draft pick with owner, draft rank and finish rank, in pick order.
pub fn draft_board(league: &League) -> Vec<DraftBoardEntry> {
    let owned = join::attach_owner(&league.draft_picks, &league.teams, true);
    let positions: Vec<String> = owned
        .iter()
        .map(|o| normalize_position(&o.row.player_position))
        .collect();
    let groups: Vec<(Option<i32>, &str)> = owned
        .iter()
        .zip(&positions)
        .map(|(o, p)| (o.year, p.as_str()))
        .collect();
    let order: Vec<Option<u32>> = owned.iter().map(|o| o.row.pick_num).collect();
    let draft_ranks = sequential_rank_within(&groups, &order);

    let by_clean = FinishRanks::build(league, clean_id);
    let by_full = FinishRanks::build(league, full_id);

    let mut entries: Vec<DraftBoardEntry> = owned
        .iter()
        .zip(positions)
        .zip(draft_ranks)
        .map(|((o, position), draft_rank)| {
            let (year_code, clean) = split_player_key(&o.row.player_key);
            let finish_rank = by_clean
                .get(year_code, clean, &position)
                .or_else(|| by_full.get(year_code, &o.row.player_key, &position));
            DraftBoardEntry {
                year: o.year,
                owner: o.owner.unwrap_or("-").to_string(),
                round_num: o.row.round_num,
                pick_num: o.row.pick_num,
                player_name: o.row.player_name.clone(),
                position,
                is_keeper: o.row.is_keeper,
                draft_rank,
                finish_rank,
            }
        })
        .collect();
    entries.sort_by_key(|e| (e.year, e.pick_num));
    entries
}

/// Seasons with draft picks, newest first.
pub fn draft_years(entries: &[DraftBoardEntry]) -> Vec<i32> {
    let mut years: Vec<i32> = entries.iter().filter_map(|e| e.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// One season's board: owners as columns, rounds as rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardGrid {
    /// Ordered by round-1 pick; owners without a round-1 pick follow by name.
    pub owners: Vec<String>,
    /// `(round, cells)`; each cell lines up with `owners`, `None` when empty.
    pub rounds: Vec<(u32, Vec<Option<BoardCell>>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardCell {
    /// Picks joined with ` / ` when an owner has more than one in a round.
    pub text: String,
    pub rank_line: String,
    pub is_keeper: bool,
}

pub fn board_grid(entries: &[DraftBoardEntry], year: i32) -> Option<BoardGrid> {
    let season: Vec<&DraftBoardEntry> = entries.iter().filter(|e| e.year == Some(year)).collect();
    if season.is_empty() {
        return None;
    }

    let mut round_one: Vec<&&DraftBoardEntry> = season.iter().filter(|e| e.round_num == Some(1)).collect();
    round_one.sort_by_key(|e| e.pick_num);
    let mut owners: Vec<String> = Vec::new();
    for e in round_one {
        if !owners.contains(&e.owner) {
            owners.push(e.owner.clone());
        }
    }
    let mut rest: Vec<String> = season
        .iter()
        .map(|e| e.owner.clone())
        .filter(|o| !owners.contains(o))
        .collect();
    rest.sort();
    rest.dedup();
    owners.extend(rest);

    let mut cells: BTreeMap<u32, HashMap<&str, Vec<&DraftBoardEntry>>> = BTreeMap::new();
    for e in &season {
        let Some(round) = e.round_num else {
            continue;
        };
        cells
            .entry(round)
            .or_default()
            .entry(e.owner.as_str())
            .or_default()
            .push(*e);
    }

    let rounds = cells
        .into_iter()
        .map(|(round, by_owner)| {
            let row = owners
                .iter()
                .map(|owner| {
                    let picks = by_owner.get(owner.as_str())?;
                    Some(BoardCell {
                        text: picks.iter().map(|p| p.cell()).collect::<Vec<_>>().join(" / "),
                        rank_line: picks.iter().map(|p| p.rank_line()).collect::<Vec<_>>().join(" / "),
                        is_keeper: picks.iter().any(|p| p.is_keeper),
                    })
                })
                .collect();
            (round, row)
        })
        .collect();

    Some(BoardGrid { owners, rounds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DraftPick, Matchup, PlayerWeek, TeamSeason};

    #[test]
    fn test_split_player_key() {
        assert_eq!(split_player_key("423.p.32692"), ("423", "32692"));
        assert_eq!(split_player_key("32692"), ("32692", "32692"));
    }

    #[test]
    fn test_rank_line_arrows() {
        assert_eq!(rank_line(1, Some(1)), "Draft/Finish Rank: 1 / 1 (=)");
        assert_eq!(rank_line(5, Some(2)), "Draft/Finish Rank: 5 / 2 (↑3)");
        assert_eq!(rank_line(2, Some(6)), "Draft/Finish Rank: 2 / 6 (↓4)");
        assert_eq!(rank_line(3, None), "Draft/Finish Rank: 3 / N/A");
    }

    fn pick(team: &str, key: &str, pick_num: u32, round: u32, pos: &str) -> DraftPick {
        DraftPick {
            team_key: team.to_string(),
            player_key: key.to_string(),
            player_name: key.to_uppercase(),
            year: Some(2020),
            pick_num: Some(pick_num),
            round_num: Some(round),
            player_position: pos.to_string(),
            ..Default::default()
        }
    }

    fn scored(team: &str, key: &str, pos: &str, week: u32, pts: f64) -> PlayerWeek {
        PlayerWeek {
            team_key: team.to_string(),
            week: Some(week),
            player_key: key.to_string(),
            player_name: key.to_string(),
            player_position: pos.to_string(),
            selected_position: pos.to_string(),
            player_week_points: pts,
            ..Default::default()
        }
    }

    fn league() -> League {
        let teams = ["a", "b"]
            .iter()
            .map(|k| TeamSeason {
                team_key: format!("399.l.1.t.{}", k),
                owner_name: Some(k.to_uppercase()),
                year: Some(2020),
                ..Default::default()
            })
            .collect();
        League {
            teams,
            matchups: vec![Matchup {
                team_key: "399.l.1.t.a".into(),
                week: Some(15),
                is_playoffs: Some(true),
                ..Default::default()
            }],
            players: vec![
                scored("399.l.1.t.a", "399.p.1", "RB", 1, 10.0),
                scored("399.l.1.t.b", "399.p.2", "RB", 1, 30.0),
                scored("399.l.1.t.a", "399.p.3", "WR", 1, 5.0),
                // playoff week does not count
                scored("399.l.1.t.a", "399.p.1", "RB", 15, 100.0),
            ],
            draft_picks: vec![
                pick("399.l.1.t.b", "399.p.2", 2, 1, "RB"),
                pick("399.l.1.t.a", "399.p.1", 1, 1, "RB"),
                pick("399.l.1.t.b", "399.p.3", 3, 2, "WR"),
                pick("399.l.1.t.a", "399.p.9", 4, 2, "TE"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_draft_and_finish_ranks() {
        let board = draft_board(&league());
        assert_eq!(board[0].pick_num, Some(1));
        assert_eq!(board[0].owner, "A");
        assert_eq!(board[0].draft_rank, 1);
        assert_eq!(board[0].finish_rank, Some(2));
        assert_eq!(board[0].rank_line(), "Draft/Finish Rank: 1 / 2 (↓1)");
        assert_eq!(board[1].draft_rank, 2);
        assert_eq!(board[1].finish_rank, Some(1));
        assert_eq!(board[3].finish_rank, None);
        assert_eq!(board[0].cell(), "1. 399.P.1 (RB)");
    }

    #[test]
    fn test_board_grid_layout() {
        let board = draft_board(&league());
        let grid = board_grid(&board, 2020).unwrap();
        assert_eq!(grid.owners, vec!["A", "B"]);
        assert_eq!(grid.rounds.len(), 2);
        let (round, cells) = &grid.rounds[1];
        assert_eq!(*round, 2);
        assert_eq!(cells[0].as_ref().unwrap().text, "4. 399.P.9 (TE)");
        assert!(board_grid(&board, 2019).is_none());
        assert_eq!(draft_years(&board), vec![2020]);
    }

    #[test]
    fn test_duplicate_picks_share_a_cell() {
        let mut l = league();
        l.draft_picks.push(pick("399.l.1.t.a", "399.p.7", 5, 2, "K"));
        let grid = board_grid(&draft_board(&l), 2020).unwrap();
        let cell = grid.rounds[1].1[0].as_ref().unwrap();
        assert_eq!(cell.text, "4. 399.P.9 (TE) / 5. 399.P.7 (K)");
    }
}
