//! Canonical league records and the load-time schema normalizer.
//!
//! Every source table arrives as a [`RawTable`] with whatever headers the
//! spreadsheet export happened to use. A [`SchemaMapping`] renames recognized
//! source columns to canonical names once, and the `*_from_raw` functions turn
//! rows into typed records. Optional columns that are absent or unparsable
//! become `None` (or a neutral default); only a missing join key is an error.

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

// ============================================================================
// Raw tables
// ============================================================================

/// A table exactly as read from its source, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Parse CSV text. Rows may be shorter or longer than the header row.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }
        Ok(RawTable { headers, rows })
    }
}

/// Lower-case and trim a column name.
pub fn canonical_header(name: &str) -> String {
    name.trim().to_lowercase()
}

// ============================================================================
// Schema mapping
// ============================================================================

/// Explicit `{ recognized source name -> canonical name }` configuration for one table.
///
/// Applied once at load. A column that already carries the canonical name wins
/// over an alias, and unrecognized columns keep their (lower-cased) names.
#[derive(Debug, Clone)]
pub struct SchemaMapping {
    pub table: &'static str,
    pub aliases: Vec<(&'static str, &'static str)>,
    pub required: Vec<&'static str>,
}

impl SchemaMapping {
    pub fn teams() -> Self {
        SchemaMapping {
            table: "teams",
            aliases: vec![
                ("teamkey", "team_key"),
                ("owner", "owner_name"),
                ("manager", "owner_name"),
                ("season", "year"),
                ("team", "team_name"),
                ("league_result_final", "league_result"),
                ("final_result", "league_result"),
                ("regular_season_rank", "regular_season_ranking"),
                ("regular_season_wins", "wins"),
                ("reg_wins", "wins"),
                ("regular_season_losses", "losses"),
                ("reg_losses", "losses"),
                ("points_for", "points_for_total"),
                ("pf_total", "points_for_total"),
                ("total_pf", "points_for_total"),
                ("regular_season_points_for", "points_for_total"),
                ("points_against", "points_against_total"),
                ("pa_total", "points_against_total"),
                ("total_pa", "points_against_total"),
                ("regular_season_points_against", "points_against_total"),
                ("waiver_moves", "number_of_waiver_moves"),
                ("trades", "number_of_trades"),
                ("url", "team_url"),
                ("draft_report_card", "draft_grade"),
                ("finished", "is_finished"),
                ("season_finished", "is_finished"),
                ("team_logo_url", "logo_url"),
                ("team_logo", "logo_url"),
            ],
            required: vec!["team_key", "owner_name", "year"],
        }
    }

    pub fn matchups() -> Self {
        SchemaMapping {
            table: "matchups",
            aliases: vec![
                ("teamkey", "team_key"),
                ("opponentteamkey", "opponent_team_key"),
                ("season", "year"),
            ],
            required: vec!["team_key"],
        }
    }

    pub fn players() -> Self {
        SchemaMapping {
            table: "players",
            aliases: vec![
                ("teamkey", "team_key"),
                ("player_id", "player_key"),
                ("name", "player_name"),
                ("full_name", "player_name"),
                ("player_full_name", "player_name"),
            ],
            required: vec!["team_key"],
        }
    }

    pub fn draft_roster() -> Self {
        SchemaMapping {
            table: "draft_roster",
            aliases: vec![
                ("teamkey", "team_key"),
                ("player_id", "player_key"),
                ("season", "year"),
                ("name", "player_name"),
                ("full_name", "player_name"),
            ],
            required: vec!["team_key", "player_key"],
        }
    }

    pub fn final_roster() -> Self {
        SchemaMapping {
            table: "final_roster",
            aliases: vec![
                ("teamkey", "team_key"),
                ("player_id", "player_key"),
                ("name", "player_name"),
                ("full_name", "player_name"),
            ],
            required: vec!["team_key"],
        }
    }

    /// Canonical names for a header row, position for position.
    pub fn canonical_headers(&self, headers: &[String]) -> Vec<String> {
        let lowered: Vec<String> = headers.iter().map(|h| canonical_header(h)).collect();
        let mut taken: HashSet<String> = lowered.iter().cloned().collect();
        lowered
            .into_iter()
            .map(|h| {
                match self.aliases.iter().find(|(from, _)| *from == h) {
                    Some((_, to)) if !taken.contains(*to) => {
                        taken.insert(to.to_string());
                        to.to_string()
                    }
                    _ => h,
                }
            })
            .collect()
    }

    /// Resolve the header row into a column index, failing on a missing join key.
    pub fn columns(&self, raw: &RawTable) -> Result<Columns> {
        let names = self.canonical_headers(&raw.headers);
        let mut index = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        for required in &self.required {
            if !index.contains_key(*required) {
                anyhow::bail!(
                    "Column '{}' not found in {} table (columns: {})",
                    required,
                    self.table,
                    names.join(", ")
                );
            }
        }
        let known: HashSet<&str> = self.aliases.iter().map(|(_, to)| *to).collect();
        let defaulted: Vec<&str> = known
            .iter()
            .filter(|c| !index.contains_key(**c))
            .copied()
            .collect();
        if !defaulted.is_empty() {
            log::debug!("{}: defaulting absent columns {:?}", self.table, defaulted);
        }
        Ok(Columns { names, index })
    }
}

/// Canonical column lookup for the rows of one table.
#[derive(Debug, Clone)]
pub struct Columns {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Columns {
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Trimmed cell text, `None` when the column is absent or the cell blank.
    pub fn get<'r>(&self, row: &'r [String], name: &str) -> Option<&'r str> {
        self.index
            .get(name)
            .and_then(|&i| row.get(i))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn string(&self, row: &[String], name: &str) -> Option<String> {
        self.get(row, name).map(|s| s.to_string())
    }

    pub fn float(&self, row: &[String], name: &str) -> Option<f64> {
        self.get(row, name).and_then(parse_float)
    }

    pub fn int(&self, row: &[String], name: &str) -> Option<i64> {
        self.get(row, name).and_then(parse_int)
    }

    pub fn flag(&self, row: &[String], name: &str) -> Option<bool> {
        self.get(row, name).and_then(parse_bool)
    }

    /// Every column not in `consumed`, keyed by canonical name.
    pub fn extras(&self, row: &[String], consumed: &[&str]) -> BTreeMap<String, String> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, n)| !consumed.contains(&n.as_str()))
            .filter_map(|(i, n)| {
                row.get(i)
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(|v| (n.clone(), v.to_string()))
            })
            .collect()
    }
}

// ============================================================================
// Cell coercion
// ============================================================================

lazy_static! {
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9.\-]").unwrap();
}

pub fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integers, also accepting whole floats such as `10.0`.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        parse_float(s)
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "1.0" | "true" | "t" | "yes" | "y" | "finished" | "final" | "complete"
        | "completed" | "done" => Some(true),
        "0" | "0.0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// FAAB amounts may carry currency symbols or thousands separators.
pub fn parse_faab(s: &str) -> Option<f64> {
    let cleaned = NON_NUMERIC.replace_all(s, "");
    parse_float(&cleaned)
}

/// Upper-case a position code and alias `DST` to `DEF`.
pub fn normalize_position(s: &str) -> String {
    let p = s.trim().to_uppercase();
    if p == "DST" {
        "DEF".to_string()
    } else {
        p
    }
}

/// A roster slot that counts toward the team's score.
pub fn is_started_slot(selected_position: &str) -> bool {
    let s = selected_position.trim().to_uppercase();
    !s.is_empty() && !matches!(s.as_str(), "BN" | "IR" | "NA" | "OUT")
}

fn to_u32(v: Option<i64>) -> Option<u32> {
    v.and_then(|n| u32::try_from(n).ok())
}

fn to_i32(v: Option<i64>) -> Option<i32> {
    v.and_then(|n| i32::try_from(n).ok())
}

// ============================================================================
// Enumerations
// ============================================================================

/// Final league outcome of a team-season.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeagueResult {
    Winner,
    RunnerUp,
    Loser,
    Playoffs,
    Other(String),
}

impl LeagueResult {
    pub fn parse(s: &str) -> Option<Self> {
        let t = s.trim();
        if t.is_empty() {
            return None;
        }
        Some(match t.to_lowercase().as_str() {
            "winner" | "champion" => LeagueResult::Winner,
            "runner-up" | "runner up" | "runnerup" => LeagueResult::RunnerUp,
            "loser" => LeagueResult::Loser,
            "playoffs" => LeagueResult::Playoffs,
            _ => LeagueResult::Other(t.to_string()),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            LeagueResult::Winner => "Winner",
            LeagueResult::RunnerUp => "Runner-up",
            LeagueResult::Loser => "Loser",
            LeagueResult::Playoffs => "Playoffs",
            LeagueResult::Other(s) => s,
        }
    }

    /// Playoffs, Runner-up and Winner all count as a playoff appearance.
    pub fn made_playoffs(&self) -> bool {
        matches!(
            self,
            LeagueResult::Winner | LeagueResult::RunnerUp | LeagueResult::Playoffs
        )
    }
}

impl fmt::Display for LeagueResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekResult {
    Win,
    Loss,
    Tie,
}

impl WeekResult {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "win" | "w" | "won" => Some(WeekResult::Win),
            "loss" | "l" | "lose" | "lost" => Some(WeekResult::Loss),
            "tie" | "t" | "draw" => Some(WeekResult::Tie),
            _ => None,
        }
    }

    /// Result implied by a points margin.
    pub fn from_margin(margin: f64) -> Self {
        if margin > 0.0 {
            WeekResult::Win
        } else if margin < 0.0 {
            WeekResult::Loss
        } else {
            WeekResult::Tie
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            WeekResult::Win => "W",
            WeekResult::Loss => "L",
            WeekResult::Tie => "T",
        }
    }
}

/// Starting-slot bucket used by positional statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotGroup {
    QB,
    RB,
    WR,
    TE,
    Flex,
    K,
    Def,
}

impl SlotGroup {
    /// Display order for positional tables.
    pub const ALL: [SlotGroup; 7] = [
        SlotGroup::QB,
        SlotGroup::RB,
        SlotGroup::WR,
        SlotGroup::TE,
        SlotGroup::Flex,
        SlotGroup::K,
        SlotGroup::Def,
    ];

    /// Any started slot outside the six base positions is FLEX.
    pub fn from_slot(slot: &str) -> Self {
        match normalize_position(slot).as_str() {
            "QB" => SlotGroup::QB,
            "RB" => SlotGroup::RB,
            "WR" => SlotGroup::WR,
            "TE" => SlotGroup::TE,
            "K" => SlotGroup::K,
            "DEF" => SlotGroup::Def,
            _ => SlotGroup::Flex,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SlotGroup::QB => "QB",
            SlotGroup::RB => "RB",
            SlotGroup::WR => "WR",
            SlotGroup::TE => "TE",
            SlotGroup::Flex => "FLEX",
            SlotGroup::K => "K",
            SlotGroup::Def => "DEF",
        }
    }
}

/// The six scoring positions a player can be listed at.
pub const BASE_POSITIONS: [&str; 6] = ["QB", "RB", "WR", "TE", "K", "DEF"];

// ============================================================================
// Records
// ============================================================================

/// One team in one season.
#[derive(Debug, Clone, Default)]
pub struct TeamSeason {
    pub team_key: String,
    pub year: Option<i32>,
    pub owner_name: Option<String>,
    pub team_name: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub points_for_total: Option<f64>,
    pub points_against_total: Option<f64>,
    pub regular_season_ranking: Option<u32>,
    pub league_result: Option<LeagueResult>,
    pub is_finished: bool,
    pub number_of_waiver_moves: Option<u32>,
    pub number_of_trades: Option<u32>,
    pub faab_balance_used: Option<f64>,
    pub draft_grade: Option<String>,
    pub team_url: Option<String>,
    pub logo_url: Option<String>,
    pub extras: BTreeMap<String, String>,
}

impl TeamSeason {
    pub fn owner(&self) -> &str {
        self.owner_name.as_deref().unwrap_or("")
    }

    pub fn has_result(&self, result: &LeagueResult) -> bool {
        self.league_result.as_ref() == Some(result)
    }
}

/// One side of one weekly matchup.
#[derive(Debug, Clone, Default)]
pub struct Matchup {
    pub team_key: String,
    pub opponent_team_key: Option<String>,
    pub week: Option<u32>,
    pub year: Option<i32>,
    pub points_for: Option<f64>,
    pub points_against: Option<f64>,
    pub points_difference: Option<f64>,
    pub is_playoffs: Option<bool>,
    pub high_score_flag: bool,
    pub low_score_flag: bool,
    pub week_result: Option<WeekResult>,
    pub matchup_key: Option<String>,
    pub extras: BTreeMap<String, String>,
}

impl Matchup {
    /// Explicit margin, else points for minus points against.
    pub fn margin(&self) -> Option<f64> {
        self.points_difference.or(match (self.points_for, self.points_against) {
            (Some(pf), Some(pa)) => Some(pf - pa),
            _ => None,
        })
    }

    /// Recorded result, else the result implied by the points.
    pub fn result(&self) -> Option<WeekResult> {
        self.week_result.or_else(|| {
            match (self.points_for, self.points_against) {
                (Some(pf), Some(pa)) => Some(WeekResult::from_margin(pf - pa)),
                _ => None,
            }
        })
    }
}

/// One player on one team in one week.
#[derive(Debug, Clone, Default)]
pub struct PlayerWeek {
    pub team_key: String,
    pub week: Option<u32>,
    pub player_key: String,
    pub player_name: String,
    pub player_position: String,
    pub selected_position: String,
    pub player_week_points: f64,
    pub extras: BTreeMap<String, String>,
}

impl PlayerWeek {
    pub fn is_started(&self) -> bool {
        is_started_slot(&self.selected_position)
    }

    pub fn is_benched(&self) -> bool {
        self.selected_position == "BN"
    }

    pub fn display_name(&self) -> &str {
        if self.player_name.is_empty() {
            &self.player_key
        } else {
            &self.player_name
        }
    }
}

/// One draft selection.
#[derive(Debug, Clone, Default)]
pub struct DraftPick {
    pub team_key: String,
    pub player_key: String,
    pub player_name: String,
    pub year: Option<i32>,
    pub pick_num: Option<u32>,
    pub round_num: Option<u32>,
    pub player_position: String,
    pub is_keeper: bool,
    pub extras: BTreeMap<String, String>,
}

/// One player on a team's end-of-season roster.
#[derive(Debug, Clone, Default)]
pub struct FinalRosterEntry {
    pub team_key: String,
    pub player_key: String,
    pub player_name: String,
    pub player_position: String,
    pub extras: BTreeMap<String, String>,
}

/// Every table of one league, immutable after load.
#[derive(Debug, Clone, Default)]
pub struct League {
    pub teams: Vec<TeamSeason>,
    pub matchups: Vec<Matchup>,
    pub players: Vec<PlayerWeek>,
    pub draft_picks: Vec<DraftPick>,
    pub final_rosters: Option<Vec<FinalRosterEntry>>,
}

// ============================================================================
// Normalization
// ============================================================================

pub fn teams_from_raw(raw: &RawTable) -> Result<Vec<TeamSeason>> {
    let cols = SchemaMapping::teams().columns(raw)?;
    const CONSUMED: &[&str] = &[
        "team_key",
        "year",
        "owner_name",
        "team_name",
        "wins",
        "losses",
        "points_for_total",
        "points_against_total",
        "regular_season_ranking",
        "league_result",
        "is_finished",
        "number_of_waiver_moves",
        "number_of_trades",
        "faab_balance_used",
        "draft_grade",
        "team_url",
        "logo_url",
    ];

    let mut teams = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let Some(team_key) = cols.string(row, "team_key") else {
            log::warn!("teams: skipping row without team_key");
            continue;
        };
        teams.push(TeamSeason {
            team_key,
            year: to_i32(cols.int(row, "year")),
            owner_name: cols.string(row, "owner_name"),
            team_name: cols.string(row, "team_name"),
            wins: to_u32(cols.int(row, "wins")),
            losses: to_u32(cols.int(row, "losses")),
            points_for_total: cols.float(row, "points_for_total"),
            points_against_total: cols.float(row, "points_against_total"),
            regular_season_ranking: to_u32(cols.int(row, "regular_season_ranking")),
            league_result: cols.get(row, "league_result").and_then(LeagueResult::parse),
            is_finished: cols.flag(row, "is_finished").unwrap_or(false),
            number_of_waiver_moves: to_u32(cols.int(row, "number_of_waiver_moves")),
            number_of_trades: to_u32(cols.int(row, "number_of_trades")),
            faab_balance_used: cols.get(row, "faab_balance_used").and_then(parse_faab),
            draft_grade: cols.string(row, "draft_grade"),
            team_url: cols.string(row, "team_url"),
            logo_url: cols.string(row, "logo_url"),
            extras: cols.extras(row, CONSUMED),
        });
    }
    Ok(teams)
}

pub fn matchups_from_raw(raw: &RawTable) -> Result<Vec<Matchup>> {
    let cols = SchemaMapping::matchups().columns(raw)?;
    const CONSUMED: &[&str] = &[
        "team_key",
        "opponent_team_key",
        "week",
        "year",
        "points_for",
        "points_against",
        "points_difference",
        "is_playoffs",
        "high_score_flag",
        "low_score_flag",
        "week_result",
        "matchup_key",
    ];

    let mut matchups = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let Some(team_key) = cols.string(row, "team_key") else {
            log::warn!("matchups: skipping row without team_key");
            continue;
        };
        matchups.push(Matchup {
            team_key,
            opponent_team_key: cols.string(row, "opponent_team_key"),
            week: to_u32(cols.int(row, "week")),
            year: to_i32(cols.int(row, "year")),
            points_for: cols.float(row, "points_for"),
            points_against: cols.float(row, "points_against"),
            points_difference: cols.float(row, "points_difference"),
            is_playoffs: cols.flag(row, "is_playoffs"),
            high_score_flag: cols.flag(row, "high_score_flag").unwrap_or(false),
            low_score_flag: cols.flag(row, "low_score_flag").unwrap_or(false),
            week_result: cols.get(row, "week_result").and_then(WeekResult::parse),
            matchup_key: cols.string(row, "matchup_key"),
            extras: cols.extras(row, CONSUMED),
        });
    }
    Ok(matchups)
}

pub fn players_from_raw(raw: &RawTable) -> Result<Vec<PlayerWeek>> {
    let cols = SchemaMapping::players().columns(raw)?;
    const CONSUMED: &[&str] = &[
        "team_key",
        "week",
        "player_key",
        "player_name",
        "player_position",
        "selected_position",
        "player_week_points",
    ];

    let mut players = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let Some(team_key) = cols.string(row, "team_key") else {
            log::warn!("players: skipping row without team_key");
            continue;
        };
        players.push(PlayerWeek {
            team_key,
            week: to_u32(cols.int(row, "week")),
            player_key: cols.string(row, "player_key").unwrap_or_default(),
            player_name: cols.string(row, "player_name").unwrap_or_default(),
            player_position: cols
                .get(row, "player_position")
                .map(normalize_position)
                .unwrap_or_default(),
            selected_position: cols
                .get(row, "selected_position")
                .map(|s| s.to_uppercase())
                .unwrap_or_default(),
            player_week_points: cols.float(row, "player_week_points").unwrap_or(0.0),
            extras: cols.extras(row, CONSUMED),
        });
    }
    Ok(players)
}

pub fn draft_picks_from_raw(raw: &RawTable) -> Result<Vec<DraftPick>> {
    let cols = SchemaMapping::draft_roster().columns(raw)?;
    const CONSUMED: &[&str] = &[
        "team_key",
        "player_key",
        "player_name",
        "year",
        "pick_num",
        "round_num",
        "player_position",
        "is_keeper",
    ];

    let mut picks = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let (Some(team_key), Some(player_key)) =
            (cols.string(row, "team_key"), cols.string(row, "player_key"))
        else {
            log::warn!("draft_roster: skipping row without team_key/player_key");
            continue;
        };
        picks.push(DraftPick {
            team_key,
            player_key,
            player_name: cols.string(row, "player_name").unwrap_or_default(),
            year: to_i32(cols.int(row, "year")),
            pick_num: to_u32(cols.int(row, "pick_num")),
            round_num: to_u32(cols.int(row, "round_num")),
            player_position: cols
                .get(row, "player_position")
                .map(normalize_position)
                .unwrap_or_default(),
            is_keeper: cols.flag(row, "is_keeper").unwrap_or(false),
            extras: cols.extras(row, CONSUMED),
        });
    }
    Ok(picks)
}

pub fn final_roster_from_raw(raw: &RawTable) -> Result<Vec<FinalRosterEntry>> {
    let cols = SchemaMapping::final_roster().columns(raw)?;
    const CONSUMED: &[&str] = &["team_key", "player_key", "player_name", "player_position"];

    let mut entries = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let Some(team_key) = cols.string(row, "team_key") else {
            continue;
        };
        entries.push(FinalRosterEntry {
            team_key,
            player_key: cols.string(row, "player_key").unwrap_or_default(),
            player_name: cols.string(row, "player_name").unwrap_or_default(),
            player_position: cols
                .get(row, "player_position")
                .map(normalize_position)
                .unwrap_or_default(),
            extras: cols.extras(row, CONSUMED),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_canonical_headers_prefers_existing_name() {
        let mapping = SchemaMapping::teams();
        let headers: Vec<String> = [" TeamKey ", "Owner", "owner_name", "Season"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            mapping.canonical_headers(&headers),
            vec!["team_key", "owner", "owner_name", "year"]
        );
    }

    #[test]
    fn test_missing_join_key_is_fatal() {
        let t = raw(&["owner_name", "year"], &[&["A", "2020"]]);
        let err = teams_from_raw(&t).unwrap_err();
        assert!(err.to_string().contains("team_key"));
    }

    #[test]
    fn test_optional_columns_default() {
        let t = raw(
            &["Team_Key", "Owner", "Year", "Wins"],
            &[&["1.t.1", "Ann", "2020", "abc"]],
        );
        let teams = teams_from_raw(&t).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].owner(), "Ann");
        assert_eq!(teams[0].year, Some(2020));
        assert_eq!(teams[0].wins, None);
        assert!(!teams[0].is_finished);
        assert!(teams[0].league_result.is_none());
    }

    #[test]
    fn test_faab_cleanup() {
        assert_eq!(parse_faab("$1,234.50"), Some(1234.5));
        assert_eq!(parse_faab("-5"), Some(-5.0));
        assert_eq!(parse_faab("n/a"), None);
    }

    #[test]
    fn test_parse_int_accepts_whole_floats() {
        assert_eq!(parse_int("10.0"), Some(10));
        assert_eq!(parse_int("10.5"), None);
        assert_eq!(parse_int(" 7 "), Some(7));
    }

    #[test]
    fn test_league_result_parse() {
        assert_eq!(LeagueResult::parse("runner up"), Some(LeagueResult::RunnerUp));
        assert_eq!(LeagueResult::parse("WINNER"), Some(LeagueResult::Winner));
        assert_eq!(LeagueResult::parse(""), None);
        assert!(!LeagueResult::parse("Consolation").unwrap().made_playoffs());
    }

    #[test]
    fn test_slot_groups() {
        assert_eq!(SlotGroup::from_slot("DST"), SlotGroup::Def);
        assert_eq!(SlotGroup::from_slot("W/R/T"), SlotGroup::Flex);
        assert_eq!(SlotGroup::from_slot("qb"), SlotGroup::QB);
        assert!(is_started_slot("W/R/T"));
        assert!(!is_started_slot("BN"));
        assert!(!is_started_slot("ir"));
        assert!(!is_started_slot("NA"));
    }

    #[test]
    fn test_players_normalize_positions() {
        let t = raw(
            &["team_key", "week", "player_key", "player_position", "selected_position"],
            &[&["1.t.1", "3", "1.p.9", "dst", "dst"]],
        );
        let players = players_from_raw(&t).unwrap();
        assert_eq!(players[0].player_position, "DEF");
        assert_eq!(players[0].selected_position, "DST");
        assert_eq!(players[0].player_week_points, 0.0);
        assert_eq!(players[0].display_name(), "1.p.9");
    }

    #[test]
    fn test_matchup_result_falls_back_to_points() {
        let m = Matchup {
            points_for: Some(90.0),
            points_against: Some(100.0),
            ..Default::default()
        };
        assert_eq!(m.result(), Some(WeekResult::Loss));
        assert_eq!(m.margin(), Some(-10.0));
    }
}
