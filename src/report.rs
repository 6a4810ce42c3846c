//! Plain-text renderings of every report, plus CSV export.
//!
//! Each renderer returns the finished text so the CLI can print it and the UI
//! can show it in a monospace pane. Empty sections read "No data".

use crate::draft_board::{board_grid, DraftBoardEntry};
use crate::final_rosters::FinalRosterRow;
use crate::hall_of_fame::{HallOfFame, OwnerValue, PlayerWeekRecord, TiedCount, WeeklyScore};
use crate::owner_profile::OwnerProfile;
use crate::power_rankings::PowerRankingRow;
use crate::rules::LEAGUE_RULES;
use crate::schema::SlotGroup;
use crate::season::{GameCard, PerformanceRow, SeasonReport, TopPlayerRow};
use crate::team_season::TeamSeasonReport;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::{Display, Write};
use std::path::Path;

const NO_DATA: &str = "No data";

/// Longest rank bar in the owner view.
const MAX_RANK_BAR: usize = 40;

fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let head: String = name.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn opt_f(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "-".to_string())
}

fn banner(out: &mut String, title: &str, width: usize) -> Result<()> {
    writeln!(out, "\n{:=^width$}", format!(" {} ", title), width = width)?;
    Ok(())
}

/// Write any serializable rows as CSV with a header line.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV")?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

// ============================================================================
// League Standings
// ============================================================================

pub fn power_rankings_text(rows: &[PowerRankingRow]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:=^112}", " League Standings ")?;
    if rows.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
        return Ok(out);
    }
    writeln!(
        out,
        "\n{:>5} {:<20} {:>7} {:>8} {:>7} {:>9} {:>7} {:>7} {:>7} {:>10}",
        "Rank", "Owner", "Seasons", "Avg Rank", "Win %", "Playoff %", "Champs", "Runner", "Loser", "Score"
    )?;
    writeln!(out, "{:-<112}", "")?;
    for r in rows {
        writeln!(
            out,
            "{:>5} {:<20} {:>7} {:>8.2} {:>7} {:>9} {:>7} {:>7} {:>7} {:>10.2}",
            r.power_rank,
            truncate_name(&r.owner, 20),
            r.seasons_played,
            r.avg_rank,
            opt_f(r.win_pct, 1),
            opt_f(r.playoff_pct, 1),
            r.championships,
            r.runner_ups,
            r.losers,
            r.power_score
        )?;
    }
    writeln!(
        out,
        "\nScore = 5 x Champs + 3 x Runner-ups - 2 x Losers - Avg Rank + 0.5 x Seasons"
    )?;
    Ok(out)
}

// ============================================================================
// Hall of Fame
// ============================================================================

fn owner_value_line(label: &str, card: &Option<OwnerValue>, suffix: &str) -> String {
    match card {
        Some(c) => format!("{:<28} {} ({}{})", label, c.owner, c.value, suffix),
        None => format!("{:<28} {}", label, NO_DATA),
    }
}

fn tied_line(label: &str, card: &Option<TiedCount>) -> String {
    match card {
        Some(c) => format!("{:<28} {}", label, c),
        None => format!("{:<28} {}", label, NO_DATA),
    }
}

fn weekly_line(label: &str, card: &Option<WeeklyScore>, show_margin: bool) -> String {
    match card {
        Some(s) => {
            let value = if show_margin {
                s.margin.unwrap_or(s.points_for)
            } else {
                s.points_for
            };
            format!(
                "{:<28} {} {:.2} ({} Wk {})",
                label,
                s.owner.as_deref().unwrap_or("-"),
                value,
                opt(s.year),
                opt(s.week)
            )
        }
        None => format!("{:<28} {}", label, NO_DATA),
    }
}

fn player_line(label: &str, card: &Option<PlayerWeekRecord>) -> String {
    match card {
        Some(p) => format!(
            "{:<28} {} ({}) {:.2} for {} ({} Wk {})",
            label,
            p.player_name,
            p.position,
            p.points,
            p.owner.as_deref().unwrap_or("-"),
            opt(p.year),
            opt(p.week)
        ),
        None => format!("{:<28} {}", label, NO_DATA),
    }
}

pub fn hall_of_fame_text(hof: &HallOfFame) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:=^80}", " Hall of Fame / Hall of Shame ")?;

    banner(&mut out, "Champs & Chumps", 80)?;
    if hof.champs_and_chumps.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    } else {
        writeln!(out, "{:<6} {:<22} {:<22} {:<22}", "Year", "Winner", "Runner-up", "Loser")?;
        writeln!(out, "{:-<80}", "")?;
        for row in &hof.champs_and_chumps {
            writeln!(
                out,
                "{:<6} {:<22} {:<22} {:<22}",
                row.year,
                opt(row.winner.as_deref()),
                opt(row.runner_up.as_deref()),
                opt(row.loser.as_deref())
            )?;
        }
    }

    let l = &hof.legends;
    banner(&mut out, "Legends", 80)?;
    writeln!(out, "{}", owner_value_line("Best Avg Rank", &l.best_avg_rank, ""))?;
    writeln!(out, "{}", owner_value_line("Highest Win %", &l.highest_win_pct, "%"))?;
    writeln!(out, "{}", tied_line("Most Weekly High Scores", &l.most_high_scores))?;
    writeln!(out, "{}", weekly_line("Highest Weekly Score", &l.highest_weekly_score, false))?;
    writeln!(out, "{}", weekly_line("Biggest Margin of Victory", &l.biggest_margin, true))?;
    writeln!(out, "{}", player_line("Highest Scoring Starter", &l.top_starter))?;

    let d = &hof.duds;
    banner(&mut out, "Duds", 80)?;
    writeln!(out, "{}", owner_value_line("Worst Avg Rank", &d.worst_avg_rank, ""))?;
    writeln!(out, "{}", owner_value_line("Lowest Win %", &d.lowest_win_pct, "%"))?;
    writeln!(out, "{}", tied_line("Most Weekly Low Scores", &d.most_low_scores))?;
    writeln!(out, "{}", weekly_line("Lowest Weekly Score", &d.lowest_weekly_score, false))?;
    writeln!(out, "{}", tied_line("Most Goose Eggs", &d.most_goose_eggs))?;
    writeln!(out, "{}", player_line("Highest Scoring Bench Player", &d.top_bench))?;
    Ok(out)
}

// ============================================================================
// Owner Insights
// ============================================================================

pub fn owner_profile_text(p: &OwnerProfile) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:=^100}", format!(" Owner Insights: {} ", p.owner))?;
    writeln!(
        out,
        "\nChampionships: {}   Runner-ups: {}   Losers: {}   Seasons: {}",
        p.trophies.championships, p.trophies.runner_ups, p.trophies.losers, p.trophies.seasons
    )?;
    writeln!(
        out,
        "Avg Rank: {}   Win %: {}   Playoff %: {}",
        opt_f(p.avg_rank, 2),
        opt_f(p.win_pct, 1),
        opt_f(p.playoff_pct, 1)
    )?;

    banner(&mut out, "Regular Season Rank by Year", 100)?;
    if p.rank_by_year.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    }
    for (year, rank) in &p.rank_by_year {
        writeln!(out, "{:<6} {:>3} {}", year, rank, "#".repeat((*rank as usize).min(MAX_RANK_BAR)))?;
    }

    banner(&mut out, "Head-to-Head", 100)?;
    if p.head_to_head.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    } else {
        writeln!(out, "{:<22} {:>6} {:>6} {:>6} {:>8}", "Opponent", "Games", "W", "L", "Win %")?;
        writeln!(out, "{:-<52}", "")?;
        for r in &p.head_to_head {
            writeln!(
                out,
                "{:<22} {:>6} {:>6} {:>6} {:>8.1}",
                truncate_name(&r.opponent, 22),
                r.games,
                r.wins,
                r.losses,
                r.win_pct
            )?;
        }
    }

    banner(&mut out, "Team Summary", 100)?;
    if p.seasons.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    } else {
        writeln!(
            out,
            "{:<6} {:<22} {:<10} {:>4} {:>3} {:>3} {:>9} {:>9} {:>5} {:>5} {:>4} {:>4} {:>5}",
            "Year", "Team", "Result", "Rank", "W", "L", "PF", "PA", "Wvr", "Trd", "Hi", "Lo", "Grade"
        )?;
        writeln!(out, "{:-<100}", "")?;
        for s in &p.seasons {
            writeln!(
                out,
                "{:<6} {:<22} {:<10} {:>4} {:>3} {:>3} {:>9} {:>9} {:>5} {:>5} {:>4} {:>4} {:>5}",
                opt(s.year),
                truncate_name(s.team_name.as_deref().unwrap_or("-"), 22),
                opt(s.league_result.as_deref()),
                opt(s.regular_season_ranking),
                opt(s.wins),
                opt(s.losses),
                opt_f(s.points_for, 2),
                opt_f(s.points_against, 2),
                opt(s.waiver_moves),
                opt(s.trades),
                s.high_scores,
                s.low_scores,
                opt(s.draft_grade.as_deref())
            )?;
        }
    }
    Ok(out)
}

// ============================================================================
// Team Insights
// ============================================================================

pub fn team_season_text(r: &TeamSeasonReport) -> Result<String> {
    let c = &r.card;
    let mut out = String::new();
    writeln!(
        out,
        "{:=^100}",
        format!(" {} ({}, {}) ", c.team_name.as_deref().unwrap_or("-"), c.owner, c.year)
    )?;
    if let Some(url) = &c.team_url {
        writeln!(out, "{}", url)?;
    }
    writeln!(
        out,
        "\nW: {}  L: {}  Result: {}  Rank: {}",
        opt(c.wins),
        opt(c.losses),
        opt(c.league_result.as_deref()),
        opt(c.regular_season_ranking)
    )?;
    writeln!(
        out,
        "PF: {}  PA: {}  Diff: {}",
        opt_f(c.points_for, 2),
        opt_f(c.points_against, 2),
        opt_f(c.points_diff, 2)
    )?;
    writeln!(
        out,
        "Waiver Moves: {}  FAAB Used: {}  Trades: {}",
        opt(c.waiver_moves),
        opt_f(c.faab_used, 0),
        opt(c.trades)
    )?;

    banner(&mut out, "Weekly Breakdown", 100)?;
    if r.weeks.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    } else {
        writeln!(out, "{:>4} {:>3} {:>8} {:>8} {:>4}  Starters", "Wk", "Res", "Points", "Median", "Flag")?;
        writeln!(out, "{:-<100}", "")?;
        for w in &r.weeks {
            let flag = if w.high_score {
                "HI"
            } else if w.low_score {
                "LO"
            } else {
                ""
            };
            let starters: Vec<String> = w
                .starters
                .iter()
                .map(|s| format!("{} {:.1}", s.player_name, s.points))
                .collect();
            writeln!(
                out,
                "{:>4} {:>3} {:>8.2} {:>8.2} {:>4}  {}",
                w.week,
                w.result.map(|r| r.letter()).unwrap_or("-"),
                w.points_for,
                w.league_median,
                flag,
                starters.join(", ")
            )?;
        }
    }

    banner(&mut out, "Season Points by Player", 100)?;
    if r.roster_points.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    }
    for p in &r.roster_points {
        writeln!(out, "{:<5} {:<28} {:>8.2}", p.primary_position, truncate_name(&p.player_name, 28), p.points)?;
    }
    Ok(out)
}

// ============================================================================
// Season Insights
// ============================================================================

fn game_line(label: &str, card: &Option<GameCard>) -> String {
    match card {
        Some(g) => format!(
            "{:<18} {} vs {} (Wk {}) {:.1} - {:.1}",
            label,
            g.owner,
            g.opponent,
            opt(g.week),
            g.points_for,
            g.points_against
        ),
        None => format!("{:<18} {}", label, NO_DATA),
    }
}

fn top_player_lines(out: &mut String, rows: &[TopPlayerRow]) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "  {}", NO_DATA)?;
    }
    for r in rows {
        writeln!(
            out,
            "  {:>3} {:<28} {:<20} {:>8.2}",
            r.rank,
            truncate_name(&r.player_name, 28),
            truncate_name(&r.owner, 20),
            r.points
        )?;
    }
    Ok(())
}

fn performance_lines(out: &mut String, title: &str, rows: &[PerformanceRow]) -> Result<()> {
    writeln!(out, "{}:", title)?;
    if rows.is_empty() {
        writeln!(out, "  {}", NO_DATA)?;
    }
    for r in rows {
        writeln!(
            out,
            "  {:>3} {:<36} {:<20} {:>8.2}",
            r.rank,
            truncate_name(&r.label, 36),
            truncate_name(&r.owner, 20),
            r.points
        )?;
    }
    Ok(())
}

fn group_header(out: &mut String, first: &str) -> Result<()> {
    write!(out, "{:<20}", first)?;
    for g in SlotGroup::ALL {
        write!(out, " {:>7}", g.label())?;
    }
    writeln!(out)?;
    writeln!(out, "{:-<76}", "")?;
    Ok(())
}

pub fn season_text(r: &SeasonReport) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:=^110}", format!(" Season Insights: {} ", r.year))?;

    if let Some(p) = &r.podium {
        writeln!(
            out,
            "\nWinner: {}   Runner-up: {}   Loser: {}",
            p.winner, p.runner_up, p.loser
        )?;
    }

    banner(&mut out, "Standings", 110)?;
    if r.standings.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    } else {
        writeln!(
            out,
            "{:>4} {:<20} {:<22} {:>7} {:>9} {:>9} {:>4} {:>4} {:>7} {:>6} {:>5}",
            "Rank", "Owner", "Team", "Record", "PF", "PA", "Hi", "Lo", "Waiver", "Trades", "FAAB"
        )?;
        writeln!(out, "{:-<110}", "")?;
        for s in &r.standings {
            writeln!(
                out,
                "{:>4} {:<20} {:<22} {:>7} {:>9.2} {:>9.2} {:>4} {:>4} {:>7} {:>6} {:>5}",
                s.rank,
                truncate_name(&s.owner, 20),
                truncate_name(&s.team_name, 22),
                s.record,
                s.points_for,
                s.points_against,
                s.high_scores,
                s.low_scores,
                s.waiver_moves,
                s.trades,
                s.faab_used
            )?;
        }
    }

    banner(&mut out, "Starter Position Ranks", 110)?;
    if r.position_ranks.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    } else {
        group_header(&mut out, "Owner")?;
        for row in &r.position_ranks {
            write!(out, "{:<20}", truncate_name(&row.owner, 20))?;
            for rank in &row.ranks {
                write!(out, " {:>7}", opt(*rank))?;
            }
            writeln!(out)?;
        }
    }

    banner(&mut out, "Points vs League (excluding self)", 110)?;
    if r.position_diffs.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    } else {
        group_header(&mut out, "Owner")?;
        for row in &r.position_diffs {
            write!(out, "{:<20}", truncate_name(&row.owner, 20))?;
            for diff in &row.diffs {
                write!(out, " {:>+7.2}", diff)?;
            }
            writeln!(out)?;
        }
    }

    banner(&mut out, "Consistency", 110)?;
    match &r.consistency {
        None => writeln!(out, "{}", NO_DATA)?,
        Some(c) => {
            writeln!(
                out,
                "League medians: Avg {:.1}, Std {:.1}",
                c.median_of_means, c.median_of_stds
            )?;
            writeln!(
                out,
                "{:<20} {:>8} {:>8} {:>8} {:>5} {:>8} {:>8}  {}",
                "Owner", "Avg", "Std", "Median", "Wks", "Min", "Max", "Quadrant"
            )?;
            writeln!(out, "{:-<110}", "")?;
            for row in &c.rows {
                writeln!(
                    out,
                    "{:<20} {:>8.1} {:>8.1} {:>8.1} {:>5} {:>8.1} {:>8.1}  {}",
                    truncate_name(&row.owner, 20),
                    row.mean,
                    row.std,
                    row.median,
                    row.weeks,
                    row.min,
                    row.max,
                    c.quadrant(row)
                )?;
            }
        }
    }

    banner(&mut out, "Drafted vs Non-Drafted Points", 110)?;
    if r.drafted_share.is_empty() {
        writeln!(out, "{}", NO_DATA)?;
    }
    for row in &r.drafted_share {
        writeln!(
            out,
            "{:<20} {:>6.1}% drafted {:>6.1}% non-drafted",
            truncate_name(&row.owner, 20),
            row.drafted_pct,
            row.non_drafted_pct
        )?;
    }

    banner(&mut out, "Top Players", 110)?;
    for (pos, rows) in &r.top_players {
        writeln!(out, "{}:", pos)?;
        top_player_lines(&mut out, rows)?;
    }
    writeln!(out, "Non-Drafted:")?;
    match &r.top_undrafted {
        Some(rows) => top_player_lines(&mut out, rows)?,
        None => writeln!(out, "  No draft data for this season")?,
    }

    banner(&mut out, "Top Performances", 110)?;
    performance_lines(&mut out, "Started Players", &r.top_started)?;
    performance_lines(&mut out, "Benched Players", &r.top_benched)?;
    performance_lines(&mut out, "Teams", &r.top_teams)?;

    let h = &r.highlights;
    banner(&mut out, "Highlights", 110)?;
    writeln!(out, "{}", game_line("Highest Score", &h.highest_score))?;
    writeln!(out, "{}", game_line("Lowest Score", &h.lowest_score))?;
    writeln!(out, "{}", game_line("Biggest Win", &h.biggest_win))?;
    writeln!(out, "{}", game_line("Closest Win", &h.closest_win))?;
    writeln!(out, "{}", game_line("Luckiest Win", &h.luckiest_win))?;
    writeln!(out, "{}", game_line("Unluckiest Loss", &h.unluckiest_loss))?;
    Ok(out)
}

// ============================================================================
// Draft Board, Final Rosters, Rules
// ============================================================================

pub fn draft_board_text(entries: &[DraftBoardEntry], year: i32) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:=^100}", format!(" Draft Board: {} ", year))?;
    let Some(grid) = board_grid(entries, year) else {
        writeln!(out, "{}", NO_DATA)?;
        return Ok(out);
    };
    for (round, cells) in &grid.rounds {
        banner(&mut out, &format!("Round {}", round), 100)?;
        for (owner, cell) in grid.owners.iter().zip(cells) {
            match cell {
                Some(c) => writeln!(
                    out,
                    "{:<20} {:<40}{} {}",
                    truncate_name(owner, 20),
                    c.text,
                    if c.is_keeper { " [K]" } else { "" },
                    c.rank_line
                )?,
                None => writeln!(out, "{:<20} -", truncate_name(owner, 20))?,
            }
        }
    }
    Ok(out)
}

pub fn final_rosters_text(rows: &[FinalRosterRow], year: i32) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:=^90}", format!(" Final Rosters: {} ", year))?;
    if rows.is_empty() {
        writeln!(out, "No roster data found for this season.")?;
        return Ok(out);
    }
    writeln!(out, "{:<20} {:<24} {:<18} {:<24}", "Owner", "Team", "Player Key", "Player")?;
    writeln!(out, "{:-<90}", "")?;
    for r in rows {
        writeln!(
            out,
            "{:<20} {:<24} {:<18} {:<24}",
            truncate_name(&r.owner, 20),
            truncate_name(&r.team_name, 24),
            r.player_key,
            r.player_name
        )?;
    }
    Ok(out)
}

pub fn rules_text() -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:=^80}", " League Rules ")?;
    for section in LEAGUE_RULES {
        banner(&mut out, section.title, 80)?;
        for item in section.items {
            writeln!(out, "  - {}", item)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 10), "Short");
        assert_eq!(truncate_name("A Very Long Owner Name", 10), "A Very ...");
    }

    #[test]
    fn test_empty_reports_say_no_data() {
        assert!(power_rankings_text(&[]).unwrap().contains("No data"));
        let hof = hall_of_fame_text(&HallOfFame::default()).unwrap();
        assert!(hof.lines().any(|l| l.starts_with("Best Avg Rank") && l.ends_with("No data")));
        assert!(draft_board_text(&[], 2020).unwrap().contains("No data"));
        assert!(final_rosters_text(&[], 2020)
            .unwrap()
            .contains("No roster data"));
    }

    #[test]
    fn test_rank_bar_is_capped() {
        let profile = OwnerProfile {
            owner: "Ann".into(),
            trophies: Default::default(),
            avg_rank: None,
            win_pct: None,
            playoff_pct: None,
            rank_by_year: vec![(2020, 3), (2021, 4_000_000_000)],
            head_to_head: Vec::new(),
            seasons: Vec::new(),
        };
        let text = owner_profile_text(&profile).unwrap();
        let bar = |year: &str| {
            text.lines()
                .find(|l| l.starts_with(year))
                .map(|l| l.matches('#').count())
                .unwrap()
        };
        assert_eq!(bar("2020"), 3);
        assert_eq!(bar("2021"), MAX_RANK_BAR);
    }

    #[test]
    fn test_rules_text_lists_sections() {
        let text = rules_text().unwrap();
        assert!(text.contains(" Keepers "));
        assert!(text.contains("  - Format: FAAB"));
    }

    #[test]
    fn test_write_csv_uses_renamed_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let rows = vec![FinalRosterRow {
            season: Some(2021),
            owner: "Amy".into(),
            team_name: "Aces".into(),
            player_key: "p.1".into(),
            player_name: "Joe".into(),
        }];
        write_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Season,Owner,Team,Player Key,Player\n2021,Amy,Aces,p.1,Joe\n"
        );
    }
}
