//! Excel export of the league-wide reports.
//!
//! Produces a workbook with Summary, Power Rankings, Champs & Chumps,
//! Standings (latest season) and Draft Board sheets.

use crate::config::LeagueRules;
use crate::draft_board::draft_board;
use crate::hall_of_fame::champs_and_chumps;
use crate::join;
use crate::power_rankings::power_rankings;
use crate::schema::League;
use crate::season::{standings, SeasonContext};
use anyhow::{Context, Result};
use rust_xlsxwriter::{
    ConditionalFormatText, ConditionalFormatTextRule, Format, FormatAlign, Workbook, Worksheet,
};
use std::path::Path;

enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

impl From<Option<String>> for Cell {
    fn from(v: Option<String>) -> Self {
        v.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

/// Header row, data rows, column widths and an autofilter over the table.
fn write_table(
    sheet: &mut Worksheet,
    headers: &[&str],
    widths: &[f64],
    rows: Vec<Vec<Cell>>,
    header_fmt: &Format,
) -> Result<()> {
    for (c, h) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, *h, header_fmt)?;
    }
    let num_rows = rows.len() as u32;
    for (i, cells) in rows.into_iter().enumerate() {
        let row = (i + 1) as u32;
        for (c, cell) in cells.into_iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(row, c as u16, s)?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row, c as u16, n)?;
                }
                Cell::Empty => {}
            }
        }
    }
    for (c, w) in widths.iter().enumerate() {
        sheet.set_column_width(c as u16, *w)?;
    }
    if num_rows > 0 && !headers.is_empty() {
        sheet.autofilter(0, 0, num_rows, (headers.len() - 1) as u16)?;
        sheet.set_freeze_panes(1, 0)?;
    }
    Ok(())
}

/// Write the league workbook to `output`. Returns a one-line summary.
pub fn package_workbook(league: &League, rules: &LeagueRules, output: &Path) -> Result<String> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let left_fmt = Format::new().set_align(FormatAlign::Left);
    let keeper_fill = Format::new().set_background_color("#FFF2CC");

    let seasons = join::seasons(&league.teams);
    let rankings = power_rankings(&league.teams, rules, false);
    let champs = champs_and_chumps(
        &league
            .teams
            .iter()
            .filter(|t| t.is_finished)
            .cloned()
            .collect::<Vec<_>>(),
    );
    let board = draft_board(league);

    // ---------------------------------------------------------------
    // Summary sheet
    // ---------------------------------------------------------------
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        let title_fmt = Format::new().set_bold().set_font_size(16);
        sheet.write_string_with_format(0, 0, "League Dashboard Export", &title_fmt)?;

        let span = match (seasons.first(), seasons.last()) {
            (Some(first), Some(last)) => format!("{} - {}", first, last),
            _ => "(none)".to_string(),
        };
        let excluded = rules
            .excluded_playoff_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "(none)".to_string());
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
        let lines = [
            ("Package Date", now),
            ("Seasons", span),
            ("Owners", join::owners(&league.teams).len().to_string()),
            ("Team-Seasons", league.teams.len().to_string()),
            ("Matchup Rows", league.matchups.len().to_string()),
            ("Player-Week Rows", league.players.len().to_string()),
            ("Draft Picks", league.draft_picks.len().to_string()),
            ("Excluded Playoff Year", excluded),
        ];
        for (i, (label, value)) in lines.iter().enumerate() {
            let row = (i + 2) as u32;
            sheet.write_string_with_format(row, 0, *label, &bold)?;
            sheet.write_string_with_format(row, 1, value, &left_fmt)?;
        }
        sheet.set_column_width(0, 24)?;
        sheet.set_column_width(1, 28)?;
    }

    // ---------------------------------------------------------------
    // Power Rankings
    // ---------------------------------------------------------------
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Power Rankings")?;
        let rows = rankings
            .iter()
            .map(|r| {
                vec![
                    Cell::Number(r.power_rank as f64),
                    Cell::Text(r.owner.clone()),
                    Cell::Number(r.seasons_played as f64),
                    Cell::Number(r.avg_rank),
                    r.win_pct.into(),
                    r.playoff_pct.into(),
                    Cell::Number(r.championships as f64),
                    Cell::Number(r.runner_ups as f64),
                    Cell::Number(r.losers as f64),
                    Cell::Number(r.power_score),
                ]
            })
            .collect();
        write_table(
            sheet,
            &[
                "Power Ranking",
                "Owner",
                "Seasons Played",
                "Avg Regular Season Rank",
                "Win %",
                "Playoff Appearance %",
                "# Championships",
                "# Runner-Ups",
                "# League Losers",
                "Power Ranking Score",
            ],
            &[14.0, 22.0, 14.0, 22.0, 8.0, 20.0, 16.0, 14.0, 16.0, 20.0],
            rows,
            &bold,
        )?;
    }

    // ---------------------------------------------------------------
    // Champs & Chumps
    // ---------------------------------------------------------------
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Champs & Chumps")?;
        let rows = champs
            .iter()
            .map(|r| {
                vec![
                    Cell::Number(r.year as f64),
                    r.winner.clone().into(),
                    r.runner_up.clone().into(),
                    r.loser.clone().into(),
                ]
            })
            .collect();
        write_table(
            sheet,
            &["Year", "Winner", "Runner-up", "Loser"],
            &[8.0, 22.0, 22.0, 22.0],
            rows,
            &bold,
        )?;
    }

    // ---------------------------------------------------------------
    // Standings of the latest season
    // ---------------------------------------------------------------
    if let Some(&latest) = seasons.last() {
        let ctx = SeasonContext::new(league, latest);
        let sheet = workbook.add_worksheet();
        sheet.set_name(format!("Standings {}", latest))?;
        let rows = standings(&ctx)
            .into_iter()
            .map(|s| {
                vec![
                    Cell::Number(s.rank as f64),
                    Cell::Text(s.owner),
                    Cell::Text(s.team_name),
                    Cell::Text(s.record),
                    Cell::Number(s.points_for),
                    Cell::Number(s.points_against),
                    Cell::Number(s.high_scores as f64),
                    Cell::Number(s.low_scores as f64),
                    Cell::Number(s.waiver_moves as f64),
                    Cell::Number(s.trades as f64),
                    Cell::Number(s.faab_used as f64),
                ]
            })
            .collect();
        write_table(
            sheet,
            &[
                "Rank",
                "Owner",
                "Team",
                "Record",
                "Points For",
                "Points Against",
                "High Scores",
                "Low Scores",
                "Waiver Moves",
                "Trades",
                "FAAB Used",
            ],
            &[6.0, 22.0, 26.0, 8.0, 12.0, 14.0, 12.0, 12.0, 13.0, 8.0, 10.0],
            rows,
            &bold,
        )?;
    }

    // ---------------------------------------------------------------
    // Draft Board
    // ---------------------------------------------------------------
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Draft Board")?;
        let num_rows = board.len() as u32;
        let rows = board
            .iter()
            .map(|e| {
                vec![
                    e.year.map(f64::from).into(),
                    e.pick_num.map(f64::from).into(),
                    e.round_num.map(f64::from).into(),
                    Cell::Text(e.owner.clone()),
                    Cell::Text(e.player_name.clone()),
                    Cell::Text(e.position.clone()),
                    Cell::Text(if e.is_keeper { "Yes" } else { "No" }.to_string()),
                    Cell::Text(e.rank_line()),
                ]
            })
            .collect();
        write_table(
            sheet,
            &["Year", "Pick", "Round", "Owner", "Player", "Position", "Keeper", "Draft/Finish Rank"],
            &[8.0, 6.0, 7.0, 22.0, 26.0, 9.0, 8.0, 34.0],
            rows,
            &bold,
        )?;
        if num_rows > 0 {
            let cf = ConditionalFormatText::new()
                .set_rule(ConditionalFormatTextRule::Contains("Yes".to_string()))
                .set_format(&keeper_fill);
            sheet.add_conditional_format(1, 6, num_rows, 6, &cf)?;
        }
    }

    workbook
        .save(output)
        .with_context(|| format!("Failed to save workbook to {}", output.display()))?;
    log::info!("Saved workbook to {}", output.display());

    Ok(format!(
        "Workbook saved to {} ({} owners ranked, {} seasons, {} draft picks)",
        output.display(),
        rankings.len(),
        seasons.len(),
        board.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TeamSeason;

    #[test]
    fn test_package_workbook_writes_file() {
        let league = League {
            teams: vec![TeamSeason {
                team_key: "t1".into(),
                owner_name: Some("Amy".into()),
                year: Some(2021),
                regular_season_ranking: Some(1),
                is_finished: true,
                wins: Some(9),
                losses: Some(5),
                ..Default::default()
            }],
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("league.xlsx");
        let summary = package_workbook(&league, &LeagueRules::default(), &out).unwrap();
        assert!(out.exists());
        assert!(summary.contains("1 owners ranked"));
    }
}
