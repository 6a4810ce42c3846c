//! Fantasy League Dashboard - Graphical User Interface
//!
//! Tabbed desktop view over one league: pick an export folder (or paste the
//! published CSV links), load, then browse standings, Hall of Fame, owner and
//! team pages, season insights, draft board, final rosters and the rules.

use fantasy_league_dashboard::config::{DashboardConfig, LeagueRules, SourceConfig};
use fantasy_league_dashboard::draft_board::{draft_board, draft_years, DraftBoardEntry};
use fantasy_league_dashboard::final_rosters::{
    final_roster_rows, final_roster_years, final_rosters_for, FinalRosterRow,
};
use fantasy_league_dashboard::hall_of_fame::hall_of_fame;
use fantasy_league_dashboard::join;
use fantasy_league_dashboard::owner_profile::owner_profile;
use fantasy_league_dashboard::power_rankings::power_rankings;
use fantasy_league_dashboard::report;
use fantasy_league_dashboard::schema::League;
use fantasy_league_dashboard::season::{season_report, season_years};
use fantasy_league_dashboard::source::{load_league, TableSource};
use fantasy_league_dashboard::team_season::{owner_years, team_season_report};
use fantasy_league_dashboard::workbook::package_workbook;
use iced::widget::{
    button, checkbox, column, container, pick_list, row, rule, scrollable, text, text_input,
};
use iced::{Center, Element, Fill, Task, Theme};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> iced::Result {
    env_logger::init();
    iced::application(App::new, App::update, App::view)
        .theme(App::theme)
        .centered()
        .run()
}

// ============================================================================
// App State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TabId {
    Data,
    Standings,
    HallOfFame,
    Owner,
    Team,
    Season,
    DraftBoard,
    FinalRosters,
    Rules,
}

const REPORT_TABS: [TabId; 7] = [
    TabId::Standings,
    TabId::HallOfFame,
    TabId::Owner,
    TabId::Team,
    TabId::Season,
    TabId::DraftBoard,
    TabId::FinalRosters,
];

const SOURCE_LABELS: [&str; 5] = ["Teams:", "Matchups:", "Players:", "Draft Roster:", "Final Roster:"];

struct App {
    active_tab: TabId,

    // Data tab
    data_folder: String,
    source_inputs: [String; 5],
    excluded_year_input: String,
    top_n_input: String,
    rules: LeagueRules,
    is_loading: bool,
    status_text: String,
    export_status: String,

    league: Option<Arc<League>>,

    // Selectors
    current_only: bool,
    owners: Vec<String>,
    selected_owner: Option<String>,
    team_owner: Option<String>,
    team_years: Vec<i32>,
    team_year: Option<i32>,
    seasons: Vec<i32>,
    season_year: Option<i32>,
    draft_entries: Vec<DraftBoardEntry>,
    draft_years: Vec<i32>,
    draft_year: Option<i32>,
    roster_rows: Option<Vec<FinalRosterRow>>,
    roster_years: Vec<i32>,
    roster_year: Option<i32>,

    /// Rendered text per tab, rebuilt when the league or a selector changes.
    reports: HashMap<TabId, String>,
}

#[derive(Debug, Clone)]
enum Message {
    TabSelected(TabId),

    // Data tab
    BrowseFolder,
    FolderSelected(Option<PathBuf>),
    SourceChanged(usize, String),
    ExcludedYearChanged(String),
    TopNChanged(String),
    LoadLeague,
    LeagueLoaded(Result<Arc<League>, String>),
    BrowseExport,
    ExportSelected(Option<PathBuf>),
    ExportCompleted(Result<String, String>),

    // Report selectors
    CurrentOnlyToggled(bool),
    OwnerSelected(String),
    TeamOwnerSelected(String),
    TeamYearSelected(i32),
    SeasonSelected(i32),
    DraftYearSelected(i32),
    RosterYearSelected(i32),
}

impl App {
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn new() -> (Self, Task<Message>) {
        let config = DashboardConfig::load();
        let source_inputs = source_inputs(&config.sources);
        let excluded_year_input = config
            .rules
            .excluded_playoff_year
            .map(|y| y.to_string())
            .unwrap_or_default();

        let mut reports = HashMap::new();
        reports.insert(
            TabId::Rules,
            report::rules_text().unwrap_or_else(|e| format!("Error: {}", e)),
        );

        let app = App {
            active_tab: TabId::Data,
            data_folder: String::new(),
            source_inputs,
            excluded_year_input,
            top_n_input: config.rules.top_n.to_string(),
            rules: config.rules,
            is_loading: false,
            status_text: String::new(),
            export_status: String::new(),
            league: None,
            current_only: true,
            owners: Vec::new(),
            selected_owner: None,
            team_owner: None,
            team_years: Vec::new(),
            team_year: None,
            seasons: Vec::new(),
            season_year: None,
            draft_entries: Vec::new(),
            draft_years: Vec::new(),
            draft_year: None,
            roster_rows: None,
            roster_years: Vec::new(),
            roster_year: None,
            reports,
        };

        // Reopen the last league when its sources were remembered.
        let task = if config.sources.is_complete() {
            Task::done(Message::LoadLeague)
        } else {
            Task::none()
        };
        (app, task)
    }

    fn sources(&self) -> SourceConfig {
        let parse = |s: &String| {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(TableSource::parse(s))
            }
        };
        SourceConfig {
            teams: parse(&self.source_inputs[0]),
            matchups: parse(&self.source_inputs[1]),
            players: parse(&self.source_inputs[2]),
            draft_roster: parse(&self.source_inputs[3]),
            final_roster: parse(&self.source_inputs[4]),
        }
    }

    /// Reset every selector to the newest season / first owner of the loaded league.
    fn reset_selectors(&mut self) {
        let Some(league) = self.league.clone() else {
            return;
        };
        self.owners = join::owners(&league.teams);
        self.selected_owner = self.owners.first().cloned();
        self.team_owner = self.owners.first().cloned();
        self.update_team_years();
        self.seasons = season_years(&league);
        self.season_year = self.seasons.first().copied();
        self.draft_entries = draft_board(&league);
        self.draft_years = draft_years(&self.draft_entries);
        self.draft_year = self.draft_years.first().copied();
        self.roster_rows = final_roster_rows(&league);
        self.roster_years = self
            .roster_rows
            .as_deref()
            .map(final_roster_years)
            .unwrap_or_default();
        self.roster_year = self.roster_years.first().copied();
    }

    fn update_team_years(&mut self) {
        let (Some(league), Some(owner)) = (&self.league, &self.team_owner) else {
            self.team_years.clear();
            self.team_year = None;
            return;
        };
        self.team_years = owner_years(league, owner, &self.rules);
        self.team_year = self.team_years.first().copied();
    }

    fn refresh_all(&mut self) {
        for tab in REPORT_TABS {
            self.refresh(tab);
        }
    }

    /// Re-render one report tab from the loaded league and current selectors.
    fn refresh(&mut self, tab: TabId) {
        let Some(league) = self.league.clone() else {
            return;
        };
        let league = league.as_ref();
        let rendered = match tab {
            TabId::Data | TabId::Rules => return,
            TabId::Standings => report::power_rankings_text(&power_rankings(
                &league.teams,
                &self.rules,
                self.current_only,
            )),
            TabId::HallOfFame => report::hall_of_fame_text(&hall_of_fame(league, &self.rules)),
            TabId::Owner => match &self.selected_owner {
                Some(owner) => {
                    report::owner_profile_text(&owner_profile(league, owner, &self.rules))
                }
                None => Ok("Select an owner.".to_string()),
            },
            TabId::Team => match (&self.team_owner, self.team_year) {
                (Some(owner), Some(year)) => match team_season_report(league, owner, year) {
                    Some(r) => report::team_season_text(&r),
                    None => Ok(format!("No data for {} in {}.", owner, year)),
                },
                _ => Ok("Select an owner and a season.".to_string()),
            },
            TabId::Season => match self.season_year {
                Some(year) => match season_report(league, year, &self.rules) {
                    Some(r) => report::season_text(&r),
                    None => Ok(format!("No data for season {}.", year)),
                },
                None => Ok("No seasons found.".to_string()),
            },
            TabId::DraftBoard => match self.draft_year {
                Some(year) => report::draft_board_text(&self.draft_entries, year),
                None => Ok("No draft data found.".to_string()),
            },
            TabId::FinalRosters => match (&self.roster_rows, self.roster_year) {
                (None, _) => Ok("No final roster data provided.".to_string()),
                (Some(rows), Some(year)) => {
                    report::final_rosters_text(&final_rosters_for(rows, year), year)
                }
                (Some(_), None) => Ok("No roster data found for this season.".to_string()),
            },
        };
        self.reports
            .insert(tab, rendered.unwrap_or_else(|e| format!("Error: {}", e)));
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // -- Tab navigation --
            Message::TabSelected(tab) => {
                self.active_tab = tab;
                Task::none()
            }

            // -- Data sources --
            Message::BrowseFolder => Task::perform(
                async {
                    let folder = rfd::AsyncFileDialog::new()
                        .set_title("Select league export folder")
                        .pick_folder()
                        .await;
                    folder.map(|f| f.path().to_path_buf())
                },
                Message::FolderSelected,
            ),

            Message::FolderSelected(path) => {
                if let Some(p) = path {
                    self.data_folder = p.display().to_string();
                    let found = SourceConfig::from_data_dir(&p);
                    self.source_inputs = source_inputs(&found);
                    self.status_text = if found.is_complete() {
                        "Export files found. Press Load League.".to_string()
                    } else {
                        "Folder is missing teams.csv, matchups.csv or players.csv".to_string()
                    };
                }
                Task::none()
            }

            Message::SourceChanged(i, v) => {
                if let Some(slot) = self.source_inputs.get_mut(i) {
                    *slot = v;
                }
                Task::none()
            }

            Message::ExcludedYearChanged(v) => {
                let trimmed = v.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                    self.rules = self.rules.clone().with_excluded_year(None);
                } else if let Ok(year) = trimmed.parse() {
                    self.rules = self.rules.clone().with_excluded_year(Some(year));
                }
                self.excluded_year_input = v;
                self.update_team_years();
                self.refresh_all();
                Task::none()
            }

            Message::TopNChanged(v) => {
                if let Ok(n) = v.trim().parse::<usize>() {
                    if n > 0 {
                        self.rules = self.rules.clone().with_top_n(n);
                        self.refresh(TabId::Season);
                    }
                }
                self.top_n_input = v;
                Task::none()
            }

            Message::LoadLeague => {
                let sources = self.sources();
                if !sources.is_complete() {
                    self.status_text =
                        "Teams, matchups and players sources are required".to_string();
                    return Task::none();
                }
                self.is_loading = true;
                self.status_text = "Loading league...".to_string();
                let rules = self.rules.clone();
                Task::perform(
                    async move {
                        // Blocking HTTP client runs off the async executor.
                        let to_load = sources.clone();
                        let league = std::thread::spawn(move || load_league(&to_load))
                            .join()
                            .map_err(|_| "League loader panicked".to_string())?
                            .map_err(|e| format!("{:#}", e))?;
                        let config = DashboardConfig { sources, rules };
                        if let Err(e) = config.save() {
                            log::warn!("Could not save config: {}", e);
                        }
                        Ok(Arc::new(league))
                    },
                    Message::LeagueLoaded,
                )
            }

            Message::LeagueLoaded(result) => {
                self.is_loading = false;
                match result {
                    Ok(league) => {
                        self.status_text = format!(
                            "Loaded {} team-seasons, {} matchup rows, {} player-week rows, {} draft picks",
                            league.teams.len(),
                            league.matchups.len(),
                            league.players.len(),
                            league.draft_picks.len()
                        );
                        self.league = Some(league);
                        self.reset_selectors();
                        self.refresh_all();
                        self.active_tab = TabId::Standings;
                    }
                    Err(e) => {
                        self.status_text = format!("Error: {}", e);
                    }
                }
                Task::none()
            }

            // -- Export --
            Message::BrowseExport => Task::perform(
                async {
                    let file = rfd::AsyncFileDialog::new()
                        .set_title("Save league workbook")
                        .add_filter("Excel files", &["xlsx"])
                        .set_file_name("league.xlsx")
                        .save_file()
                        .await;
                    file.map(|f| f.path().to_path_buf())
                },
                Message::ExportSelected,
            ),

            Message::ExportSelected(path) => {
                let (Some(path), Some(league)) = (path, self.league.clone()) else {
                    return Task::none();
                };
                let rules = self.rules.clone();
                self.export_status = "Packaging workbook...".to_string();
                Task::perform(
                    async move { package_workbook(&league, &rules, &path).map_err(|e| e.to_string()) },
                    Message::ExportCompleted,
                )
            }

            Message::ExportCompleted(result) => {
                self.export_status = match result {
                    Ok(s) => s,
                    Err(e) => format!("Error: {}", e),
                };
                Task::none()
            }

            // -- Selectors --
            Message::CurrentOnlyToggled(v) => {
                self.current_only = v;
                self.refresh(TabId::Standings);
                Task::none()
            }
            Message::OwnerSelected(owner) => {
                self.selected_owner = Some(owner);
                self.refresh(TabId::Owner);
                Task::none()
            }
            Message::TeamOwnerSelected(owner) => {
                self.team_owner = Some(owner);
                self.update_team_years();
                self.refresh(TabId::Team);
                Task::none()
            }
            Message::TeamYearSelected(year) => {
                self.team_year = Some(year);
                self.refresh(TabId::Team);
                Task::none()
            }
            Message::SeasonSelected(year) => {
                self.season_year = Some(year);
                self.refresh(TabId::Season);
                Task::none()
            }
            Message::DraftYearSelected(year) => {
                self.draft_year = Some(year);
                self.refresh(TabId::DraftBoard);
                Task::none()
            }
            Message::RosterYearSelected(year) => {
                self.roster_year = Some(year);
                self.refresh(TabId::FinalRosters);
                Task::none()
            }
        }
    }
}

// ============================================================================
// View
// ============================================================================

impl App {
    fn view(&self) -> Element<'_, Message> {
        let tab_bar = row![
            tab_button("Data", TabId::Data, self.active_tab),
            tab_button("League Standings", TabId::Standings, self.active_tab),
            tab_button("Hall of Fame", TabId::HallOfFame, self.active_tab),
            tab_button("Owner", TabId::Owner, self.active_tab),
            tab_button("Team", TabId::Team, self.active_tab),
            tab_button("Season", TabId::Season, self.active_tab),
            tab_button("Draft Board", TabId::DraftBoard, self.active_tab),
            tab_button("Final Rosters", TabId::FinalRosters, self.active_tab),
            tab_button("League Rules", TabId::Rules, self.active_tab),
        ]
        .spacing(4);

        let content: Element<'_, Message> = match self.active_tab {
            TabId::Data => self.view_data_tab(),
            TabId::Rules => self.report_view(TabId::Rules),
            _ if self.league.is_none() => {
                text("Load a league on the Data tab first.").size(14).into()
            }
            TabId::Standings => column![
                checkbox(self.current_only)
                    .label("Current owners only")
                    .on_toggle(Message::CurrentOnlyToggled),
                self.report_view(TabId::Standings),
            ]
            .spacing(12)
            .into(),
            TabId::HallOfFame => self.report_view(TabId::HallOfFame),
            TabId::Owner => column![
                selector(
                    "Owner:",
                    pick_list(
                        self.owners.as_slice(),
                        self.selected_owner.as_ref(),
                        Message::OwnerSelected
                    )
                    .into()
                ),
                self.report_view(TabId::Owner),
            ]
            .spacing(12)
            .into(),
            TabId::Team => column![
                row![
                    selector(
                        "Owner:",
                        pick_list(
                            self.owners.as_slice(),
                            self.team_owner.as_ref(),
                            Message::TeamOwnerSelected
                        )
                        .into()
                    ),
                    selector(
                        "Season:",
                        pick_list(
                            self.team_years.as_slice(),
                            self.team_year,
                            Message::TeamYearSelected
                        )
                        .into()
                    ),
                ]
                .spacing(20),
                self.report_view(TabId::Team),
            ]
            .spacing(12)
            .into(),
            TabId::Season => column![
                selector(
                    "Season:",
                    pick_list(
                        self.seasons.as_slice(),
                        self.season_year,
                        Message::SeasonSelected
                    )
                    .into()
                ),
                self.report_view(TabId::Season),
            ]
            .spacing(12)
            .into(),
            TabId::DraftBoard => column![
                selector(
                    "Season:",
                    pick_list(
                        self.draft_years.as_slice(),
                        self.draft_year,
                        Message::DraftYearSelected
                    )
                    .into()
                ),
                self.report_view(TabId::DraftBoard),
            ]
            .spacing(12)
            .into(),
            TabId::FinalRosters => column![
                selector(
                    "Season:",
                    pick_list(
                        self.roster_years.as_slice(),
                        self.roster_year,
                        Message::RosterYearSelected
                    )
                    .into()
                ),
                self.report_view(TabId::FinalRosters),
            ]
            .spacing(12)
            .into(),
        };

        let body = container(content).padding(20).width(Fill).height(Fill);

        column![
            container(tab_bar).padding([10, 20]),
            rule::horizontal(1),
            body,
        ]
        .into()
    }

    // -- Data tab --
    fn view_data_tab(&self) -> Element<'_, Message> {
        let title = text("Fantasy League Dashboard").size(28);
        let subtitle = text("All-time standings, records and season insights").size(14);

        let folder_section = column![
            text("Export Folder").size(16),
            row![
                text_input(
                    "Select a folder containing teams.csv, matchups.csv, players.csv...",
                    &self.data_folder
                )
                .width(Fill),
                button(text("Browse").size(13)).on_press(Message::BrowseFolder),
            ]
            .spacing(10)
            .align_y(Center),
        ]
        .spacing(8);

        let mut source_rows: Vec<Element<'_, Message>> = vec![
            rule::horizontal(1).into(),
            text("Tables (file path or published CSV link)").size(16).into(),
        ];
        for (i, label) in SOURCE_LABELS.iter().enumerate() {
            let input = text_input("Not set", &self.source_inputs[i]).on_input_maybe(
                if self.is_loading {
                    None
                } else {
                    Some(move |v| Message::SourceChanged(i, v))
                },
            );
            source_rows.push(
                row![text(*label).width(130), input.width(Fill)]
                    .spacing(10)
                    .align_y(Center)
                    .into(),
            );
        }
        let source_section = column(source_rows).spacing(8);

        let rules_section = column![
            rule::horizontal(1),
            text("League Rules").size(16),
            row![
                text("Excluded playoff year:").width(180),
                text_input("none", &self.excluded_year_input)
                    .on_input(Message::ExcludedYearChanged)
                    .width(80),
                text("Top N lists:").width(100),
                text_input("10", &self.top_n_input)
                    .on_input(Message::TopNChanged)
                    .width(80),
            ]
            .spacing(10)
            .align_y(Center),
        ]
        .spacing(10);

        let mut load_btn = button(text("Load League")).style(button::primary);
        if !self.is_loading {
            load_btn = load_btn.on_press(Message::LoadLeague);
        }
        let mut export_btn = button(text("Export Workbook"));
        if self.league.is_some() && !self.is_loading {
            export_btn = export_btn.on_press(Message::BrowseExport);
        }

        let status = column![
            text(&self.status_text).size(13),
            text(&self.export_status).size(13),
        ]
        .spacing(4);

        column![
            title,
            subtitle,
            folder_section,
            source_section,
            rules_section,
            row![load_btn, export_btn].spacing(10),
            status,
        ]
        .spacing(16)
        .into()
    }

    /// Monospace, scrollable report text for one tab.
    fn report_view(&self, tab: TabId) -> Element<'_, Message> {
        let body = self.reports.get(&tab).map(String::as_str).unwrap_or("");
        scrollable(
            container(text(body).size(12).font(iced::Font::MONOSPACE)).padding(8),
        )
        .width(Fill)
        .height(Fill)
        .into()
    }
}

// ============================================================================
// Helper widgets
// ============================================================================

/// Render a tab button, styled differently when active.
/// Text for the five source inputs, in Data tab order.
fn source_inputs(sources: &SourceConfig) -> [String; 5] {
    let show = |s: &Option<TableSource>| s.as_ref().map(|s| s.to_string()).unwrap_or_default();
    [
        show(&sources.teams),
        show(&sources.matchups),
        show(&sources.players),
        show(&sources.draft_roster),
        show(&sources.final_roster),
    ]
}

fn tab_button(label: &str, tab: TabId, active: TabId) -> Element<'_, Message> {
    let btn = button(text(label).size(14));
    if tab == active {
        btn.style(button::primary).into()
    } else {
        btn.on_press(Message::TabSelected(tab))
            .style(button::secondary)
            .into()
    }
}

/// Label + dropdown row.
fn selector<'a>(label: &'a str, list: Element<'a, Message>) -> Element<'a, Message> {
    row![text(label).width(80), list]
        .spacing(10)
        .align_y(Center)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_fills_inputs_and_keeps_sources() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["teams.csv", "matchups.csv", "players.csv"] {
            std::fs::write(dir.path().join(name), "team_key\n").unwrap();
        }
        let found = SourceConfig::from_data_dir(dir.path());
        let inputs = source_inputs(&found);
        assert!(inputs[0].ends_with("teams.csv"));
        assert!(inputs[2].ends_with("players.csv"));
        assert!(inputs[3].is_empty());
        assert!(inputs[4].is_empty());
        assert!(found.is_complete());
    }
}
