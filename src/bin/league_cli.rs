//! League CLI - print dashboard reports and export them
//!
//! Loads the league tables from a data folder, individual files or published
//! spreadsheet URLs, then prints one report as text. Most reports can also be
//! written as CSV with `--output`; `export` packages an Excel workbook.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fantasy_league_dashboard::config::{DashboardConfig, LeagueRules, SourceConfig};
use fantasy_league_dashboard::draft_board::{draft_board, draft_years};
use fantasy_league_dashboard::final_rosters::{final_roster_rows, final_roster_years, final_rosters_for};
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
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "league-cli")]
#[command(about = "Fantasy league statistics from published spreadsheet exports")]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Folder holding teams.csv, matchups.csv, players.csv, draft_roster.csv, final_roster.csv
    #[arg(short, long, env = "LEAGUE_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Teams table (file path or CSV URL)
    #[arg(long, env = "LEAGUE_TEAMS", global = true)]
    teams: Option<String>,

    /// Matchups table (file path or CSV URL)
    #[arg(long, env = "LEAGUE_MATCHUPS", global = true)]
    matchups: Option<String>,

    /// Players table (file path or CSV URL)
    #[arg(long, env = "LEAGUE_PLAYERS", global = true)]
    players: Option<String>,

    /// Draft roster table (file path or CSV URL)
    #[arg(long, env = "LEAGUE_DRAFT_ROSTER", global = true)]
    draft_roster: Option<String>,

    /// Final roster table (file path or CSV URL)
    #[arg(long, env = "LEAGUE_FINAL_ROSTER", global = true)]
    final_roster: Option<String>,

    /// Season left out of playoff % and owner averages ("none" to disable)
    #[arg(long, global = true)]
    excluded_year: Option<String>,

    /// Length of top-player and top-performance lists
    #[arg(long, global = true)]
    top_n: Option<usize>,

    /// Remember the resolved sources in ~/.league-dashboard.conf
    #[arg(long, global = true)]
    save_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// All-time power rankings (League Standings)
    PowerRankings {
        /// Include owners without a team in the latest season
        #[arg(long)]
        all_owners: bool,

        /// Write the table as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Hall of Fame / Hall of Shame
    HallOfFame {
        /// Write Champs & Chumps as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Career view of one owner; lists owners when none is given
    Owner {
        /// Owner name as it appears in the teams table
        name: Option<String>,

        /// Write the head-to-head table as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// One owner's team in one season
    Team {
        /// Owner name
        owner: String,

        /// Season (defaults to the owner's most recent)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Season insights
    Season {
        /// Season (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,

        /// Write the standings as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Draft board with draft vs finish ranks
    DraftBoard {
        /// Season (defaults to the most recent draft)
        #[arg(short, long)]
        year: Option<i32>,

        /// Write every pick of the season as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// End-of-season rosters
    FinalRosters {
        /// Season (defaults to the most recent)
        #[arg(short, long)]
        year: Option<i32>,

        /// Write the season's rosters as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// League constitution
    Rules,

    /// Package the league-wide reports into an Excel workbook
    Export {
        /// Output .xlsx path
        #[arg(short, long, default_value = "league.xlsx")]
        output: PathBuf,
    },
}

/// Explicit flags win over the data folder, which wins over the config file.
fn resolve(args: &SourceArgs) -> Result<(SourceConfig, LeagueRules)> {
    let file = DashboardConfig::load();
    let explicit = SourceConfig {
        teams: args.teams.as_deref().map(TableSource::parse),
        matchups: args.matchups.as_deref().map(TableSource::parse),
        players: args.players.as_deref().map(TableSource::parse),
        draft_roster: args.draft_roster.as_deref().map(TableSource::parse),
        final_roster: args.final_roster.as_deref().map(TableSource::parse),
    };
    let from_dir = args
        .data_dir
        .as_deref()
        .map(SourceConfig::from_data_dir)
        .unwrap_or_default();
    let sources = explicit.or(from_dir).or(file.sources);

    let mut rules = file.rules;
    if let Some(value) = &args.excluded_year {
        let year = if value.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(
                value
                    .parse()
                    .with_context(|| format!("Invalid --excluded-year '{}'", value))?,
            )
        };
        rules = rules.with_excluded_year(year);
    }
    if let Some(n) = args.top_n {
        rules = rules.with_top_n(n);
    }

    if args.save_config {
        let config = DashboardConfig {
            sources: sources.clone(),
            rules: rules.clone(),
        };
        config.save()?;
        log::info!("Saved sources to the config file");
    }
    Ok((sources, rules))
}

fn latest(years: &[i32]) -> Result<i32> {
    years
        .iter()
        .copied()
        .max()
        .ok_or_else(|| anyhow::anyhow!("No seasons found in the league data"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Commands::Rules = cli.command {
        print!("{}", report::rules_text()?);
        return Ok(());
    }

    let (sources, rules) = resolve(&cli.source)?;
    if !sources.is_complete() {
        anyhow::bail!(
            "Teams, matchups and players sources are required (use --data-dir or the per-table flags)"
        );
    }
    let league = load_league(&sources)?;

    run(cli.command, &league, &rules)
}

fn run(command: Commands, league: &League, rules: &LeagueRules) -> Result<()> {
    match command {
        Commands::PowerRankings { all_owners, output } => {
            let rows = power_rankings(&league.teams, rules, !all_owners);
            print!("{}", report::power_rankings_text(&rows)?);
            if let Some(path) = output {
                report::write_csv(&path, &rows)?;
            }
        }
        Commands::HallOfFame { output } => {
            let hof = hall_of_fame(league, rules);
            print!("{}", report::hall_of_fame_text(&hof)?);
            if let Some(path) = output {
                report::write_csv(&path, &hof.champs_and_chumps)?;
            }
        }
        Commands::Owner { name, output } => {
            let Some(name) = name else {
                for owner in join::owners(&league.teams) {
                    println!("{}", owner);
                }
                return Ok(());
            };
            if !join::owners(&league.teams).contains(&name) {
                anyhow::bail!("Owner '{}' not found", name);
            }
            let profile = owner_profile(league, &name, rules);
            print!("{}", report::owner_profile_text(&profile)?);
            if let Some(path) = output {
                report::write_csv(&path, &profile.head_to_head)?;
            }
        }
        Commands::Team { owner, year } => {
            let year = match year {
                Some(y) => y,
                None => latest(&owner_years(league, &owner, rules))?,
            };
            match team_season_report(league, &owner, year) {
                Some(r) => print!("{}", report::team_season_text(&r)?),
                None => println!("No data for {} in {}", owner, year),
            }
        }
        Commands::Season { year, output } => {
            let year = match year {
                Some(y) => y,
                None => latest(&season_years(league))?,
            };
            match season_report(league, year, rules) {
                Some(r) => {
                    print!("{}", report::season_text(&r)?);
                    if let Some(path) = output {
                        report::write_csv(&path, &r.standings)?;
                    }
                }
                None => println!("No data for season {}", year),
            }
        }
        Commands::DraftBoard { year, output } => {
            let entries = draft_board(league);
            let year = match year {
                Some(y) => y,
                None => latest(&draft_years(&entries))?,
            };
            print!("{}", report::draft_board_text(&entries, year)?);
            if let Some(path) = output {
                let season: Vec<_> = entries.into_iter().filter(|e| e.year == Some(year)).collect();
                report::write_csv(&path, &season)?;
            }
        }
        Commands::FinalRosters { year, output } => {
            let Some(rows) = final_roster_rows(league) else {
                println!("No final roster data provided.");
                return Ok(());
            };
            let year = match year {
                Some(y) => y,
                None => latest(&final_roster_years(&rows))?,
            };
            let season = final_rosters_for(&rows, year);
            print!("{}", report::final_rosters_text(&season, year)?);
            if let Some(path) = output {
                report::write_csv(&path, &season)?;
            }
        }
        Commands::Export { output } => {
            println!("{}", package_workbook(league, rules, &output)?);
        }
        Commands::Rules => print!("{}", report::rules_text()?),
    }
    Ok(())
}
