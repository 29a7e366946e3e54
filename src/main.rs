mod auth;
mod catalog;
mod filter;
mod models;
mod reveal;
mod saved;
mod search;
mod state;
mod storage;
mod theme;
mod timer;
mod tui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use catalog::Catalog;
use filter::{FilterSpec, Selection, compute_visible};
use models::{Category, Choice, JobPosting};
use reveal::{INITIAL_VISIBLE, RevealCursor};
use saved::SavedSet;
use std::fmt::Write as _;
use std::path::PathBuf;
use storage::LocalStorage;

#[derive(Parser)]
#[command(name = "seekjob")]
#[command(about = "SeekJob - browse, search, and bookmark job listings")]
struct Cli {
    /// Directory holding local storage (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive job board (default)
    Browse,

    /// List jobs matching a search
    List(ListArgs),

    /// Show job details
    Show {
        /// Job ID
        id: u32,
    },

    /// Manage the dark-mode preference
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Match against title, tags, and description
    #[arg(short, long, default_value = "")]
    job: String,

    /// Match against company name
    #[arg(short, long, default_value = "")]
    company: String,

    /// Match against location
    #[arg(long, default_value = "")]
    location: String,

    /// Job type (full-time, part-time, contract, remote, internship)
    #[arg(short = 't', long = "type", default_value = "")]
    job_type: String,

    /// Experience level (entry, mid, senior, lead)
    #[arg(long, default_value = "")]
    level: String,

    /// Sort order (relevance, recent, salary); accepted but results keep catalog order
    #[arg(long, default_value = "")]
    sort: String,

    /// Category facet (All, Technology, Design, Management, Remote, Featured)
    #[arg(long, default_value = "All")]
    category: String,

    /// Treat these job IDs as saved
    #[arg(long = "save", value_name = "ID")]
    save: Vec<u32>,

    /// Only show saved jobs
    #[arg(long)]
    saved_only: bool,

    /// Number of jobs to show
    #[arg(short = 'n', long, default_value_t = INITIAL_VISIBLE)]
    limit: usize,

    /// Show every matching job
    #[arg(long)]
    all: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    fn filter(&self) -> FilterSpec {
        FilterSpec {
            job_query: self.job.clone(),
            company_query: self.company.clone(),
            location_query: self.location.clone(),
            job_type: Selection::from_input(&self.job_type),
            level: Selection::from_input(&self.level),
            sort_by: Selection::from_input(&self.sort),
        }
    }

    fn category(&self) -> Selection<Category> {
        Selection::from_input(&self.category)
    }

    fn saved(&self) -> SavedSet {
        self.save.iter().copied().collect()
    }
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Forget the saved theme and follow the terminal
    Reset,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn list_output(catalog: &Catalog, args: &ListArgs) -> Result<String> {
    let saved = args.saved();
    for id in &args.save {
        if catalog.get(*id).is_none() {
            log::warn!("Saved job #{} is not in the catalog", id);
        }
    }

    let category = args.category();
    let visible = compute_visible(catalog, &args.filter(), &category, args.saved_only, &saved);
    log::debug!(
        "{} of {} postings match (category {:?}, saved only {})",
        visible.len(),
        catalog.len(),
        category.as_input(),
        args.saved_only,
    );
    let cursor = if args.all {
        RevealCursor::with_count(visible.len())
    } else {
        RevealCursor::with_count(args.limit)
    };
    let page = cursor.page(&visible);

    if args.json {
        let mut json = serde_json::to_string_pretty(page).context("Failed to encode jobs")?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = String::new();
    if visible.is_empty() {
        writeln!(out, "No jobs found.")?;
        return Ok(out);
    }

    if !page.is_empty() {
        writeln!(
            out,
            "{:<4} {:<2} {:<26} {:<16} {:<20} {:<11} {:>14}",
            "ID", "", "TITLE", "COMPANY", "LOCATION", "TYPE", "SALARY"
        )?;
        writeln!(out, "{}", "-".repeat(99))?;
        for job in page {
            let marker = match (saved.contains(job.id), job.featured) {
                (true, _) => "\u{2665}",
                (false, true) => "\u{2605}",
                (false, false) => "",
            };
            writeln!(
                out,
                "{:<4} {:<2} {:<26} {:<16} {:<20} {:<11} {:>14}",
                job.id,
                marker,
                truncate(&job.title, 26),
                truncate(&job.company, 16),
                truncate(&job.location, 20),
                job.job_type.as_str(),
                job.salary,
            )?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{} opportunities found", visible.len())?;
    if cursor.has_more(visible.len()) {
        writeln!(
            out,
            "{} more not shown (use --limit or --all)",
            visible.len() - page.len()
        )?;
    }
    Ok(out)
}

fn print_job(job: &JobPosting) {
    println!("Job #{}", job.id);
    println!("Title: {}", job.title);
    println!("Company: {}", job.company);
    println!("Location: {}", job.location);
    println!("Type: {}", job.job_type.as_str());
    println!("Level: {}", job.level.label());
    println!("Salary: {} /year", job.salary);
    println!("Posted: {}", job.time);
    if job.featured {
        println!("Featured: yes");
    }
    if !job.tags.is_empty() {
        println!("Tags: {}", job.tags.join(", "));
    }
    println!("\n--- Description ---\n{}", textwrap::fill(&job.desc, 80));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let catalog = Catalog::builtin()?;
    let data_dir = cli.data_dir.as_deref();

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            let storage = LocalStorage::open(data_dir)?;
            log::info!("Using storage at {}", storage.path().display());
            tui::run_board(&catalog, &storage)?;
        }

        Commands::List(args) => print!("{}", list_output(&catalog, &args)?),

        Commands::Show { id } => match catalog.get(id) {
            Some(job) => print_job(job),
            None => println!("Job #{} not found.", id),
        },

        Commands::Theme { command } => {
            let storage = LocalStorage::open(data_dir)?;
            match command {
                ThemeCommands::Show => {
                    let saved = storage.get_item(theme::DARK_MODE_KEY)?.is_some();
                    let dark = theme::load_dark_mode(&storage)?;
                    println!(
                        "Theme: {} ({})",
                        if dark { "dark" } else { "light" },
                        if saved { "saved" } else { "terminal default" }
                    );
                }
                ThemeCommands::Toggle => {
                    let dark = !theme::load_dark_mode(&storage)?;
                    theme::save_dark_mode(&storage, dark)?;
                    println!("Theme set to {}.", if dark { "dark" } else { "light" });
                }
                ThemeCommands::Reset => {
                    if storage.remove_item(theme::DARK_MODE_KEY)? {
                        println!("Saved theme cleared.");
                    } else {
                        println!("No saved theme.");
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use crate::models::{JobType, Level};

    fn parse_list(args: &[&str]) -> ListArgs {
        let argv = ["seekjob", "list"].iter().chain(args).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::List(list)) => list,
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_means_browse() {
        let cli = Cli::try_parse_from(["seekjob", "-vv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_list_args_build_filter() {
        let args = parse_list(&[
            "--job", "react", "--type", "full-time", "--level", "mid", "--sort", "salary",
        ]);
        let filter = args.filter();
        assert_eq!(filter.job_query, "react");
        assert_eq!(filter.job_type, Selection::Only(JobType::FullTime));
        assert_eq!(filter.level, Selection::Only(Level::Mid));
        assert_eq!(args.category(), Selection::Only(Category::All));
        assert_eq!(args.limit, INITIAL_VISIBLE);
    }

    #[test]
    fn test_unknown_list_values_match_nothing() {
        let catalog = Catalog::builtin().unwrap();
        let args = parse_list(&["--type", "freelance"]);
        let visible = compute_visible(
            &catalog,
            &args.filter(),
            &args.category(),
            args.saved_only,
            &args.saved(),
        );
        assert!(visible.is_empty());

        let args = parse_list(&["--category", "Sales"]);
        assert_eq!(args.category(), Selection::Unrecognized("Sales".to_string()));
    }

    #[test]
    fn test_saved_ids_collected() {
        let args = parse_list(&["--save", "3", "--save", "9", "--saved-only"]);
        let saved = args.saved();
        assert!(args.saved_only);
        assert!(saved.contains(3) && saved.contains(9));
        assert_eq!(saved.len(), 2);
    }

    #[test]
    fn test_zero_limit_still_reports_matches() {
        let catalog = Catalog::builtin().unwrap();
        let out = list_output(&catalog, &parse_list(&["--limit", "0"])).unwrap();
        assert!(!out.contains("No jobs found."));
        assert!(!out.contains("TITLE"));
        assert!(out.contains("12 opportunities found"));
        assert!(out.contains("12 more not shown"));
    }

    #[test]
    fn test_list_output_table_and_empty_result() {
        let catalog = Catalog::builtin().unwrap();
        let out = list_output(&catalog, &parse_list(&["--save", "10"])).unwrap();
        assert!(out.contains("Web Developer"));
        assert!(!out.contains("React Developer"));
        assert!(out.contains("12 opportunities found"));
        assert!(out.contains("4 more not shown"));

        let out = list_output(&catalog, &parse_list(&["--all", "--job", "python"])).unwrap();
        assert!(out.contains("Software Engineer") && out.contains("Data Scientist"));
        assert!(!out.contains("more not shown"));

        let out = list_output(&catalog, &parse_list(&["--saved-only"])).unwrap();
        assert_eq!(out, "No jobs found.\n");
    }

    #[test]
    fn test_list_output_json_page() {
        let catalog = Catalog::builtin().unwrap();
        let out = list_output(&catalog, &parse_list(&["--json", "--type", "remote"])).unwrap();
        let jobs: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["type"], "remote");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        // Multi-byte characters must not be split
        assert_eq!(truncate("₹₹₹₹₹₹₹₹", 6), "₹₹₹...");
    }
}
