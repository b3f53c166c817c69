use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jobmatch::catalog::{CatalogOptions, load_catalog, postings_with_title};
use jobmatch::config::Config;
use jobmatch::models::{JobPosting, ScoredPosting, UserQuery};
use jobmatch::recommend_with;
use jobmatch::salary::partition_by_salary;

const MIN_SALARY: f64 = 1.0;
const MAX_SALARY: f64 = 50.0;

#[derive(Parser)]
#[command(name = "jobmatch")]
#[command(about = "Match your qualification and skills against a job catalog")]
struct Cli {
    /// Path to the job catalog CSV
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend distinct job roles for a profile
    Recommend {
        /// Your qualification, e.g. "Bachelor in Computer Science"
        #[arg(short, long, default_value = "")]
        qualification: String,

        /// A skill you have (repeatable)
        #[arg(short, long = "skill")]
        skills: Vec<String>,

        /// A programming language you know (repeatable)
        #[arg(short, long = "language")]
        languages: Vec<String>,

        /// Expected salary (LPA), between 1 and 50
        #[arg(long, default_value = "50.0", value_parser = parse_salary)]
        salary: f64,

        /// Also show roles whose minimum salary is above your expectation
        #[arg(long)]
        all: bool,

        /// Number of distinct roles to return
        #[arg(short, long)]
        top: Option<usize>,

        /// Print JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// List the qualifications, skills and languages in the catalog
    Options,

    /// Show every posting for a job title
    Show {
        /// Job title
        title: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend {
            qualification,
            skills,
            languages,
            salary,
            all,
            top,
            json,
        } => {
            let config = Config::resolve(cli.catalog, top)?;
            let catalog = open_catalog(&config)?;

            let options = CatalogOptions::from_catalog(&catalog);
            if !qualification.is_empty() && !options.has_qualification(&qualification) {
                if let Some((closest, _)) = options.closest_qualification(&qualification) {
                    eprintln!(
                        "Qualification '{}' is not in the catalog (closest: '{}').",
                        qualification, closest
                    );
                }
            }

            let query = UserQuery::new(&qualification, &skills, &languages);
            let result = recommend_with(&config.recommend_config(), &query, &catalog);
            let split = partition_by_salary(&result, salary);
            let outcome = split.outcome();
            info!(roles = result.len(), shown = split.shown.len(), "recommendation ready");

            let display: Vec<ScoredPosting> = if all {
                result.entries.clone()
            } else {
                split.shown.clone()
            };

            if json {
                let body = serde_json::json!({
                    "summary": outcome,
                    "message": outcome.to_string(),
                    "recommendations": display,
                    "hidden": if all { 0 } else { split.hidden.len() },
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&body).context("Failed to encode JSON")?
                );
                return Ok(());
            }

            println!("{}", outcome);
            if !all && !split.hidden.is_empty() {
                println!(
                    "{} more role(s) above your expected salary. Re-run with --all to see them.",
                    split.hidden.len()
                );
            }

            if !display.is_empty() {
                println!("\nRecommended Jobs:");
                for (i, entry) in display.iter().enumerate() {
                    print!("{}", format_card(i + 1, entry));
                }
            }
        }

        Commands::Options => {
            let config = Config::resolve(cli.catalog, None)?;
            let catalog = open_catalog(&config)?;
            let options = CatalogOptions::from_catalog(&catalog);

            print_list("Qualifications", &options.qualifications);
            print_list("Skills", &options.skills);
            print_list("Programming Languages", &options.languages);
        }

        Commands::Show { title } => {
            let config = Config::resolve(cli.catalog, None)?;
            let catalog = open_catalog(&config)?;
            let postings = postings_with_title(&catalog, &title);
            if postings.is_empty() {
                println!("No postings titled '{}'.", title);
            } else {
                println!("{:<4} {:<24} {:<30} {:>16}", "#", "COMPANY", "QUALIFICATION", "SALARY");
                println!("{}", "-".repeat(77));
                for (i, job) in postings.iter().enumerate() {
                    println!(
                        "{:<4} {:<24} {:<30} {:>16}",
                        i + 1,
                        truncate(&job.company_name, 22),
                        truncate(&job.qualification, 28),
                        job.salary_range()
                    );
                }
            }
        }
    }

    Ok(())
}

fn open_catalog(config: &Config) -> Result<Vec<JobPosting>> {
    if !config.catalog_path.exists() {
        return Err(anyhow!(
            "Catalog not found at {}. Pass --catalog or set JOBMATCH_CATALOG.",
            config.catalog_path.display()
        ));
    }
    load_catalog(&config.catalog_path)
}

fn format_card(rank: usize, entry: &ScoredPosting) -> String {
    let job = entry.posting;
    let wrap = |label: &str, text: &str| {
        let opts = textwrap::Options::new(72)
            .initial_indent("    ")
            .subsequent_indent("      ");
        textwrap::fill(&format!("{}: {}", label, text), opts)
    };

    let mut card = format!("\n{}. {}  (score {:.3})\n", rank, job.title, entry.score);
    if !job.company_name.is_empty() {
        card.push_str(&format!("    Company: {}\n", job.company_name));
    }
    if !job.company_logo.is_empty() {
        card.push_str(&format!("    Logo: {}\n", job.company_logo));
    }
    card.push_str(&format!("{}\n", wrap("Qualification", &job.qualification)));
    card.push_str(&format!("{}\n", wrap("Required Skills", &job.skills)));
    card.push_str(&format!("{}\n", wrap("Programming Languages", &job.languages)));
    card.push_str(&format!("    Salary: {}\n", job.salary_range()));
    if !job.profile_link.is_empty() {
        card.push_str(&format!("    LinkedIn: {}\n", job.profile_link));
    }
    card
}

fn parse_salary(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !(MIN_SALARY..=MAX_SALARY).contains(&value) {
        return Err(format!(
            "expected salary must be between {} and {} LPA",
            MIN_SALARY, MAX_SALARY
        ));
    }
    Ok(value)
}

fn print_list(heading: &str, values: &[String]) {
    println!("{} ({}):", heading, values.len());
    if values.is_empty() {
        println!("  (none)");
    } else {
        let opts = textwrap::Options::new(80)
            .initial_indent("  ")
            .subsequent_indent("  ");
        println!("{}", textwrap::fill(&values.join(", "), opts));
    }
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
