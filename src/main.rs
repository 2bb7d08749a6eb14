//! Command-line driver for the team balancer
//!
//! Loads the roster from a file-backed store, runs one engine operation and
//! prints its result. Log output goes to stderr so stdout stays usable in
//! scripts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use team_balancer::balance::{disparity, BalanceStrategy, Balancer};
use team_balancer::config::AppConfig;
use team_balancer::rating::{read_import_file, FileKeyValueStore, RatingStore};
use team_balancer::types::{Individual, MatchAssignment, Team, TEAM_SIZE};
use tracing::{debug, error, info};

/// Team Balancer - ratings and balanced teams for five-versus-five matches
#[derive(Parser)]
#[command(
    name = "team-balancer",
    version,
    about = "Keeps Elo-style ratings and splits ten players into two balanced teams",
    long_about = "Team Balancer tracks a skill rating with a decaying learning rate for every \
                 player, updates it from reported match results, and proposes balanced \
                 five-versus-five teams either by full re-partition or by per-slot swaps."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, value_name = "DIR", help = "Override the roster data directory")]
    data_dir: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add new players with the initial rating
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove a player
    Remove { name: String },
    /// Edit a player's name, rating or learning rate
    Edit {
        name: String,
        #[arg(long)]
        new_name: Option<String>,
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long)]
        learning_rate: Option<f64>,
    },
    /// Reset a player to the initial rating and learning rate
    Reset { name: String },
    /// Reset every rating, keeping learning rates
    ResetAll,
    /// Print the ranking
    List,
    /// Print win probabilities of two teams
    Odds {
        #[arg(long, value_parser = parse_team, help = "Comma-separated slots, '-' for empty")]
        first: Team,
        #[arg(long, value_parser = parse_team, help = "Comma-separated slots, '-' for empty")]
        second: Team,
    },
    /// Record a match result
    Report {
        #[arg(long, value_parser = parse_team)]
        winners: Team,
        #[arg(long, value_parser = parse_team)]
        losers: Team,
    },
    /// Propose balanced teams
    Balance {
        #[arg(long, default_value = "hard")]
        strategy: BalanceStrategy,
        #[arg(long, value_parser = parse_team)]
        first: Team,
        #[arg(long, value_parser = parse_team)]
        second: Team,
        /// Seed for reproducible tie-breaking
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write the roster as JSON to a file, or stdout
    Export { path: Option<PathBuf> },
    /// Replace the roster with a JSON document
    Import { path: Option<PathBuf> },
}

/// Parse `a,b,-,d,e` into five slots; missing trailing slots are empty
fn parse_team(value: &str) -> std::result::Result<Team, String> {
    let entries: Vec<&str> = value.split(',').map(str::trim).collect();
    if entries.len() > TEAM_SIZE {
        return Err(format!(
            "A team has {} slots, got {}",
            TEAM_SIZE,
            entries.len()
        ));
    }

    let mut team = Team::empty();
    for (slot, entry) in entries.into_iter().enumerate() {
        if entry != "-" {
            team.set_slot(slot, Some(entry.to_string()));
        }
    }
    Ok(team)
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    team_balancer::config::validate_config(&config)?;
    Ok(config)
}

fn run(command: Command, config: &AppConfig) -> Result<()> {
    let storage = FileKeyValueStore::open(&config.storage.data_dir)?;
    debug!(
        "{} using roster {} in {}",
        config.service.name,
        config.storage.roster_key,
        storage.dir().display()
    );
    let mut store = RatingStore::load(
        storage,
        config.storage.roster_key.clone(),
        config.rating.clone(),
    )?;

    match command {
        Command::Add { names } => {
            for name in names {
                if store.add_individual(&name)? {
                    println!("Added {}", name);
                } else {
                    println!("{} already exists", name);
                }
            }
        }
        Command::Remove { name } => {
            if store.remove_individual(&name)? {
                println!("Removed {}", name);
            }
        }
        Command::Edit {
            name,
            new_name,
            rating,
            learning_rate,
        } => {
            let current = store
                .get(&name)
                .cloned()
                .ok_or_else(|| team_balancer::EngineError::IndividualNotFound { name: name.clone() })?;
            let record = Individual {
                name: new_name.unwrap_or(current.name),
                rating: rating.unwrap_or(current.rating),
                learning_rate: learning_rate.unwrap_or(current.learning_rate),
            };
            store.update_individual(&name, record)?;
        }
        Command::Reset { name } => {
            if store.reset_individual(&name)? {
                println!("Reset {}", name);
            }
        }
        Command::ResetAll => store.reset_all_ratings()?,
        Command::List => println!("{}", store.ranked_list()),
        Command::Odds { first, second } => {
            let probability = store.win_probability(&first, &second)?;
            println!("First: {:.0}%", probability * 100.0);
            println!("Second: {:.0}%", (1.0 - probability) * 100.0);
        }
        Command::Report { winners, losers } => {
            let result = store.report_result(&winners, &losers)?;
            for change in result.rating_changes {
                println!(
                    "{}: {:.0} -> {:.0} ({:+.1})",
                    change.name,
                    change.old_rating,
                    change.new_rating,
                    change.rating_delta()
                );
            }
        }
        Command::Balance {
            strategy,
            first,
            second,
            seed,
        } => {
            let mut balancer = match seed {
                Some(seed) => Balancer::seeded(seed),
                None => Balancer::from_entropy(),
            };
            let assignment = MatchAssignment::new(first, second);
            let balanced = balancer.balance(strategy, &store, &assignment)?;
            let gap = disparity(&store, &balanced.first, &balanced.second)?;

            info!("{} balance finished with disparity {:.1}", strategy, gap);
            println!("{}", balanced);
            println!("\nDisparity: {:.0}", gap);
        }
        Command::Export { path } => {
            let document = store.export_json()?;
            match path {
                Some(path) => {
                    std::fs::write(&path, document)?;
                    println!("Exported {} players to {}", store.len(), path.display());
                }
                None => println!("{}", document),
            }
        }
        Command::Import { path } => {
            let text = read_import_file(path.as_deref())?;
            let count = store.import_json(&text)?;
            println!("Imported {} players", count);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args.command, &config) {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}
