//! Tight 5 CLI - Joke library and writing assistant from the terminal

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::{Input, Password};

use api::{CreateJokeRequest, JokeQuery, Tight5Client};
use config::Config;

#[derive(Parser)]
#[command(name = "tight5")]
#[command(about = "Tight 5 CLI - Write, sort and rehearse your set", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
        /// Server URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Show or change configuration
    Config {
        /// Set the server URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Joke library
    Jokes {
        #[command(subcommand)]
        action: JokeAction,
    },

    /// Routines
    Routines {
        #[command(subcommand)]
        action: RoutineAction,
    },

    /// Ask the assistant for setups or punchlines
    Generate {
        kind: GenerateKind,
        /// Premise for setups, setup for punchlines
        text: String,
    },

    /// Structure templates
    Structures {
        #[command(subcommand)]
        action: StructureAction,
    },
}

#[derive(Subcommand)]
enum JokeAction {
    /// List jokes
    List {
        /// Comma-separated statuses (draft, working, polished, retired)
        #[arg(short, long)]
        status: Option<String>,
        /// Text search
        #[arg(short = 'q', long)]
        search: Option<String>,
        /// createdAt, updatedAt, title, estimatedTime, performanceRating
        #[arg(long)]
        sort: Option<String>,
        /// Sort ascending
        #[arg(long)]
        asc: bool,
    },
    /// Add a joke (prompts for anything not given)
    Add {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(long)]
        setup: Option<String>,
        #[arg(long)]
        punchline: Option<String>,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Estimated delivery time in seconds
        #[arg(long)]
        time: Option<u32>,
    },
}

#[derive(Subcommand)]
enum RoutineAction {
    /// List routines
    List,
}

#[derive(Subcommand)]
enum StructureAction {
    /// List structure templates
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GenerateKind {
    Setup,
    Punchline,
}

impl GenerateKind {
    fn as_str(&self) -> &'static str {
        match self {
            GenerateKind::Setup => "setup",
            GenerateKind::Punchline => "punchline",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key, url } => cmd_login(key, url).await,
        Commands::Config { base_url } => cmd_config(base_url),
        Commands::Jokes { action } => cmd_jokes(action).await,
        Commands::Routines { action } => cmd_routines(action).await,
        Commands::Generate { kind, text } => cmd_generate(kind, text).await,
        Commands::Structures { action } => cmd_structures(action).await,
    }
}

fn client(config: &Config) -> Tight5Client {
    Tight5Client::new(&config.base_url, config.api_key.as_deref())
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = url {
        config.set_base_url(&url);
    }

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = Tight5Client::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.verify_key().await {
        Ok(()) => println!("{}", "OK".green()),
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not log in to {}: {}", config.base_url, e);
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

fn cmd_config(base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = base_url {
        config.set_base_url(&url);
        config.save()?;
        println!("{} Base URL set to {}", "✓".green(), config.base_url);
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );

    Ok(())
}

async fn cmd_jokes(action: JokeAction) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    match action {
        JokeAction::List {
            status,
            search,
            sort,
            asc,
        } => {
            let query = JokeQuery {
                status,
                search,
                sort,
                direction: asc.then(|| "asc".to_string()),
            };
            let jokes = client.list_jokes(&query).await?;

            if jokes.is_empty() {
                println!("No jokes found.");
                return Ok(());
            }

            println!("{}", "Jokes:".bold());
            for joke in jokes {
                println!(
                    "  {} {} [{}] {}s {}",
                    joke.id.to_string()[..8].dimmed(),
                    joke.title.cyan().bold(),
                    status_badge(&joke.status),
                    joke.estimated_time,
                    rating_badge(joke.performance_rating),
                );
                println!("      {}", truncate_string(&joke.setup, 70).dimmed());
                println!("      {}", truncate_string(&joke.punchline, 70));
                if !joke.tags.is_empty() {
                    println!("      {}", format!("#{}", joke.tags.join(" #")).dimmed());
                }
            }
        }

        JokeAction::Add {
            title,
            setup,
            punchline,
            tags,
            time,
        } => {
            let request = CreateJokeRequest {
                title: prompt_if_missing(title, "Title")?,
                setup: prompt_if_missing(setup, "Setup")?,
                punchline: prompt_if_missing(punchline, "Punchline")?,
                tags,
                estimated_time: time,
            };
            let joke = client.create_joke(&request).await?;

            println!(
                "{} Joke added: {} ({}, {}s)",
                "✓".green(),
                joke.title.cyan(),
                joke.status,
                joke.estimated_time
            );
        }
    }

    Ok(())
}

async fn cmd_routines(action: RoutineAction) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    match action {
        RoutineAction::List => {
            let routines = client.list_routines().await?;

            if routines.is_empty() {
                println!("No routines yet.");
                return Ok(());
            }

            println!("{}", "Routines:".bold());
            for routine in routines {
                let time = format!(
                    "{} / {}:{:02}",
                    routine.formatted_time,
                    routine.target_time / 60,
                    routine.target_time % 60
                );
                let time = if routine.time_status.over_time {
                    time.red()
                } else {
                    time.green()
                };
                let flow = routine
                    .flow_score
                    .map(|s| format!("flow {}", s))
                    .unwrap_or_default();

                println!(
                    "  {} {} {} jokes, {} ({:.0}%) {}",
                    routine.id.to_string()[..8].dimmed(),
                    routine.name.cyan().bold(),
                    routine.joke_ids.len(),
                    time,
                    routine.time_status.percent,
                    flow.dimmed()
                );
            }
        }
    }

    Ok(())
}

async fn cmd_generate(kind: GenerateKind, text: String) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    let response = client.generate(kind.as_str(), &text).await?;

    let heading = match kind {
        GenerateKind::Setup => "Setups:",
        GenerateKind::Punchline => "Punchlines:",
    };
    println!("{}", heading.bold());
    for (i, suggestion) in response.suggestions.iter().enumerate() {
        println!("  {}. {}", i + 1, suggestion);
    }

    if response.source == "fallback" {
        println!(
            "\n{}",
            "The assistant was unavailable; these are offline suggestions.".yellow()
        );
    }

    Ok(())
}

async fn cmd_structures(action: StructureAction) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    match action {
        StructureAction::List { category } => {
            let catalog = client.list_structures(category.as_deref()).await?;

            for cat in &catalog.categories {
                let templates: Vec<_> = catalog
                    .structures
                    .iter()
                    .filter(|s| s.category == cat.id)
                    .collect();
                if templates.is_empty() {
                    continue;
                }

                println!("{}", cat.name.bold());
                for template in templates {
                    println!(
                        "  {} {}",
                        template.name.cyan(),
                        format!("({})", template.id).dimmed()
                    );
                    println!("      {}", truncate_string(&template.summary, 70).dimmed());
                }
            }
        }
    }

    Ok(())
}

fn prompt_if_missing(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

fn status_badge(status: &str) -> colored::ColoredString {
    match status {
        "polished" => status.green(),
        "working" => status.yellow(),
        "retired" => status.dimmed(),
        _ => status.normal(),
    }
}

fn rating_badge(rating: f64) -> String {
    if rating <= 0.0 {
        String::new()
    } else {
        format!("★{:.0}", rating)
    }
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_string("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_string("short", 10), "short");
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from(["tight5", "generate", "punchline", "My cat judges me"])
            .unwrap();
        match cli.command {
            Commands::Generate { kind, text } => {
                assert_eq!(kind.as_str(), "punchline");
                assert_eq!(text, "My cat judges me");
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_generate_kind() {
        assert!(Cli::try_parse_from(["tight5", "generate", "limerick", "x"]).is_err());
    }
}
