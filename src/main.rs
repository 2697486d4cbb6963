//! Application shell for the hash-routed view resolver.
//!
//! # Architecture Overview
//!
//! ```text
//!   routes.toml ──▶ config ──▶ lifecycle::startup ──▶ Application
//!                                                          │
//!   location / #hash ──▶ navigation::Navigator ──▶ routing::Resolver ──▶ RouteTable
//!                              │                          │
//!                              ▼                          ▼
//!                       NavigationState            view cache ◀── loader (views/<key>.vue)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use route_resolver::config::load_config;
use route_resolver::lifecycle::signals::spawn_ctrl_c_handler;
use route_resolver::observability::{logging::init_logging, metrics::install_recorder};
use route_resolver::routing::ViewCatalog;
use route_resolver::{Application, NavigationOutcome, Shutdown};

#[derive(Parser)]
#[command(name = "route-resolver")]
#[command(about = "Resolve hash-mode navigations against a route table", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    /// Directory holding view sources (overrides [views].directory)
    #[arg(long)]
    views: Option<PathBuf>,

    /// Print a Prometheus snapshot of resolver metrics on exit
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and the view catalog
    Check,
    /// Print the route table
    Routes,
    /// Mount, then navigate to each location in turn
    Resolve { locations: Vec<String> },
    /// Read locations from stdin until EOF or Ctrl+C
    Shell,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability);

    let metrics = if cli.metrics || config.observability.metrics_enabled {
        Some(install_recorder()?)
    } else {
        None
    };

    let views_dir = cli
        .views
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.views.directory));
    let catalog = ViewCatalog::with_directory(views_dir, config.views.extension.clone());

    match cli.command {
        Commands::Check => {
            Application::bootstrap(config, &catalog)?;
            println!("configuration OK");
        }
        Commands::Routes => {
            println!("{}", serde_json::to_string_pretty(&config.routes)?);
        }
        Commands::Resolve { locations } => {
            let app = Application::bootstrap(config, &catalog)?;
            print_outcome("(mount)", &app.mount().await);
            app.navigator().rendered();

            for location in &locations {
                let outcome = app.navigator().navigate(location).await;
                print_outcome(location, &outcome);
                app.navigator().rendered();
            }
        }
        Commands::Shell => {
            let app = Application::bootstrap(config, &catalog)?;
            run_shell(&app).await?;
        }
    }

    if let Some(handle) = metrics {
        if cli.metrics {
            print!("{}", handle.render());
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Interactive navigation loop: one location per line, plus `back`, `forward`, `name:<Name>`.
async fn run_shell(app: &Application) -> Result<(), std::io::Error> {
    let shutdown = std::sync::Arc::new(Shutdown::new());
    spawn_ctrl_c_handler(shutdown.clone());

    print_outcome("(mount)", &app.mount().await);
    app.navigator().rendered();

    let navigator = app.navigator();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let outcome = match input {
                    "back" => navigator.back().await,
                    "forward" => navigator.forward().await,
                    _ => match input.strip_prefix("name:") {
                        Some(name) => Some(navigator.navigate_named(name.trim()).await),
                        None => Some(navigator.navigate(input).await),
                    },
                };

                match outcome {
                    Some(outcome) => print_outcome(input, &outcome),
                    None => println!("{} -> no history entry", input),
                }
                navigator.rendered();
            }
            _ = shutdown.wait() => break,
        }
    }

    Ok(())
}

fn print_outcome(location: &str, outcome: &NavigationOutcome) {
    match outcome {
        NavigationOutcome::Rendered(resolved) => println!(
            "{} -> {} [{}] component={}",
            location,
            resolved.entry.path(),
            resolved.entry.name(),
            resolved.view.component()
        ),
        NavigationOutcome::Fallback { error, resolved } => println!(
            "{} -> {} (fallback after: {})",
            location,
            resolved.entry.path(),
            error
        ),
        NavigationOutcome::Superseded => println!("{} -> superseded", location),
        NavigationOutcome::Failed(error) => println!("{} -> error: {}", location, error),
    }
}
