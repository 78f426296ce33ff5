//! aw-dashboard - ActivityWatch team dashboard client
//!
//! Talks to an aw-server with team support from the command line or a
//! terminal dashboard.

mod api;
mod cli;
mod config;
mod dashboard;
mod models;
mod router;
mod storage;
mod store;
mod tui;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::settings::ConfigUpdate;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::models::{EventQuery, SignupRequest};

#[derive(Parser)]
#[command(name = "aw-dashboard")]
#[command(about = "Team dashboard client for ActivityWatch", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Server origin for this run (e.g. http://127.0.0.1:5600)
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,

    /// Use the testing server (port 5666) for this run, over any saved or
    /// AW_SERVER_URL origin; --server still wins
    #[arg(long, global = true)]
    testing: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and forget the stored session
    Logout,

    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        password: String,
    },

    /// Show server, session and storage status
    Status,

    /// Show the logged-in user's profile
    Whoami,

    /// List all users
    Users,

    /// Manage teams
    Teams {
        #[command(subcommand)]
        command: Option<TeamCommands>,
    },

    /// Inspect buckets and events
    Buckets {
        #[command(subcommand)]
        command: Option<BucketCommands>,
    },

    /// List the route table, or resolve a path
    Routes {
        path: Option<String>,
    },

    /// Set the page `/` opens, or clear it
    Landing {
        path: Option<String>,

        #[arg(long, conflicts_with = "path")]
        clear: bool,
    },

    /// Show or change saved settings
    Config {
        /// Saved server origin (empty string clears it)
        #[arg(long = "set-server", value_name = "URL")]
        set_server: Option<String>,

        /// Save testing mode on or off
        #[arg(long = "set-testing", value_name = "BOOL")]
        set_testing: Option<bool>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Client name sent to the server
        #[arg(long)]
        client_name: Option<String>,
    },

    /// Launch the terminal dashboard
    Tui {
        /// Start at this path instead of the landing page
        #[arg(default_value = "/")]
        path: String,
    },
}

#[derive(Subcommand)]
enum TeamCommands {
    /// Teams you own
    List,
    /// Teams you are a member of
    Mine,
    /// Members and tracked apps of a team
    Show { id: i32 },
    /// Create a team
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Rename or re-describe a team
    Edit {
        id: i32,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Add users to a team
    AddMembers {
        id: i32,
        #[arg(required = true)]
        users: Vec<i32>,
    },
    /// Remove a user from a team
    RemoveMember { id: i32, user: i32 },
    /// Show the apps tracked for a team
    Config { id: i32 },
    /// Replace the apps tracked for a team
    SetConfig { id: i32, apps: Vec<String> },
}

#[derive(Subcommand)]
enum BucketCommands {
    /// Buckets of a user (default: you)
    List {
        #[arg(short, long)]
        user: Option<i32>,
    },
    /// Bucket metadata
    Info { id: String },
    /// Events in a bucket
    Events {
        id: String,
        /// RFC 3339 start time
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// RFC 3339 end time
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        #[arg(short, long, default_value = "50")]
        limit: u64,
        /// Read through a team you manage
        #[arg(long)]
        team: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let is_tui = matches!(cli.command, Commands::Tui { .. });

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());
    let log_tail = tui::LogTail::new();
    if is_tui {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(log_tail.clone()),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    // `config` edits the file itself; everything else needs a client.
    let command = match cli.command {
        Commands::Config {
            set_server,
            set_testing,
            timeout,
            client_name,
        } => {
            return cli::settings::run(ConfigUpdate {
                server_url: set_server,
                testing: set_testing,
                request_timeout_secs: timeout,
                client_name,
            });
        }
        command => command,
    };

    let config = Config::load()?.with_overrides(cli.server, cli.testing);

    let dashboard = Dashboard::open(&config)?;

    let result = run(command, dashboard, &config, log_tail).await;
    if let Err(e) = &result {
        if let Some(hint) = cli::hint(e) {
            eprintln!("hint: {}", hint);
        }
    }
    result
}

async fn run(
    command: Commands,
    mut dashboard: Dashboard,
    config: &Config,
    log_tail: tui::LogTail,
) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            cli::session::login(&mut dashboard, &email, password).await?;
        }
        Commands::Logout => {
            cli::session::logout(&mut dashboard)?;
        }
        Commands::Signup {
            email,
            username,
            name,
            lastname,
            password,
        } => {
            let request = SignupRequest {
                email,
                username,
                name,
                lastname,
                password,
            };
            cli::session::signup(&dashboard, request).await?;
        }
        Commands::Status => {
            cli::session::status(&dashboard, config).await?;
        }
        Commands::Whoami => {
            cli::session::whoami(&mut dashboard).await?;
        }
        Commands::Users => {
            cli::session::users(&dashboard).await?;
        }
        Commands::Teams { command } => match command.unwrap_or(TeamCommands::List) {
            TeamCommands::List => cli::teams::list(&mut dashboard).await?,
            TeamCommands::Mine => cli::teams::mine(&dashboard).await?,
            TeamCommands::Show { id } => cli::teams::show(&mut dashboard, id).await?,
            TeamCommands::Add { name, description } => {
                cli::teams::add(&mut dashboard, name, description).await?
            }
            TeamCommands::Edit {
                id,
                name,
                description,
            } => cli::teams::edit(&mut dashboard, id, name, description).await?,
            TeamCommands::AddMembers { id, users } => {
                cli::teams::add_members(&dashboard, id, &users).await?
            }
            TeamCommands::RemoveMember { id, user } => {
                cli::teams::remove_member(&dashboard, id, user).await?
            }
            TeamCommands::Config { id } => cli::teams::config(&dashboard, id).await?,
            TeamCommands::SetConfig { id, apps } => {
                cli::teams::set_config(&dashboard, id, apps).await?
            }
        },
        Commands::Buckets { command } => {
            match command.unwrap_or(BucketCommands::List { user: None }) {
                BucketCommands::List { user } => cli::buckets::list(&mut dashboard, user).await?,
                BucketCommands::Info { id } => cli::buckets::info(&dashboard, &id).await?,
                BucketCommands::Events {
                    id,
                    start,
                    end,
                    limit,
                    team,
                } => {
                    let query = EventQuery {
                        start,
                        end,
                        limit: Some(limit),
                        team_id: team,
                    };
                    cli::buckets::events(&dashboard, &id, query).await?
                }
            }
        }
        Commands::Routes { path } => {
            cli::routes::run(&dashboard, path.as_deref())?;
        }
        Commands::Landing { path, clear } => {
            if path.is_none() && !clear {
                let current = dashboard.storage.landing_page();
                println!("Landing page: {}", current.as_deref().unwrap_or("(not set)"));
            } else {
                cli::session::landing(&dashboard, path.as_deref())?;
            }
        }
        Commands::Tui { path } => {
            tui::run(dashboard, log_tail, &path)
                .await
                .context("Terminal dashboard failed")?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}
