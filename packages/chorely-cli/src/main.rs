//! Chorely CLI - family chores from the terminal
//!
//! This binary provides a command-line front end for the Chorely backend:
//! - Register and sign in as a parent
//! - Manage children, task templates, bundles and assignments
//! - Track and toggle per-child task completion
//!
//! The session is kept between runs and refreshed transparently.

mod resources;

use anyhow::{Context, Result};
use chorely_core::api::{self, ApiClient};
use chorely_core::auth::{self, SessionStore};
use chorely_core::models::{LoginRequest, RegisterRequest};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;

#[derive(Parser)]
#[command(name = "chorely")]
#[command(author = "Chorely Team")]
#[command(version)]
#[command(about = "Manage family chores and track task completion")]
#[command(long_about = "
Chorely CLI talks to the Chorely family task backend. Parents create
child profiles and recurring task templates, bundle templates, assign
them to children and track completion.

Quick start:
  1. Sign in:             chorely login parent@example.com
  2. Add a child:         chorely children add Ana --color '#F97316'
  3. See today's tasks:   chorely tasks by-children
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a parent account
    Register {
        email: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Password (prompted on stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign in and store the session
    #[command(alias = "connect")]
    Login {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    #[command(alias = "disconnect")]
    Logout,

    /// Show session status
    Status,

    /// Show configuration paths and settings
    Config,

    /// Manage children
    #[command(subcommand)]
    Children(resources::ChildCommand),

    /// Manage recurring task templates
    #[command(subcommand)]
    Templates(resources::TemplateCommand),

    /// Manage task bundles (groups of templates)
    #[command(subcommand)]
    Bundles(resources::BundleCommand),

    /// Assign bundles to children
    #[command(subcommand)]
    Assignments(resources::AssignmentCommand),

    /// Assign single templates to children
    #[command(subcommand)]
    TemplateChildren(resources::TemplateChildCommand),

    /// Track task instances
    #[command(subcommand)]
    Tasks(resources::TaskCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("chorely={},chorely_core={}", log_level, log_level).into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = api::load_api_config();

    let stored = auth::load_session().unwrap_or_else(|e| {
        tracing::warn!("Ignoring stored session: {}", e);
        None
    });
    let store = SessionStore::with_session(stored.unwrap_or_default());
    let changes = store.subscribe();

    let client = ApiClient::new(&config, store.clone())
        .context("Failed to build HTTP client")?
        .with_navigation(|| {
            eprintln!("Session expired. Run 'chorely login' to sign in again.");
        });

    let result = run(&cli, &client, &config).await;

    // Persist refreshes, logins and logouts
    if changes.has_changed().unwrap_or(false) {
        auth::save_session(&store.current()).context("Failed to persist session")?;
    }

    result
}

async fn run(cli: &Cli, client: &ApiClient, config: &api::ApiConfig) -> Result<()> {
    match &cli.command {
        Commands::Register {
            email,
            name,
            password,
        } => cmd_register(cli, client, email, name, password.clone()).await,
        Commands::Login { email, password } => {
            cmd_login(cli, client, email, password.clone()).await
        }
        Commands::Logout => cmd_logout(cli, client),
        Commands::Status => cmd_status(cli, client),
        Commands::Config => cmd_config(cli, config),
        Commands::Children(cmd) => resources::run_children(cli.format, client, cmd).await,
        Commands::Templates(cmd) => resources::run_templates(cli.format, client, cmd).await,
        Commands::Bundles(cmd) => resources::run_bundles(cli.format, client, cmd).await,
        Commands::Assignments(cmd) => resources::run_assignments(cli.format, client, cmd).await,
        Commands::TemplateChildren(cmd) => {
            resources::run_template_children(cli.format, client, cmd).await
        }
        Commands::Tasks(cmd) => resources::run_tasks(cli.format, client, cmd).await,
    }
}

fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password: ");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read password")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    Ok(password)
}

async fn cmd_register(
    cli: &Cli,
    client: &ApiClient,
    email: &str,
    name: &str,
    password: Option<String>,
) -> Result<()> {
    let password = read_password(password)?;
    let resp = client
        .register(&RegisterRequest {
            email: email.to_string(),
            password,
            name: name.to_string(),
        })
        .await
        .context("Registration failed")?;

    match cli.format {
        OutputFormat::Text => {
            println!("Registered {} <{}>", resp.parent.name, resp.parent.email);
            println!();
            println!("Sign in with: chorely login {}", resp.parent.email);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "status": "registered",
                "parent": resp.parent,
            }));
        }
    }

    Ok(())
}

async fn cmd_login(
    cli: &Cli,
    client: &ApiClient,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let password = read_password(password)?;
    let resp = client
        .login(&LoginRequest {
            email: email.to_string(),
            password,
        })
        .await
        .context("Login failed")?;

    let user = resp.data.user;
    match cli.format {
        OutputFormat::Text => {
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "status": "logged_in",
                "user": user,
            }));
        }
    }

    Ok(())
}

fn cmd_logout(cli: &Cli, client: &ApiClient) -> Result<()> {
    let was_authenticated = client.session().is_authenticated();
    client.logout();
    let status = if was_authenticated { "logged_out" } else { "not_logged_in" };

    match cli.format {
        OutputFormat::Text => {
            if was_authenticated {
                println!("Signed out.");
            } else {
                println!("Not signed in.");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "status": status,
            }));
        }
    }

    Ok(())
}

fn cmd_status(cli: &Cli, client: &ApiClient) -> Result<()> {
    let session = client.session().current();
    let refresh_expires_at = session
        .refresh_token
        .as_deref()
        .and_then(chorely_core::JwtExpiryCheck::expires_at)
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0));
    let user_field = |key: &str| {
        session
            .user
            .as_ref()
            .and_then(|u| u.get(key))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    match cli.format {
        OutputFormat::Text => {
            if session.access_token.is_some() {
                println!("Status:  Signed in");
                println!("Name:    {}", user_field("name").unwrap_or_else(|| "-".to_string()));
                println!("Email:   {}", user_field("email").unwrap_or_else(|| "-".to_string()));
                println!(
                    "Session: refreshable until {}",
                    refresh_expires_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string())
                );
                println!();
                println!("Storage: {}", auth::get_session_storage_info());
            } else {
                println!("Status: Not signed in");
                println!();
                println!("Run 'chorely login <email>' to sign in.");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "authenticated": session.access_token.is_some(),
                "user": session.user,
                "refresh_expires_at": refresh_expires_at.map(|t| t.to_rfc3339()),
                "storage_info": auth::get_session_storage_info(),
            }));
        }
    }

    Ok(())
}

fn cmd_config(cli: &Cli, config: &api::ApiConfig) -> Result<()> {
    let config_path = api::config::get_config_file_path_string();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============");
            println!();
            println!("Config file:    {}", config_path);
            println!("API endpoint:   {} (from {})", config.base_url, config.source);
            println!(
                "Timeout:        {}",
                config
                    .timeout
                    .map(|t| format!("{}s", t.as_secs()))
                    .unwrap_or_else(|| "none".to_string())
            );
            println!("Session store:  {}", auth::get_session_storage_info());
            println!();
            println!("Environment variables:");
            println!("  {} - Override API endpoint", api::config::ENV_API_URL);
            println!();
            println!("Example config.toml:");
            println!();
            println!("{}", api::config::generate_example_config());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "config_file": config_path,
                "api_url": config.base_url,
                "api_source": format!("{}", config.source),
                "timeout_secs": config.timeout.map(|t| t.as_secs()),
                "expiry_leeway_secs": config.expiry_leeway_secs,
                "session_storage": auth::get_session_storage_info(),
            }));
        }
    }

    Ok(())
}
