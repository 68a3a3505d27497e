//! Command line parsing and dispatch.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use duckbug_client::api::query::DEFAULT_PAGE_SIZE;
use duckbug_client::api::{ErrorFilters, ErrorGroupFilters, LogFilters, PageRequest, TimeRange};
use duckbug_client::models::{Credentials, ErrorGroupStatus, LogLevel, ProjectInput};
use duckbug_client::session::RouteDecision;
use duckbug_client::state::AppState;
use duckbug_client::store::{Language, Theme};

#[derive(Parser)]
#[command(name = "duckbug")]
#[command(version)]
#[command(about = "Command line client for the DuckBug error and log tracker")]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(long, env = "DUCKBUG_CONFIG", default_value = "./config.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "DUCKBUG_PASSWORD", hide_env_values = true)]
    password: String,
}

impl From<&CredentialArgs> for Credentials {
    fn from(args: &CredentialArgs) -> Self {
        Credentials::new(&args.email, &args.password)
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest::new(args.page, args.page_size)
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct TimeArgs {
    /// Only events at or after this timestamp
    #[arg(long)]
    from: Option<i64>,
    /// Only events at or before this timestamp
    #[arg(long)]
    to: Option<i64>,
}

impl From<TimeArgs> for TimeRange {
    fn from(args: TimeArgs) -> Self {
        TimeRange {
            from: args.from,
            to: args.to,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the token pair
    Login(CredentialArgs),
    /// Create an account
    Signup(CredentialArgs),
    /// Forget stored tokens
    Logout,
    /// Show whether a session is active
    Status,
    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Browse captured errors
    Errors {
        #[command(subcommand)]
        command: ErrorCommands,
    },
    /// Browse and triage error groups
    ErrorGroups {
        #[command(subcommand)]
        command: ErrorGroupCommands,
    },
    /// Browse log entries
    Logs {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Browse log groups
    LogGroups {
        #[command(subcommand)]
        command: LogGroupCommands,
    },
    /// Supported technologies and their DSN snippets
    Technologies {
        #[command(subcommand)]
        command: TechnologyCommands,
    },
    /// Show or change UI preferences
    Prefs {
        #[command(subcommand)]
        command: PrefCommands,
    },
    /// Print the JSON schema of the config file
    ConfigSchema,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    List(PageArgs),
    Get {
        id: String,
    },
    Create {
        name: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        technology: Option<i64>,
    },
    Delete {
        id: String,
    },
    /// Show the DSN a project reports to
    Dsn {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ErrorCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        time: TimeArgs,
    },
    Get {
        id: String,
    },
    Stats {
        #[arg(long)]
        project: String,
        #[arg(long)]
        group: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ErrorGroupCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<ErrorGroupStatus>,
        #[command(flatten)]
        time: TimeArgs,
    },
    Get {
        id: String,
    },
    /// Set the status of one group
    SetStatus {
        id: String,
        status: ErrorGroupStatus,
    },
    /// Set the status of several groups at once
    BatchStatus {
        status: ErrorGroupStatus,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum LogCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        level: Option<LogLevel>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        time: TimeArgs,
    },
    Get {
        id: String,
    },
    Stats {
        #[arg(long)]
        project: String,
        #[arg(long)]
        group: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LogGroupCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        level: Option<LogLevel>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        time: TimeArgs,
    },
    Get {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TechnologyCommands {
    List,
    Get { id: i64 },
}

#[derive(Subcommand)]
pub enum PrefCommands {
    Show,
    Theme { theme: Theme },
    Language { language: Language },
}

impl Commands {
    /// Commands that talk to the API on behalf of a signed-in user.
    fn needs_session(&self) -> bool {
        !matches!(
            self,
            Commands::Login(_)
                | Commands::Signup(_)
                | Commands::Logout
                | Commands::Status
                | Commands::Prefs { .. }
                | Commands::ConfigSchema
        )
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", out);
    Ok(())
}

pub async fn run(command: Commands, state: &AppState) -> Result<()> {
    if command.needs_session() {
        match state.session.guard() {
            RouteDecision::Allow => {}
            RouteDecision::Pending => bail!("Session is still loading"),
            RouteDecision::RedirectToLogin => {
                bail!("Not logged in; run `duckbug login --email <EMAIL>` first")
            }
        }
    }

    let client = &state.client;
    match command {
        Commands::Login(args) => {
            let response = state
                .session
                .login(client, &Credentials::from(&args))
                .await
                .context("Login failed")?;
            print_json(&json!({ "authenticated": true, "expiresIn": response.expires_in }))
        }
        Commands::Signup(args) => {
            let response = state
                .session
                .signup(client, &Credentials::from(&args))
                .await
                .context("Signup failed")?;
            print_json(&response)
        }
        Commands::Logout => {
            state.session.logout().await;
            print_json(&json!({ "authenticated": false }))
        }
        Commands::Status => {
            let snapshot = state.session.snapshot();
            print_json(&json!({
                "baseUrl": client.base_url(),
                "state": snapshot.state(),
                "session": snapshot,
            }))
        }
        Commands::Projects { command } => run_projects(command, state).await,
        Commands::Errors { command } => run_errors(command, state).await,
        Commands::ErrorGroups { command } => run_error_groups(command, state).await,
        Commands::Logs { command } => run_logs(command, state).await,
        Commands::LogGroups { command } => run_log_groups(command, state).await,
        Commands::Technologies { command } => match command {
            TechnologyCommands::List => print_json(&client.list_technologies().await?),
            TechnologyCommands::Get { id } => print_json(&client.get_technology(id).await?),
        },
        Commands::Prefs { command } => run_prefs(command, state).await,
        Commands::ConfigSchema => {
            println!("{}", duckbug_client::config::config_schema());
            Ok(())
        }
    }
}

async fn run_projects(command: ProjectCommands, state: &AppState) -> Result<()> {
    let client = &state.client;
    match command {
        ProjectCommands::List(page) => print_json(&client.list_projects(&page.into()).await?),
        ProjectCommands::Get { id } => print_json(&client.get_project(&id).await?),
        ProjectCommands::Create { name } => {
            print_json(&client.create_project(&ProjectInput::new(name)).await?)
        }
        ProjectCommands::Update {
            id,
            name,
            technology,
        } => {
            let input = ProjectInput {
                name,
                technology_id: technology,
            };
            print_json(&client.update_project(&id, &input).await?)
        }
        ProjectCommands::Delete { id } => {
            client
                .delete_project(&id)
                .await
                .with_context(|| format!("Failed to delete project {}", id))?;
            print_json(&json!({ "deleted": id }))
        }
        ProjectCommands::Dsn { id } => print_json(&client.project_dsn(&id).await?),
    }
}

async fn run_errors(command: ErrorCommands, state: &AppState) -> Result<()> {
    let client = &state.client;
    match command {
        ErrorCommands::List {
            page,
            project,
            group,
            search,
            time,
        } => {
            let filters = ErrorFilters {
                project_id: project,
                group_id: group,
                search,
                time: time.into(),
            };
            print_json(&client.list_errors(&page.into(), &filters).await?)
        }
        ErrorCommands::Get { id } => print_json(&client.get_error(&id).await?),
        ErrorCommands::Stats { project, group } => {
            print_json(&client.error_stats(&project, group.as_deref()).await?)
        }
    }
}

async fn run_error_groups(command: ErrorGroupCommands, state: &AppState) -> Result<()> {
    let client = &state.client;
    match command {
        ErrorGroupCommands::List {
            page,
            project,
            search,
            status,
            time,
        } => {
            let filters = ErrorGroupFilters {
                project_id: project,
                search,
                time: time.into(),
                status,
            };
            print_json(&client.list_error_groups(&page.into(), &filters).await?)
        }
        ErrorGroupCommands::Get { id } => print_json(&client.get_error_group(&id).await?),
        ErrorGroupCommands::SetStatus { id, status } => {
            client.update_error_group_status(&id, status).await?;
            print_json(&json!({ "id": id, "status": status }))
        }
        ErrorGroupCommands::BatchStatus { status, ids } => {
            client.batch_update_error_group_status(&ids, status).await?;
            print_json(&json!({ "ids": ids, "status": status }))
        }
    }
}

async fn run_logs(command: LogCommands, state: &AppState) -> Result<()> {
    let client = &state.client;
    match command {
        LogCommands::List {
            page,
            project,
            group,
            level,
            search,
            time,
        } => {
            let filters = LogFilters {
                project_id: project,
                group_id: group,
                level,
                search,
                time: time.into(),
            };
            print_json(&client.list_logs(&page.into(), &filters).await?)
        }
        LogCommands::Get { id } => print_json(&client.get_log(&id).await?),
        LogCommands::Stats { project, group } => {
            print_json(&client.log_stats(&project, group.as_deref()).await?)
        }
    }
}

async fn run_log_groups(command: LogGroupCommands, state: &AppState) -> Result<()> {
    let client = &state.client;
    match command {
        LogGroupCommands::List {
            page,
            project,
            level,
            search,
            time,
        } => {
            let filters = LogFilters {
                project_id: project,
                level,
                search,
                time: time.into(),
                ..Default::default()
            };
            print_json(&client.list_log_groups(&page.into(), &filters).await?)
        }
        LogGroupCommands::Get { id } => print_json(&client.get_log_group(&id).await?),
    }
}

async fn run_prefs(command: PrefCommands, state: &AppState) -> Result<()> {
    let prefs = &state.preferences;
    match command {
        PrefCommands::Show => {}
        PrefCommands::Theme { theme } => prefs
            .set_theme(theme)
            .await
            .map_err(anyhow::Error::msg)
            .context("Failed to save theme")?,
        PrefCommands::Language { language } => prefs
            .set_language(language)
            .await
            .map_err(anyhow::Error::msg)
            .context("Failed to save language")?,
    }
    print_json(&json!({
        "theme": prefs.theme().await.as_str(),
        "language": prefs.language().await.as_str(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_batch_status() {
        let cli = Cli::try_parse_from(["duckbug", "error-groups", "batch-status", "resolved", "g1", "g2"]).unwrap();
        match cli.command {
            Commands::ErrorGroups {
                command: ErrorGroupCommands::BatchStatus { status, ids },
            } => {
                assert_eq!(status, ErrorGroupStatus::Resolved);
                assert_eq!(ids, vec!["g1", "g2"]);
            }
            _ => panic!("expected batch-status"),
        }
    }

    #[test]
    fn test_batch_status_needs_ids() {
        assert!(Cli::try_parse_from(["duckbug", "error-groups", "batch-status", "resolved"]).is_err());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["duckbug", "logs", "list", "--level", "fatal"]).is_err());
    }

    #[test]
    fn test_which_commands_need_a_session() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().command;
        assert!(!parse(&["duckbug", "logout"]).needs_session());
        assert!(!parse(&["duckbug", "prefs", "theme", "dark"]).needs_session());
        assert!(parse(&["duckbug", "projects", "list", "--page", "2"]).needs_session());
    }
}
