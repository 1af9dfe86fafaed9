//! jiraseed - generate JIRA issues from local templates.
//!
//! Templates live in a local JSON file; credentials come from the
//! environment (or a `.env` file). One issue can be submitted at a
//! time after catalog validation, or templates can be submitted
//! unattended on a fixed timer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use jiraseed::api::JiraClient;
use jiraseed::config::Config;
use jiraseed::error::{AppError, Result};
use jiraseed::poll::{self, PollSettings};
use jiraseed::submit::{self, SubmissionRequest};
use jiraseed::{logging, templates};

#[derive(Parser)]
#[command(
    name = "jiraseed",
    version,
    about = "Generate JIRA issues from local templates"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify that the configured credentials are accepted
    Auth,
    /// List the issue types available in a project
    Types {
        /// Project key, e.g. AUT
        #[arg(short, long)]
        project: String,
    },
    /// List the local templates
    Templates {
        /// Path to the template file
        #[arg(short, long, default_value = templates::DEFAULT_TEMPLATES_FILE)]
        file: PathBuf,
    },
    /// Submit one issue built from a template
    Submit(SubmitArgs),
    /// Submit random templates on a fixed timer until interrupted
    Poll(PollArgs),
}

#[derive(Args)]
struct SubmitArgs {
    /// Project key, e.g. AUT
    #[arg(short, long)]
    project: String,

    /// Path to the template file
    #[arg(short, long, default_value = templates::DEFAULT_TEMPLATES_FILE)]
    file: PathBuf,

    /// Template index; a uniform random pick when omitted
    #[arg(short, long)]
    index: Option<usize>,

    /// Issue type name; overrides the template's hint
    #[arg(short = 't', long = "type")]
    issue_type: Option<String>,

    /// Replace the template summary
    #[arg(long)]
    summary: Option<String>,

    /// Replace the template description
    #[arg(long)]
    description: Option<String>,

    /// Priority display name, e.g. High
    #[arg(long)]
    priority: Option<String>,

    /// Parent issue key; required for subtask types
    #[arg(long)]
    parent: Option<String>,
}

#[derive(Args)]
struct PollArgs {
    /// Project key, e.g. AUT
    #[arg(short, long)]
    project: String,

    /// Issue type name sent with every cycle
    #[arg(short = 't', long = "type", default_value = "Task")]
    issue_type: String,

    /// Seconds between cycles
    #[arg(short = 'n', long, default_value_t = poll::DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Path to the template file
    #[arg(short, long, default_value = templates::DEFAULT_TEMPLATES_FILE)]
    file: PathBuf,
}

#[tokio::main]
async fn main() {
    // A .env next to the binary mirrors the environment; absence is fine.
    let _ = dotenvy::dotenv();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e.user_message());
        eprintln!("Status: {}", e.status_line());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Auth => cmd_auth().await,
        Command::Types { project } => cmd_types(&project).await,
        Command::Templates { file } => cmd_templates(&file),
        Command::Submit(args) => cmd_submit(args).await,
        Command::Poll(args) => cmd_poll(args).await,
    }
}

/// One-shot authentication smoke test against `/myself`.
async fn cmd_auth() -> Result<()> {
    let config = Config::from_env()?;
    let client = JiraClient::new(&config)?;
    let user = client.current_user().await?;
    tracing::debug!(account_id = %user.account_id, base_url = %client.base_url(), "auth ok");

    match user.email_address {
        Some(email) => println!("Authenticated as {} <{}>", user.display_name, email),
        None => println!("Authenticated as {}", user.display_name),
    }
    Ok(())
}

/// Fetch and print the issue-type catalog for a project.
async fn cmd_types(project_key: &str) -> Result<()> {
    let config = Config::from_env()?;
    let client = JiraClient::new(&config)?;
    let catalog = client.fetch_issue_types(project_key).await?;

    if catalog.is_empty() {
        println!("No creatable issue types in {}.", project_key);
        return Ok(());
    }

    println!("Issue types for {}:", project_key);
    for name in catalog.names() {
        // names() only yields keys present in the map
        let id = catalog.resolve(name).unwrap_or_default();
        let marker = if submit::is_subtask_type(name) {
            "  (subtask)"
        } else {
            ""
        };
        println!("  {:<20} {}{}", name, id, marker);
    }
    Ok(())
}

/// Print the local template collection.
fn cmd_templates(file: &Path) -> Result<()> {
    let loaded = templates::load_or_empty(file)?;
    if loaded.is_empty() {
        println!("No templates available.");
        return Ok(());
    }

    for (index, template) in loaded.iter().enumerate() {
        let type_hint = template.issuetype.as_deref().unwrap_or("-");
        println!("  [{}] {}  (type: {})", index, template.summary, type_hint);
    }
    Ok(())
}

/// Pick a template, apply edits, validate against the catalog, submit once.
async fn cmd_submit(args: SubmitArgs) -> Result<()> {
    let config = Config::from_env()?;
    let loaded = templates::load_or_empty(&args.file)?;

    let template = match args.index {
        Some(index) => loaded.get(index).ok_or_else(|| {
            AppError::other(format!(
                "template index {} out of range ({} templates)",
                index,
                loaded.len()
            ))
        })?,
        None => templates::pick_random(&loaded)
            .ok_or_else(|| AppError::other("no templates available"))?,
    };

    let mut request = SubmissionRequest::from_template(template, &args.project);
    if let Some(issue_type) = args.issue_type {
        request.issue_type_name = issue_type;
    }
    if let Some(summary) = args.summary {
        request.summary = summary;
    }
    if let Some(description) = args.description {
        request.description = description;
    }
    if let Some(priority) = args.priority {
        request.priority_name = priority;
    }
    request.parent_key = args.parent;

    let client = JiraClient::new(&config)?;
    let catalog = client.fetch_issue_types(&args.project).await?;
    let created = submit::submit(&client, &request, &catalog).await?;

    println!("Created {}: {}", created.key, request.summary);
    Ok(())
}

/// Run the unattended polling loop.
async fn cmd_poll(args: PollArgs) -> Result<()> {
    let config = Config::from_env()?;
    let client = JiraClient::new(&config)?;
    let loaded = templates::load_or_empty(&args.file)?;

    let settings = PollSettings {
        project_key: args.project,
        issue_type_name: args.issue_type,
        interval: Duration::from_secs(args.interval),
    };

    poll::run(&client, &loaded, &settings).await
}
