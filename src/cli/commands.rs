use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use super::render;
use crate::catalog::{list_conversations, list_projects};
use crate::filters::{apply_filters, parse_filter};
use crate::parsers::list_messages;
use crate::rewind::{delete_messages_from, plan_rewind, restore_latest_backup};
use crate::utils::ClaudeLayout;

#[derive(Parser)]
#[command(name = "claude-conversations")]
#[command(version)]
#[command(about = "Browse and rewind Claude Code conversation logs", long_about = None)]
pub struct Cli {
    /// Claude directory to read instead of $CLAUDE_CONFIG_DIR or ~/.claude
    #[arg(long, global = true, value_name = "DIR")]
    pub claude_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects that have conversations
    Projects {
        /// Also list projects with no conversation logs
        #[arg(long)]
        include_empty: bool,
    },
    /// List conversations, most recent first
    Conversations {
        /// Project directory name under projects/ (all projects when omitted)
        #[arg(long, value_name = "TOKEN")]
        project: Option<String>,
        /// Search query: free text plus project:, branch: and since: filters
        #[arg(long, short)]
        query: Option<String>,
        /// Show at most this many conversations
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Show the messages of a conversation log
    Messages {
        /// Path to a session .jsonl log
        log: PathBuf,
    },
    /// Delete a message and everything that follows from it
    Rewind {
        /// Path to a session .jsonl log
        log: PathBuf,
        /// Uuid of the first message to delete
        uuid: String,
        /// Perform the deletion instead of only showing what would be deleted
        #[arg(long, short)]
        yes: bool,
    },
    /// Restore a log from its most recent backup
    Restore {
        /// Path to a session .jsonl log
        log: PathBuf,
    },
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Projects { include_empty } => show_projects(&cli, *include_empty),
        Commands::Conversations { project, query, limit } => {
            show_conversations(&cli, project.as_deref(), query.as_deref(), *limit)
        }
        Commands::Messages { log } => show_messages(&cli, log),
        Commands::Rewind { log, uuid, yes } => {
            if *yes {
                rewind(&cli, log, uuid)
            } else {
                show_rewind_plan(&cli, log, uuid)
            }
        }
        Commands::Restore { log } => restore(&cli, log),
    }
}

fn layout(cli: &Cli) -> Result<ClaudeLayout> {
    let mut layout = ClaudeLayout::from_env()?;
    if let Some(dir) = &cli.claude_dir {
        layout.claude_dir = dir.clone();
    }
    Ok(layout)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn show_projects(cli: &Cli, include_empty: bool) -> Result<ExitCode> {
    let layout = layout(cli)?;
    let projects: Vec<_> = list_projects(&layout)
        .into_iter()
        .filter(|project| include_empty || project.conversation_count > 0)
        .collect();

    if cli.json {
        print_json(&projects)?;
    } else {
        print!("{}", render::projects(&projects, layout.home()));
    }
    Ok(ExitCode::SUCCESS)
}

fn show_conversations(
    cli: &Cli,
    project: Option<&str>,
    query: Option<&str>,
    limit: Option<usize>,
) -> Result<ExitCode> {
    let layout = layout(cli)?;
    let filter = parse_filter(query.unwrap_or_default()).context("Invalid search query")?;

    let mut conversations = apply_filters(list_conversations(&layout, project), &filter, layout.home());
    if let Some(limit) = limit {
        conversations.truncate(limit);
    }

    if cli.json {
        print_json(&conversations)?;
    } else {
        print!("{}", render::conversations(&conversations));
    }
    Ok(ExitCode::SUCCESS)
}

fn show_messages(cli: &Cli, log: &Path) -> Result<ExitCode> {
    let messages = list_messages(log);

    if cli.json {
        print_json(&messages)?;
    } else {
        print!("{}", render::messages(&messages));
    }
    Ok(ExitCode::SUCCESS)
}

fn show_rewind_plan(cli: &Cli, log: &Path, uuid: &str) -> Result<ExitCode> {
    let plan = plan_rewind(log, uuid)?;

    match (&plan, cli.json) {
        (_, true) => print_json(&plan)?,
        (Some(plan), false) => print!("{}", render::rewind_plan(plan)),
        (None, false) => eprintln!("Message {} not found in {}", uuid, log.display()),
    }

    Ok(if plan.is_some() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn rewind(cli: &Cli, log: &Path, uuid: &str) -> Result<ExitCode> {
    let result = delete_messages_from(log, uuid)?;

    if cli.json {
        print_json(&result)?;
    } else if result.success {
        print!("{}", render::delete_result(&result));
    } else {
        match &result.backup_path {
            Some(_) => eprintln!("Message {} not found in {}", uuid, log.display()),
            None => eprintln!("Log not found: {}", log.display()),
        }
    }

    Ok(if result.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn restore(cli: &Cli, log: &Path) -> Result<ExitCode> {
    let restored = restore_latest_backup(log)?;

    if cli.json {
        print_json(&restored)?;
    } else if let Some(restored) = &restored {
        print!("{}", render::restored_backup(log, restored));
    } else {
        eprintln!("No backups found for {}", log.display());
    }

    Ok(if restored.is_some() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
