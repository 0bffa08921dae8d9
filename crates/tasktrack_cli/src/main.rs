//! Command-line front end for tasktrack.
//!
//! # Responsibility
//! - Parse one command per invocation and run it against the configured store.
//! - Save after every successful mutation.
//! - Report failures as `error: <message>` with a non-zero exit code.

use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tasktrack_core::{
    init_logging, init_stderr_logging, parse_deadline, AppConfig, Completion, DeadlineChange,
    FilterMode, Priority, SortDirection, Task, TaskChanges, TaskId, TaskRepository, TaskService,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "tasktrack", version, about = "Personal task tracker")]
struct Cli {
    /// Data file to load and save.
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Store format: json or lines.
    #[arg(long, global = true)]
    format: Option<String>,

    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Write rotated log files here instead of stderr.
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a task.
    Add {
        id: TaskId,
        description: String,
        /// low, medium or high.
        priority: String,
        /// Deadline as DD-MM-YYYY.
        deadline: Option<String>,
    },
    /// Remove a task.
    Remove { id: TaskId },
    /// Change fields of an existing task.
    Update {
        id: TaskId,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<String>,
        #[arg(long)]
        clear_deadline: bool,
        #[arg(long)]
        complete: bool,
    },
    /// Show one task.
    Show { id: TaskId },
    /// Mark a task as completed.
    Complete { id: TaskId },
    /// List every task in order.
    List {
        #[arg(long, value_enum, default_value_t = SortKey::Deadline)]
        by: SortKey,
        #[arg(long)]
        desc: bool,
    },
    /// Tasks due strictly before or after a date.
    Filter { date: String, mode: String },
    /// Tasks due exactly on a date.
    Due { date: String },
    /// Tasks with the given priority.
    Priority { priority: String },
    /// Tasks whose description contains a keyword.
    Search { keyword: String },
    /// Tasks by completion status.
    Status {
        #[arg(value_enum)]
        status: StatusArg,
    },
    /// Total, completed and pending counts.
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortKey {
    Deadline,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Completed,
    Pending,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = resolve_config(&cli)?;
    start_logging(&config)?;

    let mut service = TaskService::open(config.open_store())?;
    let mutated = execute(cli.command, service.repo_mut())?;
    if mutated {
        service.save()?;
    }
    Ok(())
}

/// Environment first, then command-line flags.
fn resolve_config(cli: &Cli) -> CliResult<AppConfig> {
    let mut config = AppConfig::from_env()?;
    if let Some(file) = &cli.file {
        config.set_data_file(&file.to_string_lossy())?;
    }
    if let Some(format) = &cli.format {
        config.set_format(format)?;
    }
    if let Some(level) = &cli.log_level {
        config.set_log_level(level)?;
    }
    if let Some(dir) = &cli.log_dir {
        config.set_log_dir(dir)?;
    }
    Ok(config)
}

fn start_logging(config: &AppConfig) -> CliResult<()> {
    let level = config.effective_log_level();
    match &config.log_dir {
        Some(dir) => init_logging(level, &dir.to_string_lossy())?,
        None => init_stderr_logging(level)?,
    }
    Ok(())
}

/// Runs one command. Returns whether the repository changed.
fn execute(command: Command, repo: &mut TaskRepository) -> CliResult<bool> {
    match command {
        Command::Add {
            id,
            description,
            priority,
            deadline,
        } => {
            repo.add(id, &description, &priority, deadline.as_deref())?;
            println!("Added task {id}.");
            Ok(true)
        }
        Command::Remove { id } => {
            let removed = repo.remove(id)?;
            println!("Removed task {}.", removed.id());
            Ok(true)
        }
        Command::Update {
            id,
            description,
            priority,
            deadline,
            clear_deadline,
            complete,
        } => {
            let deadline = match (deadline, clear_deadline) {
                (Some(text), _) => Some(DeadlineChange::Set(text)),
                (None, true) => Some(DeadlineChange::Clear),
                (None, false) => None,
            };
            let changes = TaskChanges {
                description,
                priority,
                deadline,
                complete,
            };
            if changes.is_empty() {
                return Err("nothing to update; pass at least one field flag".into());
            }
            repo.update(id, &changes)?;
            println!("Updated task {id}.");
            Ok(true)
        }
        Command::Show { id } => {
            let task = repo.get(id).ok_or_else(|| format!("task {id} not found"))?;
            println!("{task}");
            Ok(false)
        }
        Command::Complete { id } => match repo.mark_completed(id)? {
            Completion::Completed => {
                println!("Task {id} marked as completed.");
                Ok(true)
            }
            Completion::AlreadyCompleted => {
                println!("Task {id} was already completed.");
                Ok(false)
            }
        },
        Command::List { by, desc } => {
            let direction = SortDirection::from_ascending(!desc);
            let tasks = match by {
                SortKey::Deadline => repo.sorted_by_deadline(direction),
                SortKey::Priority => repo.sorted_by_priority(direction),
            };
            print_tasks(&tasks);
            Ok(false)
        }
        Command::Filter { date, mode } => {
            let target = parse_deadline(&date)?;
            let mode: FilterMode = mode.parse()?;
            print_tasks(&repo.filter_by_deadline(target, mode));
            Ok(false)
        }
        Command::Due { date } => {
            let target = parse_deadline(&date)?;
            print_tasks(&repo.find_by_deadline_exact(target));
            Ok(false)
        }
        Command::Priority { priority } => {
            let priority: Priority = priority.parse()?;
            print_tasks(&repo.find_by_priority(priority));
            Ok(false)
        }
        Command::Search { keyword } => {
            print_tasks(&repo.search_by_keyword(&keyword));
            Ok(false)
        }
        Command::Status { status } => {
            print_tasks(&repo.filter_by_status(status == StatusArg::Completed));
            Ok(false)
        }
        Command::Summary => {
            println!("{}", repo.summary());
            Ok(false)
        }
    }
}

fn print_tasks(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for task in tasks {
        println!("{task}");
    }
}
