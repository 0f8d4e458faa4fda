//! Command-line surface for the task board.
//!
//! # Responsibility
//! - Map subcommands onto board actions of `kanban_core`.
//! - Print notices to stderr and board listings to stdout.
//!
//! Every invocation is one event: queued saves are flushed before exit, and
//! a pending deletion expires with the process.

use clap::{Parser, Subcommand, ValueEnum};
use kanban_core::db::open_db;
use kanban_core::{
    default_log_level, init_logging, Board, ImportOutcome, MoveDirection, Notice, NoticeLevel,
    Notifier, SqliteSlotStore, SyncConfig, SyncCoordinator, SystemClock, TaskDraft, TaskStatus,
    TaskStore,
};
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "kanban", version, about = "Single-board task tracker")]
struct Cli {
    /// SQLite database holding the board.
    #[arg(long, env = "KANBAN_DB", default_value = "kanban.sqlite3")]
    db: PathBuf,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "KANBAN_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "KANBAN_LOG_DIR")]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print every task grouped by column.
    List,
    /// Create a task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = StatusArg::Todo)]
        status: StatusArg,
    },
    /// Change a task. Omitted fields keep their current values.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Move a task one column.
    Move {
        id: String,
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Delete a task.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Write `kanban-tasks.json` into a directory.
    Export {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Replace the board with the tasks of a JSON document.
    Import {
        file: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Check core linkage.
    Ping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Todo,
    Inprogress,
    Done,
}

impl From<StatusArg> for TaskStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Todo => Self::Todo,
            StatusArg::Inprogress => Self::InProgress,
            StatusArg::Done => Self::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    Left,
    Right,
}

impl From<DirectionArg> for MoveDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Left => Self::Left,
            DirectionArg::Right => Self::Right,
        }
    }
}

/// Prints notices to stderr, mirroring them into the log.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        let tag = match notice.level() {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        info!("event=notice module=cli status={tag}");
        eprintln!("[{tag}] {}", notice.message());
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("[error] {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("[error] {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    if matches!(cli.command, Command::Ping) {
        println!("kanban_core ping={}", kanban_core::ping());
        println!("kanban_core version={}", kanban_core::core_version());
        return Ok(true);
    }

    let conn = open_db(&cli.db)?;
    let config = SyncConfig::default();
    let mut sync = SyncCoordinator::start(
        Board::headless(),
        TaskStore::new(SqliteSlotStore::new(&conn), &config),
        SystemClock,
        StderrNotifier,
        &config,
    );

    let success = match cli.command {
        Command::Ping => true,
        Command::List => {
            print_board(sync.board());
            true
        }
        Command::Add {
            title,
            description,
            status,
        } => report_submit(sync.submit(&TaskDraft::create(title, description, status.into()))),
        Command::Edit {
            id,
            title,
            description,
            status,
        } => match edit_draft(sync.board(), id, title, description, status) {
            Some(draft) => report_submit(sync.submit(&draft)),
            None => report_submit(None),
        },
        Command::Move { id, direction } => sync.move_task(&id, direction.into()),
        Command::Delete { id, yes } => sync.delete(&id, &|prompt: &str| yes || ask(prompt)),
        Command::Export { out_dir } => match sync.export_to_dir(&out_dir) {
            Ok(path) => {
                println!("{}", path.display());
                true
            }
            Err(_) => false,
        },
        Command::Import { file, yes } => matches!(
            sync.import_from_path(&file, &|prompt: &str| yes || ask(prompt)),
            Ok(ImportOutcome::Imported(_))
        ),
    };

    sync.shutdown();
    Ok(success)
}

/// Builds an edit draft pre-filled from the stored task.
///
/// Returns `None` when the id is not on the board.
fn edit_draft(
    board: &Board,
    id: String,
    title: Option<String>,
    description: Option<String>,
    status: Option<StatusArg>,
) -> Option<TaskDraft> {
    let current = board.get(&id)?;
    Some(TaskDraft {
        title: title.unwrap_or_else(|| current.title.clone()),
        description: description.unwrap_or_else(|| current.description.clone()),
        status: status.map_or(current.status, TaskStatus::from),
        id: Some(id),
    })
}

fn report_submit(id: Option<String>) -> bool {
    match id {
        Some(id) => {
            println!("{id}");
            true
        }
        None => {
            eprintln!("[error] task not saved: empty title or unknown id");
            false
        }
    }
}

fn print_board(board: &Board) {
    let counts = board.counts();
    for status in TaskStatus::ALL {
        println!("== {status} ({})", counts.get(status));
        for task in board.tasks().iter().filter(|task| task.status == status) {
            if task.description.is_empty() {
                println!("  {}  {}", task.id, task.title);
            } else {
                println!("  {}  {} - {}", task.id, task.title, task.description);
            }
        }
    }
}

fn ask(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::{edit_draft, StatusArg};
    use kanban_core::{
        Board, ManualClock, MemorySlotStore, RecordingNotifier, SyncConfig, SyncCoordinator,
        TaskDraft, TaskStatus, TaskStore,
    };

    #[test]
    fn edit_keeps_fields_that_were_not_given() {
        let slot = MemorySlotStore::new();
        let notifier = RecordingNotifier::new();
        let config = SyncConfig::default();
        let mut sync = SyncCoordinator::start(
            Board::headless(),
            TaskStore::new(&slot, &config),
            ManualClock::new(1_000),
            &notifier,
            &config,
        );
        let id = sync
            .submit(&TaskDraft::create("Report", "draft v2", TaskStatus::Done))
            .unwrap();

        let draft = edit_draft(
            sync.board(),
            id.clone(),
            Some("Report final".to_string()),
            None,
            None,
        )
        .unwrap();
        sync.submit(&draft).unwrap();

        let task = sync.board().get(&id).unwrap();
        assert_eq!(task.title, "Report final");
        assert_eq!(task.description, "draft v2");
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn edit_overrides_given_fields_and_rejects_unknown_ids() {
        let mut board = Board::headless();
        let id = board
            .apply_draft(&TaskDraft::create("Plan", "notes", TaskStatus::Todo), 1)
            .unwrap();

        let draft = edit_draft(
            &board,
            id,
            None,
            Some(String::new()),
            Some(StatusArg::Inprogress),
        )
        .unwrap();
        assert_eq!(draft.title, "Plan");
        assert_eq!(draft.description, "");
        assert_eq!(draft.status, TaskStatus::InProgress);

        assert!(edit_draft(&board, "missing".to_string(), None, None, None).is_none());
    }
}
