mod import;
mod logging;
mod tui;

use clap::{Parser, Subcommand};
use dirjump_core::{path_utils, Config, Error, SelectionState, Store};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

// Exit codes consumed by the shell wrapper.
const EXIT_OK: u8 = 0;
const EXIT_STORE_IO: u8 = 1;
const EXIT_INVALID: u8 = 2;
const EXIT_CANCELLED: u8 = 3;
const EXIT_EMPTY: u8 = 4;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse shortcut file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Cannot locate a data directory for the visit store")]
    NoDataDir,
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Core(
                Error::DuplicateName(_) | Error::InvalidName(_) | Error::NotFound(_),
            ) => EXIT_INVALID,
            CliError::Core(Error::ConfigParse(_)) | CliError::Yaml(_) => EXIT_INVALID,
            _ => EXIT_STORE_IO,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "dj",
    version,
    about = "Frecency-ranked interactive directory jumper",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Jump straight to a shortcut by name, skipping the picker.
    target: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Record a directory visit (called by the shell hook on every cd)
    Visit { path: PathBuf },
    /// Pin a directory under a shortcut name (defaults to the current one)
    Pin {
        name: String,
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// List all shortcuts
    List,
    /// Delete a shortcut
    Unpin { name: String },
    /// Import shortcuts from a YAML list of {name, path} entries
    Import { file: PathBuf },
    /// Show store location, size and entry counts
    Status,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("dj: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn store_dir() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|d| d.join("dirjump"))
        .ok_or(CliError::NoDataDir)
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dirjump").join("config.toml"))
}

fn load_config() -> Result<Config, CliError> {
    match config_path() {
        Some(path) => Ok(Config::load(&path)?),
        None => Ok(Config::default()),
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn run(cli: Cli) -> Result<u8, CliError> {
    let config = load_config()?;
    let store = Store::open(&store_dir()?)?;

    match cli.command {
        Some(Command::Visit { path }) => {
            let canonical = store.record_visit(&path)?;
            tracing::debug!(path = %canonical.display(), "Visit recorded");
            store.maybe_prune(&config.prune)?;
            Ok(EXIT_OK)
        }
        Some(Command::Pin { name, path }) => {
            let target = match path {
                Some(path) => path,
                None => std::env::current_dir().map_err(CliError::Io)?,
            };
            let canonical = path_utils::canonicalize(&target)?;
            let canonical = canonical
                .to_str()
                .ok_or_else(|| Error::InvalidPath(canonical.clone()))?;
            store.add_shortcut(&name, canonical)?;
            println!("pinned {name} -> {canonical}");
            Ok(EXIT_OK)
        }
        Some(Command::List) => {
            for shortcut in store.list_shortcuts()? {
                println!("{}\t{}", shortcut.name, shortcut.path);
            }
            Ok(EXIT_OK)
        }
        Some(Command::Unpin { name }) => {
            store.delete_shortcut(&name)?;
            println!("unpinned {name}");
            Ok(EXIT_OK)
        }
        Some(Command::Import { file }) => {
            let entries = import::read_entries(&file)?;
            let report = store.import_shortcuts(&entries)?;
            println!("imported {} shortcut(s)", report.added.len());
            for (name, reason) in &report.skipped {
                eprintln!("dj: skipped '{name}': {reason}");
            }
            Ok(EXIT_OK)
        }
        Some(Command::Status) => {
            let health = store.health()?;
            println!("store: {}", health.path);
            println!("size: {} bytes", health.disk_size);
            for (table, count) in &health.entry_counts {
                println!("{table}: {count}");
            }
            Ok(EXIT_OK)
        }
        None => match cli.target {
            Some(name) => jump_to_shortcut(&store, &name),
            None => interactive(&store, &config),
        },
    }
}

/// `dj <name>`: bypass the picker entirely.
fn jump_to_shortcut(store: &Store, name: &str) -> Result<u8, CliError> {
    let shortcut = store
        .find_shortcut(name)?
        .ok_or_else(|| Error::NotFound(name.to_string()))?;
    if !Path::new(&shortcut.path).is_dir() {
        tracing::warn!(name, path = shortcut.path, "Shortcut target does not exist");
        eprintln!("dj: warning: '{}' points to missing {}", name, shortcut.path);
    }
    println!("{}", shortcut.path);
    Ok(EXIT_OK)
}

fn interactive(store: &Store, config: &Config) -> Result<u8, CliError> {
    // Snapshot once; a writer in another terminal may land after this, which
    // is the accepted staleness window.
    let records = store.load_all_visits()?;
    let shortcuts = store.list_shortcuts()?;
    if records.is_empty() && shortcuts.is_empty() {
        eprintln!("dj: nothing to select yet; visit some directories first");
        return Ok(EXIT_EMPTY);
    }

    let mut state = SelectionState::new(&records, &shortcuts, now_secs(), config.jump_step);
    match tui::run(&mut state, config, &shortcuts)? {
        Some(path) => {
            // The single write of the session: the chosen destination. A
            // vanished directory only warns; store failures are hard errors.
            match store.record_visit(Path::new(&path)) {
                Ok(_) => {}
                Err(e @ (Error::Canonicalize(..) | Error::InvalidPath(_))) => {
                    tracing::warn!(path, error = %e, "Chosen path no longer resolves");
                    eprintln!("dj: warning: {e}");
                }
                Err(e) => return Err(e.into()),
            }
            println!("{path}");
            Ok(EXIT_OK)
        }
        None => Ok(EXIT_CANCELLED),
    }
}
