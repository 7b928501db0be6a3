//! userposts-dashboard binary entry point.
//!
//! Reads configuration, initializes file logging and the terminal in raw
//! mode, runs the TUI event loop on a current-thread runtime, and restores
//! the terminal state on exit.
//!
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use userposts_dashboard::api::HttpDirectory;
use userposts_dashboard::app::config::config_dir;
use userposts_dashboard::app::keymap::Keymap;
use userposts_dashboard::app::settings::{ClientSettings, SettingsOverrides};
use userposts_dashboard::app::{self, AppState, Theme};
use userposts_dashboard::error::Result;
use userposts_dashboard::search::SortKey;

const LOG_FILE: &str = "userposts-dashboard.log";

/// Browse users of a REST directory and read their posts
#[derive(Parser, Debug)]
#[command(name = "userposts-dashboard")]
#[command(version, about)]
struct Args {
    /// Directory host serving /users and /posts
    #[arg(long, env = "USERPOSTS_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Initial sort key: name or company
    #[arg(long)]
    sort_by: Option<SortKey>,

    /// Log file (defaults to the config directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Directory holding theme.conf, keybinds.conf and settings.conf
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

/// Send tracing output to a file; stdout belongs to the TUI.
fn init_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        // No subscriber means tracing macros are no-ops.
        Err(_) => return,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let dir = args.config_dir.clone().unwrap_or_else(config_dir);
    init_logging(&args.log_file.clone().unwrap_or_else(|| dir.join(LOG_FILE)));

    let settings = ClientSettings::load_or_init(&dir).with_overrides(SettingsOverrides {
        base_url: args.base_url,
        timeout_secs: args.timeout_secs,
        sort_by: args.sort_by,
    });
    tracing::info!(
        base_url = %settings.base_url,
        timeout_secs = settings.timeout_secs,
        sort_by = %settings.sort_by,
        config_dir = %dir.display(),
        "starting"
    );

    let client = HttpDirectory::new(&settings.base_url, settings.timeout())
        .with_context(|| format!("cannot use directory at {}", settings.base_url))?;
    tracing::debug!(base = %client.base_url(), "directory client ready");
    let app = AppState::new(
        settings.sort_by,
        Theme::load_or_init(&dir),
        Keymap::load_or_init(&dir),
        settings.base_url.clone(),
    );

    let mut terminal = init_terminal().context("init terminal")?;
    let res = app::run(&mut terminal, app, Arc::new(client)).await;
    restore_terminal(&mut terminal);

    if let Err(err) = &res {
        tracing::error!(error = %err, "application error");
    }
    res
}
