//! Campdesk - a keyboard-driven terminal planner for camp agendas.
//!
//! Day-by-day sessions can be added, edited, copied across days, deleted
//! and exported to CSV. `--export <campId>` writes the CSV without
//! starting the TUI.

mod app;
mod form;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use campdesk_core::agenda::{ExportOutcome, SessionGateway};
use campdesk_core::cache::QueryCache;
use campdesk_core::{ApiClient, Config};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written under the cache root while the TUI owns the terminal
const LOG_FILE: &str = "campdesk.log";

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    camp_id: Option<i64>,
    export_camp: Option<i64>,
    out_dir: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--camp" => parsed.camp_id = Some(parse_id(iter.next(), "--camp")?),
            "--export" => parsed.export_camp = Some(parse_id(iter.next(), "--export")?),
            "--out" => {
                let dir = iter.next().context("--out needs a directory")?;
                parsed.out_dir = Some(PathBuf::from(dir));
            }
            other => bail!("Unknown argument: {}", other),
        }
    }
    Ok(parsed)
}

fn parse_id(value: Option<&String>, flag: &str) -> Result<i64> {
    let value = value.with_context(|| format!("{} needs a camp id", flag))?;
    value
        .parse()
        .with_context(|| format!("{} expects a numeric camp id, got {:?}", flag, value))
}

/// Logging to stderr, for headless commands.
fn init_stderr_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Logging to a file, since the TUI owns stdout/stderr.
/// Use RUST_LOG to control the level (e.g., RUST_LOG=campdesk_core=debug).
fn init_file_tracing() -> Option<WorkerGuard> {
    let dir = Config::cache_root().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw)?;
    let mut config = Config::load_with_env()?;
    let out_dir = match args.out_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    if let Some(camp_id) = args.export_camp {
        init_stderr_tracing();
        return export_headless(&config, camp_id, &out_dir).await;
    }

    let Some(camp_id) = args.camp_id.or(config.camp_id) else {
        bail!("No camp selected. Run with --camp <id> or set CAMPDESK_CAMP_ID.");
    };

    let _log_guard = init_file_tracing();
    info!(camp_id, "Campdesk starting");

    if config.camp_id != Some(camp_id) {
        config.camp_id = Some(camp_id);
        if let Err(e) = config.save() {
            tracing::warn!(error = %e, "Failed to remember camp id");
        }
    }

    let mut app = App::new(config, camp_id, out_dir)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Show the last snapshot while the first fetch runs
    app.load_from_cache();
    app.refresh_background();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Campdesk shutting down");
    Ok(())
}

/// Write the agenda CSV for `camp_id` into `out_dir` and exit.
async fn export_headless(config: &Config, camp_id: i64, out_dir: &std::path::Path) -> Result<()> {
    let mut api = ApiClient::new(config.base_url())?;
    if let Some(ref token) = config.api_token {
        api.set_token(token.clone());
    }
    let gateway = SessionGateway::new(api, Arc::new(QueryCache::new()));

    match gateway
        .export_agenda(camp_id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?
    {
        ExportOutcome::Exported(export) => {
            let path = export.write_to(out_dir)?;
            eprintln!("Exported {} sessions to {}", export.rows, path.display());
        }
        ExportOutcome::NothingToExport => {
            eprintln!("{}", campdesk_core::Notice::NothingToExport);
        }
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let args = parse_args(&strings(&["--camp", "12"])).unwrap();
        assert_eq!(args.camp_id, Some(12));
        assert_eq!(args.export_camp, None);

        let args = parse_args(&strings(&["--export", "7", "--out", "/tmp/agendas"])).unwrap();
        assert_eq!(args.export_camp, Some(7));
        assert_eq!(args.out_dir, Some(PathBuf::from("/tmp/agendas")));

        assert_eq!(parse_args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(&strings(&["--camp"])).is_err());
        assert!(parse_args(&strings(&["--camp", "abc"])).is_err());
        assert!(parse_args(&strings(&["--verbose"])).is_err());
    }
}
