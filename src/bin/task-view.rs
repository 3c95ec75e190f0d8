//! Terminal client for the task tracker.
//!
//! # Environment Variables
//!
//! - `TASK_API_URL`: server base URL (default: `http://127.0.0.1:3000`)
//! - `TASK_VIEW_LOG`: log file path (default: `task-view.log`)
//! - `RUST_LOG`: Logging filter (default: `task_tracker=debug`)

use std::env;
use std::fs::File;
use std::io;
use std::sync::Mutex;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_tracker::view::{App, HttpTaskClient, TaskView, run_app};

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_LOG_PATH: &str = "task-view.log";

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Logs go to a file; anything written to the terminal would corrupt the screen.
fn init_tracing() -> io::Result<()> {
    let log_file = File::create(env_or("TASK_VIEW_LOG", DEFAULT_LOG_PATH))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_tracker=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let base_url = env_or("TASK_API_URL", DEFAULT_API_URL);
    tracing::info!(%base_url, "Starting task view");
    let mut app = App::new(TaskView::new(HttpTaskClient::new(&base_url)));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(error) = &result {
        tracing::error!(%error, "Terminal error");
    }
    result?;
    Ok(())
}
