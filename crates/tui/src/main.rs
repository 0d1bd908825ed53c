mod app;
mod events;
mod persist;
mod strings;
mod terminal;
mod theme;
mod ui;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use terminal::TerminalGuard;

fn main() -> Result<()> {
    let _log_guard = init_logging()?;
    let mut app = app::App::new()?;
    let mut term = TerminalGuard::new()?;
    let res = events::run(&mut term.terminal, &mut app);
    drop(term);
    app.finish();
    res
}

// The terminal is the UI, so logs go to a rolling file under the data dir.
// `OPCON_LOG` selects the filter.
fn init_logging() -> Result<Option<WorkerGuard>> {
    let Some(dir) = persist::log_dir() else {
        return Ok(None);
    };
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::daily(dir, "opcon.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("OPCON_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}
