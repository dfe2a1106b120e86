//! formpilot - Terminal W-7 form workflow
//!
//! Guides an operator from a client spreadsheet to a filled W-7 PDF by
//! driving the remote form service one step at a time.

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use formpilot::application::{App, AppMode};
use formpilot::infrastructure::{init_logging, Config, DownloadDirectory, HttpGateway};
use formpilot::presentation::{render_ui, InputHandler};

/// Entry point for the formpilot terminal application.
///
/// Reads configuration, starts file logging, probes the form service and
/// runs the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if logging or terminal setup fails, or if the terminal
/// interface fails during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    let logging = init_logging(&config)?;
    tracing::info!(
        api_url = config.api_url(),
        log_file = %logging.log_file_path.display(),
        "starting formpilot"
    );

    let gateway = HttpGateway::new(config.api_url())?;
    let sink = DownloadDirectory::new(&config.download_dir);

    let mut app = App::default();
    app.check_service(&gateway);
    if let Some(file) = &config.file {
        app.filename_input = file.display().to_string();
        app.submit_file_path();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &gateway, &sink);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal failure");
        println!("{err:?}");
    }
    tracing::info!("formpilot exiting");

    Ok(())
}

/// Main application event loop.
///
/// Draws, then either runs the queued remote action or waits for one key
/// press. Keys typed while a call was running are discarded.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    gateway: &HttpGateway,
    sink: &DownloadDirectory,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if app.pending.is_some() {
            app.run_pending(gateway, sink);
            while event::poll(Duration::ZERO)? {
                event::read()?;
            }
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    event::KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => {
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
