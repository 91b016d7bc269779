mod app;
mod catalog;
mod config;
mod dialogs;
mod error;
mod launcher;
mod logging;
mod theme;
mod ui;

use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor::Show;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};

use app::App;
use config::ConfigStore;
use launcher::{Launch, SystemLauncher};

const TICK: Duration = Duration::from_millis(200);

type Term = Terminal<CrosstermBackend<Stdout>>;

fn main() -> Result<()> {
    let log = logging::init();
    info!(log = ?log.as_ref().map(|handle| &handle.path), "starting launcher");

    let store = ConfigStore::new(config::default_path());
    let mut app = App::new(store.clone(), SystemLauncher)
        .with_context(|| format!("loading {}", store.path().display()))?;

    let mut terminal = setup_terminal().context("entering terminal UI")?;
    let result = event_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal).context("restoring terminal")?;

    if let Err(e) = &result {
        error!("event loop failed: {e:#}");
    }
    info!("launcher exiting");
    result
}

fn setup_terminal() -> io::Result<Term> {
    // Leave raw mode before the default hook prints the panic message.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn event_loop<L: Launch>(terminal: &mut Term, app: &mut App<L>) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
