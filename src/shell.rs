//! Presentation shells. Each one only calls scheduler operations and renders
//! what comes back.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::app::App;
use crate::scheduler::Scheduler;
use crate::ui;

/// Something that drives a scheduler from user input until the user quits.
pub trait Driver {
    fn drive(&mut self, scheduler: &mut Scheduler) -> Result<()>;
}

/// Full-screen panel interface.
pub struct TerminalUi {
    tick: Duration,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self {
            tick: Duration::from_millis(100),
        }
    }
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for TerminalUi {
    fn drive(&mut self, scheduler: &mut Scheduler) -> Result<()> {
        // Set up the terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let mut app = App::new(scheduler);
        let res = run_app(&mut terminal, &mut app, self.tick);

        // Restore the terminal even when the loop failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        if let Err(err) = &res {
            tracing::error!(error = %err, "terminal interface exited with error");
        }
        res
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick: Duration,
) -> Result<()> {
    loop {
        app.clear_expired_notification();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                // Windows reports both press and release
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !app.handle_key(key) {
                    return Ok(());
                }
            }
        }
    }
}
