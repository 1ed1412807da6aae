use std::io;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use countup_core::{AppConfig, HostMotion, MotionPreference};
use countup_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{PageWidget, StatusBarWidget},
    App, Theme,
};

pub fn run(config: AppConfig, reduced_motion: bool) -> Result<()> {
    let override_motion = if reduced_motion {
        Some(true)
    } else {
        config.counter.reduced_motion
    };
    let reduced = HostMotion::detect(override_motion).prefers_reduced_motion();

    let event_handler = EventHandler::new(config.ui.tick_rate_ms, config.ui.animation_fps);
    let title = config.page.title.clone();
    let mut app = App::new(config, Theme::default(), reduced);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(title))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(reduced, "Page started");
    let result = event_loop(&mut terminal, &mut app, &event_handler);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(frames = app.frames_emitted, "Page closed");
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = true;

    loop {
        app.update();

        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            PageWidget::render(frame, chunks[0], app);
            StatusBarWidget::render(frame, chunks[1], app);
        })?;

        if let Some(event) = events.next(needs_fast_update)? {
            match event {
                AppEvent::Key(key) => {
                    app.clear_status();
                    app.handle_action(handle_key_event(key));
                }
                AppEvent::Resize(width, height) => app.resize(width, height),
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
