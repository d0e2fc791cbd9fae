#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::time::{Duration, Instant};

use anyhow::Context;
use blockfall::Time;
use blockfall::app::{App, AppResult};
use blockfall::components::Input;
use blockfall::config::{self, GameConfig};
use blockfall::{systems, ui};
use crossterm::event::KeyCode;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

fn main() -> AppResult<()> {
    // Log to a file so the TUI output stays clean
    let log_path = "blockfall.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .context("failed to create log file")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("starting blockfall");

    // Bad option values must fail fast; a missing or unreadable file falls
    // back to the defaults.
    let config = match config::loader::load_config_from_file() {
        Ok(config) => {
            info!("configuration loaded");
            config
        }
        Err(config::loader::ConfigError::Invalid(msg)) => {
            return Err(anyhow::anyhow!("invalid configuration: {msg}"));
        }
        Err(e) => {
            error!("failed to load configuration: {e}");
            GameConfig::default()
        }
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(config);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("game error: {err:?}");
    }

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> AppResult<()> {
    let frame_rate = Duration::from_millis(33); // ~30 FPS
    let mut last_render = Instant::now();

    // Flush any pending input events that might be in the buffer
    while crossterm::event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    loop {
        if last_render.elapsed() >= frame_rate {
            terminal.draw(|f| ui::render(f, &mut app))?;
            last_render = Instant::now();
        }

        // Advance the gravity clock. The interval is level-derived and
        // re-read inside the tick system, so level changes reschedule
        // without an explicit timer swap.
        {
            let mut time = app.world.resource_mut::<Time>();
            time.update();
        }
        let delta_seconds = app.world.resource::<Time>().delta_seconds();
        systems::game_tick_system(&mut app.world, delta_seconds);

        for game_event in app.drain_events() {
            debug!("event: {game_event:?}");
        }

        if app.should_quit {
            return Ok(());
        }

        // Each key handler runs to completion before the next event is
        // read; the timer and the key path never interleave.
        if crossterm::event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                debug!("key event: {key:?}");

                match key.code {
                    KeyCode::Char('q') => {
                        app.should_quit = true;
                        continue;
                    }
                    KeyCode::Enter => {
                        app.start();
                        continue;
                    }
                    KeyCode::Char('p') | KeyCode::Esc => {
                        app.toggle_pause();
                        continue;
                    }
                    _ => {}
                }

                {
                    let mut input = app.world.resource_mut::<Input>();
                    match key.code {
                        KeyCode::Left | KeyCode::Char('a') => input.left = true,
                        KeyCode::Right | KeyCode::Char('d') => input.right = true,
                        KeyCode::Down | KeyCode::Char('s') => input.soft_drop = true,
                        KeyCode::Up | KeyCode::Char('w' | ' ') => input.rotate = true,
                        _ => (),
                    }
                }
                systems::input_system(&mut app.world);
            }
        }
    }
}
