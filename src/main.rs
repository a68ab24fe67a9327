use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute, terminal,
};
use std::fs::File;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use flappy_maps::assets::ProceduralSource;
use flappy_maps::audio::Sfx;
use flappy_maps::render::{self, PixelBuf, Viewport};
use flappy_maps::{GameError, GameEvent, Session, Settings, Status};

const LOG_ENV: &str = "FLAPPY_MAPS_LOG";

/// Log to the file named by `FLAPPY_MAPS_LOG`; stderr would tear the alternate screen.
fn init_logging() {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("cannot open log file {}: {e}", path.to_string_lossy()),
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Restarted => log::info!("Restart complete"),
        GameEvent::Settled => log::info!("Actor settled, end screen up"),
        _ => log::trace!("{event:?}"),
    }
}

fn main() -> Result<(), GameError> {
    init_logging();
    let settings = Settings::load()?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Flappy Maps starting (seed {seed})");

    let sfx = Sfx::new(settings.sound);
    let frame_dur = Duration::from_millis(settings.frame_ms.max(1));
    let canvas = (settings.canvas_width, settings.canvas_height());
    let mut session = Session::new(settings, ProceduralSource::default(), seed);

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut view = Viewport::fit(buf.width(), buf.height(), canvas.0, canvas.1);

    let start = Instant::now();
    let result = (|| -> io::Result<()> {
        loop {
            let frame_start = Instant::now();

            // Input
            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                            if let Some(ev) = session.primary_action() {
                                sfx.handle_events(&[ev]);
                            }
                        }
                        _ => {}
                    },
                    Event::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            if let Some(ev) = session.primary_action() {
                                sfx.handle_events(&[ev]);
                            }
                        }
                        MouseEventKind::Up(MouseButton::Left) => {
                            let (x, y) = view.cell_to_world(mouse.column, mouse.row);
                            session.click(x, y);
                        }
                        _ => {}
                    },
                    Event::Resize(c, r) => {
                        buf.resize(c as usize, r as usize * 2);
                        view = Viewport::fit(buf.width(), buf.height(), canvas.0, canvas.1);
                        log::debug!("Resized to {c}x{r}");
                    }
                    _ => {}
                }
            }

            // Update
            let events = session.update(start.elapsed());
            events.iter().for_each(log_event);
            sfx.handle_events(&events);

            // Render
            render::draw_frame(&mut buf, &view, &session);
            buf.render(&mut out)?;

            // Frame pacing
            let elapsed = frame_start.elapsed();
            if elapsed < frame_dur {
                std::thread::sleep(frame_dur - elapsed);
            }
        }
    })();

    cleanup(&mut out)?;
    log::info!("Exiting");
    result?;
    match session.status() {
        Status::Failed(e) => Err(e.into()),
        _ => Ok(()),
    }
}
