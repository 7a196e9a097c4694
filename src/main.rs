mod app;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use province_map::{FeatureFilter, MapEngine, NutsFallback};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::Duration;

/// Terminal viewer for GeoJSON administrative regions
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// GeoJSON FeatureCollection of region boundaries
    #[arg(default_value = "assets/map_full.geojson")]
    path: PathBuf,

    /// Features at or above this admin level become provinces
    #[arg(long, default_value_t = 4)]
    min_admin_level: i64,

    /// How the nuts_level tag can admit a feature below the admin level
    #[arg(long, value_enum, default_value_t = NutsFallback::Preserved)]
    nuts_fallback: NutsFallback,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // The projection is fixed at load time, so size it to the terminal before taking it over
    let (cols, rows) = crossterm::terminal::size().context("querying terminal size")?;
    let (width, height) = app::map_pixels(cols as usize, rows as usize);

    let mut engine = MapEngine::new(width, height).with_filter(FeatureFilter {
        min_admin_level: args.min_admin_level,
        nuts_fallback: args.nuts_fallback,
    });
    let count = engine
        .load(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;
    log::info!("{count} provinces ready");

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, App::new(engine, width, height));

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for panning, zooming and selection
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click selects, click and drag pans
        MouseEventKind::Down(MouseButton::Left) => app.begin_drag(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(mouse.column, mouse.row),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width as usize, size.height as usize);

    // Main loop
    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Pan with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                            KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            // Pass toggles
                            KeyCode::Char('f') | KeyCode::Char('F') => app.renderer.toggle_fill(),
                            KeyCode::Char('o') | KeyCode::Char('O') => app.renderer.toggle_outlines(),

                            // Recolor the selection
                            KeyCode::Char('x') | KeyCode::Char('X') => app.mark_selected(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
