use crate::app::App;
use province_map::braille::BrailleCanvas;
use province_map::Rgba;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Regions ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut canvas = BrailleCanvas::new(inner.width as usize, inner.height as usize);
    let stats = app.renderer.render(
        &app.engine,
        &app.camera,
        canvas.pixel_width(),
        canvas.pixel_height(),
        &mut canvas,
    );
    log::trace!(
        "frame: {} rings filled, {} triangles, {} segments",
        stats.rings_filled,
        stats.triangles,
        stats.segments
    );

    frame.render_widget(MapWidget { canvas }, inner);
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Braille canvas drawn cell by cell in the color last written to each cell
struct MapWidget {
    canvas: BrailleCanvas,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..self.canvas.height().min(area.height as usize) {
            let y = area.y + row as u16;
            for (col, (ch, color)) in self.canvas.row_cells(row).enumerate() {
                if col >= area.width as usize {
                    break;
                }
                let Some(color) = color else { continue };
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col as u16;
                buf[(x, y)].set_char(ch).set_fg(to_color(color));
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.renderer.settings;

    let status = Line::from(vec![
        Span::styled(" Regions: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.engine.len().to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" Selected: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.selection_label(), Style::default().fg(Color::Magenta)),
        Span::raw(" "),
        // Toggle indicators
        Span::styled(
            if settings.show_fill { "[F]ill " } else { "[f]ill " },
            Style::default().fg(if settings.show_fill { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(
            if settings.show_outlines { "[O]utline " } else { "[o]utline " },
            Style::default().fg(if settings.show_outlines { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(
            "| hjkl:pan +/-:zoom click:select x:mark q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(status);
    frame.render_widget(paragraph, area);
}
