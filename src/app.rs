use province_map::{Camera, MapEngine, MapRenderer, Point, Province, Rgba};

/// Zoom step for keyboard and scroll wheel
const ZOOM_STEP: f64 = 1.25;

/// Braille pixel size of the map area for a terminal of `width` x `height` cells.
/// Accounts for the border (2 chars horizontal) and border plus status bar (3 rows).
pub fn map_pixels(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    (inner_width * 2, inner_height * 4)
}

/// Convert a terminal column/row to braille pixel coordinates inside the map border
fn cell_to_pixel(col: u16, row: u16) -> Point {
    let px = (col.saturating_sub(1) as f64) * 2.0;
    let py = (row.saturating_sub(1) as f64) * 4.0;
    Point::new(px, py)
}

pub struct App {
    pub engine: MapEngine,
    pub camera: Camera,
    pub renderer: MapRenderer,
    /// Map area in braille pixels
    pub width: usize,
    pub height: usize,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Set once a drag moves, so the release does not count as a click
    dragged: bool,
    /// Id of the province picked with the mouse
    pub selected: Option<String>,
}

impl App {
    /// Wrap a loaded engine; the camera starts as the identity view of its viewport
    pub fn new(engine: MapEngine, width: usize, height: usize) -> Self {
        let (vw, vh) = engine.viewport();
        let mut camera = Camera::centered(vw, vh);
        camera.set_viewport(width, height);
        Self {
            engine,
            camera,
            renderer: MapRenderer::new(),
            width,
            height,
            should_quit: false,
            last_mouse: None,
            dragged: false,
            selected: None,
        }
    }

    /// Update map area size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (w, h) = map_pixels(width, height);
        self.width = w;
        self.height = h;
        self.camera.set_viewport(w, h);
    }

    /// Pan the map by a braille-pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.camera.pan(-dx as f64, -dy as f64);
    }

    pub fn zoom_in(&mut self) {
        let center = Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0);
        self.camera.zoom_at(center, ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        let center = Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0);
        self.camera.zoom_at(center, 1.0 / ZOOM_STEP);
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        self.camera.zoom_at(cell_to_pixel(col, row), ZOOM_STEP);
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        self.camera.zoom_at(cell_to_pixel(col, row), 1.0 / ZOOM_STEP);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn begin_drag(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Drag pans so the map follows the cursor
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = (col as i32 - last_x as i32) * 2;
            let dy = (row as i32 - last_y as i32) * 4;
            if dx != 0 || dy != 0 {
                self.camera.pan(dx as f64, dy as f64);
                self.dragged = true;
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Release ends the drag; a release without movement selects the province under the cursor
    pub fn end_drag(&mut self, col: u16, row: u16) {
        if self.last_mouse.is_some() && !self.dragged {
            self.select_at(col, row);
        }
        self.last_mouse = None;
        self.dragged = false;
    }

    /// Select the province under a terminal cell, or clear the selection over empty space
    pub fn select_at(&mut self, col: u16, row: u16) {
        let world = self.camera.screen_to_world(cell_to_pixel(col, row));
        self.selected = self.engine.province_at(world).map(|p| p.id.clone());
        match &self.selected {
            Some(id) => log::debug!("selected province {id}"),
            None => log::debug!("no province at ({:.1}, {:.1})", world.x, world.y),
        }
    }

    pub fn selected_province(&self) -> Option<&Province> {
        self.selected.as_deref().and_then(|id| self.engine.province_by_id(id))
    }

    /// Paint the selected province red
    pub fn mark_selected(&mut self) {
        if let Some(id) = &self.selected {
            self.engine.set_color(id, Rgba::RED);
        }
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.camera.zoom)
    }

    /// Name, id and country of the current selection
    pub fn selection_label(&self) -> String {
        match self.selected_province() {
            Some(p) if p.country_code.is_empty() => format!("{} [{}]", p.display_name(), p.id),
            Some(p) => format!("{} [{}] {}", p.display_name(), p.id, p.country_code),
            None => "none".to_string(),
        }
    }
}
