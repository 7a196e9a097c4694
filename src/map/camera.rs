use super::geometry::{Point, Rect};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// 2D view transform: world point `target` appears at screen point `offset`,
/// scaled by `zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub target: Point,
    pub offset: Point,
    pub zoom: f64,
}

impl Camera {
    pub fn new(target: Point, offset: Point, zoom: f64) -> Self {
        Self {
            target,
            offset,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Identity view over a viewport of the given size
    pub fn centered(width: usize, height: usize) -> Self {
        let center = Point::new(width as f64 / 2.0, height as f64 / 2.0);
        Self::new(center, center, 1.0)
    }

    #[inline(always)]
    pub fn world_to_screen(&self, world: Point) -> Point {
        (world - self.target) * self.zoom + self.offset
    }

    #[inline(always)]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        (screen - self.offset) / self.zoom + self.target
    }

    /// World-space rectangle covered by the viewport, from its inverse-transformed corners
    pub fn view_rect(&self, width: usize, height: usize) -> Rect {
        let (w, h) = (width as f64, height as f64);
        let corners = [
            self.screen_to_world(Point::new(0.0, 0.0)),
            self.screen_to_world(Point::new(w, 0.0)),
            self.screen_to_world(Point::new(0.0, h)),
            self.screen_to_world(Point::new(w, h)),
        ];
        let mut rect = Rect::new(corners[0], corners[0]);
        for c in &corners[1..] {
            rect.min = rect.min.min(*c);
            rect.max = rect.max.max(*c);
        }
        rect
    }

    /// Keep the same world point under the viewport center after a resize
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.offset = Point::new(width as f64 / 2.0, height as f64 / 2.0);
    }

    /// Pan by a screen-space delta (drag direction moves the map with the cursor)
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.target -= Point::new(dx, dy) / self.zoom;
    }

    /// Multiply zoom by `factor`, keeping the world point under `screen` fixed
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        let anchor = self.screen_to_world(screen);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.target = anchor - (screen - self.offset) / self.zoom;
    }
}
