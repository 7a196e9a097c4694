use super::camera::Camera;
use super::engine::MapEngine;
use super::geometry::Point;
use super::province::Rgba;

/// Drawing backend. Coordinates arrive in screen space (camera already applied).
pub trait RenderTarget {
    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Rgba);
    fn draw_line(&mut self, from: Point, to: Point, color: Rgba);
}

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub rings_filled: usize,
    pub rings_outlined: usize,
    pub triangles: usize,
    /// Triples dropped for referencing a vertex outside their ring
    pub triangles_skipped: usize,
    pub segments: usize,
}

/// Display settings for the two passes
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub show_fill: bool,
    pub show_outlines: bool,
    pub outline_color: Rgba,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_fill: true,
            show_outlines: true,
            outline_color: Rgba::DARK_GRAY,
        }
    }
}

/// Draws the provinces of an engine through a [`RenderTarget`]
#[derive(Debug, Clone, Default)]
pub struct MapRenderer {
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the fill pass then the outline pass over every ring whose bounds
    /// intersect the camera's view of a `width` x `height` viewport
    pub fn render<T: RenderTarget>(
        &self,
        engine: &MapEngine,
        camera: &Camera,
        width: usize,
        height: usize,
        target: &mut T,
    ) -> RenderStats {
        let view = camera.view_rect(width, height);
        let mut stats = RenderStats::default();

        if self.settings.show_fill {
            for (province, ring) in engine.visible_rings(&view) {
                stats.rings_filled += 1;
                for triangle in province.geometry.triangles(ring) {
                    match triangle {
                        Some([a, b, c]) => {
                            target.fill_triangle(
                                camera.world_to_screen(a),
                                camera.world_to_screen(b),
                                camera.world_to_screen(c),
                                province.color,
                            );
                            stats.triangles += 1;
                        }
                        None => stats.triangles_skipped += 1,
                    }
                }
            }
        }

        if self.settings.show_outlines {
            let color = self.settings.outline_color;
            for (province, ring) in engine.visible_rings(&view) {
                let points = &province.geometry.polygons[ring];
                if points.len() < 2 {
                    continue;
                }
                stats.rings_outlined += 1;
                for (i, &from) in points.iter().enumerate() {
                    let to = points[(i + 1) % points.len()];
                    target.draw_line(camera.world_to_screen(from), camera.world_to_screen(to), color);
                    stats.segments += 1;
                }
            }
        }

        stats
    }

    pub fn toggle_fill(&mut self) {
        self.settings.show_fill = !self.settings.show_fill;
    }

    pub fn toggle_outlines(&mut self) {
        self.settings.show_outlines = !self.settings.show_outlines;
    }
}
