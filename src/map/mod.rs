mod camera;
mod engine;
mod geometry;
mod projection;
mod province;
mod renderer;
mod spatial;

pub use camera::{Camera, MAX_ZOOM, MIN_ZOOM};
pub use engine::MapEngine;
pub use geometry::{
    normalize_ring, point_in_ring, resolve_triangle, triangulate_ring, Point, Rect, Ring, CLOSING_EPSILON,
};
pub use projection::{geo_to_screen, GeoBounds, Projection};
pub use province::{Province, ProvinceGeometry, Rgba};
pub use renderer::{DisplaySettings, MapRenderer, RenderStats, RenderTarget};
pub use spatial::{RingGrid, RingRef};
