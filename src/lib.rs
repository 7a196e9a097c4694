//! Administrative-region map engine.
//!
//! Loads GeoJSON region boundaries, projects them into a fixed viewport, triangulates
//! every ring for filled rendering and answers hit-test and identifier queries.

pub mod braille;
pub mod data;
pub mod error;
pub mod map;

pub use data::{FeatureFilter, NutsFallback};
pub use error::{LoadError, Result};
pub use map::{Camera, MapEngine, MapRenderer, Point, Province, Rect, RenderTarget, Rgba};
