use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::geometry::{point_in_ring, Point, Rect};
use super::projection::{GeoBounds, Projection};
use super::province::{Province, Rgba};
use super::spatial::RingGrid;
use crate::data::{self, FeatureFilter};
use crate::error::{LoadError, Result};

/// Approximate number of grid cells along the longer viewport axis
const GRID_DIVISIONS: f64 = 32.0;

/// Owns every loaded province plus the projection inputs used to build them.
///
/// Loading runs as a fixed pipeline: filter, global bounds (pass 1), projection and
/// triangulation (pass 2), then a single bounds-indexing pass. Geometry is fixed
/// afterwards; [`MapEngine::set_color`] is the only mutator.
#[derive(Debug)]
pub struct MapEngine {
    provinces: Vec<Province>,
    /// First occurrence of each identifier
    by_id: HashMap<String, usize>,
    bounds: GeoBounds,
    width: usize,
    height: usize,
    filter: FeatureFilter,
    grid: RingGrid,
}

impl MapEngine {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            provinces: Vec::new(),
            by_id: HashMap::new(),
            bounds: GeoBounds::EMPTY,
            width,
            height,
            filter: FeatureFilter::default(),
            grid: RingGrid::new(1.0),
        }
    }

    pub fn with_filter(mut self, filter: FeatureFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Load a GeoJSON file, replacing anything loaded before.
    /// On error the engine is left empty. Returns the number of stored provinces.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        log::info!("Loading map definition from {}", path.display());

        match fs::read(path) {
            Ok(mut bytes) => self.load_bytes(&mut bytes),
            Err(source) => {
                let err = LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                };
                log::error!("Map load failed: {}", err);
                self.clear();
                Err(err)
            }
        }
    }

    /// Load from an in-memory GeoJSON document
    pub fn load_str(&mut self, json: &str) -> Result<usize> {
        let mut bytes = json.as_bytes().to_vec();
        self.load_bytes(&mut bytes)
    }

    fn load_bytes(&mut self, bytes: &mut [u8]) -> Result<usize> {
        self.clear();
        let result = self.ingest(bytes);
        if let Err(e) = &result {
            log::error!("Map load failed: {}", e);
            self.clear();
        }
        result
    }

    fn ingest(&mut self, bytes: &mut [u8]) -> Result<usize> {
        let features = data::parse_features(bytes)?;
        let total = features.len();
        let candidates = data::select_candidates(features, &self.filter)?;

        // Pass 1: every coordinate must be seen before anything is projected
        self.bounds = data::compute_bounds(&candidates);
        log::info!(
            "{} of {} features accepted; bounds lat [{:.4}, {:.4}] lon [{:.4}, {:.4}]",
            candidates.len(),
            total,
            self.bounds.min_lat,
            self.bounds.max_lat,
            self.bounds.min_lon,
            self.bounds.max_lon,
        );

        // Pass 2
        let projection = self.projection();
        for candidate in &candidates {
            if let Some(province) = data::build_province(candidate, &projection) {
                log::debug!(
                    "Loaded province {} with {} polygons",
                    province.id,
                    province.geometry.ring_count()
                );
                self.insert(province);
            }
        }

        self.index_bounds();
        log::info!("Successfully loaded {} provinces", self.provinces.len());
        Ok(self.provinces.len())
    }

    /// Duplicate identifiers are stored but shadowed: lookups resolve to the first
    fn insert(&mut self, province: Province) {
        match self.by_id.entry(province.id.clone()) {
            Entry::Occupied(_) => {
                log::warn!("Duplicate region id {:?}; lookups resolve to the first occurrence", province.id);
            }
            Entry::Vacant(slot) => {
                slot.insert(self.provinces.len());
            }
        }
        self.provinces.push(province);
    }

    /// Cache per-ring bounds and build the hit-test grid. Runs once per load.
    fn index_bounds(&mut self) {
        for province in &mut self.provinces {
            province.geometry.index_bounds();
        }
        let cell_size = (self.width.max(self.height) as f64 / GRID_DIVISIONS).max(1.0);
        self.grid = RingGrid::build(&self.provinces, cell_size);
        log::debug!("Hit-test grid: {} cells of {:.1} units", self.grid.cell_count(), cell_size);
    }

    fn clear(&mut self) {
        self.provinces.clear();
        self.by_id.clear();
        self.bounds = GeoBounds::EMPTY;
        self.grid = RingGrid::new(1.0);
    }

    /// All provinces in load order
    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    pub fn province_by_id(&self, id: &str) -> Option<&Province> {
        self.by_id.get(id).map(|&idx| &self.provinces[idx])
    }

    /// Recolor a province. Returns false (and changes nothing) for an unknown id.
    pub fn set_color(&mut self, id: &str, color: Rgba) -> bool {
        match self.by_id.get(id) {
            Some(&idx) => {
                self.provinces[idx].color = color;
                true
            }
            None => false,
        }
    }

    /// First province (in load order) with a ring containing the world-space point
    pub fn province_at(&self, point: Point) -> Option<&Province> {
        self.grid
            .candidates(point)
            .iter()
            .find(|r| {
                let geometry = &self.provinces[r.province].geometry;
                geometry.polygon_bounds.get(r.ring).is_some_and(|b| b.contains(point))
                    && geometry
                        .polygons
                        .get(r.ring)
                        .is_some_and(|ring| point_in_ring(point, ring))
            })
            .map(|r| &self.provinces[r.province])
    }

    /// Rings whose cached bounds overlap the world-space view rectangle
    pub fn visible_rings<'a>(&'a self, view: &'a Rect) -> impl Iterator<Item = (&'a Province, usize)> + 'a {
        self.provinces.iter().flat_map(move |province| {
            (0..province.geometry.ring_count())
                .filter(move |&ring| province.geometry.ring_visible(ring, view))
                .map(move |ring| (province, ring))
        })
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    /// Viewport dimensions the projection targets
    pub fn viewport(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The projection shared by every point of the current load
    pub fn projection(&self) -> Projection {
        Projection::new(self.bounds, self.width as f64, self.height as f64)
    }
}
