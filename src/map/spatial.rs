use std::collections::HashMap;

use super::geometry::{Point, Rect};
use super::province::Province;

/// Location of one ring inside the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RingRef {
    pub province: usize,
    pub ring: usize,
}

/// Uniform grid over ring bounding boxes using conservative approximation.
/// Each ring is indexed into every cell its bbox overlaps, so a point lookup
/// never misses a ring that could contain it (false positives are rejected by
/// the exact ray cast). Entries within a cell stay in store order.
#[derive(Debug)]
pub struct RingGrid {
    cells: HashMap<(i32, i32), Vec<RingRef>>,
    cell_size: f64,
}

impl RingGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size: cell_size.max(f64::EPSILON),
        }
    }

    #[inline(always)]
    fn to_cell(&self, p: Point) -> (i32, i32) {
        let x = (p.x / self.cell_size).floor() as i32;
        let y = (p.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from the cached per-ring bounds. Rings without a bounds entry are not indexed.
    pub fn build(provinces: &[Province], cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (province_idx, province) in provinces.iter().enumerate() {
            for (ring_idx, bounds) in province.geometry.polygon_bounds.iter().enumerate() {
                grid.insert(
                    bounds,
                    RingRef {
                        province: province_idx,
                        ring: ring_idx,
                    },
                );
            }
        }
        grid
    }

    fn insert(&mut self, bounds: &Rect, entry: RingRef) {
        let min_cell = self.to_cell(bounds.min);
        let max_cell = self.to_cell(bounds.max);
        for y in min_cell.1..=max_cell.1 {
            for x in min_cell.0..=max_cell.0 {
                self.cells.entry((x, y)).or_default().push(entry);
            }
        }
    }

    /// Rings whose bounds may contain the point, in store order
    pub fn candidates(&self, p: Point) -> &[RingRef] {
        self.cells
            .get(&self.to_cell(p))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
