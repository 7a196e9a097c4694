use super::geometry::{point_in_ring, resolve_triangle, triangulate_ring, Point, Rect, Ring};

/// 8-bit RGBA fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const RED: Self = Self::new(230, 41, 55, 255);
    pub const DARK_GRAY: Self = Self::new(80, 80, 80, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Deterministic pastel derived from an identifier.
    /// The hash sums the UTF-8 bytes as signed values, so non-ASCII ids can fall below 200.
    pub fn pastel(id: &str) -> Self {
        let hash = id.bytes().fold(0i32, |acc, b| acc.wrapping_add(b as i8 as i32));
        let channel = |h: i32| (200 + h % 55) as u8;
        Self::new(
            channel(hash),
            channel(hash.wrapping_mul(17)),
            channel(hash.wrapping_mul(31)),
            200,
        )
    }
}

/// Projected outline of a province.
///
/// The three vectors run in parallel, one entry per ring. `polygon_bounds` is filled
/// by the indexing pass after load; a ring without a bounds entry is never visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvinceGeometry {
    pub polygons: Vec<Ring>,
    /// Flat vertex-index triples into the matching ring
    pub polygon_indices: Vec<Vec<u32>>,
    pub polygon_bounds: Vec<Rect>,
}

impl ProvinceGeometry {
    /// Append a normalized ring along with its triangulation
    pub(crate) fn push_ring(&mut self, ring: Ring) {
        self.polygon_indices.push(triangulate_ring(&ring));
        self.polygons.push(ring);
    }

    /// Compute one AABB per ring. Stops at the first ring with no points,
    /// leaving it and any later rings without a bounds entry.
    pub(crate) fn index_bounds(&mut self) {
        self.polygon_bounds = self
            .polygons
            .iter()
            .map_while(|ring| Rect::from_points(ring))
            .collect();
    }

    pub fn ring_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Whether a ring's cached bounds overlap the view rectangle
    #[inline]
    pub fn ring_visible(&self, ring: usize, view: &Rect) -> bool {
        self.polygon_bounds
            .get(ring)
            .is_some_and(|bounds| bounds.overlaps(view))
    }

    /// Triangles of one ring, skipping any triple that references a missing vertex
    pub fn triangles(&self, ring: usize) -> impl Iterator<Item = Option<[Point; 3]>> + '_ {
        let points = self.polygons.get(ring).map(Vec::as_slice).unwrap_or(&[]);
        let indices = self.polygon_indices.get(ring).map(Vec::as_slice).unwrap_or(&[]);
        indices
            .chunks(3)
            .map(move |triple| resolve_triangle(points, triple))
    }

    /// Ray-cast against every raw ring; holes are not modeled
    pub fn contains(&self, point: Point) -> bool {
        self.polygons.iter().any(|ring| point_in_ring(point, ring))
    }
}

/// An administrative region loaded from one feature
#[derive(Debug, Clone, PartialEq)]
pub struct Province {
    pub id: String,
    pub name: String,
    pub name_en: String,
    pub name_local: String,
    pub country_code: String,
    pub admin_level: i64,
    pub nuts_level: String,
    pub mountain_type: f64,
    pub urban_type: f64,
    pub coast_type: f64,
    pub geometry: ProvinceGeometry,
    /// The only field that changes after load
    pub color: Rgba,
}

impl Province {
    /// Best display name: English, then primary, then local, then the id
    pub fn display_name(&self) -> &str {
        [&self.name_en, &self.name, &self.name_local]
            .into_iter()
            .find(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }
}
