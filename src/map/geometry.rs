use glam::DVec2;

/// A 2D point in projected (screen/world) space
pub type Point = DVec2;

/// An implicitly closed ring: the last point connects back to the first
pub type Ring = Vec<Point>;

/// Absolute per-axis tolerance for treating a ring's first and last points as one
pub const CLOSING_EPSILON: f64 = 1e-6;

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle enclosing all points (None for an empty slice)
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut rect = Self::new(*first, *first);
        for p in rest {
            rect.min = rect.min.min(*p);
            rect.max = rect.max.max(*p);
        }
        Some(rect)
    }

    /// Inclusive intersection test: touching edges count as overlap
    #[inline(always)]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline(always)]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Convert an explicitly closed ring into the implicitly closed form.
/// Returns None for an empty ring, which must not contribute a polygon.
pub fn normalize_ring(mut points: Vec<Point>) -> Option<Ring> {
    if points.is_empty() {
        return None;
    }

    if points.len() > 1 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (first.x - last.x).abs() < CLOSING_EPSILON && (first.y - last.y).abs() < CLOSING_EPSILON {
            points.pop();
        }
    }

    Some(points)
}

/// Ear-clip a single ring (no holes) into a flat list of vertex-index triples.
/// Triangulation failure degrades to an empty list; the ring is still outlined and hit-testable.
pub fn triangulate_ring(ring: &[Point]) -> Vec<u32> {
    if ring.len() < 3 {
        return Vec::new();
    }

    let mut coords = Vec::with_capacity(ring.len() * 2);
    for p in ring {
        coords.push(p.x);
        coords.push(p.y);
    }

    match earcutr::earcut(&coords, &[], 2) {
        Ok(indices) => indices.into_iter().map(|i| i as u32).collect(),
        Err(e) => {
            log::warn!("Triangulation failed for ring of {} points: {:?}", ring.len(), e);
            Vec::new()
        }
    }
}

/// Look up the corners of one index triple, rejecting any index outside the ring
#[inline]
pub fn resolve_triangle(ring: &[Point], triple: &[u32]) -> Option<[Point; 3]> {
    let &[a, b, c] = triple else {
        return None;
    };
    Some([
        *ring.get(a as usize)?,
        *ring.get(b as usize)?,
        *ring.get(c as usize)?,
    ])
}

/// Even-odd ray-casting containment test against the raw ring vertices
pub fn point_in_ring(point: Point, ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = ring[i];
        let pj = ring[j];
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
