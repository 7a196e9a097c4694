use super::geometry::Point;

/// Geographic extent of every accepted feature, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Sentinel bounds: every axis has min > max until a coordinate is included
    pub const EMPTY: Self = Self {
        min_lat: f64::INFINITY,
        max_lat: f64::NEG_INFINITY,
        min_lon: f64::INFINITY,
        max_lon: f64::NEG_INFINITY,
    };

    /// Grow the bounds to include a coordinate
    #[inline(always)]
    pub fn include(&mut self, lat: f64, lon: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
    }

    /// True while no coordinate has been included
    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lon > self.max_lon
    }

    pub fn center_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Aspect-corrected equirectangular projection from geographic bounds onto a viewport.
///
/// Longitudes are scaled by the cosine of the bounds' center latitude, then the
/// extent is fit into the viewport: letterboxed (full width, centered vertically)
/// when the geography is relatively wider than the viewport, pillarboxed
/// (full height, centered horizontally) otherwise. North is at the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// (min_lon, max_lat): the top-left geographic corner
    origin: (f64, f64),
    lon_scale: f64,
    scale: f64,
    offset: Point,
}

impl Projection {
    /// Build the projection from completed global bounds.
    /// Degenerate bounds (empty, a single point, a flat line) never divide by zero.
    pub fn new(bounds: GeoBounds, width: f64, height: f64) -> Self {
        if bounds.is_empty() {
            return Self {
                origin: (0.0, 0.0),
                lon_scale: 1.0,
                scale: 1.0,
                offset: Point::ZERO,
            };
        }

        let lon_scale = bounds.center_lat().to_radians().cos();
        let geo_width = (bounds.max_lon - bounds.min_lon) * lon_scale;
        let geo_height = bounds.max_lat - bounds.min_lat;

        let (scale, offset) = if geo_width <= 0.0 && geo_height <= 0.0 {
            // Everything collapses onto one point: put it in the middle
            (1.0, Point::new(width / 2.0, height / 2.0))
        } else if geo_height <= 0.0 || (geo_width > 0.0 && geo_width / geo_height > width / height) {
            // Letterbox
            let scale = width / geo_width;
            (scale, Point::new(0.0, (height - geo_height * scale) / 2.0))
        } else {
            // Pillarbox
            let scale = height / geo_height;
            (scale, Point::new((width - geo_width * scale) / 2.0, 0.0))
        };

        Self {
            origin: (bounds.min_lon, bounds.max_lat),
            lon_scale,
            scale,
            offset,
        }
    }

    /// Project a geographic coordinate. Note the argument order: GeoJSON
    /// positions are `[lon, lat]` and must be swapped by the caller.
    #[inline]
    pub fn project(&self, lat: f64, lon: f64) -> Point {
        Point::new(
            self.offset.x + (lon - self.origin.0) * self.lon_scale * self.scale,
            self.offset.y + (self.origin.1 - lat) * self.scale,
        )
    }
}

/// One-shot form of [`Projection::project`]
pub fn geo_to_screen(lat: f64, lon: f64, bounds: GeoBounds, width: f64, height: f64) -> Point {
    Projection::new(bounds, width, height).project(lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> GeoBounds {
        GeoBounds {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    #[test]
    fn test_include_grows_bounds() {
        let mut b = GeoBounds::EMPTY;
        assert!(b.is_empty());
        b.include(45.0, 10.0);
        b.include(47.0, 8.0);
        assert!(!b.is_empty());
        assert_eq!(b, bounds(45.0, 47.0, 8.0, 10.0));
        assert_eq!(b.center_lat(), 46.0);
    }

    #[test]
    fn test_letterbox_wide_geography() {
        // 40 x 10 degrees at the equator into a square viewport: fit width, center vertically
        let p = Projection::new(bounds(-5.0, 5.0, 0.0, 40.0), 100.0, 100.0);
        let west = p.project(0.0, 0.0);
        let east = p.project(0.0, 40.0);
        assert!(west.x.abs() < 1e-9);
        assert!((east.x - 100.0).abs() < 1e-9);

        let north = p.project(5.0, 20.0);
        let south = p.project(-5.0, 20.0);
        let content_height = south.y - north.y;
        assert!(content_height < 100.0);
        assert!((north.y - (100.0 - content_height) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pillarbox_tall_geography() {
        let p = Projection::new(bounds(0.0, 40.0, 0.0, 10.0), 200.0, 100.0);
        let north = p.project(40.0, 5.0);
        let south = p.project(0.0, 5.0);
        assert!(north.y.abs() < 1e-9);
        assert!((south.y - 100.0).abs() < 1e-9);

        let west = p.project(20.0, 0.0);
        let east = p.project(20.0, 10.0);
        assert!((west.x - (200.0 - east.x)).abs() < 1e-9);
    }

    #[test]
    fn test_axes_orientation() {
        let p = Projection::new(bounds(40.0, 50.0, 0.0, 20.0), 800.0, 600.0);
        let a = p.project(45.0, 5.0);
        let east = p.project(45.0, 15.0);
        let north = p.project(48.0, 5.0);
        assert!(east.x > a.x);
        assert!(north.y < a.y);
    }

    #[test]
    fn test_latitude_correction_shrinks_longitude() {
        // Same degree extent; at 60N a degree of longitude is half as wide
        let equator = Projection::new(bounds(-1.0, 1.0, 0.0, 2.0), 1000.0, 1000.0);
        let north = Projection::new(bounds(59.0, 61.0, 0.0, 2.0), 1000.0, 1000.0);
        let eq_width = equator.project(0.0, 2.0).x - equator.project(0.0, 0.0).x;
        let n_width = north.project(60.0, 2.0).x - north.project(60.0, 0.0).x;
        assert!(n_width < eq_width * 0.55);
    }

    #[test]
    fn test_deterministic() {
        let b = bounds(35.2, 71.1, -10.5, 40.3);
        let first = geo_to_screen(52.1, 13.4, b, 1280.0, 720.0);
        let second = geo_to_screen(52.1, 13.4, b, 1280.0, 720.0);
        assert_eq!(first.x.to_bits(), second.x.to_bits());
        assert_eq!(first.y.to_bits(), second.y.to_bits());
    }

    #[test]
    fn test_degenerate_bounds_are_finite() {
        let empty = Projection::new(GeoBounds::EMPTY, 100.0, 100.0);
        assert!(empty.project(1.0, 1.0).is_finite());

        let point = Projection::new(bounds(10.0, 10.0, 20.0, 20.0), 100.0, 50.0);
        assert_eq!(point.project(10.0, 20.0), Point::new(50.0, 25.0));

        let flat = Projection::new(bounds(10.0, 10.0, 0.0, 10.0), 100.0, 50.0);
        let mid = flat.project(10.0, 5.0);
        assert!(mid.is_finite());
        assert!((mid.y - 25.0).abs() < 1e-9);
    }
}
