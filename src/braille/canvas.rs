use crate::map::{Point, RenderTarget, Rgba};

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots).
/// Unicode Braille patterns: U+2800 to U+28FF
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    pixels: Vec<Vec<u8>>, // Bit patterns per char
    colors: Vec<Vec<Option<Rgba>>>, // Last color written per char
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![vec![0u8; width]; height],
            colors: vec![vec![None; width]; height],
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    /// Set a pixel at the given coordinates.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        };

        self.pixels[cy][cx] |= bit;
        self.colors[cy][cx] = Some(color);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, color: Rgba) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Convert the canvas to a string of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.pixels
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&b| char::from_u32(0x2800 + b as u32).unwrap_or(' '))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Characters of one row paired with the color last written to each cell
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = (char, Option<Rgba>)> + '_ {
        let (bits, colors) = match (self.pixels.get(row), self.colors.get(row)) {
            (Some(bits), Some(colors)) => (bits.as_slice(), colors.as_slice()),
            _ => (&[][..], &[][..]),
        };
        bits.iter()
            .zip(colors)
            .map(|(&b, &c)| (char::from_u32(0x2800 + b as u32).unwrap_or(' '), c))
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// Draw a line using Bresenham's algorithm
fn bresenham(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Signed doubled area of (a, b, p); the sign tells which side of a->b the point lies on
#[inline(always)]
fn edge(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

impl RenderTarget for BrailleCanvas {
    /// Fill every pixel whose center lies inside the triangle (either winding)
    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Rgba) {
        let min = a.min(b).min(c).floor().max(Point::ZERO);
        let max = a
            .max(b)
            .max(c)
            .ceil()
            .min(Point::new(self.pixel_width() as f64, self.pixel_height() as f64));
        if min.x >= max.x || min.y >= max.y {
            return;
        }

        let area = edge(a, b, c);
        if area == 0.0 {
            return;
        }

        for y in min.y as usize..max.y as usize {
            for x in min.x as usize..max.x as usize {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let (w0, w1, w2) = (edge(b, c, p), edge(c, a, p), edge(a, b, p));
                let inside = if area > 0.0 {
                    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                } else {
                    w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
                };
                if inside {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgba) {
        // Segments entirely off one side of the canvas contribute nothing
        let (w, h) = (self.pixel_width() as f64, self.pixel_height() as f64);
        if (from.x < 0.0 && to.x < 0.0)
            || (from.y < 0.0 && to.y < 0.0)
            || (from.x >= w && to.x >= w)
            || (from.y >= h && to.y >= h)
        {
            return;
        }
        bresenham(
            self,
            from.x.round() as i32,
            from.y.round() as i32,
            to.x.round() as i32,
            to.y.round() as i32,
            color,
        );
    }
}
