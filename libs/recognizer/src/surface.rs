//! Drawing surfaces
//!
//! `DrawingSurface` is what stroke capture paints on. The browser implements
//! it over a 2D canvas context; `CanvasSurface` is an in-memory RGBA raster
//! with the same round-capped stroke model, used offline and in tests.

use crate::RecognizerError;

/// A point in surface coordinates (pixels, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// RGBA color, 8 bits per channel
pub type Rgba = [u8; 4];

pub const BLACK: Rgba = [0, 0, 0, 255];
pub const WHITE: Rgba = [255, 255, 255, 255];

pub trait DrawingSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Paint the whole surface with the background color
    fn fill_background(&mut self);

    /// Ink a straight segment of the given width with round caps
    fn stroke_segment(&mut self, from: Point, to: Point, line_width: f64);

    /// Ink a filled circle
    fn fill_dot(&mut self, center: Point, radius: f64);
}

/// Software raster backed by a row-major RGBA buffer
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSurface {
    width: u32,
    height: u32,
    background: Rgba,
    ink: Rgba,
    data: Vec<u8>,
}

impl CanvasSurface {
    /// A blank surface filled with `background`
    pub fn new(width: u32, height: u32, background: Rgba, ink: Rgba) -> Self {
        let mut surface = Self {
            width,
            height,
            background,
            ink,
            data: vec![0; width as usize * height as usize * 4],
        };
        surface.fill_background();
        surface
    }

    /// White ink on black, the colors the model was trained on
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, BLACK, WHITE)
    }

    /// Wrap an existing RGBA buffer, e.g. canvas image data or a decoded image
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RecognizerError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 {
            return Err(RecognizerError::InvalidSurface(format!(
                "dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        if data.len() != expected {
            return Err(RecognizerError::InvalidSurface(format!(
                "expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            background: BLACK,
            ink: WHITE,
            data,
        })
    }

    pub fn rgba(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// True when every pixel has exactly `color`
    pub fn is_uniform(&self, color: Rgba) -> bool {
        self.data.chunks_exact(4).all(|px| px == color)
    }

    /// Number of pixels that differ from the background
    pub fn inked_pixels(&self) -> usize {
        let bg = self.background;
        self.data.chunks_exact(4).filter(|px| *px != bg).count()
    }

    /// Set every pixel whose center lies within `radius` of the segment a-b
    fn paint_capsule(&mut self, a: Point, b: Point, radius: f64) {
        if radius <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }

        let min_x = (a.x.min(b.x) - radius).floor().max(0.0) as i64;
        let min_y = (a.y.min(b.y) - radius).floor().max(0.0) as i64;
        let max_x = ((a.x.max(b.x) + radius).ceil() as i64).min(self.width as i64 - 1);
        let max_y = ((a.y.max(b.y) + radius).ceil() as i64).min(self.height as i64 - 1);

        let ink = self.ink;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(center, a, b) <= radius {
                    let i = (y as usize * self.width as usize + x as usize) * 4;
                    self.data[i..i + 4].copy_from_slice(&ink);
                }
            }
        }
    }
}

impl DrawingSurface for CanvasSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_background(&mut self) {
        let bg = self.background;
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&bg);
        }
    }

    fn stroke_segment(&mut self, from: Point, to: Point, line_width: f64) {
        self.paint_capsule(from, to, line_width / 2.0);
    }

    fn fill_dot(&mut self, center: Point, radius: f64) {
        self.paint_capsule(center, center, radius);
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let cx = a.x + t * dx;
    let cy = a.y + t * dy;
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_surface_is_black() {
        let surface = CanvasSurface::blank(10, 8);
        assert_eq!(surface.rgba().len(), 10 * 8 * 4);
        assert!(surface.is_uniform(BLACK));
        assert_eq!(surface.inked_pixels(), 0);
    }

    #[test]
    fn test_dot_inks_center_only() {
        let mut surface = CanvasSurface::blank(20, 20);
        surface.fill_dot(Point::new(10.0, 10.0), 2.0);

        assert_eq!(surface.pixel(10, 10), WHITE);
        assert_eq!(surface.pixel(0, 0), BLACK);
        assert_eq!(surface.pixel(19, 19), BLACK);
        // Radius 2 around (10,10) covers a handful of pixel centers, not a row
        assert!(surface.inked_pixels() > 4 && surface.inked_pixels() < 20);
    }

    #[test]
    fn test_segment_covers_its_path() {
        let mut surface = CanvasSurface::blank(40, 10);
        surface.stroke_segment(Point::new(5.0, 5.0), Point::new(35.0, 5.0), 3.0);

        for x in 5..35 {
            assert_eq!(surface.pixel(x, 5), WHITE, "gap at x={}", x);
        }
        assert_eq!(surface.pixel(20, 0), BLACK);
        assert_eq!(surface.pixel(20, 9), BLACK);
    }

    #[test]
    fn test_out_of_bounds_is_clipped() {
        let mut surface = CanvasSurface::blank(10, 10);
        surface.stroke_segment(Point::new(-50.0, -50.0), Point::new(-20.0, -5.0), 6.0);
        assert!(surface.is_uniform(BLACK));

        surface.stroke_segment(Point::new(-5.0, 5.0), Point::new(50.0, 5.0), 2.0);
        assert_eq!(surface.pixel(0, 5), WHITE);
        assert_eq!(surface.pixel(9, 5), WHITE);
    }

    #[test]
    fn test_fill_background_resets() {
        let mut surface = CanvasSurface::blank(12, 12);
        surface.fill_dot(Point::new(6.0, 6.0), 4.0);
        assert!(surface.inked_pixels() > 0);

        surface.fill_background();
        assert!(surface.is_uniform(BLACK));
    }

    #[test]
    fn test_from_rgba_validates_length() {
        assert!(CanvasSurface::from_rgba(2, 2, vec![0; 16]).is_ok());

        let err = CanvasSurface::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidSurface(_)));

        let err = CanvasSurface::from_rgba(0, 2, vec![]).unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidSurface(_)));
    }
}
