use anyhow::Context;
use glam::Vec2;
use image::{Rgba, RgbaImage};
use scope_core::Surface;
use std::path::Path;

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(s: &str) -> Option<Rgba<u8>> {
    let hex = s.trim().strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 17;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

/// RGBA8 software canvas. Bars are blended onto the background, the
/// oscilloscope is a one-pixel line.
pub struct RasterSurface {
    image: RgbaImage,
    background: Rgba<u8>,
    bar: Rgba<u8>,
    line: Rgba<u8>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, background: Rgba<u8>, bar: Rgba<u8>, line: Rgba<u8>) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            image: RgbaImage::from_pixel(width, height, background),
            background,
            bar,
            line,
        }
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        self.image()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("writing {}", path.display()))
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= i64::from(self.image.width()) || y >= i64::from(self.image.height()) {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        let a = u16::from(color[3]);
        for c in 0..3 {
            let src = u16::from(color[c]);
            let dst = u16::from(px[c]);
            px[c] = ((src * a + dst * (255 - a)) / 255) as u8;
        }
        px[3] = 255;
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> f32 {
        self.image.width() as f32
    }

    fn height(&self) -> f32 {
        self.image.height() as f32
    }

    fn clear(&mut self) {
        let bg = self.background;
        self.image.pixels_mut().for_each(|p| *p = bg);
    }

    fn fill_bar(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let x0 = x.round() as i64;
        let x1 = (x + w).round() as i64;
        let y0 = y.round() as i64;
        let y1 = (y + h).round() as i64;
        let color = self.bar;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    fn stroke_polyline(&mut self, points: &[Vec2]) {
        let color = self.line;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            // Bresenham
            let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
            let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);
            let dx = (x1 - x0).abs();
            let dy = -(y1 - y0).abs();
            let sx = if x0 < x1 { 1 } else { -1 };
            let sy = if y0 < y1 { 1 } else { -1 };
            let mut err = dx + dy;
            loop {
                self.blend(x0, y0, color);
                if x0 == x1 && y0 == y1 {
                    break;
                }
                let e2 = 2 * err;
                if e2 >= dy {
                    err += dy;
                    x0 += sx;
                }
                if e2 <= dx {
                    err += dx;
                    y0 += sy;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#738ADB"), Some(Rgba([0x73, 0x8A, 0xDB, 255])));
        assert_eq!(parse_hex_color("#fff"), Some(WHITE));
        assert_eq!(parse_hex_color(" #FF000080 "), Some(Rgba([255, 0, 0, 128])));
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn bar_is_bottom_anchored_and_clipped() {
        let mut s = RasterSurface::new(4, 4, BLACK, RED, WHITE);
        s.fill_bar(1.0, 2.0, 10.0, 2.0);
        assert_eq!(*s.image().get_pixel(0, 3), BLACK);
        assert_eq!(*s.image().get_pixel(1, 3), RED);
        assert_eq!(*s.image().get_pixel(3, 2), RED);
        assert_eq!(*s.image().get_pixel(1, 1), BLACK);
        s.clear();
        assert!(s.image().pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn polyline_touches_both_ends() {
        let mut s = RasterSurface::new(8, 8, BLACK, RED, WHITE);
        s.stroke_polyline(&[Vec2::new(0.0, 0.0), Vec2::new(7.0, 3.0)]);
        assert_eq!(*s.image().get_pixel(0, 0), WHITE);
        assert_eq!(*s.image().get_pixel(7, 3), WHITE);
        assert_eq!(*s.image().get_pixel(0, 7), BLACK);
    }
}
