use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use super::{FontStyle, Rect, RenderBackend};
use crate::config::FontConfig;
use crate::error::{Error, Result};
use crate::Color;

pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let bytes = std::fs::read(path).map_err(|source| Error::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| Error::FontParse {
        path: path.to_path_buf(),
    })
}

// ============================================================================
// CORE DATA TYPES
// ============================================================================

/// Software backend over an RGBA8 frame (row 0 at the top, as `pixels` lays it out).
///
/// Incoming coordinates are bottom-left based and get flipped here.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    font: Option<&'a Font<'static>>,
    normal_size: f32,
    big_size: f32,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let fonts = FontConfig::default();
        Self {
            frame,
            width,
            height,
            font: None,
            normal_size: fonts.normal_size,
            big_size: fonts.big_size,
        }
    }

    pub fn with_font(mut self, font: &'a Font<'static>, config: &FontConfig) -> Self {
        self.font = Some(font);
        self.normal_size = config.normal_size;
        self.big_size = config.big_size;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[rgba[0], rgba[1], rgba[2], 0xff]);
        }
    }

    /// RGBA at a bottom-left based pixel.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        let row = self.height - 1 - y as usize;
        let idx = (row * self.width + x as usize) * 4;
        (idx + 4 <= self.frame.len()).then_some(idx)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let src = color.to_rgba8();
        let a = (alpha * color.a).clamp(0.0, 1.0);
        for (c, s) in self.frame[idx..idx + 3].iter_mut().zip(src) {
            *c = (s as f32 * a + *c as f32 * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    fn scale_for(&self, style: FontStyle) -> Scale {
        match style {
            FontStyle::Normal | FontStyle::Shadow => Scale::uniform(self.normal_size),
            FontStyle::Big => Scale::uniform(self.big_size),
        }
    }

    /// Glyphs centered on `(x, y)`.
    fn draw_glyphs(&mut self, font: &Font<'static>, scale: Scale, text: &str, x: i32, y: i32, color: Color) {
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> = font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect();
        let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
            (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
            |(min_x, max_x, min_y, max_y), bb| {
                (
                    min_x.min(bb.min.x),
                    max_x.max(bb.max.x),
                    min_y.min(bb.min.y),
                    max_y.max(bb.max.y),
                )
            },
        );
        if min_x >= max_x || min_y >= max_y {
            return;
        }
        // top-down row of the anchor
        let top = self.height as i32 - 1 - y;
        let offset_x = x - (max_x - min_x) / 2;
        let offset_y = top - (max_y - min_y) / 2;
        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let row = offset_y + gy as i32 + bb.min.y - min_y;
                let py = self.height as i32 - 1 - row;
                self.set_pixel(px, py, color, v);
            });
        }
    }
}

impl RenderBackend for Canvas<'_> {
    fn draw_rectangle(&mut self, rect: Rect, color: Color) {
        let x0 = rect.left.max(0);
        let y0 = rect.bottom.max(0);
        let x1 = (rect.left + rect.width).min(self.width as i32);
        let y1 = (rect.bottom + rect.height).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x, y, color, 1.0);
            }
        }
    }

    fn draw_text(&mut self, style: FontStyle, text: &str, x: f32, y: f32, color: Color) {
        let Some(font) = self.font else {
            return;
        };
        let scale = self.scale_for(style);
        let (x, y) = (x.round() as i32, y.round() as i32);
        if style == FontStyle::Shadow {
            self.draw_glyphs(font, scale, text, x + 1, y - 1, Color::BLACK);
        }
        self.draw_glyphs(font, scale, text, x, y, Color::rgb(color.r, color.g, color.b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_creation() {
        let mut frame = vec![0u8; 8 * 4 * 4];
        let canvas = Canvas::new(&mut frame, 8, 4);
        assert_eq!(canvas.width(), 8);
        assert_eq!(canvas.height(), 4);
    }

    #[test]
    fn test_rectangle_origin_is_bottom_left() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        {
            let mut canvas = Canvas::new(&mut frame, 4, 4);
            canvas.clear(Color::BLACK);
            canvas.draw_rectangle(Rect::new(0, 0, 1, 1), Color::WHITE);
            assert_eq!(canvas.pixel(0, 0), Some([255, 255, 255, 255]));
            assert_eq!(canvas.pixel(0, 3), Some([0, 0, 0, 255]));
        }
        // bottom-left pixel lives in the last row of the frame
        assert_eq!(&frame[12 * 4..12 * 4 + 4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_rectangle_is_clipped() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.draw_rectangle(Rect::new(-10, -10, 100, 100), Color::RED);
        canvas.draw_rectangle(Rect::new(2, 2, -5, 3), Color::GREEN);
        assert_eq!(canvas.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_alpha_blending() {
        let mut frame = vec![0u8; 4];
        let mut canvas = Canvas::new(&mut frame, 1, 1);
        canvas.clear(Color::BLACK);
        canvas.draw_rectangle(Rect::new(0, 0, 1, 1), Color::new(1.0, 1.0, 1.0, 0.5));
        assert_eq!(canvas.pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut frame = vec![0u8; 16 * 16 * 4];
        let mut canvas = Canvas::new(&mut frame, 16, 16);
        canvas.draw_text(FontStyle::Normal, "88", 8.0, 8.0, Color::WHITE);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_font_errors() {
        let missing = load_font(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(missing, Err(Error::FontRead { .. })));

        let path = std::env::temp_dir().join("dashboard_not_a_font.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        assert!(matches!(load_font(&path), Err(Error::FontParse { .. })));
        let _ = std::fs::remove_file(&path);
    }
}
