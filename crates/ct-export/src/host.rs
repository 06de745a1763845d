use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use ct_core::color::Rgb;
use image::{Rgba, RgbaImage};

use crate::error::ExportError;

/// Primitive draw command accepted by a drawing host.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    /// Axis-aligned filled rectangle.
    FillRect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgb,
    },
    /// Filled rectangle with rounded corners (path-based on real hosts).
    RoundedRect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        radius: u32,
        color: Rgb,
    },
    /// One line of text, no wrapping; the painter wraps beforehand.
    Text {
        x: f32,
        y: f32,
        px: f32,
        color: Rgb,
        text: String,
    },
}

/// Hôte de dessin : primitives synchrones, flatten asynchrone.
///
/// `submit` est fire-and-forget ; la complétion du flatten arrive sur le
/// canal retourné, jamais de façon synchrone. La mesure de texte est la
/// seule primitive interrogée pendant la construction des commandes.
pub trait DrawHost {
    /// Advance width of `text` at `px` pixels, in pixels.
    fn text_width(&self, text: &str, px: f32) -> f32;

    /// Queue one draw command. Never blocks, never fails.
    fn submit(&mut self, cmd: DrawCmd);

    /// Flatten the drawn surface into `path`. The receiver yields the
    /// host's completion signal; dropping it discards the result.
    fn flatten(&mut self, path: &Path) -> flume::Receiver<Result<(), String>>;
}

/// Hôte de production : rasterise les commandes dans une `RgbaImage` sur
/// un thread de travail et aplatit en PNG.
pub struct PngHost {
    width: u32,
    height: u32,
    font: FontArc,
    pending: Vec<DrawCmd>,
}

impl PngHost {
    /// Create a host for a `width`×`height` surface.
    ///
    /// # Errors
    /// Returns `ExportError::Font` if the font bytes do not parse.
    pub fn new(width: u32, height: u32, font_bytes: Vec<u8>) -> Result<Self, ExportError> {
        let font = FontArc::try_from_vec(font_bytes)
            .map_err(|e| ExportError::Font(e.to_string()))?;
        Ok(Self {
            width,
            height,
            font,
            pending: Vec::new(),
        })
    }

    /// Load the font from a file path.
    ///
    /// # Errors
    /// Returns `ExportError::Font` if the file cannot be read or parsed.
    pub fn from_font_path(width: u32, height: u32, path: &Path) -> Result<Self, ExportError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ExportError::Font(format!("{}: {e}", path.display())))?;
        Self::new(width, height, bytes)
    }
}

impl DrawHost for PngHost {
    fn text_width(&self, text: &str, px: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px));
        text.chars()
            .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
            .sum()
    }

    fn submit(&mut self, cmd: DrawCmd) {
        self.pending.push(cmd);
    }

    fn flatten(&mut self, path: &Path) -> flume::Receiver<Result<(), String>> {
        let (done_tx, done_rx) = flume::bounded(1);
        let commands = std::mem::take(&mut self.pending);
        let (width, height) = (self.width, self.height);
        let font = self.font.clone();
        let path: PathBuf = path.to_path_buf();

        std::thread::spawn(move || {
            let mut surface = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
            for cmd in &commands {
                replay(&mut surface, &font, cmd);
            }
            let result = surface.save(&path).map_err(|e| e.to_string());
            // L'initiateur a pu disparaître : le résultat est alors jeté.
            let _ = done_tx.send(result);
        });

        done_rx
    }
}

fn replay(surface: &mut RgbaImage, font: &FontArc, cmd: &DrawCmd) {
    match *cmd {
        DrawCmd::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => fill_rect(surface, x, y, width, height, color),
        DrawCmd::RoundedRect {
            x,
            y,
            width,
            height,
            radius,
            color,
        } => rounded_rect(surface, x, y, width, height, radius, color),
        DrawCmd::Text {
            x,
            y,
            px,
            color,
            ref text,
        } => draw_text(surface, font, x, y, px, color, text),
    }
}

/// Remplit un rectangle, borné aux dimensions de la surface.
pub fn fill_rect(surface: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
    let x_end = (x + width).min(surface.width());
    let y_end = (y + height).min(surface.height());
    for py in y.min(y_end)..y_end {
        for px in x.min(x_end)..x_end {
            surface.put_pixel(px, py, Rgba([color.r, color.g, color.b, 255]));
        }
    }
}

/// Rectangle à coins arrondis : les pixels des coins au-delà du quart de
/// cercle de rayon `radius` sont laissés intacts.
pub fn rounded_rect(
    surface: &mut RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    radius: u32,
    color: Rgb,
) {
    let radius = radius.min(width / 2).min(height / 2);
    let r = radius as i64;
    let x_end = (x + width).min(surface.width());
    let y_end = (y + height).min(surface.height());

    for py in y.min(y_end)..y_end {
        for px in x.min(x_end)..x_end {
            let local_x = (px - x) as i64;
            let local_y = (py - y) as i64;
            let from_right = (width as i64 - 1) - local_x;
            let from_bottom = (height as i64 - 1) - local_y;
            let dx = r - 1 - local_x.min(from_right);
            let dy = r - 1 - local_y.min(from_bottom);
            if dx > 0 && dy > 0 && dx * dx + dy * dy > r * r {
                continue;
            }
            surface.put_pixel(px, py, Rgba([color.r, color.g, color.b, 255]));
        }
    }
}

/// Rendu d'une ligne de texte, coverage-blended sur la surface.
/// `y` est la ligne de base ; clipping aux bords de l'image.
fn draw_text(surface: &mut RgbaImage, font: &FontArc, x: f32, y: f32, px: f32, color: Rgb, text: &str) {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    let mut pen_x = x;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(scale, point(pen_x, y));
        let advance = scaled.h_advance(glyph_id);

        if let Some(outline) = font.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            outline.draw(|gx, gy, coverage| {
                let sx = gx as i64 + bounds.min.x as i64;
                let sy = gy as i64 + bounds.min.y as i64;
                if sx < 0 || sy < 0 || sx >= i64::from(surface.width()) || sy >= i64::from(surface.height()) {
                    return;
                }
                let pixel = surface.get_pixel_mut(sx as u32, sy as u32);
                let alpha = coverage.clamp(0.0, 1.0);
                let blend = |fg: u8, bg: u8| {
                    (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha)) as u8
                };
                *pixel = Rgba([
                    blend(color.r, pixel[0]),
                    blend(color.g, pixel[1]),
                    blend(color.b, pixel[2]),
                    255,
                ]);
            });
        }
        pen_x += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_surface() {
        let mut surface = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        fill_rect(&mut surface, 6, 6, 10, 10, Rgb::new(10, 20, 30));
        assert_eq!(surface.get_pixel(7, 7), &Rgba([10, 20, 30, 255]));
        assert_eq!(surface.get_pixel(5, 5), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn rounded_rect_spares_corners_keeps_center() {
        let mut surface = RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255]));
        rounded_rect(&mut surface, 0, 0, 32, 32, 8, Rgb::new(0, 0, 0));
        // Extreme corner pixel stays untouched, center and edge midpoints fill.
        assert_eq!(surface.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(surface.get_pixel(16, 16), &Rgba([0, 0, 0, 255]));
        assert_eq!(surface.get_pixel(16, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(surface.get_pixel(0, 16), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn zero_radius_is_plain_rect() {
        let mut surface = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        rounded_rect(&mut surface, 0, 0, 8, 8, 0, Rgb::new(1, 2, 3));
        assert_eq!(surface.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn surface_round_trips_through_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.png");
        let mut surface = RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 255]));
        fill_rect(&mut surface, 2, 2, 4, 4, Rgb::new(251, 231, 243));
        surface.save(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.get_pixel(3, 3), &Rgba([251, 231, 243, 255]));
    }

    #[test]
    fn garbage_font_is_rejected() {
        let result = PngHost::new(100, 100, vec![0u8; 64]);
        assert!(matches!(result, Err(ExportError::Font(_))));
    }
}
