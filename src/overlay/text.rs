//! Rating text rendering.
//!
//! Draws the badge label directly onto the RGBA canvas using an embedded
//! bold font. The anchor is the left edge of the text baseline, so placement
//! matches the geometry module's `text_anchor` exactly. Glyphs that fall
//! outside the canvas are clipped per pixel.

use ab_glyph::{point, Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

use super::compositor::blend_pixels;
use super::error::OverlayError;

// DejaVu Sans Bold ships with the binary so rendering never depends on
// system fonts. It covers U+2605 (the star glyph).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans-Bold.ttf");

static BADGE_FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();

/// Get the embedded badge font, parsing it on first use.
fn badge_font() -> Result<&'static FontRef<'static>, OverlayError> {
    BADGE_FONT
        .get_or_init(|| FontRef::try_from_slice(EMBEDDED_FONT_DATA).ok())
        .as_ref()
        .ok_or_else(|| OverlayError::Encode("Embedded font data is invalid".to_string()))
}

/// Draw `text` onto `image` with its baseline starting at
/// (`anchor_x`, `baseline_y`).
///
/// Coverage from the rasterizer is multiplied into the text color's alpha,
/// so glyph edges blend smoothly with whatever is already on the canvas.
///
/// # Errors
///
/// Returns `OverlayError::Encode` if the embedded font cannot be parsed.
pub fn draw_text(
    image: &mut RgbaImage,
    text: &str,
    anchor_x: i32,
    baseline_y: i32,
    font_size: f32,
    color: Rgba<u8>,
) -> Result<(), OverlayError> {
    let font = badge_font()?;
    let scale = PxScale::from(font_size);
    let scaled = font.as_scaled(scale);

    let (canvas_w, canvas_h) = (image.width() as i32, image.height() as i32);
    let mut caret_x = anchor_x as f32;
    let mut previous_glyph = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);

        if let Some(prev) = previous_glyph {
            caret_x += scaled.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, point(caret_x, baseline_y as f32));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                if px < 0 || py < 0 || px >= canvas_w || py >= canvas_h {
                    return;
                }
                if coverage <= 0.0 {
                    return;
                }

                let background = image.get_pixel(px as u32, py as u32);
                let blended = blend_pixels(background, &color, coverage);
                image.put_pixel(px as u32, py as u32, blended);
            });
        }

        caret_x += scaled.h_advance(glyph_id);
        previous_glyph = Some(glyph_id);
    }

    Ok(())
}
