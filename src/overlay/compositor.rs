//! Badge compositing onto the poster raster.
//!
//! Works on the decoded poster at its native dimensions; nothing is resized.
//! The badge rectangle is filled with a semi-transparent black, then the
//! rating text is drawn on top. Both steps clip at the canvas edges so a
//! partially off-canvas badge renders its visible portion only.

use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use std::io::Cursor;

use super::badge::{BadgeGeometry, ImageDimensions, BADGE_FONT_SIZE};
use super::error::OverlayError;
use super::params::BadgePosition;
use super::text::draw_text;

/// Badge background fill, before opacity is applied.
const BADGE_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Opacity of the badge background fill.
const BADGE_FILL_OPACITY: f32 = 0.7;
/// IMDb-style yellow for the rating text.
const TEXT_COLOR: Rgba<u8> = Rgba([245, 197, 24, 255]);

/// Blend a foreground pixel over a background pixel at the given opacity.
///
/// Standard "over" alpha compositing; `opacity` scales the foreground's
/// own alpha before blending.
pub(crate) fn blend_pixels(background: &Rgba<u8>, foreground: &Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground.0[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background.0[3] as f32 / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg = fg as f32 / 255.0;
        let bg = bg as f32 / 255.0;
        let out = (fg * fg_alpha + bg * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend_channel(foreground.0[0], background.0[0]),
        blend_channel(foreground.0[1], background.0[1]),
        blend_channel(foreground.0[2], background.0[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// Fill the badge rectangle on the canvas, clipping at the edges.
fn fill_rect(canvas: &mut RgbaImage, rect: &BadgeGeometry, fill: Rgba<u8>, opacity: f32) {
    let (canvas_w, canvas_h) = (canvas.width() as i32, canvas.height() as i32);

    let x_start = rect.x.max(0);
    let y_start = rect.y.max(0);
    let x_end = (rect.x + rect.width as i32).min(canvas_w);
    let y_end = (rect.y + rect.height as i32).min(canvas_h);

    for y in y_start..y_end {
        for x in x_start..x_end {
            let background = canvas.get_pixel(x as u32, y as u32);
            let blended = blend_pixels(background, &fill, opacity);
            canvas.put_pixel(x as u32, y as u32, blended);
        }
    }
}

/// Compose the rating badge onto the poster.
///
/// Returns a new RGBA raster with the same dimensions as the source.
pub fn compose(
    source: &DynamicImage,
    rating: &str,
    position: BadgePosition,
) -> Result<RgbaImage, OverlayError> {
    let mut canvas = source.to_rgba8();

    let dims = ImageDimensions {
        width: canvas.width(),
        height: canvas.height(),
    };
    let geometry = BadgeGeometry::compute(&dims, position);

    fill_rect(&mut canvas, &geometry, BADGE_FILL, BADGE_FILL_OPACITY);

    let label = format!("\u{2605} {}", rating);
    let (text_x, baseline_y) = geometry.text_anchor();
    draw_text(
        &mut canvas,
        &label,
        text_x,
        baseline_y,
        BADGE_FONT_SIZE,
        TEXT_COLOR,
    )?;

    Ok(canvas)
}

/// Encode the composed raster as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, OverlayError> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageOutputFormat::Png)
        .map_err(|e| OverlayError::Encode(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer)
}
