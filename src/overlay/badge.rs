//! Badge geometry calculation.
//!
//! The badge rectangle is derived from the poster dimensions and the
//! requested position every request; it is never stored.
//!
//! # Layout
//!
//! - Width scales with the poster (`max(50, W * 0.2)`), height is fixed.
//! - Both position modes keep the same left padding.
//! - Bottom-left placement does not clamp: a poster shorter than
//!   `badge height + padding` yields a negative `y` and the drawing
//!   primitives clip it at the canvas edge.

use super::params::BadgePosition;

/// Fixed badge height in pixels.
pub const BADGE_HEIGHT: u32 = 30;
/// Minimum badge width in pixels.
pub const BADGE_MIN_WIDTH: u32 = 50;
/// Badge width as a fraction of the poster width.
pub const BADGE_WIDTH_RATIO: f32 = 0.2;
/// Padding between the badge and the poster edge, in pixels.
pub const EDGE_PADDING: i32 = 10;
/// Horizontal text inset from the badge's left edge.
pub const TEXT_OFFSET_X: i32 = 8;
/// Text baseline offset from the badge's top edge.
pub const TEXT_BASELINE_OFFSET: i32 = 20;
/// Font size for the rating text, in pixels.
pub const BADGE_FONT_SIZE: f32 = 18.0;

/// Dimensions of the decoded poster.
#[derive(Debug, Clone, Copy)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Computed badge rectangle for one request.
///
/// `x`/`y` are signed: bottom-left placement on a very short poster
/// produces a negative `y` on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BadgeGeometry {
    /// Compute the badge rectangle for a poster of the given dimensions.
    pub fn compute(image: &ImageDimensions, position: BadgePosition) -> Self {
        let width = (image.width as f32 * BADGE_WIDTH_RATIO).max(BADGE_MIN_WIDTH as f32) as u32;

        let y = match position {
            BadgePosition::TopLeft => EDGE_PADDING,
            BadgePosition::BottomLeft => {
                image.height as i32 - BADGE_HEIGHT as i32 - EDGE_PADDING
            }
        };

        Self {
            x: EDGE_PADDING,
            y,
            width,
            height: BADGE_HEIGHT,
        }
    }

    /// Left-anchored baseline position for the rating text.
    pub fn text_anchor(&self) -> (i32, i32) {
        (self.x + TEXT_OFFSET_X, self.y + TEXT_BASELINE_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(400, 80)] // 400 * 0.2 = 80
    #[case(1000, 200)]
    #[case(250, 50)] // 250 * 0.2 = 50, exactly the floor
    #[case(200, 50)] // below the floor
    #[case(100, 50)]
    #[case(0, 50)]
    fn test_badge_width_scales_with_floor(#[case] poster_width: u32, #[case] expected: u32) {
        let dims = ImageDimensions {
            width: poster_width,
            height: 600,
        };
        let geometry = BadgeGeometry::compute(&dims, BadgePosition::TopLeft);
        assert_eq!(geometry.width, expected);
        assert_eq!(geometry.height, BADGE_HEIGHT);
    }

    #[test]
    fn test_top_left_placement() {
        let dims = ImageDimensions {
            width: 400,
            height: 600,
        };
        let geometry = BadgeGeometry::compute(&dims, BadgePosition::TopLeft);
        assert_eq!((geometry.x, geometry.y), (10, 10));
    }

    #[test]
    fn test_bottom_left_placement() {
        let dims = ImageDimensions {
            width: 400,
            height: 600,
        };
        let geometry = BadgeGeometry::compute(&dims, BadgePosition::BottomLeft);
        // 600 - 30 - 10
        assert_eq!((geometry.x, geometry.y), (10, 550));
    }

    #[test]
    fn test_bottom_left_short_poster_goes_negative() {
        // No clamping: a poster shorter than badge height + padding gets a
        // negative y, clipped later at draw time
        let dims = ImageDimensions {
            width: 400,
            height: 25,
        };
        let geometry = BadgeGeometry::compute(&dims, BadgePosition::BottomLeft);
        assert_eq!(geometry.y, -15);
    }

    #[test]
    fn test_text_anchor() {
        let dims = ImageDimensions {
            width: 400,
            height: 600,
        };
        let geometry = BadgeGeometry::compute(&dims, BadgePosition::TopLeft);
        assert_eq!(geometry.text_anchor(), (18, 30));

        let geometry = BadgeGeometry::compute(&dims, BadgePosition::BottomLeft);
        assert_eq!(geometry.text_anchor(), (18, 570));
    }

    #[test]
    fn test_scenario_400x600_rectangle() {
        // 400x600 poster, top-left -> (10,10)-(90,40)
        let dims = ImageDimensions {
            width: 400,
            height: 600,
        };
        let g = BadgeGeometry::compute(&dims, BadgePosition::TopLeft);
        assert_eq!(g.x + g.width as i32, 90);
        assert_eq!(g.y + g.height as i32, 40);

        // bottom-left -> (10,550)-(90,580)
        let g = BadgeGeometry::compute(&dims, BadgePosition::BottomLeft);
        assert_eq!(g.y, 550);
        assert_eq!(g.y + g.height as i32, 580);
    }
}
