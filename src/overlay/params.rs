//! Overlay request parameter parsing.
//!
//! Query format: `?posterUrl=<url-encoded absolute URL>&rating=<string>&position=<top-left|bottom-left>`
//!
//! `posterUrl` and `rating` are mandatory and validated before any I/O.
//! `rating` is opaque display text; it is never validated numerically.

use std::collections::HashMap;

use super::error::OverlayError;

/// Badge placement on the poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgePosition {
    #[default]
    TopLeft,
    BottomLeft,
}

impl BadgePosition {
    /// Resolve the `position` query value.
    ///
    /// Only the literal `bottom-left` selects bottom-left placement. Every
    /// other value, including typos and absence, falls back to top-left.
    /// Legacy clients rely on this; do not turn unknown values into errors.
    pub fn from_query_value(value: Option<&str>) -> Self {
        match value {
            Some("bottom-left") => Self::BottomLeft,
            _ => Self::TopLeft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::BottomLeft => "bottom-left",
        }
    }
}

/// Validated parameters for one overlay request.
#[derive(Debug, Clone)]
pub struct OverlayParams {
    /// Absolute URL of the source poster image.
    pub poster_url: String,
    /// Display text rendered verbatim after the star glyph.
    pub rating: String,
    /// Badge placement.
    pub position: BadgePosition,
}

impl OverlayParams {
    /// Parse and validate URL-decoded query parameters.
    ///
    /// # Errors
    ///
    /// Returns `OverlayError::InvalidRequest` when `posterUrl` or `rating`
    /// is absent or empty.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, OverlayError> {
        let poster_url = params
            .get("posterUrl")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| OverlayError::InvalidRequest("posterUrl is missing or empty".into()))?;

        let rating = params
            .get("rating")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| OverlayError::InvalidRequest("rating is missing or empty".into()))?;

        let position = BadgePosition::from_query_value(params.get("position").map(String::as_str));

        Ok(Self {
            poster_url: poster_url.clone(),
            rating: rating.clone(),
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_full_query() {
        let params = OverlayParams::from_query(&query(&[
            ("posterUrl", "https://example.com/poster.jpg"),
            ("rating", "8.5"),
            ("position", "bottom-left"),
        ]))
        .unwrap();

        assert_eq!(params.poster_url, "https://example.com/poster.jpg");
        assert_eq!(params.rating, "8.5");
        assert_eq!(params.position, BadgePosition::BottomLeft);
    }

    #[test]
    fn test_position_defaults_to_top_left() {
        let params = OverlayParams::from_query(&query(&[
            ("posterUrl", "https://example.com/p.jpg"),
            ("rating", "7.1"),
        ]))
        .unwrap();
        assert_eq!(params.position, BadgePosition::TopLeft);
    }

    #[test]
    fn test_unrecognized_position_falls_back_silently() {
        // Typos and unknown values are not rejected
        for value in ["bottom-right", "top-left", "BOTTOM-LEFT", "bottomleft", ""] {
            let params = OverlayParams::from_query(&query(&[
                ("posterUrl", "https://example.com/p.jpg"),
                ("rating", "7.1"),
                ("position", value),
            ]))
            .unwrap();
            assert_eq!(params.position, BadgePosition::TopLeft, "value: {value:?}");
        }
    }

    #[test]
    fn test_missing_poster_url_rejected() {
        let err = OverlayParams::from_query(&query(&[("rating", "8.5")])).unwrap_err();
        assert!(matches!(err, OverlayError::InvalidRequest(_)));
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_missing_rating_rejected() {
        let err = OverlayParams::from_query(&query(&[(
            "posterUrl",
            "https://example.com/p.jpg",
        )]))
        .unwrap_err();
        assert!(matches!(err, OverlayError::InvalidRequest(_)));
    }

    #[test]
    fn test_empty_rating_rejected() {
        let err = OverlayParams::from_query(&query(&[
            ("posterUrl", "https://example.com/p.jpg"),
            ("rating", ""),
        ]))
        .unwrap_err();
        assert!(matches!(err, OverlayError::InvalidRequest(_)));
    }

    #[test]
    fn test_rating_is_opaque_text() {
        // Arbitrary strings pass through; no numeric validation
        let params = OverlayParams::from_query(&query(&[
            ("posterUrl", "https://example.com/p.jpg"),
            ("rating", "not-a-number (really)"),
        ]))
        .unwrap();
        assert_eq!(params.rating, "not-a-number (really)");
    }

    #[test]
    fn test_position_from_query_value() {
        assert_eq!(
            BadgePosition::from_query_value(Some("bottom-left")),
            BadgePosition::BottomLeft
        );
        assert_eq!(
            BadgePosition::from_query_value(Some("anything-else")),
            BadgePosition::TopLeft
        );
        assert_eq!(BadgePosition::from_query_value(None), BadgePosition::TopLeft);
    }

    #[test]
    fn test_position_as_str() {
        assert_eq!(BadgePosition::TopLeft.as_str(), "top-left");
        assert_eq!(BadgePosition::BottomLeft.as_str(), "bottom-left");
    }
}
