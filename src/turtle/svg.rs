//! SVG output for rendered segments

use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::turtle::Segment;

/// Margin around the drawing, in world units.
const MARGIN: f64 = 10.0;

/// Render segments to an SVG document string. World +y points north, SVG
/// +y points down, so y coordinates are negated.
pub fn render(segments: &[Segment]) -> String {
    let (min, max) = bounds(segments);
    let width = (max.0 - min.0) + 2.0 * MARGIN;
    let height = (max.1 - min.1) + 2.0 * MARGIN;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{:.2} {:.2} {:.2} {:.2}\">\n",
        min.0 - MARGIN,
        min.1 - MARGIN,
        width,
        height
    );
    for segment in segments {
        svg.push_str(&format!(
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>\n",
            segment.from.x, -segment.from.y, segment.to.x, -segment.to.y, segment.color
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

/// Write the segments to an SVG file.
pub fn write(path: &Path, segments: &[Segment]) -> Result<()> {
    fs::write(path, render(segments))?;
    tracing::info!(file = %path.display(), segments = segments.len(), "saved image");
    Ok(())
}

/// Bounding box over every endpoint, in SVG coordinates (y negated).
/// An empty drawing gets a unit box around the origin.
fn bounds(segments: &[Segment]) -> ((f64, f64), (f64, f64)) {
    if segments.is_empty() {
        return ((-0.5, -0.5), (0.5, 0.5));
    }
    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for segment in segments {
        for point in [segment.from, segment.to] {
            min.0 = min.0.min(point.x);
            min.1 = min.1.min(-point.y);
            max.0 = max.0.max(point.x);
            max.1 = max.1.max(-point.y);
        }
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turtle::{Point, Segment};

    fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
            color: "black".to_string(),
        }
    }

    #[test]
    fn renders_a_line_per_segment() {
        let svg = render(&[segment(0.0, 0.0, 3.0, 0.0), segment(3.0, 0.0, 3.0, 3.0)]);
        assert_eq!(svg.matches("<line ").count(), 2);
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn y_axis_is_flipped() {
        let svg = render(&[segment(0.0, 0.0, 0.0, 5.0)]);
        assert!(svg.contains("y2=\"-5.00\""));
    }

    #[test]
    fn empty_drawing_still_renders() {
        let svg = render(&[]);
        assert!(svg.contains("viewBox"));
    }

    #[test]
    fn stroke_uses_the_segment_color() {
        let mut colored = segment(0.0, 0.0, 1.0, 0.0);
        colored.color = "#228b22".to_string();
        let svg = render(&[colored]);
        assert!(svg.contains("stroke=\"#228b22\""));
    }
}
