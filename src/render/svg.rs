//! SVG output for turtle drawings.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::LsysResult;
use crate::render::{Drawing, Point};

const MARGIN: f64 = 10.0;

/// Displays a [`Drawing`] as a standalone SVG document.
///
/// Turtle coordinates grow upwards, so y is negated on output.
pub struct Svg<'a>(pub &'a Drawing);

impl Svg<'_> {
    pub fn write_to(&self, path: &Path) -> LsysResult<()> {
        fs::write(path, self.to_string())?;
        log::debug!("wrote {} segments to {}", self.0.segments.len(), path.display());
        Ok(())
    }
}

impl fmt::Display for Svg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let drawing = self.0;
        let widest = drawing
            .segments
            .iter()
            .map(|s| s.width)
            .fold(0.0_f64, f64::max);
        let pad = MARGIN + widest;
        let bounds = &drawing.bounds;

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.2} {:.2} {:.2} {:.2}">"#,
            bounds.min_x - pad,
            -bounds.max_y - pad,
            bounds.width() + 2.0 * pad,
            bounds.height() + 2.0 * pad
        )?;
        for segment in &drawing.segments {
            let (start, end) = (flip(segment.start), flip(segment.end));
            writeln!(
                f,
                r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}" stroke-linecap="round"/>"#,
                start.x,
                start.y,
                end.x,
                end.y,
                escape(&segment.color),
                segment.width
            )?;
        }
        writeln!(f, "</svg>")
    }
}

fn flip(point: Point) -> Point {
    Point {
        x: point.x,
        // never -0.0
        y: 0.0 - point.y,
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::definition::DrawingSettings;
    use crate::render::Turtle;

    #[test]
    fn one_line_per_segment() {
        let drawing = Turtle::new(DrawingSettings::default())
            .draw("F[+F][-F]")
            .unwrap();
        let svg = drawing.to_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<line ").count(), 3);
    }

    #[test]
    fn upward_segment_has_negative_svg_y() {
        let drawing = Turtle::new(DrawingSettings::default()).draw("F").unwrap();
        let svg = Svg(&drawing).to_string();
        assert!(svg.contains(r#"y1="0.00""#));
        assert!(svg.contains(r#"y2="-10.00""#));
        assert!(svg.contains(r#"stroke="black""#));
    }

    #[test]
    fn colors_are_escaped() {
        assert_eq!(escape(r#"a"<b>&"#), "a&quot;&lt;b&gt;&amp;");
    }
}
