//! Human-readable matrix grids
use std::fmt::{self, Write};

use nalgebra::SMatrix;

/// A labelled snapshot of a matrix for display
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixPanel {
    pub title: &'static str,
    /// Element id of the grid container on the demo page
    pub target: &'static str,
    pub size: usize,
    /// Row-major entries
    pub values: Vec<f32>,
}

/// Format one entry with two decimals
///
/// Anything that rounds to zero prints as `0.00`, never `-0.00`; `f32`
/// trig leaves residues like `cos(TAU / 4) = -4.4e-8`.
pub fn format_entry(value: f32) -> String {
    if value.abs() < 0.005 {
        return "0.00".to_string();
    }
    format!("{value:.2}")
}

impl MatrixPanel {
    pub fn new<const N: usize>(
        title: &'static str,
        target: &'static str,
        matrix: &SMatrix<f32, N, N>,
    ) -> Self {
        let mut values = Vec::with_capacity(N * N);
        for row in matrix.row_iter() {
            values.extend(row.iter().copied());
        }
        Self {
            title,
            target,
            size: N,
            values,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks(self.size)
    }

    /// One right-aligned text line per matrix row
    pub fn lines(&self) -> Vec<String> {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|&v| format!("{:>6}", format_entry(v)))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// `<div class="row">` per row, `<div class="box">` per entry
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for row in self.rows() {
            html.push_str(r#"<div class="row">"#);
            for &v in row {
                // Writing into a String cannot fail
                let _ = write!(html, r#"<div class="box">{}</div>"#, format_entry(v));
            }
            html.push_str("</div>");
        }
        html
    }
}

impl fmt::Display for MatrixPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for line in self.lines() {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix3, Matrix4};

    #[test]
    fn test_negative_zero() {
        assert_eq!(format_entry(-0.0), "0.00");
        assert_eq!(format_entry(-4.4e-8), "0.00");
        assert_eq!(format_entry(-0.25), "-0.25");
        assert_eq!(format_entry(1.0 / 1.5), "0.67");
    }

    #[test]
    fn test_row_major_order() {
        let m = Matrix3::new(
            1.0, 0.0, 0.2, //
            0.0, 1.0, -0.1, //
            0.0, 0.0, 1.0,
        );
        let panel = MatrixPanel::new("Translation", "translate-matrix", &m);
        assert_eq!(panel.size, 3);
        assert_eq!(&panel.values[..3], &[1.0, 0.0, 0.2]);
        assert_eq!(
            panel.lines(),
            vec![
                "  1.00   0.00   0.20".to_string(),
                "  0.00   1.00  -0.10".to_string(),
                "  0.00   0.00   1.00".to_string(),
            ]
        );
    }

    #[test]
    fn test_html_grid() {
        let panel = MatrixPanel::new("Result", "result-matrix", &Matrix4::<f32>::identity());
        let html = panel.to_html();
        assert_eq!(html.matches(r#"<div class="row">"#).count(), 4);
        assert_eq!(html.matches(r#"<div class="box">"#).count(), 16);
        assert!(html.starts_with(
            r#"<div class="row"><div class="box">1.00</div><div class="box">0.00</div>"#
        ));
    }

    #[test]
    fn test_display_has_title() {
        let panel = MatrixPanel::new("Rotation", "rotate-matrix", &Matrix3::<f32>::identity());
        let text = panel.to_string();
        assert!(text.starts_with("Rotation\n"));
        assert_eq!(text.lines().count(), 4);
    }
}
