//! Projection matrix and clip-space to screen mapping
use nalgebra::{Matrix4, Vector4};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            ProjectionMode::Perspective
        } else {
            ProjectionMode::Orthographic
        }
    }
}

/// Blended perspective matrix
///
/// `f = 0` is an orthographic-like matrix with the X/Y diagonal scaled by
/// `1 / 1.5`; `f = 1` puts `z` into `w` so the GPU's perspective divide
/// shrinks far points. In between the two are blended linearly.
pub fn perspective(f: f32) -> Matrix4<f32> {
    let scale = (f + 1.0) / 1.5;
    Matrix4::new(
        scale, 0.0, 0.0, 0.0, //
        0.0, scale, 0.0, 0.0, //
        0.0, 0.0, 1.0, f, //
        0.0, 0.0, f, 1.0,
    )
}

/// Map a clip-space position onto a `width x height` viewport
///
/// Returns `(screen_x, screen_y, depth)` with depth in NDC (-1 near, 1 far),
/// or `None` when `w` is not positive. Depth is not range-checked here; the
/// rasterizer discards fragments outside [-1, 1].
pub fn clip_to_screen(clip: &Vector4<f32>, width: u32, height: u32) -> Option<(f32, f32, f32)> {
    // Behind the viewer, or a near-zero w
    if clip.w < 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, depth))
}
