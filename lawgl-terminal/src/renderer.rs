//! ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use lawgl_core::projection::clip_to_screen;
use lawgl_core::{Mesh, RenderSurface, Triangle, Uniform};
use nalgebra::{Vector3, Vector4};
use std::io::Write;

/// Character ramp for depth shading (farthest to nearest)
const DEPTH_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph for geometry drawn without depth testing
const FLAT_FILL: char = '#';

/// Far plane value the depth buffer is cleared to
const CLEAR_DEPTH: f32 = 1.0;

/// A projected vertex: screen x, screen y, NDC depth, RGBA color
type ScreenVertex = (f32, f32, f32, [f32; 4]);

/// ASCII renderer that rasterizes one static mesh into terminal cells
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    mesh: Mesh,
    depth_test: bool,
    uniform: Option<Uniform>,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<(u8, u8, u8)>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, mesh: Mesh, depth_test: bool) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            mesh,
            depth_test,
            uniform: None,
            depth_buffer: vec![CLEAR_DEPTH; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![(0, 0, 0); size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let size = width * height;
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![CLEAR_DEPTH; size];
        self.char_buffer = vec![' '; size];
        self.color_buffer = vec![(0, 0, 0); size];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(CLEAR_DEPTH);
        self.char_buffer.fill(' ');
        self.color_buffer.fill((0, 0, 0));
    }

    /// Character grid as plain text, one string per row
    pub fn rows(&self) -> Vec<String> {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
            .collect()
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<(char, (u8, u8, u8))> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some((self.char_buffer[idx], self.color_buffer[idx]))
    }

    /// Vertex stage: apply the uniform the same way the demo shaders do
    fn to_clip(uniform: &Uniform, x: f32, y: f32, z: f32) -> Vector4<f32> {
        match uniform {
            // vec4(matrix * vec3(a_position, 1), 1)
            Uniform::Mat3(m) => {
                let v = m * Vector3::new(x, y, 1.0);
                Vector4::new(v.x, v.y, v.z, 1.0)
            }
            // matrix * a_position
            Uniform::Mat4(m) => m * Vector4::new(x, y, z, 1.0),
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, uniform: &Uniform) {
        let mut screen = [(0.0, 0.0, 0.0, [0.0; 4]); 3];
        for (slot, vertex) in screen.iter_mut().zip(&triangle.vertices) {
            let p = vertex.position;
            let clip = Self::to_clip(uniform, p.x, p.y, p.z);
            match clip_to_screen(&clip, self.width as u32, self.height as u32) {
                Some((x, y, depth)) => *slot = (x, y, depth, vertex.color),
                None => return, // Triangle is clipped
            }
        }

        self.rasterize_triangle(&screen);
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenVertex; 3]) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                // Outside the clip volume
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }

                let idx = y as usize * self.width + x as usize;
                if self.depth_test {
                    if depth >= self.depth_buffer[idx] {
                        continue;
                    }
                    self.depth_buffer[idx] = depth;
                }

                let color = blend([v0.3, v1.3, v2.3], [w0, w1, w2]);
                self.color_buffer[idx] = color;
                self.char_buffer[idx] = if self.depth_test {
                    depth_glyph(depth)
                } else {
                    FLAT_FILL
                };
            }
        }
    }

    /// Write the character grid with its top-left corner at `(left, top)`
    pub fn draw<W: Write>(&self, writer: &mut W, left: u16, top: u16) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(MoveTo(left, top + y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];
                let (r, g, b) = self.color_buffer[idx];

                if c != ' ' && current != Some((r, g, b)) {
                    writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                    current = Some((r, g, b));
                }
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderSurface for AsciiRenderer {
    fn set_transform_uniform(&mut self, uniform: &Uniform) {
        self.uniform = Some(uniform.clone());
    }

    fn draw_frame(&mut self) {
        self.clear();
        let Some(uniform) = self.uniform.take() else {
            return;
        };

        // Temporarily take the mesh so triangles can be rasterized into self
        let placeholder = Mesh::new(self.mesh.dimension);
        let mesh = std::mem::replace(&mut self.mesh, placeholder);
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, &uniform);
        }
        self.mesh = mesh;
        self.uniform = Some(uniform);
    }
}

/// Nearer fragments get denser glyphs
fn depth_glyph(depth: f32) -> char {
    let t = (1.0 - depth) / 2.0;
    let idx = (t * (DEPTH_RAMP.len() - 1) as f32).round() as usize;
    DEPTH_RAMP[idx.min(DEPTH_RAMP.len() - 1)]
}

fn blend(colors: [[f32; 4]; 3], weights: [f32; 3]) -> (u8, u8, u8) {
    let channel = |i: usize| {
        let v: f32 = colors.iter().zip(weights).map(|(c, w)| c[i] * w).sum();
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    (channel(0), channel(1), channel(2))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawgl_core::{FlatScene, ParamKey, ParamValue, Scene, SpatialScene};

    fn render(scene: &dyn Scene, width: usize, height: usize) -> AsciiRenderer {
        let mut renderer =
            AsciiRenderer::new(width, height, scene.mesh().clone(), scene.depth_test());
        renderer.set_transform_uniform(&scene.frame().uniform);
        renderer.draw_frame();
        renderer
    }

    #[test]
    fn test_nothing_drawn_without_uniform() {
        let mut renderer = AsciiRenderer::new(10, 5, Mesh::rectangle(), false);
        renderer.draw_frame();
        assert!(renderer.rows().iter().all(|row| row.trim().is_empty()));
    }

    #[test]
    fn test_rectangle_covers_center() {
        let renderer = render(&FlatScene::new(), 40, 20);
        let (c, _) = renderer.cell(20, 10).unwrap();
        assert_eq!(c, FLAT_FILL);
        // Rectangle spans +-0.4 in x, so the left edge column stays empty
        assert_eq!(renderer.cell(0, 10).unwrap().0, ' ');
        assert_eq!(renderer.cell(20, 0).unwrap().0, ' ');
    }

    #[test]
    fn test_translation_moves_coverage() {
        let mut scene = FlatScene::new();
        scene.set(ParamKey::TranslateX, ParamValue::Scalar(0.6)).unwrap();
        let renderer = render(&scene, 40, 20);
        assert_eq!(renderer.cell(20, 10).unwrap().0, ' ');
        assert_eq!(renderer.cell(32, 10).unwrap().0, FLAT_FILL);
    }

    #[test]
    fn test_cube_nearest_face_wins() {
        let renderer = render(&SpatialScene::new(), 40, 20);
        let (c, color) = renderer.cell(20, 10).unwrap();
        assert_ne!(c, ' ');
        // Smaller NDC depth is nearer: the green z = -0.5 face hides the red one
        assert_eq!(color, (0, 255, 0));
    }

    #[test]
    fn test_depth_glyph_ramp() {
        assert_eq!(depth_glyph(1.0), '.');
        assert_eq!(depth_glyph(-1.0), '@');
        assert_eq!(depth_glyph(0.0), '+');
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
