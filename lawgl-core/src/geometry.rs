//! Geometry primitives for the demo scenes
use nalgebra::Point3;

/// RGBA color with components in [0, 1]
pub type Color = [f32; 4];

pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
pub const CYAN: Color = [0.0, 1.0, 1.0, 1.0];
pub const MAGENTA: Color = [1.0, 0.0, 1.0, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

/// A vertex with position and flat color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub color: Color,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, color: Color) -> Self {
        Self {
            position: Point3::new(x, y, z),
            color,
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }
}

/// Number of position components per vertex in the uploaded buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Two,
    Three,
}

impl Dimension {
    pub fn components(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}

/// A static triangle list
#[derive(Debug, Clone)]
pub struct Mesh {
    pub dimension: Dimension,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(dimension: Dimension, capacity: usize) -> Self {
        Self {
            dimension,
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Flattened positions, 2 or 3 floats per vertex depending on dimension
    pub fn positions(&self) -> Vec<f32> {
        let n = self.dimension.components();
        let mut out = Vec::with_capacity(self.vertex_count() * n);
        for v in self.vertices() {
            out.extend_from_slice(&v.position.coords.as_slice()[..n]);
        }
        out
    }

    /// Flattened RGBA colors, 4 floats per vertex
    pub fn colors(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertex_count() * 4);
        for v in self.vertices() {
            out.extend_from_slice(&v.color);
        }
        out
    }

    /// The solid red triangle of the basic demo
    pub fn triangle() -> Self {
        let mut mesh = Self::with_capacity(Dimension::Two, 1);
        mesh.add_triangle(Triangle::new(
            Vertex::new(-0.5, -0.5, 0.0, RED),
            Vertex::new(0.5, -0.5, 0.0, RED),
            Vertex::new(0.0, 0.5, 0.0, RED),
        ));
        mesh
    }

    /// A 0.8 x 0.6 rectangle with a blue to white gradient
    pub fn rectangle() -> Self {
        let (hw, hh) = (0.4, 0.3);
        let mut mesh = Self::with_capacity(Dimension::Two, 2);

        mesh.add_triangle(Triangle::new(
            Vertex::new(-hw, -hh, 0.0, BLUE),
            Vertex::new(-hw, hh, 0.0, WHITE),
            Vertex::new(hw, -hh, 0.0, BLUE),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hw, hh, 0.0, WHITE),
            Vertex::new(hw, -hh, 0.0, BLUE),
            Vertex::new(hw, hh, 0.0, WHITE),
        ));

        mesh
    }

    /// An axis-aligned cube centered on the origin, one color per face
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(Dimension::Three, 12);
        let mut face = |color: Color, quad: [[f32; 3]; 4]| {
            let v = quad.map(|[x, y, z]| Vertex::new(x, y, z, color));
            mesh.add_triangle(Triangle::new(v[0], v[1], v[2]));
            mesh.add_triangle(Triangle::new(v[0], v[2], v[3]));
        };

        // Front (+z)
        face(RED, [[h, h, h], [h, -h, h], [-h, -h, h], [-h, h, h]]);
        // Back (-z)
        face(GREEN, [[h, -h, -h], [h, h, -h], [-h, h, -h], [-h, -h, -h]]);
        // Right (+x)
        face(YELLOW, [[h, h, h], [h, h, -h], [h, -h, -h], [h, -h, h]]);
        // Left (-x)
        face(BLUE, [[-h, h, -h], [-h, h, h], [-h, -h, h], [-h, -h, -h]]);
        // Top (+y)
        face(CYAN, [[h, h, -h], [h, h, h], [-h, h, h], [-h, h, -h]]);
        // Bottom (-y)
        face(MAGENTA, [[h, -h, -h], [-h, -h, -h], [-h, -h, h], [h, -h, h]]);

        mesh
    }
}
