//! Homogeneous transformation matrices
//!
//! All matrices act on column vectors (`p' = M * p`), in 2D (`Matrix3`) and
//! 3D (`Matrix4`). Rotation angles are given in turns, where one turn is a
//! full revolution.
use nalgebra::{Matrix3, Matrix4, SMatrix};
use std::f32::consts::TAU;

/// Rotation axis for 3D rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Convert a fraction of a full revolution into radians
pub fn turns_to_radians(turns: f32) -> f32 {
    turns * TAU
}

/// Transform builder for homogeneous matrices
pub struct Transform;

impl Transform {
    /// The `N x N` identity matrix
    pub fn identity<const N: usize>() -> SMatrix<f32, N, N> {
        SMatrix::<f32, N, N>::identity()
    }

    /// Create a 2D translation matrix
    pub fn translation_2d(dx: f32, dy: f32) -> Matrix3<f32> {
        Matrix3::new(
            1.0, 0.0, dx, //
            0.0, 1.0, dy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Create a 3D translation matrix
    pub fn translation(dx: f32, dy: f32, dz: f32) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, dx, //
            0.0, 1.0, 0.0, dy, //
            0.0, 0.0, 1.0, dz, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Create a 2D rotation matrix (about the implicit Z axis)
    pub fn rotation_2d(turns: f32) -> Matrix3<f32> {
        let (s, c) = turns_to_radians(turns).sin_cos();
        Matrix3::new(
            c, -s, 0.0, //
            s, c, 0.0, //
            0.0, 0.0, 1.0,
        )
    }

    /// Create a rotation matrix about a single axis
    ///
    /// The Y rotation keeps the sign pattern of the X and Z rotations mirrored
    /// (`-sin` above the diagonal in row 0), so a positive Y turn swings +X
    /// towards +Z.
    pub fn rotation(axis: Axis, turns: f32) -> Matrix4<f32> {
        let (s, c) = turns_to_radians(turns).sin_cos();
        match axis {
            Axis::X => Matrix4::new(
                1.0, 0.0, 0.0, 0.0, //
                0.0, c, -s, 0.0, //
                0.0, s, c, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
            Axis::Y => Matrix4::new(
                c, 0.0, -s, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                s, 0.0, c, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
            Axis::Z => Matrix4::new(
                c, -s, 0.0, 0.0, //
                s, c, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Combined rotation `Rx * Ry * Rz`, so Z is applied first
    pub fn rotation_xyz(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        let rx = Self::rotation(Axis::X, x);
        let ry = Self::rotation(Axis::Y, y);
        let rz = Self::rotation(Axis::Z, z);

        Self::multiply(&Self::multiply(&rx, &ry), &rz)
    }

    /// Matrix product `a * b`; `b` is applied to a point first
    pub fn multiply<const N: usize>(
        a: &SMatrix<f32, N, N>,
        b: &SMatrix<f32, N, N>,
    ) -> SMatrix<f32, N, N> {
        a * b
    }
}
