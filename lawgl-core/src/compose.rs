//! Transform composition from slider parameters
use nalgebra::{Matrix3, Matrix4};

use crate::projection::{perspective, ProjectionMode};
use crate::transform::Transform;

/// Parameters of the 2D demo; rotation is in turns
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatParams {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotate: f32,
}

/// Parameters of the 3D demo; rotations are in turns, `p` is the
/// perspective blend factor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpatialParams {
    pub translate_x: f32,
    pub translate_y: f32,
    pub translate_z: f32,
    pub rotate_x: f32,
    pub rotate_y: f32,
    pub rotate_z: f32,
    pub perspective: bool,
    pub p: f32,
}

impl SpatialParams {
    pub fn projection_mode(&self) -> ProjectionMode {
        ProjectionMode::from_enabled(self.perspective)
    }
}

/// A composed 2D transform and the matrices it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedFlat {
    pub translation: Matrix3<f32>,
    pub rotation: Matrix3<f32>,
    pub result: Matrix3<f32>,
}

/// A composed 3D transform and the matrices it was built from
///
/// `projection` is always built so it can be displayed, but it only
/// contributes to `result` in perspective mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSpatial {
    pub translation: Matrix4<f32>,
    pub rotation: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub mode: ProjectionMode,
    pub result: Matrix4<f32>,
}

/// `T * R`: rotate about the origin, then translate
pub fn compose_flat(params: &FlatParams) -> ComposedFlat {
    let translation = Transform::translation_2d(params.translate_x, params.translate_y);
    let rotation = Transform::rotation_2d(params.rotate);
    let result = Transform::multiply(&translation, &rotation);

    ComposedFlat {
        translation,
        rotation,
        result,
    }
}

/// `P * T * (Rx * Ry * Rz)`, with `P` dropped unless perspective is enabled
pub fn compose_spatial(params: &SpatialParams) -> ComposedSpatial {
    let translation =
        Transform::translation(params.translate_x, params.translate_y, params.translate_z);
    let rotation = Transform::rotation_xyz(params.rotate_x, params.rotate_y, params.rotate_z);
    let projection = perspective(params.p);
    let mode = params.projection_mode();

    let model = Transform::multiply(&translation, &rotation);
    let result = match mode {
        ProjectionMode::Perspective => Transform::multiply(&projection, &model),
        ProjectionMode::Orthographic => model,
    };

    ComposedSpatial {
        translation,
        rotation,
        projection,
        mode,
        result,
    }
}
