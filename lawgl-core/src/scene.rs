//! Per-demo scene state
//!
//! Each scene owns its mesh and the current slider values, and turns them
//! into a [`Frame`] on request. Scenes share nothing with each other.
use nalgebra::{Matrix3, Matrix4};

use crate::compose::{compose_flat, compose_spatial, FlatParams, SpatialParams};
use crate::display::MatrixPanel;
use crate::error::ParamError;
use crate::geometry::{Dimension, Mesh};
use crate::params::{Control, ParamKey, ParamValue, FLAT_CONTROLS, SPATIAL_CONTROLS};
use crate::projection::ProjectionMode;

/// The transform uniform handed to a rendering surface
#[derive(Debug, Clone, PartialEq)]
pub enum Uniform {
    Mat3(Matrix3<f32>),
    Mat4(Matrix4<f32>),
}

impl Uniform {
    /// Column-major entries, ready for `uniformMatrix*fv` without transpose
    pub fn as_slice(&self) -> &[f32] {
        match self {
            Uniform::Mat3(m) => m.as_slice(),
            Uniform::Mat4(m) => m.as_slice(),
        }
    }
}

/// Everything a redraw needs: the uniform plus the matrices to display
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub uniform: Uniform,
    pub panels: Vec<MatrixPanel>,
}

/// Which demo a scene implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Basic,
    Flat,
    Spatial,
}

impl SceneKind {
    pub fn build(self) -> Box<dyn Scene> {
        match self {
            SceneKind::Basic => Box::new(BasicScene::new()),
            SceneKind::Flat => Box::new(FlatScene::new()),
            SceneKind::Spatial => Box::new(SpatialScene::new()),
        }
    }
}

pub trait Scene {
    fn name(&self) -> &'static str;

    fn mesh(&self) -> &Mesh;

    fn controls(&self) -> &'static [Control];

    /// Current value of a control, `None` if the scene has no such control
    fn value(&self, key: ParamKey) -> Option<ParamValue>;

    /// Store a new value. Values outside the slider range are kept as given.
    fn set(&mut self, key: ParamKey, value: ParamValue) -> Result<(), ParamError>;

    /// Compose the current transform
    fn frame(&self) -> Frame;

    /// Whether the rendered geometry needs depth testing
    fn depth_test(&self) -> bool {
        self.mesh().dimension == Dimension::Three
    }

    fn apply_all(&mut self, assignments: &[(ParamKey, ParamValue)]) -> Result<(), ParamError> {
        for &(key, value) in assignments {
            self.set(key, value)?;
        }
        Ok(())
    }
}

fn unsupported(key: ParamKey, scene: &'static str) -> ParamError {
    ParamError::Unsupported { key, scene }
}

/// A single red triangle drawn with the identity transform
pub struct BasicScene {
    mesh: Mesh,
}

impl BasicScene {
    pub fn new() -> Self {
        Self {
            mesh: Mesh::triangle(),
        }
    }
}

impl Default for BasicScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for BasicScene {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn controls(&self) -> &'static [Control] {
        &[]
    }

    fn value(&self, _key: ParamKey) -> Option<ParamValue> {
        None
    }

    fn set(&mut self, key: ParamKey, _value: ParamValue) -> Result<(), ParamError> {
        Err(unsupported(key, self.name()))
    }

    fn frame(&self) -> Frame {
        Frame {
            uniform: Uniform::Mat3(Matrix3::identity()),
            panels: Vec::new(),
        }
    }
}

/// The 2D rectangle demo
pub struct FlatScene {
    mesh: Mesh,
    pub params: FlatParams,
}

impl FlatScene {
    pub fn new() -> Self {
        Self {
            mesh: Mesh::rectangle(),
            params: FlatParams::default(),
        }
    }
}

impl Default for FlatScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for FlatScene {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn controls(&self) -> &'static [Control] {
        FLAT_CONTROLS
    }

    fn value(&self, key: ParamKey) -> Option<ParamValue> {
        let p = &self.params;
        let v = match key {
            ParamKey::TranslateX => p.translate_x,
            ParamKey::TranslateY => p.translate_y,
            ParamKey::Rotate => p.rotate,
            _ => return None,
        };
        Some(ParamValue::Scalar(v))
    }

    fn set(&mut self, key: ParamKey, value: ParamValue) -> Result<(), ParamError> {
        let slot = match key {
            ParamKey::TranslateX => &mut self.params.translate_x,
            ParamKey::TranslateY => &mut self.params.translate_y,
            ParamKey::Rotate => &mut self.params.rotate,
            _ => return Err(unsupported(key, "flat")),
        };
        *slot = value.as_scalar(key)?;
        Ok(())
    }

    fn frame(&self) -> Frame {
        let composed = compose_flat(&self.params);
        Frame {
            uniform: Uniform::Mat3(composed.result),
            panels: vec![
                MatrixPanel::new("Translation", "translate-matrix", &composed.translation),
                MatrixPanel::new("Rotation", "rotate-matrix", &composed.rotation),
                MatrixPanel::new("Result", "result-matrix", &composed.result),
            ],
        }
    }
}

/// The 3D cube demo
pub struct SpatialScene {
    mesh: Mesh,
    pub params: SpatialParams,
}

impl SpatialScene {
    pub fn new() -> Self {
        Self {
            mesh: Mesh::cube(1.0),
            params: SpatialParams::default(),
        }
    }
}

impl Default for SpatialScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for SpatialScene {
    fn name(&self) -> &'static str {
        "spatial"
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn controls(&self) -> &'static [Control] {
        SPATIAL_CONTROLS
    }

    fn value(&self, key: ParamKey) -> Option<ParamValue> {
        let p = &self.params;
        let v = match key {
            ParamKey::TranslateX => p.translate_x,
            ParamKey::TranslateY => p.translate_y,
            ParamKey::TranslateZ => p.translate_z,
            ParamKey::RotateX => p.rotate_x,
            ParamKey::RotateY => p.rotate_y,
            ParamKey::RotateZ => p.rotate_z,
            ParamKey::P => p.p,
            ParamKey::Perspective => return Some(ParamValue::Toggle(p.perspective)),
            ParamKey::Rotate => return None,
        };
        Some(ParamValue::Scalar(v))
    }

    fn set(&mut self, key: ParamKey, value: ParamValue) -> Result<(), ParamError> {
        let p = &mut self.params;
        let slot = match key {
            ParamKey::TranslateX => &mut p.translate_x,
            ParamKey::TranslateY => &mut p.translate_y,
            ParamKey::TranslateZ => &mut p.translate_z,
            ParamKey::RotateX => &mut p.rotate_x,
            ParamKey::RotateY => &mut p.rotate_y,
            ParamKey::RotateZ => &mut p.rotate_z,
            ParamKey::P => &mut p.p,
            ParamKey::Perspective => {
                p.perspective = value.as_toggle(key)?;
                return Ok(());
            }
            ParamKey::Rotate => return Err(unsupported(key, "spatial")),
        };
        *slot = value.as_scalar(key)?;
        Ok(())
    }

    fn frame(&self) -> Frame {
        let composed = compose_spatial(&self.params);
        let projection_title = match composed.mode {
            ProjectionMode::Perspective => "Projection",
            ProjectionMode::Orthographic => "Projection (off)",
        };
        Frame {
            uniform: Uniform::Mat4(composed.result),
            panels: vec![
                MatrixPanel::new("Translation", "translate-matrix", &composed.translation),
                MatrixPanel::new("Rotation", "rotate-matrix", &composed.rotation),
                MatrixPanel::new(projection_title, "projection-matrix", &composed.projection),
                MatrixPanel::new("Result", "result-matrix", &composed.result),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_controls() {
        for kind in [SceneKind::Flat, SceneKind::Spatial] {
            let scene = kind.build();
            for control in scene.controls() {
                assert_eq!(scene.value(control.key), Some(control.default));
            }
        }
    }

    #[test]
    fn test_basic_scene_is_identity() {
        let scene = BasicScene::new();
        let frame = scene.frame();
        assert_eq!(frame.uniform, Uniform::Mat3(Matrix3::identity()));
        assert!(frame.panels.is_empty());
        assert!(!scene.depth_test());
    }

    #[test]
    fn test_flat_set_and_frame() {
        let mut scene = FlatScene::new();
        scene.set(ParamKey::TranslateX, ParamValue::Scalar(0.5)).unwrap();
        assert_eq!(scene.params.translate_x, 0.5);

        let frame = scene.frame();
        assert_eq!(frame.panels.len(), 3);
        assert_eq!(frame.uniform.as_slice().len(), 9);
        // Column-major: translation lands in the last column
        assert_eq!(frame.uniform.as_slice()[6], 0.5);
    }

    #[test]
    fn test_spatial_rejects_flat_rotate() {
        let mut scene = SpatialScene::new();
        assert_eq!(
            scene.set(ParamKey::Rotate, ParamValue::Scalar(0.1)),
            Err(ParamError::Unsupported {
                key: ParamKey::Rotate,
                scene: "spatial"
            })
        );
        assert!(matches!(
            scene.set(ParamKey::P, ParamValue::Toggle(true)),
            Err(ParamError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_out_of_range_values_kept() {
        let mut scene = SpatialScene::new();
        scene.set(ParamKey::TranslateZ, ParamValue::Scalar(7.5)).unwrap();
        assert_eq!(scene.value(ParamKey::TranslateZ), Some(ParamValue::Scalar(7.5)));
    }

    #[test]
    fn test_spatial_frame_panels() {
        let mut scene = SpatialScene::new();
        scene
            .apply_all(&[
                (ParamKey::Perspective, ParamValue::Toggle(true)),
                (ParamKey::P, ParamValue::Scalar(1.0)),
            ])
            .unwrap();

        let frame = scene.frame();
        let targets: Vec<_> = frame.panels.iter().map(|p| p.target).collect();
        assert_eq!(
            targets,
            vec!["translate-matrix", "rotate-matrix", "projection-matrix", "result-matrix"]
        );
        assert_eq!(frame.panels[2].title, "Projection");
        assert_eq!(frame.uniform.as_slice().len(), 16);
        assert!(scene.depth_test());
    }
}
