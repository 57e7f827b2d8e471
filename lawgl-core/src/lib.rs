//! LAWGL Core Library - Transform pipeline shared by the demo frontends
//!
//! This library provides the platform-independent part of the demos: the
//! homogeneous matrix builders, the transform composer, the redraw-coalescing
//! frame driver, and the per-demo scene state. Frontends supply a
//! [`RenderSurface`] and a [`FrameScheduler`].

pub mod compose;
pub mod display;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod params;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use compose::{compose_flat, compose_spatial, ComposedFlat, ComposedSpatial, FlatParams, SpatialParams};
pub use display::MatrixPanel;
pub use driver::{DriverState, DriverStats, FrameDriver, FrameScheduler, RenderSurface};
pub use error::{ParamError, SurfaceError};
pub use geometry::{Color, Dimension, Mesh, Triangle, Vertex};
pub use params::{parse_assignments, Control, ParamKey, ParamKind, ParamValue};
pub use projection::{perspective, ProjectionMode};
pub use scene::{BasicScene, FlatScene, Frame, Scene, SceneKind, SpatialScene, Uniform};
pub use transform::{Axis, Transform};
