//! Error types shared by the core and the frontends
use thiserror::Error;

use crate::params::ParamKey;

/// Errors raised while reading or applying slider parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("unknown parameter `{0}`")]
    UnknownName(String),

    #[error("parameter `{key}` is not used by the {scene} scene")]
    Unsupported { key: ParamKey, scene: &'static str },

    #[error("parameter `{key}` expects {expected}")]
    WrongKind { key: ParamKey, expected: &'static str },

    #[error("malformed parameter list near `{0}`")]
    Syntax(String),
}

/// Errors raised while setting up a rendering surface
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("graphics context unavailable: {0}")]
    Context(String),

    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("failed to link program: {0}")]
    ProgramLink(String),

    #[error("attribute `{0}` missing from program")]
    MissingAttribute(&'static str),

    #[error("uniform `{0}` missing from program")]
    MissingUniform(&'static str),

    #[error("failed to create {0}")]
    Allocation(&'static str),
}
