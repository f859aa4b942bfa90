//! Error types for scene setup and GPU resource construction.
//!
//! Capability shortfalls are deliberately *not* errors: an unparseable
//! driver version string resolves to the legacy shader dialect, and a
//! failed vertex-array-object allocation selects the per-draw attribute
//! path. Both are logged at debug level and never surface to callers.

use std::fmt;

use thiserror::Error;

/// The shader stage that failed to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors reported during scene setup.
///
/// All of these are fatal to the operation that produced them: a drawable
/// without a linked program cannot render meaningfully, and a scene with
/// colliding names cannot address its entries.
#[derive(Debug, Error)]
pub enum Error {
    /// A shader stage failed to compile. Carries the driver's info log.
    #[error("{stage} shader compile error: {log}")]
    ShaderCompile {
        /// Which stage rejected its source.
        stage: ShaderStage,
        /// The driver's shader info log.
        log: String,
    },

    /// The shader program failed to link. Carries the driver's info log.
    #[error("program link error: {log}")]
    ShaderLink {
        /// The driver's program info log.
        log: String,
    },

    /// A drawable with this name is already present in the scene.
    #[error("a drawable named {0:?} already exists in the scene")]
    DuplicateName(String),

    /// The driver refused to create a GL object (program, shader, buffer).
    #[error("GL object creation failed: {0}")]
    ResourceCreation(String),
}
