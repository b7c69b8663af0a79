use thiserror::Error;

/// Failures reported by the guarded transform helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// The determinant was exactly zero, so no inverse exists.
    #[error("matrix is singular (determinant is exactly zero)")]
    SingularMatrix,
    /// An input would divide by zero (zero-length axis, `far == near`, ...).
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),
}

/// Failures reported by the lightmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LightError {
    #[error("light grid dimensions must be non-zero")]
    EmptyGrid,
    #[error("light grid of {width}x{height} cells is too large")]
    TooLarge { width: usize, height: usize },
    #[error("raw lightmap has {actual} cells, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("no map is loaded")]
    NoMapLoaded,
}
