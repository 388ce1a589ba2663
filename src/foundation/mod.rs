//! Frame and canvas primitives, the error taxonomy, and small numeric helpers.

/// Frames, ranges, canvas and resolution types.
pub mod core;
/// Error taxonomy shared by the engine and the pipeline.
pub mod error;
/// Interpolation, clamping and hash noise.
pub mod math;
