//! Pure frame evaluation: timeline plus frame index in, [`evaluator::FrameState`] out.

/// Whole-frame evaluation entry point.
pub mod evaluator;
/// Per-layer animation state.
pub mod layer;
/// Scene entrance, typography, layout and background.
pub mod scene;
/// Word and character state for text layers.
pub mod text;
/// Film grain and light leak overlays.
pub mod vfx;
