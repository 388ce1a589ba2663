//! Kinetype turns a script, a music track, and a few brand assets into a beat-synchronized
//! kinetic-typography video timeline, and evaluates that timeline frame by frame.
//!
//! The crate has two halves:
//!
//! - The engine: load or build an [`AnimationTimeline`], then ask the [`Evaluator`] for the
//!   [`FrameState`] at any frame, or stream every frame into a [`FrameSink`] with a [`RenderJob`].
//! - The pipeline: a [`GenerationPipeline`] runs upload, beat analysis, script enhancement, and
//!   timeline synthesis through pluggable providers, failing fast at the first broken stage.
#![forbid(unsafe_code)]

/// Easing curves and springs.
pub mod animation;
/// Beat analysis results and word alignment.
pub mod beat;
/// Frame fingerprints.
pub mod compile;
/// Timeline model, builders, validation, queries and edits.
pub mod composition;
/// Runtime configuration.
pub mod config;
/// Scene sequencing and transitions.
pub mod effects;
/// Per-frame evaluation.
pub mod eval;
mod foundation;
/// Generation pipeline and providers.
pub mod pipeline;
/// Frame streaming.
pub mod render;
/// Project persistence.
pub mod store;

pub use crate::foundation::core::{
    Canvas, FrameIndex, FrameRange, Resolution, frame_to_seconds, seconds_to_frame,
};
pub use crate::foundation::error::{KinetypeError, KinetypeResult, PipelineStage, ProviderFailure};

pub use crate::animation::ease::Ease;
pub use crate::beat::align::{BeatAlignment, align};
pub use crate::beat::analysis::BeatAnalysisResult;
pub use crate::composition::dsl::{SceneBuilder, TimelineBuilder};
pub use crate::composition::edit::TimelineHandle;
pub use crate::composition::model::{AnimationTimeline, Layer, Scene, TransitionType};
pub use crate::composition::validate::{ValidationReport, validate};
pub use crate::config::KinetypeConfig;
pub use crate::effects::sequencer::{SequencerState, TransitionSequencer};
pub use crate::eval::evaluator::{Evaluator, FrameState};
pub use crate::pipeline::orchestrator::{
    GenerationOutput, GenerationPipeline, GenerationRequest, RenderOverrides,
};
pub use crate::pipeline::providers::ProviderSet;
pub use crate::render::job::{RenderJob, RenderStats, RenderThreading};
pub use crate::render::sink::{FrameSink, InMemorySink, JsonLinesSink, SinkConfig};
pub use crate::store::repository::{InMemoryProjectRepository, ProjectRepository, ProjectStatus};
