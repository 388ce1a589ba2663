use crate::{
    composition::model::AnimationTimeline,
    effects::sequencer::resolve_scene_spans,
    foundation::error::{KinetypeError, KinetypeResult},
};

/// Outcome of [`validate`]. Validation is advisory; callers decide whether to reject.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Turn a failed report into a single validation error.
    pub fn into_result(self) -> KinetypeResult<()> {
        if self.valid {
            Ok(())
        } else {
            Err(KinetypeError::validation(self.errors.join("; ")))
        }
    }
}

/// Check a timeline and list every problem found. Never mutates.
pub fn validate(timeline: &AnimationTimeline) -> ValidationReport {
    let mut errors = Vec::new();

    if timeline.video.fps == 0 {
        errors.push("FPS must be greater than 0".to_string());
    }
    if timeline.video.width == 0 || timeline.video.height == 0 {
        errors.push("Video dimensions must be positive".to_string());
    }
    if timeline.scenes.is_empty() {
        errors.push("Timeline must have at least one scene".to_string());
    }
    if timeline.total_frames() == 0 {
        errors.push("Total frames must be greater than 0".to_string());
    }

    let spans = resolve_scene_spans(&timeline.scenes);
    for (idx, (scene, span)) in timeline.scenes.iter().zip(&spans).enumerate() {
        if scene.id.trim().is_empty() {
            errors.push(format!("Scene {idx} is missing an id"));
        }
        let start = i64::try_from(span.range.start.0).unwrap_or(i64::MAX);
        if start < 0 {
            errors.push(format!("Scene {idx} startFrame must be non-negative"));
        }
        let raw_end = start.saturating_add(scene.duration_in_frames);
        if raw_end <= start {
            errors.push(format!(
                "Scene {idx} endFrame must be greater than startFrame"
            ));
        }
        if scene.layers.is_empty() {
            errors.push(format!("Scene {idx} has no layers"));
        }
    }

    for (i, beat) in timeline.audio.beats.iter().enumerate() {
        if *beat < 0 {
            errors.push(format!("Beat {i} frame must be non-negative (got {beat})"));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/validate.rs"]
mod tests;
