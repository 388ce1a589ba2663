//! Read-only helpers over a timeline: range queries, duration splitting, keyframe sampling.

use crate::{
    animation::ease::Ease,
    composition::model::{AnimationTimeline, Layer, Scene},
    effects::sequencer::resolve_scene_spans,
    foundation::core::{FrameIndex, FrameRange},
};

/// Keyframes are emitted every this many frames.
pub const KEYFRAME_STEP: u64 = 5;

/// Scenes whose on-screen span intersects `range`, with their indices.
pub fn scenes_in_frame_range(
    timeline: &AnimationTimeline,
    range: FrameRange,
) -> Vec<(usize, &Scene)> {
    resolve_scene_spans(&timeline.scenes)
        .into_iter()
        .filter(|span| span.range.overlaps(range))
        .map(|span| (span.index, &timeline.scenes[span.index]))
        .collect()
}

/// Layers that have started by global `frame`, tagged with their scene index.
pub fn layers_at_frame(timeline: &AnimationTimeline, frame: FrameIndex) -> Vec<(usize, &Layer)> {
    let mut out = Vec::new();
    for span in resolve_scene_spans(&timeline.scenes) {
        let Some(local) = span.local_frame(frame) else {
            continue;
        };
        let local = i64::try_from(local).unwrap_or(i64::MAX);
        for layer in &timeline.scenes[span.index].layers {
            if local >= layer.start_offset() {
                out.push((span.index, layer));
            }
        }
    }
    out
}

/// Split `total_frames` evenly across `scene_count` scenes; the last scene takes the remainder.
pub fn calculate_scene_durations(total_frames: u64, scene_count: usize) -> Vec<u64> {
    if scene_count == 0 {
        return Vec::new();
    }
    let n = scene_count as u64;
    let base = total_frames / n;
    let mut out = vec![base; scene_count];
    if let Some(last) = out.last_mut() {
        *last += total_frames - base * n;
    }
    out
}

/// Sampled animation value at one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Keyframe {
    pub frame: u64,
    pub value: f64,
}

/// Sample an eased `from -> to` move every [`KEYFRAME_STEP`] frames, always including the end.
pub fn generate_keyframes(duration: u64, from: f64, to: f64, ease: Ease) -> Vec<Keyframe> {
    if duration == 0 {
        return vec![Keyframe {
            frame: 0,
            value: to,
        }];
    }
    let mut out: Vec<Keyframe> = (0..=duration)
        .step_by(KEYFRAME_STEP as usize)
        .map(|frame| Keyframe {
            frame,
            value: from + (to - from) * ease.apply(frame as f64 / duration as f64),
        })
        .collect();
    if out.last().map(|k| k.frame) != Some(duration) {
        out.push(Keyframe {
            frame: duration,
            value: to,
        });
    }
    out
}

/// Scale a font size designed for a 1080x1080 canvas to `width x height`.
pub fn responsive_font_size(base: f64, width: u32, height: u32) -> f64 {
    let scale = (f64::from(width) * f64::from(height)).sqrt() / 1080.0;
    (base * scale).round()
}

#[cfg(test)]
#[path = "../../tests/unit/composition/query.rs"]
mod tests;
