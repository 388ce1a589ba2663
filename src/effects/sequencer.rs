use crate::{
    composition::model::{AnimationTimeline, Scene, TransitionType},
    foundation::core::{FrameIndex, FrameRange},
};

/// Length of every scene-to-scene transition, in frames.
pub const TRANSITION_FRAMES: u64 = 10;

/// Resolved placement of one scene on the output timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSpan {
    pub index: usize,
    /// Frames the scene is on screen, transition windows included.
    pub range: FrameRange,
    /// Transition into the next scene, if any.
    pub transition_out: Option<TransitionType>,
}

impl SceneSpan {
    pub fn duration(&self) -> u64 {
        self.range.len_frames()
    }

    /// Scene-local frame for a global frame inside this span.
    pub fn local_frame(&self, frame: FrameIndex) -> Option<u64> {
        self.range
            .contains(frame)
            .then(|| frame.0 - self.range.start.0)
    }
}

/// Place scenes back to back, overlapping consecutive scenes by [`TRANSITION_FRAMES`] wherever
/// the earlier scene transitions out.
pub fn resolve_scene_spans(scenes: &[Scene]) -> Vec<SceneSpan> {
    let mut out = Vec::with_capacity(scenes.len());
    let mut start = 0u64;
    let last = scenes.len().saturating_sub(1);
    for (index, scene) in scenes.iter().enumerate() {
        let duration = scene.effective_duration();
        let transition_out = (index < last && scene.transition_type != TransitionType::None)
            .then_some(scene.transition_type);
        out.push(SceneSpan {
            index,
            range: FrameRange {
                start: FrameIndex(start),
                end: FrameIndex(start + duration),
            },
            transition_out,
        });
        let overlap = if transition_out.is_some() {
            TRANSITION_FRAMES
        } else {
            0
        };
        start += duration - overlap;
    }
    out
}

/// Playback state at one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SequencerState {
    Active {
        scene: usize,
    },
    Transitioning {
        from: usize,
        to: usize,
        kind: TransitionType,
        /// Linear progress in `[0, 1)`.
        progress: f64,
    },
    Done,
}

impl SequencerState {
    /// Scene indices on screen, in paint order.
    pub fn visible_scenes(&self) -> Vec<usize> {
        match *self {
            Self::Active { scene } => vec![scene],
            Self::Transitioning { from, to, .. } => vec![from, to],
            Self::Done => Vec::new(),
        }
    }
}

/// Coarse phase used by [`TransitionSequencer::segments`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum SegmentPhase {
    Active {
        scene: usize,
    },
    Transition {
        from: usize,
        to: usize,
        kind: TransitionType,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Segment {
    pub range: FrameRange,
    pub phase: SegmentPhase,
}

/// Scene timing and the `Active -> Transitioning -> Active ... -> Done` state machine.
///
/// Built from a timeline snapshot. Rebuild it after an edit; it holds no reference to the
/// timeline.
#[derive(Clone, Debug)]
pub struct TransitionSequencer {
    spans: Vec<SceneSpan>,
    windows: Vec<(usize, FrameRange, TransitionType)>,
}

impl TransitionSequencer {
    pub fn new(timeline: &AnimationTimeline) -> Self {
        Self::from_scenes(&timeline.scenes)
    }

    pub fn from_scenes(scenes: &[Scene]) -> Self {
        let spans = resolve_scene_spans(scenes);
        let windows = spans
            .windows(2)
            .filter_map(|pair| {
                let kind = pair[0].transition_out?;
                Some((
                    pair[0].index,
                    FrameRange {
                        start: pair[1].range.start,
                        end: pair[0].range.end,
                    },
                    kind,
                ))
            })
            .collect();
        Self { spans, windows }
    }

    pub fn spans(&self) -> &[SceneSpan] {
        &self.spans
    }

    pub fn span(&self, scene: usize) -> Option<&SceneSpan> {
        self.spans.get(scene)
    }

    /// `Σ max(15, d) − Σ overlaps`.
    pub fn total_frames(&self) -> u64 {
        self.spans.last().map(|s| s.range.end.0).unwrap_or(0)
    }

    pub fn state_at(&self, frame: FrameIndex) -> SequencerState {
        // With very short scenes two windows can cover the same frame; the later one wins.
        if let Some((from, window, kind)) = self
            .windows
            .iter()
            .rev()
            .find(|(_, window, _)| window.contains(frame))
        {
            let progress = (frame.0 - window.start.0) as f64 / TRANSITION_FRAMES as f64;
            return SequencerState::Transitioning {
                from: *from,
                to: from + 1,
                kind: *kind,
                progress,
            };
        }

        self.spans
            .iter()
            .rev()
            .find(|s| s.range.contains(frame))
            .map(|s| SequencerState::Active { scene: s.index })
            .unwrap_or(SequencerState::Done)
    }

    /// Ordered, non-overlapping segments covering `[0, total_frames)`.
    pub fn segments(&self) -> Vec<Segment> {
        let mut cuts: Vec<u64> = self
            .spans
            .iter()
            .flat_map(|s| [s.range.start.0, s.range.end.0])
            .chain(
                self.windows
                    .iter()
                    .flat_map(|(_, w, _)| [w.start.0, w.end.0]),
            )
            .collect();
        cuts.sort_unstable();
        cuts.dedup();

        let mut out: Vec<Segment> = Vec::new();
        for pair in cuts.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let phase = match self.state_at(FrameIndex(a)) {
                SequencerState::Active { scene } => SegmentPhase::Active { scene },
                SequencerState::Transitioning { from, to, kind, .. } => {
                    SegmentPhase::Transition { from, to, kind }
                }
                SequencerState::Done => continue,
            };
            if let Some(prev) = out.last_mut()
                && prev.phase == phase
                && prev.range.end.0 == a
            {
                prev.range.end = FrameIndex(b);
                continue;
            }
            out.push(Segment {
                range: FrameRange {
                    start: FrameIndex(a),
                    end: FrameIndex(b),
                },
                phase,
            });
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/sequencer.rs"]
mod tests;
