use crate::{
    composition::model::{AnimationTimeline, Scene},
    effects::{
        sequencer::{SceneSpan, SequencerState, TransitionSequencer},
        transitions::{SceneComposite, present},
    },
    eval::{
        layer::{LayerCtx, LayerFrame, eval_layer},
        scene::{
            BackgroundFrame, LayoutFrame, SceneEntrance, Typography, background, entrance, layout,
            typography,
        },
        vfx::{GlobalVfx, global_vfx},
    },
    foundation::core::{Canvas, FrameIndex},
};

/// Everything needed to draw one output frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameState {
    pub frame: FrameIndex,
    pub canvas: Canvas,
    pub total_frames: u64,
    pub background_color: String,
    pub sequencer: SequencerState,
    /// Scenes on screen, in paint order.
    pub scenes: Vec<SceneFrame>,
    pub vfx: Option<GlobalVfx>,
}

impl FrameState {
    pub fn is_done(&self) -> bool {
        matches!(self.sequencer, SequencerState::Done)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFrame {
    pub index: usize,
    pub id: String,
    pub local_frame: u64,
    pub composite: SceneComposite,
    pub entrance: SceneEntrance,
    pub typography: Typography,
    pub layout: LayoutFrame,
    pub background: Option<BackgroundFrame>,
    pub layers: Vec<LayerFrame>,
}

/// Stateless evaluator from timeline to per-frame visual state.
pub struct Evaluator;

impl Evaluator {
    /// Evaluate one frame. Pure: the same timeline and frame always give the same state.
    ///
    /// Malformed layers are hidden rather than reported; frames past the end come back
    /// [`SequencerState::Done`] with no scenes.
    #[tracing::instrument(skip(timeline))]
    pub fn eval_frame(timeline: &AnimationTimeline, frame: FrameIndex) -> FrameState {
        let sequencer = TransitionSequencer::new(timeline);
        Self::eval_frame_with(timeline, &sequencer, frame)
    }

    /// Same as [`Evaluator::eval_frame`] with scene timing resolved once by the caller.
    pub fn eval_frame_with(
        timeline: &AnimationTimeline,
        sequencer: &TransitionSequencer,
        frame: FrameIndex,
    ) -> FrameState {
        let canvas = timeline.canvas();
        let total_frames = sequencer.total_frames();
        let state = sequencer.state_at(frame);

        let composites: Vec<(usize, SceneComposite)> = match state {
            SequencerState::Active { scene } => vec![(scene, SceneComposite::identity())],
            SequencerState::Transitioning {
                from,
                to,
                kind,
                progress,
            } => {
                let (exiting, entering) = present(kind, progress, canvas);
                vec![(from, exiting), (to, entering)]
            }
            SequencerState::Done => Vec::new(),
        };

        let mut scenes: Vec<SceneFrame> = composites
            .into_iter()
            .filter_map(|(index, composite)| {
                let span = sequencer.span(index)?;
                let scene = timeline.scenes.get(index)?;
                Some(eval_scene(timeline, scene, span, composite, frame))
            })
            .collect();
        scenes.sort_by_key(|s| (s.composite.z, s.index));

        let vfx = (frame.0 < total_frames)
            .then(|| global_vfx(&timeline.theme, frame.0, total_frames))
            .flatten();

        FrameState {
            frame,
            canvas,
            total_frames,
            background_color: timeline.theme.background_color.clone(),
            sequencer: state,
            scenes,
            vfx,
        }
    }
}

fn eval_scene(
    timeline: &AnimationTimeline,
    scene: &Scene,
    span: &SceneSpan,
    composite: SceneComposite,
    frame: FrameIndex,
) -> SceneFrame {
    let local = span.local_frame(frame).unwrap_or(0);
    let fps = f64::from(timeline.video.fps);
    let ctx = LayerCtx {
        scene_local: local,
        global: frame.0,
        fps,
        highlight_color: &timeline.theme.primary_color,
        beats: &timeline.audio.beats,
    };
    SceneFrame {
        index: span.index,
        id: scene.id.clone(),
        local_frame: local,
        composite,
        entrance: entrance(timeline.theme.style_mode, local, fps),
        typography: typography(&timeline.theme),
        layout: layout(scene.layout_align),
        background: background(scene, local),
        layers: scene
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| eval_layer(i, layer, &ctx))
            .collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
