use crate::{
    animation::ease::{Ease, eased_progress},
    beat::analysis::last_beat_at_or_before,
    composition::model::{AnimationKind, Layer, MediaLayer, TextAnimation, TextLayer, TextStyle},
    eval::text::{TextParams, WordFrame, evaluate_words},
    foundation::core::Affine,
};

/// Frames over which a beat pulse decays on beat-synced layers.
pub const BEAT_PULSE_FRAMES: i64 = 6;
/// Extra scale at the peak of a beat pulse.
pub const BEAT_PULSE_SCALE: f64 = 0.08;
/// Extra scale at the peak of a `beatBounce` animation.
pub const BEAT_BOUNCE_SCALE: f64 = 0.15;
/// Travel of `slideUp` / `slideDown`, in pixels.
pub const SLIDE_DISTANCE: f64 = 50.0;
/// Starting scale of `scaleImpact`.
pub const IMPACT_START_SCALE: f64 = 0.3;

/// A layer that could not be evaluated. Never leaves the evaluator.
#[derive(thiserror::Error, Debug)]
#[error("layer {layer} degraded: {reason}")]
pub(crate) struct DegradedFrameError {
    layer: usize,
    reason: String,
}

impl DegradedFrameError {
    fn new(layer: usize, reason: impl Into<String>) -> Self {
        Self {
            layer,
            reason: reason.into(),
        }
    }
}

/// Evaluated state of one layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerFrame {
    pub index: usize,
    pub visible: bool,
    /// `false` for layers that have not started or were suppressed.
    pub occupies_layout: bool,
    pub opacity: f64,
    /// Pixel-space transform relative to the layer's laid-out position.
    pub transform: Affine,
    /// Decaying `1 -> 0` pulse after the most recent beat (beat-synced layers only).
    pub beat_pulse: f64,
    pub content: LayerContent,
}

impl LayerFrame {
    pub(crate) fn hidden(index: usize, reason: Option<String>) -> Self {
        Self {
            index,
            visible: false,
            occupies_layout: false,
            opacity: 0.0,
            transform: Affine::IDENTITY,
            beat_pulse: 0.0,
            content: LayerContent::Hidden { reason },
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerContent {
    Text(TextFrame),
    Image { src: String },
    Video { src: String, source_frame: u64 },
    Logo { src: String },
    Hidden { reason: Option<String> },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFrame {
    pub animation: TextAnimation,
    pub style: TextStyle,
    pub color: Option<String>,
    pub font_size: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub words: Vec<WordFrame>,
}

/// Per-frame inputs shared by all layers of a scene.
pub(crate) struct LayerCtx<'a> {
    pub scene_local: u64,
    pub global: u64,
    pub fps: f64,
    pub highlight_color: &'a str,
    pub beats: &'a [i64],
}

struct Motion {
    opacity: f64,
    offset_y: f64,
    scale: f64,
    reveal: Option<f64>,
}

/// Evaluate one layer, suppressing it to a hidden state if its data is malformed.
pub(crate) fn eval_layer(index: usize, layer: &Layer, ctx: &LayerCtx<'_>) -> LayerFrame {
    match try_eval_layer(index, layer, ctx) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(error = %e, kind = layer.kind_name(), "layer suppressed");
            LayerFrame::hidden(index, Some(e.reason))
        }
    }
}

fn try_eval_layer(
    index: usize,
    layer: &Layer,
    ctx: &LayerCtx<'_>,
) -> Result<LayerFrame, DegradedFrameError> {
    let common = layer.common();
    let local = i64::try_from(ctx.scene_local)
        .unwrap_or(i64::MAX)
        .saturating_sub(layer.start_offset());
    if local < 0 {
        return Ok(LayerFrame::hidden(index, None));
    }

    let anim = common.animation;
    if anim.duration_in_frames < 0 {
        return Err(DegradedFrameError::new(
            index,
            format!("negative animation duration {}", anim.duration_in_frames),
        ));
    }
    let style_opacity = match common.style.opacity {
        Some(o) if !o.is_finite() => {
            return Err(DegradedFrameError::new(index, "non-finite style opacity"));
        }
        Some(o) => o.clamp(0.0, 1.0),
        None => 1.0,
    };
    if common.style.font_size.is_some_and(|s| !s.is_finite() || s < 0.0) {
        return Err(DegradedFrameError::new(index, "invalid font size"));
    }

    let global = i64::try_from(ctx.global).unwrap_or(i64::MAX);
    let is_text = matches!(layer, Layer::Text(_));
    let mut motion = animate(anim.kind, local, anim.duration_in_frames, anim.easing, is_text);

    if anim.kind == AnimationKind::BeatBounce && local < anim.duration_in_frames {
        motion.scale *= 1.0 + BEAT_BOUNCE_SCALE * beat_pulse(ctx.beats, global);
    }
    let pulse = if common.beat_sync {
        beat_pulse(ctx.beats, global)
    } else {
        0.0
    };
    motion.scale *= 1.0 + BEAT_PULSE_SCALE * pulse;

    let content = match layer {
        Layer::Text(t) => LayerContent::Text(text_content(index, t, local, global, ctx, &motion)?),
        Layer::Image(m) => LayerContent::Image {
            src: media_src(index, m)?,
        },
        Layer::Logo(m) => LayerContent::Logo {
            src: media_src(index, m)?,
        },
        Layer::Video(m) => video_content(index, m, local)?,
    };

    let opacity = (motion.opacity * style_opacity).clamp(0.0, 1.0);
    Ok(LayerFrame {
        index,
        visible: opacity > 0.0,
        occupies_layout: true,
        opacity,
        transform: Affine::translate((0.0, motion.offset_y)) * Affine::scale(motion.scale),
        beat_pulse: pulse,
        content,
    })
}

fn animate(kind: AnimationKind, local: i64, duration: i64, ease: Ease, text: bool) -> Motion {
    let p = eased_progress(local as f64, duration as f64, ease);
    let mut m = Motion {
        opacity: 1.0,
        offset_y: 0.0,
        scale: 1.0,
        reveal: None,
    };
    match kind {
        AnimationKind::FadeIn => m.opacity = p,
        AnimationKind::FadeOut => m.opacity = 1.0 - p,
        AnimationKind::SlideUp => {
            m.offset_y = SLIDE_DISTANCE * (1.0 - p);
            m.opacity = p;
        }
        AnimationKind::SlideDown => {
            m.offset_y = SLIDE_DISTANCE * p;
            m.opacity = 1.0 - p;
        }
        AnimationKind::ScaleImpact => {
            m.scale = IMPACT_START_SCALE + (1.0 - IMPACT_START_SCALE) * p;
        }
        AnimationKind::LetterByLetter if text => m.reveal = Some(p),
        AnimationKind::LetterByLetter => m.opacity = p,
        AnimationKind::BeatBounce => {}
    }
    m
}

/// `1 -> 0` decay over [`BEAT_PULSE_FRAMES`] after the latest beat at or before `global`.
pub fn beat_pulse(beats: &[i64], global: i64) -> f64 {
    match last_beat_at_or_before(beats, global) {
        Some(beat) if global - beat < BEAT_PULSE_FRAMES => {
            1.0 - (global - beat) as f64 / BEAT_PULSE_FRAMES as f64
        }
        _ => 0.0,
    }
}

fn text_content(
    index: usize,
    t: &TextLayer,
    local: i64,
    global: i64,
    ctx: &LayerCtx<'_>,
    motion: &Motion,
) -> Result<TextFrame, DegradedFrameError> {
    let content = t
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| DegradedFrameError::new(index, "missing text content"))?;
    let params = TextParams {
        frame: local,
        global_frame: global,
        fps: ctx.fps,
        highlight_color: ctx.highlight_color,
        animation: t.text_animation,
        style: t.text_style,
        emphasis_words: &t.emphasis_words,
        beats: t.common.beat_sync.then_some(ctx.beats),
        reveal: motion.reveal,
    };
    let style = &t.common.style;
    Ok(TextFrame {
        animation: t.text_animation,
        style: t.text_style,
        color: style.color.clone(),
        font_size: style.font_size,
        letter_spacing: style.letter_spacing.filter(|v| v.is_finite()),
        words: evaluate_words(content, &params),
    })
}

fn media_src(index: usize, m: &MediaLayer) -> Result<String, DegradedFrameError> {
    if m.src.trim().is_empty() {
        return Err(DegradedFrameError::new(index, "empty media src"));
    }
    Ok(m.src.clone())
}

fn video_content(
    index: usize,
    m: &MediaLayer,
    local: i64,
) -> Result<LayerContent, DegradedFrameError> {
    let src = media_src(index, m)?;
    let local = u64::try_from(local).unwrap_or(0);
    let source_frame = match m.duration_in_frames {
        Some(d) if d <= 0 => {
            return Err(DegradedFrameError::new(
                index,
                format!("non-positive video duration {d}"),
            ));
        }
        // Hold the last source frame once the clip runs out.
        Some(d) => local.min(d as u64 - 1),
        None => local,
    };
    Ok(LayerContent::Video { src, source_frame })
}

#[cfg(test)]
#[path = "../../tests/unit/eval/layer.rs"]
mod tests;
