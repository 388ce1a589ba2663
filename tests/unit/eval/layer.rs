use super::*;
use crate::composition::model::{AnimationSpec, LayerCommon};

fn ctx(scene_local: u64, beats: &[i64]) -> LayerCtx<'_> {
    LayerCtx {
        scene_local,
        global: scene_local,
        fps: 30.0,
        highlight_color: "#ff0055",
        beats,
    }
}

fn linear(kind: AnimationKind, duration_in_frames: i64) -> LayerCommon {
    LayerCommon {
        animation: AnimationSpec {
            kind,
            duration_in_frames,
            easing: Ease::Linear,
        },
        ..LayerCommon::default()
    }
}

fn text_layer(common: LayerCommon, content: Option<&str>) -> Layer {
    Layer::Text(TextLayer {
        common,
        content: content.map(str::to_string),
        ..TextLayer::default()
    })
}

#[test]
fn fade_in_tracks_linear_progress() {
    let layer = text_layer(linear(AnimationKind::FadeIn, 10), Some("hello"));
    let f = eval_layer(0, &layer, &ctx(5, &[]));
    assert!(f.visible);
    assert!((f.opacity - 0.5).abs() < 1e-12);
    let LayerContent::Text(text) = &f.content else {
        panic!("expected text content");
    };
    assert_eq!(text.words.len(), 1);
}

#[test]
fn slide_up_starts_offset_and_transparent() {
    let layer = text_layer(linear(AnimationKind::SlideUp, 10), Some("go"));
    let f = eval_layer(0, &layer, &ctx(0, &[]));
    assert_eq!(f.opacity, 0.0);
    assert!(!f.visible);
    assert_eq!(f.transform.as_coeffs()[5], SLIDE_DISTANCE);

    let done = eval_layer(0, &layer, &ctx(10, &[]));
    assert_eq!(done.opacity, 1.0);
    assert_eq!(done.transform.as_coeffs()[5], 0.0);
}

#[test]
fn layer_before_its_start_is_hidden_without_reason() {
    let mut common = linear(AnimationKind::FadeIn, 10);
    common.start_frame = Some(10);
    let layer = text_layer(common, Some("later"));
    let f = eval_layer(2, &layer, &ctx(5, &[]));
    assert!(!f.visible);
    assert!(!f.occupies_layout);
    assert_eq!(f.index, 2);
    assert_eq!(f.content, LayerContent::Hidden { reason: None });
}

#[test]
fn malformed_layers_are_suppressed_not_fatal() {
    let missing = text_layer(linear(AnimationKind::FadeIn, 10), None);
    let f = eval_layer(0, &missing, &ctx(20, &[]));
    assert!(matches!(f.content, LayerContent::Hidden { reason: Some(_) }));

    let negative = text_layer(linear(AnimationKind::FadeIn, -3), Some("x"));
    let f = eval_layer(0, &negative, &ctx(20, &[]));
    assert!(!f.visible);
    assert!(matches!(f.content, LayerContent::Hidden { reason: Some(_) }));

    let empty_src = Layer::Image(MediaLayer::default());
    let f = eval_layer(1, &empty_src, &ctx(20, &[]));
    assert!(matches!(f.content, LayerContent::Hidden { reason: Some(_) }));
}

#[test]
fn video_holds_its_last_source_frame() {
    let layer = Layer::Video(MediaLayer {
        common: linear(AnimationKind::FadeIn, 0),
        src: "clip.mp4".to_string(),
        duration_in_frames: Some(20),
    });
    let f = eval_layer(0, &layer, &ctx(30, &[]));
    assert_eq!(
        f.content,
        LayerContent::Video {
            src: "clip.mp4".to_string(),
            source_frame: 19
        }
    );
}

#[test]
fn beat_sync_pulses_scale_after_a_beat() {
    let mut common = linear(AnimationKind::FadeIn, 0);
    common.beat_sync = true;
    let layer = text_layer(common, Some("drop"));
    let beats = [10];

    let f = eval_layer(0, &layer, &ctx(13, &beats));
    assert!((f.beat_pulse - 0.5).abs() < 1e-12);
    assert!((f.transform.as_coeffs()[0] - 1.04).abs() < 1e-12);

    let later = eval_layer(0, &layer, &ctx(16, &beats));
    assert_eq!(later.beat_pulse, 0.0);
    assert_eq!(later.transform.as_coeffs()[0], 1.0);
}

#[test]
fn letter_by_letter_reveals_characters_on_text() {
    let layer = text_layer(linear(AnimationKind::LetterByLetter, 10), Some("abcd"));
    let f = eval_layer(0, &layer, &ctx(5, &[]));
    let LayerContent::Text(text) = &f.content else {
        panic!("expected text content");
    };
    let visible: Vec<bool> = text.words[0]
        .chars
        .as_ref()
        .map(|c| c.iter().map(|c| c.visible).collect())
        .unwrap_or_default();
    assert_eq!(visible, vec![true, true, false, false]);
    assert_eq!(f.opacity, 1.0);
}

#[test]
fn style_opacity_scales_the_result() {
    let mut common = linear(AnimationKind::FadeIn, 0);
    common.style.opacity = Some(0.25);
    let layer = Layer::Image(MediaLayer {
        common,
        src: "a.png".to_string(),
        duration_in_frames: None,
    });
    let f = eval_layer(0, &layer, &ctx(3, &[]));
    assert_eq!(f.opacity, 0.25);
}

#[test]
fn pulse_is_zero_before_first_beat() {
    assert_eq!(beat_pulse(&[30, 60], 10), 0.0);
    assert_eq!(beat_pulse(&[30, 60], 60), 1.0);
}
