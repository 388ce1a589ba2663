use super::*;
use crate::composition::dsl::{SceneBuilder, TimelineBuilder, image, text};
use crate::composition::model::TransitionType;

fn timeline() -> AnimationTimeline {
    TimelineBuilder::new(30, 1080, 1920)
        .scene(
            SceneBuilder::new("a", 60)
                .transition(TransitionType::Slide)
                .layer(text("hi"))
                .layer(image("p.png").with(|c| c.start_frame = Some(30)))
                .build(),
        )
        .unwrap()
        .scene(SceneBuilder::new("b", 40).layer(text("bye")).build())
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn range_query_includes_overlapping_scenes() {
    let t = timeline();
    let r = FrameRange::new(FrameIndex(0), FrameIndex(10)).unwrap();
    let ids: Vec<usize> = scenes_in_frame_range(&t, r).iter().map(|(i, _)| *i).collect();
    assert_eq!(ids, vec![0]);

    let r = FrameRange::new(FrameIndex(55), FrameIndex(56)).unwrap();
    assert_eq!(scenes_in_frame_range(&t, r).len(), 2);
}

#[test]
fn layers_at_frame_respects_start_offsets() {
    let t = timeline();
    assert_eq!(layers_at_frame(&t, FrameIndex(10)).len(), 1);
    assert_eq!(layers_at_frame(&t, FrameIndex(30)).len(), 2);
    // Transition window [50, 60): both scenes contribute.
    assert_eq!(layers_at_frame(&t, FrameIndex(52)).len(), 3);
    assert!(layers_at_frame(&t, FrameIndex(500)).is_empty());
}

#[test]
fn durations_split_with_remainder_on_last() {
    assert_eq!(calculate_scene_durations(100, 3), vec![33, 33, 34]);
    assert_eq!(calculate_scene_durations(90, 3), vec![30, 30, 30]);
    assert!(calculate_scene_durations(90, 0).is_empty());
}

#[test]
fn keyframes_step_and_end_on_target() {
    let keys = generate_keyframes(12, 0.0, 1.0, Ease::Linear);
    let frames: Vec<u64> = keys.iter().map(|k| k.frame).collect();
    assert_eq!(frames, vec![0, 5, 10, 12]);
    assert_eq!(keys[0].value, 0.0);
    assert_eq!(keys.last().unwrap().value, 1.0);
    assert_eq!(generate_keyframes(0, 3.0, 7.0, Ease::EaseOut).len(), 1);
}

#[test]
fn font_size_scales_with_canvas_area() {
    assert_eq!(responsive_font_size(48.0, 1080, 1080), 48.0);
    assert_eq!(responsive_font_size(48.0, 2160, 2160), 96.0);
}
