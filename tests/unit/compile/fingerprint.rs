use super::*;
use crate::{
    composition::dsl::{SceneBuilder, TimelineBuilder, text},
    composition::model::AnimationTimeline,
    eval::evaluator::Evaluator,
    foundation::core::FrameIndex,
};

fn still_timeline() -> AnimationTimeline {
    let mut t = TimelineBuilder::new(30, 640, 360)
        .scene(SceneBuilder::new("only", 120).layer(text("Hold still")).build())
        .unwrap()
        .build()
        .unwrap();
    t.theme.enable_global_vfx = false;
    t
}

#[test]
fn settled_frames_share_a_fingerprint() {
    let t = still_timeline();
    let a = fingerprint_frame(&Evaluator::eval_frame(&t, FrameIndex(60))).unwrap();
    let b = fingerprint_frame(&Evaluator::eval_frame(&t, FrameIndex(90))).unwrap();
    assert_eq!(a, b);
}

#[test]
fn animating_frames_differ() {
    let t = still_timeline();
    let a = fingerprint_frame(&Evaluator::eval_frame(&t, FrameIndex(2))).unwrap();
    let b = fingerprint_frame(&Evaluator::eval_frame(&t, FrameIndex(4))).unwrap();
    assert_ne!(a, b);
}

#[test]
fn display_is_32_hex_digits() {
    let fp = FrameFingerprint { hi: 1, lo: 255 };
    assert_eq!(fp.to_string(), format!("{:016x}{:016x}", 1, 255));
    assert_eq!(fp.to_string().len(), 32);
}
