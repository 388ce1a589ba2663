use super::*;

const CANVAS: Canvas = Canvas {
    width: 1080,
    height: 1920,
};

#[test]
fn fade_blends_entering_opacity() {
    let (out, inc) = present(TransitionType::Fade, 0.3, CANVAS);
    assert_eq!(out.opacity, 1.0);
    assert!((inc.opacity - 0.3).abs() < 1e-12);
    assert!(inc.z > out.z);
}

#[test]
fn slide_moves_both_scenes_left() {
    let (out, inc) = present(TransitionType::Slide, 0.25, CANVAS);
    assert_eq!(out.transform.translation().x, -270.0);
    assert_eq!(inc.transform.translation().x, 810.0);

    let (_, done) = present(TransitionType::Slide, 1.0, CANVAS);
    assert_eq!(done.transform.translation().x, 0.0);
}

#[test]
fn flip_hides_each_side_past_ninety_degrees() {
    let (out, inc) = present(TransitionType::Flip, 0.2, CANVAS);
    assert!(out.is_visible());
    assert!(!inc.is_visible());

    let (out, inc) = present(TransitionType::Flip, 0.8, CANVAS);
    assert!(!out.is_visible());
    assert!(inc.is_visible());
}

#[test]
fn wipes_reveal_proportionally() {
    let (_, inc) = present(TransitionType::Wipe, 0.4, CANVAS);
    assert_eq!(
        inc.clip,
        SceneClip::Wipe {
            dir: WipeDir::LeftToRight,
            reveal: 0.4
        }
    );
    let (_, inc) = present(TransitionType::ClockWipe, 0.5, CANVAS);
    assert_eq!(inc.clip, SceneClip::Radial { sweep_deg: 180.0 });
}

#[test]
fn progress_is_clamped() {
    let (_, inc) = present(TransitionType::Fade, 4.0, CANVAS);
    assert_eq!(inc.opacity, 1.0);
    let (_, inc) = present(TransitionType::Fade, -1.0, CANVAS);
    assert_eq!(inc.opacity, 0.0);
}
