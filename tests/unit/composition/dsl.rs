use super::*;

#[test]
fn builder_derives_total_frames() {
    let timeline = TimelineBuilder::new(30, 1080, 1920)
        .id("t1")
        .music("https://cdn/track.mp3", vec![15, 30, 45], 128.0)
        .scene(
            SceneBuilder::new("a", 60)
                .transition(TransitionType::Fade)
                .layer(text("Stop scrolling"))
                .build(),
        )
        .unwrap()
        .scene(SceneBuilder::new("b", 45).layer(text("Now")).build())
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(timeline.video.total_frames, 95);
    assert_eq!(timeline.project_name, "Untitled Project");
    assert_eq!(timeline.audio.volume, DEFAULT_AUDIO_VOLUME);
}

#[test]
fn duplicate_scene_ids_are_rejected() {
    let res = TimelineBuilder::new(30, 1080, 1920)
        .scene(SceneBuilder::new("a", 30).layer(text("x")).build())
        .unwrap()
        .scene(SceneBuilder::new("a", 30).layer(text("y")).build());
    assert!(res.is_err());
}

#[test]
fn build_rejects_invalid_timelines() {
    let err = TimelineBuilder::new(30, 1080, 1920)
        .scene(SceneBuilder::new("a", 30).build())
        .unwrap()
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("Scene 0 has no layers"));
}

#[test]
fn layer_helpers_set_fields() {
    let layer: Layer = text("Stop AI convert")
        .emphasis(["AI"])
        .text_animation(TextAnimation::Glitch)
        .text_style(TextStyle::Neon)
        .with(|c| {
            c.beat_sync = true;
            c.start_frame = Some(5);
            c.animation = animation(AnimationKind::SlideUp, 20, Ease::EaseInOut);
        })
        .into();
    assert_eq!(layer.start_offset(), 5);
    assert!(layer.common().beat_sync);
    match layer {
        Layer::Text(t) => {
            assert_eq!(t.emphasis_words, vec!["AI".to_string()]);
            assert_eq!(t.text_style, TextStyle::Neon);
        }
        other => panic!("unexpected layer {other:?}"),
    }
    assert_eq!(image("a.png").into_logo().kind_name(), "logo");
}
