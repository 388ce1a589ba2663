use super::*;

const SAMPLE: &str = r##"{
  "id": "tl-1",
  "projectName": "Launch",
  "video": { "fps": 30, "width": 1080, "height": 1920, "totalFrames": 9999,
             "background": { "type": "solid", "color": "#000000" } },
  "audio": { "musicUrl": "https://cdn/m.mp3", "beats": [15, 30, 45], "tempo": 128 },
  "scenes": [
    {
      "id": "intro",
      "durationInFrames": 60,
      "transitionType": "fade",
      "layers": [
        { "type": "logo", "src": "https://cdn/logo.png",
          "animation": { "type": "scaleImpact", "durationInFrames": 15, "easing": "easeOut" },
          "style": { "width": 200, "height": 200, "position": "center" } },
        { "type": "text", "content": "Stop scrolling!", "beatSync": true, "startFrame": 10,
          "emphasisWords": ["Stop"], "textAnimation": "pop-in", "textStyle": "neon",
          "animation": { "type": "slideUp", "durationInFrames": 20 },
          "style": { "fontSize": 72, "fontWeight": "bold", "color": "#fff" } }
      ]
    },
    {
      "id": "cta",
      "durationInFrames": 10,
      "layoutAlign": "bottom",
      "backgroundImageUrl": "https://cdn/bg.jpg",
      "layers": [ { "type": "video", "src": "https://cdn/clip.mp4", "durationInFrames": 90,
                    "animation": { "type": "fadeIn", "durationInFrames": 10, "easing": "linear" } } ]
    }
  ]
}"##;

#[test]
fn parses_tagged_layers_and_defaults() {
    let t = AnimationTimeline::from_json_str(SAMPLE).unwrap();
    assert_eq!(t.scenes.len(), 2);
    assert_eq!(t.audio.volume, DEFAULT_AUDIO_VOLUME);
    assert_eq!(t.theme, Theme::default());
    assert_eq!(t.scenes[1].layout_align, LayoutAlign::Bottom);
    assert_eq!(t.scenes[0].layout_align, LayoutAlign::Center);

    match &t.scenes[0].layers[1] {
        Layer::Text(text) => {
            assert_eq!(text.content.as_deref(), Some("Stop scrolling!"));
            assert_eq!(text.text_animation, TextAnimation::PopIn);
            assert_eq!(text.text_style, TextStyle::Neon);
            assert!(text.common.beat_sync);
            assert_eq!(text.common.start_frame, Some(10));
            assert_eq!(text.common.animation.kind, AnimationKind::SlideUp);
            assert_eq!(text.common.animation.easing, Ease::EaseOut);
            assert_eq!(
                text.common.style.font_weight,
                Some(FontWeight::Named("bold".to_string()))
            );
        }
        other => panic!("expected text layer, got {other:?}"),
    }
    match &t.scenes[1].layers[0] {
        Layer::Video(v) => assert_eq!(v.duration_in_frames, Some(90)),
        other => panic!("expected video layer, got {other:?}"),
    }
}

#[test]
fn stored_total_frames_is_recomputed_on_load() {
    let t = AnimationTimeline::from_json_str(SAMPLE).unwrap();
    // 60 (fade out, overlap 10) + max(15, 10)
    assert_eq!(t.video.total_frames, 65);
    assert_eq!(t.total_frames(), 65);
}

#[test]
fn json_round_trip_preserves_timeline() {
    let t = AnimationTimeline::from_json_str(SAMPLE).unwrap();
    let s = t.to_json_string_pretty().unwrap();
    let back = AnimationTimeline::from_json_str(&s).unwrap();
    assert_eq!(t, back);
    assert!(s.contains("\"type\": \"logo\""));
    assert!(s.contains("\"transitionType\": \"fade\""));
}

#[test]
fn effective_duration_clamps_short_and_negative() {
    let mut t = AnimationTimeline::from_json_str(SAMPLE).unwrap();
    assert_eq!(t.scenes[1].effective_duration(), MIN_SCENE_FRAMES);
    t.scenes[1].duration_in_frames = -40;
    assert_eq!(t.scenes[1].effective_duration(), MIN_SCENE_FRAMES);
}

#[test]
fn missing_text_content_is_tolerated() {
    let json = r#"{ "type": "text", "emphasisWords": [] }"#;
    let layer: Layer = serde_json::from_str(json).unwrap();
    match layer {
        Layer::Text(t) => {
            assert!(t.content.is_none());
            assert_eq!(t.common.animation, AnimationSpec::default());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = AnimationTimeline::from_json_str("{ \"video\": 3 }").unwrap_err();
    assert!(matches!(err, KinetypeError::Serde(_)));
}

#[test]
fn scene_lookup_by_id() {
    let t = AnimationTimeline::from_json_str(SAMPLE).unwrap();
    assert_eq!(t.scene_index("cta"), Some(1));
    assert!(t.scene("nope").is_none());
}
