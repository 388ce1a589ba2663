use super::*;
use crate::{
    beat::analysis::BeatAnalysisResult,
    composition::model::Layer,
    effects::sequencer::resolve_scene_spans,
    eval::{evaluator::Evaluator, layer::LayerContent},
    foundation::core::FrameIndex,
    pipeline::{
        assets::{UploadedAsset, UploadedAssets},
        script::ScriptEnhancementResult,
    },
};

fn asset(url: &str) -> UploadedAsset {
    UploadedAsset {
        url: url.to_string(),
        file_name: url.to_string(),
        size_bytes: 1,
    }
}

fn request(script: &str, emphasis: &[&str]) -> SynthesisRequest {
    SynthesisRequest {
        project_id: "p1".into(),
        project_name: "Launch".into(),
        enhanced: ScriptEnhancementResult {
            original_script: script.into(),
            enhanced_script: script.into(),
            emphasized_words: emphasis.iter().map(|w| w.to_string()).collect(),
        },
        style_prompt: "bold neon energy".into(),
        beats: BeatAnalysisResult {
            tempo: 128.0,
            beats: (1..=21).map(|i| i * 14).collect(),
            energy_levels: Vec::new(),
            peak_frames: Vec::new(),
        },
        assets: UploadedAssets {
            logo: None,
            music_file: asset("mock://storage/music/0-track.mp3"),
            product_images: Vec::new(),
            product_videos: Vec::new(),
            background_assets: Vec::new(),
        },
        width: 1080,
        height: 1920,
        fps: 30,
    }
}

#[test]
fn reading_time_has_a_floor() {
    assert_eq!(sentence_frames("one two three", 30), 66);
    assert_eq!(sentence_frames("", 10), MIN_SCENE_FRAMES);
}

#[test]
fn snapping_moves_forward_only() {
    let beats = [14, 28, 42];
    assert_eq!(snap_to_next_beat(20, &beats), 28);
    assert_eq!(snap_to_next_beat(28, &beats), 28);
    assert_eq!(snap_to_next_beat(50, &beats), 50);
}

#[test]
fn scenes_end_on_beats() {
    let req = request(
        "Stop guessing today. Start winning now!",
        &["guessing", "Winning!"],
    );
    let t = synthesize_timeline(&req).unwrap();

    let durations: Vec<i64> = t.scenes.iter().map(|s| s.duration_in_frames).collect();
    assert_eq!(durations, vec![70, 66]);
    assert_eq!(t.video.total_frames, 126);
    for span in resolve_scene_spans(&t.scenes) {
        assert_eq!(span.range.end.0 % 14, 0, "scene {} ends off-beat", span.index);
    }
    assert_eq!(t.scenes[0].transition_type, TransitionType::Fade);
    assert_eq!(t.scenes[1].transition_type, TransitionType::None);
    assert_eq!(t.audio.music_url, "mock://storage/music/0-track.mp3");
}

#[test]
fn emphasis_follows_sentence_membership() {
    let req = request(
        "Stop guessing today. Start winning now!",
        &["guessing", "Winning!", "absent"],
    );
    let t = synthesize_timeline(&req).unwrap();
    let text_of = |i: usize| match &t.scenes[i].layers[0] {
        Layer::Text(text) => text.clone(),
        other => panic!("expected text layer, got {}", other.kind_name()),
    };
    assert_eq!(text_of(0).emphasis_words, vec!["guessing"]);
    assert_eq!(text_of(1).emphasis_words, vec!["Winning!"]);
    assert!(text_of(0).common.beat_sync);
    assert_eq!(text_of(0).text_animation, TextAnimation::PopIn);
    assert_eq!(text_of(1).text_animation, TextAnimation::FadeUp);
    assert_eq!(text_of(0).text_style, TextStyle::Neon);

    let plain = synthesize_timeline(&request("Nothing to stress here.", &["other"])).unwrap();
    match &plain.scenes[0].layers[0] {
        Layer::Text(text) => assert!(!text.common.beat_sync),
        other => panic!("expected text layer, got {}", other.kind_name()),
    }
}

#[test]
fn logo_intro_and_round_robin_images() {
    let mut req = request("First line here. Second line here.", &[]);
    req.assets.logo = Some(asset("logo.svg"));
    req.assets.product_images = vec![asset("a.png"), asset("b.png"), asset("c.png")];
    req.assets.product_videos = vec![asset("demo.mp4")];
    req.assets.background_assets = vec![asset("bg.mp4")];
    let t = synthesize_timeline(&req).unwrap();

    assert_eq!(t.scenes.len(), 3);
    assert_eq!(t.scenes[0].id, INTRO_SCENE_ID);
    assert_eq!(t.scenes[0].duration_in_frames, 60);
    assert!(matches!(t.scenes[0].layers[0], Layer::Logo(_)));

    let srcs = |i: usize| -> Vec<String> {
        t.scenes[i]
            .layers
            .iter()
            .filter_map(|l| match l {
                Layer::Image(m) => Some(m.src.clone()),
                _ => None,
            })
            .collect()
    };
    assert_eq!(srcs(1), vec!["a.png", "c.png"]);
    assert_eq!(srcs(2), vec!["b.png"]);
    assert!(matches!(&t.scenes[1].layers[3], Layer::Video(m) if m.src == "demo.mp4"));
    assert_eq!(t.scenes[2].layers.len(), 2);
    assert_eq!(t.scenes[1].background_image_url.as_deref(), Some("bg.mp4"));
    assert_eq!(t.theme.style_mode, StyleMode::Bold);
}

#[test]
fn logo_intro_overlaps_first_scene() {
    let mut req = request("First line here. Second line here.", &[]);
    req.assets.logo = Some(asset("logo.svg"));
    let t = synthesize_timeline(&req).unwrap();

    let spans = resolve_scene_spans(&t.scenes);
    assert_eq!(spans[0].range.end, FrameIndex(60));
    assert_eq!(spans[1].range.start, FrameIndex(60 - TRANSITION_FRAMES));
    let ends: Vec<u64> = spans[1..].iter().map(|s| s.range.end.0).collect();
    assert_eq!(ends, vec![126, 182]);
    assert_eq!(t.video.total_frames, 182);
}

#[test]
fn emphasized_words_hit_a_beat_inside_their_scene() {
    let req = request(
        "Stop guessing today. Start winning now!",
        &["guessing", "Winning!"],
    );
    let t = synthesize_timeline(&req).unwrap();

    for span in resolve_scene_spans(&t.scenes) {
        let start = span.range.start.0 as i64;
        let beat = *t.audio.beats.iter().find(|b| **b >= start).unwrap();
        assert!((beat as u64) < span.range.end.0, "scene {} has no beat", span.index);

        let state = Evaluator::eval_frame(&t, FrameIndex(beat as u64));
        let scene = state.scenes.iter().find(|s| s.index == span.index).unwrap();
        match &scene.layers[0].content {
            LayerContent::Text(text) => assert!(
                text.words.iter().any(|w| w.highlighted && w.beat_impact == 1.0),
                "scene {} missed beat {beat}",
                span.index
            ),
            other => panic!("expected text, got {other:?}"),
        }
    }
}

#[test]
fn prompt_keywords_pick_theme() {
    assert_eq!(theme_for_prompt("Elegant serif").font_family, FontFamily::Playfair);
    assert_eq!(theme_for_prompt("sport recap").font_family, FontFamily::Oswald);
    let minimal = theme_for_prompt("clean and minimal");
    assert_eq!(minimal.style_mode, StyleMode::Minimal);
    assert!(!minimal.enable_global_vfx);
    assert_eq!(theme_for_prompt("whatever").style_mode, StyleMode::Premium);
}
