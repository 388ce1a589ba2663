use super::*;
use crate::{
    composition::dsl::{SceneBuilder, TimelineBuilder, text},
    composition::model::TransitionType,
    pipeline::assets::AssetRole,
};
use std::sync::Arc;

#[test]
fn beat_grid_at_thirty_fps() {
    let r = mock_beats(30);
    assert_eq!(r.tempo, 128.0);
    assert_eq!(r.beats.first(), Some(&14));
    assert_eq!(r.beats.last(), Some(&294));
    assert_eq!(r.beats.len(), 21);
    assert!(r.contract_violations().is_empty());
    assert_eq!(r.peak_frames[..3], [14, 42, 70]);
    assert_eq!(r.energy_levels.len(), 10);
    assert_eq!(r.energy_at(0), Some(Energy::Low));
    assert_eq!(r.energy_at(45), Some(Energy::Medium));
    assert_eq!(r.energy_at(60), Some(Energy::High));
    assert_eq!(r.energy_at(95), Some(Energy::Low));
}

#[test]
fn beat_grid_is_deterministic() {
    assert_eq!(mock_beats(24), mock_beats(24));
    assert_eq!(mock_beats(60).beats[0], 28);
}

#[test]
fn enhancement_picks_long_words() {
    let r = mock_enhancement("our amazing product changes everything, honestly. buy it today, seriously");
    assert_eq!(
        r.emphasized_words,
        vec!["amazing", "product", "changes", "everything", "honestly"]
    );
    assert!(r.enhanced_script.starts_with("Our amazing"));
    assert!(r.contract_violations().is_empty());
}

#[tokio::test]
async fn uploads_get_stable_urls() {
    let file = UploadFile::new("track.mp3", AssetRole::Music, 10);
    let asset = MockUploader.upload("p1", 3, &file).await.unwrap();
    assert_eq!(asset.url, "mock://storage/music/3-track.mp3");
    assert_eq!(asset.size_bytes, 10);
}

#[tokio::test]
async fn render_runs_locally() {
    let timeline = TimelineBuilder::new(30, 1080, 1920)
        .id("t1")
        .scene(
            SceneBuilder::new("a", 30)
                .transition(TransitionType::Fade)
                .layer(text("Hello there"))
                .build(),
        )
        .unwrap()
        .scene(SceneBuilder::new("b", 30).layer(text("Bye")).build())
        .unwrap()
        .build()
        .unwrap();
    let submitter = MockRenderSubmitter::default();
    let request = RenderRequest {
        timeline: Arc::new(timeline),
        width: 540,
        height: 960,
        duration_in_frames: None,
    };
    let receipt = submitter.submit(&request).await.unwrap();
    assert_eq!(receipt.render_id, "render-t1-0");
    assert_eq!(receipt.output_url, "mock://renders/render-t1-0.jsonl");
    assert_eq!(receipt.stats.unwrap().frames_total, 50);

    let short = RenderRequest {
        duration_in_frames: Some(3),
        ..request
    };
    let receipt = submitter.submit(&short).await.unwrap();
    assert_eq!(receipt.render_id, "render-t1-1");
    assert_eq!(receipt.stats.unwrap().frames_total, 15);
}
