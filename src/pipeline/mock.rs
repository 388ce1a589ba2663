//! Deterministic in-process providers.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::{
    beat::analysis::{BeatAnalysisResult, Energy, EnergyLevel},
    composition::model::AnimationTimeline,
    foundation::core::Resolution,
    pipeline::{
        assets::{UploadFile, UploadedAsset},
        providers::{
            AssetUploader, BeatAnalyzer, RenderReceipt, RenderRequest, RenderSubmitter,
            ScriptEnhancer, SynthesisRequest, TimelineSynthesizer,
        },
        script::{ScriptEnhancementResult, normalize_script},
        synthesis::synthesize_timeline,
    },
    render::{
        job::{RenderJob, RenderThreading},
        sink::JsonLinesSink,
    },
};

pub const MOCK_TEMPO: f64 = 128.0;
const MOCK_SECONDS: u32 = 10;
const ENERGY_STEP_FRAMES: i64 = 30;
const EMPHASIS_MIN_CHARS: usize = 6;
const EMPHASIS_MAX_WORDS: usize = 5;

/// Beat grid at [`MOCK_TEMPO`] over the first ten seconds.
pub fn mock_beats(fps: u32) -> BeatAnalysisResult {
    let interval = (f64::from(fps) * 60.0 / MOCK_TEMPO).round().max(1.0) as i64;
    let limit = i64::from(fps) * i64::from(MOCK_SECONDS);
    let beats: Vec<i64> = (1..)
        .map(|i| i * interval)
        .take_while(|b| *b < limit)
        .collect();
    let cycle = [Energy::Low, Energy::Medium, Energy::High];
    let energy_levels = (0..)
        .map(|i| i * ENERGY_STEP_FRAMES)
        .take_while(|f| *f < limit)
        .enumerate()
        .map(|(i, frame)| EnergyLevel {
            frame,
            energy: cycle[i % cycle.len()],
        })
        .collect();
    let peak_frames = beats.iter().step_by(2).copied().collect();
    BeatAnalysisResult {
        tempo: MOCK_TEMPO,
        beats,
        energy_levels,
        peak_frames,
    }
}

/// Normalized script; the first five words longer than five characters are emphasized.
pub fn mock_enhancement(script: &str) -> ScriptEnhancementResult {
    let emphasized_words = script
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() >= EMPHASIS_MIN_CHARS)
        .take(EMPHASIS_MAX_WORDS)
        .map(str::to_string)
        .collect();
    ScriptEnhancementResult {
        original_script: script.to_string(),
        enhanced_script: normalize_script(script),
        emphasized_words,
    }
}

#[derive(Debug, Default)]
pub struct MockUploader;

#[async_trait]
impl AssetUploader for MockUploader {
    fn name(&self) -> &str {
        "mock-uploader"
    }

    async fn upload(
        &self,
        _project_id: &str,
        index: usize,
        file: &UploadFile,
    ) -> anyhow::Result<UploadedAsset> {
        Ok(UploadedAsset {
            url: format!(
                "mock://storage/{}/{index}-{}",
                file.role.as_str(),
                file.file_name
            ),
            file_name: file.file_name.clone(),
            size_bytes: file.size_bytes,
        })
    }
}

#[derive(Debug, Default)]
pub struct MockBeatAnalyzer;

#[async_trait]
impl BeatAnalyzer for MockBeatAnalyzer {
    fn name(&self) -> &str {
        "mock-beats"
    }

    async fn analyze(&self, _music_url: &str, fps: u32) -> anyhow::Result<BeatAnalysisResult> {
        Ok(mock_beats(fps))
    }
}

#[derive(Debug, Default)]
pub struct MockScriptEnhancer;

#[async_trait]
impl ScriptEnhancer for MockScriptEnhancer {
    fn name(&self) -> &str {
        "mock-script"
    }

    async fn enhance(
        &self,
        script: &str,
        _style_prompt: &str,
    ) -> anyhow::Result<ScriptEnhancementResult> {
        Ok(mock_enhancement(script))
    }
}

#[derive(Debug, Default)]
pub struct MockTimelineSynthesizer;

#[async_trait]
impl TimelineSynthesizer for MockTimelineSynthesizer {
    fn name(&self) -> &str {
        "mock-synthesis"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<AnimationTimeline> {
        Ok(synthesize_timeline(request)?)
    }
}

/// Runs the local render job and discards the frame stream.
#[derive(Debug, Default)]
pub struct MockRenderSubmitter {
    next_id: AtomicU64,
}

#[async_trait]
impl RenderSubmitter for MockRenderSubmitter {
    fn name(&self) -> &str {
        "mock-render"
    }

    async fn submit(&self, request: &RenderRequest) -> anyhow::Result<RenderReceipt> {
        let mut job = RenderJob::new(request.timeline.clone())
            .with_size(Resolution::new(request.width, request.height));
        if let Some(frames) = request.duration_in_frames {
            job = job.with_duration(frames);
        }
        let stats = tokio::task::spawn_blocking(move || {
            let mut sink = JsonLinesSink::new(std::io::sink());
            let threading = RenderThreading {
                parallel: true,
                static_frame_elision: true,
                ..RenderThreading::default()
            };
            job.run(&mut sink, &threading)
        })
        .await??;

        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let render_id = format!("render-{}-{n}", request.timeline.id);
        Ok(RenderReceipt {
            output_url: format!("mock://renders/{render_id}.jsonl"),
            render_id,
            stats: Some(stats),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/mock.rs"]
mod tests;
