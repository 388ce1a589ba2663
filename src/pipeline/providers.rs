//! Provider seams for every pipeline stage, and the set selected at startup.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    beat::analysis::BeatAnalysisResult,
    composition::model::AnimationTimeline,
    config::KinetypeConfig,
    foundation::error::{KinetypeError, KinetypeResult, PipelineStage, ProviderFailure},
    pipeline::{
        assets::{UploadFile, UploadedAsset, UploadedAssets},
        http::{
            HttpBeatAnalyzer, HttpClient, HttpRenderSubmitter, HttpScriptEnhancer,
            HttpTimelineSynthesizer, HttpUploader,
        },
        mock::{
            MockBeatAnalyzer, MockRenderSubmitter, MockScriptEnhancer, MockTimelineSynthesizer,
            MockUploader,
        },
        script::ScriptEnhancementResult,
    },
    render::job::RenderStats,
};

/// Stores one file and returns its public URL.
#[async_trait]
pub trait AssetUploader: Send + Sync {
    fn name(&self) -> &str;
    async fn upload(
        &self,
        project_id: &str,
        index: usize,
        file: &UploadFile,
    ) -> anyhow::Result<UploadedAsset>;
}

/// Detects tempo and beat frames of a music track.
#[async_trait]
pub trait BeatAnalyzer: Send + Sync {
    fn name(&self) -> &str;
    async fn analyze(&self, music_url: &str, fps: u32) -> anyhow::Result<BeatAnalysisResult>;
}

/// Rewrites a script and picks the words to emphasize.
#[async_trait]
pub trait ScriptEnhancer: Send + Sync {
    fn name(&self) -> &str;
    async fn enhance(
        &self,
        script: &str,
        style_prompt: &str,
    ) -> anyhow::Result<ScriptEnhancementResult>;
}

/// Turns the enhanced script, beats, and assets into a timeline.
#[async_trait]
pub trait TimelineSynthesizer: Send + Sync {
    fn name(&self) -> &str;
    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<AnimationTimeline>;
}

/// Hands a finished timeline to a renderer.
#[async_trait]
pub trait RenderSubmitter: Send + Sync {
    fn name(&self) -> &str;
    async fn submit(&self, request: &RenderRequest) -> anyhow::Result<RenderReceipt>;
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    pub project_id: String,
    pub project_name: String,
    pub enhanced: ScriptEnhancementResult,
    pub style_prompt: String,
    pub beats: BeatAnalysisResult,
    pub assets: UploadedAssets,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub timeline: Arc<AnimationTimeline>,
    pub width: u32,
    pub height: u32,
    /// Clamped to at least the minimum scene length before it reaches a renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_frames: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReceipt {
    pub render_id: String,
    pub output_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<RenderStats>,
}

/// Providers for every stage, fixed for the life of a pipeline.
#[derive(Clone)]
pub struct ProviderSet {
    pub uploader: Arc<dyn AssetUploader>,
    pub beats: Arc<dyn BeatAnalyzer>,
    pub script: Arc<dyn ScriptEnhancer>,
    pub synthesis: Arc<dyn TimelineSynthesizer>,
    pub render: Arc<dyn RenderSubmitter>,
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSet")
            .field("uploader", &self.uploader.name())
            .field("beats", &self.beats.name())
            .field("script", &self.script.name())
            .field("synthesis", &self.synthesis.name())
            .field("render", &self.render.name())
            .finish()
    }
}

impl ProviderSet {
    /// Deterministic in-process providers for every stage.
    pub fn mock() -> Self {
        Self {
            uploader: Arc::new(MockUploader),
            beats: Arc::new(MockBeatAnalyzer),
            script: Arc::new(MockScriptEnhancer),
            synthesis: Arc::new(MockTimelineSynthesizer),
            render: Arc::new(MockRenderSubmitter::default()),
        }
    }

    /// Pick live or mock per stage.
    ///
    /// A stage goes live when it has an endpoint and `forceMock` is off. With `requireLive` set,
    /// a stage without an endpoint is an error instead of a mock.
    pub fn from_config(cfg: &KinetypeConfig) -> KinetypeResult<Self> {
        let p = &cfg.providers;
        if p.force_mock {
            tracing::info!("all providers forced to mock");
            return Ok(Self::mock());
        }

        let pick = |stage: PipelineStage,
                    endpoint: &Option<String>|
         -> KinetypeResult<Option<String>> {
            match endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
                Some(e) => Ok(Some(e.to_string())),
                None if p.require_live => Err(KinetypeError::provider(
                    stage,
                    "live",
                    ProviderFailure::Unconfigured,
                    "no endpoint configured",
                )),
                None => Ok(None),
            }
        };
        let upload = pick(PipelineStage::Upload, &p.uploader)?;
        let beats = pick(PipelineStage::BeatAnalysis, &p.beat_analysis)?;
        let script = pick(PipelineStage::ScriptEnhancement, &p.script_enhancement)?;
        let synthesis = pick(PipelineStage::TimelineSynthesis, &p.timeline_synthesis)?;
        let render = pick(PipelineStage::Render, &p.render)?;

        let any_live = [&upload, &beats, &script, &synthesis, &render]
            .iter()
            .any(|e| e.is_some());
        let client = if any_live {
            Some(HttpClient::new(
                cfg.timeouts.short(),
                p.api_key.clone(),
                cfg.retry.clone(),
            )?)
        } else {
            None
        };
        let live = |endpoint: Option<String>| endpoint.zip(client.clone());

        let set = Self {
            uploader: match live(upload) {
                Some((url, c)) => Arc::new(HttpUploader::new(c, url)),
                None => Arc::new(MockUploader),
            },
            beats: match live(beats) {
                Some((url, c)) => Arc::new(HttpBeatAnalyzer::new(c, url)),
                None => Arc::new(MockBeatAnalyzer),
            },
            script: match live(script) {
                Some((url, c)) => Arc::new(HttpScriptEnhancer::new(c, url)),
                None => Arc::new(MockScriptEnhancer),
            },
            synthesis: match live(synthesis) {
                Some((url, c)) => Arc::new(HttpTimelineSynthesizer::new(c, url)),
                None => Arc::new(MockTimelineSynthesizer),
            },
            render: match live(render) {
                Some((url, c)) => Arc::new(HttpRenderSubmitter::new(c, url)),
                None => Arc::new(MockRenderSubmitter::default()),
            },
        };
        tracing::info!(providers = ?set, "providers selected");
        Ok(set)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/providers.rs"]
mod tests;
