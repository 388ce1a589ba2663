//! The four-stage generation run and render submission.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use futures_util::future::try_join_all;
use tracing::{info, warn};

use crate::{
    beat::analysis::BeatAnalysisResult,
    composition::{
        model::{AnimationTimeline, MIN_SCENE_FRAMES},
        validate::validate,
    },
    config::{KinetypeConfig, TimeoutConfig, VideoDefaults},
    foundation::error::{KinetypeError, KinetypeResult, PipelineStage, ProviderFailure},
    pipeline::{
        assets::{UploadFile, UploadLimits, UploadedAssets, validate_uploads},
        http::HttpCallError,
        providers::{ProviderSet, RenderReceipt, RenderRequest, SynthesisRequest},
        retry::Retryable,
        script::{ScriptEnhancementResult, validate_script, validate_style_prompt},
    },
    store::repository::{ProjectRecord, ProjectRepository, ProjectStatus},
};

/// Inputs of one generation run. Missing video settings fall back to the pipeline defaults.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    pub script: String,
    pub style_prompt: String,
    #[serde(default)]
    pub files: Vec<UploadFile>,
    #[serde(default)]
    pub fps: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub project_id: String,
    pub assets: UploadedAssets,
    pub beat_analysis: BeatAnalysisResult,
    pub script_result: ScriptEnhancementResult,
    pub timeline: Arc<AnimationTimeline>,
}

/// Output overrides for a render submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_in_frames: Option<u64>,
}

/// Runs `Upload -> BeatAnalysis -> ScriptEnhancement -> TimelineSynthesis`, stopping at the
/// first failure.
///
/// Runs for the same project are serialized; different projects proceed independently.
pub struct GenerationPipeline {
    providers: ProviderSet,
    repository: Arc<dyn ProjectRepository>,
    timeouts: TimeoutConfig,
    limits: UploadLimits,
    video: VideoDefaults,
    locks: ProjectLocks,
}

type ProjectLocks = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// Exclusive hold on one project. Dropping it forgets the project's lock once nobody else holds
/// or waits on it.
struct ProjectLease<'a> {
    locks: &'a ProjectLocks,
    id: String,
    guard: Option<tokio::sync::OwnedMutexGuard<()>>,
}

impl Drop for ProjectLease<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(&self.id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(&self.id);
        }
    }
}

impl GenerationPipeline {
    pub fn new(providers: ProviderSet, repository: Arc<dyn ProjectRepository>) -> Self {
        Self {
            providers,
            repository,
            timeouts: TimeoutConfig::default(),
            limits: UploadLimits::default(),
            video: VideoDefaults::default(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Select providers from `cfg` and take its timeouts, limits, and video defaults.
    pub fn from_config(
        cfg: &KinetypeConfig,
        repository: Arc<dyn ProjectRepository>,
    ) -> KinetypeResult<Self> {
        Ok(Self::new(ProviderSet::from_config(cfg)?, repository)
            .with_timeouts(cfg.timeouts)
            .with_limits(cfg.upload)
            .with_video_defaults(cfg.video))
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_video_defaults(mut self, video: VideoDefaults) -> Self {
        self.video = video;
        self
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    pub async fn project(&self, id: &str) -> KinetypeResult<Option<ProjectRecord>> {
        self.repository.get(id).await
    }

    async fn lock_project(&self, id: &str) -> ProjectLease<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id.to_string()).or_default())
        };
        let mut lease = ProjectLease {
            locks: &self.locks,
            id: id.to_string(),
            guard: None,
        };
        lease.guard = Some(lock.lock_owned().await);
        lease
    }

    /// Run every generation stage for one project and record the outcome.
    #[tracing::instrument(skip(self, request), fields(project = %request.project_id))]
    pub async fn run(&self, request: GenerationRequest) -> KinetypeResult<GenerationOutput> {
        if request.project_id.trim().is_empty() {
            return Err(KinetypeError::validation("project id is required"));
        }
        let _lease = self.lock_project(&request.project_id).await;

        let mut record = self
            .repository
            .get(&request.project_id)
            .await?
            .unwrap_or_else(|| ProjectRecord::new(&request.project_id, &request.project_name));
        if !request.project_name.is_empty() {
            record.name = request.project_name.clone();
        }
        record.script = request.script.clone();
        record.style_prompt = request.style_prompt.clone();
        record.status = ProjectStatus::Processing;
        record.error_message = None;
        record.failed_stage = None;
        record.assets = None;
        record.beat_analysis = None;
        record.script_result = None;
        record.timeline = None;
        record.render = None;
        self.repository.put(record.clone()).await?;
        info!("generation started");

        match self.run_stages(&request, &mut record).await {
            Ok(output) => {
                record.status = ProjectStatus::Completed;
                self.repository.put(record).await?;
                info!(frames = output.timeline.video.total_frames, "generation completed");
                Ok(output)
            }
            Err(e) => {
                record.status = ProjectStatus::Failed;
                record.error_message = Some(e.to_string());
                record.failed_stage = e.stage();
                self.repository.put(record).await?;
                warn!(stage = ?e.stage(), "generation failed: {e}");
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        req: &GenerationRequest,
        record: &mut ProjectRecord,
    ) -> KinetypeResult<GenerationOutput> {
        let fps = req.fps.unwrap_or(self.video.fps);
        let width = req.width.unwrap_or(self.video.width);
        let height = req.height.unwrap_or(self.video.height);

        let assets = self.upload(req).await?;
        record.assets = Some(assets.clone());

        let beats = self.analyze_beats(&assets, fps).await?;
        record.beat_analysis = Some(beats.clone());

        let enhanced = self.enhance_script(req).await?;
        record.script_result = Some(enhanced.clone());

        let synthesis = SynthesisRequest {
            project_id: req.project_id.clone(),
            project_name: record.name.clone(),
            enhanced: enhanced.clone(),
            style_prompt: req.style_prompt.clone(),
            beats: beats.clone(),
            assets: assets.clone(),
            width,
            height,
            fps,
        };
        let timeline = Arc::new(self.synthesize(&synthesis).await?);
        record.timeline = Some(Arc::clone(&timeline));

        Ok(GenerationOutput {
            project_id: req.project_id.clone(),
            assets,
            beat_analysis: beats,
            script_result: enhanced,
            timeline,
        })
    }

    async fn upload(&self, req: &GenerationRequest) -> KinetypeResult<UploadedAssets> {
        const STAGE: PipelineStage = PipelineStage::Upload;
        validate_uploads(&req.files, &self.limits)?;

        let uploader = &self.providers.uploader;
        let uploads = try_join_all(req.files.iter().enumerate().map(|(index, file)| async move {
            let asset = self
                .call(
                    STAGE,
                    uploader.name(),
                    uploader.upload(&req.project_id, index, file),
                )
                .await?;
            Ok::<_, KinetypeError>((file.role, asset))
        }))
        .await?;

        let violations: Vec<String> = uploads
            .iter()
            .filter(|(_, a)| a.url.trim().is_empty())
            .map(|(_, a)| format!("no URL returned for '{}'", a.file_name))
            .collect();
        check_contract(STAGE, uploader.name(), violations)?;

        let assets = UploadedAssets::from_uploads(uploads)?;
        info!(stage = %STAGE, provider = uploader.name(), files = req.files.len(), "stage completed");
        Ok(assets)
    }

    async fn analyze_beats(
        &self,
        assets: &UploadedAssets,
        fps: u32,
    ) -> KinetypeResult<BeatAnalysisResult> {
        const STAGE: PipelineStage = PipelineStage::BeatAnalysis;
        let music_url = assets.music_file.url.trim();
        if music_url.is_empty() {
            return Err(KinetypeError::stage_validation(STAGE, "music URL is required"));
        }
        if fps == 0 {
            return Err(KinetypeError::stage_validation(STAGE, "fps must be greater than 0"));
        }

        let analyzer = &self.providers.beats;
        let beats = self
            .call(STAGE, analyzer.name(), analyzer.analyze(music_url, fps))
            .await?;
        check_contract(STAGE, analyzer.name(), beats.contract_violations())?;
        info!(
            stage = %STAGE,
            provider = analyzer.name(),
            beats = beats.beats.len(),
            tempo = beats.tempo,
            "stage completed"
        );
        Ok(beats)
    }

    async fn enhance_script(
        &self,
        req: &GenerationRequest,
    ) -> KinetypeResult<ScriptEnhancementResult> {
        const STAGE: PipelineStage = PipelineStage::ScriptEnhancement;
        validate_script(&req.script)?;
        validate_style_prompt(&req.style_prompt)?;

        let enhancer = &self.providers.script;
        let enhanced = self
            .call(
                STAGE,
                enhancer.name(),
                enhancer.enhance(&req.script, &req.style_prompt),
            )
            .await?;
        check_contract(STAGE, enhancer.name(), enhanced.contract_violations())?;
        info!(
            stage = %STAGE,
            provider = enhancer.name(),
            emphasized = enhanced.emphasized_words.len(),
            "stage completed"
        );
        Ok(enhanced)
    }

    async fn synthesize(&self, req: &SynthesisRequest) -> KinetypeResult<AnimationTimeline> {
        const STAGE: PipelineStage = PipelineStage::TimelineSynthesis;
        if req.width == 0 || req.height == 0 {
            return Err(KinetypeError::stage_validation(
                STAGE,
                "video dimensions must be positive",
            ));
        }

        let synthesizer = &self.providers.synthesis;
        let mut timeline = self
            .call(STAGE, synthesizer.name(), synthesizer.synthesize(req))
            .await?;
        timeline.normalize();
        check_contract(STAGE, synthesizer.name(), validate(&timeline).errors)?;
        info!(
            stage = %STAGE,
            provider = synthesizer.name(),
            scenes = timeline.scenes.len(),
            frames = timeline.video.total_frames,
            "stage completed"
        );
        Ok(timeline)
    }

    /// Send a project's timeline to the renderer and record the receipt.
    #[tracing::instrument(skip(self))]
    pub async fn submit_render(
        &self,
        project_id: &str,
        overrides: RenderOverrides,
    ) -> KinetypeResult<RenderReceipt> {
        const STAGE: PipelineStage = PipelineStage::Render;
        let _lease = self.lock_project(project_id).await;

        let mut record = self.repository.get(project_id).await?.ok_or_else(|| {
            KinetypeError::stage_validation(STAGE, format!("project '{project_id}' not found"))
        })?;
        let timeline = record.timeline.clone().ok_or_else(|| {
            KinetypeError::stage_validation(
                STAGE,
                format!("project '{project_id}' has no timeline yet"),
            )
        })?;
        let width = overrides.width.unwrap_or(timeline.video.width);
        let height = overrides.height.unwrap_or(timeline.video.height);
        if width == 0 || height == 0 {
            return Err(KinetypeError::stage_validation(
                STAGE,
                "render dimensions must be positive",
            ));
        }

        let request = RenderRequest {
            timeline,
            width,
            height,
            duration_in_frames: overrides.duration_in_frames.map(|d| d.max(MIN_SCENE_FRAMES)),
        };
        let renderer = &self.providers.render;
        let receipt = self
            .call(STAGE, renderer.name(), renderer.submit(&request))
            .await?;
        let mut violations = Vec::new();
        if receipt.output_url.trim().is_empty() {
            violations.push("render receipt has no output URL".to_string());
        }
        check_contract(STAGE, renderer.name(), violations)?;

        info!(render = %receipt.render_id, url = %receipt.output_url, "render submitted");
        record.render = Some(receipt.clone());
        self.repository.put(record).await?;
        Ok(receipt)
    }

    /// Bound one provider call by its stage's timeout class and attribute any failure.
    async fn call<T>(
        &self,
        stage: PipelineStage,
        provider: &str,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> KinetypeResult<T> {
        let limit = self.timeouts.for_stage(stage);
        match tokio::time::timeout(limit, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let timed_out = e
                    .downcast_ref::<HttpCallError>()
                    .is_some_and(|h| h.is_timeout());
                let kind = if timed_out {
                    ProviderFailure::Timeout
                } else {
                    ProviderFailure::Failed
                };
                Err(KinetypeError::provider(stage, provider, kind, format!("{e:#}")))
            }
            Err(_) => Err(KinetypeError::provider(
                stage,
                provider,
                ProviderFailure::Timeout,
                format!("no response within {} ms", limit.as_millis()),
            )),
        }
    }
}

fn check_contract(
    stage: PipelineStage,
    provider: &str,
    violations: Vec<String>,
) -> KinetypeResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    Err(KinetypeError::provider(
        stage,
        provider,
        ProviderFailure::ContractViolation,
        violations.join("; "),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
