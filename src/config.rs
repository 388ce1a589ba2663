//! Runtime configuration: a JSON file layered under `KINETYPE_*` environment variables.

use std::{path::Path, time::Duration};

use crate::{
    foundation::error::{KinetypeError, KinetypeResult, PipelineStage},
    pipeline::{assets::UploadLimits, retry::RetryPolicy},
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KinetypeConfig {
    pub video: VideoDefaults,
    pub providers: ProviderConfig,
    pub timeouts: TimeoutConfig,
    pub retry: RetryPolicy,
    pub upload: UploadLimits,
}

/// Output settings used when a request does not carry its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoDefaults {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for VideoDefaults {
    fn default() -> Self {
        Self {
            fps: 30,
            width: 1080,
            height: 1920,
        }
    }
}

/// Live provider endpoints. A stage without an endpoint uses its mock provider.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    pub uploader: Option<String>,
    pub beat_analysis: Option<String>,
    pub script_enhancement: Option<String>,
    pub timeline_synthesis: Option<String>,
    pub render: Option<String>,
    /// Sent as a bearer token to every live endpoint.
    pub api_key: Option<String>,
    /// Use mock providers everywhere, whatever endpoints are set.
    pub force_mock: bool,
    /// Refuse to start when a stage has no endpoint instead of falling back to its mock.
    pub require_live: bool,
}

/// The four timeout classes, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeoutConfig {
    pub short_ms: u64,
    pub standard_ms: u64,
    pub long_ms: u64,
    pub very_long_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            short_ms: 5_000,
            standard_ms: 30_000,
            long_ms: 120_000,
            very_long_ms: 300_000,
        }
    }
}

impl TimeoutConfig {
    /// Connection setup and health probes.
    pub fn short(&self) -> Duration {
        Duration::from_millis(self.short_ms)
    }

    pub fn standard(&self) -> Duration {
        Duration::from_millis(self.standard_ms)
    }

    pub fn long(&self) -> Duration {
        Duration::from_millis(self.long_ms)
    }

    pub fn very_long(&self) -> Duration {
        Duration::from_millis(self.very_long_ms)
    }

    /// Bound applied to one provider call of `stage`.
    pub fn for_stage(&self, stage: PipelineStage) -> Duration {
        match stage {
            PipelineStage::Upload => self.long(),
            PipelineStage::BeatAnalysis
            | PipelineStage::ScriptEnhancement
            | PipelineStage::TimelineSynthesis => self.standard(),
            PipelineStage::Render => self.very_long(),
        }
    }
}

impl KinetypeConfig {
    /// Read `path` (when given), then apply environment overrides.
    #[tracing::instrument]
    pub fn load(path: Option<&Path>) -> KinetypeResult<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.check()?;
        tracing::debug!(
            force_mock = cfg.providers.force_mock,
            fps = cfg.video.fps,
            "configuration loaded"
        );
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> KinetypeResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            let msg = format!("failed to read config '{}': {e}", path.display());
            KinetypeError::Io(std::io::Error::new(e.kind(), msg))
        })?;
        serde_json::from_str(&s)
            .map_err(|e| KinetypeError::serde(format!("invalid config '{}': {e}", path.display())))
    }

    /// Override fields from `KINETYPE_*` variables looked up through `get`.
    ///
    /// Unparseable values are ignored and the current value is kept.
    pub fn apply_env_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        fn parsed<T: std::str::FromStr>(v: Option<String>) -> Option<T> {
            v.and_then(|s| s.trim().parse().ok())
        }
        let flag = |key: &str| {
            get(key).map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        };
        let url = |key: &str| get(key).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let v = &mut self.video;
        v.fps = parsed(get("KINETYPE_FPS")).unwrap_or(v.fps);
        v.width = parsed(get("KINETYPE_WIDTH")).unwrap_or(v.width);
        v.height = parsed(get("KINETYPE_HEIGHT")).unwrap_or(v.height);

        let p = &mut self.providers;
        if let Some(u) = url("KINETYPE_UPLOAD_URL") {
            p.uploader = Some(u);
        }
        if let Some(u) = url("KINETYPE_BEAT_ANALYSIS_URL") {
            p.beat_analysis = Some(u);
        }
        if let Some(u) = url("KINETYPE_SCRIPT_ENHANCEMENT_URL") {
            p.script_enhancement = Some(u);
        }
        if let Some(u) = url("KINETYPE_TIMELINE_SYNTHESIS_URL") {
            p.timeline_synthesis = Some(u);
        }
        if let Some(u) = url("KINETYPE_RENDER_URL") {
            p.render = Some(u);
        }
        if let Some(key) = url("KINETYPE_API_KEY") {
            p.api_key = Some(key);
        }
        p.force_mock = flag("KINETYPE_FORCE_MOCK").unwrap_or(p.force_mock);
        p.require_live = flag("KINETYPE_REQUIRE_LIVE").unwrap_or(p.require_live);

        let t = &mut self.timeouts;
        t.short_ms = parsed(get("KINETYPE_TIMEOUT_SHORT_MS")).unwrap_or(t.short_ms);
        t.standard_ms = parsed(get("KINETYPE_TIMEOUT_STANDARD_MS")).unwrap_or(t.standard_ms);
        t.long_ms = parsed(get("KINETYPE_TIMEOUT_LONG_MS")).unwrap_or(t.long_ms);
        t.very_long_ms = parsed(get("KINETYPE_TIMEOUT_VERY_LONG_MS")).unwrap_or(t.very_long_ms);

        let r = &mut self.retry;
        r.max_attempts = parsed(get("KINETYPE_RETRY_MAX_ATTEMPTS")).unwrap_or(r.max_attempts);
        r.retry_on_timeout = flag("KINETYPE_RETRY_ON_TIMEOUT").unwrap_or(r.retry_on_timeout);
    }

    /// Reject settings no run could succeed with.
    pub fn check(&self) -> KinetypeResult<()> {
        let v = &self.video;
        if v.fps == 0 || v.width == 0 || v.height == 0 {
            return Err(KinetypeError::validation(format!(
                "video defaults must be positive (fps={}, {}x{})",
                v.fps, v.width, v.height
            )));
        }
        let t = &self.timeouts;
        if [t.short_ms, t.standard_ms, t.long_ms, t.very_long_ms].contains(&0) {
            return Err(KinetypeError::validation("timeouts must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
