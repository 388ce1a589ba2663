/// Convenience result type used across kinetype.
pub type KinetypeResult<T> = Result<T, KinetypeError>;

/// Ordered stages of the generation pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineStage {
    Upload,
    BeatAnalysis,
    ScriptEnhancement,
    TimelineSynthesis,
    /// Render submission, which runs after the four generation stages.
    Render,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::BeatAnalysis => "beat analysis",
            Self::ScriptEnhancement => "script enhancement",
            Self::TimelineSynthesis => "timeline synthesis",
            Self::Render => "render",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a provider call failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderFailure {
    /// The provider answered with an error or could not be reached.
    Failed,
    /// The call exceeded its timeout class.
    Timeout,
    /// The provider answered, but the payload breaks its documented contract.
    ContractViolation,
    /// No provider is configured for the stage.
    Unconfigured,
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Failed => "failed",
            Self::Timeout => "timed out",
            Self::ContractViolation => "violated its contract",
            Self::Unconfigured => "is not configured",
        })
    }
}

/// Top-level error taxonomy used by engine and pipeline APIs.
///
/// Frame evaluation never surfaces an error: malformed layers are degraded to a hidden state
/// inside the evaluator.
#[derive(thiserror::Error, Debug)]
pub enum KinetypeError {
    /// Invalid user input or timeline data, optionally tied to the stage that rejected it.
    #[error("{}", display_validation(.stage, .message))]
    Validation {
        stage: Option<PipelineStage>,
        message: String,
    },

    /// An upstream provider failed, timed out, or returned data outside its contract.
    #[error("{stage} stage failed: provider '{provider}' {kind}: {message}")]
    Provider {
        stage: PipelineStage,
        provider: String,
        kind: ProviderFailure,
        message: String,
    },

    /// Errors while evaluating or rendering frames.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn display_validation(stage: &Option<PipelineStage>, message: &str) -> String {
    match stage {
        Some(stage) => format!("{stage} stage failed: validation error: {message}"),
        None => format!("validation error: {message}"),
    }
}

impl KinetypeError {
    /// Build a stage-less [`KinetypeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            stage: None,
            message: msg.into(),
        }
    }

    /// Build a [`KinetypeError::Validation`] value tagged with the rejecting stage.
    pub fn stage_validation(stage: PipelineStage, msg: impl Into<String>) -> Self {
        Self::Validation {
            stage: Some(stage),
            message: msg.into(),
        }
    }

    pub fn provider(
        stage: PipelineStage,
        provider: impl Into<String>,
        kind: ProviderFailure,
        msg: impl Into<String>,
    ) -> Self {
        Self::Provider {
            stage,
            provider: provider.into(),
            kind,
            message: msg.into(),
        }
    }

    /// Build a [`KinetypeError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`KinetypeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Stage this error is attributed to, if any.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Validation { stage, .. } => *stage,
            Self::Provider { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Re-attribute a stage-less validation error to `stage`.
    ///
    /// Provider errors keep their original stage.
    pub fn at_stage(self, stage: PipelineStage) -> Self {
        match self {
            Self::Validation {
                stage: None,
                message,
            } => Self::Validation {
                stage: Some(stage),
                message,
            },
            other => other,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Provider {
                kind: ProviderFailure::Timeout,
                ..
            }
        )
    }
}

impl From<serde_json::Error> for KinetypeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
