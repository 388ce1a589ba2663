//! Project records and the repository the pipeline writes them to.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    beat::analysis::BeatAnalysisResult,
    composition::model::AnimationTimeline,
    foundation::error::{KinetypeResult, PipelineStage},
    pipeline::{
        assets::UploadedAssets, providers::RenderReceipt, script::ScriptEnhancementResult,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Processing,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Everything known about one project, stage outputs included.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub script: String,
    pub style_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<UploadedAssets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beat_analysis: Option<BeatAnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_result: Option<ScriptEnhancementResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Arc<AnimationTimeline>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<PipelineStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderReceipt>,
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Persistence for project records. Writes replace the whole record.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn get(&self, id: &str) -> KinetypeResult<Option<ProjectRecord>>;
    async fn put(&self, record: ProjectRecord) -> KinetypeResult<()>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: &str) -> KinetypeResult<bool>;
}

/// Process-local repository.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    records: RwLock<HashMap<String, ProjectRecord>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn get(&self, id: &str) -> KinetypeResult<Option<ProjectRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, record: ProjectRecord) -> KinetypeResult<()> {
        tracing::debug!(project = %record.id, status = record.status.as_str(), "project saved");
        self.records.write().await.insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete(&self, id: &str) -> KinetypeResult<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/repository.rs"]
mod tests;
