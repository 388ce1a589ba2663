//! Live providers backed by HTTP JSON endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::AUTHORIZATION,
    multipart::{Form, Part},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
    beat::analysis::BeatAnalysisResult,
    composition::model::AnimationTimeline,
    foundation::error::{KinetypeError, KinetypeResult},
    pipeline::{
        assets::{UploadFile, UploadedAsset},
        providers::{
            AssetUploader, BeatAnalyzer, RenderReceipt, RenderRequest, RenderSubmitter,
            ScriptEnhancer, SynthesisRequest, TimelineSynthesizer,
        },
        retry::{RetryPolicy, Retryable, with_retry},
        script::ScriptEnhancementResult,
    },
};

/// Failure of a single HTTP call.
#[derive(thiserror::Error, Debug)]
pub enum HttpCallError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl Retryable for HttpCallError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Timeout | Self::Decode(_) => false,
        }
    }

    fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

fn classify(e: reqwest::Error) -> HttpCallError {
    if e.is_timeout() {
        HttpCallError::Timeout
    } else {
        HttpCallError::Transport(e)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, HttpCallError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(HttpCallError::Status {
            status: status.as_u16(),
            body,
        });
    }
    resp.json::<T>()
        .await
        .map_err(|e| HttpCallError::Decode(e.to_string()))
}

/// Shared client: connection pool, credentials, and retry policy.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(
        connect_timeout: Duration,
        api_key: Option<String>,
        retry: RetryPolicy,
    ) -> KinetypeResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                KinetypeError::Other(anyhow::Error::new(e).context("failed to build HTTP client"))
            })?;
        Ok(Self {
            client,
            api_key,
            retry,
        })
    }

    fn authorize(&self, rb: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => rb.header(AUTHORIZATION, format!("Bearer {key}")),
            None => rb,
        }
    }

    /// POST `body` as JSON and decode a JSON answer, retrying per policy.
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        operation: &str,
        body: &B,
    ) -> Result<T, HttpCallError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        with_retry(&self.retry, operation, || async move {
            let resp = self
                .authorize(self.client.post(url))
                .json(body)
                .send()
                .await
                .map_err(classify)?;
            decode(resp).await
        })
        .await
    }
}

pub struct HttpUploader {
    client: HttpClient,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(client: HttpClient, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl AssetUploader for HttpUploader {
    fn name(&self) -> &str {
        "http-uploader"
    }

    async fn upload(
        &self,
        project_id: &str,
        index: usize,
        file: &UploadFile,
    ) -> anyhow::Result<UploadedAsset> {
        let Some(path) = &file.path else {
            anyhow::bail!("'{}' has no local path to upload from", file.file_name);
        };
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read '{}': {e}", path.display()))?;
        let c = &self.client;
        let bytes = &bytes;
        let asset = with_retry(&c.retry, "upload", || async move {
            let form = Form::new()
                .text("projectId", project_id.to_string())
                .text("role", file.role.as_str())
                .text("index", index.to_string())
                .part(
                    "file",
                    Part::bytes(bytes.clone()).file_name(file.file_name.clone()),
                );
            let resp = c
                .authorize(c.client.post(&self.endpoint))
                .multipart(form)
                .send()
                .await
                .map_err(classify)?;
            decode::<UploadedAsset>(resp).await
        })
        .await?;
        Ok(asset)
    }
}

pub struct HttpBeatAnalyzer {
    client: HttpClient,
    endpoint: String,
}

impl HttpBeatAnalyzer {
    pub fn new(client: HttpClient, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl BeatAnalyzer for HttpBeatAnalyzer {
    fn name(&self) -> &str {
        "http-beats"
    }

    async fn analyze(&self, music_url: &str, fps: u32) -> anyhow::Result<BeatAnalysisResult> {
        let body = json!({ "musicUrl": music_url, "fps": fps });
        Ok(self
            .client
            .post_json(&self.endpoint, "beat analysis", &body)
            .await?)
    }
}

pub struct HttpScriptEnhancer {
    client: HttpClient,
    endpoint: String,
}

impl HttpScriptEnhancer {
    pub fn new(client: HttpClient, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl ScriptEnhancer for HttpScriptEnhancer {
    fn name(&self) -> &str {
        "http-script"
    }

    async fn enhance(
        &self,
        script: &str,
        style_prompt: &str,
    ) -> anyhow::Result<ScriptEnhancementResult> {
        let body = json!({ "script": script, "stylePrompt": style_prompt });
        Ok(self
            .client
            .post_json(&self.endpoint, "script enhancement", &body)
            .await?)
    }
}

pub struct HttpTimelineSynthesizer {
    client: HttpClient,
    endpoint: String,
}

impl HttpTimelineSynthesizer {
    pub fn new(client: HttpClient, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl TimelineSynthesizer for HttpTimelineSynthesizer {
    fn name(&self) -> &str {
        "http-synthesis"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> anyhow::Result<AnimationTimeline> {
        let mut timeline: AnimationTimeline = self
            .client
            .post_json(&self.endpoint, "timeline synthesis", request)
            .await?;
        timeline.normalize();
        Ok(timeline)
    }
}

pub struct HttpRenderSubmitter {
    client: HttpClient,
    endpoint: String,
}

impl HttpRenderSubmitter {
    pub fn new(client: HttpClient, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl RenderSubmitter for HttpRenderSubmitter {
    fn name(&self) -> &str {
        "http-render"
    }

    async fn submit(&self, request: &RenderRequest) -> anyhow::Result<RenderReceipt> {
        Ok(self
            .client
            .post_json(&self.endpoint, "render", request)
            .await?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/http.rs"]
mod tests;
