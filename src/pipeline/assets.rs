//! Upload inputs, their validation rules, and the uploaded-asset record.

use std::path::PathBuf;

use crate::foundation::error::{KinetypeError, KinetypeResult, PipelineStage};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "svg"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "avi"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "m4a", "ogg"];
pub const LOGO_EXTENSIONS: &[&str] = &["png", "svg"];

/// What an uploaded file is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetRole {
    Logo,
    Music,
    ProductImage,
    ProductVideo,
    Background,
}

impl AssetRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::Music => "music",
            Self::ProductImage => "image",
            Self::ProductVideo => "video",
            Self::Background => "background",
        }
    }

    fn allows(self, ext: &str) -> bool {
        match self {
            Self::Logo => LOGO_EXTENSIONS.contains(&ext),
            Self::Music => AUDIO_EXTENSIONS.contains(&ext),
            Self::ProductImage => IMAGE_EXTENSIONS.contains(&ext),
            Self::ProductVideo => VIDEO_EXTENSIONS.contains(&ext),
            Self::Background => IMAGE_EXTENSIONS.contains(&ext) || VIDEO_EXTENSIONS.contains(&ext),
        }
    }
}

/// A file offered for upload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFile {
    pub file_name: String,
    pub role: AssetRole,
    pub size_bytes: u64,
    /// Local path to read the bytes from. Mock uploaders never read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, role: AssetRole, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            role,
            size_bytes,
            path: None,
        }
    }

    /// Lowercased extension after the last `.`; empty when there is none.
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Per-file and per-project byte limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadLimits {
    pub max_file_bytes: u64,
    pub max_total_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: 500 * 1024 * 1024,
            max_total_bytes: 2 * 1024 * 1024 * 1024,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub url: String,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Public URLs of everything uploaded for one project.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAssets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<UploadedAsset>,
    pub music_file: UploadedAsset,
    #[serde(default)]
    pub product_images: Vec<UploadedAsset>,
    #[serde(default)]
    pub product_videos: Vec<UploadedAsset>,
    #[serde(default)]
    pub background_assets: Vec<UploadedAsset>,
}

impl UploadedAssets {
    /// Group uploaded files by role. Fails without exactly one music file.
    pub fn from_uploads(
        uploads: impl IntoIterator<Item = (AssetRole, UploadedAsset)>,
    ) -> KinetypeResult<Self> {
        let mut logo = None;
        let mut music = None;
        let mut product_images = Vec::new();
        let mut product_videos = Vec::new();
        let mut background_assets = Vec::new();
        for (role, asset) in uploads {
            match role {
                AssetRole::Logo => logo = Some(asset),
                AssetRole::Music => music = Some(asset),
                AssetRole::ProductImage => product_images.push(asset),
                AssetRole::ProductVideo => product_videos.push(asset),
                AssetRole::Background => background_assets.push(asset),
            }
        }
        let music_file = music.ok_or_else(|| {
            KinetypeError::stage_validation(PipelineStage::Upload, "a music file is required")
        })?;
        Ok(Self {
            logo,
            music_file,
            product_images,
            product_videos,
            background_assets,
        })
    }
}

/// Check a project's upload set before anything is sent.
pub fn validate_uploads(files: &[UploadFile], limits: &UploadLimits) -> KinetypeResult<()> {
    let fail = |msg: String| Err(KinetypeError::stage_validation(PipelineStage::Upload, msg));

    let music = files.iter().filter(|f| f.role == AssetRole::Music).count();
    if music != 1 {
        return fail(format!("exactly one music file is required (got {music})"));
    }
    let logos = files.iter().filter(|f| f.role == AssetRole::Logo).count();
    if logos > 1 {
        return fail(format!("at most one logo is allowed (got {logos})"));
    }

    let mut total: u64 = 0;
    for f in files {
        if f.file_name.trim().is_empty() {
            return fail("file name must not be empty".to_string());
        }
        let ext = f.extension();
        if !f.role.allows(&ext) {
            return fail(format!(
                "'{}' has an extension not allowed for {} files",
                f.file_name,
                f.role.as_str()
            ));
        }
        if f.size_bytes > limits.max_file_bytes {
            return fail(format!(
                "'{}' is {} bytes, over the {} byte limit",
                f.file_name, f.size_bytes, limits.max_file_bytes
            ));
        }
        total = total.saturating_add(f.size_bytes);
    }
    if total > limits.max_total_bytes {
        return fail(format!(
            "project uploads total {total} bytes, over the {} byte limit",
            limits.max_total_bytes
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/assets.rs"]
mod tests;
