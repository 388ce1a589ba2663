use crate::{
    beat::analysis::Energy,
    foundation::error::{KinetypeError, KinetypeResult, PipelineStage},
};

pub const SCRIPT_MIN_CHARS: usize = 10;
pub const SCRIPT_MAX_CHARS: usize = 5000;
pub const STYLE_PROMPT_MIN_CHARS: usize = 5;
pub const STYLE_PROMPT_MAX_CHARS: usize = 1000;

/// Output of a script-enhancement provider.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEnhancementResult {
    pub original_script: String,
    pub enhanced_script: String,
    /// Usually 3 to 5 words; any length is accepted.
    #[serde(default)]
    pub emphasized_words: Vec<String>,
}

impl ScriptEnhancementResult {
    pub fn contract_violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.enhanced_script.trim().is_empty() {
            out.push("enhanced script is empty".to_string());
        }
        if self.emphasized_words.iter().any(|w| w.trim().is_empty()) {
            out.push("emphasized words must not be blank".to_string());
        }
        out
    }
}

fn check_length(
    what: &str,
    value: &str,
    min: usize,
    max: usize,
) -> KinetypeResult<()> {
    let stage = PipelineStage::ScriptEnhancement;
    if value.trim().is_empty() {
        return Err(KinetypeError::stage_validation(stage, format!("{what} is required")));
    }
    let len = value.chars().count();
    if len < min {
        return Err(KinetypeError::stage_validation(
            stage,
            format!("{what} must be at least {min} characters"),
        ));
    }
    if len > max {
        return Err(KinetypeError::stage_validation(
            stage,
            format!("{what} must not exceed {max} characters"),
        ));
    }
    Ok(())
}

pub fn validate_script(script: &str) -> KinetypeResult<()> {
    check_length("script", script, SCRIPT_MIN_CHARS, SCRIPT_MAX_CHARS)
}

pub fn validate_style_prompt(prompt: &str) -> KinetypeResult<()> {
    check_length(
        "style prompt",
        prompt,
        STYLE_PROMPT_MIN_CHARS,
        STYLE_PROMPT_MAX_CHARS,
    )
}

/// Non-empty, trimmed sentences split on `.`, `!` and `?`.
pub fn sentences(script: &str) -> Vec<&str> {
    script
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Last word of every sentence, when longer than three characters.
pub fn extract_emphasis_points(script: &str) -> Vec<String> {
    sentences(script)
        .into_iter()
        .filter_map(|s| s.split_whitespace().last())
        .filter(|w| w.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Playful,
    Energetic,
    Calm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ToneAnalysis {
    pub tone: Tone,
    pub energy: Energy,
}

/// Punctuation and emoji heuristic for a script's delivery.
pub fn analyze_tone(script: &str) -> ToneAnalysis {
    let exclamations = script.matches('!').count();
    let questions = script.matches('?').count();
    let has_emoji = script
        .chars()
        .any(|c| ('\u{1F300}'..='\u{1F9FF}').contains(&c));

    let mut energy = Energy::Medium;
    if exclamations > 2 || has_emoji {
        energy = Energy::High;
    }
    if questions > 2 {
        energy = Energy::Low;
    }
    let tone = if has_emoji {
        Tone::Playful
    } else if exclamations > 1 {
        Tone::Energetic
    } else {
        Tone::Calm
    };
    ToneAnalysis { tone, energy }
}

/// Collapse whitespace and capitalize the first letter of every sentence.
pub fn normalize_script(script: &str) -> String {
    let mut out = String::with_capacity(script.len());
    let mut capitalize = true;
    for word in script.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut chars = word.chars();
        if capitalize && let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        } else {
            out.push_str(word);
        }
        capitalize = word.ends_with(['.', '!', '?']);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/script.rs"]
mod tests;
