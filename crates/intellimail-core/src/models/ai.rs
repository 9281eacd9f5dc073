use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default summary length for thread summaries, in words
pub const DEFAULT_THREAD_SUMMARY_LENGTH: u32 = 200;

/// Default summary length for single messages, in words
pub const DEFAULT_SUMMARY_LENGTH: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Friendly,
    Casual,
    #[default]
    Professional,
    Apologetic,
    Urgent,
    Grateful,
    Polite,
}

impl Tone {
    pub const ALL: [Tone; 8] = [
        Tone::Formal,
        Tone::Friendly,
        Tone::Casual,
        Tone::Professional,
        Tone::Apologetic,
        Tone::Urgent,
        Tone::Grateful,
        Tone::Polite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Friendly => "friendly",
            Tone::Casual => "casual",
            Tone::Professional => "professional",
            Tone::Apologetic => "apologetic",
            Tone::Urgent => "urgent",
            Tone::Grateful => "grateful",
            Tone::Polite => "polite",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == wanted)
            .ok_or_else(|| format!("Unknown tone '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ReplyLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl FromStr for ReplyLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(ReplyLength::Short),
            "medium" => Ok(ReplyLength::Medium),
            "long" => Ok(ReplyLength::Long),
            _ => Err(format!("Unknown reply length '{}'", s)),
        }
    }
}

/// Body of `POST /summarize/`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SummarizeRequest {
    pub email_id: String,
    pub max_length: u32,
}

/// Body of `POST /summarize/thread/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ThreadSummaryRequest {
    pub max_length: u32,
}

impl Default for ThreadSummaryRequest {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_THREAD_SUMMARY_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Summary {
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub original_length: u64,
    pub summary_length: u64,
    pub compression_ratio: f64,
}

/// Body of `POST /reply/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ReplyRequest {
    pub email_id: String,
    pub tone: Tone,
    pub length: ReplyLength,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ReplyResponse {
    pub generated_reply: String,
    #[serde(default)]
    pub tone_used: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub suggested_subject: Option<String>,
    #[serde(default)]
    pub alternative_replies: Option<Vec<String>>,
}

/// Body of `POST /reply/refine`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RefineReplyRequest {
    pub reply_text: String,
    pub target_tone: Tone,
    pub refinement_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RefinedReply {
    pub refined_reply: String,
    #[serde(default)]
    pub original_tone: Option<String>,
    #[serde(default)]
    pub new_tone: Option<String>,
    #[serde(default)]
    pub changes_made: Vec<String>,
}

/// Body of `POST /reply/analyze-tone`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ToneAnalysisRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ToneAnalysis {
    pub detected_tone: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub tone_breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Response from `GET /reply/tones`: tone name to description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AvailableTones {
    pub available_tones: BTreeMap<String, String>,
    pub default_tone: String,
}
