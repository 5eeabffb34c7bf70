//! AI writing assistant call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RequestClient, RequestDescriptor, RequestError};

pub const ASSISTANT_PATH: &str = "/ai/assistant";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistMode {
    #[default]
    Summary,
    Reply,
    Tags,
    Polish,
    Emojify,
    Title,
    Translate,
    Vibe,
}

impl AssistMode {
    pub const ALL: [AssistMode; 8] = [
        AssistMode::Summary,
        AssistMode::Reply,
        AssistMode::Tags,
        AssistMode::Polish,
        AssistMode::Emojify,
        AssistMode::Title,
        AssistMode::Translate,
        AssistMode::Vibe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssistMode::Summary => "summary",
            AssistMode::Reply => "reply",
            AssistMode::Tags => "tags",
            AssistMode::Polish => "polish",
            AssistMode::Emojify => "emojify",
            AssistMode::Title => "title",
            AssistMode::Translate => "translate",
            AssistMode::Vibe => "vibe",
        }
    }
}

impl fmt::Display for AssistMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssistMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown assistant mode: {}", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Friendly,
    Professional,
    Humorous,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistRequest {
    pub content: String,
    pub mode: AssistMode,
    pub tone: Tone,
    pub include_tags: bool,
    /// Server defaults to Chinese when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
}

impl AssistRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mode: AssistMode::default(),
            tone: Tone::default(),
            include_tags: true,
            target_lang: None,
        }
    }

    pub fn with_mode(mut self, mode: AssistMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistStatus {
    #[default]
    Ok,
    Sensitive,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssistResponse {
    pub status: AssistStatus,
    pub summary: Option<String>,
    pub suggestions: Vec<String>,
    pub tags: Vec<String>,
    pub translated_content: Option<String>,
    pub vibe: Option<Value>,
}

impl RequestClient {
    pub async fn ask_assistant(&self, request: &AssistRequest) -> Result<AssistResponse, RequestError> {
        let body = serde_json::to_value(request).map_err(|e| RequestError::InvalidRequest(e.to_string()))?;
        self.issue_json(RequestDescriptor::post(ASSISTANT_PATH).with_json(body))
            .await
    }
}
