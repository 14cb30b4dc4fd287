//! Vision classifier contract and the Generative Language HTTP adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::model::Category;

const GENERATIVE_LANGUAGE_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// One photo + category pair to classify
#[derive(Debug, Clone)]
pub struct ClassifierRequest {
    /// Base64 payload without the data URL header
    pub image_base64: String,
    pub mime_type: String,
    pub category: Category,
    pub prompt: String,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier is not configured: {0}")]
    NotConfigured(String),

    #[error("classifier request failed: {0}")]
    Transport(String),

    #[error("classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("classifier returned no text")]
    EmptyResponse,
}

/// External model that looks at a photo and answers in free text
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, request: &ClassifierRequest) -> Result<String, ClassifierError>;
}

/// `generateContent` client for Gemini vision models
pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClassifier {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GENERATIVE_LANGUAGE_BASE.to_string(),
        }
    }

    /// Point the client at a different endpoint root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

/// reqwest errors print the request URL; keep it out of logs
fn transport(e: reqwest::Error) -> ClassifierError {
    ClassifierError::Transport(e.without_url().to_string())
}

/// Concatenate the text parts of the first candidate
fn response_text(response: GenerateResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl Classifier for GeminiClassifier {
    #[instrument(skip_all, fields(model = %self.model, category = %request.category))]
    async fn classify(&self, request: &ClassifierRequest) -> Result<String, ClassifierError> {
        if self.api_key.is_empty() {
            return Err(ClassifierError::NotConfigured("missing API key".into()));
        }

        let body = GenerateRequest {
            contents: [Content {
                parts: [
                    Part::Text {
                        text: &request.prompt,
                    },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: &request.mime_type,
                            data: &request.image_base64,
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(transport)?;

        let text = response_text(parsed).ok_or(ClassifierError::EmptyResponse)?;
        debug!(chars = text.len(), "classifier answered");
        Ok(text)
    }
}
