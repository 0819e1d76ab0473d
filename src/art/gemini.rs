use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::art::resolver::{ArtError, ImageGenerator};
use crate::foundation::config::GeneratorConfig;

/// Gemini `generateContent` client requesting image output.
#[derive(Clone, Debug)]
pub struct GeminiImageGenerator {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiImageGenerator {
    /// Client for `model` at `api_base`.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Client built from configuration. `None` when no API key is configured.
    pub fn from_config(config: &GeneratorConfig) -> Option<Self> {
        let key = config.api_key.as_deref()?;
        Some(Self::new(&config.api_base, key, &config.model))
    }

    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait::async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ArtError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        };

        tracing::debug!(model = %self.model, "requesting card art");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ArtError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtError::Request(format!("image service returned {status}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ArtError::Request(format!("unreadable response body: {e}")))?;

        let data = first_inline_image(&parsed).ok_or(ArtError::EmptyResponse)?;
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| ArtError::Decode(format!("base64: {e}")))
    }
}

fn first_inline_image(response: &GenerateResponse) -> Option<&str> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|p| p.inline_data.as_ref())
        .map(|d| d.data.as_str())
        .filter(|d| !d.is_empty())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

#[cfg(test)]
#[path = "../../tests/unit/art/gemini.rs"]
mod tests;
