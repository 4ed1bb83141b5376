//! # OpenAI 클라이언트
//!
//! Responses API(`POST {base}/responses`)를 호출합니다.
//! 응답 형식은 strict `json_schema`로 고정하고,
//! 결과에서 `output_text` 조각만 이어 붙여 돌려줍니다.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("AI generation is not configured (OPENAI_API_KEY is unset)")]
    NotConfigured,

    #[error("invalid OpenAI API key")]
    InvalidApiKey,

    #[error("OpenAI request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI returned {status}: {message}")]
    Api { status: u16, message: String },

    /// 모델 출력이 JSON이 아님. 원문은 진단용으로 응답에 포함됩니다.
    #[error("AI returned invalid JSON")]
    InvalidJson { raw: String },
}

#[derive(Debug, Clone)]
pub struct OpenAi {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl OpenAi {
    pub fn new(
        base_url: impl Into<String>,
        api_key: &str,
        model: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ModelError::InvalidApiKey)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// system + user 프롬프트를 strict `json_schema` 형식으로 보내고,
    /// 응답의 `output_text`를 이어 붙인 문자열을 돌려줍니다.
    pub async fn generate_json(
        &self,
        instructions: &str,
        prompt: &str,
        schema_name: &str,
        schema: Value,
    ) -> Result<String, ModelError> {
        let body = json!({
            "model": self.model,
            "input": [
                { "role": "system", "content": instructions },
                { "role": "user", "content": prompt },
            ],
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": schema_name,
                    "schema": schema,
                    "strict": true,
                }
            }
        });

        tracing::debug!(model = %self.model, schema_name, "requesting structured generation");

        let response = self
            .http
            .post(format!("{}/responses", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(text);
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ResponseBody = response.json().await?;
        Ok(output_text(&body))
    }
}

fn output_text(body: &ResponseBody) -> String {
    body.output
        .iter()
        .flat_map(|item| item.content.iter())
        .filter(|part| part.kind == "output_text")
        .filter_map(|part| part.text.as_deref())
        .collect()
}
