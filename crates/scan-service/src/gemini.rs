use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scan_types::GroundingSource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{ModelBackend, ModelCall, ModelReply};
use crate::config::ModelConfig;
use crate::error::{Result, ScanError};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or(ScanError::MissingApiKey)?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &ModelConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ScanError::MissingApiKey);
        }
        Ok(Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
            api_key,
            timeout: config.timeout_ms.map(Duration::from_millis),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        join_base_path(
            &self.base_url,
            &format!("/v1beta/models/{model}:generateContent"),
        )
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn generate(&self, call: ModelCall) -> Result<ModelReply> {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: &call.prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &call.schema,
                thinking_config: call
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            },
            tools: if call.grounding {
                vec![serde_json::json!({ "googleSearch": {} })]
            } else {
                Vec::new()
            },
        };

        let mut request = self
            .http
            .post(self.endpoint(&call.model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), model = %call.model, "model request rejected");
            return Err(ScanError::upstream(
                Some(status.as_u16()),
                truncate_body(&body),
            ));
        }
        tracing::debug!(status = status.as_u16(), model = %call.model, bytes = body.len(), "model responded");

        let envelope: GenerateContentResponse = serde_json::from_str(&body).map_err(|err| {
            ScanError::upstream(
                Some(status.as_u16()),
                format!("invalid response envelope: {err}"),
            )
        })?;
        Ok(reply_from_envelope(envelope))
    }
}

fn reply_from_envelope(envelope: GenerateContentResponse) -> ModelReply {
    let Some(candidate) = envelope.candidates.into_iter().next() else {
        return ModelReply::default();
    };
    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought)
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    let text = if text.trim().is_empty() {
        None
    } else {
        Some(text)
    };

    let mut sources: Vec<GroundingSource> = Vec::new();
    let chunks = candidate
        .grounding_metadata
        .map(|meta| meta.grounding_chunks)
        .unwrap_or_default();
    for web in chunks.into_iter().filter_map(|chunk| chunk.web) {
        let Some(uri) = web.uri.filter(|uri| !uri.trim().is_empty()) else {
            continue;
        };
        if sources.iter().any(|source| source.uri == uri) {
            continue;
        }
        sources.push(GroundingSource {
            uri,
            title: web.title.unwrap_or_default(),
        });
    }

    ModelReply { text, sources }
}

pub(crate) fn join_base_path(base: &str, path: &str) -> String {
    let normalized_base = base.trim().trim_end_matches('/');
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    format!("{normalized_base}{normalized_path}")
}

fn truncate_body(body: &str) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let flat = body.replace('\n', "\\n").replace('\r', "\\r");
    if flat.chars().count() <= MAX_ERROR_BODY_CHARS {
        return flat;
    }
    let mut out: String = flat.chars().take(MAX_ERROR_BODY_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        let config = ModelConfig {
            base_url: server.uri(),
            ..Default::default()
        };
        GeminiClient::with_api_key(&config, "test-key").expect("client")
    }

    fn call(grounding: bool) -> ModelCall {
        ModelCall {
            model: "gemini-test".to_string(),
            prompt: "analyze this".to_string(),
            schema: json!({ "type": "OBJECT" }),
            thinking_budget: None,
            grounding,
        }
    }

    #[test]
    fn join_base_path_normalizes_slashes() {
        assert_eq!(
            join_base_path("https://host/", "v1beta/models/m:generateContent"),
            "https://host/v1beta/models/m:generateContent"
        );
        assert_eq!(join_base_path("https://host", "/x"), "https://host/x");
    }

    #[test]
    fn rejects_blank_api_key() {
        let err = GeminiClient::with_api_key(&ModelConfig::default(), " ")
            .err()
            .expect("expected error");
        assert!(matches!(err, ScanError::MissingApiKey));
    }

    #[test]
    fn envelope_skips_thought_parts_and_dedups_sources() {
        let envelope: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "{\"a\":" },
                    { "text": "1}" }
                ]},
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://a.example", "title": "A" } },
                    { "web": { "uri": "https://a.example", "title": "A again" } },
                    { "web": { "title": "no uri" } },
                    { "retrievedContext": {} }
                ]}
            }]
        }))
        .expect("envelope");
        let reply = reply_from_envelope(envelope);
        assert_eq!(reply.text.as_deref(), Some("{\"a\":1}"));
        assert_eq!(reply.sources.len(), 1);
        assert_eq!(reply.sources[0].title, "A");
    }

    #[test]
    fn envelope_without_candidates_has_no_text() {
        let envelope: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .expect("envelope");
        let reply = reply_from_envelope(envelope);
        assert!(reply.text.is_none());
        assert!(reply.sources.is_empty());
    }

    #[tokio::test]
    async fn sends_schema_constrained_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "analyze this" }] }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "OBJECT" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .generate(call(false))
            .await
            .expect("reply");
        assert_eq!(reply.text.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn grounding_adds_search_tool() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "tools": [{ "googleSearch": {} }] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .generate(call(true))
            .await
            .expect("reply");
    }

    #[tokio::test]
    async fn http_errors_become_upstream_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string("{\"error\":\"API key not valid\"}"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(call(false))
            .await
            .err()
            .expect("expected error");
        match err {
            ScanError::Upstream { status, message } => {
                assert_eq!(status, Some(403));
                assert!(message.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_envelope_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(call(false))
            .await
            .err()
            .expect("expected error");
        assert!(matches!(err, ScanError::Upstream { status: Some(200), .. }));
    }
}
