//! The remote question-answering endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use url::Url;

use crate::config::WidgetConfig;
use crate::error::{ConfigError, RequestError, Result};
use crate::message::Source;

/// Request body of the ask endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskRequest {
    pub question: String,
    /// Advisory timeout for the backend. The client never aborts on it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_s: Option<u32>,
}

impl AskRequest {
    pub fn new(question: impl Into<String>, timeout_s: Option<u32>) -> Self {
        Self {
            question: question.into(),
            timeout_s,
        }
    }
}

/// Successful response body of the ask endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<Source>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Source>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Source>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Something that answers questions.
#[async_trait(?Send)]
pub trait ChatBackend {
    async fn ask(&self, request: &AskRequest) -> std::result::Result<AskResponse, RequestError>;
}

/// JSON-over-HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpBackend {
    /// Backend posting to `endpoint` resolved against `base_url`.
    pub fn new(base_url: &str, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(endpoint))
            .map_err(ConfigError::from)?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &WidgetConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait(?Send)]
impl ChatBackend for HttpBackend {
    async fn ask(&self, request: &AskRequest) -> std::result::Result<AskResponse, RequestError> {
        debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status(status.as_u16()));
        }

        Ok(response.json::<AskResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_request_omits_missing_timeout() {
        let body = serde_json::to_value(AskRequest::new("hi", None)).unwrap();
        assert_eq!(body, json!({ "question": "hi" }));
        let body = serde_json::to_value(AskRequest::new("hi", Some(90))).unwrap();
        assert_eq!(body, json!({ "question": "hi", "timeout_s": 90 }));
    }

    #[test]
    fn test_response_sources_optional() {
        let missing: AskResponse = serde_json::from_str(r#"{"answer":"4"}"#).unwrap();
        let null: AskResponse = serde_json::from_str(r#"{"answer":"4","sources":null}"#).unwrap();
        assert!(missing.sources.is_empty());
        assert!(null.sources.is_empty());

        let partial: AskResponse =
            serde_json::from_str(r#"{"answer":"x","sources":[{"url":"https://a.example"},{}]}"#).unwrap();
        assert_eq!(partial.sources[0].url(), Some("https://a.example"));
        assert_eq!(partial.sources[1], Source::default());
    }

    #[test]
    fn test_endpoint_joined_to_base() {
        let backend = HttpBackend::new("http://127.0.0.1:8000", "/chat/ask").unwrap();
        assert_eq!(backend.endpoint().as_str(), "http://127.0.0.1:8000/chat/ask");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpBackend::new("not a url", "/chat/ask").is_err());
    }

    #[tokio::test]
    async fn test_ask_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/ask"))
            .and(body_json(json!({ "question": "2+2?", "timeout_s": 90 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "4",
                "sources": [{ "title": "Arithmetic", "url": "https://a.example" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri(), "/chat/ask").unwrap();
        let response = backend.ask(&AskRequest::new("2+2?", Some(90))).await.unwrap();

        assert_eq!(response.answer, "4");
        assert_eq!(
            response.sources,
            vec![Source::new(Some("Arithmetic"), Some("https://a.example"))]
        );
    }

    #[tokio::test]
    async fn test_ask_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("{\"detail\":\"boom\"}"))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri(), "/chat/ask").unwrap();
        let err = backend.ask(&AskRequest::new("q", None)).await.unwrap_err();
        assert_eq!(err, RequestError::Status(500));
    }

    #[tokio::test]
    async fn test_ask_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri(), "/chat/ask").unwrap();
        let err = backend.ask(&AskRequest::new("q", None)).await.unwrap_err();
        assert!(matches!(err, RequestError::Decode(_)));
    }

    #[tokio::test]
    async fn test_ask_unreachable() {
        let backend = HttpBackend::new("http://127.0.0.1:1", "/chat/ask").unwrap();
        let err = backend.ask(&AskRequest::new("q", None)).await.unwrap_err();
        assert!(matches!(err, RequestError::Transport(_)));
    }
}
