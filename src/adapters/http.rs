use crate::domain::model::{RequestOptions, ResponseBody};
use crate::domain::ports::Transport;
use crate::utils::error::{ApiError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;

/// 只有在 `with_credentials` 為 true 時才附上憑證標頭
fn apply_credentials(
    mut request: RequestBuilder,
    credentials: &HashMap<String, String>,
    include: bool,
) -> RequestBuilder {
    if include {
        for (name, value) in credentials {
            request = request.header(name, value);
        }
    }
    request
}

/// Fetch-style backend: any completed response counts, the body is read as
/// text and decoded as JSON when possible.
#[derive(Debug, Clone, Default)]
pub struct FetchTransport {
    client: Client,
    credentials: HashMap<String, String>,
}

impl FetchTransport {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            credentials: HashMap::new(),
        }
    }

    pub fn credential_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.credentials.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl Transport for FetchTransport {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<ResponseBody> {
        let mut request = self.client.request(options.method.into(), url);

        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        request = apply_credentials(request, &self.credentials, options.with_credentials);

        if let Some(body) = options.json_body() {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_string(body)?);
        }

        tracing::debug!("📡 fetch: {} {}", options.method, url);
        let response = request.send().await?;
        let status = response.status();

        // 狀態碼不影響結果，只要傳輸本身成功就讀取 body
        let text = response.text().await?;
        let body = ResponseBody::decode(text);
        tracing::debug!(
            "📡 fetch: {} {} -> {} ({})",
            options.method,
            url,
            status,
            if body.is_json() { "json" } else { "text" }
        );

        Ok(body)
    }

    fn name(&self) -> &'static str {
        "fetch"
    }
}

/// Client-library style backend, modeled on a preconfigured HTTP client
/// instance: its own default headers and non-2xx statuses rejected. The
/// deadline is owned by `ApiClient::request`.
///
/// Per-request `headers` are not forwarded; configure them with
/// [`HttpClientTransport::default_header`] instead.
#[derive(Debug, Clone, Default)]
pub struct HttpClientTransport {
    client: Client,
    default_headers: HashMap<String, String>,
    credentials: HashMap<String, String>,
}

impl HttpClientTransport {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            default_headers: HashMap::new(),
            credentials: HashMap::new(),
        }
    }

    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn credential_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.credentials.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl Transport for HttpClientTransport {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<ResponseBody> {
        let mut request = self.client.request(options.method.into(), url);

        for (name, value) in &self.default_headers {
            request = request.header(name, value);
        }
        request = apply_credentials(request, &self.credentials, options.with_credentials);

        if let Some(body) = options.json_body() {
            request = request.json(body);
        }

        tracing::debug!("📡 http_client: {} {}", options.method, url);
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(ResponseBody::decode(text))
    }

    fn name(&self) -> &'static str {
        "http_client"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Method;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_decodes_json_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"success": true, "data": {"name": "Alice"}}));
        });

        let transport = FetchTransport::new();
        let body = transport
            .send(&server.url("/user"), &RequestOptions::default())
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(
            body,
            ResponseBody::Json(json!({"success": true, "data": {"name": "Alice"}}))
        );
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/text");
            then.status(200).body("plain text");
        });

        let body = FetchTransport::new()
            .send(&server.url("/text"), &RequestOptions::default())
            .await
            .unwrap();

        assert_eq!(body, ResponseBody::Text("plain text".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_does_not_reject_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).json_body(json!({"success": false, "error": "not found"}));
        });

        let body = FetchTransport::new()
            .send(&server.url("/missing"), &RequestOptions::default())
            .await
            .unwrap();

        assert_eq!(
            body.into_value(),
            json!({"success": false, "error": "not found"})
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_json_body_and_headers() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/users")
                .header("Content-Type", "application/json")
                .header("X-Trace", "abc")
                .json_body(json!({"name": "John"}));
            then.status(201).json_body(json!({"id": 7}));
        });

        let options = RequestOptions::new()
            .method(Method::Post)
            .body(json!({"name": "John"}))
            .header("X-Trace", "abc");
        let body = FetchTransport::new()
            .send(&server.url("/users"), &options)
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(body.into_value(), json!({"id": 7}));
    }

    #[tokio::test]
    async fn test_credentials_only_sent_when_included() {
        let server = MockServer::start();
        let with_token = server.mock(|when, then| {
            when.method(GET).path("/me").header("Authorization", "Bearer t0k3n");
            then.status(200).json_body(json!({"auth": true}));
        });

        let transport = FetchTransport::new().credential_header("Authorization", "Bearer t0k3n");

        let included = transport
            .send(&server.url("/me"), &RequestOptions::default())
            .await
            .unwrap();
        with_token.assert_hits(1);
        assert_eq!(included.into_value(), json!({"auth": true}));

        // 沒有帶憑證時不會命中要求 Authorization 的 mock
        transport
            .send(
                &server.url("/me"),
                &RequestOptions::new().with_credentials(false),
            )
            .await
            .unwrap();
        with_token.assert_hits(1);
    }

    #[tokio::test]
    async fn test_http_client_rejects_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(500).body("boom");
        });

        let err = HttpClientTransport::new()
            .send(&server.url("/broken"), &RequestOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_http_client_uses_default_headers() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/items/1")
                .header("X-Api-Key", "secret")
                .json_body(json!({"done": true}));
            then.status(200).json_body(json!({"success": true, "data": {"done": true}}));
        });

        let transport = HttpClientTransport::new().default_header("X-Api-Key", "secret");
        let options = RequestOptions::new()
            .method(Method::Put)
            .body(json!({"done": true}));
        let body = transport
            .send(&server.url("/items/1"), &options)
            .await
            .unwrap();

        api_mock.assert();
        assert!(body.is_json());
    }
}
