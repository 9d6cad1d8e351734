use crate::adapters::dom::Document;
use crate::adapters::http::{FetchTransport, HttpClientTransport};
use crate::core::binder;
use crate::core::envelope::{self, Envelope};
use crate::domain::model::RequestOptions;
use crate::domain::ports::Transport;
use crate::utils::error::{ApiError, Result};
use scraper::Selector;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

/// 請求、拆信封、綁定 DOM 的組合入口
pub struct ApiClient {
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    pub fn fetch() -> Self {
        Self::new(FetchTransport::new())
    }

    pub fn http_client() -> Self {
        Self::new(HttpClientTransport::new())
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Performs one request, racing the transport against `options.timeout_ms`.
    ///
    /// Whichever side loses the race is dropped, so no timer outlives the call.
    /// A timeout raised by the transport itself is reported the same way.
    pub async fn request(&self, url: &str, options: &RequestOptions) -> Result<Value> {
        let send = self.transport.send(url, options);

        match tokio::time::timeout(options.timeout(), send).await {
            Ok(Ok(body)) => Ok(body.into_value()),
            Ok(Err(e)) if e.is_timeout() => Err(ApiError::Timeout {
                timeout_ms: options.timeout_ms,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ApiError::Timeout {
                timeout_ms: options.timeout_ms,
            }),
        }
    }

    /// 永遠不會失敗：錯誤轉成 `{"success": false, "error": ...}`
    pub async fn callapi(&self, url: &str, options: &RequestOptions) -> Value {
        match self.request(url, options).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("❌ callapi error: {} ({} {})", e, options.method, url);
                Envelope::failure(e)
            }
        }
    }

    pub async fn apidata<F>(&self, response: F) -> Value
    where
        F: Future<Output = Value>,
    {
        envelope::apidata(response).await
    }

    pub fn bind_data(&self, data: &Value, document: &mut Document, root: Option<&Selector>) {
        binder::bind_data(data, document, root);
    }

    /// Fetches `url`, unwraps the envelope and binds the result under `root`
    /// when it is a JSON object. The unwrapped value is returned either way.
    pub async fn auto_bind(
        &self,
        url: &str,
        document: &mut Document,
        root: Option<&Selector>,
        options: &RequestOptions,
    ) -> Value {
        let data = self.apidata(self.callapi(url, options)).await;

        if data.is_object() {
            binder::bind_data(&data, document, root);
        } else {
            tracing::debug!("auto_bind: response data is not an object, skipping bind");
        }

        data
    }

    /// Typed `apidata(callapi(..))`. Failure envelopes become errors.
    pub async fn data_as<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<T> {
        let response = self.request(url, options).await?;

        match Envelope::decode(response) {
            Envelope::Failure(value) => Err(ApiError::UnexpectedShape {
                message: format!("server reported failure: {}", value),
            }),
            envelope => Ok(serde_json::from_value(envelope.into_data())?),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::fetch()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("transport", &self.transport.name())
            .finish()
    }
}
