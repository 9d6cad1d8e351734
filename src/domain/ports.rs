use crate::domain::model::{RequestOptions, ResponseBody};
use crate::utils::error::Result;
use async_trait::async_trait;

/// HTTP 傳輸後端，建構 `ApiClient` 時明確指定
///
/// Implementations perform exactly one request and decode its body. Timeouts
/// are enforced by the caller, so a transport may take as long as it likes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<ResponseBody>;

    fn name(&self) -> &'static str;
}

