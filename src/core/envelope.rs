use serde_json::{json, Value};
use std::future::Future;

/// `{success, data|error}` 回應慣例的結構化解讀
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{"success": true, "data": ...}`
    Success { data: Value },
    /// `{"success": false, ...}`, kept whole
    Failure(Value),
    /// Any other shape
    Raw(Value),
}

impl Envelope {
    pub fn decode(value: Value) -> Self {
        let success = value.get("success").and_then(Value::as_bool);

        match (success, value) {
            (Some(true), Value::Object(mut map)) if map.contains_key("data") => {
                let data = map.remove("data").unwrap_or(Value::Null);
                Envelope::Success { data }
            }
            (Some(false), value) => Envelope::Failure(value),
            (_, value) => Envelope::Raw(value),
        }
    }

    /// The failure shape returned when a request could not complete.
    pub fn failure(error: impl std::fmt::Display) -> Value {
        json!({ "success": false, "error": error.to_string() })
    }

    pub fn into_data(self) -> Value {
        match self {
            Envelope::Success { data } => data,
            Envelope::Failure(value) | Envelope::Raw(value) => value,
        }
    }
}

/// 成功信封回傳 `data`，其他形狀原樣回傳
pub fn unwrap(response: Value) -> Value {
    if response.is_null() {
        return Value::Null;
    }
    Envelope::decode(response).into_data()
}

pub async fn apidata<F>(response: F) -> Value
where
    F: Future<Output = Value>,
{
    unwrap(response.await)
}
