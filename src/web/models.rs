use serde::Serialize;

/// 成功レスポンス `{ data, message? }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, message: None }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self { data, message: Some(message.into()) }
    }
}

/// エラーレスポンス `{ message }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
