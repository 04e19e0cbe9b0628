//! 푸시 이벤트 모델.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 서버가 비동기로 보내는 알림
///
/// 타입 문자열로 구분되며 페이로드 형태는 타입마다 다르다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub message: Value,
}

impl PushEvent {
    pub fn new(event_type: &str, message: Value) -> Self {
        Self {
            event_type: event_type.to_string(),
            message,
        }
    }
}
