//! widgetsync 핵심 에러 타입.
//!
//! 어댑터 crate와 동기화 crate는 모두 `CoreError`를 그대로 반환한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 전송, HTTP 상태, 응답 파싱, 설정, 유효성 검증 등 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 전송 계층 실패 (연결 불가, 타임아웃 등)
    #[error("전송 에러: {0}")]
    Transport(String),

    /// 2xx가 아닌 HTTP 응답
    #[error("HTTP 요청 실패 ({status}): {body}")]
    HttpStatus {
        /// 응답 상태 코드
        status: u16,
        /// 응답 본문
        body: String,
    },

    /// 응답 본문이 기대한 문서 형태가 아님
    #[error("잘못된 응답 형식: {0}")]
    MalformedResponse(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 인증 실패 (토큰 없음 등)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "Tab", "ResourceKind")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 서버가 응답한 HTTP 상태 코드 (HttpStatus 에러일 때만)
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
