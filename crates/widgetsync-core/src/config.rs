//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 푸시 채널, 타임아웃, 로그 레벨 등 런타임 설정을 정의한다.
//! `config` crate를 통해 파일/환경변수에서 로드.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    pub server: ServerConfig,
    /// 로그 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API 서버 기본 URL (예: "https://streamlabs.example.com")
    pub base_url: String,
    /// 푸시 채널 URL (None이면 base_url에서 유도)
    #[serde(default)]
    pub push_url: Option<String>,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// 푸시 재연결 최대 지연 (초)
    #[serde(default = "default_push_max_retry_secs")]
    pub push_max_retry_secs: u64,
    /// API 토큰
    #[serde(default)]
    pub api_token: Option<String>,
}

/// 로그 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 기본 필터 (RUST_LOG가 우선)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// 푸시 채널 기본 URL (http → ws 변환)
    pub fn push_base_url(&self) -> String {
        self.push_url.clone().unwrap_or_else(|| {
            self.base_url
                .trim_end_matches('/')
                .replace("https://", "wss://")
                .replace("http://", "ws://")
        })
    }
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8000".to_string(),
                push_url: None,
                request_timeout_ms: default_request_timeout_ms(),
                push_max_retry_secs: default_push_max_retry_secs(),
                api_token: None,
            },
            logging: LoggingConfig::default(),
        }
    }

    /// 의미 검증 (serde가 다루지 못하는 값 범위)
    pub fn validate(&self) -> Result<(), CoreError> {
        let base = self.server.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(CoreError::Validation {
                field: "server.base_url".to_string(),
                message: format!("http(s) URL이 아님: {base}"),
            });
        }
        if self.server.request_timeout_ms == 0 {
            return Err(CoreError::Validation {
                field: "server.request_timeout_ms".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        if self.server.push_max_retry_secs == 0 {
            return Err(CoreError::Validation {
                field: "server.push_max_retry_secs".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        Ok(())
    }
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_push_max_retry_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
