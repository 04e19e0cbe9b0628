//! API 토큰 관리.
//!
//! 호출자 신원 토큰을 보관하고 `TokenProvider` 포트로 노출한다.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use widgetsync_core::error::CoreError;
use widgetsync_core::ports::token_provider::TokenProvider;

/// API 토큰 매니저: 토큰 설정/해제/조회
#[derive(Clone, Default)]
pub struct TokenManager {
    state: Arc<RwLock<Option<String>>>,
}

impl TokenManager {
    /// 토큰 없는 매니저 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 토큰이 설정된 매니저 생성
    pub fn with_token(token: &str) -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(token.to_string()))),
        }
    }

    /// 토큰 설정 (빈 문자열은 거부)
    pub async fn set_token(&self, token: &str) -> Result<(), CoreError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CoreError::Auth("빈 토큰".to_string()));
        }
        *self.state.write().await = Some(token.to_string());
        debug!("API 토큰 설정됨");
        Ok(())
    }

    /// 토큰 해제
    pub async fn clear(&self) {
        *self.state.write().await = None;
        debug!("API 토큰 해제됨");
    }

    /// 현재 인증 상태 확인
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_some()
    }
}

#[async_trait]
impl TokenProvider for TokenManager {
    async fn get_token(&self) -> Result<String, CoreError> {
        self.state
            .read()
            .await
            .clone()
            .ok_or_else(|| CoreError::Auth("인증되지 않음".to_string()))
    }
}
