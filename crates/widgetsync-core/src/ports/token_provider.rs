//! 인증 토큰 포트.
//!
//! 구현: `widgetsync-network::auth::TokenManager`

use async_trait::async_trait;

use crate::error::CoreError;

/// 호출자 신원 토큰 제공자
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// 현재 유효한 API 토큰 반환
    async fn get_token(&self) -> Result<String, CoreError>;
}
