//! 원격 리소스 클라이언트 포트.
//!
//! 구현: `widgetsync-network` crate (reqwest)

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreError;
use crate::models::resource::RequestMethod;

/// 인증된 HTTP 리소스 접근
///
/// URL은 서버 상대 경로이거나 절대 URL이다. 재시도는 하지 않는다.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// GET 요청 후 JSON 본문 반환
    ///
    /// 2xx가 아니면 `CoreError::HttpStatus`, 본문이 JSON이 아니면
    /// `CoreError::MalformedResponse`.
    async fn get_json(&self, url: &str) -> Result<Value, CoreError>;

    /// 지정 메서드로 요청 전송 (응답 본문은 버린다)
    async fn send(
        &self,
        method: RequestMethod,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(), CoreError>;
}
