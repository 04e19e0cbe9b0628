//! 푸시 알림 구독 포트.
//!
//! 구현: `widgetsync-network::ws_client::WsPushFeed`

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::CoreError;
use crate::models::push::PushEvent;

/// 푸시 이벤트 스트림
#[async_trait]
pub trait PushFeed: Send + Sync {
    /// 피드에 연결하여 수신 이벤트를 `tx`로 전달
    ///
    /// 수신측이 닫힐 때까지 반환하지 않는다. 끊기면 구현체가 재연결한다.
    async fn connect(&self, tx: mpsc::Sender<PushEvent>) -> Result<(), CoreError>;
}
