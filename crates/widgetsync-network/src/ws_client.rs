//! WebSocket 푸시 피드.
//!
//! `PushFeed` 포트 구현. `tokio-tungstenite` 기반 수신 전용 채널,
//! 자동 재연결 + exponential backoff.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use widgetsync_core::error::CoreError;
use widgetsync_core::models::push::PushEvent;
use widgetsync_core::ports::push_feed::PushFeed;
use widgetsync_core::ports::token_provider::TokenProvider;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// 기본 푸시 구독 경로
pub const DEFAULT_PUSH_PATH: &str = "/api/v5/slobs/socket";

/// 수신 루프 종료 사유
#[derive(Debug, PartialEq, Eq)]
enum ReadOutcome {
    /// 서버 종료 또는 스트림 에러: 재연결 대상
    Disconnected,
    /// 수신측 채널이 닫힘: 피드 종료
    ReceiverClosed,
}

/// WebSocket 푸시 피드: `PushFeed` 포트 구현
pub struct WsPushFeed {
    ws_base_url: String,
    path: String,
    token_provider: Arc<dyn TokenProvider>,
    max_retry_secs: u64,
}

impl WsPushFeed {
    /// 새 푸시 피드 생성
    ///
    /// `ws_base_url`이 http(s)로 시작하면 ws(s)로 변환한다.
    pub fn new(
        ws_base_url: &str,
        token_provider: Arc<dyn TokenProvider>,
        max_retry_secs: u64,
    ) -> Self {
        let ws_base_url = ws_base_url
            .trim_end_matches('/')
            .replace("https://", "wss://")
            .replace("http://", "ws://");
        Self {
            ws_base_url,
            path: DEFAULT_PUSH_PATH.to_string(),
            token_provider,
            max_retry_secs: max_retry_secs.max(1),
        }
    }

    /// 구독 경로 변경
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    fn build_url(&self, token: &str) -> String {
        format!("{}{}?token={}", self.ws_base_url, self.path, token)
    }

    /// 텍스트 프레임을 PushEvent로 파싱
    fn parse_event(data: &str) -> Option<PushEvent> {
        match serde_json::from_str::<PushEvent>(data) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!("푸시 프레임 파싱 실패: {e}");
                None
            }
        }
    }

    /// 수신 루프
    ///
    /// 유휴 상태에서도 수신측이 닫히면 즉시 빠져나온다.
    async fn read_loop(stream: &mut WsStream, tx: &mpsc::Sender<PushEvent>) -> ReadOutcome {
        loop {
            let msg = tokio::select! {
                msg = stream.next() => msg,
                _ = tx.closed() => return ReadOutcome::ReceiverClosed,
            };
            let Some(msg) = msg else {
                break;
            };
            match msg {
                Ok(Message::Text(text)) => {
                    let Some(event) = Self::parse_event(text.as_str()) else {
                        continue;
                    };
                    if tx.send(event).await.is_err() {
                        return ReadOutcome::ReceiverClosed;
                    }
                }
                Ok(Message::Close(_)) => {
                    info!("푸시 채널 종료 프레임 수신");
                    return ReadOutcome::Disconnected;
                }
                Ok(_) => {} // Binary/Ping/Pong 무시
                Err(e) => {
                    warn!("푸시 채널 수신 에러: {e}");
                    return ReadOutcome::Disconnected;
                }
            }
        }
        debug!("푸시 수신 루프 종료");
        ReadOutcome::Disconnected
    }
}

#[async_trait]
impl PushFeed for WsPushFeed {
    async fn connect(&self, tx: mpsc::Sender<PushEvent>) -> Result<(), CoreError> {
        let mut retry_delay = 1u64;

        loop {
            let token = self.token_provider.get_token().await?;
            let url = self.build_url(&token);
            let display_url = format!("{}{}", self.ws_base_url, self.path);

            match tokio_tungstenite::connect_async(url.as_str()).await {
                Ok((mut stream, _)) => {
                    info!("푸시 채널 연결: {display_url}");
                    retry_delay = 1;
                    if Self::read_loop(&mut stream, &tx).await == ReadOutcome::ReceiverClosed {
                        info!("푸시 이벤트 채널 닫힘, 연결 종료");
                        let _ = stream.close(None).await;
                        return Ok(());
                    }
                }
                Err(e) => {
                    warn!("푸시 채널 연결 실패: {display_url}: {e}");
                }
            }

            if tx.is_closed() {
                return Ok(());
            }

            warn!("푸시 채널 재연결 대기: {retry_delay}초");
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(retry_delay)) => {}
                _ = tx.closed() => {
                    info!("푸시 이벤트 채널 닫힘, 재연결 중단");
                    return Ok(());
                }
            }
            retry_delay = (retry_delay * 2).min(self.max_retry_secs);
        }
    }
}
