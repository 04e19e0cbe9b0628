//! 테스트용 포트 대역.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use widgetsync_core::error::CoreError;
use widgetsync_core::models::push::PushEvent;
use widgetsync_core::models::resource::RequestMethod;
use widgetsync_core::ports::push_feed::PushFeed;
use widgetsync_core::ports::resource_client::ResourceClient;

/// 기록된 요청
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: RequestMethod,
    pub url: String,
    pub body: Option<Value>,
}

/// 응답을 순서대로 돌려주는 가짜 클라이언트
#[derive(Default)]
pub struct ScriptedClient {
    gets: Mutex<VecDeque<Result<Value, CoreError>>>,
    sends: Mutex<VecDeque<Result<(), CoreError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_get(&self, response: Result<Value, CoreError>) {
        self.gets.lock().push_back(response);
    }

    pub fn push_send(&self, response: Result<(), CoreError>) {
        self.sends.lock().push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn get_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == RequestMethod::Get)
            .count()
    }
}

#[async_trait]
impl ResourceClient for ScriptedClient {
    async fn get_json(&self, url: &str) -> Result<Value, CoreError> {
        self.calls.lock().push(RecordedCall {
            method: RequestMethod::Get,
            url: url.to_string(),
            body: None,
        });
        self.gets
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(CoreError::Transport(format!("스크립트 없음: GET {url}"))))
    }

    async fn send(
        &self,
        method: RequestMethod,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(), CoreError> {
        self.calls.lock().push(RecordedCall {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        self.sends.lock().pop_front().unwrap_or(Ok(()))
    }
}

/// 준비된 이벤트를 보낸 뒤 수신측이 닫힐 때까지 대기하는 피드
pub struct ScriptedPushFeed {
    events: Vec<PushEvent>,
    finished: Arc<Notify>,
}

impl ScriptedPushFeed {
    pub fn new(events: Vec<PushEvent>) -> Self {
        Self {
            events,
            finished: Arc::new(Notify::new()),
        }
    }

    /// connect가 반환될 때 알림
    pub fn finished(&self) -> Arc<Notify> {
        self.finished.clone()
    }
}

#[async_trait]
impl PushFeed for ScriptedPushFeed {
    async fn connect(&self, tx: mpsc::Sender<PushEvent>) -> Result<(), CoreError> {
        for event in &self.events {
            if tx.send(event.clone()).await.is_err() {
                self.finished.notify_one();
                return Ok(());
            }
        }
        tx.closed().await;
        self.finished.notify_one();
        Ok(())
    }
}
