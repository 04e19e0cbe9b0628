//! 설정 문서 캐시.
//!
//! 단일 setter가 원자적으로 교체한 뒤 변경 알림을 무조건 발행한다.
//! 외부에는 `Arc` 스냅샷만 노출되므로 캐시를 직접 수정할 수 없다.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;
use widgetsync_core::models::document::ConfigurationDocument;

/// 변경 알림 채널 기본 용량
const DEFAULT_CAPACITY: usize = 16;

/// 문서 캐시: Absent(None) / Present(Some) 두 상태
pub struct DocumentStore {
    current: RwLock<Option<Arc<ConfigurationDocument>>>,
    tx: broadcast::Sender<Arc<ConfigurationDocument>>,
}

impl DocumentStore {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            current: RwLock::new(None),
            tx,
        }
    }

    /// 현재 스냅샷
    pub fn get(&self) -> Option<Arc<ConfigurationDocument>> {
        self.current.read().clone()
    }

    pub fn is_present(&self) -> bool {
        self.current.read().is_some()
    }

    /// 캐시 교체 후 알림 발행
    pub fn set(&self, document: ConfigurationDocument) -> Arc<ConfigurationDocument> {
        let snapshot = Arc::new(document);
        *self.current.write() = Some(snapshot.clone());
        // 구독자가 없으면 send가 실패하지만 정상 상황
        let receivers = self.tx.send(snapshot.clone()).unwrap_or(0);
        debug!("설정 문서 갱신: kind={}, 구독자={receivers}", snapshot.kind);
        snapshot
    }

    /// 캐시가 있을 때만 변환 결과로 교체 (읽기-변환-쓰기 사이에 await 없음)
    pub fn update_present<F>(&self, f: F) -> Option<Arc<ConfigurationDocument>>
    where
        F: FnOnce(&ConfigurationDocument) -> ConfigurationDocument,
    {
        let snapshot = {
            let mut guard = self.current.write();
            let next = Arc::new(f(guard.as_deref()?));
            *guard = Some(next.clone());
            next
        };
        let receivers = self.tx.send(snapshot.clone()).unwrap_or(0);
        debug!("설정 문서 병합 갱신: kind={}, 구독자={receivers}", snapshot.kind);
        Some(snapshot)
    }

    /// 변경 알림 구독
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ConfigurationDocument>> {
        self.tx.subscribe()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
