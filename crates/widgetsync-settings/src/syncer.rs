//! 원격 설정 동기화기.
//!
//! 원격 설정 문서의 로컬 사본을 하나 유지하며
//! pull(HTTP fetch/save/reset)과 push(알림) 두 채널 모두와 일관되게 맞춘다.
//!
//! 캐시 상태는 Absent/Present 두 가지이며 Present → Absent 전이는 없다.
//! 실패한 요청은 호출자에게 그대로 전달되고 캐시는 건드리지 않는다.

use serde_json::{json, Map, Value};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use widgetsync_core::error::CoreError;
use widgetsync_core::models::document::ConfigurationDocument;
use widgetsync_core::models::push::PushEvent;
use widgetsync_core::models::resource::{RequestMethod, ResourceKind, ResourceTab};
use widgetsync_core::ports::push_feed::PushFeed;
use widgetsync_core::ports::resource_client::ResourceClient;

use crate::normalizer::Normalizer;
use crate::resources::ResourceDefinition;
use crate::store::DocumentStore;

/// 푸시 이벤트 채널 용량
const PUSH_CHANNEL_CAPACITY: usize = 64;

/// 원격 설정 동기화기
pub struct RemoteSettingsSyncer {
    definition: ResourceDefinition,
    client: Arc<dyn ResourceClient>,
    store: DocumentStore,
    /// drop 시 닫혀 푸시 처리 태스크를 깨운다 (값은 보내지 않음)
    shutdown: watch::Sender<()>,
}

impl RemoteSettingsSyncer {
    /// 정의와 클라이언트로 생성
    pub fn new(definition: ResourceDefinition, client: Arc<dyn ResourceClient>) -> Self {
        let (shutdown, _) = watch::channel(());
        Self {
            definition,
            client,
            store: DocumentStore::default(),
            shutdown,
        }
    }

    /// 카탈로그 정의로 생성
    pub fn for_kind(kind: ResourceKind, client: Arc<dyn ResourceClient>) -> Self {
        Self::new(ResourceDefinition::for_kind(kind), client)
    }

    /// 정규화 전략 교체
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.definition.normalizer = normalizer;
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.definition.kind
    }

    pub fn definition(&self) -> &ResourceDefinition {
        &self.definition
    }

    /// 캐시된 문서 반환, 없으면 서버에서 가져온다
    ///
    /// 첫 fetch가 끝나기 전의 동시 호출은 중복 제거되지 않는다.
    pub async fn fetch_data(&self) -> Result<Arc<ConfigurationDocument>, CoreError> {
        if let Some(cached) = self.store.get() {
            return Ok(cached);
        }
        self.refresh().await
    }

    /// 캐시를 무시하고 서버의 정본 문서로 교체
    pub async fn refresh(&self) -> Result<Arc<ConfigurationDocument>, CoreError> {
        let raw = self.client.get_json(&self.definition.data_url).await?;
        let document = self.normalize_fetched(raw)?;
        Ok(self.store.set(document))
    }

    /// 일반 정규화(종류 기록, 레거시 `custom` 승격) 후 리소스별 정규화
    fn normalize_fetched(&self, raw: Value) -> Result<ConfigurationDocument, CoreError> {
        let Value::Object(mut object) = raw else {
            return Err(CoreError::MalformedResponse(format!(
                "{}: JSON 객체가 아님",
                self.definition.data_url
            )));
        };

        object.insert("type".to_string(), json!(self.kind()));
        if let Some(custom) = object.remove("custom") {
            object.insert("custom_defaults".to_string(), custom);
        }

        let normalized = self.definition.normalizer.after_fetch(Value::Object(object));
        let mut document: ConfigurationDocument = serde_json::from_value(normalized)
            .map_err(|e| {
                CoreError::MalformedResponse(format!("{}: {e}", self.definition.data_url))
            })?;
        document.kind = self.kind();
        Ok(document)
    }

    /// 문서 저장 후 정본 재조회
    ///
    /// 대상 URL은 탭의 save_url, 탭이 없으면 기본 데이터 URL.
    /// 응답 본문은 버리고 항상 다시 GET 하여 캐시를 채운다.
    pub async fn save_data(
        &self,
        document: &ConfigurationDocument,
        tab_name: Option<&str>,
        method: RequestMethod,
    ) -> Result<Arc<ConfigurationDocument>, CoreError> {
        let url = tab_name
            .and_then(|name| self.get_tab(name))
            .map(|tab| tab.save_url)
            .unwrap_or_else(|| self.definition.data_url.clone());

        let body = self
            .definition
            .normalizer
            .before_send(serde_json::to_value(document)?);

        info!("설정 저장: kind={}, {method} {url}", self.kind());
        self.client.send(method, &url, Some(&body)).await?;
        self.refresh().await
    }

    /// `settings`만 설정 전용 엔드포인트로 POST (캐시는 갱신하지 않음)
    pub async fn save_settings_only(&self, settings: &Map<String, Value>) -> Result<(), CoreError> {
        let wrapped = self
            .definition
            .normalizer
            .before_send(json!({ "settings": settings }));
        let body = wrapped
            .get("settings")
            .cloned()
            .unwrap_or_else(|| Value::Object(settings.clone()));

        let url = &self.definition.event_binding.save_url;
        info!("설정 전용 저장: kind={}, POST {url}", self.kind());
        self.client.send(RequestMethod::Post, url, Some(&body)).await
    }

    /// 탭의 reset 메서드/URL로 초기화 후 정본 재조회
    ///
    /// 탭 이름이 없거나 모르는 이름이면 첫 번째 탭을 사용한다.
    pub async fn reset_data(
        &self,
        tab_name: Option<&str>,
    ) -> Result<Arc<ConfigurationDocument>, CoreError> {
        let tab = tab_name
            .and_then(|name| self.get_tab(name))
            .or_else(|| self.get_tabs().into_iter().next());
        let (method, url) = match tab {
            Some(tab) => (tab.reset_method, tab.reset_url),
            None => (RequestMethod::Delete, self.definition.data_url.clone()),
        };

        info!("설정 초기화: kind={}, {method} {url}", self.kind());
        self.client.send(method, &url, None).await?;
        self.refresh().await
    }

    /// 선언 순서대로 해석된 탭 목록
    pub fn get_tabs(&self) -> Vec<ResourceTab> {
        self.definition
            .tabs
            .iter()
            .map(|spec| spec.resolve(&self.definition.data_url))
            .collect()
    }

    /// 이름이 일치하는 첫 번째 탭
    pub fn get_tab(&self, name: &str) -> Option<ResourceTab> {
        self.get_tabs().into_iter().find(|tab| tab.name == name)
    }

    /// 현재 캐시 스냅샷 (네트워크 호출 없음)
    pub fn cached(&self) -> Option<Arc<ConfigurationDocument>> {
        self.store.get()
    }

    /// 캐시 변경 알림 구독
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ConfigurationDocument>> {
        self.store.subscribe()
    }

    /// 푸시 피드 연결 및 이벤트 처리 태스크 시작
    ///
    /// 반환된 핸들을 abort하거나 동기화기가 drop되면 처리가 멈추고,
    /// 수신 채널이 닫히면서 피드 연결도 종료된다.
    pub fn attach_push_feed(self: &Arc<Self>, feed: Arc<dyn PushFeed>) -> JoinHandle<()> {
        let (tx, mut rx) = mpsc::channel::<PushEvent>(PUSH_CHANNEL_CAPACITY);
        let kind = self.kind();

        tokio::spawn(async move {
            if let Err(e) = feed.connect(tx).await {
                error!("푸시 피드 연결 에러: kind={kind}: {e}");
            }
        });

        let weak: Weak<Self> = Arc::downgrade(self);
        let mut shutdown = self.shutdown.subscribe();
        tokio::spawn(async move {
            info!("푸시 이벤트 수신 대기: kind={kind}");
            loop {
                tokio::select! {
                    event = rx.recv() => {
                        let Some(event) = event else { break };
                        let Some(syncer) = weak.upgrade() else { break };
                        syncer.apply_push_event(&event);
                    }
                    // 동기화기 drop으로 송신측이 닫힘
                    _ = shutdown.changed() => break,
                }
            }
            debug!("푸시 이벤트 처리 종료: kind={kind}");
        })
    }

    /// 푸시 이벤트 반영
    ///
    /// 타입 불일치 또는 캐시 부재 시 조용히 무시한다.
    /// 일치하면 페이로드를 정규화하여 `settings`에 얕게 덮어쓴다 (last-write-wins).
    fn apply_push_event(&self, event: &PushEvent) -> Option<Arc<ConfigurationDocument>> {
        if event.event_type != self.definition.event_binding.event_type {
            debug!("무관한 푸시 이벤트 무시: {}", event.event_type);
            return None;
        }
        if !self.store.is_present() {
            debug!("캐시 없음, 푸시 이벤트 무시: {}", event.event_type);
            return None;
        }

        let normalized = self
            .definition
            .normalizer
            .after_fetch(json!({ "settings": event.message }));
        let Some(patch) = normalized.get("settings").and_then(Value::as_object) else {
            warn!("객체가 아닌 푸시 페이로드 무시: {}", event.event_type);
            return None;
        };

        let updated = self
            .store
            .update_present(|doc| doc.with_settings_overlay(patch));
        if updated.is_some() {
            debug!("푸시 이벤트 반영: kind={}", self.kind());
        }
        updated
    }
}
