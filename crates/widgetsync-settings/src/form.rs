//! 챗봇 기호 도배 방지 설정 폼.
//!
//! general/advanced 두 탭으로 구성된 설정 창의 UI 독립 컨트롤러.
//! 초안 편집, 유효성 검증, 저장/취소/초기화, 조건부 필드 노출을 담당한다.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use widgetsync_core::error::CoreError;
use widgetsync_core::models::document::ConfigurationDocument;
use widgetsync_core::models::resource::{RequestMethod, ResourceKind, ResourceTab};

use crate::syncer::RemoteSettingsSyncer;

/// 경고 메시지 최대 길이
pub const MAX_MESSAGE_LEN: usize = 150;

const PUNISHMENT_TYPE: &str = "general.punishment.type";
const PUNISHMENT_DURATION: &str = "general.punishment.duration";
const MESSAGE: &str = "general.message";
const MINIMUM: &str = "advanced.minimum";
const MAXIMUM: &str = "advanced.maximum";
const PERCENT: &str = "advanced.percent";

/// 시간 제한 제재 타입 값
const TIMEOUT_PUNISHMENT: &str = "Timeout";

/// 기호 도배 방지 설정 폼
pub struct SymbolProtectionForm {
    syncer: Arc<RemoteSettingsSyncer>,
    draft: ConfigurationDocument,
    active_tab: String,
    errors: BTreeMap<String, String>,
}

impl SymbolProtectionForm {
    /// 문서를 가져와 폼 열기 (첫 탭 활성)
    pub async fn open(syncer: Arc<RemoteSettingsSyncer>) -> Result<Self, CoreError> {
        if syncer.kind() != ResourceKind::SymbolProtection {
            return Err(CoreError::Config(format!(
                "기호 도배 방지 폼에 맞지 않는 리소스: {}",
                syncer.kind()
            )));
        }

        let document = syncer.fetch_data().await?;
        let active_tab = syncer
            .get_tabs()
            .first()
            .map(|tab| tab.name.clone())
            .unwrap_or_default();

        let mut form = Self {
            syncer,
            draft: (*document).clone(),
            active_tab,
            errors: BTreeMap::new(),
        };
        form.validate();
        Ok(form)
    }

    pub fn tabs(&self) -> Vec<ResourceTab> {
        self.syncer.get_tabs()
    }

    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    /// 활성 탭 변경
    pub fn select_tab(&mut self, name: &str) -> Result<(), CoreError> {
        if self.syncer.get_tab(name).is_none() {
            return Err(CoreError::NotFound {
                resource_type: "Tab".to_string(),
                id: name.to_string(),
            });
        }
        self.active_tab = name.to_string();
        Ok(())
    }

    pub fn draft(&self) -> &ConfigurationDocument {
        &self.draft
    }

    /// 점 경로로 설정 필드 조회 (예: "advanced.percent")
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut keys = path.split('.');
        let mut current = self.draft.settings.get(keys.next()?)?;
        for key in keys {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// 점 경로로 설정 필드 변경 후 재검증
    ///
    /// 중간 객체가 없으면 만들고, 객체가 아닌 값이 길을 막으면 거부한다.
    pub fn set_field(&mut self, path: &str, value: Value) -> Result<(), CoreError> {
        let keys: Vec<&str> = path.split('.').collect();
        if keys.iter().any(|key| key.is_empty()) {
            return Err(CoreError::Validation {
                field: path.to_string(),
                message: "빈 경로 구간".to_string(),
            });
        }

        let (last, parents) = keys
            .split_last()
            .ok_or_else(|| CoreError::Validation {
                field: path.to_string(),
                message: "빈 경로".to_string(),
            })?;

        let mut target: &mut Map<String, Value> = &mut self.draft.settings;
        for key in parents {
            let entry = target
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            target = entry.as_object_mut().ok_or_else(|| CoreError::Validation {
                field: path.to_string(),
                message: format!("객체가 아닌 구간: {key}"),
            })?;
        }
        target.insert(last.to_string(), value);

        debug!("폼 필드 변경: {path}");
        self.validate();
        Ok(())
    }

    /// 대기 중인 검증 에러 (필드 경로 → 사유)
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// 검증 에러가 없을 때만 저장 가능
    pub fn can_save(&self) -> bool {
        self.errors.is_empty()
    }

    /// 활성 탭이 자동 저장 대상이고 저장 가능한지
    pub fn should_autosave(&self) -> bool {
        self.can_save()
            && self
                .syncer
                .get_tab(&self.active_tab)
                .is_some_and(|tab| tab.autosave)
    }

    /// 조건부 노출: 제재 시간은 제재 타입이 Timeout일 때만 보인다
    pub fn is_field_visible(&self, path: &str) -> bool {
        match path {
            PUNISHMENT_DURATION => {
                self.field(PUNISHMENT_TYPE).and_then(Value::as_str) == Some(TIMEOUT_PUNISHMENT)
            }
            _ => true,
        }
    }

    /// 활성 탭으로 초안 저장
    pub async fn save(&mut self) -> Result<Arc<ConfigurationDocument>, CoreError> {
        if let Some((field, message)) = self.errors.iter().next() {
            return Err(CoreError::Validation {
                field: field.clone(),
                message: message.clone(),
            });
        }

        let saved = self
            .syncer
            .save_data(&self.draft, Some(&self.active_tab), RequestMethod::Post)
            .await?;
        self.load(&saved);
        Ok(saved)
    }

    /// 활성 탭의 reset 메서드/URL로 초기화하고 초안 다시 로드
    pub async fn reset(&mut self) -> Result<Arc<ConfigurationDocument>, CoreError> {
        let document = self.syncer.reset_data(Some(&self.active_tab)).await?;
        self.load(&document);
        Ok(document)
    }

    /// 초안 폐기, 캐시 스냅샷으로 복귀
    pub fn cancel(&mut self) {
        if let Some(document) = self.syncer.cached() {
            self.load(&document);
        }
    }

    fn load(&mut self, document: &ConfigurationDocument) {
        self.draft = document.clone();
        self.validate();
    }

    fn validate(&mut self) {
        let mut errors = BTreeMap::new();

        let minimum = self.field(MINIMUM).and_then(Value::as_f64);
        let maximum = self.field(MAXIMUM).and_then(Value::as_f64);
        if let Some(min) = minimum {
            if min < 0.0 {
                errors.insert(MINIMUM.to_string(), "0 이상이어야 함".to_string());
            }
        }
        if let (Some(min), Some(max)) = (minimum, maximum) {
            if max < min {
                errors.insert(MAXIMUM.to_string(), "최소값보다 작을 수 없음".to_string());
            }
        }

        if let Some(percent) = self.field(PERCENT).and_then(Value::as_f64) {
            if !(0.0..=100.0).contains(&percent) {
                errors.insert(PERCENT.to_string(), "0~100 범위여야 함".to_string());
            }
        }

        if self.is_field_visible(PUNISHMENT_DURATION) {
            let duration = self.field(PUNISHMENT_DURATION).and_then(Value::as_f64);
            if !duration.is_some_and(|d| d > 0.0) {
                errors.insert(
                    PUNISHMENT_DURATION.to_string(),
                    "Timeout 제재는 양수 시간이 필요함".to_string(),
                );
            }
        }

        if let Some(message) = self.field(MESSAGE).and_then(Value::as_str) {
            if message.chars().count() > MAX_MESSAGE_LEN {
                errors.insert(
                    MESSAGE.to_string(),
                    format!("{MAX_MESSAGE_LEN}자 이하여야 함"),
                );
            }
        }

        self.errors = errors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedClient;
    use serde_json::json;

    fn server_doc() -> Value {
        json!({
            "settings": {
                "general": {
                    "message": "Too many symbols",
                    "punishment": {"type": "Timeout", "duration": 600}
                },
                "advanced": {"minimum": 10, "maximum": 50, "percent": 50}
            }
        })
    }

    async fn open_form() -> (Arc<ScriptedClient>, SymbolProtectionForm) {
        let client = Arc::new(ScriptedClient::new());
        client.push_get(Ok(server_doc()));
        let syncer = Arc::new(RemoteSettingsSyncer::for_kind(
            ResourceKind::SymbolProtection,
            client.clone(),
        ));
        let form = SymbolProtectionForm::open(syncer).await.unwrap();
        (client, form)
    }

    #[tokio::test]
    async fn opens_on_first_tab_with_normalized_draft() {
        let (_client, form) = open_form().await;
        assert_eq!(form.active_tab(), "general");
        assert_eq!(form.tabs().len(), 2);
        assert_eq!(form.field(PUNISHMENT_DURATION), Some(&json!(10)));
        assert!(form.can_save());
    }

    #[tokio::test]
    async fn rejects_other_resource_kinds() {
        let client = Arc::new(ScriptedClient::new());
        let syncer = Arc::new(RemoteSettingsSyncer::for_kind(
            ResourceKind::ChatBox,
            client.clone(),
        ));
        assert!(matches!(
            SymbolProtectionForm::open(syncer).await,
            Err(CoreError::Config(_))
        ));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_percent_blocks_save() {
        let (client, mut form) = open_form().await;
        form.set_field(PERCENT, json!(150)).unwrap();

        assert!(!form.can_save());
        assert!(form.errors().contains_key(PERCENT));
        let err = form.save().await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == PERCENT));
        assert_eq!(client.calls().len(), 1);

        form.set_field(PERCENT, json!(40)).unwrap();
        assert!(form.can_save());
    }

    #[tokio::test]
    async fn maximum_below_minimum_is_error() {
        let (_client, mut form) = open_form().await;
        form.set_field(MAXIMUM, json!(5)).unwrap();
        assert!(form.errors().contains_key(MAXIMUM));
        form.set_field(MINIMUM, json!(-1)).unwrap();
        assert!(form.errors().contains_key(MINIMUM));
    }

    #[tokio::test]
    async fn long_message_is_error() {
        let (_client, mut form) = open_form().await;
        form.set_field(MESSAGE, json!("!".repeat(MAX_MESSAGE_LEN + 1)))
            .unwrap();
        assert!(!form.can_save());
    }

    #[tokio::test]
    async fn duration_visibility_follows_punishment_type() {
        let (_client, mut form) = open_form().await;
        assert!(form.is_field_visible(PUNISHMENT_DURATION));

        form.set_field(PUNISHMENT_DURATION, json!(0)).unwrap();
        assert!(form.errors().contains_key(PUNISHMENT_DURATION));

        form.set_field(PUNISHMENT_TYPE, json!("Ban")).unwrap();
        assert!(!form.is_field_visible(PUNISHMENT_DURATION));
        assert!(form.can_save());
        assert!(form.is_field_visible(MESSAGE));
    }

    #[tokio::test]
    async fn save_posts_to_active_tab_in_server_units() {
        let (client, mut form) = open_form().await;
        form.select_tab("advanced").unwrap();
        form.set_field(PUNISHMENT_DURATION, json!(2)).unwrap();
        client.push_get(Ok(json!({
            "settings": {"general": {"punishment": {"type": "Timeout", "duration": 120}}}
        })));

        let saved = form.save().await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[1].method, RequestMethod::Post);
        assert_eq!(calls[1].url, "/api/v5/slobs/chatbot/protection/symbol");
        let body = calls[1].body.clone().unwrap();
        assert_eq!(body["settings"]["general"]["punishment"]["duration"], json!(120));
        assert_eq!(saved.settings["general"]["punishment"]["duration"], json!(2));
        assert_eq!(form.draft(), &*saved);
    }

    #[tokio::test]
    async fn reset_uses_active_tab_and_reloads_draft() {
        let (client, mut form) = open_form().await;
        form.set_field(PERCENT, json!(99)).unwrap();
        client.push_get(Ok(json!({"settings": {"advanced": {"percent": 30}}})));

        form.reset().await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[1].method, RequestMethod::Delete);
        assert_eq!(calls[1].url, "/api/v5/slobs/chatbot/protection/symbol");
        assert_eq!(form.field(PERCENT), Some(&json!(30)));
    }

    #[tokio::test]
    async fn cancel_discards_draft() {
        let (_client, mut form) = open_form().await;
        form.set_field(PERCENT, json!(1)).unwrap();
        form.cancel();
        assert_eq!(form.field(PERCENT), Some(&json!(50)));
    }

    #[tokio::test]
    async fn set_field_creates_and_guards_paths() {
        let (_client, mut form) = open_form().await;
        form.set_field("permit.level", json!("moderator")).unwrap();
        assert_eq!(form.field("permit.level"), Some(&json!("moderator")));

        assert!(form.set_field("general.message.text", json!("x")).is_err());
        assert!(form.set_field("general..x", json!(1)).is_err());
    }

    #[tokio::test]
    async fn select_unknown_tab_fails() {
        let (_client, mut form) = open_form().await;
        assert!(form.select_tab("nope").is_err());
        assert_eq!(form.active_tab(), "general");
        assert!(form.should_autosave());
    }
}
