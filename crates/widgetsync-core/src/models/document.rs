//! 설정 문서 모델.
//!
//! 서버에 저장된 위젯/챗봇 설정 문서의 로컬 캐시 표현.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resource::ResourceKind;

/// 사용자 정의 기본 코드 (HTML/CSS/JS)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomDefaults {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
}

/// 원격 설정 문서
///
/// `kind`는 동기화기가 fetch 후 직접 기록한다. 서버 페이로드의 값은 신뢰하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    /// 리소스 종류 (와이어 이름 `type`)
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// 기능 토글과 자유 텍스트 필드
    #[serde(default)]
    pub settings: Map<String, Value>,
    /// 사용자 정의 기본 코드
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_defaults: Option<CustomDefaults>,
    /// 그 외 최상위 필드 (그대로 보존)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigurationDocument {
    /// 빈 설정을 가진 문서
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            settings: Map::new(),
            custom_defaults: None,
            extra: Map::new(),
        }
    }

    /// 설정 필드 조회
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// `settings`에 얕은 덮어쓰기를 적용한 새 문서
    ///
    /// patch에 있는 키는 덮어쓰고, 없는 키는 이전 값을 유지한다.
    /// `settings` 이외의 최상위 필드는 건드리지 않는다.
    pub fn with_settings_overlay(&self, patch: &Map<String, Value>) -> Self {
        let mut next = self.clone();
        for (key, value) in patch {
            next.settings.insert(key.clone(), value.clone());
        }
        next
    }
}
