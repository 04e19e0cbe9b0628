//! 리소스 모델.
//!
//! 리소스 종류, HTTP 메서드, 탭 선언/해석, 푸시 이벤트 바인딩을 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 원격 설정 문서의 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// 채팅 박스 위젯
    ChatBox,
    /// 이벤트 목록 위젯
    EventList,
    /// 후원 목표 위젯
    DonationGoal,
    /// 챗봇 기호 도배 방지
    SymbolProtection,
}

impl ResourceKind {
    /// 모든 리소스 종류 (선언 순서)
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::ChatBox,
        ResourceKind::EventList,
        ResourceKind::DonationGoal,
        ResourceKind::SymbolProtection,
    ];

    /// 직렬화 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ChatBox => "chat_box",
            ResourceKind::EventList => "event_list",
            ResourceKind::DonationGoal => "donation_goal",
            ResourceKind::SymbolProtection => "symbol_protection",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "ResourceKind".to_string(),
                id: s.to_string(),
            })
    }
}

/// HTTP 메서드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Patch => "PATCH",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            "PUT" => Ok(RequestMethod::Put),
            "PATCH" => Ok(RequestMethod::Patch),
            "DELETE" => Ok(RequestMethod::Delete),
            other => Err(CoreError::Config(format!("지원하지 않는 HTTP 메서드: {other}"))),
        }
    }
}

/// 선언형 탭 항목: 명시하지 않은 필드는 해석 시 기본값으로 채워진다
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TabSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_method: Option<RequestMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autosave: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_controls: Option<bool>,
}

impl TabSpec {
    /// 이름만 가진 탭 선언
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_fetch_url(mut self, url: &str) -> Self {
        self.fetch_url = Some(url.to_string());
        self
    }

    pub fn with_save_url(mut self, url: &str) -> Self {
        self.save_url = Some(url.to_string());
        self
    }

    pub fn with_reset_url(mut self, url: &str) -> Self {
        self.reset_url = Some(url.to_string());
        self
    }

    pub fn with_reset_method(mut self, method: RequestMethod) -> Self {
        self.reset_method = Some(method);
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = Some(autosave);
        self
    }

    pub fn with_show_controls(mut self, show_controls: bool) -> Self {
        self.show_controls = Some(show_controls);
        self
    }

    /// 기본값을 채워 완전한 탭으로 해석
    ///
    /// fetch → data_url, save → fetch, reset → save, reset 메서드 → DELETE,
    /// autosave/show_controls → true. 명시된 필드는 항상 우선한다.
    pub fn resolve(&self, data_url: &str) -> ResourceTab {
        let fetch_url = self
            .fetch_url
            .clone()
            .unwrap_or_else(|| data_url.to_string());
        let save_url = self.save_url.clone().unwrap_or_else(|| fetch_url.clone());
        let reset_url = self.reset_url.clone().unwrap_or_else(|| save_url.clone());

        ResourceTab {
            name: self.name.clone(),
            title: self
                .title
                .clone()
                .unwrap_or_else(|| capitalize_first(&self.name)),
            fetch_url,
            save_url,
            reset_url,
            reset_method: self.reset_method.unwrap_or(RequestMethod::Delete),
            autosave: self.autosave.unwrap_or(true),
            show_controls: self.show_controls.unwrap_or(true),
        }
    }
}

/// 해석된 탭: 문서의 독립적으로 주소 지정 가능한 하위 뷰
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTab {
    pub name: String,
    pub title: String,
    pub fetch_url: String,
    pub save_url: String,
    pub reset_url: String,
    pub reset_method: RequestMethod,
    pub autosave: bool,
    pub show_controls: bool,
}

/// 푸시 이벤트 타입 ↔ 설정 전용 저장 URL 바인딩
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEventBinding {
    /// 수락할 푸시 이벤트 타입
    pub event_type: String,
    /// 설정 전용 저장 엔드포인트
    pub save_url: String,
}

fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
