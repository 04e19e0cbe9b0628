//! 리소스 정의 카탈로그.
//!
//! 리소스 종류별 데이터 URL, 푸시 이벤트 바인딩, 탭 선언, 정규화 전략.
//! 경로는 서버 상대 경로이며 HTTP 어댑터가 base_url 기준으로 해석한다.

use widgetsync_core::models::resource::{ApiEventBinding, RequestMethod, ResourceKind, TabSpec};

use crate::normalizer::Normalizer;

/// 한 종류의 원격 설정 문서를 다루기 위한 정적 정의
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDefinition {
    pub kind: ResourceKind,
    /// 기본 데이터 URL
    pub data_url: String,
    /// 설정 전용 푸시/저장 바인딩
    pub event_binding: ApiEventBinding,
    /// 선언 순서대로의 탭
    pub tabs: Vec<TabSpec>,
    pub normalizer: Normalizer,
}

impl ResourceDefinition {
    /// 카탈로그에서 정의 조회
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::ChatBox => Self {
                kind,
                data_url: "/api/v5/slobs/widget/chatbox".to_string(),
                event_binding: binding(
                    "chatBoxSettingsUpdate",
                    "/api/v5/slobs/widget/chatbox/settings",
                ),
                tabs: vec![
                    TabSpec::new("settings"),
                    TabSpec::new("source").with_title("Source Code").with_autosave(false),
                ],
                normalizer: Normalizer::PixelUnits {
                    fields: vec!["text_size".to_string()],
                },
            },
            ResourceKind::EventList => Self {
                kind,
                data_url: "/api/v5/slobs/widget/eventlist".to_string(),
                event_binding: binding(
                    "eventListSettingsUpdate",
                    "/api/v5/slobs/widget/eventlist/settings",
                ),
                tabs: vec![TabSpec::new("settings")],
                normalizer: Normalizer::Identity,
            },
            ResourceKind::DonationGoal => Self {
                kind,
                data_url: "/api/v5/slobs/widget/donationgoal/settings".to_string(),
                event_binding: binding(
                    "donationGoalSettingsUpdate",
                    "/api/v5/slobs/widget/donationgoal/settings",
                ),
                tabs: vec![
                    TabSpec::new("goal")
                        .with_fetch_url("/api/v5/slobs/widget/donationgoal")
                        .with_reset_url("/api/v5/slobs/widget/donationgoal/reset")
                        .with_reset_method(RequestMethod::Post)
                        .with_autosave(false),
                    TabSpec::new("visual").with_title("Visual Settings"),
                ],
                normalizer: Normalizer::PixelUnits {
                    fields: vec!["bar_thickness".to_string(), "font_size".to_string()],
                },
            },
            ResourceKind::SymbolProtection => Self {
                kind,
                data_url: "/api/v5/slobs/chatbot/protection/symbol".to_string(),
                event_binding: binding(
                    "symbolProtectionSettingsUpdate",
                    "/api/v5/slobs/chatbot/protection/symbol/settings",
                ),
                tabs: vec![
                    TabSpec::new("general"),
                    TabSpec::new("advanced"),
                ],
                normalizer: Normalizer::PunishmentMinutes,
            },
        }
    }
}

fn binding(event_type: &str, save_url: &str) -> ApiEventBinding {
    ApiEventBinding {
        event_type: event_type.to_string(),
        save_url: save_url.to_string(),
    }
}
