//! widgetsync 도메인 모델.
//!
//! 서버-클라이언트 간 공유하는 설정 문서, 탭, 푸시 이벤트를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod document;
pub mod push;
pub mod resource;
