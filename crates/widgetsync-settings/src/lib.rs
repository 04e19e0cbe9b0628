//! # widgetsync-settings
//!
//! 원격 위젯/챗봇 설정 동기화.
//! 리소스 종류별 문서를 가져와 정규화하고 캐시하며,
//! 저장/초기화 후 정본을 다시 읽고 푸시 이벤트로 캐시를 갱신한다.
//! 기호 도배 방지 설정 폼 컨트롤러를 포함한다.

pub mod form;
pub mod normalizer;
pub mod resources;
pub mod store;
pub mod syncer;

#[cfg(test)]
mod test_support;
