//! # widgetsync-network
//!
//! HTTP/WebSocket 네트워크 어댑터.
//! 설정 서버와의 REST 호출, 푸시 채널 구독을 담당하며
//! 모든 요청에 API 토큰 기반 인증 헤더를 붙인다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use widgetsync_network::auth::TokenManager;
//! use widgetsync_network::http_client::HttpResourceClient;
//! use widgetsync_network::ws_client::WsPushFeed;
//! ```

pub mod auth;
pub mod http_client;
pub mod ws_client;
