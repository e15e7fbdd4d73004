//! # 라우트 핸들러 모듈
//!
//! 클라이언트 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `documents`: 버전 저장소 요청/응답 핸들러 (조회/저장/생성/목록)
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `review`: 리뷰 스트리밍 WebSocket 세션 (두 채널)

pub mod documents;
pub mod health;
pub mod review;

// 각 모듈의 핸들러 함수들을 재공개하여
// main.rs에서 `routes::get_document`처럼 바로 접근 가능하게 합니다.
pub use documents::*;
pub use health::*;
pub use review::*;
