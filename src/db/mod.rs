//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `documents`: 문서 버전 저장소의 조회/수정/생성/목록 쿼리
//! - `seed`: 서버 구동 시 넣어두는 예시 문서
//!
//! 모든 쿼리는 단일 SQL 문입니다. 여러 문을 묶는 트랜잭션이 필요한
//! 작업이 없으므로, 행 단위 원자성은 SQLite가 보장합니다.

pub mod documents;
pub mod seed;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::get_version`처럼 바로 접근할 수 있게 합니다.
pub use documents::*;
pub use seed::*;
