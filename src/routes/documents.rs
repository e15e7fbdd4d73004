//! # 문서 버전(Document Version) 라우트 핸들러
//!
//! 버전 저장소에 대한 요청/응답 API를 처리하는 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//! - `GET  /api/v1/document`       → 특정 (문서, 버전)의 내용 조회
//! - `POST /api/v1/save`           → 기존 버전의 내용 덮어쓰기
//! - `POST /api/v1/create_version` → 새 버전 행 생성
//! - `GET  /api/v1/versions`       → 문서별 버전 번호 목록
//!
//! ## Axum 핸들러 패턴
//! Axum 핸들러는 **Extractor(추출기)**를 매개변수로 받습니다:
//! - `State(state)`: 앱 전역 상태 (DB 풀, 리뷰어)
//! - `Query(query)`: URL 쿼리 파라미터 (?document_id=1&document_version=2)
//! - `Json(body)`: 요청 본문을 JSON으로 파싱하여 구조체로 변환
//!
//! 반환 타입이 `Result<T, AppError>`이면, Axum이 자동으로:
//! - `Ok(T)` → T를 HTTP 응답으로 변환
//! - `Err(AppError)` → 에러 JSON 응답으로 변환

use crate::{
    db,
    error::AppError,
    models::*,
    services::Reviewer,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::{collections::BTreeMap, sync::Arc};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool과 Arc는 clone해도 실제 자원이 복제되지 않고 공유됩니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// LLM 리뷰어. 트레이트 객체라 테스트에서는 가짜 구현으로 바꿔 낄 수 있습니다.
    pub reviewer: Arc<dyn Reviewer>,
}

/// document_id와 document_version은 모두 양의 정수여야 합니다.
/// 정수가 아닌 입력은 Query 추출 단계에서 이미 거부되므로 여기서는 부호만 봅니다.
fn validate_pair(query: &VersionQuery) -> Result<(), AppError> {
    if query.document_id <= 0 || query.document_version <= 0 {
        return Err(AppError::BadRequest(
            "document_id and document_version must be positive integers".to_string(),
        ));
    }
    Ok(())
}

/// `GET /document` — (document_id, document_version) 쌍의 내용을 조회합니다.
pub async fn get_document(
    State(state): State<AppState>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<DocumentVersion>, AppError> {
    validate_pair(&query)?;
    let document = db::get_version(&state.pool, query.document_id, query.document_version)
        .await?
        // 해당 쌍이 없으면 404 NotFound 응답이 됩니다.
        .ok_or(AppError::NotFound)?;
    Ok(Json(document))
}

/// `POST /save` — 기존 (document_id, document_version) 행의 내용을 덮어씁니다.
///
/// 행이 없으면 에러 없이 그냥 지나갑니다(no-op). 존재 보장이 필요한
/// 호출자는 먼저 `GET /document`로 확인해야 합니다.
pub async fn save(
    State(state): State<AppState>,
    Query(query): Query<VersionQuery>,
    Json(payload): Json<DocumentPayload>,
) -> Result<Json<Value>, AppError> {
    validate_pair(&query)?;
    db::save_version(
        &state.pool,
        query.document_id,
        query.document_version,
        &payload.content,
    )
    .await?;

    // 받은 내용을 그대로 돌려줍니다 (echo).
    Ok(Json(json!({
        "document_id": query.document_id,
        "content": payload.content
    })))
}

/// `POST /create_version` — 새 (document_id, document_version) 행을 생성합니다.
///
/// 같은 쌍이 이미 있으면 HTTP 409 Conflict로 거부합니다.
pub async fn create_version(
    State(state): State<AppState>,
    Query(query): Query<VersionQuery>,
    Json(payload): Json<DocumentPayload>,
) -> Result<Json<Value>, AppError> {
    validate_pair(&query)?;
    db::create_version(
        &state.pool,
        query.document_id,
        query.document_version,
        &payload.content,
    )
    .await
    // 기본키 위반만 409로 구분하고, 나머지 DB 에러는 500으로 흘려보냅니다.
    .map_err(|e| {
        let duplicate = e
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if duplicate {
            AppError::Conflict(format!(
                "version {} of document {} already exists",
                query.document_version, query.document_id
            ))
        } else {
            AppError::Database(e)
        }
    })?;

    Ok(Json(json!({
        "document_id": query.document_id,
        "content": payload.content
    })))
}

/// `GET /versions` — 저장소의 모든 문서 id와 버전 번호 목록을 반환합니다.
///
/// 응답 예: `{ "1": [1], "2": [1, 2, 3] }`
/// (JSON 객체의 키는 항상 문자열이므로 문서 id가 문자열로 직렬화됩니다)
pub async fn get_versions(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<i64, Vec<i64>>>, AppError> {
    let all_versions = db::list_versions(&state.pool).await?;
    Ok(Json(all_versions))
}
