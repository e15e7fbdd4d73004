//! 버전 저장소 통합 테스트.
//!
//! in-memory SQLite에 실제 마이그레이션을 적용해 저장소 계약을 검증합니다:
//! 생성→조회 왕복, 중복 생성 거부, 없는 행 save의 no-op, 버전 목록.

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::Json;
use docent::{
    db,
    error::{AiError, AppError},
    models::{DocumentPayload, VersionQuery},
    routes,
    routes::documents::AppState,
    services::{FragmentStream, Reviewer},
};
use futures_util::StreamExt;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

/// REST 핸들러 테스트용 리뷰어. 이 테스트에서는 호출되지 않습니다.
struct NoopReviewer;

#[async_trait]
impl Reviewer for NoopReviewer {
    async fn review_document(&self, _paragraph: &str) -> Result<FragmentStream, AiError> {
        Ok(futures_util::stream::empty().boxed())
    }

    async fn incorporate_suggestions(
        &self,
        _document: &str,
        _paragraph: &str,
        _suggestion: &str,
    ) -> Result<FragmentStream, AiError> {
        Ok(futures_util::stream::empty().boxed())
    }
}

/// 마이그레이션이 적용된 in-memory 풀.
/// 연결마다 별도 메모리 DB가 생기지 않도록 연결 수를 1로 고정합니다.
async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

fn test_state(pool: SqlitePool) -> AppState {
    AppState {
        pool,
        reviewer: Arc::new(NoopReviewer),
    }
}

fn query(document_id: i64, document_version: i64) -> Query<VersionQuery> {
    Query(VersionQuery {
        document_id,
        document_version,
    })
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let pool = test_pool().await;

    db::create_version(&pool, 7, 1, "first draft").await.unwrap();
    let row = db::get_version(&pool, 7, 1).await.unwrap().unwrap();

    assert_eq!(row.document_id, 7);
    assert_eq!(row.version, 1);
    assert_eq!(row.content, "first draft");
}

#[tokio::test]
async fn get_missing_version_is_none() {
    let pool = test_pool().await;
    assert!(db::get_version(&pool, 1, 99).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_create_keeps_first_content() {
    let pool = test_pool().await;

    db::create_version(&pool, 3, 1, "original").await.unwrap();
    let err = db::create_version(&pool, 3, 1, "usurper").await.unwrap_err();

    // 기본키 위반이 그대로 표면화되어야 합니다.
    assert!(err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation()));

    // 저장된 내용은 첫 번째 호출의 값 그대로입니다.
    let row = db::get_version(&pool, 3, 1).await.unwrap().unwrap();
    assert_eq!(row.content, "original");
}

#[tokio::test]
async fn save_on_missing_row_creates_nothing() {
    let pool = test_pool().await;

    // 없는 (id, version) 쌍에 대한 save는 에러도, 새 행도 만들지 않습니다.
    db::save_version(&pool, 9, 9, "ghost").await.unwrap();

    assert!(db::get_version(&pool, 9, 9).await.unwrap().is_none());
    assert!(!db::list_versions(&pool).await.unwrap().contains_key(&9));
}

#[tokio::test]
async fn save_then_get_returns_new_content() {
    let pool = test_pool().await;

    db::create_version(&pool, 4, 2, "before").await.unwrap();
    db::save_version(&pool, 4, 2, "after").await.unwrap();
    // 같은 내용을 두 번 저장해도 최종 상태는 같습니다 (멱등).
    db::save_version(&pool, 4, 2, "after").await.unwrap();

    let row = db::get_version(&pool, 4, 2).await.unwrap().unwrap();
    assert_eq!(row.content, "after");
}

#[tokio::test]
async fn list_versions_groups_by_document() {
    let pool = test_pool().await;

    // 순서를 섞어 넣어도 목록은 정렬되어 나옵니다.
    db::create_version(&pool, 2, 3, "c").await.unwrap();
    db::create_version(&pool, 1, 1, "a").await.unwrap();
    db::create_version(&pool, 2, 1, "a").await.unwrap();
    db::create_version(&pool, 2, 2, "b").await.unwrap();

    let all_versions = db::list_versions(&pool).await.unwrap();
    assert_eq!(all_versions.get(&1), Some(&vec![1]));
    assert_eq!(all_versions.get(&2), Some(&vec![1, 2, 3]));
}

#[tokio::test]
async fn seed_is_idempotent() {
    let pool = test_pool().await;

    db::seed_documents(&pool).await.unwrap();
    let first = db::get_version(&pool, 2, 1).await.unwrap().unwrap();

    // 두 번 실행해도 에러 없이 기존 행이 유지됩니다.
    db::seed_documents(&pool).await.unwrap();
    let second = db::get_version(&pool, 2, 1).await.unwrap().unwrap();
    assert_eq!(first.content, second.content);

    // 문서 2는 동일한 내용의 버전 1~3을 갖습니다.
    let all_versions = db::list_versions(&pool).await.unwrap();
    assert_eq!(all_versions.get(&2), Some(&vec![1, 2, 3]));
}

// ─── 핸들러 수준: 에러 매핑 ──────────────────────────────────────────────────

#[tokio::test]
async fn get_document_handler_maps_missing_to_not_found() {
    let state = test_state(test_pool().await);

    let err = routes::get_document(State(state), query(1, 42))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn non_positive_ids_are_rejected() {
    let state = test_state(test_pool().await);

    let err = routes::get_document(State(state.clone()), query(0, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = routes::save(
        State(state),
        query(1, -1),
        Json(DocumentPayload {
            content: "x".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn create_version_handler_maps_duplicate_to_conflict() {
    let state = test_state(test_pool().await);
    let payload = || {
        Json(DocumentPayload {
            content: "text".to_string(),
        })
    };

    routes::create_version(State(state.clone()), query(5, 1), payload())
        .await
        .unwrap();
    let err = routes::create_version(State(state), query(5, 1), payload())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
