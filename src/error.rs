//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): REST 요청/응답 경로의 에러. HTTP 응답으로 변환됩니다.
//! - `AiError`: LLM 리뷰어 호출(전송/프로토콜) 경로의 에러
//! - `ReviewError`: WebSocket 세션의 한 턴(turn)에서 생기는 에러.
//!   세션 루프가 이 타입을 패턴 매칭하여 "로그 남기고 계속"을 결정합니다.

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

/// REST 요청/응답 경로에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 (document_id, version) 쌍이 존재하지 않음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    /// String을 포함하여 구체적인 에러 메시지를 전달합니다.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 이미 존재하는 (document_id, version) 쌍으로 버전 생성 시도 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error를 AppError로 자동 변환하는 From 트레이트를 구현합니다.
    /// 이를 통해 sqlx 함수에서 반환된 에러에 `?` 연산자를 사용하면
    /// 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "conflict", "message": "..." } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// LLM 리뷰어 호출 경로의 에러.
///
/// 어느 variant든 진행 중이던 리뷰 턴만 실패시킵니다.
/// 세션이나 프로세스는 영향을 받지 않습니다.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP 요청 자체가 실패 (연결 불가, 타임아웃, 본문 스트림 끊김 등)
    #[error("reviewer request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// 리뷰어 API가 2xx 이외의 상태 코드를 반환
    #[error("reviewer returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// 스트림 이벤트를 해석할 수 없음 (SSE 형식 위반 등)
    #[error("malformed reviewer stream: {0}")]
    Protocol(String),
}

/// WebSocket 세션의 한 턴에서 생길 수 있는 에러.
///
/// 세션 루프는 이 타입을 패턴 매칭합니다:
/// - `Validation`: 클라이언트가 보낸 페이로드가 잘못됨. 로그 남기고 다음 메시지 대기.
/// - `Producer`: 리뷰어 스트림이 도중에 실패함. 부분 결과는 버려지고,
///   역시 로그만 남기고 다음 메시지를 대기합니다.
///
/// 세션을 종료시키는 경우는 이 타입에 없습니다. 종료는 오직
/// 클라이언트의 연결 종료(disconnect)로만 일어납니다.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// 페이로드 검증 실패 (필수 필드 누락, JSON 아님, 텍스트 프레임 아님)
    #[error("invalid payload: {0}")]
    Validation(String),

    /// 리뷰어(producer) 실패
    #[error("reviewer failed: {0}")]
    Producer(#[from] AiError),
}
