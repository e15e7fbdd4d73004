use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DocumentVersion {
    pub document_id: i64,
    pub version: i64,
    pub content: String,
}

/// save / create_version 요청 본문
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub content: String,
}

/// document_id + document_version 쿼리 파라미터 쌍
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VersionQuery {
    pub document_id: i64,
    pub document_version: i64,
}

/// 제안 반영 채널(`/ws_ai_sugg`)의 요청 페이로드.
/// 세 필드가 모두 있어야 유효한 요청으로 파싱됩니다.
#[derive(Debug, Deserialize)]
pub struct ReviseRequest {
    pub document: String,
    pub paragraph: String,
    pub suggestion: String,
}
