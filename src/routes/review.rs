//! # 리뷰 스트리밍 세션 (WebSocket)
//!
//! 클라이언트와의 양방향 연결 두 개를 처리합니다:
//! - `GET /api/v1/ws`          → 문서 텍스트를 받아 리뷰 제안을 돌려주는 채널
//! - `GET /api/v1/ws_ai_sugg`  → {document, paragraph, suggestion} JSON을 받아
//!                               제안을 반영한 수정문을 돌려주는 채널
//!
//! 두 채널의 세션 루프는 모양이 같고, 메시지 해석(파싱)과
//! 어느 리뷰어 메서드를 부르는지만 다릅니다.
//!
//! ## 루프 계약
//! - 한 번에 한 메시지: 응답을 보내기 전에는 다음 메시지를 받지 않습니다.
//! - 턴 에러(잘못된 페이로드, 리뷰어 실패)는 로그만 남기고 루프를 계속합니다.
//! - 루프를 끝내는 것은 클라이언트의 연결 종료(또는 전송 불가)뿐입니다.
//! - 세션 하나가 느려져도 다른 세션은 영향을 받지 않습니다.
//!   각 세션은 독립된 Tokio 태스크에서 돌기 때문입니다.

use crate::{
    error::ReviewError,
    models::ReviseRequest,
    services::{assemble, Reviewer},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};

use super::documents::AppState;

/// 두 채널을 구분하는 태그. 파싱과 리뷰어 호출 방식이 갈립니다.
#[derive(Debug, Clone, Copy)]
enum Channel {
    Review,
    Incorporate,
}

impl Channel {
    fn name(self) -> &'static str {
        match self {
            Channel::Review => "review",
            Channel::Incorporate => "incorporate",
        }
    }
}

/// `GET /ws` — 리뷰 채널로 업그레이드합니다.
pub async fn review_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    // on_upgrade: 핸드셰이크가 끝나면 새 태스크에서 세션 루프를 실행합니다.
    ws.on_upgrade(move |socket| run_session(socket, state, Channel::Review))
}

/// `GET /ws_ai_sugg` — 제안 반영 채널로 업그레이드합니다.
pub async fn incorporate_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, state, Channel::Incorporate))
}

/// 세션 루프: 받기 → 처리 → 보내기를 연결이 끝날 때까지 반복합니다.
async fn run_session(mut socket: WebSocket, state: AppState, channel: Channel) {
    tracing::debug!(channel = channel.name(), "websocket session opened");

    // recv()가 None을 돌려주면 연결이 이미 닫힌 것입니다.
    while let Some(message) = socket.recv().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            // 클라이언트가 종료를 알림 → 루프를 빠져나갑니다.
            Ok(Message::Close(_)) => break,
            // Ping/Pong은 axum이 자동으로 응답합니다.
            Ok(Message::Ping(_) | Message::Pong(_)) => continue,
            // 이 채널의 프로토콜은 텍스트 프레임뿐입니다. 버리고 계속합니다.
            Ok(Message::Binary(_)) => {
                tracing::warn!(channel = channel.name(), "ignoring binary frame");
                continue;
            }
            // 전송 계층 에러는 연결이 깨졌다는 뜻입니다.
            Err(e) => {
                tracing::debug!(channel = channel.name(), error = %e, "transport error");
                break;
            }
        };

        // 한 턴의 결과를 명시적인 Result로 받아 패턴 매칭합니다.
        let outcome = match channel {
            Channel::Review => review_turn(state.reviewer.as_ref(), text.as_str()).await,
            Channel::Incorporate => {
                incorporate_turn(state.reviewer.as_ref(), text.as_str()).await
            }
        };

        match outcome {
            Ok(response) => {
                // 조립된 문자열을 JSON 문자열로 감싸 텍스트 프레임 하나로 보냅니다.
                // (Value::String의 직렬화는 실패할 수 없습니다)
                let frame = serde_json::Value::String(response).to_string();
                if socket.send(Message::Text(frame.into())).await.is_err() {
                    // 보낼 수 없으면 연결이 사라진 것입니다.
                    break;
                }
            }
            Err(ReviewError::Validation(reason)) => {
                tracing::warn!(
                    channel = channel.name(),
                    %reason,
                    "rejected message; session continues"
                );
            }
            Err(ReviewError::Producer(e)) => {
                tracing::error!(
                    channel = channel.name(),
                    error = %e,
                    "reviewer failed; session continues"
                );
            }
        }
    }

    tracing::debug!(channel = channel.name(), "websocket session closed");
}

/// 리뷰 채널의 한 턴: 받은 텍스트를 문단으로 다듬어 리뷰어에게 보내고,
/// fragment 스트림을 완성된 제안 하나로 조립합니다.
pub async fn review_turn(reviewer: &dyn Reviewer, document: &str) -> Result<String, ReviewError> {
    let paragraph = document.trim();
    let fragments = reviewer.review_document(paragraph).await?;
    Ok(assemble(fragments).await?)
}

/// 제안 반영 채널의 한 턴: JSON 페이로드를 검증한 뒤 리뷰어를 호출합니다.
///
/// 페이로드가 JSON이 아니거나 필수 필드가 빠지면 `Validation` 에러로
/// 거부되고, 세션 루프는 연결을 유지한 채 다음 메시지를 기다립니다.
pub async fn incorporate_turn(reviewer: &dyn Reviewer, raw: &str) -> Result<String, ReviewError> {
    let request: ReviseRequest =
        serde_json::from_str(raw).map_err(|e| ReviewError::Validation(e.to_string()))?;

    // 클라이언트가 보낸 paragraph 필드는 쓰지 않고,
    // 문서 전체를 앞뒤 공백만 정리해 문단으로 사용합니다.
    let paragraph = request.document.trim();

    let fragments = reviewer
        .incorporate_suggestions(&request.document, paragraph, &request.suggestion)
        .await?;
    Ok(assemble(fragments).await?)
}
