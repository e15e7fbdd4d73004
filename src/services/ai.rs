//! # LLM 리뷰어 클라이언트
//!
//! 외부 LLM API를 호출해 글쓰기 제안을 받아오는 모듈입니다.
//!
//! 핵심 설계: 리뷰어는 `Reviewer` 트레이트 뒤에 숨겨진 "fragment 생산자"입니다.
//! 호출 측(WebSocket 세션)은 리뷰어가 어떤 API를 쓰는지 모르고,
//! `FragmentStream`(텍스트 조각의 비동기 스트림)만 소비합니다.
//! 덕분에 테스트에서는 각본대로 움직이는 가짜 리뷰어를 꽂을 수 있습니다.
//!
//! 실제 구현 `OpenAiReviewer`는 OpenAI 호환 chat-completions API를
//! `stream: true`로 호출하고, SSE(Server-Sent Events) 응답을
//! `SseDecoder`로 해석해 델타 텍스트 조각을 흘려보냅니다.

use crate::{config::Config, error::AiError};
use async_trait::async_trait;
use futures_util::{stream, stream::BoxStream, StreamExt};
use serde::Deserialize;
use serde_json::json;

/// 리뷰어가 생산하는 텍스트 조각(fragment)의 스트림.
/// 조각은 도착 순서가 곧 내용 순서이며, 빈 문자열일 수도 있습니다.
pub type FragmentStream = BoxStream<'static, Result<String, AiError>>;

/// LLM 리뷰어 경계(trait).
///
/// 두 메서드 모두 스트림을 "여는" 데까지만 기다리고,
/// 조각이 모두 도착하기를 기다리지는 않습니다.
/// 조각을 하나의 완성본으로 합치는 일은 `services::assemble`의 몫입니다.
#[async_trait]
pub trait Reviewer: Send + Sync {
    /// 문단 하나를 검토하고 제안을 스트리밍합니다.
    async fn review_document(&self, paragraph: &str) -> Result<FragmentStream, AiError>;

    /// (문서, 문단, 기존 제안)을 받아 제안을 반영한 수정문을 스트리밍합니다.
    async fn incorporate_suggestions(
        &self,
        document: &str,
        paragraph: &str,
        suggestion: &str,
    ) -> Result<FragmentStream, AiError>;
}

/// 문단 검토용 시스템 프롬프트.
/// 리뷰어는 HTML이 아닌 순수 텍스트만 받는다고 가정합니다.
const REVIEW_SYSTEM_PROMPT: &str = "You are an experienced writing reviewer. \
The user sends a passage of plain text (never HTML). \
Reply with concise, concrete suggestions for improving the passage: \
clarity, structure, word choice, and flow. Reply in plain text.";

/// 제안 반영용 시스템 프롬프트
const INCORPORATE_SYSTEM_PROMPT: &str = "You are an editor. \
You receive a document, a paragraph from it, and a reviewer suggestion. \
Rewrite the paragraph so that it incorporates the suggestion. \
Reply with the revised text only, in plain text.";

/// OpenAI 호환 chat-completions API를 사용하는 리뷰어 구현
pub struct OpenAiReviewer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiReviewer {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.ai_base_url.clone(),
            api_key: config.ai_api_key.clone(),
            model: config.ai_model.clone(),
        }
    }

    /// chat-completions 스트리밍 요청을 보내고 fragment 스트림을 돌려줍니다.
    ///
    /// 응답 본문은 SSE 형식입니다:
    /// `data: {"choices":[{"delta":{"content":"..."}}]}` 줄이 반복되고
    /// `data: [DONE]` 으로 끝납니다. 바이트 청크 경계는 줄 경계와 무관하므로
    /// `SseDecoder`가 줄 단위로 버퍼링하며 해석합니다.
    async fn stream_chat(&self, system: &str, user: String) -> Result<FragmentStream, AiError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "stream": true,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": user },
                ],
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // 에러 본문은 조각 스트림이 아니라 통째로 읽어 에러에 담습니다.
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut decoder = SseDecoder::default();
        let fragments = response
            .bytes_stream()
            .flat_map(move |chunk| {
                let results = match chunk {
                    Ok(bytes) => match decoder.feed(&bytes) {
                        Ok(fragments) => fragments.into_iter().map(Ok).collect::<Vec<_>>(),
                        Err(e) => vec![Err(e)],
                    },
                    Err(e) => vec![Err(AiError::Request(e))],
                };
                stream::iter(results)
            })
            .boxed();

        Ok(fragments)
    }
}

#[async_trait]
impl Reviewer for OpenAiReviewer {
    async fn review_document(&self, paragraph: &str) -> Result<FragmentStream, AiError> {
        self.stream_chat(REVIEW_SYSTEM_PROMPT, paragraph.to_string())
            .await
    }

    async fn incorporate_suggestions(
        &self,
        document: &str,
        paragraph: &str,
        suggestion: &str,
    ) -> Result<FragmentStream, AiError> {
        let user = format!(
            "Document:\n{document}\n\nParagraph:\n{paragraph}\n\nSuggestion:\n{suggestion}"
        );
        self.stream_chat(INCORPORATE_SYSTEM_PROMPT, user).await
    }
}

// ─── SSE 해석 ────────────────────────────────────────────────────────────────

/// chat-completions 스트리밍 이벤트의 필요한 부분만 본뜬 구조체들.
/// 관심 없는 필드는 serde가 무시합니다.
#[derive(Deserialize)]
struct StreamEvent {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// SSE 바이트 청크를 줄 단위로 버퍼링하며 텍스트 조각으로 바꾸는 디코더.
///
/// HTTP 청크 경계는 SSE 줄 경계와 일치하지 않습니다. 멀티바이트 문자가
/// 청크 사이에서 잘릴 수도 있으므로, 완성된 줄(`\n`까지)만 UTF-8로
/// 해석합니다.
#[derive(Default)]
struct SseDecoder {
    buf: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    /// 바이트 청크 하나를 먹이고, 그 안에서 완성된 조각들을 반환합니다.
    fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>, AiError> {
        if self.done {
            return Ok(Vec::new());
        }
        self.buf.extend_from_slice(chunk);

        let mut fragments = Vec::new();
        while let Some(newline) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=newline).collect();
            let line = std::str::from_utf8(&line)
                .map_err(|_| AiError::Protocol("stream line is not valid UTF-8".to_string()))?
                .trim();

            // "data:" 줄 외(빈 줄, 주석 줄)는 건너뜁니다.
            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.trim_start();

            // [DONE] 이후의 바이트는 의미가 없으므로 버립니다.
            if data == "[DONE]" {
                self.done = true;
                self.buf.clear();
                break;
            }

            let event: StreamEvent = serde_json::from_str(data)
                .map_err(|e| AiError::Protocol(format!("bad stream event: {e}")))?;
            if let Some(content) = event
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
            {
                fragments.push(content);
            }
        }

        Ok(fragments)
    }
}
