//! # 서비스 계층
//!
//! 라우트 핸들러가 호출하는 비즈니스 로직 모듈입니다.
//! - `ai`: LLM 리뷰어 경계(Reviewer 트레이트)와 OpenAI 호환 구현
//! - `assemble`: 리뷰어의 fragment 스트림을 완성된 문자열 하나로 조립

pub mod ai;
pub mod assemble;

pub use ai::{FragmentStream, OpenAiReviewer, Reviewer};
pub use assemble::assemble;
