//! # 제안 스트림 조립기 (Suggestion Stream Assembler)
//!
//! 리뷰어가 흘려보내는 텍스트 조각(fragment) 스트림을
//! 완성된 문자열 하나로 합치는 모듈입니다.
//!
//! 계약:
//! - 빈 조각은 버리고, 나머지는 도착 순서 그대로 이어 붙입니다.
//! - 스트림이 끝나기 전에는 아무것도 내보내지 않습니다.
//!   중간에 조각 하나라도 실패하면 부분 결과 없이 에러만 반환합니다.
//! - 내용 검증은 하지 않습니다. 조립된 텍스트를 보내도 되는지는
//!   호출 측(세션)이 판단합니다.

use crate::error::AiError;
use futures_util::{pin_mut, Stream, StreamExt};

/// fragment 스트림을 끝까지 소비해 완성된 문자열 하나를 만듭니다.
///
/// 스트림이 비어 있으면 빈 문자열이 됩니다 (에러가 아님).
pub async fn assemble<S>(fragments: S) -> Result<String, AiError>
where
    S: Stream<Item = Result<String, AiError>>,
{
    pin_mut!(fragments);

    let mut assembled = String::new();
    while let Some(fragment) = fragments.next().await {
        // `?`: 조각 하나가 실패하면 즉시 반환. assembled는 여기서 버려지므로
        // 부분 결과가 호출자에게 전달될 길이 없습니다.
        let fragment = fragment?;
        if !fragment.is_empty() {
            assembled.push_str(&fragment);
        }
    }

    Ok(assembled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn concatenates_fragments_in_arrival_order() {
        let fragments = stream::iter(vec![
            Ok("Sug".to_string()),
            Ok("gest".to_string()),
            Ok("ion A".to_string()),
        ]);
        assert_eq!(assemble(fragments).await.unwrap(), "Suggestion A");
    }

    #[tokio::test]
    async fn skips_empty_fragments() {
        let fragments = stream::iter(vec![
            Ok(String::new()),
            Ok("only".to_string()),
            Ok(String::new()),
            Ok(" this".to_string()),
        ]);
        assert_eq!(assemble(fragments).await.unwrap(), "only this");
    }

    #[tokio::test]
    async fn empty_stream_yields_empty_string() {
        let fragments = stream::iter(Vec::<Result<String, AiError>>::new());
        assert_eq!(assemble(fragments).await.unwrap(), "");
    }

    #[tokio::test]
    async fn mid_stream_failure_discards_partial_result() {
        let fragments = stream::iter(vec![
            Ok("partial".to_string()),
            Err(AiError::Protocol("stream broke".to_string())),
            Ok("never read".to_string()),
        ]);
        let err = assemble(fragments).await.unwrap_err();
        assert!(matches!(err, AiError::Protocol(_)));
    }
}
