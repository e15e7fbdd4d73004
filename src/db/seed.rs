//! # 초기 데이터(Seed) 모듈
//!
//! 서버 첫 구동 시 에디터에서 바로 열어볼 수 있는 예시 문서를 넣어둡니다.
//! `INSERT OR IGNORE`를 사용하므로 재시작해도 기존 행을 건드리지 않습니다.

use sqlx::SqlitePool;

/// 문서 1, 버전 1의 본문
const DOCUMENT_1: &str = r#"# The Case for Slow Writing

Most first drafts fail for the same reason: they are written at the speed
of typing, not at the speed of thinking. When the words arrive faster than
the ideas, the paragraph fills up with connective tissue instead of claims.

A slower draft forces each sentence to earn its place. Before moving on,
ask what the sentence adds that the previous one did not. If the answer is
"emphasis", delete it. If the answer is "a new reason", keep it and make
the reason explicit.

The revision pass is where the essay is actually written. The draft only
exists so that revision has something to push against.
"#;

/// 문서 2의 본문 (버전 1~3이 같은 내용으로 시작합니다)
const DOCUMENT_2: &str = r#"# Notes on Giving Feedback

Useful feedback names the problem, not the fix. "This paragraph loses me
after the second sentence" tells the writer where to look. "Rewrite this
paragraph" tells them nothing.

Be specific about what worked, too. Writers repeat what gets praised, so
vague praise breeds vague writing.
"#;

/// 예시 문서를 저장소에 넣습니다. 이미 있으면 조용히 건너뜁니다.
pub async fn seed_documents(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // 문서 1은 버전 1 하나, 문서 2는 동일한 내용의 버전 1~3을 갖습니다.
    let rows: [(i64, i64, &str); 4] = [
        (1, 1, DOCUMENT_1),
        (2, 1, DOCUMENT_2),
        (2, 2, DOCUMENT_2),
        (2, 3, DOCUMENT_2),
    ];

    for (document_id, version, content) in rows {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO document_versions (document_id, version, content)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(document_id)
        .bind(version)
        .bind(content)
        .execute(pool)
        .await?;
    }

    Ok(())
}
