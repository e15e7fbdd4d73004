use crate::models::DocumentVersion;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

/// (document_id, version) 쌍으로 문서 한 건을 조회합니다. 없으면 None.
pub async fn get_version(
    pool: &SqlitePool,
    document_id: i64,
    version: i64,
) -> Result<Option<DocumentVersion>, sqlx::Error> {
    let row = sqlx::query_as::<_, DocumentVersion>(
        r#"
        SELECT document_id, version, content
        FROM document_versions
        WHERE document_id = ? AND version = ?
        "#,
    )
    .bind(document_id)
    .bind(version)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// 기존 (document_id, version) 행의 내용을 덮어씁니다.
/// 행이 없으면 아무 일도 일어나지 않습니다 (행을 새로 만들지 않음).
pub async fn save_version(
    pool: &SqlitePool,
    document_id: i64,
    version: i64,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE document_versions
        SET content = ?
        WHERE document_id = ? AND version = ?
        "#,
    )
    .bind(content)
    .bind(document_id)
    .bind(version)
    .execute(pool)
    .await?;

    Ok(())
}

/// 새 (document_id, version) 행을 추가합니다.
/// 같은 쌍이 이미 있으면 기본키 위반으로 sqlx::Error가 반환됩니다.
pub async fn create_version(
    pool: &SqlitePool,
    document_id: i64,
    version: i64,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO document_versions (document_id, version, content)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(document_id)
    .bind(version)
    .bind(content)
    .execute(pool)
    .await?;

    Ok(())
}

/// 저장소에 존재하는 모든 문서 id와 각 문서의 버전 번호 목록을 반환합니다.
/// 문서 id, 버전 번호 모두 오름차순으로 정렬됩니다.
pub async fn list_versions(pool: &SqlitePool) -> Result<BTreeMap<i64, Vec<i64>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT document_id, version
        FROM document_versions
        ORDER BY document_id, version
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut all_versions: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for (document_id, version) in rows {
        all_versions.entry(document_id).or_default().push(version);
    }

    Ok(all_versions)
}
