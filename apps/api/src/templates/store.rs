use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::template::TemplateRow;
use crate::uploads::StoredFile;

pub async fn insert_template(
    pool: &SqlitePool,
    owner_id: i64,
    original_filename: &str,
    stored: &StoredFile,
    content: &str,
) -> Result<TemplateRow, AppError> {
    let now = Utc::now();
    Ok(sqlx::query_as::<_, TemplateRow>(
        r#"
        INSERT INTO jade_templates
            (name, filename, file_path, content, description, is_active,
             created_at, updated_at, owner_id)
        VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(original_filename)
    .bind(&stored.filename)
    .bind(stored.path_string())
    .bind(content)
    .bind(format!("Jade template uploaded from {original_filename}"))
    .bind(now)
    .bind(now)
    .bind(owner_id)
    .fetch_one(pool)
    .await?)
}

/// Makes `template_id` the owner's only active template.
///
/// Runs as one transaction: every other template of the owner is cleared
/// first, then the target is set. If the target does not exist or belongs
/// to someone else, the transaction rolls back and nothing changes.
pub async fn set_active(
    pool: &SqlitePool,
    template_id: i64,
    owner_id: i64,
) -> Result<TemplateRow, AppError> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE jade_templates SET is_active = 0, updated_at = ? WHERE owner_id = ? AND id != ? AND is_active = 1",
    )
    .bind(now)
    .bind(owner_id)
    .bind(template_id)
    .execute(&mut *tx)
    .await?;

    let activated = sqlx::query_as::<_, TemplateRow>(
        "UPDATE jade_templates SET is_active = 1, updated_at = ? WHERE id = ? AND owner_id = ? RETURNING *",
    )
    .bind(now)
    .bind(template_id)
    .bind(owner_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(activated) = activated else {
        tx.rollback().await?;
        return Err(AppError::NotFound("Jade template not found".to_string()));
    };

    tx.commit().await?;
    info!("Activated template {template_id} for user {owner_id}");
    Ok(activated)
}

pub async fn find_active(pool: &SqlitePool, owner_id: i64) -> Result<Option<TemplateRow>, AppError> {
    Ok(sqlx::query_as::<_, TemplateRow>(
        "SELECT * FROM jade_templates WHERE owner_id = ? AND is_active = 1",
    )
    .bind(owner_id)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn user(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO users (email, username, hashed_password) VALUES (?, ?, 'h') RETURNING id",
        )
        .bind(format!("{name}@x.com"))
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn template(pool: &SqlitePool, owner: i64, name: &str) -> TemplateRow {
        let stored = StoredFile {
            filename: format!("1-{name}"),
            path: format!("uploads/jade_templates/1-{name}").into(),
            size: 3,
        };
        insert_template(pool, owner, name, &stored, "# T").await.unwrap()
    }

    async fn active_ids(pool: &SqlitePool, owner: i64) -> Vec<i64> {
        sqlx::query_scalar("SELECT id FROM jade_templates WHERE owner_id = ? AND is_active = 1")
            .bind(owner)
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_new_template_is_inactive() {
        let pool = test_pool().await;
        let owner = user(&pool, "a").await;
        let t = template(&pool, owner, "t.md").await;
        assert!(!t.is_active);
        assert_eq!(t.description.as_deref(), Some("Jade template uploaded from t.md"));
        assert!(find_active(&pool, owner).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exactly_one_active_after_any_sequence() {
        let pool = test_pool().await;
        let owner = user(&pool, "a").await;
        let ids: Vec<i64> = [
            template(&pool, owner, "a.md").await.id,
            template(&pool, owner, "b.md").await.id,
            template(&pool, owner, "c.md").await.id,
        ]
        .to_vec();

        for &id in [ids[0], ids[2], ids[2], ids[1], ids[0]].iter() {
            let row = set_active(&pool, id, owner).await.unwrap();
            assert!(row.is_active);
            assert_eq!(active_ids(&pool, owner).await, vec![id]);
        }
        assert_eq!(find_active(&pool, owner).await.unwrap().unwrap().id, ids[0]);
    }

    #[tokio::test]
    async fn test_activation_does_not_touch_other_owners() {
        let pool = test_pool().await;
        let alice = user(&pool, "alice").await;
        let bob = user(&pool, "bob").await;
        let a = template(&pool, alice, "a.md").await;
        let b = template(&pool, bob, "b.md").await;

        set_active(&pool, a.id, alice).await.unwrap();
        set_active(&pool, b.id, bob).await.unwrap();
        assert_eq!(active_ids(&pool, alice).await, vec![a.id]);
        assert_eq!(active_ids(&pool, bob).await, vec![b.id]);
    }

    #[tokio::test]
    async fn test_foreign_template_rolls_back() {
        let pool = test_pool().await;
        let alice = user(&pool, "alice").await;
        let bob = user(&pool, "bob").await;
        let mine = template(&pool, alice, "mine.md").await;
        let theirs = template(&pool, bob, "theirs.md").await;
        set_active(&pool, mine.id, alice).await.unwrap();

        let err = set_active(&pool, theirs.id, alice).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        // The failed attempt must not have cleared the existing active template.
        assert_eq!(active_ids(&pool, alice).await, vec![mine.id]);
        assert!(active_ids(&pool, bob).await.is_empty());
    }
}
