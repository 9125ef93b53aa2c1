use anyhow::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{ActivityEntry, NewActivity};

#[derive(Clone)]
pub struct ActivityRepository {
    pool: SqlitePool,
}

impl ActivityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, activity: NewActivity) -> Result<ActivityEntry> {
        let metadata_json = activity
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let entry = ActivityEntry {
            id: Uuid::new_v4(),
            actor_id: activity.actor_id,
            entity_type: activity.entity_type,
            entity_id: activity.entity_id,
            action: activity.action,
            description: activity.description,
            metadata: metadata_json,
            ip_address: activity.ip_address,
            user_agent: activity.user_agent,
            created_at: chrono::Utc::now().naive_utc(),
        };

        sqlx::query(
            r#"
            INSERT INTO activity_log (
                id, actor_id, entity_type, entity_id, action, description,
                metadata, ip_address, user_agent, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id)
        .bind(entry.actor_id)
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.action)
        .bind(&entry.description)
        .bind(&entry.metadata)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<ActivityEntry>> {
        let entries = sqlx::query_as::<_, ActivityEntry>(
            r#"
            SELECT id, actor_id, entity_type, entity_id, action, description,
                   metadata, ip_address, user_agent, created_at
            FROM activity_log
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
