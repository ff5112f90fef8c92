use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::types::Reminder;

#[derive(Debug)]
pub enum StoreError {
    Db(sqlx::Error),
    Parse(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err)
    }
}

/// Appends one audit row recording what was communicated to a user.
pub async fn append_reminder(
    pool: &SqlitePool,
    user_id: i64,
    message: &str,
) -> Result<Reminder, StoreError> {
    let id = Uuid::new_v4();
    let created_at = format_utc(Utc::now());

    sqlx::query(
        r#"
        INSERT INTO reminders (id, user_id, message, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(user_id)
    .bind(message)
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(Reminder {
        id,
        user_id,
        message: message.to_string(),
        created_at,
    })
}

pub async fn list_reminders(pool: &SqlitePool, user_id: i64) -> Result<Vec<Reminder>, StoreError> {
    let rows: Vec<ReminderRow> = sqlx::query_as(
        r#"
        SELECT id, user_id, message, created_at
        FROM reminders
        WHERE user_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ReminderRow::try_into).collect()
}

#[derive(sqlx::FromRow)]
struct ReminderRow {
    id: String,
    user_id: i64,
    message: String,
    created_at: String,
}

impl TryFrom<ReminderRow> for Reminder {
    type Error = StoreError;

    fn try_from(row: ReminderRow) -> Result<Self, Self::Error> {
        Ok(Reminder {
            id: Uuid::parse_str(&row.id)
                .map_err(|err| StoreError::Parse(format!("invalid reminder id: {err}")))?,
            user_id: row.user_id,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

fn format_utc(dt: chrono::DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}
