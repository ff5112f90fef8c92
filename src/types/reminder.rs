use serde::{Deserialize, Serialize};
use specta::Type;
use uuid::Uuid;

/// One audit row: user X was told Y at time T.
#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: i64,
    pub message: String,
    pub created_at: String,
}

/// Result of a full reminder orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct ReminderSummary {
    pub user_id: i64,
    pub pending_count: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct ReminderResponse {
    pub mensaje: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct ListRemindersResponse {
    pub recordatorios: Vec<Reminder>,
}
