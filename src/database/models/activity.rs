use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: String,
    pub description: String,
    /// Raw JSON text; SQLite has no native JSON column.
    pub metadata: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub actor_id: Option<Uuid>,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: String,
    pub description: String,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

// What an entry points at.
#[allow(non_snake_case)]
pub mod EntityType {
    pub const USER: &str = "user";
    pub const ATTENDANCE: &str = "attendance";
    pub const LEAVE: &str = "leave";
    pub const ANNOUNCEMENT: &str = "announcement";
    pub const MEETING: &str = "meeting";
    pub const TASK: &str = "task";
    pub const LOAN: &str = "loan";
    pub const NOTICE_PERIOD: &str = "notice_period";
}

// What happened to it.
#[allow(non_snake_case)]
pub mod Action {
    pub const CREATED: &str = "created";
    pub const UPDATED: &str = "updated";
    pub const DELETED: &str = "deleted";
    pub const LOGIN: &str = "login";
    pub const LOGIN_FAILED: &str = "login_failed";
    pub const CLOCK_IN: &str = "clock_in";
    pub const CLOCK_OUT: &str = "clock_out";
    pub const APPLIED: &str = "applied";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
    pub const SUBMITTED: &str = "submitted";
    pub const DISBURSED: &str = "disbursed";
    pub const RECONCILE_FAILED: &str = "reconcile_failed";
}
