use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserInfo;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    pub agenda: String,
    pub date: NaiveDate,
    /// Wall-clock start, "HH:MM".
    pub time: String,
    pub link: String,
    pub organizer_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInput {
    pub title: String,
    pub agenda: String,
    pub date: NaiveDate,
    pub time: String,
    pub link: String,
    #[serde(default)]
    pub participants: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetails {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub participants: Vec<UserInfo>,
}

impl Meeting {
    pub fn new(input: &MeetingInput, organizer_id: Uuid) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            title: input.title.clone(),
            agenda: input.agenda.clone(),
            date: input.date,
            time: input.time.clone(),
            link: input.link.clone(),
            organizer_id,
            created_at: now,
            updated_at: now,
        }
    }
}
