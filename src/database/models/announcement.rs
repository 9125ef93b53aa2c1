use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: AnnouncementCategory,
    pub priority: AnnouncementPriority,
    pub visibility: AnnouncementVisibility,
    pub scheduled_date: Option<NaiveDate>,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum AnnouncementCategory {
        General => "general",
        Policy => "policy",
        Event => "event",
        Holiday => "holiday",
        Urgent => "urgent",
    }
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum AnnouncementPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum AnnouncementVisibility {
        AllEmployees => "all_employees",
        ManagersOnly => "managers_only",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementInput {
    pub title: String,
    pub description: String,
    pub category: Option<AnnouncementCategory>,
    pub priority: Option<AnnouncementPriority>,
    pub visibility: Option<AnnouncementVisibility>,
    pub scheduled_date: Option<NaiveDate>,
}

impl Announcement {
    pub fn new(input: AnnouncementInput, created_by: Uuid) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            category: input.category.unwrap_or(AnnouncementCategory::General),
            priority: input.priority.unwrap_or(AnnouncementPriority::Medium),
            visibility: input.visibility.unwrap_or(AnnouncementVisibility::AllEmployees),
            scheduled_date: input.scheduled_date,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn visible_to_everyone(&self) -> bool {
        self.visibility == AnnouncementVisibility::AllEmployees
    }
}
