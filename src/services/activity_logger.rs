use actix_web::HttpRequest;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::NewActivity;
use crate::database::repositories::ActivityRepository;
use crate::middleware::RequestInfo;

/// Best-effort audit trail. A failed write is logged and swallowed: the
/// feed must never fail the request that triggered it.
#[derive(Clone)]
pub struct ActivityLogger {
    repository: ActivityRepository,
}

impl ActivityLogger {
    pub fn new(repository: ActivityRepository) -> Self {
        Self { repository }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn log(
        &self,
        actor_id: Option<Uuid>,
        entity_type: &str,
        entity_id: Uuid,
        action: &str,
        description: String,
        metadata: Option<HashMap<String, serde_json::Value>>,
        req: &HttpRequest,
    ) {
        let info = RequestInfo::lookup(req);

        let activity = NewActivity {
            actor_id,
            entity_type: entity_type.to_string(),
            entity_id,
            action: action.to_string(),
            description,
            metadata,
            ip_address: info.ip_address,
            user_agent: info.user_agent,
        };

        if let Err(err) = self.repository.record(activity).await {
            log::warn!("Failed to record activity entry: {}", err);
        }
    }

    /// Flat string map for an entry's metadata column.
    pub fn detail(pairs: &[(&str, &str)]) -> Option<HashMap<String, serde_json::Value>> {
        Some(
            pairs
                .iter()
                .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
                .collect(),
        )
    }
}
