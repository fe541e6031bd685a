use newsroom_types::{ArticleUpdate, Comment};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EVENT_COMMENT: &str = "comment";
pub const EVENT_ARTICLE_UPDATE: &str = "article:update";

/// Frame pushed to live-update clients: `{"type":"event","event":..,"data":..}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayEvent {
    #[serde(rename = "type")]
    pub frame_type: String,
    pub event: String,
    pub data: Value,
}

impl GatewayEvent {
    pub fn new(event: &str, data: Value) -> Self {
        Self {
            frame_type: "event".to_string(),
            event: event.to_string(),
            data,
        }
    }

    pub fn comment(comment: &Comment) -> Self {
        Self::new(EVENT_COMMENT, serde_json::to_value(comment).unwrap_or(Value::Null))
    }

    pub fn article_update(update: &ArticleUpdate) -> Self {
        Self::new(
            EVENT_ARTICLE_UPDATE,
            serde_json::to_value(update).unwrap_or(Value::Null),
        )
    }
}
