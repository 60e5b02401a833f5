use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::models::notification::{NotificationKind, ReferenceType};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user: ObjectId,

    pub kind: NotificationKind,

    pub title: String,

    pub body: String,

    #[serde(default)]
    pub is_read: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<ObjectId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<ReferenceType>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}
