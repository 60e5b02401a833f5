use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted refresh-token id; rotation revokes the old row.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshToken {
    #[serde(rename = "_id")]
    pub jti: String,

    pub user: ObjectId,

    #[serde(default)]
    pub revoked: bool,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub expires_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}
