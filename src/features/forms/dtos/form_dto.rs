use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::forms::models::FormConfig;

/// A stored form as returned by the API.
///
/// `share_url` is the public submission link derived from the form id; the
/// publish dialog renders it directly (and uses it as the QR code target).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormResponseDto {
    pub id: Uuid,
    pub share_url: String,
    #[serde(flatten)]
    pub config: FormConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
