use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

/// A service provider. Masters are managed by external admin tooling;
/// this backend only reads them.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Master {
    pub id: Uuid,
    pub display_name: String,
    pub phone: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
