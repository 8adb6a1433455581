//! Team data structures: canonical records and the snapshots tournaments embed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and lookups).
pub type TeamId = Uuid;

/// Opaque reference to the user that created a record.
pub type UserId = String;

/// A team. Tournaments embed copies of this record (snapshots), so deleting
/// the canonical record never retroactively alters past tournaments.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Display color tag (e.g. "#1e88e5" or "royal blue").
    pub color: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with a fresh id and the current timestamp.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        created_by: impl Into<UserId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }
}
