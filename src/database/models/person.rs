use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `people` relation.
///
/// `id == 0` means the record has not been persisted yet. Timestamps are
/// owned by the auditing observer; callers only ever set the name fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Person {
    /// Unsaved person; `created_at` is a placeholder until the first save stamps it
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at: DateTime::<Utc>::default(),
            updated_at: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
