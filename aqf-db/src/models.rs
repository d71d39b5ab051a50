//! Result types returned by store operations.

use serde::Serialize;

/// Outcome of [`Database::upsert_daily_record`](crate::Database::upsert_daily_record).
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "action", content = "id", rename_all = "lowercase")]
pub enum Upsert {
    /// A new row was created with this id.
    Inserted(i64),
    /// The existing row with this id was overwritten.
    Updated(i64),
}

impl Upsert {
    pub fn id(&self) -> i64 {
        match self {
            Upsert::Inserted(id) | Upsert::Updated(id) => *id,
        }
    }
}
