use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Serialize, Clone, Debug)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// One logged exercise. Dates carry no time-of-day; entries are stored as
/// ISO calendar dates and formatted for display at the API boundary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExerciseEntry {
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

/// Per-user aggregate of every logged exercise plus a cached count.
/// At most one record exists per username; entries stay in submission order.
#[derive(Clone, Debug)]
pub struct LogRecord {
    pub username: String,
    pub count: i64,
    pub entries: Vec<ExerciseEntry>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbLogRecord {
    pub username: String,
    pub count: i64,
    pub entries: String, // JSON array of entries
}

impl TryFrom<DbLogRecord> for LogRecord {
    type Error = AppError;

    fn try_from(record: DbLogRecord) -> Result<Self, Self::Error> {
        let entries: Vec<ExerciseEntry> = serde_json::from_str(&record.entries)
            .map_err(|e| AppError::Database(sqlx::Error::Decode(e.into())))?;

        Ok(Self {
            username: record.username,
            count: record.count,
            entries,
        })
    }
}
