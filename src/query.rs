use chrono::NaiveDate;
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::dates::parse_query_date;
use crate::db::{find_log_record, get_user};
use crate::error::AppError;
use crate::models::ExerciseEntry;

/// Validated log query. Construction fails before any store access when a
/// parameter is malformed, so a bad query never returns partial results.
#[derive(Debug, Default, Clone)]
pub struct LogQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl LogQuery {
    pub fn from_raw(
        from: Option<&str>,
        to: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            from: from.map(parse_query_date).transpose()?,
            to: to.map(parse_query_date).transpose()?,
            limit: limit.map(parse_limit).transpose()?,
        })
    }
}

fn parse_limit(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n as usize),
        Ok(n) => Err(AppError::InvalidQuery(format!(
            "limit must be a positive integer, got {}",
            n
        ))),
        Err(_) => Err(AppError::InvalidQuery(format!(
            "limit must be a positive integer, got '{}'",
            raw
        ))),
    }
}

/// A user's log after filtering. `count` is the length of `entries`, not the
/// stored total: filters and limit apply before counting.
#[derive(Debug)]
pub struct FilteredLog {
    pub user_id: i64,
    pub username: String,
    pub count: usize,
    pub entries: Vec<ExerciseEntry>,
}

/// Fetches the user's log record and applies the inclusive from/to range and
/// the limit, preserving submission order throughout. A user with no record
/// yet has an empty log, not an error.
#[instrument(skip(pool))]
pub async fn get_log(
    pool: &Pool<Sqlite>,
    user_id: i64,
    query: &LogQuery,
) -> Result<FilteredLog, AppError> {
    let user = get_user(pool, user_id).await?;

    let entries = match find_log_record(pool, &user.username).await? {
        Some(record) => record.entries,
        None => Vec::new(),
    };

    let entries: Vec<ExerciseEntry> = entries
        .into_iter()
        .filter(|e| query.from.map_or(true, |from| e.date >= from))
        .filter(|e| query.to.map_or(true, |to| e.date <= to))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();

    info!(username = %user.username, returned = entries.len(), "Filtered exercise log");

    Ok(FilteredLog {
        user_id: user.id,
        username: user.username,
        count: entries.len(),
        entries,
    })
}
