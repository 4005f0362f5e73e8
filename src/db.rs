use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{DbLogRecord, DbUser, ExerciseEntry, LogRecord, User};

#[instrument(skip(pool))]
pub async fn create_user(pool: &Pool<Sqlite>, username: &str) -> Result<User, AppError> {
    info!("Creating new user");

    let existing_user = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::DuplicateUsername(username.to_string()));
    }

    // Two concurrent registrations can both pass the check above; the UNIQUE
    // constraint resolves that race and maps back to the same error.
    let res = sqlx::query("INSERT INTO users (username) VALUES (?)")
        .bind(username)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateUsername(username.to_string())
            }
            _ => AppError::Database(e),
        })?;

    Ok(User {
        id: res.last_insert_rowid(),
        username: username.to_string(),
    })
}

#[instrument(skip(pool))]
pub async fn get_all_users(pool: &Pool<Sqlite>) -> Result<Vec<User>, AppError> {
    info!("Getting all users");
    let rows = sqlx::query_as::<_, DbUser>("SELECT id, username FROM users")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(User::from).collect())
}

#[instrument(skip(pool))]
pub async fn get_user(pool: &Pool<Sqlite>, id: i64) -> Result<User, AppError> {
    info!("Fetching user by ID");
    let row = sqlx::query_as::<_, DbUser>("SELECT id, username FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(user) => Ok(User::from(user)),
        _ => Err(AppError::UserNotFound(id)),
    }
}

#[instrument(skip(pool))]
pub async fn find_log_record(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<Option<LogRecord>, AppError> {
    info!("Fetching log record");
    let row = sqlx::query_as::<_, DbLogRecord>(
        "SELECT username, count, entries FROM exercise_logs WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.map(LogRecord::try_from).transpose()
}

/// Appends one entry to the user's log record and bumps the cached count,
/// creating the record on first submission. A single upsert statement keeps
/// `count == entries.len()` under concurrent submissions: the append and the
/// increment cannot interleave with another writer.
#[instrument(skip(pool, entry))]
pub async fn append_exercise(
    pool: &Pool<Sqlite>,
    username: &str,
    entry: &ExerciseEntry,
) -> Result<(), AppError> {
    info!("Appending exercise to log record");
    let payload = serde_json::to_string(entry)
        .map_err(|e| AppError::Database(sqlx::Error::Encode(e.into())))?;

    sqlx::query(
        "INSERT INTO exercise_logs (username, count, entries)
         VALUES (?, 1, json_array(json(?)))
         ON CONFLICT(username) DO UPDATE
         SET count = count + 1,
             entries = json_insert(entries, '$[#]', json(?))",
    )
    .bind(username)
    .bind(&payload)
    .bind(&payload)
    .execute(pool)
    .await?;

    Ok(())
}
