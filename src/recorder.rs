use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::dates;
use crate::db::{append_exercise, get_user};
use crate::error::AppError;
use crate::models::ExerciseEntry;

#[derive(Debug)]
pub struct ExerciseSubmission {
    pub description: String,
    pub duration: i64,
    pub date: Option<String>,
}

/// The stored entry together with the resolved user, for response shaping.
#[derive(Debug)]
pub struct RecordedExercise {
    pub user_id: i64,
    pub username: String,
    pub entry: ExerciseEntry,
}

/// Validates and normalizes one exercise submission and appends it to the
/// submitting user's log record. A bad date is not a submission failure:
/// it is silently replaced with the current date. Durations pass through
/// unchecked, negative or zero included.
#[instrument(skip(pool))]
pub async fn record(
    pool: &Pool<Sqlite>,
    user_id: i64,
    submission: ExerciseSubmission,
) -> Result<RecordedExercise, AppError> {
    let user = get_user(pool, user_id).await?;

    let entry = ExerciseEntry {
        description: submission.description,
        duration: submission.duration,
        date: dates::submission_date(submission.date.as_deref()),
    };

    append_exercise(pool, &user.username, &entry).await?;

    info!(username = %user.username, "Recorded exercise");

    Ok(RecordedExercise {
        user_id: user.id,
        username: user.username,
        entry,
    })
}
