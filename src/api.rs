use rocket::Request;
use rocket::State;
use rocket::response::status::Custom;
use rocket::serde::{Deserialize, Serialize, json::Json};
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::dates::display_date;
use crate::db::{create_user, get_all_users};
use crate::error::{AppError, ErrorBody};
use crate::models::User;
use crate::query::{FilteredLog, LogQuery, get_log};
use crate::recorder::{ExerciseSubmission, RecordedExercise, record};
use crate::validation::JsonValidateExt;
use crate::validation::ToErrorPayload;

#[derive(Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "username is required"))]
    username: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[post("/users", data = "<user>")]
pub async fn api_create_user(
    user: Json<CreateUserRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<UserResponse>, Custom<Json<ErrorBody>>> {
    let request = user.validate_custom()?;

    let created = create_user(db, &request.username).await.or_error_payload()?;

    Ok(Json(UserResponse::from(created)))
}

#[get("/users")]
pub async fn api_get_users(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = get_all_users(db).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[derive(Deserialize)]
pub struct LogExerciseRequest {
    description: String,
    #[serde(deserialize_with = "deserialize_duration")]
    duration: i64,
    #[serde(default)]
    date: Option<String>,
}

// Duration arrives as a JSON number or a numeric string; both coerce to an
// integer. No range validation: zero and negative durations pass through.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Number(i64),
        Text(String),
    }

    match RawDuration::deserialize(deserializer)? {
        RawDuration::Number(n) => Ok(n),
        RawDuration::Text(s) => s.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("duration must be an integer, got '{}'", s))
        }),
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ExerciseResponse {
    pub id: i64,
    pub username: String,
    pub date: String,
    pub duration: i64,
    pub description: String,
}

impl From<RecordedExercise> for ExerciseResponse {
    fn from(recorded: RecordedExercise) -> Self {
        Self {
            id: recorded.user_id,
            username: recorded.username,
            date: display_date(recorded.entry.date),
            duration: recorded.entry.duration,
            description: recorded.entry.description,
        }
    }
}

#[post("/users/<id>/exercises", data = "<exercise>")]
pub async fn api_log_exercise(
    id: i64,
    exercise: Json<LogExerciseRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<ExerciseResponse>, AppError> {
    let request = exercise.into_inner();

    let recorded = record(
        db,
        id,
        ExerciseSubmission {
            description: request.description,
            duration: request.duration,
            date: request.date,
        },
    )
    .await?;

    Ok(Json(ExerciseResponse::from(recorded)))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LogEntryResponse {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LogResponse {
    pub id: i64,
    pub username: String,
    pub count: usize,
    pub log: Vec<LogEntryResponse>,
}

impl From<FilteredLog> for LogResponse {
    fn from(filtered: FilteredLog) -> Self {
        Self {
            id: filtered.user_id,
            username: filtered.username,
            count: filtered.count,
            log: filtered
                .entries
                .into_iter()
                .map(|e| LogEntryResponse {
                    description: e.description,
                    duration: e.duration,
                    date: display_date(e.date),
                })
                .collect(),
        }
    }
}

#[get("/users/<id>/logs?<from>&<to>&<limit>")]
pub async fn api_get_logs(
    id: i64,
    from: Option<&str>,
    to: Option<&str>,
    limit: Option<&str>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<LogResponse>, AppError> {
    // Query parameters fail the whole request before any store access.
    let query = LogQuery::from_raw(from, to, limit)?;

    let filtered = get_log(db, id, &query).await?;

    Ok(Json(LogResponse::from(filtered)))
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[catch(404)]
pub fn not_found(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: format!("No route for {} {}", req.method(), req.uri()),
    })
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Bad request".to_string(),
    })
}

#[catch(422)]
pub fn unprocessable(_req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Request body could not be parsed".to_string(),
    })
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Internal server error".to_string(),
    })
}
