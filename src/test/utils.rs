use crate::db::{append_exercise, create_user};
use crate::error::AppError;
use crate::models::ExerciseEntry;
use chrono::NaiveDate;
use rocket::local::asynchronous::Client;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::sync::Once;
use tracing::log::LevelFilter;

static INIT: Once = Once::new();

#[derive(Default)]
pub struct TestDbBuilder {
    users: Vec<String>,
    exercises: Vec<TestExercise>,
}

pub struct TestExercise {
    pub username: String,
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl TestDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, username: &str) -> Self {
        self.users.push(username.to_string());
        self
    }

    pub fn exercise(mut self, username: &str, description: &str, duration: i64, date: &str) -> Self {
        self.exercises.push(TestExercise {
            username: username.to_string(),
            description: description.to_string(),
            duration,
            date: date.to_string(),
        });
        self
    }

    pub async fn build(self) -> Result<TestDb, AppError> {
        INIT.call_once(|| {
            let _ = env_logger::builder()
                .filter_level(LevelFilter::Debug)
                .is_test(true)
                .try_init();
        });

        // A plain in-memory database is per-connection; one connection keeps
        // every query in the test on the same store.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations run against the in-memory database");

        let mut user_id_map: HashMap<String, i64> = HashMap::new();

        for username in &self.users {
            let user = create_user(&pool, username).await?;
            user_id_map.insert(username.clone(), user.id);
        }

        for exercise in &self.exercises {
            let entry = ExerciseEntry {
                description: exercise.description.clone(),
                duration: exercise.duration,
                date: NaiveDate::parse_from_str(&exercise.date, "%Y-%m-%d")
                    .expect("test exercise dates are ISO"),
            };

            append_exercise(&pool, &exercise.username, &entry).await?;
        }

        Ok(TestDb { pool, user_id_map })
    }
}

pub struct TestDb {
    pub pool: Pool<Sqlite>,
    pub user_id_map: HashMap<String, i64>,
}

impl TestDb {
    pub fn user_id(&self, username: &str) -> i64 {
        self.user_id_map[username]
    }
}

/// Two users; alice has three exercises across January 2024, bob has none.
pub async fn create_standard_test_db() -> TestDb {
    TestDbBuilder::new()
        .user("alice")
        .user("bob")
        .exercise("alice", "running", 30, "2024-01-01")
        .exercise("alice", "swimming", 45, "2024-01-10")
        .exercise("alice", "cycling", 60, "2024-01-20")
        .build()
        .await
        .expect("failed to build test db")
}

pub async fn setup_test_client(test_db: TestDb) -> (Client, TestDb) {
    let rocket = crate::init_rocket(test_db.pool.clone()).await;
    let client = Client::tracked(rocket)
        .await
        .expect("valid rocket instance");

    (client, test_db)
}
