#![allow(dead_code)]

use chrono::{DateTime, Utc};
use poll_server::db::{self, user::InternalUser};
use poll_server::services::{
    auth::{self, Admin},
    poll::{self, CreatePoll, PollWithOptions},
};
use sqlx::SqlitePool;
use tracing::debug;

/// Fresh, migrated in-memory database per test. Users created here carry a
/// placeholder password hash, so they cannot log in over HTTP.
pub struct IntegrationTestDb {
    pool: SqlitePool,
}

impl IntegrationTestDb {
    pub async fn new() -> Self {
        let pool = db::new_memory_pool().await.unwrap();
        db::migrate(&pool).await.unwrap();
        debug!("Created integration test db");
        Self { pool }
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub async fn user(&self, username: &str) -> InternalUser {
        db::user::insert_user(&self.pool, username, "placeholder", false)
            .await
            .unwrap()
    }

    pub async fn admin(&self) -> Admin {
        let user = db::user::insert_user(&self.pool, "admin", "placeholder", true)
            .await
            .unwrap();
        auth::require_admin(user).unwrap()
    }

    pub async fn poll(
        &self,
        admin: &Admin,
        question: &str,
        options: &[&str],
        expiry: Option<DateTime<Utc>>,
        active: bool,
    ) -> PollWithOptions {
        let request = CreatePoll {
            question: question.to_owned(),
            options: options.iter().map(|o| o.to_string()).collect(),
            expiry,
            active,
        };
        poll::create_poll(&self.pool, admin, request, Utc::now())
            .await
            .unwrap()
    }

    pub async fn count(&self, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap();
        count
    }
}
