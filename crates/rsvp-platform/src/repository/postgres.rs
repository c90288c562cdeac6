//! Postgres Guest Repository
//!
//! Every statement runs under the configured query deadline; an elapsed
//! deadline surfaces as an upstream error.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::future::Future;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use rsvp_config::DatabaseConfig;

use crate::domain::{Guest, GuestUpdate, RsvpStatus};
use crate::error::{PlatformError, Result};
use crate::repository::GuestRepository;

const GUEST_COLUMNS: &str = "id, name, email, family_side, hongbao, total_guests, rsvp_status, rsvp_token";

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS guests (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        family_side TEXT NOT NULL,
        hongbao DOUBLE PRECISION NOT NULL DEFAULT 0,
        total_guests INTEGER NOT NULL,
        rsvp_status TEXT NOT NULL DEFAULT 'Pending',
        rsvp_token TEXT NOT NULL UNIQUE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_guests_email ON guests(email)",
    "CREATE INDEX IF NOT EXISTS idx_guests_rsvp_status ON guests(rsvp_status)",
];

pub struct PgGuestRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgGuestRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self { pool, query_timeout }
    }

    /// Build a pool from configuration. The pool connects lazily.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy(&config.url)?;
        Ok(Self::new(pool, config.query_timeout()))
    }

    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            self.bounded(sqlx::query(statement).execute(&self.pool))
                .await?;
        }
        info!("Guest schema ready");
        Ok(())
    }

    async fn bounded<T, F>(&self, query: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(PlatformError::timeout("guest store")),
        }
    }

    async fn fetch_one_where(&self, column: &str, value: &str) -> Result<Option<Guest>> {
        let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE {column} = $1");
        let row = self
            .bounded(sqlx::query(&sql).bind(value).fetch_optional(&self.pool))
            .await?;
        row.as_ref().map(row_to_guest).transpose()
    }
}

fn row_to_guest(row: &PgRow) -> Result<Guest> {
    let status: String = row.try_get("rsvp_status")?;
    Ok(Guest {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        family_side: row.try_get("family_side")?,
        hongbao: row.try_get("hongbao")?,
        total_guests: row.try_get("total_guests")?,
        rsvp_status: RsvpStatus::from(status),
        rsvp_token: row.try_get("rsvp_token")?,
    })
}

#[async_trait]
impl GuestRepository for PgGuestRepository {
    async fn insert(&self, guest: &Guest) -> Result<()> {
        let sql = format!(
            "INSERT INTO guests ({GUEST_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        self.bounded(
            sqlx::query(&sql)
                .bind(guest.id)
                .bind(&guest.name)
                .bind(&guest.email)
                .bind(&guest.family_side)
                .bind(guest.hongbao)
                .bind(guest.total_guests)
                .bind(guest.rsvp_status.as_str())
                .bind(&guest.rsvp_token)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Guest>> {
        let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = $1");
        let row = self
            .bounded(sqlx::query(&sql).bind(id).fetch_optional(&self.pool))
            .await?;
        row.as_ref().map(row_to_guest).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Guest>> {
        self.fetch_one_where("email", email).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>> {
        self.fetch_one_where("rsvp_token", token).await
    }

    async fn find_all(&self) -> Result<Vec<Guest>> {
        let sql = format!("SELECT {GUEST_COLUMNS} FROM guests");
        let rows = self
            .bounded(sqlx::query(&sql).fetch_all(&self.pool))
            .await?;
        rows.iter().map(row_to_guest).collect()
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<Guest>> {
        let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE rsvp_status = $1");
        let rows = self
            .bounded(sqlx::query(&sql).bind(status).fetch_all(&self.pool))
            .await?;
        rows.iter().map(row_to_guest).collect()
    }

    async fn update_partial(&self, update: &GuestUpdate) -> Result<Option<Guest>> {
        // Merge happens in the statement itself so concurrent admin edits
        // cannot interleave a read and a write.
        let sql = format!(
            r#"
            UPDATE guests SET
                name = COALESCE(NULLIF($2, ''), name),
                email = COALESCE(NULLIF($3, ''), email),
                family_side = COALESCE(NULLIF($4, ''), family_side),
                hongbao = $5,
                total_guests = $6,
                rsvp_status = COALESCE(NULLIF($7, ''), rsvp_status)
            WHERE id = $1
            RETURNING {GUEST_COLUMNS}
            "#
        );
        let row = self
            .bounded(
                sqlx::query(&sql)
                    .bind(update.id)
                    .bind(&update.name)
                    .bind(&update.email)
                    .bind(&update.family_side)
                    .bind(update.hongbao)
                    .bind(update.total_guests)
                    .bind(&update.rsvp_status)
                    .fetch_optional(&self.pool),
            )
            .await?;
        row.as_ref().map(row_to_guest).transpose()
    }

    async fn update_rsvp(&self, token: &str, status: &RsvpStatus, total_guests: i32) -> Result<Option<Guest>> {
        let sql = format!(
            "UPDATE guests SET rsvp_status = $2, total_guests = $3 WHERE rsvp_token = $1 RETURNING {GUEST_COLUMNS}"
        );
        let row = self
            .bounded(
                sqlx::query(&sql)
                    .bind(token)
                    .bind(status.as_str())
                    .bind(total_guests)
                    .fetch_optional(&self.pool),
            )
            .await?;
        row.as_ref().map(row_to_guest).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = self
            .bounded(
                sqlx::query("DELETE FROM guests WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        self.bounded(sqlx::query("SELECT 1").execute(&self.pool))
            .await?;
        Ok(())
    }
}
