//! Database connection manager
//!
//! Provides database-agnostic connection management for SQLite and
//! PostgreSQL. Timestamps are stored as Unix epoch seconds and week keys as
//! ISO `YYYY-MM-DD` text so both dialects share one query surface.

use anyhow::Result;
use sqlx::{query, AnyPool};
use tracing::{debug, info};

use super::types::DatabaseType;

/// Database connection manager
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    pub pool: AnyPool,
    pub database_type: DatabaseType,
}

impl DatabaseManager {
    /// Create a new database manager with the given connection URL
    pub async fn new(database_url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();
        let database_type = DatabaseType::from_url(database_url);

        info!("Connecting to database ({})", database_type);

        let pool = AnyPool::connect(database_url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

        debug!("Successfully connected to {} database", database_type);

        Ok(Self {
            pool,
            database_type,
        })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations for {}", self.database_type);

        match self.database_type {
            DatabaseType::Sqlite => self.create_sqlite_tables().await?,
            DatabaseType::Postgres => self.create_postgres_tables().await?,
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Create SQLite-specific tables
    async fn create_sqlite_tables(&self) -> Result<()> {
        // Focus sessions recorded by the timer feature
        query(
            r#"
            CREATE TABLE IF NOT EXISTS focus_sessions (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL DEFAULT 0 CHECK (duration_minutes >= 0),
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        query("CREATE INDEX IF NOT EXISTS idx_focus_sessions_created_at ON focus_sessions (created_at)")
            .execute(&self.pool)
            .await?;

        // Kanban tasks; the aggregation reads only completed ones
        query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                board_column TEXT NOT NULL DEFAULT 'backlog'
                    CHECK (board_column IN ('backlog', 'today', 'doing', 'done')),
                priority TEXT NOT NULL DEFAULT 'medium'
                    CHECK (priority IN ('low', 'medium', 'high')),
                size TEXT CHECK (size IN ('small', 'medium', 'large')),
                completed_at INTEGER,
                estimated_time_minutes INTEGER CHECK (estimated_time_minutes > 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        query("CREATE INDEX IF NOT EXISTS idx_tasks_completed_at ON tasks (completed_at)")
            .execute(&self.pool)
            .await?;

        // Weekly aggregates, one row per user and week
        query(
            r#"
            CREATE TABLE IF NOT EXISTS weekly_reports (
                user_id TEXT NOT NULL,
                week_start_date TEXT NOT NULL,
                total_focus_minutes INTEGER NOT NULL DEFAULT 0,
                longest_task_title TEXT,
                longest_task_minutes INTEGER,
                estimation_precision_percent INTEGER,
                UNIQUE (user_id, week_start_date)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("SQLite tables created successfully");
        Ok(())
    }

    /// Create PostgreSQL-specific tables
    async fn create_postgres_tables(&self) -> Result<()> {
        query(
            r#"
            CREATE TABLE IF NOT EXISTS focus_sessions (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL DEFAULT 0 CHECK (duration_minutes >= 0),
                created_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        query("CREATE INDEX IF NOT EXISTS idx_focus_sessions_created_at ON focus_sessions (created_at)")
            .execute(&self.pool)
            .await?;

        query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                board_column TEXT NOT NULL DEFAULT 'backlog'
                    CHECK (board_column IN ('backlog', 'today', 'doing', 'done')),
                priority TEXT NOT NULL DEFAULT 'medium'
                    CHECK (priority IN ('low', 'medium', 'high')),
                size TEXT CHECK (size IN ('small', 'medium', 'large')),
                completed_at BIGINT,
                estimated_time_minutes INTEGER CHECK (estimated_time_minutes > 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        query("CREATE INDEX IF NOT EXISTS idx_tasks_completed_at ON tasks (completed_at)")
            .execute(&self.pool)
            .await?;

        query(
            r#"
            CREATE TABLE IF NOT EXISTS weekly_reports (
                user_id TEXT NOT NULL,
                week_start_date TEXT NOT NULL,
                total_focus_minutes BIGINT NOT NULL DEFAULT 0,
                longest_task_title TEXT,
                longest_task_minutes BIGINT,
                estimation_precision_percent INTEGER,
                UNIQUE (user_id, week_start_date)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("PostgreSQL tables created successfully");
        Ok(())
    }

    /// Test database connection
    pub async fn test_connection(&self) -> Result<()> {
        query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Database connection test failed: {}", e))?;

        debug!("Database connection test successful");
        Ok(())
    }
}
