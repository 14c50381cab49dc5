//! Database operations using rusqlite.

use crate::attractions::{AddedGem, Attraction, MarkFound, NewAddedGem};
use crate::storage::schema::{
    CURRENT_VERSION, MIGRATION_V1_TO_V2, SCHEMA, SCHEMA_VERSION_TABLE, SEED_ATTRACTIONS,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::path::Path;
use thiserror::Error;

const ATTRACTION_COLUMNS: &str = "id, name, icon, lat, lon, description, isGem, isFound";

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    ///
    /// Bundled databases come without a `schema_version` table, so version 0
    /// may already hold the base tables; every step tolerates that.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
            self.record_version(1)?;
        }

        if from_version < 2 {
            if !self.has_column("addedGems", "created_at")? {
                self.conn
                    .execute_batch(MIGRATION_V1_TO_V2)
                    .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
            }
            self.record_version(2)?;
        }

        tracing::info!("Database migrated to version {}", CURRENT_VERSION);

        Ok(())
    }

    fn record_version(&self, version: i32) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                [version],
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .collect::<SqliteResult<Vec<_>>>()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(names.iter().any(|name| name == column))
    }

    // ========== Attractions ==========

    /// Get every attraction in storage order.
    pub fn list_attractions(&self) -> Result<Vec<Attraction>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {ATTRACTION_COLUMNS} FROM attractions ORDER BY id"
            ))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let attractions = stmt
            .query_map([], row_to_attraction)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .collect::<SqliteResult<Vec<_>>>()
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        Ok(attractions)
    }

    /// Get an attraction by ID.
    pub fn get_attraction(&self, id: i64) -> Result<Option<Attraction>, DatabaseError> {
        self.conn
            .query_row(
                &format!("SELECT {ATTRACTION_COLUMNS} FROM attractions WHERE id = ?1"),
                params![id],
                row_to_attraction,
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Insert an attraction with its own ID.
    pub fn insert_attraction(&self, attraction: &Attraction) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO attractions (id, name, icon, lat, lon, description, isGem, isFound)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    attraction.id,
                    attraction.name,
                    attraction.icon,
                    attraction.lat,
                    attraction.lon,
                    attraction.description,
                    attraction.is_gem,
                    attraction.is_found,
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    DatabaseError::ConstraintViolation(format!(
                        "attraction {} already exists",
                        attraction.id
                    ))
                }
                other => DatabaseError::QueryFailed(other.to_string()),
            })?;

        Ok(())
    }

    /// Set `isFound` for an attraction and return the updated row.
    ///
    /// Idempotent for rows already found; the flag is never cleared.
    /// `newly_found` is true only for the call whose update flipped the flag.
    pub fn mark_attraction_found(&self, id: i64) -> Result<MarkFound, DatabaseError> {
        let updated = self
            .conn
            .execute(
                "UPDATE attractions SET isFound = 1 WHERE id = ?1 AND isFound = 0",
                params![id],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let attraction = self
            .get_attraction(id)?
            .ok_or_else(|| DatabaseError::NotFound(format!("attraction {id}")))?;

        Ok(MarkFound {
            attraction,
            newly_found: updated > 0,
        })
    }

    /// Count stored attractions.
    pub fn count_attractions(&self) -> Result<i64, DatabaseError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM attractions", [], |row| row.get(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    /// Seed the demo attractions into an empty table.
    ///
    /// Returns the number of rows inserted (zero when data already exists).
    pub fn seed_demo_attractions(&self) -> Result<usize, DatabaseError> {
        if self.count_attractions()? > 0 {
            return Ok(0);
        }

        self.conn
            .execute_batch(SEED_ATTRACTIONS)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let seeded = self.count_attractions()? as usize;
        tracing::info!("Seeded {} demo attractions", seeded);
        Ok(seeded)
    }

    // ========== Added gems ==========

    /// Store a gem submission and return its ID.
    pub fn insert_added_gem(&self, gem: &NewAddedGem) -> Result<i64, DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO addedGems (name, image, lat, lon, comment, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    gem.name,
                    gem.image,
                    gem.lat,
                    gem.lon,
                    gem.comment,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Get a gem submission by ID.
    pub fn get_added_gem(&self, id: i64) -> Result<Option<AddedGem>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, image, lat, lon, comment, created_at
                 FROM addedGems WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        AddedGem {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            image: row.get(2)?,
                            lat: row.get(3)?,
                            lon: row.get(4)?,
                            comment: row.get(5)?,
                            created_at: None,
                        },
                        row.get::<_, Option<String>>(6)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let Some((mut gem, created_at)) = row else {
            return Ok(None);
        };

        gem.created_at = created_at
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| DatabaseError::DeserializationError(e.to_string()))
            })
            .transpose()?;

        Ok(Some(gem))
    }
}

fn row_to_attraction(row: &Row) -> SqliteResult<Attraction> {
    Ok(Attraction {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        lat: row.get(3)?,
        lon: row.get(4)?,
        description: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        is_gem: row.get::<_, i64>(6)? != 0,
        is_found: row.get::<_, i64>(7)? != 0,
    })
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}
