use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:animal_registry.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database, honoring an override from the environment
    pub async fn init() -> Result<Self> {
        let url = std::env::var("ANIMAL_REGISTRY_DB").unwrap_or_else(|_| DATABASE_URL.to_string());
        Self::new(&url).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Create animals table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS animals (
                id TEXT PRIMARY KEY,
                nfc_id TEXT NOT NULL,
                name TEXT NOT NULL,
                birthdate TEXT NOT NULL,
                race TEXT NOT NULL,
                gender TEXT NOT NULL,
                owner_id TEXT NOT NULL,
                is_lost BOOLEAN NOT NULL DEFAULT FALSE,
                lost_since TEXT,
                lost_notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Each NFC tag identifies exactly one animal
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS ux_animals_nfc_id
            ON animals(nfc_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for owner filtering
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_animals_owner_id
            ON animals(owner_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for the lost-animals listing
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_animals_is_lost
            ON animals(is_lost);
            "#,
        )
        .execute(pool)
        .await?;

        // Create ownership_transfer_requests table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ownership_transfer_requests (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL,
                current_owner_id TEXT NOT NULL,
                new_owner_id TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                requested_at TEXT NOT NULL,
                responded_at TEXT,
                notes TEXT,
                FOREIGN KEY (animal_id) REFERENCES animals (id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // At most one pending request per animal; the authority under
        // concurrent requesters
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS ux_transfer_requests_pending
            ON ownership_transfer_requests(animal_id) WHERE status = 'pending';
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for incoming-transfer queries (badge + list)
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_transfer_requests_new_owner
            ON ownership_transfer_requests(new_owner_id, status);
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for outgoing-transfer history
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_transfer_requests_current_owner
            ON ownership_transfer_requests(current_owner_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
