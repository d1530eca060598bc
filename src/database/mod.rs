use std::str::FromStr;

use log::debug;
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::database::error::DatabaseError;
use crate::database::table::BroadcastTable;
use crate::database::table::RegionTable;
use crate::database::table::ShelterTable;
use crate::database::table::SubscriberTable;

pub mod error;
pub mod model;
pub mod table;

pub struct Database {
    pub pool: SqlitePool,
    pub subscriber_table: SubscriberTable,
    pub region_table: RegionTable,
    pub shelter_table: ShelterTable,
    pub broadcast_table: BroadcastTable,
}

impl Database {
    pub async fn new(db_url: &str, db_path: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(db_path);
        if !path.exists() {
            debug!("Database path {db_path} does not exist. Creating...");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, "")?;
            info!("Created {db_path}");
        }

        debug!("Connecting to db...");
        let opts = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;
        info!("Connected to db.");

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        let subscriber_table = SubscriberTable::new(pool.clone());
        let region_table = RegionTable::new(pool.clone());
        let shelter_table = ShelterTable::new(pool.clone());
        let broadcast_table = BroadcastTable::new(pool.clone());

        Self {
            pool,
            subscriber_table,
            region_table,
            shelter_table,
            broadcast_table,
        }
    }

    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Seeds the fixed region catalog and starter shelter data. Safe to call
    /// on every startup.
    pub async fn seed(&self) -> Result<(), DatabaseError> {
        self.region_table.seed().await?;
        self.shelter_table.seed().await?;
        debug!("Seed data applied.");
        Ok(())
    }

    /// In-memory database with migrations applied, for tests.
    #[cfg(test)]
    pub(crate) async fn open_in_memory() -> Self {
        use sqlx::sqlite::SqlitePoolOptions;

        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid in-memory options")
            .foreign_keys(true);
        // One connection, or each pooled connection would see its own db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .expect("in-memory pool");

        let db = Self::from_pool(pool);
        db.run_migrations().await.expect("migrations");
        db
    }
}
