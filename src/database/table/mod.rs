pub mod broadcast_table;
pub mod region_table;
pub mod shelter_table;
pub mod subscriber_table;

pub use broadcast_table::BroadcastTable;
pub use region_table::RegionTable;
pub use shelter_table::ShelterTable;
pub use subscriber_table::SubscriberTable;

use sqlx::SqlitePool;

pub struct TableBase {
    pub pool: SqlitePool,
}

impl TableBase {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}
