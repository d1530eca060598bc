use sqlx::SqlitePool;

use super::TableBase;
use crate::database::error::DatabaseError;
use crate::database::model::RegionModel;

/// Canonical region catalog: the 24 oblasts plus Kyiv city, with the stable
/// uid each one has on the external alert source.
pub const REGION_CATALOG: [(&str, &str); 25] = [
    ("Вінницька область", "1"),
    ("Волинська область", "2"),
    ("Дніпропетровська область", "3"),
    ("Донецька область", "4"),
    ("Житомирська область", "5"),
    ("Закарпатська область", "6"),
    ("Запорізька область", "7"),
    ("Івано-Франківська область", "8"),
    ("Київська область", "9"),
    ("Кіровоградська область", "10"),
    ("Луганська область", "11"),
    ("Львівська область", "12"),
    ("Миколаївська область", "13"),
    ("Одеська область", "14"),
    ("Полтавська область", "15"),
    ("Рівненська область", "16"),
    ("Сумська область", "17"),
    ("Тернопільська область", "18"),
    ("Харківська область", "19"),
    ("Херсонська область", "20"),
    ("Хмельницька область", "21"),
    ("Черкаська область", "22"),
    ("Чернівецька область", "23"),
    ("Чернігівська область", "24"),
    ("м. Київ", "25"),
];

const COLUMNS: &str = "id, name, uid, alert_status, last_updated";

pub struct RegionTable {
    base: TableBase,
}

impl RegionTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: TableBase::new(pool),
        }
    }

    /// Seeds the region catalog. Idempotent: existing rows are left untouched.
    pub async fn seed(&self) -> Result<(), DatabaseError> {
        for (name, uid) in REGION_CATALOG {
            sqlx::query("INSERT OR IGNORE INTO regions (name, uid) VALUES (?, ?)")
                .bind(name)
                .bind(uid)
                .execute(&self.base.pool)
                .await?;
        }
        Ok(())
    }

    pub async fn select_all(&self) -> Result<Vec<RegionModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, RegionModel>(&format!(
            "SELECT {COLUMNS} FROM regions ORDER BY name"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    pub async fn select_by_name(&self, name: &str) -> Result<Option<RegionModel>, DatabaseError> {
        let model = sqlx::query_as::<_, RegionModel>(&format!(
            "SELECT {COLUMNS} FROM regions WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(model)
    }

    /// Refreshes the advisory status cache for the region with the given uid.
    pub async fn update_status(&self, uid: &str, status: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE regions SET alert_status = ?, last_updated = CURRENT_TIMESTAMP WHERE uid = ?",
        )
        .bind(status)
        .bind(uid)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }
}
