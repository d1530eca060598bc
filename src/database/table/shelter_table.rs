use sqlx::SqlitePool;

use super::TableBase;
use crate::database::error::DatabaseError;
use crate::database::model::ShelterModel;

/// Starter shelter data, inserted only when the table is empty.
const SHELTER_SEED: [(&str, &str, &str, &str, i64); 10] = [
    (
        "Київська область",
        "Київ",
        "вул. Хрещатик, станція метро 'Хрещатик'",
        "метро",
        5000,
    ),
    (
        "Київська область",
        "Київ",
        "вул. Велика Васильківська, станція метро 'Палац Спорту'",
        "метро",
        4000,
    ),
    (
        "Київська область",
        "Київ",
        "Майдан Незалежності, станція метро 'Майдан Незалежності'",
        "метро",
        6000,
    ),
    (
        "Харківська область",
        "Харків",
        "пл. Свободи, станція метро 'Держпром'",
        "метро",
        3000,
    ),
    (
        "Харківська область",
        "Харків",
        "вул. Сумська, станція метро 'Університет'",
        "метро",
        2500,
    ),
    (
        "Дніпропетровська область",
        "Дніпро",
        "пр. Дмитра Яворницького, станція метро 'Центральна'",
        "метро",
        2000,
    ),
    (
        "Львівська область",
        "Львів",
        "пл. Ринок, підвал ратуші",
        "підвал",
        200,
    ),
    (
        "Одеська область",
        "Одеса",
        "вул. Дерибасівська, підвальні приміщення",
        "підвал",
        500,
    ),
    (
        "Сумська область",
        "Суми",
        "вул. Соборна, підвал ТЦ",
        "підвал",
        300,
    ),
    (
        "Полтавська область",
        "Полтава",
        "вул. Соборності, підвал адмінбудівлі",
        "підвал",
        250,
    ),
];

const COLUMNS: &str = "id, region, city, address, shelter_type, capacity, lat, lon, description";

pub struct ShelterTable {
    base: TableBase,
}

impl ShelterTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: TableBase::new(pool),
        }
    }

    /// Seeds starter shelters once; a non-empty table is left as-is.
    pub async fn seed(&self) -> Result<(), DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shelters")
            .fetch_one(&self.base.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }
        for (region, city, address, shelter_type, capacity) in SHELTER_SEED {
            sqlx::query(
                r#"
                INSERT INTO shelters (region, city, address, shelter_type, capacity)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(region)
            .bind(city)
            .bind(address)
            .bind(shelter_type)
            .bind(capacity)
            .execute(&self.base.pool)
            .await?;
        }
        Ok(())
    }

    pub async fn insert(&self, model: &ShelterModel) -> Result<i64, DatabaseError> {
        let res = sqlx::query(
            r#"
            INSERT INTO shelters (region, city, address, shelter_type, capacity, lat, lon, description)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&model.region)
        .bind(&model.city)
        .bind(&model.address)
        .bind(&model.shelter_type)
        .bind(model.capacity)
        .bind(model.lat)
        .bind(model.lon)
        .bind(&model.description)
        .execute(&self.base.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn select_by_region(&self, region: &str) -> Result<Vec<ShelterModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, ShelterModel>(&format!(
            "SELECT {COLUMNS} FROM shelters WHERE region LIKE ?"
        ))
        .bind(format!("%{region}%"))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    pub async fn select_by_city(&self, city: &str) -> Result<Vec<ShelterModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, ShelterModel>(&format!(
            "SELECT {COLUMNS} FROM shelters WHERE city LIKE ?"
        ))
        .bind(format!("%{city}%"))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use crate::database::Database;

    #[tokio::test]
    async fn test_seed_only_once() {
        let db = Database::open_in_memory().await;
        db.shelter_table.seed().await.unwrap();
        let first = db.shelter_table.select_by_city("Київ").await.unwrap().len();
        assert!(first > 0);

        db.shelter_table.seed().await.unwrap();
        let second = db.shelter_table.select_by_city("Київ").await.unwrap().len();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_insert_then_lookup_by_city() {
        let db = Database::open_in_memory().await;
        let id = db
            .shelter_table
            .insert(&crate::database::model::ShelterModel {
                id: 0,
                region: "Чернівецька область".to_string(),
                city: "Чернівці".to_string(),
                address: "вул. Головна, підвал школи".to_string(),
                shelter_type: "підвал".to_string(),
                capacity: 150,
                lat: None,
                lon: None,
                description: None,
            })
            .await
            .unwrap();
        assert!(id > 0);

        let hits = db.shelter_table.select_by_city("Чернівці").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].capacity, 150);
    }

    #[tokio::test]
    async fn test_select_by_region_containment() {
        let db = Database::open_in_memory().await;
        db.shelter_table.seed().await.unwrap();

        let hits = db
            .shelter_table
            .select_by_region("Харківська область")
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|s| s.city == "Харків"));
    }
}
