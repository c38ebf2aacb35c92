//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the PlaceStore trait.

use crate::output::{Category, Place};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PlaceStore, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::AtlasError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

const UPSERT_PLACE_SQL: &str = "
    INSERT INTO places (name, latitude, longitude, category, floor, url, building, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT(name) DO UPDATE SET
        latitude = excluded.latitude,
        longitude = excluded.longitude,
        category = excluded.category,
        floor = excluded.floor,
        url = excluded.url,
        building = excluded.building,
        updated_at = excluded.updated_at";

const PLACE_COLUMNS: &str = "name, latitude, longitude, category, floor, url, building";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(AtlasError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, AtlasError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, AtlasError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Place columns as stored, before the category is validated
struct PlaceRow {
    name: String,
    latitude: f64,
    longitude: f64,
    category: String,
    floor: i16,
    url: Option<String>,
    building: String,
}

impl PlaceRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            latitude: row.get(1)?,
            longitude: row.get(2)?,
            category: row.get(3)?,
            floor: row.get(4)?,
            url: row.get(5)?,
            building: row.get(6)?,
        })
    }

    fn into_place(self) -> StorageResult<Place> {
        let category = Category::from_db_string(&self.category)
            .ok_or(StorageError::InvalidCategory(self.category))?;

        Ok(Place {
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            category,
            floor: self.floor,
            url: self.url,
            building: self.building,
        })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        items_visited: row.get::<_, i64>(5)? as u64,
        places_located: row.get::<_, i64>(6)? as u64,
    })
}

fn upsert_with(conn: &Connection, place: &Place, now: &str) -> rusqlite::Result<usize> {
    conn.execute(
        UPSERT_PLACE_SQL,
        params![
            place.name,
            place.latitude,
            place.longitude,
            place.category.to_db_string(),
            place.floor,
            place.url,
            place.building,
            now,
        ],
    )
}

impl PlaceStore for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64, visited: u64, located: u64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, items_visited = ?3, places_located = ?4
             WHERE id = ?5",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                visited as i64,
                located as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status, items_visited, places_located
             FROM runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt.query_row([], run_from_row).optional()?;
        Ok(run)
    }

    // ===== Place Management =====

    fn upsert_place(&mut self, place: &Place) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        upsert_with(&self.conn, place, &now)?;
        Ok(())
    }

    fn upsert_places(&mut self, places: &[Place]) -> StorageResult<usize> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        for place in places {
            upsert_with(&tx, place, &now)?;
        }

        tx.commit()?;
        tracing::debug!("Upserted {} places", places.len());
        Ok(places.len())
    }

    fn get_place(&self, name: &str) -> StorageResult<Option<Place>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM places WHERE name = ?1", PLACE_COLUMNS))?;

        let row = stmt
            .query_row(params![name], PlaceRow::from_row)
            .optional()?;

        row.map(PlaceRow::into_place).transpose()
    }

    fn load_places(&self) -> StorageResult<Vec<Place>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM places ORDER BY building, floor, name",
            PLACE_COLUMNS
        ))?;

        let rows = stmt
            .query_map([], PlaceRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(PlaceRow::into_place).collect()
    }

    fn count_places(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM places", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_category(&self) -> StorageResult<HashMap<Category, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, COUNT(*) FROM places GROUP BY category")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut counts = HashMap::new();
        for (category, count) in rows {
            let category = Category::from_db_string(&category)
                .ok_or(StorageError::InvalidCategory(category))?;
            counts.insert(category, count as u64);
        }
        Ok(counts)
    }

    fn clear_places(&mut self) -> StorageResult<()> {
        let deleted = self.conn.execute("DELETE FROM places", [])?;
        tracing::info!("Cleared {} stored places", deleted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, category: Category, building: &str, floor: i16) -> Place {
        Place {
            name: name.to_string(),
            latitude: 50.7791,
            longitude: 6.0590,
            category,
            floor,
            url: None,
            building: building.to_string(),
        }
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_create_and_complete_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage.get_latest_run().unwrap().is_none());

        let run_id = storage.create_run("abc123").unwrap();
        let run = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(run.id, run_id);
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.config_hash, "abc123");
        assert!(run.finished_at.is_none());

        storage.complete_run(run_id, 120, 45).unwrap();
        let run = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.items_visited, 120);
        assert_eq!(run.places_located, 45);
        assert!(run.finished_at.is_some());
    }

    #[test]
    fn test_complete_unknown_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let result = storage.complete_run(42, 0, 0);
        assert!(matches!(result, Err(StorageError::RunNotFound(42))));
    }

    #[test]
    fn test_upsert_and_get_place() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let mut chair = place("Lehrstuhl für Informatik 10", Category::Chair, "E2", 2);
        chair.url = Some("https://example.com/unit.asp?gguid=0xA".to_string());

        storage.upsert_place(&chair).unwrap();

        let loaded = storage.get_place(&chair.name).unwrap().unwrap();
        assert_eq!(loaded, chair);
        assert!(storage.get_place("missing").unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_by_name() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        storage
            .upsert_place(&place("Prof. A", Category::Person, "E1", 1))
            .unwrap();
        storage
            .upsert_place(&place("Prof. A", Category::Person, "E3", -1))
            .unwrap();

        assert_eq!(storage.count_places().unwrap(), 1);
        let loaded = storage.get_place("Prof. A").unwrap().unwrap();
        assert_eq!(loaded.building, "E3");
        assert_eq!(loaded.floor, -1);
    }

    #[test]
    fn test_upsert_places_and_counts() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let places = vec![
            place("E1 : 4201", Category::Room, "E1", 1),
            place("E2 : 5052", Category::Room, "E2", 0),
            place("Prof. B", Category::Person, "E2", 0),
            place("Lehrstuhl X", Category::Chair, "Hauptbau", 2),
        ];

        assert_eq!(storage.upsert_places(&places).unwrap(), 4);
        assert_eq!(storage.count_places().unwrap(), 4);

        let counts = storage.count_by_category().unwrap();
        assert_eq!(counts.get(&Category::Room), Some(&2));
        assert_eq!(counts.get(&Category::Person), Some(&1));
        assert_eq!(counts.get(&Category::Chair), Some(&1));
    }

    #[test]
    fn test_load_places_ordering() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_places(&[
                place("b", Category::Room, "E2", 1),
                place("a", Category::Room, "E2", 1),
                place("c", Category::Room, "E2", 0),
                place("d", Category::Room, "E1", 3),
            ])
            .unwrap();

        let names: Vec<String> = storage
            .load_places()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn test_clear_places() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_place(&place("E1 : 4201", Category::Room, "E1", 1))
            .unwrap();

        storage.clear_places().unwrap();
        assert_eq!(storage.count_places().unwrap(), 0);
        assert!(storage.count_by_category().unwrap().is_empty());
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.db");

        {
            let mut storage = SqliteStorage::new(&path).unwrap();
            storage
                .upsert_place(&place("E3 : 9U07", Category::Room, "E3", -1))
                .unwrap();
        }

        let storage = SqliteStorage::new(&path).unwrap();
        assert_eq!(storage.count_places().unwrap(), 1);
    }
}
