//! Shared fixtures for engine tests: a temp catalog plus in-memory DuckDB.

use crate::runner::Migrator;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tm_core::{format_stem, Direction, FsRepository};
use tm_db::{DuckDbBackend, HistoryRepository};

pub(crate) const HISTORY_TABLE: &str = "tidemark_history";

pub(crate) struct Fixture {
    pub dir: TempDir,
    pub files: FsRepository,
    pub db: DuckDbBackend,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let files = FsRepository::new(dir.path().join("migrations").join("duckdb"), "sql");
        let db = DuckDbBackend::in_memory(HISTORY_TABLE).unwrap();
        Self { dir, files, db }
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.dir.path().join("migrations").join("duckdb")
    }

    /// Write one pair with explicit bodies
    pub fn write_pair(&self, number: u32, name: &str, up: &str, down: &str) {
        let dir = self.catalog_dir();
        fs::create_dir_all(&dir).unwrap();
        for (direction, body) in [(Direction::Up, up), (Direction::Down, down)] {
            let file = format!("{}.sql", format_stem(number, name, direction));
            fs::write(dir.join(file), body).unwrap();
        }
    }

    /// Write pairs creating and dropping `t<n>`
    pub fn write_pairs(&self, numbers: impl IntoIterator<Item = u32>) {
        for n in numbers {
            self.write_pair(
                n,
                &format!("create_t{n}"),
                &format!("CREATE TABLE t{n} (id INTEGER);"),
                &format!("DROP TABLE t{n};"),
            );
        }
    }

    pub fn migrator(&self) -> Migrator<'_, FsRepository> {
        Migrator::new(&self.files, &self.db)
    }

    pub fn table_exists(&self, name: &str) -> bool {
        let count: i64 = self
            .db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count > 0
    }

    pub fn history(&self) -> Vec<(u32, Direction)> {
        self.db
            .load_all_history()
            .unwrap()
            .into_iter()
            .map(|m| (m.number, m.direction))
            .collect()
    }

    /// Sorted file names in the catalog directory
    pub fn catalog_files(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.catalog_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub(crate) fn numbers(migrations: &[tm_core::Migration]) -> Vec<u32> {
    migrations.iter().map(|m| m.number).collect()
}
