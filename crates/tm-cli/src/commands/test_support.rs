//! Throwaway projects for command tests

use std::path::PathBuf;
use tempfile::TempDir;
use tm_core::Direction;
use tm_db::{DuckDbBackend, HistoryRepository};

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::commands::generate;

pub(crate) struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("tidemark.yml"), "dialect: duckdb\n").unwrap();
        Self { dir }
    }

    pub fn database(&self) -> PathBuf {
        self.dir.path().join("app.duckdb")
    }

    pub fn global(&self) -> GlobalArgs {
        GlobalArgs {
            verbose: false,
            project_dir: self.dir.path().to_path_buf(),
            config: None,
            workdir: None,
            dialect: None,
            database: Some(self.database().display().to_string()),
            history: None,
        }
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.dir.path().join("migrations").join("duckdb")
    }

    pub fn catalog_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.catalog_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".sql"))
            .collect();
        names.sort();
        names
    }

    /// Generate `count` filled pairs
    pub fn generate(&self, count: usize) {
        let args = GenerateArgs {
            name: String::new(),
            count,
            dry: false,
            fill: true,
            after_history: false,
        };
        generate::execute(&args, &self.global()).unwrap();
    }

    /// History rows read straight from the database file
    pub fn history(&self) -> Vec<(u32, Direction)> {
        let db = DuckDbBackend::from_path(&self.database(), "tidemark_history").unwrap();
        db.load_all_history()
            .unwrap()
            .into_iter()
            .map(|m| (m.number, m.direction))
            .collect()
    }
}
