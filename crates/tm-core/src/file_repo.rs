//! File repository: the migration catalog on disk

use crate::catalog::{direction_token, file_name, parse_stem, stem_of};
use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Access to the catalog of migration files.
///
/// Listings are returned as fresh vectors sorted by number ascending; callers
/// that need a descending view build their own copy.
pub trait FileRepository {
    /// Catalog directory this repository reads and writes
    fn directory(&self) -> &Path;

    /// Create the catalog directory if it does not exist
    fn open_directory(&self) -> CoreResult<()>;

    /// All catalog entries of one direction, sorted by number ascending
    fn list_migrations(&self, direction: Direction) -> CoreResult<Vec<Migration>>;

    /// Path a migration's file has (or would have), derived from its identity
    fn migration_path(&self, migration: &Migration) -> PathBuf;

    /// Create an empty file for the migration and record its path
    fn create_file(&self, migration: &mut Migration) -> CoreResult<()>;

    /// Persist `migration.query` to its file
    fn write_body(&self, migration: &Migration) -> CoreResult<()>;

    /// Read the migration's file into `migration.query`
    fn load_body(&self, migration: &mut Migration) -> CoreResult<()>;

    /// Remove the migration's file
    fn delete_file(&self, migration: &Migration) -> CoreResult<()>;
}

/// Filesystem-backed catalog for one dialect directory
#[derive(Debug, Clone)]
pub struct FsRepository {
    dir: PathBuf,
    extension: String,
}

impl FsRepository {
    /// Create a repository over `dir` for files with `extension`
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// File extension of catalog entries
    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn resolved_path(&self, migration: &Migration) -> PathBuf {
        migration
            .file_path
            .clone()
            .unwrap_or_else(|| self.migration_path(migration))
    }

    /// Decide whether `path` is a catalog entry of `direction`.
    ///
    /// Files with another extension, or whose trailing token is not the
    /// requested direction, are not part of this listing. A file that does
    /// claim the direction must parse, otherwise the listing fails.
    fn classify(&self, path: &Path, direction: Direction) -> CoreResult<Option<Migration>> {
        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension);
        if !has_extension {
            return Ok(None);
        }

        let Some(stem) = stem_of(path) else {
            return Ok(None);
        };
        if direction_token(stem) != Some(direction.as_str()) {
            return Ok(None);
        }

        let mut migration = parse_stem(stem)?;
        migration.file_path = Some(path.to_path_buf());
        Ok(Some(migration))
    }
}

impl FileRepository for FsRepository {
    fn directory(&self) -> &Path {
        &self.dir
    }

    fn open_directory(&self) -> CoreResult<()> {
        if !self.dir.exists() {
            log::debug!("Creating migrations directory {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(|e| CoreError::io(&self.dir, e))?;
        }
        Ok(())
    }

    fn list_migrations(&self, direction: Direction) -> CoreResult<Vec<Migration>> {
        // A missing directory is an empty catalog; listing never creates it.
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| CoreError::io(&self.dir, e))?;

        let mut migrations = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::io(&self.dir, e))?;
            let file_type = entry.file_type().map_err(|e| CoreError::io(&entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(migration) = self.classify(&entry.path(), direction)? {
                migrations.push(migration);
            }
        }

        migrations.sort_by_key(|m| m.number);

        if let Some(pair) = migrations.windows(2).find(|w| w[0].number == w[1].number) {
            let display = |m: &Migration| {
                m.file_path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            };
            return Err(CoreError::DuplicateMigration {
                number: pair[0].number,
                direction: direction.to_string(),
                first: display(&pair[0]),
                second: display(&pair[1]),
            });
        }

        Ok(migrations)
    }

    fn migration_path(&self, migration: &Migration) -> PathBuf {
        self.dir.join(file_name(migration, &self.extension))
    }

    fn create_file(&self, migration: &mut Migration) -> CoreResult<()> {
        self.open_directory()?;
        let path = self.migration_path(migration);

        // create_new refuses to clobber an existing catalog entry
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| CoreError::io(&path, e))?;

        migration.file_path = Some(path);
        Ok(())
    }

    fn write_body(&self, migration: &Migration) -> CoreResult<()> {
        let path = self.resolved_path(migration);
        let mut file = fs::File::create(&path).map_err(|e| CoreError::io(&path, e))?;
        file.write_all(migration.query.as_bytes())
            .map_err(|e| CoreError::io(&path, e))?;
        Ok(())
    }

    fn load_body(&self, migration: &mut Migration) -> CoreResult<()> {
        let path = self.resolved_path(migration);
        migration.query = fs::read_to_string(&path).map_err(|e| CoreError::io(&path, e))?;
        Ok(())
    }

    fn delete_file(&self, migration: &Migration) -> CoreResult<()> {
        let path = self.resolved_path(migration);
        fs::remove_file(&path).map_err(|e| CoreError::io(&path, e))
    }
}

#[cfg(test)]
#[path = "file_repo_test.rs"]
mod tests;
