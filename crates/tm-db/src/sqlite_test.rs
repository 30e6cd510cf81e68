use super::*;
use tm_core::Direction;

const TABLE: &str = "tidemark_history";

fn migration(number: u32, name: &str, direction: Direction, query: &str) -> Migration {
    let mut m = Migration::new(number, name, direction);
    m.query = query.to_string();
    m
}

fn table_exists(db: &SqliteBackend, name: &str) -> bool {
    let count: i64 = db
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            rusqlite::params![name],
            |row| row.get(0),
        )
        .unwrap();
    count > 0
}

#[test]
fn test_in_memory() {
    let db = SqliteBackend::in_memory(TABLE).unwrap();
    assert_eq!(db.db_type(), "sqlite");
    assert_eq!(db.backend_name(), "sqlite");
}

#[test]
fn test_missing_table_reads_as_empty_history() {
    let db = SqliteBackend::in_memory(TABLE).unwrap();
    assert!(db.load_last_applied().unwrap().is_none());
    assert!(db.load_all_history().unwrap().is_empty());
    assert!(!table_exists(&db, TABLE));
}

#[test]
fn test_apply_and_load() {
    let db = SqliteBackend::in_memory(TABLE).unwrap();
    db.ensure_history_table().unwrap();
    db.ensure_history_table().unwrap();

    db.apply_migration(&migration(
        1,
        "users",
        Direction::Up,
        "CREATE TABLE users (id INTEGER PRIMARY KEY); INSERT INTO users DEFAULT VALUES;",
    ))
    .unwrap();
    db.apply_migration(&migration(1, "users", Direction::Down, "DROP TABLE users;"))
        .unwrap();

    assert!(!table_exists(&db, "users"));
    let all = db.load_all_history().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].identity(), (1, "users", Direction::Up));
    assert_eq!(all[1].identity(), (1, "users", Direction::Down));
    assert!(all.iter().all(|m| m.created_at.is_some()));

    let last = db.load_last_applied().unwrap().unwrap();
    assert_eq!(last.direction, Direction::Down);
}

#[test]
fn test_failed_body_rolls_back_history_row() {
    let db = SqliteBackend::in_memory(TABLE).unwrap();
    db.ensure_history_table().unwrap();

    let result = db.apply_migration(&migration(
        1,
        "broken",
        Direction::Up,
        "CREATE TABLE half (id INTEGER); THIS IS NOT SQL;",
    ));
    assert!(result.is_err());
    assert!(!table_exists(&db, "half"));
    assert!(db.load_all_history().unwrap().is_empty());
}

#[test]
fn test_drop_history_table() {
    let db = SqliteBackend::in_memory(TABLE).unwrap();
    db.ensure_history_table().unwrap();
    db.apply_migration(&migration(1, "", Direction::Up, "")).unwrap();

    db.drop_history_table().unwrap();
    assert!(!table_exists(&db, TABLE));
    db.drop_history_table().unwrap();
}

#[test]
fn test_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.db");

    {
        let db = SqliteBackend::new(path.to_str().unwrap(), TABLE).unwrap();
        db.ensure_history_table().unwrap();
        db.apply_migration(&migration(4, "orders", Direction::Up, "")).unwrap();
    }

    let db = SqliteBackend::from_path(&path, TABLE).unwrap();
    let last = db.load_last_applied().unwrap().unwrap();
    assert_eq!(last.identity(), (4, "orders", Direction::Up));
}
