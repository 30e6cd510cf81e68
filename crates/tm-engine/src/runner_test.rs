use super::*;
use crate::test_utils::{numbers, Fixture, HISTORY_TABLE};
use std::path::Path;
use tm_core::FsRepository;
use tm_db::{DuckDbBackend, LogFileHistory, SqliteBackend};

#[test]
fn test_empty_catalog_and_history() {
    let fx = Fixture::new();
    let outcome = fx.migrator().up(0, false).unwrap();

    assert!(outcome.is_empty());
    assert!(fx.history().is_empty());
    assert!(!fx.table_exists(HISTORY_TABLE));
}

#[test]
fn test_up_applies_everything_in_order() {
    let fx = Fixture::new();
    fx.write_pairs(1..=5);

    let outcome = fx.migrator().up(0, false).unwrap();
    assert_eq!(numbers(&outcome.migrations), vec![1, 2, 3, 4, 5]);
    assert_eq!(outcome.direction, Direction::Up);
    assert!(!outcome.dry_run);
    assert!(outcome.migrations.iter().all(|m| !m.query.is_empty()));

    assert_eq!(fx.history().last(), Some(&(5, Direction::Up)));
    for n in 1..=5 {
        assert!(fx.table_exists(&format!("t{n}")));
    }
}

#[test]
fn test_up_after_partial_apply() {
    let fx = Fixture::new();
    fx.write_pairs(1..=5);
    let migrator = fx.migrator();

    assert_eq!(numbers(&migrator.up(3, false).unwrap().migrations), vec![1, 2, 3]);
    assert_eq!(numbers(&migrator.up(0, false).unwrap().migrations), vec![4, 5]);
}

#[test]
fn test_up_redoes_last_rolled_back() {
    let fx = Fixture::new();
    fx.write_pairs(1..=5);
    let migrator = fx.migrator();

    migrator.up(0, false).unwrap();
    let down = migrator.down(3, false).unwrap();
    assert_eq!(numbers(&down.migrations), vec![5, 4, 3]);
    assert_eq!(fx.history().last(), Some(&(3, Direction::Down)));
    assert!(!fx.table_exists("t3"));

    let up = migrator.up(0, false).unwrap();
    assert_eq!(numbers(&up.migrations), vec![3, 4, 5]);
    assert!(fx.table_exists("t3"));
}

#[test]
fn test_down_rolls_back_last_applied_first() {
    let fx = Fixture::new();
    fx.write_pairs(1..=5);
    let migrator = fx.migrator();
    migrator.up(0, false).unwrap();

    let outcome = migrator.down(2, false).unwrap();
    assert_eq!(numbers(&outcome.migrations), vec![5, 4]);
    assert_eq!(outcome.direction, Direction::Down);

    let history = fx.history();
    assert_eq!(
        &history[history.len() - 2..],
        &[(5, Direction::Down), (4, Direction::Down)]
    );
    assert!(!fx.table_exists("t5"));
    assert!(!fx.table_exists("t4"));
    assert!(fx.table_exists("t3"));

    // continuing down skips what is already rolled back
    assert_eq!(numbers(&migrator.down(1, false).unwrap().migrations), vec![3]);
}

#[test]
fn test_up_is_idempotent() {
    let fx = Fixture::new();
    fx.write_pairs(1..=3);
    let migrator = fx.migrator();

    assert_eq!(migrator.up(0, false).unwrap().count(), 3);
    assert!(migrator.up(0, false).unwrap().is_empty());
    assert_eq!(fx.history().len(), 3);
}

#[test]
fn test_down_all_then_up_all() {
    let fx = Fixture::new();
    fx.write_pairs(1..=4);
    let migrator = fx.migrator();

    migrator.up(0, false).unwrap();
    let down = migrator.down(0, false).unwrap();
    assert_eq!(numbers(&down.migrations), vec![4, 3, 2, 1]);
    assert!(migrator.down(0, false).unwrap().is_empty());

    let up = migrator.up(0, false).unwrap();
    assert_eq!(numbers(&up.migrations), vec![1, 2, 3, 4]);
}

#[test]
fn test_down_without_history_starts_at_highest() {
    let fx = Fixture::new();
    for n in 1..=3 {
        fx.write_pair(
            n,
            "",
            &format!("CREATE TABLE t{n} (id INTEGER);"),
            &format!("DROP TABLE IF EXISTS t{n};"),
        );
    }

    let outcome = fx.migrator().down(1, false).unwrap();
    assert_eq!(numbers(&outcome.migrations), vec![3]);
    assert_eq!(fx.history(), vec![(3, Direction::Down)]);
}

#[test]
fn test_failure_stops_batch_and_keeps_earlier_work() {
    let fx = Fixture::new();
    fx.write_pairs(1..=2);
    fx.write_pair(3, "broken", "CREATE TABLE t3 (id INTEGER); SELEC 1;", "");
    fx.write_pairs(4..=5);

    let err = fx.migrator().up(0, false).unwrap_err();
    match &err {
        EngineError::Apply {
            number,
            name,
            direction,
            applied_before,
            ..
        } => {
            assert_eq!(*number, 3);
            assert_eq!(name, "broken");
            assert_eq!(*direction, Direction::Up);
            assert_eq!(*applied_before, 2);
        }
        other => panic!("expected Apply error, got {other:?}"),
    }
    assert!(err.to_string().contains("[M003]"));

    assert_eq!(fx.history(), vec![(1, Direction::Up), (2, Direction::Up)]);
    assert!(fx.table_exists("t2"));
    assert!(!fx.table_exists("t3"));
    assert!(!fx.table_exists("t4"));
}

#[test]
fn test_dry_run_writes_nothing_and_matches_real_run() {
    let fx = Fixture::new();
    fx.write_pairs(1..=3);
    let files_before = fx.catalog_files();
    let migrator = fx.migrator();

    let dry = migrator.up(0, true).unwrap();
    assert!(dry.dry_run);
    assert_eq!(numbers(&dry.migrations), vec![1, 2, 3]);
    assert!(dry.migrations.iter().all(|m| !m.query.is_empty()));
    assert!(!fx.table_exists(HISTORY_TABLE));
    assert!(!fx.table_exists("t1"));
    assert_eq!(fx.catalog_files(), files_before);

    let real = migrator.up(0, false).unwrap();
    assert_eq!(numbers(&real.migrations), numbers(&dry.migrations));

    let dry_down = migrator.down(2, true).unwrap();
    assert_eq!(fx.history().len(), 3);
    assert!(fx.table_exists("t3"));
    let real_down = migrator.down(2, false).unwrap();
    assert_eq!(numbers(&dry_down.migrations), numbers(&real_down.migrations));
}

#[test]
fn test_malformed_catalog_aborts_before_any_apply() {
    let fx = Fixture::new();
    fx.write_pairs(1..=2);
    std::fs::write(fx.catalog_dir().join("00x3_bad_up.sql"), "").unwrap();

    let err = fx.migrator().up(0, false).unwrap_err();
    assert!(matches!(err, EngineError::Core(_)));
    assert!(fx.history().is_empty());
}

#[test]
fn test_status_transitions() {
    let fx = Fixture::new();
    fx.write_pairs(1..=3);
    let migrator = fx.migrator();

    let status = migrator.status().unwrap();
    assert_eq!(status.position, Position::Empty);
    assert_eq!(status.pending.len(), 3);

    migrator.up(2, false).unwrap();
    assert_eq!(
        migrator.status().unwrap().position,
        Position::Behind { pending: 1 }
    );

    migrator.up(0, false).unwrap();
    let status = migrator.status().unwrap();
    assert_eq!(status.position, Position::Synced);
    assert!(status.pending.is_empty());
    assert_eq!(status.last_applied.unwrap().number, 3);

    migrator.down(1, false).unwrap();
    assert_eq!(
        migrator.status().unwrap().position,
        Position::PartiallyRolledBack { number: 3 }
    );
}

#[test]
fn test_history_and_purge() {
    let fx = Fixture::new();
    fx.write_pairs(1..=2);
    let migrator = fx.migrator();
    migrator.up(0, false).unwrap();

    let history = migrator.history().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|m| m.created_at.is_some()));

    let files_before = fx.catalog_files();
    migrator.purge().unwrap();
    assert!(migrator.history().unwrap().is_empty());
    assert!(!fx.table_exists(HISTORY_TABLE));
    assert_eq!(fx.catalog_files(), files_before);
}

fn write_sqlite_pairs(dir: &Path, range: std::ops::RangeInclusive<u32>) {
    std::fs::create_dir_all(dir).unwrap();
    for n in range {
        std::fs::write(
            dir.join(format!("{n:06}_t{n}_up.sqlite")),
            format!("CREATE TABLE t{n} (id INTEGER PRIMARY KEY);"),
        )
        .unwrap();
        std::fs::write(
            dir.join(format!("{n:06}_t{n}_down.sqlite")),
            format!("DROP TABLE t{n};"),
        )
        .unwrap();
    }
}

#[test]
fn test_sqlite_backend_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("sqlite");
    write_sqlite_pairs(&catalog, 1..=3);

    let files = FsRepository::new(&catalog, "sqlite");
    let db = SqliteBackend::in_memory(HISTORY_TABLE).unwrap();
    let migrator = Migrator::new(&files, &db);

    assert_eq!(numbers(&migrator.up(0, false).unwrap().migrations), vec![1, 2, 3]);
    assert_eq!(numbers(&migrator.down(2, false).unwrap().migrations), vec![3, 2]);
    assert_eq!(numbers(&migrator.up(0, false).unwrap().migrations), vec![2, 3]);
    assert_eq!(migrator.history().unwrap().len(), 7);
}

#[test]
fn test_log_file_backend_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("duckdb");
    std::fs::create_dir_all(&catalog).unwrap();
    for n in 1..=3 {
        let up = catalog.join(format!("{n:06}__up.sql"));
        std::fs::write(up, format!("CREATE TABLE t{n} (id INT);")).unwrap();
        let down = catalog.join(format!("{n:06}__down.sql"));
        std::fs::write(down, format!("DROP TABLE t{n};")).unwrap();
    }

    let files = FsRepository::new(&catalog, "sql");
    let executor = DuckDbBackend::in_memory(HISTORY_TABLE).unwrap();
    let log_path = catalog.join(".tidemark-log");
    let history = LogFileHistory::new(&log_path, Box::new(executor));
    let migrator = Migrator::new(&files, &history);

    // a dry run does not create the log
    migrator.up(0, true).unwrap();
    assert!(!log_path.exists());

    assert_eq!(numbers(&migrator.up(0, false).unwrap().migrations), vec![1, 2, 3]);
    assert_eq!(numbers(&migrator.down(1, false).unwrap().migrations), vec![3]);

    let lines = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(lines.lines().count(), 4);
    assert!(lines.lines().last().unwrap().starts_with("000003__down\t"));
    assert_eq!(
        migrator.status().unwrap().position,
        Position::PartiallyRolledBack { number: 3 }
    );
}
