use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use nestrepl::repl::{HistoryStore, Value};

use crate::support::engine;

fn tail(
    history: &HistoryStore,
    n: usize,
) -> Vec<String> {
    history.tail(n).lines().to_vec()
}

fn seeded(path: &Path) -> HistoryStore {
    fs::write(path, "1\n2\n3\n").unwrap();
    let mut history = HistoryStore::new();
    assert_eq!(history.load(path).unwrap(), 3);
    history
}

#[test]
fn test_load_reads_oldest_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let history = seeded(&path);
    assert_eq!(tail(&history, 2), vec!["2", "3"]);
    assert_eq!(history.last_saved_count(), 3);
}

#[test]
fn test_save_appends_new_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let mut history = seeded(&path);

    history.push("4");
    assert_eq!(history.save(&path).unwrap(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n3\n4\n");
}

#[test]
fn test_should_only_append_new_lines_the_second_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let mut history = seeded(&path);

    history.push("4");
    history.save(&path).unwrap();
    let first = fs::read(&path).unwrap();

    assert_eq!(history.save(&path).unwrap(), 0);
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn test_lines_appended_by_another_process_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let mut history = seeded(&path);

    let mut other = OpenOptions::new().append(true).open(&path).unwrap();
    other.write_all(b"4\n").unwrap();
    drop(other);

    history.push("5");
    history.save(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n3\n4\n5\n");
    assert_eq!(tail(&history, 3), vec!["2", "3", "5"]);
}

#[test]
fn test_foreign_non_utf8_line_does_not_block_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let mut history = seeded(&path);

    let mut other = OpenOptions::new().append(true).open(&path).unwrap();
    other.write_all(b"caf\xe9\n").unwrap();
    drop(other);

    history.push("5");
    assert_eq!(history.save(&path).unwrap(), 1);
    assert_eq!(fs::read(&path).unwrap(), b"1\n2\n3\ncaf\xe9\n5\n");

    let mut reloaded = HistoryStore::new();
    assert_eq!(reloaded.load(&path).unwrap(), 5);
    assert_eq!(tail(&reloaded, 2), vec!["caf\u{fffd}", "5"]);
}

#[test]
fn test_save_after_clear_leaves_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let mut history = seeded(&path);

    history.clear();
    assert_eq!(history.save(&path).unwrap(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n3\n");
}

#[test]
fn test_save_after_clear_with_new_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let mut history = seeded(&path);

    history.clear();
    history.push("x");
    history.push("y");
    assert_eq!(history.save(&path).unwrap(), 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n3\nx\ny\n");
}

#[test]
fn test_engine_loads_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    fs::write(&path, "40 + 2\n").unwrap();

    let (engine, out) = engine("hist\n1 + 1\n");
    let mut engine = engine.with_history_file(&path);
    engine.start(Value::main());

    assert_eq!(out.text(), "0: 40 + 2\n=> 2\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), "40 + 2\nhist\n1 + 1\n");
}

#[test]
fn test_two_engines_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");

    let (first, _) = engine("1\n");
    let mut first = first.with_history_file(&path);
    let (second, _) = engine("2\n");
    let mut second = second.with_history_file(&path);

    first.start(Value::main());
    second.start(Value::main());

    assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n");
}

#[test]
fn test_unreadable_history_degrades_to_memory() {
    let dir = tempfile::tempdir().unwrap();

    // a directory cannot be read as a history file
    let (engine, out) = engine("1\nhist\n");
    let mut engine = engine.with_history_file(dir.path());
    engine.start(Value::main());

    let text = out.text();
    assert_eq!(text.matches("Error: History file").count(), 1);
    assert!(text.ends_with("=> 1\n0: 1\n"));
    assert!(engine.history_file().is_none());
}
