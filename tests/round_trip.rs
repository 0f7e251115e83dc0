//! Persistence format tests: the data file keeps the camelCase shape the
//! original dataset shipped with, and foreign or damaged data degrades to
//! an empty store instead of failing.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use voila::model::ReminderLead;
use voila::store::{DATA_KEY, FileKv, KvStore, Snapshot, Store};

const LEGACY_DATA: &str = r#"{
  "categories": [
    { "id": "c1", "name": "ToDo" },
    { "id": "c4", "name": "Completed" }
  ],
  "tasks": [
    {
      "id": "t9",
      "title": "Water the plants",
      "description": null,
      "dateTime": "2026-09-03T08:00:00Z",
      "reminderTime": 60,
      "categoryId": "c1",
      "checked": false
    },
    {
      "id": "t10",
      "title": "Old chore",
      "categoryId": "c4",
      "checked": true,
      "reminderTime": 7
    }
  ]
}"#;

#[test]
fn legacy_camel_case_data_loads_and_survives_a_rewrite() {
    let dir = TempDir::new().unwrap();
    let mut kv = FileKv::open(dir.path()).unwrap();
    kv.set(DATA_KEY, LEGACY_DATA).unwrap();

    let mut store = Store::open(FileKv::open(dir.path()).unwrap());
    assert_eq!(store.tasks().len(), 2);

    let t9 = store.task("t9").unwrap();
    assert_eq!(t9.reminder, ReminderLead::Hour1);
    assert_eq!(t9.description, None);
    // an offset outside the fixed set degrades to "no reminder"
    assert_eq!(store.task("t10").unwrap().reminder, ReminderLead::NoReminder);

    // touch the store so the snapshot is rewritten in our own encoding
    let mut edited = store.task("t9").unwrap().clone();
    edited.title = "Water the plants twice".into();
    store.update_task(edited);
    drop(store);

    let raw = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
    // field names stay camelCase so older snapshots and new ones mix freely
    assert!(raw.contains("\"categoryId\""), "raw: {raw}");
    assert!(raw.contains("\"reminderTime\""), "raw: {raw}");
    assert!(!raw.contains("\"category_id\""), "raw: {raw}");

    let reloaded = Store::open(FileKv::open(dir.path()).unwrap());
    assert_eq!(reloaded.task("t9").unwrap().title, "Water the plants twice");
}

#[test]
fn malformed_data_file_opens_as_an_empty_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("data.json"), "{not json at all").unwrap();

    let store = Store::open(FileKv::open(dir.path()).unwrap());
    assert!(store.tasks().is_empty());
    assert!(store.categories().is_empty());
}

#[test]
fn missing_data_file_opens_as_an_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(FileKv::open(dir.path()).unwrap());
    assert!(store.tasks().is_empty());
}

#[test]
fn seed_snapshot_encodes_and_decodes_unchanged() {
    let seed = Snapshot::default_data();
    let decoded = Snapshot::decode(&seed.encode().unwrap());
    assert_eq!(decoded.categories, seed.categories);
    assert_eq!(decoded.tasks, seed.tasks);
}
