//! Legacy `notes.json` import through `Store::open`.

use pn_store::paths::{backup_path, legacy_path};
use pn_store::{ImportOutcome, Store, StoreOptions};
use std::fs;
use tempfile::tempdir;

const DUMP: &str = r#"[
  {
    "id": "0b6f1c3e-1111-4c2a-9d1e-000000000001",
    "title": "Shopping",
    "content": "eggs, milk",
    "encrypted": false,
    "tags": ["home"],
    "createdAt": "2023-10-01T09:00:00+02:00",
    "updatedAt": "2023-10-02T09:00:00+02:00"
  },
  {
    "id": "0b6f1c3e-1111-4c2a-9d1e-000000000002",
    "title": "c2FsdHNhbHQ=",
    "content": "bm9uY2U=",
    "encrypted": true,
    "tags": null,
    "createdAt": "2023-10-03T09:00:00Z",
    "updatedAt": "2023-10-03T09:00:00Z"
  }
]"#;

#[test]
fn open_imports_dump_into_empty_store_and_leaves_backup() {
    let dir = tempdir().unwrap();
    let dump = legacy_path(dir.path());
    fs::write(&dump, DUMP).unwrap();

    let store = Store::open(&StoreOptions::in_dir(dir.path())).unwrap();

    let notes = store.get_all().unwrap();
    assert_eq!(notes.len(), 2);
    // newest update first
    assert_eq!(notes[0].id, "0b6f1c3e-1111-4c2a-9d1e-000000000002");
    assert!(notes[0].encrypted);
    assert!(notes[0].tags.is_empty());
    assert_eq!(notes[1].title, "Shopping");
    assert_eq!(notes[1].tags, vec!["home"]);

    assert!(!dump.exists());
    assert_eq!(fs::read_to_string(backup_path(&dump)).unwrap(), DUMP);
}

#[test]
fn second_open_is_a_no_op() {
    let dir = tempdir().unwrap();
    fs::write(legacy_path(dir.path()), DUMP).unwrap();
    let opts = StoreOptions::in_dir(dir.path());

    Store::open(&opts).unwrap().close().unwrap();
    let store = Store::open(&opts).unwrap();

    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(
        pn_store::legacy::import_legacy(&store, &legacy_path(dir.path())),
        ImportOutcome::NoLegacyFile
    );
}

#[test]
fn populated_store_ignores_dump() {
    let dir = tempdir().unwrap();
    let opts = StoreOptions::in_dir(dir.path());
    let store = Store::open(&opts).unwrap();
    store
        .create(&serde_json::from_str::<Vec<pn_store::NoteRecord>>(DUMP).unwrap()[0])
        .unwrap();

    let dump = legacy_path(dir.path());
    fs::write(&dump, DUMP).unwrap();
    assert_eq!(
        pn_store::legacy::import_legacy(&store, &dump),
        ImportOutcome::StoreNotEmpty
    );
    assert!(dump.exists());
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn duplicate_ids_in_dump_import_partially() {
    let dir = tempdir().unwrap();
    let store = Store::open_in_memory().unwrap();
    let dump = dir.path().join("notes.json");
    let mut notes: Vec<pn_store::NoteRecord> = serde_json::from_str(DUMP).unwrap();
    notes[1].id = notes[0].id.clone();
    fs::write(&dump, serde_json::to_string(&notes).unwrap()).unwrap();

    match pn_store::legacy::import_legacy(&store, &dump) {
        ImportOutcome::Imported {
            imported,
            failed,
            backup,
        } => {
            assert_eq!((imported, failed), (1, 1));
            assert_eq!(backup, Some(backup_path(&dump)));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(store.count().unwrap(), 1);
}
