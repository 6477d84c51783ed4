use std::fs;
use std::path::{Path, PathBuf};

use drift_cli::{Config, DriftCli, JsonSnapshotStore};
use drift_core::schema::{Field, Model};
use drift_core::snapshot::SnapshotStore;
use drift_core::Scanner;
use tempfile::TempDir;

struct Task;

impl Model for Task {
    fn model_name(&self) -> String {
        "Task".to_string()
    }

    fn table_name(&self) -> String {
        "tasks".to_string()
    }

    fn declared_fields(&self) -> Vec<Field> {
        vec![Field::make("title").string(), Field::make("done").boolean()]
    }
}

struct Note;

impl Model for Note {
    fn model_name(&self) -> String {
        "Note".to_string()
    }

    fn table_name(&self) -> String {
        "notes".to_string()
    }

    fn declared_fields(&self) -> Vec<Field> {
        vec![Field::make("body").text()]
    }
}

fn sql_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
        .collect();
    files.sort();
    files
}

#[test]
fn snapshot_round_trips_preserving_order() {
    let dir = TempDir::new().unwrap();
    let store = JsonSnapshotStore::new(dir.path().join("schema.json"));
    assert!(store.load().unwrap().is_none());

    let models: &[&dyn Model] = &[&Task, &Note];
    let snapshot = Scanner::new().scan(models).unwrap();

    store.save(&snapshot).unwrap();
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, snapshot);

    let tables: Vec<_> = loaded.tables.keys().cloned().collect();
    assert_eq!(tables, ["tasks", "notes"]);
}

#[test]
fn save_keeps_the_previous_file_as_backup() {
    let dir = TempDir::new().unwrap();
    let store = JsonSnapshotStore::new(dir.path().join("schema.json"));

    let first_models: &[&dyn Model] = &[&Task];
    let second_models: &[&dyn Model] = &[&Task, &Note];
    let first = Scanner::new().scan(first_models).unwrap();
    let second = Scanner::new().scan(second_models).unwrap();

    store.save(&first).unwrap();
    assert!(!store.backup_path().exists());

    store.save(&second).unwrap();
    assert!(store.backup_path().exists());
    assert_eq!(store.load().unwrap().unwrap(), second);

    store.restore_backup().unwrap();
    assert_eq!(store.load().unwrap().unwrap(), first);
    assert!(!store.backup_path().exists());
}

#[test]
fn restore_without_backup_errors() {
    let dir = TempDir::new().unwrap();
    let store = JsonSnapshotStore::new(dir.path().join("schema.json"));
    assert!(store.restore_backup().is_err());
}

#[test]
fn generate_writes_a_migration_and_skips_noop_reruns() {
    let dir = TempDir::new().unwrap();
    let migrations = dir.path().join("migrations");
    let config = Config::default()
        .migrations_path(&migrations)
        .snapshot_path(migrations.join("schema.json"));

    let models: &[&dyn Model] = &[&Task];
    let cli = DriftCli::with_config(models, config.clone());

    cli.parse_from(["drift", "generate"]).unwrap();
    assert_eq!(sql_files(&migrations).len(), 1);
    assert!(migrations.join("schema.json").exists());

    let script = fs::read_to_string(&sql_files(&migrations)[0]).unwrap();
    assert!(script.contains("CREATE TABLE `tasks`"));
    assert!(script.contains("-- down"));
    assert!(script.contains("DROP TABLE `tasks`;"));

    // Nothing changed: no new script, snapshot untouched.
    let before = fs::read_to_string(migrations.join("schema.json")).unwrap();
    cli.parse_from(["drift", "generate"]).unwrap();
    assert_eq!(sql_files(&migrations).len(), 1);
    let after = fs::read_to_string(migrations.join("schema.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn rollback_restores_the_snapshot_and_deletes_the_newest_script() {
    let dir = TempDir::new().unwrap();
    let migrations = dir.path().join("migrations");
    let config = Config::default()
        .migrations_path(&migrations)
        .snapshot_path(migrations.join("schema.json"));

    let first_models: &[&dyn Model] = &[&Task];
    DriftCli::with_config(first_models, config.clone())
        .parse_from(["drift", "generate", "--name", "one"])
        .unwrap();
    let baseline = fs::read_to_string(migrations.join("schema.json")).unwrap();

    let second_models: &[&dyn Model] = &[&Task, &Note];
    let cli = DriftCli::with_config(second_models, config.clone());
    cli.parse_from(["drift", "generate", "--name", "two"]).unwrap();
    assert_eq!(sql_files(&migrations).len(), 2);

    cli.parse_from(["drift", "rollback"]).unwrap();
    assert_eq!(sql_files(&migrations).len(), 1);
    assert_eq!(
        fs::read_to_string(migrations.join("schema.json")).unwrap(),
        baseline
    );

    // A second rollback has no backup left to restore.
    assert!(cli.parse_from(["drift", "rollback"]).is_err());
}
