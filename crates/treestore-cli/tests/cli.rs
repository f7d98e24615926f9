use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const ITEMS: &str = r#"[
    {"id": 1, "parent": null, "label": "Item 1"},
    {"id": 2, "parent": 1, "label": "Item 2"},
    {"id": 3, "parent": 1, "label": "Item 3"},
    {"id": 4, "parent": 2, "label": "Item 4"}
]"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("items.json"), ITEMS).unwrap();
        Self { dir }
    }

    fn items_path(&self) -> PathBuf {
        self.dir.path().join("items.json")
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("treestore").unwrap();
        cmd.env("TREESTORE_CONFIG", self.config_path())
            .env_remove("RUST_LOG")
            .arg("-i")
            .arg(self.items_path());
        cmd
    }
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

fn read_file(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_children_and_descendants() {
    let fx = Fixture::new();

    let children = stdout_json(fx.cmd().args(["children", "1"]));
    assert_eq!(ids(&children), vec![2, 3]);

    let descendants = stdout_json(fx.cmd().args(["descendants", "1"]));
    assert_eq!(ids(&descendants), vec![3, 2, 4]);

    let pre_order = stdout_json(fx.cmd().args(["descendants", "1", "--order", "pre-order"]));
    assert_eq!(ids(&pre_order), vec![2, 4, 3]);
}

#[test]
fn test_ancestors_and_get() {
    let fx = Fixture::new();

    let ancestors = stdout_json(fx.cmd().args(["ancestors", "4"]));
    assert_eq!(ids(&ancestors), vec![1, 2]);

    let item = stdout_json(fx.cmd().args(["get", "3"]));
    assert_eq!(item["label"], "Item 3");

    fx.cmd()
        .args(["get", "99"])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn test_remove_root_with_write_empties_file() {
    let fx = Fixture::new();

    fx.cmd().args(["remove", "1", "--write"]).assert().success();

    assert_eq!(read_file(&fx.items_path()), Value::Array(vec![]));
}

#[test]
fn test_remove_prints_remaining_items() {
    let fx = Fixture::new();

    let remaining = stdout_json(fx.cmd().args(["remove", "2"]));
    assert_eq!(ids(&remaining), vec![1, 3]);

    // file untouched without --write
    assert_eq!(ids(&read_file(&fx.items_path())), vec![1, 2, 3, 4]);
}

#[test]
fn test_add_item() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["add", r#"{"id": 5, "parent": 3}"#, "--write"])
        .assert()
        .success();

    let children = stdout_json(fx.cmd().args(["children", "3"]));
    assert_eq!(ids(&children), vec![5]);
}

#[test]
fn test_add_null_item_fails() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["add", "null", "--write"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid item"));

    assert_eq!(ids(&read_file(&fx.items_path())), vec![1, 2, 3, 4]);
}

#[test]
fn test_add_duplicate_depends_on_config() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["add", r#"{"id": 2, "parent": 3}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fx.cmd()
        .args(["config", "set", "duplicates", "replace"])
        .assert()
        .success();

    let items = stdout_json(fx.cmd().args(["add", r#"{"id": 2, "parent": 3}"#]));
    assert_eq!(ids(&items), vec![1, 2, 3, 4]);
    assert_eq!(items[1]["parent"], 3);
}

#[test]
fn test_update_missing_item_fails() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["update", r#"{"id": 42, "parent": 1}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item with id 42 not found"));
}

#[test]
fn test_update_modes() {
    let fx = Fixture::new();

    let items = stdout_json(fx.cmd().args(["update", r#"{"id": 4, "parent": 3}"#]));
    assert_eq!(items[3]["parent"], 3);
    assert!(items[3].get("label").is_none());

    fx.cmd()
        .args(["config", "set", "update", "validate-only"])
        .assert()
        .success();

    let items = stdout_json(fx.cmd().args(["update", r#"{"id": 4, "parent": 3}"#]));
    assert_eq!(items[3]["parent"], 2);
}

#[test]
fn test_update_rejects_cycle() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["update", r#"{"id": 1, "parent": 4}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cycle detected"));
}

#[test]
fn test_table_format() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["--format", "table", "roots"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ID  PARENT  FIELDS\n1   -       "));
}

#[test]
fn test_reads_stdin() {
    let fx = Fixture::new();

    let mut cmd = Command::cargo_bin("treestore").unwrap();
    cmd.env("TREESTORE_CONFIG", fx.config_path())
        .args(["list"])
        .write_stdin(r#"[{"id": "a", "parent": null}, {"id": "b", "parent": "a"}]"#);

    let items = stdout_json(&mut cmd);
    assert_eq!(items[1]["id"], "b");
}

#[test]
fn test_config_commands() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["config", "get", "order"])
        .assert()
        .success()
        .stdout("stack\n");

    fx.cmd()
        .args(["config", "set", "order", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));

    fx.cmd().args(["config", "init"]).assert().success();
    fx.cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    fx.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_write_requires_input_file() {
    let fx = Fixture::new();

    let mut cmd = Command::cargo_bin("treestore").unwrap();
    cmd.env("TREESTORE_CONFIG", fx.config_path())
        .args(["remove", "1", "--write"])
        .write_stdin(ITEMS)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--write needs an input file"));
}

#[test]
fn test_queries_accept_irregular_files() {
    let fx = Fixture::new();
    std::fs::write(
        fx.items_path(),
        r#"[
            {"id": 1, "parent": null, "label": "first"},
            {"id": 1, "parent": null, "label": "second"},
            {"id": 2, "parent": 2},
            {"parent": 1}
        ]"#,
    )
    .unwrap();

    let items = stdout_json(fx.cmd().args(["list"]));
    assert_eq!(ids(&items), vec![1, 2]);

    let item = stdout_json(fx.cmd().args(["get", "1"]));
    assert_eq!(item["label"], "second");

    let descendants = stdout_json(fx.cmd().args(["descendants", "2"]));
    assert_eq!(ids(&descendants), Vec::<i64>::new());

    let ancestors = stdout_json(fx.cmd().args(["ancestors", "2"]));
    assert_eq!(ids(&ancestors), Vec::<i64>::new());

    // strict checks still apply to mutations
    fx.cmd()
        .args(["add", r#"{"id": 1, "parent": null}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_completions() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("treestore"));
}
