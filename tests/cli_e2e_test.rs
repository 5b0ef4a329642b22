use assert_cmd::{cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("notecmd");
        cmd.env("NOTECMD_DB", self.dir.path().join("notes.db"))
            .env("NOTECMD_EXPORT_DIR", self.dir.path().join("out"))
            .env_remove("NOTECMD_DARK")
            .env_remove("NOTECMD_LOG");
        cmd
    }
}

#[test]
fn test_help_lists_commands() {
    Env::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("download"));
}

#[test]
fn test_no_args_without_terminal() {
    Env::new()
        .cmd()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}

#[test]
fn test_new_list_show() {
    let env = Env::new();

    env.cmd()
        .args(["new", "--title", "Shopping List", "--text", "milk\neggs"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Created "));

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shopping List"))
        .stdout(predicate::str::contains("milk"));

    env.cmd()
        .args(["show", "shopping list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("milk  \neggs").or(predicate::str::contains("milk\neggs")));

    env.cmd()
        .args(["list", "--search", "bread"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches."));
}

#[test]
fn test_list_empty() {
    Env::new()
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes."));
}

#[test]
fn test_list_rejects_unknown_sort() {
    Env::new()
        .cmd()
        .args(["list", "--sort", "size"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort"));
}

#[test]
fn test_edit_and_delete() {
    let env = Env::new();
    env.cmd().args(["new", "--title", "Draft"]).assert().success();

    env.cmd()
        .args(["edit", "draft", "--title", "Final", "--text", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved."));

    env.cmd()
        .args(["show", "final", "--format", "html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>done</p>"));

    env.cmd()
        .args(["delete", "final", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted."));

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes."));
}

#[test]
fn test_export_then_import_elsewhere() {
    let source = Env::new();
    source.cmd().args(["new", "--title", "Keep me"]).assert().success();
    source.cmd().args(["new", "--title", "Me too"]).assert().success();

    let backup = source.dir.path().join("backup.json");
    source
        .cmd()
        .args(["export", "--output"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2"));

    let target = Env::new();
    target
        .cmd()
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2."));

    target
        .cmd()
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 0. 2 already present."));

    target
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me"))
        .stdout(predicate::str::contains("Me too"));
}

#[test]
fn test_export_default_location() {
    let env = Env::new();
    env.cmd().arg("export").assert().success();

    let files: Vec<String> = fs::read_dir(env.dir.path().join("out"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("notecmd-backup-"));
}

#[test]
fn test_import_rejects_object() {
    let env = Env::new();
    let path = env.dir.path().join("object.json");
    fs::write(&path, r#"{"id": "1"}"#).unwrap();

    env.cmd()
        .arg("import")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid import"));
}

#[test]
fn test_import_reports_skipped_entries() {
    let env = Env::new();
    let path = env.dir.path().join("mixed.json");
    fs::write(
        &path,
        r#"[{"id": "a", "title": "ok", "content": "", "created": "2024-01-01T00:00:00Z", "lastEdited": "2024-01-01T00:00:00Z"},
            {"id": "", "title": "no id", "content": "", "created": "2024-01-01T00:00:00Z", "lastEdited": "2024-01-01T00:00:00Z"}]"#,
    )
    .unwrap();

    env.cmd()
        .arg("import")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1. 1 skipped."))
        .stderr(predicate::str::contains("entry 2 skipped"));
}

#[test]
fn test_download_markdown() {
    let env = Env::new();
    env.cmd()
        .args(["new", "--title", "Trip to Oslo", "--html", "--text", "<ul><li>boots</li></ul>"])
        .assert()
        .success();

    env.cmd().args(["download", "oslo"]).assert().success();

    let path = env.dir.path().join("out").join("trip-to-oslo.md");
    assert_eq!(fs::read_to_string(path).unwrap(), "# Trip to Oslo\n\n- boots\n");
}

#[test]
fn test_theme() {
    let env = Env::new();
    env.cmd().arg("theme").assert().success().stdout("light\n");
    env.cmd().args(["theme", "toggle"]).assert().success().stdout("dark\n");
    env.cmd().arg("theme").assert().success().stdout("dark\n");

    env.cmd()
        .env("NOTECMD_DARK", "1")
        .args(["theme", "light"])
        .assert()
        .success()
        .stdout("light\n");
}
