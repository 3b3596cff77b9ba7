//! Uninstall integration tests using the REAL cco binary

mod common;

use common::*;
use predicates::prelude::*;

fn installed_home() -> TestHome {
    let home = TestHome::new();
    for path in manifest_paths() {
        let body = if path == PRIMARY {
            primary_body("4.2.0")
        } else {
            artifact_body(&path)
        };
        home.write_file(&path, &body);
    }
    home.write_file("rules/team.md", "team rules");
    home.write_file("skills/my-skill/SKILL.md", "mine");
    home.write_file("agents/reviewer.md", "mine");
    home
}

#[test]
fn test_uninstall_all_yes_removes_managed_entries() {
    let home = installed_home();

    cco_cmd(&home)
        .args(["uninstall", "--all", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed rules/cco-rules.md"))
        .stdout(predicate::str::contains("Removed skills/cco-commit"))
        .stdout(predicate::str::contains("Uninstalled 13 artifact(s)"));

    for path in manifest_paths() {
        assert!(!home.file_exists(&path), "still present: {path}");
    }
    assert!(home.file_exists("rules/team.md"));
    assert!(home.file_exists("skills/my-skill/SKILL.md"));
    assert!(home.file_exists("agents/reviewer.md"));
}

#[test]
fn test_uninstall_dry_run_keeps_files() {
    let home = installed_home();

    cco_cmd(&home)
        .args(["uninstall", "--all", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN] Would remove agents/cco-agent-apply.md"));

    assert!(home.file_exists(PRIMARY));
}

#[test]
fn test_uninstall_with_nothing_installed() {
    let home = TestHome::new();

    cco_cmd(&home)
        .args(["uninstall", "--all", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to uninstall"))
        .stdout(predicate::str::contains("Nothing removed").not());

    cco_cmd(&home)
        .arg("uninstall")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to uninstall"));
}

#[test]
fn test_uninstall_then_version_reports_not_installed() {
    let home = installed_home();

    cco_cmd(&home)
        .args(["uninstall", "--all", "--yes"])
        .assert()
        .success();

    cco_cmd(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed: not installed"));
}
