use assert_cmd::Command;

fn shelf() -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_CONFIG_DIR", env!("CARGO_TARGET_TMPDIR"))
        .env("SHELF_ENV", "local")
        .env("SHELF_DATABASE__PATH", ":memory:")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = shelf().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for command in ["serve", "migrate", "seed"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn migrate_applies_both_module_schemas() {
    let output = shelf().arg("migrate").output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "applied 2 migration(s)"
    );
}

#[test]
fn seed_reports_inserted_rows() {
    let output = shelf().arg("seed").output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["authors"], 10);
    assert_eq!(report["books"], 20);
    assert_eq!(report["skipped"], false);
}

#[test]
fn unknown_environment_is_rejected() {
    shelf().env("SHELF_ENV", "moon").arg("migrate").assert().failure();
}
