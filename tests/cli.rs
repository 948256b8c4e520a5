//! Binary smoke tests: flag surface, config round trip, exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn osticket() -> Command {
    let mut cmd = Command::cargo_bin("osticket").expect("binary should build");
    // Keep the environment from leaking credentials into the tests.
    cmd.env_remove("OSTICKET_BASE_URL");
    cmd.env_remove("OSTICKET_API_KEY");
    cmd
}

#[test]
fn help_lists_command_groups() {
    osticket()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("ticket"))
        .stdout(predicate::str::contains("user"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn config_set_show_clear_round_trip() {
    let dir = tempdir().expect("tempdir");
    let dir_arg = dir.path().to_string_lossy().to_string();

    osticket()
        .args([
            "--config-dir",
            &dir_arg,
            "config",
            "set",
            "--url",
            "https://helpdesk.example.com/api/http.php",
            "--key",
            "ABCDEF0123456789XYZW",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Base URL set"))
        .stdout(predicate::str::contains("API key set"));

    osticket()
        .args(["--config-dir", &dir_arg, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://helpdesk.example.com/api/http.php",
        ))
        // The key is masked, never echoed whole.
        .stdout(predicate::str::contains("ABCDEF01...XYZW"))
        .stdout(predicate::str::contains("ABCDEF0123456789XYZW").not())
        .stdout(predicate::str::contains("[config]"));

    osticket()
        .args(["--config-dir", &dir_arg, "config", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration cleared"));

    osticket()
        .args(["--config-dir", &dir_arg, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn config_show_reports_env_source() {
    let dir = tempdir().expect("tempdir");
    let dir_arg = dir.path().to_string_lossy().to_string();

    osticket()
        .env("OSTICKET_BASE_URL", "https://from-env.example.com")
        .args(["--config-dir", &dir_arg, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://from-env.example.com"))
        .stdout(predicate::str::contains("env:OSTICKET_BASE_URL"));
}

#[test]
fn config_set_rejects_bad_url() {
    let dir = tempdir().expect("tempdir");
    let dir_arg = dir.path().to_string_lossy().to_string();

    osticket()
        .args([
            "--config-dir",
            &dir_arg,
            "config",
            "set",
            "--url",
            "helpdesk.example.com",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("http://"));
}

#[test]
fn config_set_without_flags_nudges() {
    let dir = tempdir().expect("tempdir");
    let dir_arg = dir.path().to_string_lossy().to_string();

    osticket()
        .args(["--config-dir", &dir_arg, "config", "set"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--url and/or --key"));
}

#[test]
fn network_command_requires_configuration() {
    let dir = tempdir().expect("tempdir");
    let dir_arg = dir.path().to_string_lossy().to_string();

    osticket()
        .args(["--config-dir", &dir_arg, "ticket", "get", "123456"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not configured"))
        .stderr(predicate::str::contains("osticket config set"));
}

#[test]
fn user_get_requires_id_or_email() {
    let dir = tempdir().expect("tempdir");
    let dir_arg = dir.path().to_string_lossy().to_string();

    osticket()
        .env("OSTICKET_BASE_URL", "http://127.0.0.1:9")
        .env("OSTICKET_API_KEY", "key")
        .args(["--config-dir", &dir_arg, "user", "get"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--id or --email"));
}

#[test]
fn date_search_requires_both_bounds() {
    let dir = tempdir().expect("tempdir");
    let dir_arg = dir.path().to_string_lossy().to_string();

    osticket()
        .env("OSTICKET_BASE_URL", "http://127.0.0.1:9")
        .env("OSTICKET_API_KEY", "key")
        .args([
            "--config-dir",
            &dir_arg,
            "ticket",
            "search",
            "--from",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--from and --to"));
}
