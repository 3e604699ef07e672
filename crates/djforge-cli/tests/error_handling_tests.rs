//! Tests for error messages, suggestions and exit codes.

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn djforge(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("djforge").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn invalid_choice_lists_valid_values() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["new", "shop", "-d", "-y", "--set", "api_style=soap"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("soap"))
        .stderr(predicate::str::contains("Valid values for api_style"))
        .stderr(predicate::str::contains("drf"));

    assert!(!tmp.path().join("shop").exists());
}

#[test]
fn unknown_question_is_rejected() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["new", "shop", "-d", "-y", "--set", "favourite_colour=blue"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("favourite_colour"));
}

#[test]
fn malformed_set_explains_syntax() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["new", "shop", "-d", "-y", "--set", "cache"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"))
        .stderr(predicate::str::contains("djforge questions"));
}

#[test]
fn answer_for_inapplicable_question_is_rejected() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args([
            "new", "shop", "-d", "-y", "--set", "auth_backend=jwt", "--set", "use_2fa=true",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("use_2fa"))
        .stderr(predicate::str::contains("only applies when"));

    assert!(!tmp.path().join("shop").exists());
}

#[test]
fn jwt_without_api_is_rejected() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args([
            "new", "shop", "-d", "-y", "--set", "api_style=none", "--set", "auth_backend=jwt",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("auth_backend"));
}

#[test]
fn unknown_template_is_not_found() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["new", "shop", "-d", "-y", "-t", "flask-app@2.0.0"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("flask-app@2.0.0"))
        .stderr(predicate::str::contains("djforge list"));

    assert!(!tmp.path().join("shop").exists());
}

#[test]
fn malformed_template_id_is_user_error() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["new", "shop", "-d", "-y", "-t", "no-version"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("name@version"));
}

#[test]
fn missing_answers_file_is_reported() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["new", "shop", "-d", "-y", "-a", "nope.yml"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("nope.yml"));
}

#[test]
fn destination_is_a_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("shop"), "").unwrap();

    djforge(tmp.path())
        .args(["new", "shop", "-d", "-y", "--force"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid destination"));
}

#[test]
fn unknown_config_key_is_configuration_error() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["config", "get", "defaults.favourite_colour"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn missing_explicit_config_file() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["--config", "absent.toml", "list"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn verbose_shows_no_hint() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["-v", "new", "shop", "-d", "-y", "--set", "cache"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Use -v / --verbose").not());
}

#[test]
fn quiet_and_verbose_conflict() {
    let tmp = TempDir::new().unwrap();
    djforge(tmp.path())
        .args(["-q", "-v", "list"])
        .assert()
        .failure()
        .code(2);
}
