// tests/integration_test.rs
use std::process::Command;

fn git_rollout() -> Command {
    Command::new(env!("CARGO_BIN_EXE_git-rollout"))
}

#[test]
fn test_git_rollout_help() {
    let output = git_rollout()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-rollout"));
    for command in ["status", "tag", "draft", "deploy", "version"] {
        assert!(stdout.contains(command), "help should list '{}'", command);
    }
}

#[test]
fn test_git_rollout_version() {
    let output = git_rollout()
        .arg("version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.trim(),
        format!("git-rollout {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn test_missing_token_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("empty.toml");
    std::fs::write(&config_path, "").unwrap();

    let output = git_rollout()
        .args(["--config", config_path.to_str().unwrap(), "status"])
        .env_remove("GITHUB_TOKEN")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("access token"));
}

#[test]
fn test_malformed_interval_exits_before_network() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("rollout.toml");
    std::fs::write(
        &config_path,
        r#"
[generic]
base-branch = "master"
release-branches = "release-a"

[github]
access-token = "token"
default-owner = "acme"
default-repo = "shop"
api-url = "http://127.0.0.1:9"
"#,
    )
    .unwrap();

    let output = git_rollout()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "deploy",
            "--release-interval",
            "10m,whenever",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error parsing interval"));
}
