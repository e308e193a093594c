use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "--quiet", "--"]);
    cmd
}

#[test]
fn test_cli_no_subcommand_shows_help() {
    let output = cargo_bin().output().unwrap();
    // clap exits with error when no subcommand is provided
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Usage") || stderr.contains("turtle-shell"),
        "Expected usage info, got: {stderr}"
    );
}

#[test]
fn test_cli_check_validates_script() {
    let output = cargo_bin()
        .args(["check", "demos/square.turtle"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("is valid"));
    assert!(stdout.contains("7 lines"));
}

#[test]
fn test_cli_check_reports_bad_lines() {
    let output = cargo_bin()
        .args(["check", "demos/broken.turtle"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error at line 2"), "got: {stderr}");
    assert!(stderr.contains("Error at line 3"), "got: {stderr}");
    assert!(!stderr.contains("Error at line 4"), "got: {stderr}");
}

#[test]
fn test_cli_check_missing_file_errors() {
    let output = cargo_bin()
        .args(["check", "nonexistent.turtle"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_cli_run_prints_command_log() {
    let output = cargo_bin()
        .args(["run", "demos/square.turtle"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "red");
    assert_eq!(lines[1], "penwidth 3");
    assert_eq!(&lines[2..5], ["pen 255 0 0", "penwidth 3", "pendown"]);
    assert_eq!(lines.last().copied(), Some("circle 20"));
}

#[test]
fn test_cli_run_output_replays_identically() {
    let dir = tempfile::tempdir().unwrap();
    let first = cargo_bin()
        .args(["run", "demos/star.turtle"])
        .output()
        .unwrap();
    assert!(first.status.success());

    let log_path = dir.path().join("star.log");
    std::fs::write(&log_path, &first.stdout).unwrap();
    let second = cargo_bin()
        .arg("run")
        .arg(&log_path)
        .output()
        .unwrap();
    assert!(second.status.success());
    assert_eq!(
        String::from_utf8_lossy(&second.stdout),
        String::from_utf8_lossy(&first.stdout)
    );
}

#[test]
fn test_cli_run_with_bad_lines_fails_after_drawing() {
    let output = cargo_bin()
        .args(["run", "demos/broken.turtle"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), ["move 50", "right 90"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Line 2: Distance must be between 1 and 200."));
    assert!(stderr.contains("Line 3: Invalid command: fly"));
}

#[test]
fn test_cli_run_saves_image() {
    let dir = tempfile::tempdir().unwrap();
    let output = cargo_bin()
        .args(["run", "demos/square.turtle", "--image"])
        .arg(dir.path().join("square"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let image = dir.path().join("square.scene.json");
    assert!(image.exists());
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&image).unwrap()).unwrap();
    assert_eq!(saved["strokes"].as_array().unwrap().len(), 4);
    assert_eq!(saved["rings"].as_array().unwrap().len(), 1);
}

#[test]
fn test_cli_run_uses_config_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("one.turtle");
    std::fs::write(&script, "square 10\n").unwrap();
    let output = cargo_bin()
        .args(["--config", "demos/settings.conf", "run"])
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("pen 0 0 0\npenwidth 2\npendown\n"), "got: {stdout}");
}

#[test]
fn test_cli_log_file_receives_events() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("turtle.log");
    let output = cargo_bin()
        .args(["run", "demos/broken.turtle", "--log-file"])
        .arg(&log)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let written = std::fs::read_to_string(&log).unwrap();
    assert!(written.contains("WARN"), "got: {written}");
}
