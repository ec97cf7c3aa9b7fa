use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn write_script(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("keyscript_{}_{name}.txt", std::process::id()));
    fs::write(&path, content).expect("Failed to write test script");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_keyscript"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute keyscript")
}

#[test]
fn test_log_backend_runs_script() {
    let path = write_script(
        "log",
        "REM dry run\nDEFAULT_DELAY 10\nGUI r\nSTRING notepad\nENTER\nREPEAT 2\n",
    );

    let output = run(&[
        "--script",
        path.to_str().unwrap(),
        "--backend",
        "log",
        "--start-delay-ms",
        "0",
    ]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "keyscript failed: {stderr}");
    assert!(stderr.contains("press"), "no key presses logged: {stderr}");
    assert!(stderr.contains("notepad"), "no text logged: {stderr}");
    assert!(stderr.contains("script finished"), "no completion logged: {stderr}");

    let _ = fs::remove_file(path);
}

#[test]
fn test_parse_error_fails_run() {
    let path = write_script("bad", "STRING fine\nDELAY abc\nSTRING never\n");

    let output = run(&[
        "--script",
        path.to_str().unwrap(),
        "--backend",
        "log",
        "--start-delay-ms",
        "0",
    ]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("DELAY abc"), "error lacks line text: {stderr}");
    assert!(!stderr.contains("never"), "ran past the bad line: {stderr}");

    let _ = fs::remove_file(path);
}

#[test]
fn test_pty_backend_requires_command() {
    let path = write_script("nocmd", "ENTER\n");

    let output = run(&["--script", path.to_str().unwrap()]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("--command"), "got: {stderr}");

    let _ = fs::remove_file(path);
}

#[test]
fn test_missing_script_file() {
    let output = run(&["--script", "/nonexistent/keyscript.txt", "--backend", "log"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read script file"));
}

#[test]
fn test_pty_backend_types_into_shell() {
    let path = write_script(
        "pty",
        "STRING echo keyscript-ok\nENTER\nDELAY 200\nSTRING exit\nENTER\n",
    );

    let output = run(&[
        "--script",
        path.to_str().unwrap(),
        "--command",
        "sh",
        "--linger-ms",
        "300",
    ]);

    assert!(
        output.status.success(),
        "keyscript failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("keyscript-ok"),
        "Output should contain typed command: {stdout}"
    );

    let _ = fs::remove_file(path);
}
