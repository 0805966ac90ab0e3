use std::process::{Command, Stdio};

/// Exit code the CLI uses for request errors.
const REQUEST_ERROR: i32 = 2;

fn run_with_request(request: &str) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-p", "say-so", "--", request])
        .output()
        .expect("Failed to execute")
}

#[test]
fn test_cli_help_flag() {
    let output = Command::new("cargo")
        .args(["run", "-p", "say-so", "--", "--help"])
        .output()
        .expect("Failed to execute");

    assert!(output.status.success(), "Help flag should exit with code 0");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Speak a JSON-encoded utterance"),
        "Help output should contain description"
    );
    assert!(
        stdout.contains("Usage:"),
        "Help output should contain usage information"
    );
}

#[test]
fn test_cli_version_flag() {
    let output = Command::new("cargo")
        .args(["run", "-p", "say-so", "--", "--version"])
        .output()
        .expect("Failed to execute");

    assert!(
        output.status.success(),
        "Version flag should exit with code 0"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("say-so"),
        "Version output should contain binary name"
    );
}

#[test]
fn test_cli_rejects_malformed_json() {
    let output = run_with_request("not json");

    assert_eq!(
        output.status.code(),
        Some(REQUEST_ERROR),
        "Malformed JSON should exit with the request-error code"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("not valid JSON"),
        "Error message should name the problem, got: {stderr}"
    );
}

#[test]
fn test_cli_rejects_object_without_text() {
    let output = run_with_request("{}");

    assert_eq!(
        output.status.code(),
        Some(REQUEST_ERROR),
        "An object without `text` should exit with the request-error code"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing the required"),
        "Error message should name the missing field, got: {stderr}"
    );
}

#[test]
fn test_cli_rejects_non_object_json() {
    let output = run_with_request("[]");

    assert_eq!(output.status.code(), Some(REQUEST_ERROR));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("JSON object"),
        "Error message should require an object, got: {stderr}"
    );
}

#[test]
fn test_cli_rejects_wrong_typed_text() {
    let output = run_with_request(r#"{"text":42}"#);

    assert_eq!(output.status.code(), Some(REQUEST_ERROR));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("wrong type"),
        "Error message should name the type problem, got: {stderr}"
    );
}

#[test]
fn test_cli_empty_stdin_is_a_request_error() {
    let mut child = Command::new("cargo")
        .args(["run", "-p", "say-so"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn");

    // Close stdin immediately without writing anything.
    drop(child.stdin.take());

    let output = child.wait_with_output().expect("Failed to wait");
    assert_eq!(
        output.status.code(),
        Some(REQUEST_ERROR),
        "Empty stdin should exit with the request-error code"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no request provided"),
        "Error message should be displayed when no input is provided, got: {stderr}"
    );
}

#[test]
#[ignore] // Produces audio and needs an installed engine - run manually.
fn test_cli_speaks_a_plain_request() {
    let output = run_with_request(r#"{"text":"hello from the test suite"}"#);
    assert!(
        output.status.success(),
        "A plain request should speak and exit 0"
    );
}
