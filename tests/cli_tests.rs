//! CLI integration tests
//!
//! These tests run the built binary against temporary JSON inputs.

#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

fn soapenc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_soapenc"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn json_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

// ============================================================================
// Encode Command Tests
// ============================================================================

#[test]
fn test_cli_encode_encoded() {
    let input = json_file("[1, 2, 3]");
    let output = soapenc(&["encode", "--name", "list", input.path().to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "encode should succeed");
    assert!(stdout.contains(r#"<list xsi:type="SOAP-ENC:Array" SOAP-ENC:arrayType="xsd:int[3]">"#));
    assert!(stdout.contains(r#"<item xsi:type="xsd:int">3</item>"#));
}

#[test]
fn test_cli_encode_literal() {
    let input = json_file(r#"{"user": "ann", "id": 4}"#);
    let output = soapenc(&[
        "encode",
        "--use",
        "literal",
        "--name",
        "account",
        input.path().to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert_eq!(stdout.trim(), "<account><user>ann</user><id>4</id></account>");
}

#[test]
fn test_cli_encode_envelope() {
    let input = json_file(r#""hello""#);
    let output = soapenc(&[
        "encode",
        "--envelope",
        "--name",
        "greeting",
        input.path().to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><SOAP-ENV:Envelope SOAP-ENV:encodingStyle="#));
    assert!(stdout.contains(r#"<SOAP-ENV:Body><greeting xsi:type="xsd:string">hello</greeting></SOAP-ENV:Body>"#));
}

#[test]
fn test_cli_encode_envelope_without_encoding_style() {
    let input = json_file("true");
    let output = soapenc(&[
        "encode",
        "--envelope",
        "--no-encoding-style",
        input.path().to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(!stdout.contains("encodingStyle"));
    assert!(stdout.contains(r#"<noname xsi:type="xsd:boolean">true</noname>"#));
}

#[test]
fn test_cli_encode_with_config_and_debug() {
    let input = json_file(r#""a&b""#);
    let config = json_file(r#"{"char_encoding": false, "title": "cli"}"#);
    let output = soapenc(&[
        "encode",
        "--debug",
        "--config",
        config.path().to_str().unwrap(),
        "--use",
        "literal",
        "--name",
        "t",
        input.path().to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert_eq!(stdout.trim(), "<t>a&b</t>");
    assert!(stderr.starts_with("<!--"));
    assert!(stderr.contains("cli: in serialize_val: name=t"));
}

#[test]
fn test_cli_encode_bad_use() {
    let input = json_file("1");
    let output = soapenc(&["encode", "--use", "rpc", input.path().to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "unknown use should fail");
    assert!(stderr.contains("unknown use 'rpc'"));
}

#[test]
fn test_cli_encode_invalid_json() {
    let input = json_file("{not json");
    let output = soapenc(&["encode", input.path().to_str().unwrap()]);

    assert!(!output.status.success());
}

#[test]
fn test_cli_encode_envelope_namespaces() {
    let input = json_file("1");
    let output = soapenc(&[
        "encode",
        "--envelope",
        "--namespace",
        "tns=urn:service",
        "--namespace",
        "xsd=urn:override",
        input.path().to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains(r#" xmlns:xsd="urn:override""#));
    assert!(stdout.contains(r#" xmlns:tns="urn:service">"#));
}

#[test]
fn test_cli_encode_bad_namespace_binding() {
    let input = json_file("1");
    let output = soapenc(&[
        "encode",
        "--envelope",
        "--namespace",
        "urn:service",
        input.path().to_str().unwrap(),
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("namespace error: expected prefix=uri"));
}

#[test]
fn test_cli_encode_invalid_name() {
    let input = json_file("1");
    let output = soapenc(&["encode", "--name", "a b", input.path().to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("name error: Invalid QName: 'a b'"));
}

#[test]
fn test_cli_encode_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let output = soapenc(&["encode", missing.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("I/O error:"));
}

// ============================================================================
// Fault Command Tests
// ============================================================================

#[test]
fn test_cli_fault() {
    let output = soapenc(&[
        "fault",
        "--code",
        "SOAP-ENV:Client",
        "--message",
        "Invalid token",
        "--detail",
        r#"{"reason": "expired"}"#,
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains(r#"<faultcode xsi:type="xsd:string">SOAP-ENV:Client</faultcode>"#));
    assert!(stdout.contains(r#"<faultstring xsi:type="xsd:string">Invalid token</faultstring>"#));
    assert!(stdout.contains(r#"<detail><reason xsi:type="xsd:string">expired</reason></detail>"#));
}
