use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_byframe"));
    cmd.arg("--log-level").arg("off");
    cmd
}

fn run_with_stdin(mut cmd: Command, stdin: &[u8]) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("byframe should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin)
        .expect("stdin should accept input");
    child.wait_with_output().expect("byframe should finish")
}

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "byframe-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[test]
fn encode_writes_frames() {
    let out = bin()
        .args(["encode", "--data", "test", "--data", ""])
        .output()
        .expect("encode should run");

    assert!(out.status.success());
    assert_eq!(out.stdout, [4, b't', b'e', b's', b't', 0]);
}

#[test]
fn encode_tuple_is_one_frame() {
    let out = bin()
        .args(["encode", "--tuple", "--data", "a", "--data", "b"])
        .output()
        .expect("encode should run");

    assert!(out.status.success());
    assert_eq!(out.stdout, byframe::encode(&byframe::encode_tuple(&[b"a", b"b"])));
}

#[test]
fn decode_prints_json_lines() {
    let mut wire = byframe::encode(b"hello");
    wire.extend(byframe::encode(&[0xFF, 0x00]));

    let mut cmd = bin();
    cmd.args(["--format", "json", "decode"]);
    let out = run_with_stdin(cmd, &wire);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let lines: Vec<serde_json::Value> = String::from_utf8(out.stdout)
        .expect("stdout should be utf-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("line should be json"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["payload"], "hello");
    assert_eq!(lines[0]["wire_size"], 6);
    assert_eq!(lines[1]["payload"], "<binary 2 bytes>");
}

#[test]
fn decode_raw_from_file() {
    let dir = unique_temp_dir("decode-file");
    let path = dir.join("frames.bin");
    let mut wire = byframe::encode(b"ab");
    wire.extend(byframe::encode(b"cd"));
    std::fs::write(&path, &wire).expect("frames should be writable");

    let out = bin()
        .args(["--format", "raw", "decode"])
        .arg(&path)
        .output()
        .expect("decode should run");

    assert!(out.status.success());
    assert_eq!(out.stdout, b"abcd");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_truncated_stream_fails() {
    let mut cmd = bin();
    cmd.args(["--format", "json", "decode"]);
    let out = run_with_stdin(cmd, &[10, 1, 2]);

    assert_eq!(out.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not sufficient"));
}

#[test]
fn decode_limit_exceeded_fails() {
    let mut cmd = bin();
    cmd.args(["--format", "json", "decode", "--limit", "4"]);
    let out = run_with_stdin(cmd, &byframe::encode(b"too long for limit"));

    assert_eq!(out.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&out.stderr).contains("exceeded the limit"));
}

#[test]
fn header_roundtrip_through_cli() {
    let out = bin()
        .args(["--format", "raw", "header", "200"])
        .output()
        .expect("header should run");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "c801");

    let out = bin()
        .args(["--format", "json", "header", "--decode", "c801"])
        .output()
        .expect("header should run");
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json output");
    assert_eq!(value["data_len"], 200);
    assert_eq!(value["header_len"], 2);
}

#[test]
fn tuple_unpacks_framed_input() {
    let wire = byframe::encode(&byframe::encode_tuple(&[b"Jack", b"Black"]));

    let mut cmd = bin();
    cmd.args(["--format", "json", "tuple", "--arity", "2", "--framed"]);
    let out = run_with_stdin(cmd, &wire);

    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json output");
    assert_eq!(value[0]["payload"], "Jack");
    assert_eq!(value[1]["payload"], "Black");
}
