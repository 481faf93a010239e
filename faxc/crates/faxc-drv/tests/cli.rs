//! End-to-end tests driving the `faxc` binary as a subprocess, the way a
//! user invokes it from a shell.

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
 std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
 .join("tests")
 .join("fixtures")
 .join(name)
 .to_string_lossy()
 .into_owned()
}

#[test]
fn emit_tokens_prints_a_token_stream_and_exits_zero() {
 Command::cargo_bin("faxc")
 .unwrap()
 .arg("--emit-tokens")
 .arg(fixture("hello.fax"))
 .assert()
 .success()
 .stdout(predicate::str::is_empty().not());
}

#[test]
fn compiling_without_an_output_flag_writes_a_out_in_the_current_directory() {
 let dir = tempfile::tempdir().unwrap();
 Command::cargo_bin("faxc")
 .unwrap()
 .current_dir(dir.path())
 .arg(fixture("hello.fax"))
 .assert()
 .success();

 assert!(dir.path().join("a.out").exists());
}

#[test]
fn dash_o_writes_the_binary_to_the_requested_path() {
 let dir = tempfile::tempdir().unwrap();
 let out = dir.path().join("hello");

 Command::cargo_bin("faxc")
 .unwrap()
 .arg("-o")
 .arg(&out)
 .arg(fixture("hello.fax"))
 .assert()
 .success();

 assert!(out.exists());
}

#[test]
fn missing_input_file_is_reported_on_stderr_with_a_nonzero_exit() {
 Command::cargo_bin("faxc")
 .unwrap()
 .assert()
 .failure()
 .stderr(predicate::str::contains("error"));
}

#[test]
fn unknown_flag_is_rejected() {
 Command::cargo_bin("faxc")
 .unwrap()
 .arg("--not-a-real-flag")
 .arg(fixture("hello.fax"))
 .assert()
 .failure();
}
