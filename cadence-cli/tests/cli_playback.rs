use std::io::Write;
use std::process::Stdio;
use std::thread;
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn corpus(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn three_records() -> NamedTempFile {
    corpus(&[
        r#"{"channel":1,"log_time":0,"data":{"n":0}}"#,
        r#"{"channel":1,"log_time":1000000,"data":{"n":1}}"#,
        r#"{"channel":2,"log_time":2000000,"data":{"n":2}}"#,
    ])
}

fn cadence() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cadence"));
    cmd.env("CADENCE_LOG_QUIET", "1");
    cmd
}

#[test]
fn plays_corpus_and_reports_end() {
    let file = three_records();
    cadence()
        .arg(file.path())
        .arg("--exit-on-end")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"op":"message","channel":1,"log_time":0,"data":{"n":0}}"#,
        ))
        .stdout(predicate::str::contains(r#""data":{"n":1}"#))
        .stdout(predicate::str::contains(
            r#"{"op":"message","channel":2,"log_time":2000000,"data":{"n":2}}"#,
        ))
        .stdout(predicate::str::contains(r#"{"op":"time","timestamp":0}"#))
        .stdout(predicate::str::contains(
            r#""op":"playbackState","status":"ended","current_time":2000000"#,
        ));
}

#[test]
fn no_time_suppresses_time_broadcasts() {
    let file = three_records();
    cadence()
        .arg(file.path())
        .args(["--exit-on-end", "--no-time"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""op":"message""#))
        .stdout(predicate::str::contains(r#""op":"time""#).not());
}

#[test]
fn seek_flag_skips_earlier_records() {
    let file = three_records();
    cadence()
        .arg(file.path())
        .args(["--exit-on-end", "--seek", "0.0015"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""data":{"n":2}"#))
        .stdout(predicate::str::contains(r#""data":{"n":0}"#).not())
        .stdout(predicate::str::contains(r#""data":{"n":1}"#).not());
}

#[test]
fn paused_start_answers_status_and_quits() {
    let file = three_records();
    cadence()
        .arg(file.path())
        .arg("--paused")
        .write_stdin("status\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"paused""#))
        .stdout(predicate::str::contains(r#""op":"message""#).not());
}

#[test]
fn json_request_is_answered_with_its_id() {
    let file = three_records();
    let request = r#"{"request_id":"req-7","command":"pause","speed":2.0,"seek_time":1000000}"#;
    cadence()
        .arg(file.path())
        .arg("--paused")
        .write_stdin(format!("{}\nquit\n", request))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""did_seek":true,"request_id":"req-7""#))
        .stdout(predicate::str::contains(r#""current_time":1000000,"speed":2.0"#));
}

#[test]
fn missing_file_fails() {
    cadence()
        .arg("/definitely/not/here.jsonl")
        .assert()
        .failure();
}

#[test]
fn out_of_order_corpus_fails() {
    let file = corpus(&[
        r#"{"channel":1,"log_time":10}"#,
        r#"{"channel":1,"log_time":5}"#,
    ]);
    cadence().arg(file.path()).assert().failure();
}

#[cfg(unix)]
#[test]
fn interrupt_shuts_down_cleanly() {
    let file = three_records();
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin!("cadence"))
        .arg(file.path())
        .arg("--paused")
        .env("CADENCE_LOG_QUIET", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .unwrap();
    thread::sleep(Duration::from_millis(500));

    let killed = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let deadline = Instant::now() + Duration::from_secs(5);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("cadence did not exit after SIGINT");
        }
        thread::sleep(Duration::from_millis(20));
    };
    assert!(status.success(), "exit status {:?}", status);
}
