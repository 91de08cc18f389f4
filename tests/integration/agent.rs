//! Agent-mode end-to-end tests.

use predicates::prelude::*;
use tempfile::TempDir;

use super::plandex;

fn parse_json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("every stdout line is JSON"))
        .collect()
}

#[test]
fn local_json_run_emits_a_complete_event_stream() {
    let temp = TempDir::new().unwrap();

    let output = plandex()
        .args(["agent", "create a hello world script", "--local-mode", "--json"])
        .current_dir(temp.path())
        .output()
        .unwrap();

    assert!(output.status.success());

    let events = parse_json_lines(&output.stdout);
    assert!(events.len() >= 4);
    assert_eq!(events.first().unwrap()["type"], "job_started");
    assert_eq!(events.last().unwrap()["type"], "job_completed");

    // Every event carries the job id.
    let job_id = events[0]["job_id"].as_str().unwrap().to_string();
    assert!(job_id.starts_with("agent-"));
    assert!(events.iter().all(|e| e["job_id"] == job_id.as_str()));

    // The scripted local backend wrote its artifact into the cwd.
    assert!(temp.path().join("hello.py").exists());
}

#[test]
fn human_mode_appends_json_to_the_output_file() {
    let temp = TempDir::new().unwrap();
    let events_path = temp.path().join("events.jsonl");

    plandex()
        .args(["agent", "create a hello world script", "--local-mode"])
        .arg("--output")
        .arg(&events_path)
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("started"));

    // Human rendering on stdout, machine-readable trace in the file.
    let contents = std::fs::read_to_string(&events_path).unwrap();
    let events: Vec<serde_json::Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(events.first().unwrap()["type"], "job_started");
    assert_eq!(events.last().unwrap()["type"], "job_completed");
}

#[test]
fn piped_input_becomes_the_prompt() {
    let temp = TempDir::new().unwrap();

    let output = plandex()
        .args(["agent", "--local-mode", "--json"])
        .current_dir(temp.path())
        .write_stdin("do the piped task\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let events = parse_json_lines(&output.stdout);
    assert_eq!(events.first().unwrap()["type"], "job_started");
}

#[test]
fn prompt_file_is_read() {
    let temp = TempDir::new().unwrap();
    let prompt_path = temp.path().join("prompt.txt");
    std::fs::write(&prompt_path, "task from a file").unwrap();

    let output = plandex()
        .args(["agent", "--local-mode", "--json", "--file"])
        .arg(&prompt_path)
        .current_dir(temp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let events = parse_json_lines(&output.stdout);
    assert_eq!(events.last().unwrap()["type"], "job_completed");
}
