mod common;

use common::{event_types, fixture_path, json_lines, run_cli, run_cli_with_stdin};

const EXIT_CONFIG_ERROR: i32 = 2;

fn fixture(name: &str) -> String {
    fixture_path(name).to_str().unwrap().to_string()
}

#[test]
fn validate_valid_workout() {
    let file = fixture("tabata.yaml");
    let output = run_cli(&["validate", &file]);
    assert!(
        output.status.success(),
        "validate should succeed for a valid workout: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(": ok"), "unexpected report: {stdout}");
}

#[test]
fn validate_invalid_workout() {
    let file = fixture("invalid.yaml");
    let output = run_cli(&["validate", &file]);
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("exercises[0].name"), "{stdout}");
    assert!(stdout.contains("exercises[1].duration"), "{stdout}");
    assert!(stdout.contains("exercises[2].duration"), "{stdout}");
}

#[test]
fn validate_unknown_field_is_parse_error() {
    let file = fixture("unknown_field.yaml");
    let output = run_cli(&["validate", &file]);
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));
}

#[test]
fn validate_json_output() {
    let good = fixture("tabata.yaml");
    let bad = fixture("invalid.yaml");
    let output = run_cli(&["validate", "--format", "json", &good, &bad]);
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("output should be valid JSON");
    let reports = parsed.as_array().expect("array of file reports");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["valid"], true);
    assert_eq!(reports[1]["valid"], false);
    assert_eq!(reports[1]["errors"].as_array().unwrap().len(), 3);
}

#[test]
fn validate_strict_rejects_warnings() {
    let file = fixture("long_exercise.yaml");

    let lenient = run_cli(&["validate", &file]);
    assert!(lenient.status.success());

    let strict = run_cli(&["validate", "--strict", &file]);
    assert_eq!(strict.status.code(), Some(EXIT_CONFIG_ERROR));
}

#[test]
fn validate_warns_on_fast_tick_interval() {
    let file = fixture("quick.yaml");
    let output = run_cli(&["validate", "--format", "json", &file]);
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let warnings = reports[0]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(
        warnings[0]
            .as_str()
            .unwrap()
            .ends_with("at workout.tick_interval"),
        "{warnings:?}"
    );
}

#[test]
fn validate_missing_file() {
    let output = run_cli(&["validate", "/tmp/nonexistent_hiitclock_workout.yaml"]);
    assert!(!output.status.success());
}

#[test]
fn show_classic_json() {
    let output = run_cli(&["show", "--format", "json"]);
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = plan["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 10);
    assert_eq!(steps[0]["step"], 1);
    assert_eq!(steps[9]["step"], 10);
    let sum: u64 = steps
        .iter()
        .map(|s| s["duration_seconds"].as_u64().unwrap())
        .sum();
    assert_eq!(plan["total_seconds"], sum);
}

#[test]
fn show_workout_file_human() {
    let file = fixture("tabata.yaml");
    let output = run_cli(&["show", "--config", &file]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("Tabata (6 steps, 04:30 total)"), "{stdout}");
    assert!(lines[1].contains("Warm Up"));
    assert!(lines[1].contains("02:00"));
    assert!(lines[1].ends_with("warmup"));
    assert!(lines[6].ends_with("cooldown"));
}

#[test]
fn version_json() {
    let output = run_cli(&["version", "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["name"], "hiitclock");
}

#[test]
fn completions_bash() {
    let output = run_cli(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("hiitclock"));
}

#[test]
fn run_autostart_to_completion() {
    let file = fixture("quick.yaml");
    let output = run_cli(&["-q", "run", "-c", &file, "--autostart", "--format", "json"]);
    assert!(
        output.status.success(),
        "run should exit cleanly: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let events = json_lines(&output);
    assert_eq!(
        event_types(&events),
        [
            "Ready",
            "Control",
            "PhaseEntered",
            "Tick",
            "Tick",
            "PhaseEntered",
            "Tick",
            "Complete"
        ]
    );

    let remaining: Vec<u64> = events
        .iter()
        .filter(|e| e["type"] == "Tick")
        .map(|e| e["remaining_seconds"].as_u64().unwrap())
        .collect();
    assert_eq!(remaining, [2, 1, 1]);

    assert_eq!(events[2]["phase_name"], "Jumping Jacks");
    assert_eq!(events[5]["phase_name"], "Rest");
    assert_eq!(events[5]["kind"], "rest");
    assert_eq!(events[7]["clock"], "00:00");
    assert_eq!(events[7]["progress"], 1.0);

    let sequences: Vec<u64> = events
        .iter()
        .map(|e| e["sequence"].as_u64().unwrap())
        .collect();
    assert_eq!(sequences, (0..8).collect::<Vec<_>>());
}

#[test]
fn run_started_from_stdin() {
    let file = fixture("quick.yaml");
    let output = run_cli_with_stdin(&["-q", "run", "-c", &file, "--format", "json"], "go\n");
    assert!(output.status.success());

    let events = json_lines(&output);
    assert_eq!(events[1]["type"], "Control");
    assert_eq!(events[1]["control"], "start");
    assert_eq!(events.last().unwrap()["type"], "Complete");
}

#[test]
fn run_quit_before_start() {
    let file = fixture("quick.yaml");
    let output = run_cli_with_stdin(&["-q", "run", "-c", &file, "--format", "json"], "q\n");
    assert!(output.status.success());
    assert_eq!(event_types(&json_lines(&output)), ["Ready"]);
}

#[test]
fn run_ignores_unknown_input() {
    let file = fixture("quick.yaml");
    let output =
        run_cli_with_stdin(&["-q", "run", "-c", &file, "--format", "json"], "jump\n\n");
    assert!(output.status.success());
    assert_eq!(event_types(&json_lines(&output)), ["Ready"]);
}

#[test]
fn run_rejects_invalid_workout() {
    let file = fixture("invalid.yaml");
    let output = run_cli(&["-q", "run", "-c", &file]);
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));
    assert!(output.stdout.is_empty());
}
