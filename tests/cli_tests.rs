use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reelsmith"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reel timeline and transition engine"));
}

#[test]
fn test_cli_template_generation() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reelsmith"));
    let assert = cmd
        .arg("template")
        .arg("facts")
        .arg("--prompt")
        .arg("volcanoes")
        .arg("--clips")
        .arg("4")
        .assert();

    assert
        .success()
        .stdout(predicate::str::contains("\"prompt\": \"volcanoes\""))
        .stdout(predicate::str::contains("Interesting fact #2 about volcanoes"))
        .stdout(predicate::str::contains("Interesting fact #3").not());
}

#[test]
fn test_cli_inspect_measures_narration() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reelsmith"));
    cmd.arg("inspect")
        .arg("demos/simple_reel.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transition: slide"))
        // 2 s narration: 60 frames + 60 frames spacing
        .stdout(predicate::str::contains("Clip 1: frames 0..120 (120 frames)"))
        .stdout(predicate::str::contains("Clip 3: frames 270..480"))
        .stdout(predicate::str::contains("Total: 480 frames"));
}

#[test]
fn test_cli_frame_in_overlap() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reelsmith"));
    let output = cmd
        .arg("frame")
        .arg("demos/simple_reel.json")
        .arg("--frame")
        .arg("90")
        .output()
        .unwrap();
    assert!(output.status.success());

    let frame: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(frame["frame"], 90);
    assert_eq!(frame["transition"], "slide");
    assert_eq!(frame["layers"].as_array().unwrap().len(), 2);
    assert_eq!(frame["layers"][1]["relativeFrame"], 0);
    assert_eq!(frame["layers"][1]["style"]["transform"]["percent"], 100.0);
    assert_eq!(frame["backgroundMusic"]["volume"], 0.3);
    assert_eq!(frame["layers"][1]["caption"]["style"]["color"], "#FFD700");
    assert_eq!(frame["layers"][1]["caption"]["style"]["font-size"], "5rem");
}

#[test]
fn test_cli_frame_past_end() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reelsmith"));
    cmd.arg("frame")
        .arg("demos/simple_reel.json")
        .arg("--frame")
        .arg("480")
        .assert()
        .failure()
        .stderr(predicate::str::contains("past the end"));
}

#[test]
fn test_cli_render_simple() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("render");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reelsmith"));
    cmd.arg("render")
        .arg("demos/simple_reel.json")
        .arg("--output")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Composed 480 frames for 3 clips"));

    let frames = fs::read_to_string(output_dir.join("frames.jsonl")).unwrap();
    assert_eq!(frames.lines().count(), 480);
    assert!(output_dir.join("timeline.json").exists());
}

#[test]
fn test_cli_transition_table() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reelsmith"));
    cmd.arg("transition")
        .arg("wipe")
        .arg("--duration")
        .arg("90")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transition: wipe over a 90-frame clip"))
        .stdout(predicate::str::contains("clip-path: inset(0 100% 0 0)"));
}

#[test]
fn test_cli_apply_actions() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("reel_state.json");
    let seed = r#"{"prompt": "tides", "clips": [{"text": "The moon pulls the sea"}]}"#;
    fs::write(&state, seed).unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reelsmith"));
    cmd.arg("apply")
        .arg(r#"{"type": "setTransition", "transition": "zoom"}"#)
        .arg("--state")
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Transition: zoom"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(saved["transition"], "zoom");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reelsmith"));
    cmd.arg("apply")
        .arg(r#"{"type": "newReel"}"#)
        .arg("--state")
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Session cleared"));
    assert!(!state.exists());
}
