// tests/cli_test.rs
//
// Runs the audioprintr binary against generated WAV files.
//
// Usage:
//   cargo test --test cli_test -- --nocapture

mod test_utils;

use std::fs;
use test_utils::*;

#[test]
fn test_json_report_per_file() {
    let dir = temp_dir();
    let path = dir.join("tone.wav");
    write_wav(&path, TEST_SAMPLE_RATE, &[music_like(TEST_SAMPLE_RATE, 2.0, 3)]);

    let output = run_json_analysis(&path);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    let reports = json.as_array().expect("Expected an array of reports");
    assert_eq!(reports.len(), 1);

    let report = &reports[0];
    assert_eq!(report["sampleRate"], TEST_SAMPLE_RATE);
    assert_eq!(report["fileHash"].as_str().map(str::len), Some(40));

    let channels = report["channels"].as_array().unwrap();
    assert_eq!(channels.len(), 1);
    let fingerprints = channels[0]["fingerprints"].as_array().unwrap();
    assert!(!fingerprints.is_empty());
    assert!(fingerprints
        .iter()
        .all(|f| f["hash"].as_str().map(str::len) == Some(20) && f["offset"].is_u64()));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_overrides_change_hash_length() {
    let dir = temp_dir();
    let path = dir.join("tone.wav");
    write_wav(&path, TEST_SAMPLE_RATE, &[music_like(TEST_SAMPLE_RATE, 2.0, 5)]);

    let output = run_audioprintr(&path)
        .args(["--format", "json", "--hash-length", "8", "--fan-value", "3"])
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let fingerprints = json[0]["channels"][0]["fingerprints"].as_array().unwrap();
    assert!(fingerprints.iter().all(|f| f["hash"].as_str().map(str::len) == Some(8)));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_directory_input_and_plots() {
    let dir = temp_dir();
    let plots = dir.join("plots");
    write_wav(&dir.join("a.wav"), 8000, &[music_like(8000, 2.0, 7)]);
    write_wav(&dir.join("b.wav"), 8000, &[music_like(8000, 2.0, 9), silence(16000)]);
    fs::write(dir.join("notes.txt"), "not audio").unwrap();

    let output = run_audioprintr(&dir)
        .args(["--format", "json", "--window-size", "1024", "--plot"])
        .arg(&plots)
        .output()
        .expect("Failed to execute");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);

    assert!(plots.join("a_ch0.png").exists());
    assert!(plots.join("b_ch0.png").exists());
    assert!(plots.join("b_ch1.png").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_same_stem_plots_do_not_collide() {
    let dir = temp_dir();
    let plots = dir.join("plots");
    fs::create_dir_all(dir.join("a")).unwrap();
    fs::create_dir_all(dir.join("b")).unwrap();
    write_wav(&dir.join("a").join("x.wav"), 8000, &[music_like(8000, 2.0, 11)]);
    write_wav(&dir.join("b").join("x.wav"), 8000, &[music_like(8000, 2.0, 13)]);

    let output = run_audioprintr(&dir)
        .args(["--format", "json", "--window-size", "1024", "--plot"])
        .arg(&plots)
        .output()
        .expect("Failed to execute");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    assert!(plots.join("x_0_ch0.png").exists());
    assert!(plots.join("x_1_ch0.png").exists());
    assert!(!plots.join("x_ch0.png").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_undecodable_file_fails_run() {
    let dir = temp_dir();
    let path = dir.join("broken.wav");
    fs::write(&path, b"RIFF not really a wave file").unwrap();

    let output = run_audioprintr(&path).output().expect("Failed to execute");
    assert!(!output.status.success());

    let _ = fs::remove_dir_all(&dir);
}
