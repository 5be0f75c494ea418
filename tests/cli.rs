use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// Write `frames` uniform bgr24 frames of `width x height` to `path`.
fn write_raw(path: &Path, width: usize, height: usize, frames: &[[u8; 3]]) {
    let mut bytes = Vec::new();
    for pixel in frames {
        for _ in 0..width * height {
            bytes.extend_from_slice(pixel);
        }
    }
    fs::write(path, bytes).unwrap();
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_grid_mode_output() {
    let temp = tempdir().unwrap();
    let video = temp.path().join("clip.raw");
    write_raw(&video, 4, 4, &[[51, 51, 51], [0, 0, 255]]);

    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--video")
        .arg(&video)
        .arg("--raw")
        .arg("4x4")
        .arg("--width")
        .arg("2")
        .arg("--height")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 frames"))
        .stdout(predicate::str::contains("Done!"));

    // Default output path replaces the extension.
    let output = temp.path().join("clip.json");
    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(
        text,
        r#"{"width":2,"height":2,"frames":{"f0":"0.2,0.2,0.2,4,1.0,0.0,0.0,4"}}"#
    );
}

#[test]
fn test_palette_mode_output() {
    let temp = tempdir().unwrap();
    let video = temp.path().join("clip.raw");
    let palette = temp.path().join("palette.json");
    let output = temp.path().join("out.json");
    write_raw(&video, 2, 2, &[[0, 255, 0], [255, 0, 0], [0, 0, 255]]);
    fs::write(&palette, r#"{"colours":[[1,0,0],[0,1,0],[0,0,1]]}"#).unwrap();

    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--video")
        .arg(&video)
        .arg("--raw")
        .arg("2x2")
        .arg("--width")
        .arg("1")
        .arg("--height")
        .arg("1")
        .arg("--palette")
        .arg(&palette)
        .arg("--buckets")
        .arg("2")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 colors from palette"))
        .stdout(predicate::str::contains("Bucket size: 3"));

    let json = read_json(&output);
    assert_eq!(json["f0"], "1,1,2,1");
    assert_eq!(json["f1"], "0,1");
    assert!(json.get("width").is_none());
}

#[test]
fn test_frameskip_and_total_frames() {
    let temp = tempdir().unwrap();
    let video = temp.path().join("clip.raw");
    let output = temp.path().join("out.json");
    let frames: Vec<[u8; 3]> = (0..10u8).map(|i| [i, i, i]).collect();
    write_raw(&video, 1, 1, &frames);

    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--video")
        .arg(&video)
        .arg("--raw")
        .arg("1x1")
        .arg("--width")
        .arg("1")
        .arg("--height")
        .arg("1")
        .arg("--frameskip")
        .arg("1")
        .arg("--totalframes")
        .arg("3")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 3 frames"));

    let json = read_json(&output);
    let values: Vec<&str> = json["frames"]["f0"].as_str().unwrap().split(',').collect();
    // Three one-run frames: r, g, b, count each.
    assert_eq!(values.len(), 12);
    assert_eq!(values[0], "0.0");
    assert_eq!(values[4], (2.0f64 / 255.0).to_string());
}

#[test]
fn test_config_file_with_override() {
    let temp = tempdir().unwrap();
    let video = temp.path().join("clip.raw");
    let config = temp.path().join("config.json");
    let output = temp.path().join("out.json");
    write_raw(&video, 4, 4, &[[0, 0, 0]]);
    fs::write(&config, r#"{"width":4,"height":4,"buckets":1}"#).unwrap();

    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--video")
        .arg(&video)
        .arg("--raw")
        .arg("4x4")
        .arg("--config")
        .arg(&config)
        .arg("--width")
        .arg("1")
        .arg("--height")
        .arg("1")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let json = read_json(&output);
    assert_eq!(json["width"], 1);
    assert_eq!(json["frames"]["f0"], "0.0,0.0,0.0,1");
}

#[test]
fn test_rejects_non_positive_width() {
    let temp = tempdir().unwrap();
    let video = temp.path().join("clip.raw");
    write_raw(&video, 2, 2, &[[0, 0, 0]]);

    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--video")
        .arg(&video)
        .arg("--raw")
        .arg("2x2")
        .arg("--width")
        .arg("0")
        .arg("--height")
        .arg("2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Width and height must be positive"));

    assert!(!temp.path().join("clip.json").exists());
}

#[test]
fn test_rejects_negative_frameskip() {
    let temp = tempdir().unwrap();
    let video = temp.path().join("clip.raw");
    write_raw(&video, 2, 2, &[[0, 0, 0]]);

    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--video")
        .arg(&video)
        .arg("--raw")
        .arg("2x2")
        .arg("--width")
        .arg("1")
        .arg("--height")
        .arg("1")
        .arg("--frameskip")
        .arg("-1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Frameskip must be non-negative"));
}

#[test]
fn test_missing_video_fails() {
    let temp = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--video")
        .arg(temp.path().join("missing.raw"))
        .arg("--raw")
        .arg("2x2")
        .arg("--width")
        .arg("1")
        .arg("--height")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Frame source unavailable"));
}

#[test]
fn test_empty_video_fails() {
    let temp = tempdir().unwrap();
    let video = temp.path().join("empty.raw");
    fs::write(&video, b"").unwrap();

    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--video")
        .arg(&video)
        .arg("--raw")
        .arg("2x2")
        .arg("--width")
        .arg("1")
        .arg("--height")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No frames available"));
}

#[test]
fn test_print_config() {
    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"buckets\": 1"));
}

#[test]
fn test_negative_total_frames_means_all() {
    let temp = tempdir().unwrap();
    let video = temp.path().join("clip.raw");
    let output = temp.path().join("out.json");
    write_raw(&video, 1, 1, &[[0, 0, 0], [1, 1, 1], [2, 2, 2]]);

    let mut cmd = Command::cargo_bin("vid2json").unwrap();
    cmd.arg("--video")
        .arg(&video)
        .arg("--raw")
        .arg("1x1")
        .arg("--width")
        .arg("1")
        .arg("--height")
        .arg("1")
        .arg("--totalframes")
        .arg("-1")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 3 frames"));
}
