//! Integration tests driving the built `gridgrab` binary.

use gridgrab::types::{Line, OcrPage, Rect, Word};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{TempDir, tempdir};

const TSV_HEADER: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

const WEATHER: [[&str; 2]; 3] = [["Mon", "rain"], ["Tue", "sun"], ["Wed", "fog"]];

/// Tesseract TSV with every cell of `cells` in its own block, 120px columns
/// and 30px rows, 12px tall words.
fn table_tsv(cells: &[[&str; 2]]) -> String {
    let mut tsv = format!("{}\n1\t1\t0\t0\t0\t0\t0\t0\t300\t100\t-1\t", TSV_HEADER);
    let mut block = 0;
    for (r, row) in cells.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            block += 1;
            let left = 10 + c * 120;
            let top = 10 + r * 30;
            let width = text.chars().count() * 8;
            tsv.push_str(&format!(
                "\n5\t1\t{}\t1\t1\t1\t{}\t{}\t{}\t12\t95.5\t{}",
                block, left, top, width, text
            ));
        }
    }
    tsv
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn gridgrab(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gridgrab"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to run gridgrab binary")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "gridgrab failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_text_command_joins_lines() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "page.tsv", &table_tsv(&WEATHER));

    let output = gridgrab(dir.path(), &["text", "--input", input.to_str().unwrap()]);

    assert_eq!(stdout(&output), "Mon\nrain\nTue\nsun\nWed\nfog\n");
}

#[test]
fn test_table_command_prints_tab_separated_rows() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "page.tsv", &table_tsv(&WEATHER));

    let output = gridgrab(dir.path(), &["table", "--input", input.to_str().unwrap()]);

    assert_eq!(stdout(&output), "Mon\train\nTue\tsun\nWed\tfog\n");
}

#[test]
fn test_table_command_with_query() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "page.tsv", &table_tsv(&WEATHER));

    let output = gridgrab(dir.path(), &["table", "--input", input.to_str().unwrap(), "--query", "SUN"]);
    assert_eq!(stdout(&output), "sun\n");

    let output = gridgrab(
        dir.path(),
        &["table", "--input", input.to_str().unwrap(), "--query", "SUN", "--exact"],
    );
    assert_eq!(stdout(&output), "Mon\train\nTue\tsun\nWed\tfog\n");
}

#[test]
fn test_table_json_output() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "page.tsv", &table_tsv(&WEATHER));

    let output = gridgrab(dir.path(), &["table", "--input", input.to_str().unwrap(), "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();

    assert_eq!(json["text"], "Mon\train\nTue\tsun\nWed\tfog");
    assert_eq!(json["table"]["rows"].as_array().unwrap().len(), 3);
    assert_eq!(json["table"]["columns"].as_array().unwrap().len(), 2);
    assert_eq!(json["units"].as_array().unwrap().len(), 6);
    assert_eq!(json["matches"], 0);
}

#[test]
fn test_json_page_input_with_language_override() {
    let dir = tempdir().unwrap();
    let words = ["東", "京", "tower"]
        .iter()
        .enumerate()
        .map(|(i, text)| Word::new(*text, Rect::from_xywh(10.0 + i as f64 * 20.0, 10.0, 16.0, 16.0), 0))
        .collect();
    let page = OcrPage {
        lines: vec![Line::new(0, words)],
        language: "en-US".to_string(),
        width: 200,
        height: 40,
        ..Default::default()
    };
    let input = write_input(&dir, "page.json", &serde_json::to_string(&page).unwrap());

    let output = gridgrab(dir.path(), &["text", "--input", input.to_str().unwrap()]);
    assert_eq!(stdout(&output), "東 京 tower\n");

    let output = gridgrab(
        dir.path(),
        &["text", "--input", input.to_str().unwrap(), "--language", "ja-JP"],
    );
    assert_eq!(stdout(&output), "東京 tower\n");
}

#[test]
fn test_config_file_is_applied() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "page.tsv", &table_tsv(&[["2O21", "Tota1"], ["a", "b"], ["c", "d"]]));
    let config = write_input(&dir, "settings.yaml", "correct_errors: false\n");

    let output = gridgrab(
        dir.path(),
        &["text", "--input", input.to_str().unwrap(), "--config", config.to_str().unwrap()],
    );
    assert!(stdout(&output).starts_with("2O21\nTota1\n"));

    let output = gridgrab(dir.path(), &["text", "--input", input.to_str().unwrap()]);
    assert!(stdout(&output).starts_with("2021\nTotal\n"));
}

#[test]
fn test_discovered_config_is_applied() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "page.tsv", &table_tsv(&WEATHER));
    write_input(&dir, "gridgrab.toml", "[table]\noutlier_threshold = 3\n");

    let output = gridgrab(dir.path(), &["table", "--input", input.to_str().unwrap()]);

    assert_eq!(stdout(&output), "Mon rain\nTue sun\nWed fog\n");
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "page.tsv", &table_tsv(&WEATHER));
    let config = write_input(&dir, "bad.toml", "[table]\ngrid_spacing = 0\n");

    let output = gridgrab(
        dir.path(),
        &["table", "--input", input.to_str().unwrap(), "--config", config.to_str().unwrap()],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
}

#[test]
fn test_missing_input_fails() {
    let dir = tempdir().unwrap();
    let output = gridgrab(dir.path(), &["text", "--input", "does-not-exist.tsv"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist.tsv"));
}

#[test]
fn test_scale_command() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "page.tsv", &table_tsv(&WEATHER));

    let output = gridgrab(dir.path(), &["scale", "--input", input.to_str().unwrap()]);
    let scale: f64 = stdout(&output).trim().parse().unwrap();
    assert!((scale - 40.0 / 12.0).abs() < 1e-9);

    let output = gridgrab(
        dir.path(),
        &["scale", "--input", input.to_str().unwrap(), "--max-dimension", "600", "--json"],
    );
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["scale"], 2.0);
    assert_eq!(json["words"], 6);
    assert_eq!(json["max_dimension"], 600);
}
