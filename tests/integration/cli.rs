//! Tests of the `metaflat` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use metaflat_cli::test_utils::{BRACKET_TEMPLATES, RASTER_RECORD, write_fixture};

fn metaflat(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("metaflat").unwrap();
    cmd.current_dir(dir.path()).env_remove("METAFLAT_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_convert_with_template_flag() {
    let temp = TempDir::new().unwrap();
    write_fixture(temp.path(), "templates.json", BRACKET_TEMPLATES);
    write_fixture(temp.path(), "input.json", r#"{"a": 1, "b": [2, 3]}"#);

    metaflat(&temp)
        .args(["--templates", "templates.json", "convert", "input.json"])
        .assert()
        .success()
        .stdout("{\na=1;\n[\n0=2;\n1=3;\n]\n}\n");
}

#[test]
fn test_convert_lines_from_stdin_yaml() {
    let temp = TempDir::new().unwrap();

    let output = metaflat(&temp)
        .args(["convert", "--lines", "--format", "yaml", "-"])
        .write_stdin("a: 1\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let lines: Vec<String> = serde_json::from_slice(&output).unwrap();
    assert_eq!(lines, ["{\n", "a = 1\n", "}\n"]);
}

#[test]
fn test_settings_file_is_used() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("t")).unwrap();
    write_fixture(&temp.path().join("t"), "bracket.json", BRACKET_TEMPLATES);
    write_fixture(temp.path(), "metaflat.toml", "templates = \"t/bracket.json\"\nmax_depth = 1\n");
    write_fixture(temp.path(), "flat.json", r#"{"a": true}"#);
    write_fixture(temp.path(), "deep.json", r#"{"a": {"b": {}}}"#);

    metaflat(&temp)
        .args(["convert", "flat.json"])
        .assert()
        .success()
        .stdout("{\na=true;\n}\n");

    metaflat(&temp)
        .args(["convert", "deep.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nesting depth limit of 1 exceeded"));

    // Flag beats the settings file
    metaflat(&temp)
        .args(["--max-depth", "5", "convert", "deep.json"])
        .assert()
        .success();
}

#[test]
fn test_convert_scalar_root_fails() {
    let temp = TempDir::new().unwrap();
    write_fixture(temp.path(), "scalar.json", "\"text\"");

    metaflat(&temp)
        .args(["convert", "scalar.json"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("expected a list or a map"));
}

#[test]
fn test_lookup() {
    let temp = TempDir::new().unwrap();

    metaflat(&temp)
        .args(["lookup", "raster_properties.width", "in_int"])
        .assert()
        .success()
        .stdout("\"{name} = {value}\\n\"\n");

    metaflat(&temp)
        .args(["lookup", "a", "*next_in_int", "--optional"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No template for '*next_in_int' at 'a'"));
}

#[test]
fn test_validate() {
    let temp = TempDir::new().unwrap();
    write_fixture(temp.path(), "good.json", BRACKET_TEMPLATES);
    write_fixture(temp.path(), "bad.yaml", "'*.in_int': '{nmae}'\n");

    metaflat(&temp)
        .args(["validate", "good.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid templates").and(predicate::str::contains("9 entries")));

    metaflat(&temp)
        .args(["validate", "bad.yaml", "--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("did you mean '{name}'"));
}

#[test]
fn test_document() {
    let temp = TempDir::new().unwrap();
    write_fixture(temp.path(), "record.json", RASTER_RECORD);

    let output = metaflat(&temp)
        .args(["document", "record.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let document: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(document["id"], "7/scenes/dem.tif");
    assert!(document["content"].as_str().unwrap().contains("width = 512\n"));

    metaflat(&temp)
        .args(["document", "record.json", "--stored-size", "1048576"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_document_skips_nodata_objects() {
    let temp = TempDir::new().unwrap();
    let record = RASTER_RECORD.replace("/scenes/dem.tif", "/scenes/dem_NODATA");
    write_fixture(temp.path(), "record.json", &record);

    metaflat(&temp)
        .args(["--verbose", "document", "record.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not indexed"));
}

#[test]
fn test_invalid_template_file_reports_suggestion() {
    let temp = TempDir::new().unwrap();
    write_fixture(temp.path(), "input.json", "{}");

    metaflat(&temp)
        .args(["--templates", "missing.json", "convert", "input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.json"));
}
