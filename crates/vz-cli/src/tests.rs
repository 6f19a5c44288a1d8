use super::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("vztxt-rs-{}-{}", name, nanos))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn run(args: &[&str]) -> i32 {
    run_cli_from_args(std::iter::once("vztxt").chain(args.iter().copied()))
}

#[test]
fn resolve_input_validates_existence_and_kind() {
    let missing = temp_path("missing.vztxt");
    let error = resolve_input(missing.to_string_lossy().as_ref()).expect_err("missing");
    assert_eq!(error.code, "CLI_SOURCE_NOT_FOUND");

    let directory = temp_path("input-dir");
    fs::create_dir_all(&directory).expect("dir");
    let error = resolve_input(directory.to_string_lossy().as_ref()).expect_err("directory");
    assert_eq!(error.code, "CLI_SOURCE_NOT_FILE");
}

#[test]
fn write_output_creates_parent_directories() {
    let target = temp_path("nested").join("out").join("program.xml");
    write_output(Some(target.to_string_lossy().as_ref()), "<Program />").expect("write");
    assert_eq!(fs::read_to_string(&target).expect("read back"), "<Program />");
}

#[test]
fn to_xml_then_to_text_round_trips_through_files() {
    let source = temp_path("source.vztxt");
    let xml = temp_path("program.xml");
    let text = temp_path("program.vztxt");
    write_file(&source, "#program \"Hop\"\nvar height\non FlightStart {\n  height = 10\n}\n");

    let code = run(&[
        "to-xml",
        "--input",
        source.to_str().expect("utf-8"),
        "--output",
        xml.to_str().expect("utf-8"),
    ]);
    assert_eq!(code, 0);
    let exported = fs::read_to_string(&xml).expect("xml");
    assert!(exported.contains("<Program name=\"Hop\""));

    let code = run(&[
        "to-text",
        "--input",
        xml.to_str().expect("utf-8"),
        "--output",
        text.to_str().expect("utf-8"),
    ]);
    assert_eq!(code, 0);
    let imported = fs::read_to_string(&text).expect("text");
    assert_eq!(
        imported,
        "#program \"Hop\"\n\nvar height\n\non FlightStart {\n  height = 10\n}\n"
    );
}

#[test]
fn to_xml_refuses_sources_with_errors() {
    let source = temp_path("broken.vztxt");
    let output = temp_path("broken.xml");
    write_file(&source, "on FlightStart {\n  Explode\n}\n");
    let code = run(&[
        "to-xml",
        "--input",
        source.to_str().expect("utf-8"),
        "--output",
        output.to_str().expect("utf-8"),
    ]);
    assert_eq!(code, 1);
    assert!(!output.exists());
}

#[test]
fn check_exit_code_follows_error_problems() {
    let clean = temp_path("clean.vztxt");
    write_file(&clean, "var x\n{\n  x = 1\n}\n");
    assert_eq!(run(&["check", "--input", clean.to_str().expect("utf-8")]), 0);

    let broken = temp_path("check-broken.vztxt");
    write_file(&broken, "{\n  y = 1\n}\n");
    assert_eq!(
        run(&["check", "--input", broken.to_str().expect("utf-8"), "--json"]),
        1
    );
}

#[test]
fn invalid_arguments_return_clap_exit_code() {
    assert_eq!(run(&["check"]), 2);
    assert_eq!(run(&["check", "--input", "x", "--min-level", "loud"]), 2);
}
