use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;
use tempfile::tempdir;

fn cli_binary() -> &'static str {
    env!("CARGO_BIN_EXE_meson-analyze")
}

fn run(dir: &Path, args: &[&str]) -> Result<Output> {
    Ok(Command::new(cli_binary())
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()?)
}

#[test]
fn clean_project_exits_successfully() -> Result<()> {
    let tmp = tempdir()?;
    fs::write(tmp.path().join("meson.build"), "project('p', 'c')\nx = 1\n")?;
    let output = run(tmp.path(), &[])?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(())
}

#[test]
fn errors_are_printed_with_source_context() -> Result<()> {
    let tmp = tempdir()?;
    fs::create_dir(tmp.path().join("src"))?;
    fs::write(tmp.path().join("meson.build"), "subdir('src')\n")?;
    fs::write(tmp.path().join("src/meson.build"), "n = 1\nx = n + 'a'\n")?;

    let output = run(tmp.path(), &[])?;
    assert!(!output.status.success(), "an error diagnostic fails the run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error: Unable to apply operator +"),
        "expected the operator error, got: {stderr}"
    );
    assert!(
        stderr.contains("--> src/meson.build:2:5"),
        "expected a project-relative, 1-based location, got: {stderr}"
    );
    assert!(stderr.contains("x = n + 'a'"), "expected the source line: {stderr}");
    assert!(stderr.contains("^^^^^^^"), "expected a caret underline: {stderr}");
    Ok(())
}

#[test]
fn warnings_alone_do_not_fail_the_run() -> Result<()> {
    let tmp = tempdir()?;
    fs::write(tmp.path().join("meson.build"), "BadName = 1\n")?;
    let output = run(tmp.path(), &[])?;
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: Expected snake case"), "{stderr}");
    Ok(())
}

#[test]
fn types_are_listed_by_name() -> Result<()> {
    let tmp = tempdir()?;
    fs::write(
        tmp.path().join("meson.build"),
        "zeta = 'z'\nalpha = [1, 'a']\n",
    )?;
    let output = run(tmp.path(), &["--types"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let alpha = stdout.find("alpha: list(int|str)").expect("alpha is listed");
    let zeta = stdout.find("zeta: str").expect("zeta is listed");
    assert!(alpha < zeta, "bindings are sorted: {stdout}");
    Ok(())
}

#[test]
fn json_report_lists_files_with_diagnostics() -> Result<()> {
    let tmp = tempdir()?;
    fs::write(tmp.path().join("meson.build"), "break\n")?;
    let output = run(tmp.path(), &["--json"])?;
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let files = report["files"].as_array().expect("files array");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["path"], "meson.build");
    assert_eq!(files[0]["diagnostics"][0]["level"], "error");
    assert_eq!(
        files[0]["diagnostics"][0]["message"],
        "break statements are only allowed inside loops"
    );
    Ok(())
}

#[test]
fn point_queries_describe_identifiers() -> Result<()> {
    let tmp = tempdir()?;
    fs::write(tmp.path().join("meson.build"), "name = 'x'\nother = name\n")?;
    let output = run(tmp.path(), &["--at", "meson.build:2:10"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("identifier name: str"), "{stdout}");

    let output = run(tmp.path(), &["--at", "meson.build:9:1"])?;
    assert!(String::from_utf8_lossy(&output.stdout).contains("nothing at"));
    Ok(())
}

#[test]
fn point_queries_describe_inclusions_and_strings() -> Result<()> {
    let tmp = tempdir()?;
    fs::create_dir(tmp.path().join("sub"))?;
    fs::write(tmp.path().join("meson.build"), "subdir('sub')\nmessage('hi')\n")?;
    fs::write(tmp.path().join("sub/meson.build"), "")?;

    let output = run(tmp.path(), &["--at", "meson.build:1:2"])?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("subdir sub"), "{stdout}");
    assert!(!stdout.contains("function"), "{stdout}");

    let output = run(tmp.path(), &["--at", "meson.build:2:10"])?;
    assert!(String::from_utf8_lossy(&output.stdout).contains("string 'hi'"));
    Ok(())
}

#[test]
fn config_file_enables_unresolved_reports() -> Result<()> {
    let tmp = tempdir()?;
    fs::write(tmp.path().join("meson.build"), "no_such_function()\n")?;
    assert!(run(tmp.path(), &[])?.status.success());

    let config = tmp.path().join("analysis.yaml");
    fs::write(&config, "report_unresolved: true\n")?;
    let output = run(tmp.path(), &["--config", config.to_str().expect("utf-8 path")])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown function"));
    Ok(())
}

#[test]
fn missing_project_is_reported() -> Result<()> {
    let tmp = tempdir()?;
    let output = run(tmp.path(), &[])?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cli.load("), "{stderr}");
    Ok(())
}
