use std::fs;
use std::path::Path;

use anyhow::Result;
use meson_analyze::{AnalysisOptions, ObjectKind, OptionKind, Project, Type, TypeSet};
use tempfile::tempdir;

fn analyzed(dir: &Path) -> Result<Project> {
    let mut project = Project::load(dir, AnalysisOptions::default())?;
    project.analyze();
    Ok(project)
}

fn messages(project: &Project) -> Vec<String> {
    let root = project.dir().join("meson.build");
    project
        .diagnostics_for(&root)
        .map(|d| d.entries().iter().map(|e| e.message.clone()).collect())
        .unwrap_or_default()
}

const OPTIONS: &str = "\
option('docs', type: 'feature', description: 'Build the manual')
option('flavor', type: 'combo', choices: ['vanilla', 'mint'])
option('old', type: 'boolean', deprecated: true)
option('tools', type: 'array', choices: ['a', 'b'])
option('broken', type: 'nonsense')
option(computed_name, type: 'string')
";

#[test]
fn declarations_are_extracted_from_the_option_file() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("meson.build"), "project('p')\n")?;
    fs::write(dir.path().join("meson.options"), OPTIONS)?;
    let project = Project::load(dir.path(), AnalysisOptions::default())?;
    let options = project.options();

    let docs = options.find_option("docs").expect("docs");
    assert_eq!(docs.kind, OptionKind::Feature);
    assert_eq!(docs.description.as_deref(), Some("Build the manual"));
    assert!(options.find_option("old").expect("old").deprecated);
    assert_eq!(
        options.find_option("tools").expect("tools").possible_values(),
        ["a", "b"]
    );
    assert!(options.find_option("broken").is_none(), "unknown option types are skipped");
    assert!(
        options.find_option("buildtype").is_some(),
        "builtin options stay available next to project options"
    );
    Ok(())
}

#[test]
fn legacy_option_file_is_the_fallback() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("meson.build"), "project('p')\n")?;
    fs::write(
        dir.path().join("meson_options.txt"),
        "option('legacy', type: 'integer')\n",
    )?;
    let project = Project::load(dir.path(), AnalysisOptions::default())?;
    assert!(project.options().find_option("legacy").is_some());

    fs::write(
        dir.path().join("meson.options"),
        "option('modern', type: 'integer')\n",
    )?;
    let project = Project::load(dir.path(), AnalysisOptions::default())?;
    assert!(project.options().find_option("modern").is_some());
    assert!(
        project.options().find_option("legacy").is_none(),
        "meson.options takes precedence over meson_options.txt"
    );
    Ok(())
}

#[test]
fn get_option_is_typed_by_declaration() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("meson.build"),
        "d = get_option('docs')\nf = get_option('flavor')\nt = get_option('tools')\n",
    )?;
    fs::write(dir.path().join("meson.options"), OPTIONS)?;
    let project = analyzed(dir.path())?;

    assert_eq!(
        project.variable_types("d"),
        Some(&TypeSet::single(Type::Object(ObjectKind::Feature)))
    );
    assert_eq!(project.variable_types("f"), Some(&TypeSet::single(Type::Str)));
    assert_eq!(
        project.variable_types("t"),
        Some(&TypeSet::single(Type::list_of([Type::Int, Type::Str, Type::Bool])))
    );
    assert!(messages(&project).is_empty(), "{:?}", messages(&project));
    Ok(())
}

#[test]
fn deprecated_and_unknown_options_are_reported() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("meson.build"),
        "a = get_option('old')\nb = get_option('missing')\n",
    )?;
    fs::write(dir.path().join("meson.options"), OPTIONS)?;
    let project = analyzed(dir.path())?;

    assert_eq!(
        messages(&project),
        vec!["Deprecated option".to_string(), "Unknown option `missing`".to_string()]
    );
    Ok(())
}

#[test]
fn malformed_option_file_fails_the_load() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("meson.build"), "project('p')\n")?;
    fs::write(dir.path().join("meson.options"), "option('x'\n")?;
    assert!(Project::load(dir.path(), AnalysisOptions::default()).is_err());
    Ok(())
}
