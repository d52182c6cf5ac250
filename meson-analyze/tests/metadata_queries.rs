use std::fs;
use std::path::Path;

use anyhow::Result;
use meson_analyze::{AnalysisOptions, Callee, Location, NodeKind, Project, Type, TypeSet};
use tempfile::{tempdir, TempDir};

const SOURCE: &str = "\
project('demo', 'c')
x = 'a'
y = x
l = ['p', 'q']
files('a')
exe = executable('e', 'e.c', install: true)
up = 'abc'.to_upper()
first = l[0]
subdir('sub')
";

fn project() -> Result<(TempDir, Project)> {
    let dir = tempdir()?;
    fs::write(dir.path().join("meson.build"), SOURCE)?;
    fs::create_dir(dir.path().join("sub"))?;
    fs::write(dir.path().join("sub/meson.build"), "z = x\n")?;
    let mut project = Project::load(dir.path(), AnalysisOptions::default())?;
    project.analyze();
    Ok((dir, project))
}

fn root() -> &'static Path {
    Path::new("meson.build")
}

#[test]
fn call_span_containment_is_exact() -> Result<()> {
    let (_dir, project) = project()?;
    // `files('a')` occupies columns 0 to 10 of line 4.
    let call = project
        .find_full_function_call_at(root(), 4, 5)
        .expect("point inside the call");
    assert_eq!(project.ast().location(call), Location::new(4, 0, 4, 10));
    assert!(
        project.find_full_function_call_at(root(), 4, 11).is_none(),
        "a point past the closing parenthesis is outside"
    );
    Ok(())
}

#[test]
fn function_call_by_name_only_matches_the_callee() -> Result<()> {
    let (_dir, project) = project()?;
    assert!(project.find_function_call_at(root(), 4, 2).is_some());
    assert!(
        project.find_function_call_at(root(), 4, 7).is_none(),
        "the argument is not part of the callee name"
    );
    Ok(())
}

#[test]
fn innermost_call_wins() -> Result<()> {
    let (_dir, project) = project()?;
    let call = project
        .find_full_function_call_at(root(), 5, 20)
        .expect("inside executable()");
    let NodeKind::FunctionCall { function, .. } = project.ast().kind(call) else {
        panic!("expected a call");
    };
    assert_eq!(function.map(|f| f.name), Some("executable"));
    Ok(())
}

#[test]
fn identifiers_carry_their_inferred_types() -> Result<()> {
    let (_dir, project) = project()?;
    let id = project.find_identifier_at(root(), 2, 4).expect("`x` on line 2");
    assert_eq!(project.ast().identifier_name(id), Some("x"));
    assert_eq!(project.ast().types(id), &TypeSet::single(Type::Str));
    Ok(())
}

#[test]
fn declarations_are_plain_assignments() -> Result<()> {
    let (_dir, project) = project()?;
    let (path, location) = project.find_declaration_of("x").expect("x is declared");
    assert!(path.ends_with("meson.build"));
    assert_eq!(location, Location::new(1, 0, 1, 1));

    let references = project.metadata().identifiers_named(project.ast(), "x");
    assert_eq!(references.len(), 3, "declaration, use in root, use in sub: {references:?}");
    assert!(project.find_declaration_of("nope").is_none());
    Ok(())
}

#[test]
fn kwargs_know_their_callee() -> Result<()> {
    let (_dir, project) = project()?;
    let (item, callee) = project
        .find_kwarg_at(root(), 5, 31)
        .expect("`install` keyword");
    assert!(matches!(project.ast().kind(item), NodeKind::KeywordItem { .. }));
    assert!(matches!(callee, Callee::Function(function) if function.name == "executable"));
    assert_eq!(callee.display_name(), "executable");
    Ok(())
}

#[test]
fn method_calls_and_subscripts_are_indexed() -> Result<()> {
    let (_dir, project) = project()?;
    let call = project
        .find_method_call_at(root(), 6, 14)
        .expect("`to_upper` name");
    let NodeKind::MethodCall { method, .. } = project.ast().kind(call) else {
        panic!("expected a method call");
    };
    assert_eq!(method.map(|m| m.id()), Some("str.to_upper".to_string()));
    assert_eq!(project.find_full_method_call_at(root(), 6, 6), Some(call));
    assert!(project.find_method_call_at(root(), 6, 6).is_none());

    let subscript = project.find_subscript_at(root(), 7, 9).expect("l[0]");
    assert_eq!(project.ast().types(subscript), &TypeSet::single(Type::Str));
    Ok(())
}

#[test]
fn inclusions_and_included_files_are_indexed() -> Result<()> {
    let (_dir, project) = project()?;
    let inclusion = project.find_inclusion_at(root(), 8, 3).expect("subdir call");
    assert!(matches!(project.ast().kind(inclusion), NodeKind::SubdirCall { .. }));

    let z = project
        .find_identifier_at(Path::new("sub/meson.build"), 0, 0)
        .expect("z in the included file");
    assert_eq!(project.ast().types(z), &TypeSet::single(Type::Str));
    Ok(())
}

#[test]
fn string_literals_are_indexed() -> Result<()> {
    let (_dir, project) = project()?;
    let literal = project.find_string_literal_at(root(), 5, 24).expect("'e.c'");
    assert_eq!(project.ast().string_value(literal), Some("e.c"));

    let literal = project.find_string_literal_at(root(), 1, 4).expect("'a'");
    assert_eq!(project.ast().string_value(literal), Some("a"));
    assert!(project.find_string_literal_at(root(), 1, 0).is_none(), "`x` is not a string");
    Ok(())
}

#[test]
fn unknown_positions_and_files_find_nothing() -> Result<()> {
    let (_dir, project) = project()?;
    assert!(project.find_identifier_at(root(), 40, 0).is_none());
    assert!(project.find_identifier_at(Path::new("other/meson.build"), 1, 0).is_none());
    Ok(())
}
