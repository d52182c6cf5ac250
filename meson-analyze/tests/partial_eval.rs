use std::collections::BTreeSet;
use std::fs;
use std::time::{Duration, Instant};

use anyhow::Result;
use meson_analyze::{guess_values, AnalysisOptions, NodeKind, Project};
use tempfile::{tempdir, TempDir};

fn load(source: &str, options: Option<&str>) -> Result<(TempDir, Project)> {
    let dir = tempdir()?;
    fs::write(dir.path().join("meson.build"), source)?;
    if let Some(options) = options {
        fs::write(dir.path().join("meson.options"), options)?;
    }
    let project = Project::load(dir.path(), AnalysisOptions::default())?;
    Ok((dir, project))
}

/// Values of the sole argument of the last `message()` call.
fn message_values(project: &Project) -> Vec<String> {
    let ast = project.ast();
    let NodeKind::BuildDefinition { statements } = ast.kind(project.tree().root) else {
        panic!("root is a build definition");
    };
    let last = *statements.last().expect("at least one statement");
    let NodeKind::FunctionCall { args, .. } = ast.kind(last) else {
        panic!("last statement is not a call: {:?}", ast.kind(last));
    };
    let argument = ast.positional_args(*args)[0];
    guess_values(ast, project.options(), argument)
}

fn as_set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().collect()
}

#[test]
fn reassignment_is_resolved_backward() -> Result<()> {
    let (_dir, project) = load("a = 'x'\na = a + '/y'\nmessage(a)\n", None)?;
    assert_eq!(message_values(&project), vec!["x/y".to_string()]);
    Ok(())
}

#[test]
fn augmenting_assignments_accumulate() -> Result<()> {
    let (_dir, project) = load("dirs = ['x']\ndirs += ['y']\nmessage(dirs)\n", None)?;
    assert_eq!(as_set(message_values(&project)), as_set(vec!["x".into(), "y".into()]));
    Ok(())
}

#[test]
fn path_joins_take_the_cartesian_product() -> Result<()> {
    let (_dir, project) = load(
        "base = 'src'\nif true\n  base = 'lib'\nendif\nmessage(join_paths(base, 'inc'))\n",
        None,
    )?;
    assert_eq!(
        as_set(message_values(&project)),
        as_set(vec!["src/inc".into(), "lib/inc".into()]),
        "both branch values survive"
    );
    Ok(())
}

#[test]
fn division_joins_with_a_slash() -> Result<()> {
    let (_dir, project) = load("root = 'a'\nmessage(root / 'b')\n", None)?;
    assert_eq!(message_values(&project), vec!["a/b".to_string()]);
    Ok(())
}

#[test]
fn string_methods_are_applied() -> Result<()> {
    let (_dir, project) = load("n = 'Foo-Bar '.strip().to_lower().underscorify()\nmessage(n)\n", None)?;
    assert_eq!(message_values(&project), vec!["foo_bar".to_string()]);

    let (_dir, project) = load("message('@0@-suffix'.format('x'))\n", None)?;
    assert_eq!(message_values(&project), vec!["x-suffix".to_string()]);

    let (_dir, project) = load("message('a.b.c'.split('.')[1])\n", None)?;
    assert_eq!(message_values(&project), vec!["b".to_string()]);
    Ok(())
}

#[test]
fn dictionaries_resolve_by_key() -> Result<()> {
    let (_dir, project) = load("d = {'k': 'v', 'other': 'w'}\nmessage(d['k'])\n", None)?;
    assert_eq!(message_values(&project), vec!["v".to_string()]);

    let (_dir, project) = load("d = {'k': 'v'}\nmessage(d.get('k'))\n", None)?;
    assert_eq!(message_values(&project), vec!["v".to_string()]);
    Ok(())
}

#[test]
fn combo_options_expand_to_their_choices() -> Result<()> {
    let options = "option('flavor', type: 'combo', choices: ['vanilla', 'mint'])\n\
                   option('name', type: 'string', value: 'x')\n";
    let (_dir, project) = load("message(get_option('flavor'))\n", Some(options))?;
    assert_eq!(message_values(&project), vec!["vanilla".to_string(), "mint".to_string()]);

    let (_dir, project) = load("message(get_option('name'))\n", Some(options))?;
    assert!(message_values(&project).is_empty(), "string options have no known values");
    Ok(())
}

#[test]
fn loop_variables_resolve_to_the_iterable() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("meson.build"),
        "foreach d : ['one', 'two']\n  subdir(d)\nendforeach\n",
    )?;
    for sub in ["one", "two"] {
        fs::create_dir(dir.path().join(sub))?;
        fs::write(dir.path().join(sub).join("meson.build"), "")?;
    }
    let project = Project::load(dir.path(), AnalysisOptions::default())?;
    assert_eq!(project.tree().children.len(), 2);
    let inclusion = project
        .ast()
        .parent(project.tree().children[0].root)
        .expect("attached subtree");
    let NodeKind::MultiSubdirCall { subdirs, .. } = project.ast().kind(inclusion) else {
        panic!("expected a computed inclusion");
    };
    assert_eq!(subdirs, &vec!["one".to_string(), "two".to_string()]);
    Ok(())
}

#[test]
fn unsupported_constructs_yield_nothing() -> Result<()> {
    let (_dir, project) = load("x = run_command('ls').stdout()\nmessage(x)\n", None)?;
    assert!(message_values(&project).is_empty());

    let (_dir, project) = load("message(undefined)\n", None)?;
    assert!(message_values(&project).is_empty());
    Ok(())
}

#[test]
fn earlier_branches_feed_a_later_inclusion() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("meson.build"),
        "if true\n  d = 'a'\nelse\n  subdir(d)\nendif\n",
    )?;
    fs::create_dir(dir.path().join("a"))?;
    fs::write(dir.path().join("a/meson.build"), "")?;
    let project = Project::load(dir.path(), AnalysisOptions::default())?;
    assert_eq!(
        project.tree().children.len(),
        1,
        "the value assigned in the `if` branch names the target"
    );
    Ok(())
}

#[test]
fn self_referencing_chains_stay_fast() -> Result<()> {
    let mut source = String::from("a = 'x'\n");
    for _ in 0..24 {
        source.push_str("a = a + a\n");
    }
    source.push_str("subdir(a)\n");

    let started = Instant::now();
    let (_dir, project) = load(&source, None)?;
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "loading took {:?}",
        started.elapsed()
    );
    assert!(project.tree().children.is_empty());

    let mut wide = String::from("l = ['p', 'q']\n");
    for _ in 0..24 {
        wide.push_str("l = l + l\n");
    }
    wide.push_str("message(l)\n");
    let started = Instant::now();
    let (_dir, project) = load(&wide, None)?;
    assert_eq!(as_set(message_values(&project)), as_set(vec!["p".into(), "q".into()]));
    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());
    Ok(())
}

#[test]
fn included_files_resolve_names_from_the_including_file() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("meson.build"), "name = 'inner'\nsubdir('outer')\n")?;
    fs::create_dir_all(dir.path().join("outer/inner"))?;
    fs::write(dir.path().join("outer/meson.build"), "subdir(name)\n")?;
    fs::write(dir.path().join("outer/inner/meson.build"), "")?;
    let project = Project::load(dir.path(), AnalysisOptions::default())?;
    let outer = &project.tree().children[0];
    assert_eq!(outer.children.len(), 1, "`name` is bound in the root file");
    Ok(())
}
