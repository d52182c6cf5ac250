use std::fs;

use anyhow::Result;
use meson_analyze::{AnalysisOptions, DiagnosticLevel, ObjectKind, Project, Type, TypeSet};
use tempfile::{tempdir, TempDir};

fn analyze_with(source: &str, config: AnalysisOptions) -> Result<(TempDir, Project)> {
    let dir = tempdir()?;
    fs::write(dir.path().join("meson.build"), source)?;
    let mut project = Project::load(dir.path(), config)?;
    project.analyze();
    Ok((dir, project))
}

fn analyze(source: &str) -> Result<(TempDir, Project)> {
    analyze_with(source, AnalysisOptions::default())
}

fn types_of(project: &Project, name: &str) -> TypeSet {
    project.variable_types(name).cloned().unwrap_or_default()
}

fn messages(project: &Project, level: DiagnosticLevel) -> Vec<String> {
    let root = project.dir().join("meson.build");
    project
        .diagnostics_for(&root)
        .map(|diagnostics| {
            diagnostics
                .entries()
                .iter()
                .filter(|diagnostic| diagnostic.level == level)
                .map(|diagnostic| diagnostic.message.clone())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn plain_assignment_takes_the_right_hand_side_type() -> Result<()> {
    let (_dir, project) = analyze("x = 'a'\ny = []\nz = {}\n")?;
    assert_eq!(types_of(&project, "x"), TypeSet::single(Type::Str));
    assert_eq!(
        types_of(&project, "y"),
        TypeSet::single(Type::List(TypeSet::empty())),
        "an empty literal keeps an empty element set"
    );
    assert_eq!(types_of(&project, "z"), TypeSet::single(Type::Dict(TypeSet::empty())));
    Ok(())
}

#[test]
fn compound_assignment_unions_list_elements() -> Result<()> {
    let (_dir, project) = analyze("x = ['a']\ny = ['b']\nx += y\n")?;
    assert_eq!(
        types_of(&project, "x"),
        TypeSet::single(Type::list_of([Type::Str])),
        "list(str) += list(str) must not duplicate entries"
    );
    Ok(())
}

#[test]
fn compound_assignment_appends_scalars_to_lists() -> Result<()> {
    let (_dir, project) = analyze("x = ['a']\nx += 1\ncount = 1\ncount += 2\n")?;
    assert_eq!(types_of(&project, "x"), TypeSet::single(Type::list_of([Type::Int, Type::Str])));
    assert_eq!(types_of(&project, "count"), TypeSet::single(Type::Int));
    Ok(())
}

#[test]
fn loop_variable_takes_the_element_type() -> Result<()> {
    let (_dir, project) = analyze("foreach v : [1, 2, 3]\n  seen = v\nendforeach\n")?;
    assert_eq!(types_of(&project, "v"), TypeSet::single(Type::Int));
    assert_eq!(types_of(&project, "seen"), TypeSet::single(Type::Int));
    Ok(())
}

#[test]
fn dict_iteration_binds_key_and_value() -> Result<()> {
    let (_dir, project) = analyze("foreach k, v : {'a': 1}\n  key = k\n  value = v\nendforeach\n")?;
    assert_eq!(types_of(&project, "key"), TypeSet::single(Type::Str));
    assert_eq!(types_of(&project, "value"), TypeSet::single(Type::Int));
    Ok(())
}

#[test]
fn range_iteration_binds_int() -> Result<()> {
    let (_dir, project) = analyze("foreach i : range(3)\n  last = i\nendforeach\n")?;
    assert_eq!(types_of(&project, "last"), TypeSet::single(Type::Int));
    Ok(())
}

#[test]
fn iteration_shape_mismatches_are_reported() -> Result<()> {
    let (_dir, project) = analyze(
        "foreach x : {'a': 1}\nendforeach\nforeach a, b : [1]\nendforeach\nforeach c : 5\nendforeach\n",
    )?;
    let errors = messages(&project, DiagnosticLevel::Error);
    assert!(errors.contains(&"Iterating over a dict requires two identifiers".to_string()), "{errors:?}");
    assert!(errors.contains(&"Iterating over a list/range requires one identifier".to_string()), "{errors:?}");
    assert!(errors.contains(&"Expression yields no iterable result".to_string()), "{errors:?}");
    Ok(())
}

// Exclusive branches are not tracked: both arms leak into the join.
#[test]
fn selection_branches_are_unioned() -> Result<()> {
    let (_dir, project) = analyze("if true\n  x = 'a'\nelse\n  x = ['a']\nendif\n")?;
    assert_eq!(
        types_of(&project, "x"),
        TypeSet::new([Type::Str, Type::list_of([Type::Str])])
    );
    Ok(())
}

#[test]
fn ternary_unions_both_arms_and_checks_the_condition() -> Result<()> {
    let (_dir, project) = analyze("x = true ? 'a' : 1\ny = 'no' ? 1 : 2\n")?;
    assert_eq!(types_of(&project, "x"), TypeSet::new([Type::Str, Type::Int]));
    let errors = messages(&project, DiagnosticLevel::Error);
    assert_eq!(errors, vec!["Condition is not bool: str".to_string()]);
    Ok(())
}

#[test]
fn binary_operators_follow_operand_types() -> Result<()> {
    let (_dir, project) = analyze(
        "a = 'x' + 'y'\nb = 1 + 2\nc = 'x' / 'y'\nd = 1 < 2\ne = 'x' in ['x']\nf = ['a'] + 1\n",
    )?;
    assert_eq!(types_of(&project, "a"), TypeSet::single(Type::Str));
    assert_eq!(types_of(&project, "b"), TypeSet::single(Type::Int));
    assert_eq!(types_of(&project, "c"), TypeSet::single(Type::Str));
    assert_eq!(types_of(&project, "d"), TypeSet::single(Type::Bool));
    assert_eq!(types_of(&project, "e"), TypeSet::single(Type::Bool));
    assert_eq!(types_of(&project, "f"), TypeSet::single(Type::list_of([Type::Int, Type::Str])));
    assert!(messages(&project, DiagnosticLevel::Error).is_empty());
    Ok(())
}

#[test]
fn mismatched_operands_are_an_error_with_empty_result() -> Result<()> {
    let (_dir, project) = analyze("x = 'a' - 1\n")?;
    assert_eq!(
        messages(&project, DiagnosticLevel::Error),
        vec!["Unable to apply operator - to types str and int".to_string()]
    );
    assert!(types_of(&project, "x").is_empty());
    Ok(())
}

#[test]
fn unary_and_subscript_types() -> Result<()> {
    let (_dir, project) = analyze(
        "n = -1\nb = not true\nd = {'k': 1}\nv = d['k']\nl = ['a', 'b']\ne = l[0]\nc = 'abc'[0]\n",
    )?;
    assert_eq!(types_of(&project, "n"), TypeSet::single(Type::Int));
    assert_eq!(types_of(&project, "b"), TypeSet::single(Type::Bool));
    assert_eq!(types_of(&project, "v"), TypeSet::single(Type::Int));
    assert_eq!(types_of(&project, "e"), TypeSet::single(Type::Str));
    assert_eq!(types_of(&project, "c"), TypeSet::single(Type::Str));
    Ok(())
}

#[test]
fn call_results_come_from_the_catalog() -> Result<()> {
    let (_dir, project) = analyze(
        "project('demo', 'c')\nexe = executable('demo', 'main.c')\nup = 'abc'.to_upper()\nparts = 'a b'.split()\n",
    )?;
    assert_eq!(types_of(&project, "exe"), TypeSet::single(Type::Object(ObjectKind::Exe)));
    assert_eq!(types_of(&project, "up"), TypeSet::single(Type::Str));
    assert_eq!(types_of(&project, "parts"), TypeSet::single(Type::list_of([Type::Str])));
    assert!(!project.has_errors(), "{:?}", messages(&project, DiagnosticLevel::Error));
    Ok(())
}

#[test]
fn inherited_methods_resolve_on_child_objects() -> Result<()> {
    let (_dir, project) = analyze("exe = executable('demo', 'main.c')\np = exe.full_path()\n")?;
    assert_eq!(types_of(&project, "p"), TypeSet::single(Type::Str));
    Ok(())
}

#[test]
fn refined_calls_narrow_their_return_types() -> Result<()> {
    let (_dir, project) = analyze(
        "fs = import('fs')\nbt = get_option('buildtype')\nwe = get_option('werror')\n\
         lib = build_target('x', 'x.c', target_type: 'static_library')\n\
         any_tgt = build_target('y', 'y.c')\n",
    )?;
    assert_eq!(types_of(&project, "fs"), TypeSet::single(Type::Object(ObjectKind::FsModule)));
    assert_eq!(types_of(&project, "bt"), TypeSet::single(Type::Str));
    assert_eq!(types_of(&project, "we"), TypeSet::single(Type::Bool));
    assert_eq!(types_of(&project, "lib"), TypeSet::single(Type::Object(ObjectKind::Lib)));
    assert_eq!(
        types_of(&project, "any_tgt"),
        TypeSet::new([
            Type::Object(ObjectKind::Exe),
            Type::Object(ObjectKind::Lib),
            Type::Object(ObjectKind::BuildTgt),
            Type::Object(ObjectKind::BothLibs),
            Type::Object(ObjectKind::Jar),
        ])
    );
    Ok(())
}

#[test]
fn unknown_modules_and_options_are_flagged() -> Result<()> {
    let (_dir, project) = analyze("m = import('nope')\no = get_option('not_an_option')\n")?;
    assert_eq!(types_of(&project, "m"), TypeSet::single(Type::Object(ObjectKind::Module)));
    assert!(messages(&project, DiagnosticLevel::Warning).contains(&"Unknown module `nope`".to_string()));
    assert!(messages(&project, DiagnosticLevel::Error).contains(&"Unknown option `not_an_option`".to_string()));
    Ok(())
}

#[test]
fn get_and_set_variable_use_the_scope() -> Result<()> {
    let (_dir, project) = analyze(
        "set_variable('dyn', ['a'])\nback = get_variable('dyn')\nfallback = get_variable('missing', 3)\n\
         unbound = get_variable('nope')\nl = ['a']\nitem = l.get(0, 1)\n",
    )?;
    assert_eq!(types_of(&project, "dyn"), TypeSet::single(Type::list_of([Type::Str])));
    assert_eq!(types_of(&project, "back"), TypeSet::single(Type::list_of([Type::Str])));
    assert_eq!(
        types_of(&project, "fallback"),
        TypeSet::new([Type::Any, Type::Int]),
        "an unbound name may still be set at runtime"
    );
    assert_eq!(types_of(&project, "unbound"), TypeSet::single(Type::Any));
    assert_eq!(types_of(&project, "item"), TypeSet::new([Type::Int, Type::Str]));
    Ok(())
}

#[test]
fn assignment_diagnostics() -> Result<()> {
    let (_dir, project) = analyze("meson = 1\nmyVar = 1\nnothing = message('hi')\nCONST_OK = 2\n")?;
    let errors = messages(&project, DiagnosticLevel::Error);
    assert!(
        errors.contains(&"Attempted to re-assign to existing, read-only variable".to_string()),
        "{errors:?}"
    );
    assert!(errors.contains(&"Can't assign from void".to_string()), "{errors:?}");
    assert_eq!(
        messages(&project, DiagnosticLevel::Warning),
        vec!["Expected snake case".to_string()],
        "only myVar breaks the naming rule"
    );
    Ok(())
}

#[test]
fn loop_control_outside_loops_is_an_error() -> Result<()> {
    let (_dir, project) = analyze("break\nforeach x : [1]\n  continue\nendforeach\n")?;
    assert_eq!(
        messages(&project, DiagnosticLevel::Error),
        vec!["break statements are only allowed inside loops".to_string()]
    );
    Ok(())
}

#[test]
fn call_arguments_are_checked() -> Result<()> {
    let (_dir, project) = analyze(
        "executable()\nexecutable('a', 'a.c', bogus: 1)\nrun_target('r')\nexecutable(name: 'x', 'a.c')\n\
         range(1, 2, 3, 4)\nexecutable('b', 'b.c', kwargs: {})\nexecutable(1)\n",
    )?;
    let errors = messages(&project, DiagnosticLevel::Error);
    for expected in [
        "Expected 1 positional arguments, but got none!",
        "Unknown key word argument 'bogus'!",
        "Missing required key word argument 'command'!",
        "Unexpected positional argument after a keyword argument",
        "Expected maximum 3 positional arguments, but got 4!",
        "Expected str, got int",
    ] {
        assert!(errors.contains(&expected.to_string()), "missing {expected:?} in {errors:?}");
    }
    assert!(
        !errors.iter().any(|error| error.contains("'kwargs'")),
        "kwargs forwarding is always accepted: {errors:?}"
    );
    Ok(())
}

#[test]
fn argument_checks_can_be_disabled() -> Result<()> {
    let config = AnalysisOptions {
        check_arguments: false,
        ..AnalysisOptions::default()
    };
    let (_dir, project) = analyze_with("executable()\n", config)?;
    assert!(!project.has_errors());
    Ok(())
}

#[test]
fn unresolved_names_are_silent_unless_requested() -> Result<()> {
    let source = "y = unknown_var\nz = not_a_function()\nw = 'a'.no_such_method()\n";
    let (_dir, project) = analyze(source)?;
    assert!(!project.has_errors(), "{:?}", messages(&project, DiagnosticLevel::Error));
    assert!(types_of(&project, "y").is_empty());
    assert!(types_of(&project, "z").is_empty());

    let config = AnalysisOptions {
        report_unresolved: true,
        ..AnalysisOptions::default()
    };
    let (_dir, project) = analyze_with(source, config)?;
    let errors = messages(&project, DiagnosticLevel::Error);
    assert!(errors.contains(&"Unknown identifier `unknown_var`".to_string()), "{errors:?}");
    assert!(errors.contains(&"Unknown function `not_a_function`".to_string()), "{errors:?}");
    assert!(errors.contains(&"No method `no_such_method` found for types `str`".to_string()), "{errors:?}");
    Ok(())
}

#[test]
fn duplicate_dict_keys_warn() -> Result<()> {
    let (_dir, project) = analyze("d = {'a': 1, 'a': 2}\n")?;
    assert_eq!(
        messages(&project, DiagnosticLevel::Warning),
        vec!["Duplicate key \"a\"".to_string()]
    );
    Ok(())
}

#[test]
fn builtin_objects_are_bound_in_the_root_scope() -> Result<()> {
    let (_dir, project) = analyze("cc = meson.get_compiler('c')\n")?;
    assert_eq!(types_of(&project, "cc"), TypeSet::single(Type::Object(ObjectKind::Compiler)));
    assert!(project.root_bindings().any(|(name, _)| name == "host_machine"));
    Ok(())
}
