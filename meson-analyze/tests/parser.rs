use std::path::PathBuf;

use anyhow::Result;
use meson_analyze::{
    AssignmentOperator, Ast, BinaryOperator, BuildFileParser, Location, MesonParser, NodeId,
    NodeKind, SourceFile, SourceId,
};

fn parse(input: &str) -> Result<(Ast, NodeId)> {
    let source = SourceFile::new(SourceId(0), PathBuf::from("meson.build"), input.to_string());
    let mut ast = Ast::new();
    let root = MesonParser.parse(&mut ast, &source)?;
    Ok((ast, root))
}

fn statements(ast: &Ast, root: NodeId) -> Vec<NodeId> {
    match ast.kind(root) {
        NodeKind::BuildDefinition { statements } => statements.clone(),
        other => panic!("expected a build definition, found {other:?}"),
    }
}

#[test]
fn parses_calls_with_positional_and_keyword_arguments() -> Result<()> {
    let (ast, root) = parse("executable('app', 'main.c',\n  install: true,\n)\n")?;
    let [call] = statements(&ast, root)[..] else {
        panic!("expected one statement");
    };
    let NodeKind::FunctionCall { id, args, function } = ast.kind(call) else {
        panic!("expected a call");
    };
    assert_eq!(ast.identifier_name(*id), Some("executable"));
    assert!(function.is_none(), "calls are resolved by the analyzer, not the parser");

    let positional = ast.positional_args(*args);
    assert_eq!(positional.len(), 2);
    assert_eq!(ast.string_value(positional[1]), Some("main.c"));
    let install = ast.kwarg(*args, "install").expect("install kwarg");
    assert!(matches!(ast.kind(install), NodeKind::BooleanLiteral { value: true }));
    assert_eq!(ast.location(call), Location::new(0, 0, 2, 1));
    Ok(())
}

#[test]
fn arithmetic_binds_tighter_than_comparison() -> Result<()> {
    let (ast, root) = parse("x = 1 + 2 * 3 == 7 and not false\n")?;
    let NodeKind::Assignment { op, rhs, .. } = ast.kind(statements(&ast, root)[0]) else {
        panic!("expected an assignment");
    };
    assert_eq!(*op, AssignmentOperator::Equals);
    let NodeKind::Binary { lhs, op, .. } = ast.kind(*rhs) else {
        panic!("expected `and` at the top");
    };
    assert_eq!(*op, BinaryOperator::And);
    let NodeKind::Binary { lhs, op, .. } = ast.kind(*lhs) else {
        panic!("expected `==` below `and`");
    };
    assert_eq!(*op, BinaryOperator::Equal);
    let NodeKind::Binary { rhs, op, .. } = ast.kind(*lhs) else {
        panic!("expected `+` below `==`");
    };
    assert_eq!(*op, BinaryOperator::Add);
    assert!(matches!(
        ast.kind(*rhs),
        NodeKind::Binary { op: BinaryOperator::Mul, .. }
    ));
    Ok(())
}

#[test]
fn parses_selection_with_every_branch_kind() -> Result<()> {
    let (ast, root) = parse("if a\n  x = 1\nelif b\nelse\n  x = 2\n  y = 3\nendif\n")?;
    let NodeKind::Selection { conditions, blocks } = ast.kind(statements(&ast, root)[0]) else {
        panic!("expected a selection");
    };
    assert_eq!(conditions.len(), 2);
    assert_eq!(blocks.iter().map(Vec::len).collect::<Vec<_>>(), vec![1, 0, 2]);
    Ok(())
}

#[test]
fn parses_foreach_with_one_or_two_variables() -> Result<()> {
    let (ast, root) = parse(
        "foreach k, v : {'a': 1}\n  continue\nendforeach\nforeach s : ['x']\n  break\nendforeach\n",
    )?;
    let loops = statements(&ast, root);
    let NodeKind::Iteration { ids, block, .. } = ast.kind(loops[0]) else {
        panic!("expected a loop");
    };
    assert_eq!(ids.len(), 2);
    assert!(matches!(ast.kind(block[0]), NodeKind::Continue));
    let NodeKind::Iteration { ids, expression, .. } = ast.kind(loops[1]) else {
        panic!("expected a loop");
    };
    assert_eq!(ids.len(), 1);
    assert!(matches!(ast.kind(*expression), NodeKind::ArrayLiteral { .. }));
    Ok(())
}

#[test]
fn parses_methods_subscripts_and_ternaries() -> Result<()> {
    let (ast, root) = parse("v = cond ? 'a'.split('.')[0] : d.get('k', 'z')\n")?;
    let NodeKind::Assignment { rhs, .. } = ast.kind(statements(&ast, root)[0]) else {
        panic!("expected an assignment");
    };
    let NodeKind::Conditional { if_true, if_false, .. } = ast.kind(*rhs) else {
        panic!("expected a ternary");
    };
    let NodeKind::Subscript { outer, .. } = ast.kind(*if_true) else {
        panic!("expected a subscript");
    };
    assert!(matches!(ast.kind(*outer), NodeKind::MethodCall { .. }));
    let NodeKind::MethodCall { id, args, .. } = ast.kind(*if_false) else {
        panic!("expected a method call");
    };
    assert_eq!(ast.identifier_name(*id), Some("get"));
    assert_eq!(ast.positional_args(*args).len(), 2);
    Ok(())
}

#[test]
fn every_node_knows_its_parent() -> Result<()> {
    let (ast, root) = parse("x = [1, {'k': f'@y@'}]\nfoo(x, bar: -1)\n")?;
    assert_eq!(ast.parent(root), None);
    let mut pending = vec![root];
    let mut visited = 0;
    while let Some(id) = pending.pop() {
        for child in ast.children(id) {
            assert_eq!(ast.parent(child), Some(id), "{:?}", ast.kind(child));
            pending.push(child);
        }
        visited += 1;
    }
    assert_eq!(visited, ast.len(), "every allocated node is reachable");
    Ok(())
}

#[test]
fn comments_and_blank_lines_are_ignored() -> Result<()> {
    let (ast, root) = parse("# header\n\nx = 1 # trailing\n\n\ny = 2\n")?;
    assert_eq!(statements(&ast, root).len(), 2);
    Ok(())
}

#[test]
fn malformed_input_is_rejected() {
    for input in ["x = \n", "if x\n", "foo(a: 1, 2\n", "[1 2]\n", "'abc\n", "x.y\n"] {
        assert!(parse(input).is_err(), "{input:?} should not parse");
    }
}

#[test]
fn errors_name_the_file() {
    let error = parse("x = = 1\n").expect_err("double equals");
    assert!(
        format!("{error:#}").contains("meson.build"),
        "unexpected error: {error:#}"
    );
}
