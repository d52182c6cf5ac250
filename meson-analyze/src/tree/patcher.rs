use std::path::Path;

use tracing::debug;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::eval::guess_values;
use crate::options::OptionState;

use super::BUILD_FILE;

/// Statements held by `root` and by every loop or selection nested in it.
fn statements_below(ast: &Ast, root: NodeId) -> Vec<NodeId> {
    let mut statements = Vec::new();
    let mut pending = vec![root];
    while let Some(holder) = pending.pop() {
        for list in ast.statement_lists(holder) {
            for statement in list {
                statements.push(*statement);
                if matches!(
                    ast.kind(*statement),
                    NodeKind::Iteration { .. } | NodeKind::Selection { .. }
                ) {
                    pending.push(*statement);
                }
            }
        }
    }
    statements.sort_by_key(|id| {
        let location = ast.location(*id);
        (location.start_line, location.start_column)
    });
    statements
}

/// Rewrites the `subdir()` calls of one file into inclusion nodes and
/// returns them in source order.
///
/// A literal target becomes a [`NodeKind::SubdirCall`] only when
/// `<dir>/<target>/meson.build` exists; otherwise the call is left alone.
/// Any other argument becomes a [`NodeKind::MultiSubdirCall`] holding the
/// values the partial evaluator finds for it.
pub(crate) fn patch_inclusions(
    ast: &mut Ast,
    root: NodeId,
    dir: &Path,
    options: &OptionState,
) -> Vec<NodeId> {
    let mut inclusions = Vec::new();
    for statement in statements_below(ast, root) {
        let NodeKind::FunctionCall { id, args, function } = ast.kind(statement).clone() else {
            continue;
        };
        if ast.identifier_name(id) != Some("subdir") {
            continue;
        }
        let positional = ast.positional_args(args);
        let [target] = positional.as_slice() else {
            continue;
        };

        let replacement = match ast.string_value(*target) {
            Some(subdir) => {
                if !dir.join(subdir).join(BUILD_FILE).is_file() {
                    debug!(dir = %dir.display(), subdir, "subdir target missing, left as call");
                    continue;
                }
                debug!(dir = %dir.display(), subdir, "subdir accepted");
                NodeKind::SubdirCall {
                    id,
                    args,
                    function,
                    subdir: subdir.to_string(),
                }
            }
            None => {
                let subdirs = guess_values(ast, options, *target);
                debug!(dir = %dir.display(), ?subdirs, "computed subdir targets");
                NodeKind::MultiSubdirCall {
                    id,
                    args,
                    function,
                    subdirs,
                }
            }
        };
        ast.replace_kind(statement, replacement);
        inclusions.push(statement);
    }
    inclusions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;

    fn identifier(ast: &mut Ast, name: &str) -> NodeId {
        ast.alloc(
            NodeKind::Identifier {
                name: name.to_string(),
            },
            Location::default(),
        )
    }

    #[test]
    fn nested_statements_are_scanned() {
        let mut ast = Ast::new();
        let call_id = identifier(&mut ast, "message");
        let call = ast.alloc(
            NodeKind::FunctionCall {
                id: call_id,
                args: None,
                function: None,
            },
            Location::new(1, 4, 1, 13),
        );
        let condition = ast.alloc(NodeKind::BooleanLiteral { value: true }, Location::default());
        let selection = ast.alloc(
            NodeKind::Selection {
                conditions: vec![condition],
                blocks: vec![vec![call]],
            },
            Location::new(0, 0, 2, 5),
        );
        let root = ast.alloc(
            NodeKind::BuildDefinition {
                statements: vec![selection],
            },
            Location::default(),
        );
        ast.set_parents(root);
        assert_eq!(statements_below(&ast, root), vec![selection, call]);
    }
}
