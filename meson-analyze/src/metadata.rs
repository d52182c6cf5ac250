//! Position index built while analyzing a project.
//!
//! Every query is a linear scan over one file's entries. When several
//! indexed nodes contain the queried point, the innermost one wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::ast::{AssignmentOperator, Ast, Location, NodeId, NodeKind};
use crate::catalog::Callee;
use crate::diagnostics::Diagnostics;

/// Indexed nodes of a single build file, in visiting order.
#[derive(Debug, Default, Clone)]
pub struct FileMetadata {
    pub identifiers: Vec<NodeId>,
    pub string_literals: Vec<NodeId>,
    pub function_calls: Vec<NodeId>,
    pub method_calls: Vec<NodeId>,
    pub subscripts: Vec<NodeId>,
    pub kwargs: Vec<(NodeId, Callee)>,
    pub inclusions: Vec<NodeId>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Default, Clone)]
pub struct Metadata {
    files: HashMap<PathBuf, FileMetadata>,
    order: Vec<PathBuf>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `path`, created on first use.
    pub fn file_mut(&mut self, path: &Path) -> &mut FileMetadata {
        if !self.files.contains_key(path) {
            self.order.push(path.to_path_buf());
        }
        self.files.entry(path.to_path_buf()).or_default()
    }

    pub fn file(&self, path: &Path) -> Option<&FileMetadata> {
        self.files.get(path)
    }

    /// Files in the order they were first indexed.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &FileMetadata)> {
        self.order
            .iter()
            .filter_map(|path| self.files.get(path).map(|file| (path.as_path(), file)))
    }

    pub fn diagnostics_for(&self, path: &Path) -> Option<&Diagnostics> {
        self.files.get(path).map(|file| &file.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.files.values().any(|file| file.diagnostics.has_errors())
    }

    /// Every file's diagnostics as JSON, paths shown relative to `base`
    /// when they lie below it.
    pub fn diagnostics_json(&self, base: &Path) -> serde_json::Value {
        let files: Vec<serde_json::Value> = self
            .files()
            .filter(|(_, file)| !file.diagnostics.is_empty())
            .map(|(path, file)| {
                let shown = path.strip_prefix(base).unwrap_or(path);
                json!({
                    "path": shown.display().to_string(),
                    "diagnostics": file.diagnostics,
                })
            })
            .collect();
        json!({ "files": files })
    }

    pub fn find_identifier_at(
        &self,
        ast: &Ast,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        let file = self.files.get(path)?;
        innermost(file.identifiers.iter().copied(), |id| ast.location(id), line, column)
    }

    pub fn find_string_literal_at(
        &self,
        ast: &Ast,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        let file = self.files.get(path)?;
        innermost(file.string_literals.iter().copied(), |id| ast.location(id), line, column)
    }

    /// Function call whose callee name contains the point.
    pub fn find_function_call_at(
        &self,
        ast: &Ast,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        let file = self.files.get(path)?;
        innermost(file.function_calls.iter().copied(), |id| callee_location(ast, id), line, column)
    }

    /// Function call whose whole span contains the point.
    pub fn find_full_function_call_at(
        &self,
        ast: &Ast,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        let file = self.files.get(path)?;
        innermost(file.function_calls.iter().copied(), |id| ast.location(id), line, column)
    }

    /// Method call whose method name contains the point.
    pub fn find_method_call_at(
        &self,
        ast: &Ast,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        let file = self.files.get(path)?;
        innermost(file.method_calls.iter().copied(), |id| callee_location(ast, id), line, column)
    }

    pub fn find_full_method_call_at(
        &self,
        ast: &Ast,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        let file = self.files.get(path)?;
        innermost(file.method_calls.iter().copied(), |id| ast.location(id), line, column)
    }

    pub fn find_subscript_at(
        &self,
        ast: &Ast,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        let file = self.files.get(path)?;
        innermost(file.subscripts.iter().copied(), |id| ast.location(id), line, column)
    }

    /// Keyword argument at the point together with the callable it is
    /// passed to.
    pub fn find_kwarg_at(
        &self,
        ast: &Ast,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<(NodeId, Callee)> {
        let file = self.files.get(path)?;
        let item = innermost(
            file.kwargs.iter().map(|(item, _)| *item),
            |id| ast.location(id),
            line,
            column,
        )?;
        file.kwargs.iter().copied().find(|(candidate, _)| *candidate == item)
    }

    pub fn find_inclusion_at(
        &self,
        ast: &Ast,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        let file = self.files.get(path)?;
        innermost(file.inclusions.iter().copied(), |id| ast.location(id), line, column)
    }

    /// Where `name` is first assigned with a plain `=`.
    pub fn find_declaration_of(&self, ast: &Ast, name: &str) -> Option<(&Path, Location)> {
        self.identifiers_named(ast, name)
            .into_iter()
            .find(|(_, id)| is_declaration(ast, *id))
            .map(|(path, id)| (path, ast.location(id)))
    }

    /// Every indexed occurrence of the identifier `name`.
    pub fn identifiers_named(&self, ast: &Ast, name: &str) -> Vec<(&Path, NodeId)> {
        self.files()
            .flat_map(|(path, file)| {
                file.identifiers
                    .iter()
                    .copied()
                    .filter(|id| ast.identifier_name(*id) == Some(name))
                    .map(move |id| (path, id))
            })
            .collect()
    }
}

fn is_declaration(ast: &Ast, id: NodeId) -> bool {
    let Some(parent) = ast.parent(id) else {
        return false;
    };
    matches!(
        ast.kind(parent),
        NodeKind::Assignment { lhs, op: AssignmentOperator::Equals, .. } if *lhs == id
    )
}

fn callee_location(ast: &Ast, call: NodeId) -> Location {
    match ast.kind(call) {
        NodeKind::FunctionCall { id, .. }
        | NodeKind::SubdirCall { id, .. }
        | NodeKind::MultiSubdirCall { id, .. }
        | NodeKind::MethodCall { id, .. } => ast.location(*id),
        other => unreachable!("call index holds a non-call node: {other:?}"),
    }
}

/// Extent used to order nested matches: line count first, then columns.
fn extent(location: Location) -> (usize, usize) {
    let lines = location.end_line - location.start_line;
    if lines == 0 {
        (0, location.end_column.saturating_sub(location.start_column))
    } else {
        (lines, location.end_column)
    }
}

fn innermost(
    candidates: impl Iterator<Item = NodeId>,
    location_of: impl Fn(NodeId) -> Location,
    line: usize,
    column: usize,
) -> Option<NodeId> {
    let mut best: Option<(NodeId, (usize, usize))> = None;
    for candidate in candidates {
        let location = location_of(candidate);
        if !location.contains(line, column) {
            continue;
        }
        let size = extent(location);
        if best.map_or(true, |(_, best_size)| size < best_size) {
            best = Some((candidate, size));
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn innermost_match_wins() {
        let mut ast = Ast::new();
        let outer = ast.alloc(NodeKind::Break, Location::new(1, 0, 1, 20));
        let inner = ast.alloc(NodeKind::Continue, Location::new(1, 4, 1, 8));
        let found = innermost([outer, inner].into_iter(), |id| ast.location(id), 1, 5);
        assert_eq!(found, Some(inner));
        let found = innermost([outer, inner].into_iter(), |id| ast.location(id), 1, 12);
        assert_eq!(found, Some(outer));
    }

    #[test]
    fn json_report_uses_relative_paths() {
        let mut metadata = Metadata::new();
        let path = Path::new("/project/sub/meson.build");
        metadata
            .file_mut(path)
            .diagnostics
            .push_warning("Expected snake case", Location::new(0, 0, 0, 5));
        metadata.file_mut(Path::new("/project/meson.build"));

        let report = metadata.diagnostics_json(Path::new("/project"));
        let files = report["files"].as_array().expect("files array");
        assert_eq!(files.len(), 1, "clean files are left out");
        assert_eq!(files[0]["path"], "sub/meson.build");
        assert_eq!(files[0]["diagnostics"][0]["level"], "warning");
    }

    #[test]
    fn unknown_files_have_no_matches() {
        let ast = Ast::new();
        let metadata = Metadata::new();
        assert!(metadata
            .find_identifier_at(&ast, Path::new("/nope/meson.build"), 0, 0)
            .is_none());
    }
}
