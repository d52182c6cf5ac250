//! Project loading.
//!
//! A [`Project`] is the root build file plus every file reachable through
//! `subdir()`, all parsed into one [`Ast`]. Each file is a [`MesonTree`];
//! the root of a child tree points back at the inclusion node that pulled
//! it in, so the project forms one connected node graph.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::clean;
use tracing::{debug, warn};

use crate::analyzer::TypeAnalyzer;
use crate::ast::{Ast, Location, NodeId, NodeKind};
use crate::catalog::Callee;
use crate::config::AnalysisOptions;
use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::metadata::Metadata;
use crate::options::{extract_options, MesonOption, OptionState};
use crate::parser::{BuildFileParser, MesonParser};
use crate::scope::Scope;
use crate::source::{SourceFile, SourceId};
use crate::types::TypeSet;

mod patcher;

pub const BUILD_FILE: &str = "meson.build";
/// Option files, in lookup order.
pub const OPTION_FILES: &[&str] = &["meson.options", "meson_options.txt"];

/// One parsed build file and the files it includes.
#[derive(Debug, Clone)]
pub struct MesonTree {
    /// Absolute, normalized path of the build file.
    pub path: PathBuf,
    pub root: NodeId,
    pub source: SourceFile,
    pub children: Vec<MesonTree>,
}

impl MesonTree {
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }

    /// Child trees attached to the inclusion node `inclusion`.
    pub fn subtrees_of(&self, ast: &Ast, inclusion: NodeId) -> Vec<&MesonTree> {
        self.children
            .iter()
            .filter(|child| ast.parent(child.root) == Some(inclusion))
            .collect()
    }

    /// The tree for `path`, searching every descendant.
    pub fn find_subtree(&self, path: &Path) -> Option<&MesonTree> {
        if self.path == path {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_subtree(path))
    }

    /// This tree and all descendants, parents before children.
    pub fn walk(&self) -> Vec<&MesonTree> {
        let mut trees = vec![self];
        for child in &self.children {
            trees.extend(child.walk());
        }
        trees
    }
}

/// Builds the tree of a project while tracking which files are loaded.
struct Assembler<'p> {
    parser: &'p dyn BuildFileParser,
    options: &'p OptionState,
    max_depth: usize,
    loaded: HashSet<PathBuf>,
    next_source: u32,
    diagnostics: Metadata,
}

impl<'p> Assembler<'p> {
    fn read(&mut self, ast: &mut Ast, path: &Path) -> Result<(SourceFile, NodeId), LoadError> {
        let contents = fs::read_to_string(path).map_err(|err| LoadError::unreadable(path, err))?;
        let source = SourceFile::new(SourceId(self.next_source), path.to_path_buf(), contents);
        self.next_source += 1;
        let root = self
            .parser
            .parse(ast, &source)
            .map_err(|err| LoadError::parse(path, err))?;
        debug!(path = %path.display(), nodes = ast.len(), "parsed build file");
        Ok((source, root))
    }

    fn load_tree(
        &mut self,
        ast: &mut Ast,
        path: PathBuf,
        depth: usize,
        inclusion: Option<NodeId>,
    ) -> Result<MesonTree, LoadError> {
        let (source, root) = self.read(ast, &path)?;
        ast.set_parent(root, inclusion);
        self.loaded.insert(path.clone());

        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut children = Vec::new();
        for node in patcher::patch_inclusions(ast, root, &dir, self.options) {
            let targets = match ast.kind(node) {
                NodeKind::SubdirCall { subdir, .. } => vec![subdir.clone()],
                NodeKind::MultiSubdirCall { subdirs, .. } => subdirs.clone(),
                other => unreachable!("inclusion patcher produced {other:?}"),
            };
            let single = matches!(ast.kind(node), NodeKind::SubdirCall { .. });
            for target in targets {
                let child_path = clean(dir.join(&target).join(BUILD_FILE));
                if !child_path.is_file() {
                    warn!(path = %child_path.display(), "computed subdir target does not exist");
                    continue;
                }
                if self.loaded.contains(&child_path) {
                    debug!(path = %child_path.display(), "build file already loaded, skipping");
                    continue;
                }
                let location = ast.location(node);
                if depth + 1 > self.max_depth {
                    warn!(path = %child_path.display(), depth, "subdir nesting too deep");
                    let message = format!("Subdir nesting exceeds {} levels", self.max_depth);
                    self.file_diagnostics(&path).push_warning(message, location);
                    continue;
                }
                match self.load_tree(ast, child_path, depth + 1, Some(node)) {
                    Ok(child) => children.push(child),
                    Err(err) => {
                        let message = if single {
                            err.to_string()
                        } else {
                            format!("{target}: {err}")
                        };
                        self.file_diagnostics(&path).push_error(message, location);
                    }
                }
            }
        }

        Ok(MesonTree {
            path,
            root,
            source,
            children,
        })
    }

    fn file_diagnostics(&mut self, path: &Path) -> &mut Diagnostics {
        &mut self.diagnostics.file_mut(path).diagnostics
    }
}

/// Absolute, normalized form of `path`.
fn absolute(path: &Path) -> Result<PathBuf, LoadError> {
    if path.is_absolute() {
        return Ok(clean(path));
    }
    let cwd = std::env::current_dir().map_err(|err| LoadError::unreadable(path, err))?;
    Ok(clean(cwd.join(path)))
}

/// Options declared by the project in its option file, if any.
fn read_project_options(
    dir: &Path,
    parser: &dyn BuildFileParser,
) -> Result<Vec<MesonOption>, LoadError> {
    let Some(path) = OPTION_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
    else {
        return Ok(Vec::new());
    };
    let contents = fs::read_to_string(&path).map_err(|err| LoadError::unreadable(&path, err))?;
    let source = SourceFile::new(SourceId(u32::MAX), path.clone(), contents);
    let mut scratch = Ast::new();
    let root = parser
        .parse(&mut scratch, &source)
        .map_err(|err| LoadError::parse(&path, err))?;
    let options = extract_options(&scratch, root);
    debug!(path = %path.display(), count = options.len(), "read project options");
    Ok(options)
}

/// A loaded project and, after [`Project::analyze`], its analysis results.
#[derive(Debug)]
pub struct Project {
    dir: PathBuf,
    ast: Ast,
    tree: MesonTree,
    options: OptionState,
    config: AnalysisOptions,
    load_diagnostics: Metadata,
    metadata: Metadata,
    scope: Scope,
}

impl Project {
    /// Loads the project in `dir` with the bundled parser.
    pub fn load(dir: &Path, config: AnalysisOptions) -> Result<Self, LoadError> {
        Self::load_with(dir, &MesonParser, config)
    }

    pub fn load_with(
        dir: &Path,
        parser: &dyn BuildFileParser,
        config: AnalysisOptions,
    ) -> Result<Self, LoadError> {
        let dir = absolute(dir)?;
        let root_file = dir.join(BUILD_FILE);
        if !root_file.is_file() {
            return Err(LoadError::MissingBuildFile { path: dir });
        }

        let options = OptionState::with_project_options(read_project_options(&dir, parser)?);
        let mut ast = Ast::new();
        let mut assembler = Assembler {
            parser,
            options: &options,
            max_depth: config.max_subdir_depth,
            loaded: HashSet::new(),
            next_source: 0,
            diagnostics: Metadata::new(),
        };
        let tree = assembler.load_tree(&mut ast, root_file, 0, None)?;
        let load_diagnostics = assembler.diagnostics;
        debug!(files = tree.walk().len(), "project assembled");

        Ok(Self {
            dir,
            ast,
            tree,
            options,
            config,
            metadata: load_diagnostics.clone(),
            load_diagnostics,
            scope: Scope::root(),
        })
    }

    /// Runs type analysis over the whole project, replacing the results of
    /// any earlier run.
    pub fn analyze(&mut self) {
        let mut metadata = self.load_diagnostics.clone();
        let analyzer = TypeAnalyzer::new(&mut self.ast, &mut metadata, &self.options, &self.config);
        self.scope = analyzer.analyze(&self.tree);
        self.metadata = metadata;
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `path` made absolute against the project directory.
    fn resolve(&self, path: &Path) -> PathBuf {
        clean(self.dir.join(path))
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn tree(&self) -> &MesonTree {
        &self.tree
    }

    pub fn options(&self) -> &OptionState {
        &self.options
    }

    pub fn config(&self) -> &AnalysisOptions {
        &self.config
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Variables visible at the end of the root build file.
    pub fn root_bindings(&self) -> impl Iterator<Item = (&str, &TypeSet)> {
        self.scope.bindings()
    }

    pub fn variable_types(&self, name: &str) -> Option<&TypeSet> {
        self.scope.get(name)
    }

    pub fn find_subtree(&self, path: &Path) -> Option<&MesonTree> {
        self.tree.find_subtree(&self.resolve(path))
    }

    /// Every loaded build file, parents before children.
    pub fn files(&self) -> Vec<&Path> {
        self.tree
            .walk()
            .into_iter()
            .map(|tree| tree.path.as_path())
            .collect()
    }

    pub fn diagnostics_for(&self, path: &Path) -> Option<&Diagnostics> {
        self.metadata.diagnostics_for(&self.resolve(path))
    }

    pub fn has_errors(&self) -> bool {
        self.metadata.has_errors()
    }

    pub fn find_identifier_at(&self, path: &Path, line: usize, column: usize) -> Option<NodeId> {
        self.metadata
            .find_identifier_at(&self.ast, &self.resolve(path), line, column)
    }

    pub fn find_string_literal_at(
        &self,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        self.metadata
            .find_string_literal_at(&self.ast, &self.resolve(path), line, column)
    }

    pub fn find_function_call_at(&self, path: &Path, line: usize, column: usize) -> Option<NodeId> {
        self.metadata
            .find_function_call_at(&self.ast, &self.resolve(path), line, column)
    }

    pub fn find_full_function_call_at(
        &self,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        self.metadata
            .find_full_function_call_at(&self.ast, &self.resolve(path), line, column)
    }

    pub fn find_method_call_at(&self, path: &Path, line: usize, column: usize) -> Option<NodeId> {
        self.metadata
            .find_method_call_at(&self.ast, &self.resolve(path), line, column)
    }

    pub fn find_full_method_call_at(
        &self,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        self.metadata
            .find_full_method_call_at(&self.ast, &self.resolve(path), line, column)
    }

    pub fn find_subscript_at(&self, path: &Path, line: usize, column: usize) -> Option<NodeId> {
        self.metadata
            .find_subscript_at(&self.ast, &self.resolve(path), line, column)
    }

    pub fn find_kwarg_at(
        &self,
        path: &Path,
        line: usize,
        column: usize,
    ) -> Option<(NodeId, Callee)> {
        self.metadata
            .find_kwarg_at(&self.ast, &self.resolve(path), line, column)
    }

    pub fn find_inclusion_at(&self, path: &Path, line: usize, column: usize) -> Option<NodeId> {
        self.metadata
            .find_inclusion_at(&self.ast, &self.resolve(path), line, column)
    }

    pub fn find_declaration_of(&self, name: &str) -> Option<(&Path, Location)> {
        self.metadata.find_declaration_of(&self.ast, name)
    }
}
