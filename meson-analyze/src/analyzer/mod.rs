//! Type inference over an assembled project.
//!
//! [`TypeAnalyzer`] makes a single depth-first pass over every file of a
//! [`MesonTree`], computing the possible types of each expression and
//! recording identifiers, calls, subscripts, keyword arguments and
//! diagnostics in [`Metadata`]. The file being analyzed is tracked on an
//! explicit stack that grows when a `subdir()` is entered and shrinks when
//! its subtree is done.

use std::collections::HashSet;

use tracing::{debug_span, info, trace};

use crate::ast::{
    AssignmentOperator, Ast, BinaryOperator, Location, NodeId, NodeKind, UnaryOperator,
};
use crate::config::AnalysisOptions;
use crate::metadata::{FileMetadata, Metadata};
use crate::options::OptionState;
use crate::scope::Scope;
use crate::tree::MesonTree;
use crate::types::{ObjectKind, Type, TypeSet};

mod calls;
mod operators;

/// Builtin objects that scripts may not rebind.
const READ_ONLY: &[&str] = &["meson", "build_machine", "host_machine", "target_machine"];

pub struct TypeAnalyzer<'a> {
    ast: &'a mut Ast,
    metadata: &'a mut Metadata,
    options: &'a OptionState,
    config: &'a AnalysisOptions,
    files: Vec<&'a MesonTree>,
    scope: Scope,
    loop_depth: usize,
}

impl<'a> TypeAnalyzer<'a> {
    pub fn new(
        ast: &'a mut Ast,
        metadata: &'a mut Metadata,
        options: &'a OptionState,
        config: &'a AnalysisOptions,
    ) -> Self {
        Self {
            ast,
            metadata,
            options,
            config,
            files: Vec::new(),
            scope: Scope::root(),
            loop_depth: 0,
        }
    }

    /// Analyzes `tree` and every subtree reachable from it. Returns the
    /// bindings visible at the end of the root file.
    pub fn analyze(mut self, tree: &'a MesonTree) -> Scope {
        info!(root = %tree.path.display(), "starting analysis");
        self.check_file(tree);
        info!(
            files = self.metadata.files().count(),
            errors = self.metadata.has_errors(),
            "analysis finished"
        );
        self.scope
    }

    fn check_file(&mut self, tree: &'a MesonTree) {
        let span = debug_span!("analyze_file", path = %tree.path.display());
        let _guard = span.enter();

        self.metadata.file_mut(&tree.path);
        self.files.push(tree);
        let outer_loops = std::mem::take(&mut self.loop_depth);
        self.check_statement(tree.root);
        self.loop_depth = outer_loops;
        self.files.pop();
    }

    fn current_file(&mut self) -> &mut FileMetadata {
        let Some(tree) = self.files.last().copied() else {
            unreachable!("node visited outside of any file");
        };
        self.metadata.file_mut(&tree.path)
    }

    fn report_error(&mut self, message: impl Into<String>, location: Location) {
        self.current_file().diagnostics.push_error(message, location);
    }

    fn report_warning(&mut self, message: impl Into<String>, location: Location) {
        self.current_file().diagnostics.push_warning(message, location);
    }

    fn check_block(&mut self, statements: &[NodeId]) {
        for statement in statements {
            self.check_statement(*statement);
        }
    }

    fn check_statement(&mut self, node: NodeId) {
        let kind = self.ast.kind(node).clone();
        match kind {
            NodeKind::BuildDefinition { statements } => self.check_block(&statements),
            NodeKind::Assignment { lhs, op, rhs } => self.check_assignment(node, lhs, op, rhs),
            NodeKind::Iteration {
                ids,
                expression,
                block,
            } => self.check_loop(&ids, expression, &block),
            NodeKind::Selection { conditions, blocks } => {
                self.check_conditional(&conditions, &blocks)
            }
            NodeKind::Break => self.check_loop_control(node, "break"),
            NodeKind::Continue => self.check_loop_control(node, "continue"),
            _ => {
                self.infer_expression(node);
            }
        }
    }

    fn check_assignment(&mut self, node: NodeId, lhs: NodeId, op: AssignmentOperator, rhs: NodeId) {
        let rhs_types = self.infer_expression(rhs);
        let Some(name) = self.ast.identifier_name(lhs).map(str::to_string) else {
            let location = self.ast.location(lhs);
            self.report_error("Can only assign to variables", location);
            return;
        };
        self.current_file().identifiers.push(lhs);

        let lhs_location = self.ast.location(lhs);
        if READ_ONLY.contains(&name.as_str()) {
            self.report_error(
                "Attempted to re-assign to existing, read-only variable",
                lhs_location,
            );
            return;
        }
        if rhs_types.as_slice() == [Type::Void] && !self.is_install_call(rhs) {
            let location = self.ast.location(rhs);
            self.report_error("Can't assign from void", location);
        }
        if op == AssignmentOperator::Equals {
            self.lint_name(&name, lhs_location);
        }

        let types = match op {
            AssignmentOperator::Equals => rhs_types,
            other => {
                let current = match self.scope.get(&name) {
                    Some(types) => types.clone(),
                    None => {
                        if self.config.report_unresolved {
                            self.report_error(format!("Unknown identifier `{name}`"), lhs_location);
                        }
                        TypeSet::empty()
                    }
                };
                operators::compound(other, &current, &rhs_types)
            }
        };
        trace!(variable = %name, op = op.symbol(), types = %types, "assignment");
        self.ast.set_types(lhs, types.clone());
        self.ast.set_types(node, types.clone());
        self.scope.set(name, types);
    }

    fn is_install_call(&self, node: NodeId) -> bool {
        match self.ast.kind(node) {
            NodeKind::FunctionCall { id, .. } => self
                .ast
                .identifier_name(*id)
                .is_some_and(|name| name.starts_with("install_")),
            _ => false,
        }
    }

    fn lint_name(&mut self, name: &str, location: Location) {
        if self.config.lint_names && !is_snake_case(name) && !is_shouting_snake_case(name) {
            self.report_warning("Expected snake case", location);
        }
    }

    fn check_conditional(&mut self, conditions: &[NodeId], blocks: &[Vec<NodeId>]) {
        let before = self.scope.clone();
        let mut merged = before.clone();
        for (index, block) in blocks.iter().enumerate() {
            self.scope = before.child();
            if let Some(condition) = conditions.get(index) {
                let types = self.infer_expression(*condition);
                self.check_condition(*condition, &types);
            }
            self.check_block(block);
            merged.merge(&self.scope);
        }
        self.scope = merged;
    }

    fn check_condition(&mut self, condition: NodeId, types: &TypeSet) {
        if types.is_empty() {
            return;
        }
        let usable = types
            .iter()
            .any(|ty| matches!(ty, Type::Bool | Type::Any | Type::Disabler));
        if !usable {
            let location = self.ast.location(condition);
            self.report_error(format!("Condition is not bool: {types}"), location);
        }
    }

    fn check_loop(&mut self, ids: &[NodeId], expression: NodeId, block: &[NodeId]) {
        let iterable = self.infer_expression(expression);
        let expression_location = self.ast.location(expression);

        let bindings: Vec<TypeSet> = match ids {
            [_] => vec![self.single_loop_binding(&iterable, expression_location)],
            [_, _] => self.pair_loop_binding(&iterable, expression_location),
            _ => {
                let location = ids
                    .first()
                    .map(|id| self.ast.location(*id))
                    .unwrap_or(expression_location);
                self.report_error(
                    "Iteration statement expects only one or two identifiers",
                    location,
                );
                vec![TypeSet::single(Type::Any); ids.len()]
            }
        };

        let mut merged = self.scope.clone();
        self.scope = self.scope.child();
        for (id, types) in ids.iter().zip(bindings) {
            self.current_file().identifiers.push(*id);
            self.ast.set_types(*id, types.clone());
            if let Some(name) = self.ast.identifier_name(*id).map(str::to_string) {
                let location = self.ast.location(*id);
                self.lint_name(&name, location);
                self.scope.set(name, types);
            }
        }

        self.loop_depth += 1;
        self.check_block(block);
        self.loop_depth -= 1;
        merged.merge(&self.scope);
        self.scope = merged;
    }

    fn single_loop_binding(&mut self, iterable: &TypeSet, location: Location) -> TypeSet {
        let mut bound = Vec::new();
        let mut iterable_found = false;
        let mut saw_dict = false;
        for ty in iterable {
            match ty {
                Type::List(elements) => {
                    iterable_found = true;
                    bound.extend(elements.iter().cloned());
                }
                Type::Object(ObjectKind::Range) => {
                    iterable_found = true;
                    bound.push(Type::Int);
                }
                Type::Any => {
                    iterable_found = true;
                    bound.push(Type::Any);
                }
                Type::Dict(_) => saw_dict = true,
                _ => {}
            }
        }
        if !iterable_found {
            if saw_dict {
                self.report_error("Iterating over a dict requires two identifiers", location);
            } else if !iterable.is_empty() {
                self.report_error("Expression yields no iterable result", location);
            }
        }
        if bound.is_empty() {
            bound.push(Type::Any);
        }
        TypeSet::new(bound)
    }

    fn pair_loop_binding(&mut self, iterable: &TypeSet, location: Location) -> Vec<TypeSet> {
        let mut values = Vec::new();
        let mut dict_found = false;
        let mut saw_sequence = false;
        for ty in iterable {
            match ty {
                Type::Dict(elements) => {
                    dict_found = true;
                    values.extend(elements.iter().cloned());
                }
                Type::Any => {
                    dict_found = true;
                    values.push(Type::Any);
                }
                Type::List(_) | Type::Object(ObjectKind::Range) => saw_sequence = true,
                _ => {}
            }
        }
        if !dict_found {
            if saw_sequence {
                self.report_error("Iterating over a list/range requires one identifier", location);
            } else if !iterable.is_empty() {
                self.report_error("Expression yields no iterable result", location);
            }
        }
        if values.is_empty() {
            values.push(Type::Any);
        }
        vec![TypeSet::single(Type::Str), TypeSet::new(values)]
    }

    fn check_loop_control(&mut self, node: NodeId, keyword: &str) {
        if self.loop_depth == 0 {
            let location = self.ast.location(node);
            self.report_error(
                format!("{keyword} statements are only allowed inside loops"),
                location,
            );
        }
    }

    /// Infers the types of `node`, stores them on the node and returns them.
    fn infer_expression(&mut self, node: NodeId) -> TypeSet {
        let kind = self.ast.kind(node).clone();
        let types = match kind {
            NodeKind::StringLiteral { .. } => {
                self.current_file().string_literals.push(node);
                TypeSet::single(Type::Str)
            }
            NodeKind::IntegerLiteral { .. } => TypeSet::single(Type::Int),
            NodeKind::BooleanLiteral { .. } => TypeSet::single(Type::Bool),
            NodeKind::Identifier { name } => self.type_from_identifier(node, &name),
            NodeKind::ArrayLiteral { elements } => {
                let mut element_types = TypeSet::empty();
                for element in elements {
                    element_types = element_types.union(&self.infer_expression(element));
                }
                TypeSet::single(Type::List(element_types))
            }
            NodeKind::DictionaryLiteral { entries } => self.type_from_dictionary(&entries),
            NodeKind::KeyValueItem { key, value } => {
                self.infer_expression(key);
                self.infer_expression(value)
            }
            // The key names a parameter, not a variable.
            NodeKind::KeywordItem { value, .. } => self.infer_expression(value),
            NodeKind::Binary { lhs, op, rhs } => self.type_from_binary(node, lhs, op, rhs),
            NodeKind::Unary { op, expr } => {
                self.infer_expression(expr);
                match op {
                    UnaryOperator::Negate => TypeSet::single(Type::Int),
                    UnaryOperator::Not | UnaryOperator::Exclamation => TypeSet::single(Type::Bool),
                }
            }
            NodeKind::Conditional {
                condition,
                if_true,
                if_false,
            } => {
                let condition_types = self.infer_expression(condition);
                self.check_condition(condition, &condition_types);
                let when_true = self.infer_expression(if_true);
                let when_false = self.infer_expression(if_false);
                when_true.union(&when_false)
            }
            NodeKind::Subscript { outer, inner } => self.type_from_subscript(node, outer, inner),
            NodeKind::FunctionCall { id, args, .. } => self.type_from_function_call(node, id, args),
            NodeKind::SubdirCall { id, args, .. } | NodeKind::MultiSubdirCall { id, args, .. } => {
                let types = self.type_from_function_call(node, id, args);
                self.enter_subdirs(node);
                types
            }
            NodeKind::MethodCall { obj, id, args, .. } => {
                self.type_from_method_call(node, obj, id, args)
            }
            NodeKind::ArgumentList { args } => {
                for arg in args {
                    self.infer_expression(arg);
                }
                TypeSet::empty()
            }
            NodeKind::BuildDefinition { .. }
            | NodeKind::Assignment { .. }
            | NodeKind::Iteration { .. }
            | NodeKind::Selection { .. }
            | NodeKind::Break
            | NodeKind::Continue => {
                self.check_statement(node);
                return self.ast.types(node).clone();
            }
        };
        self.ast.set_types(node, types.clone());
        types
    }

    fn type_from_identifier(&mut self, node: NodeId, name: &str) -> TypeSet {
        self.current_file().identifiers.push(node);
        match self.scope.get(name) {
            Some(types) => types.clone(),
            None => {
                if self.config.report_unresolved {
                    let location = self.ast.location(node);
                    self.report_error(format!("Unknown identifier `{name}`"), location);
                }
                TypeSet::empty()
            }
        }
    }

    fn type_from_dictionary(&mut self, entries: &[NodeId]) -> TypeSet {
        let mut values = TypeSet::empty();
        let mut seen: HashSet<String> = HashSet::new();
        for entry in entries {
            values = values.union(&self.infer_expression(*entry));
            let NodeKind::KeyValueItem { key, .. } = self.ast.kind(*entry) else {
                continue;
            };
            let key = *key;
            if let Some(text) = self.ast.string_value(key).map(str::to_string) {
                if !seen.insert(text.clone()) {
                    let location = self.ast.location(key);
                    self.report_warning(format!("Duplicate key \"{text}\""), location);
                }
            }
        }
        TypeSet::single(Type::Dict(values))
    }

    fn type_from_binary(
        &mut self,
        node: NodeId,
        lhs: NodeId,
        op: BinaryOperator,
        rhs: NodeId,
    ) -> TypeSet {
        let left = self.infer_expression(lhs);
        let right = self.infer_expression(rhs);
        let outcome = operators::binary(op, &left, &right);
        if outcome.all_failed && !is_special(&left) && !is_special(&right) {
            let location = self.ast.location(node);
            self.report_error(
                format!(
                    "Unable to apply operator {} to types {} and {}",
                    op.symbol(),
                    left,
                    right
                ),
                location,
            );
        }
        outcome.types
    }

    fn type_from_subscript(&mut self, node: NodeId, outer: NodeId, inner: NodeId) -> TypeSet {
        let container = self.infer_expression(outer);
        self.infer_expression(inner);
        self.current_file().subscripts.push(node);

        let mut result = Vec::new();
        for ty in &container {
            match ty {
                Type::List(elements) | Type::Dict(elements) => {
                    result.extend(elements.iter().cloned())
                }
                Type::Str => result.push(Type::Str),
                Type::Object(ObjectKind::CustomTgt) => {
                    result.push(Type::Object(ObjectKind::CustomIdx))
                }
                Type::Any => result.push(Type::Any),
                _ => {}
            }
        }
        TypeSet::new(result)
    }

    /// Analyzes the subtrees attached to an inclusion node. A single subtree
    /// continues in the current scope, so its assignments replace outer
    /// bindings. Several candidate subtrees each start from a copy of the
    /// current scope and their results are unioned.
    fn enter_subdirs(&mut self, node: NodeId) {
        let Some(current) = self.files.last().copied() else {
            return;
        };
        self.current_file().inclusions.push(node);

        let subtrees = current.subtrees_of(&*self.ast, node);
        if subtrees.is_empty() {
            if let NodeKind::SubdirCall { subdir, .. } = self.ast.kind(node) {
                let message = format!("Unable to find subdir {subdir}");
                let location = self.ast.location(node);
                self.report_error(message, location);
            }
            return;
        }

        if let [subtree] = subtrees[..] {
            self.scope = self.scope.child();
            self.check_file(subtree);
            return;
        }

        let before = self.scope.clone();
        let mut merged: Option<Scope> = None;
        for subtree in subtrees {
            self.scope = before.child();
            self.check_file(subtree);
            match merged.as_mut() {
                Some(scope) => scope.merge(&self.scope),
                None => merged = Some(self.scope.clone()),
            }
        }
        self.scope = merged.unwrap_or(before);
    }
}

/// `any` or `disabler` operands never trigger operator errors.
fn is_special(types: &TypeSet) -> bool {
    types
        .iter()
        .any(|ty| matches!(ty, Type::Any | Type::Disabler))
}

fn is_snake_case(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_shouting_snake_case(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
