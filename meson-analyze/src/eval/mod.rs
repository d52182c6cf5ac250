//! Static enumeration of the string values an expression may take.
//!
//! Nothing is executed. An identifier is resolved by walking backward
//! through the statement list that holds the reference: a plain `=`
//! assignment ends the walk, augmenting assignments add their right-hand
//! side and keep going. When the list is exhausted the walk continues in
//! the enclosing construct. Anything the rules do not cover yields no
//! values, which callers treat like "unknown".

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::ast::{AssignmentOperator, Ast, BinaryOperator, NodeId, NodeKind};
use crate::options::OptionState;

const MAX_DEPTH: usize = 256;
/// Upper bound on the candidates kept for one expression and on the
/// elements of a single list or dictionary.
const MAX_VALUES: usize = 1024;
/// Longer strings cannot name a path and are dropped.
const MAX_STRING_LEN: usize = 4096;

/// A value the evaluator could pin down.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbstractValue {
    Str(String),
    Int(i64),
    List(Vec<AbstractValue>),
    /// Entries in source order. A key whose value is ambiguous appears
    /// once per candidate.
    Dict(Vec<(String, AbstractValue)>),
}

impl AbstractValue {
    fn as_str(&self) -> Option<&str> {
        match self {
            AbstractValue::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Strings held by the value itself or, for a list, by its elements.
    fn strings(&self) -> Vec<&str> {
        match self {
            AbstractValue::Str(value) => vec![value],
            AbstractValue::List(elements) => elements.iter().filter_map(Self::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

pub struct PartialEvaluator<'a> {
    ast: &'a Ast,
    options: &'a OptionState,
    depth: usize,
    /// Resolutions of `(statement, name)` already computed by this evaluator.
    resolved: HashMap<(NodeId, String), Vec<AbstractValue>>,
}

impl<'a> PartialEvaluator<'a> {
    pub fn new(ast: &'a Ast, options: &'a OptionState) -> Self {
        Self {
            ast,
            options,
            depth: 0,
            resolved: HashMap::new(),
        }
    }

    /// Strings `expr` may evaluate to when it appears in `statement`.
    pub fn calculate(&mut self, statement: NodeId, expr: NodeId) -> Vec<String> {
        self.abstract_eval(statement, expr)
            .iter()
            .flat_map(|value| value.strings().into_iter().map(str::to_string))
            .collect()
    }

    pub fn abstract_eval(&mut self, statement: NodeId, expr: NodeId) -> Vec<AbstractValue> {
        if self.depth >= MAX_DEPTH {
            return Vec::new();
        }
        self.depth += 1;
        let values = settle(self.eval_node(statement, expr));
        self.depth -= 1;
        values
    }

    fn eval_node(&mut self, statement: NodeId, expr: NodeId) -> Vec<AbstractValue> {
        let ast = self.ast;
        match ast.kind(expr) {
            NodeKind::StringLiteral { value, .. } => vec![AbstractValue::Str(value.clone())],
            NodeKind::IntegerLiteral { value } => vec![AbstractValue::Int(*value)],
            NodeKind::ArrayLiteral { elements } => {
                let mut items = Vec::new();
                for element in elements {
                    items.extend(self.abstract_eval(statement, *element));
                }
                vec![AbstractValue::List(items)]
            }
            NodeKind::DictionaryLiteral { entries } => {
                let mut items = Vec::new();
                for entry in entries {
                    let NodeKind::KeyValueItem { key, value } = ast.kind(*entry) else {
                        continue;
                    };
                    let Some(key) = ast.string_value(*key) else {
                        continue;
                    };
                    for value in self.abstract_eval(statement, *value) {
                        items.push((key.to_string(), value));
                    }
                }
                vec![AbstractValue::Dict(items)]
            }
            NodeKind::Identifier { name } => self.resolve(statement, name),
            NodeKind::Binary { lhs, op, rhs } => {
                let separator = match op {
                    BinaryOperator::Add => "",
                    BinaryOperator::Div => "/",
                    _ => return Vec::new(),
                };
                let lhs = self.abstract_eval(statement, *lhs);
                let rhs = self.abstract_eval(statement, *rhs);
                let mut values = Vec::new();
                'outer: for left in &lhs {
                    for right in &rhs {
                        if values.len() >= MAX_VALUES {
                            break 'outer;
                        }
                        combine(left, right, separator, &mut values);
                    }
                }
                values
            }
            NodeKind::Conditional {
                if_true, if_false, ..
            } => {
                let mut values = self.abstract_eval(statement, *if_true);
                values.extend(self.abstract_eval(statement, *if_false));
                values
            }
            NodeKind::Subscript { outer, inner } => {
                let outer = self.abstract_eval(statement, *outer);
                let inner = self.abstract_eval(statement, *inner);
                let mut values = Vec::new();
                for container in &outer {
                    if inner.is_empty() {
                        if let AbstractValue::Dict(entries) = container {
                            values.extend(entries.iter().map(|(_, value)| value.clone()));
                        }
                    }
                    for index in &inner {
                        subscript(container, index, &mut values);
                    }
                }
                values
            }
            NodeKind::MethodCall { obj, id, args, .. } => {
                let Some(name) = ast.identifier_name(*id) else {
                    return Vec::new();
                };
                self.eval_method(statement, *obj, name, *args)
            }
            NodeKind::FunctionCall { id, args, .. } => match ast.identifier_name(*id) {
                Some("join_paths") => self.eval_join_paths(statement, *args),
                Some("get_option") => self.eval_get_option(*args),
                _ => Vec::new(),
            },
            NodeKind::Assignment { rhs, .. } => self.abstract_eval(statement, *rhs),
            _ => Vec::new(),
        }
    }

    fn eval_method(
        &mut self,
        statement: NodeId,
        obj: NodeId,
        name: &str,
        args: Option<NodeId>,
    ) -> Vec<AbstractValue> {
        let ast = self.ast;
        let positional = ast.positional_args(args);
        let receivers = self.abstract_eval(statement, obj);
        match name {
            "format" => {
                let Some(first) = positional.first() else {
                    return Vec::new();
                };
                let replacements = self.calculate(statement, *first);
                receivers
                    .iter()
                    .filter_map(AbstractValue::as_str)
                    .flat_map(|receiver| {
                        replacements.iter().map(move |replacement| {
                            AbstractValue::Str(receiver.replace("@0@", replacement))
                        })
                    })
                    .take(MAX_VALUES)
                    .collect()
            }
            "get" => {
                let Some(first) = positional.first() else {
                    return Vec::new();
                };
                let indices = self.abstract_eval(statement, *first);
                let mut values = Vec::new();
                for receiver in &receivers {
                    for index in &indices {
                        subscript(receiver, index, &mut values);
                    }
                }
                values
            }
            "split" => {
                let separator = match positional.first() {
                    Some(first) => match ast.string_value(*first) {
                        Some(separator) => Some(separator.to_string()),
                        None => return Vec::new(),
                    },
                    None => None,
                };
                receivers
                    .iter()
                    .filter_map(AbstractValue::as_str)
                    .map(|text| {
                        let parts: Vec<AbstractValue> = match &separator {
                            Some(separator) => text
                                .split(separator.as_str())
                                .map(|part| AbstractValue::Str(part.to_string()))
                                .collect(),
                            None => text
                                .split_whitespace()
                                .map(|part| AbstractValue::Str(part.to_string()))
                                .collect(),
                        };
                        AbstractValue::List(parts)
                    })
                    .collect()
            }
            "keys" => receivers
                .iter()
                .flat_map(|receiver| match receiver {
                    AbstractValue::Dict(entries) => entries
                        .iter()
                        .map(|(key, _)| AbstractValue::Str(key.clone()))
                        .collect(),
                    _ => Vec::new(),
                })
                .collect(),
            "underscorify" | "to_lower" | "to_upper" | "strip" | "replace" => {
                let replacement = match (
                    positional.first().and_then(|arg| ast.string_value(*arg)),
                    positional.get(1).and_then(|arg| ast.string_value(*arg)),
                ) {
                    (Some(from), Some(to)) if positional.len() == 2 => Some((from, to)),
                    _ => None,
                };
                receivers
                    .iter()
                    .flat_map(AbstractValue::strings)
                    .map(|text| AbstractValue::Str(apply_string_method(text, name, replacement)))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn eval_join_paths(&mut self, statement: NodeId, args: Option<NodeId>) -> Vec<AbstractValue> {
        let mut combinations: Option<Vec<String>> = None;
        for arg in self.ast.positional_args(args) {
            let parts = self.calculate(statement, arg);
            combinations = Some(match combinations {
                None => parts,
                Some(prefixes) => prefixes
                    .iter()
                    .flat_map(|prefix| parts.iter().map(move |part| format!("{prefix}/{part}")))
                    .filter(|joined| joined.len() <= MAX_STRING_LEN)
                    .take(MAX_VALUES)
                    .collect(),
            });
        }
        combinations
            .unwrap_or_default()
            .into_iter()
            .map(AbstractValue::Str)
            .collect()
    }

    fn eval_get_option(&self, args: Option<NodeId>) -> Vec<AbstractValue> {
        let Some(name) = self
            .ast
            .positional_args(args)
            .first()
            .and_then(|first| self.ast.string_value(*first))
        else {
            return Vec::new();
        };
        self.options
            .find_option(name)
            .map(|option| {
                option
                    .possible_values()
                    .iter()
                    .map(|value| AbstractValue::Str(value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Values `name` may hold right before `statement` runs.
    pub fn resolve(&mut self, statement: NodeId, name: &str) -> Vec<AbstractValue> {
        let key = (statement, name.to_string());
        if let Some(values) = self.resolved.get(&key) {
            return values.clone();
        }
        let values = settle(self.resolve_uncached(statement, name));
        self.resolved.insert(key, values.clone());
        values
    }

    fn resolve_uncached(&mut self, statement: NodeId, name: &str) -> Vec<AbstractValue> {
        let ast = self.ast;
        let Some(holder) = ast.parent(statement) else {
            return Vec::new();
        };
        match ast.kind(holder) {
            NodeKind::BuildDefinition { statements } => {
                let (done, mut values) = self.walk_back(statements, statement, name);
                if done {
                    return values;
                }
                // Continue in the including file, if any.
                let outer = ast
                    .parent(holder)
                    .and_then(|inclusion| enclosing_statement(ast, inclusion));
                if let Some(outer) = outer {
                    values.extend(self.resolve(outer, name));
                }
                values
            }
            NodeKind::Iteration {
                ids,
                expression,
                block,
            } => {
                let (done, accumulated) = self.walk_back(block, statement, name);
                if done {
                    return accumulated;
                }
                let Some(position) = ids
                    .iter()
                    .position(|id| ast.identifier_name(*id) == Some(name))
                else {
                    let mut values = self.resolve(holder, name);
                    values.extend(accumulated);
                    return values;
                };
                let mut iterated = self.abstract_eval(holder, *expression);
                iterated.extend(accumulated);
                if ids.len() == 1 {
                    return iterated
                        .into_iter()
                        .flat_map(|value| match value {
                            AbstractValue::List(elements) => elements,
                            other => vec![other],
                        })
                        .collect();
                }
                iterated
                    .into_iter()
                    .flat_map(|value| match value {
                        AbstractValue::Dict(entries) => entries
                            .into_iter()
                            .map(|(key, value)| {
                                if position == 0 {
                                    AbstractValue::Str(key)
                                } else {
                                    value
                                }
                            })
                            .collect(),
                        _ => Vec::new(),
                    })
                    .collect()
            }
            NodeKind::Selection { blocks, .. } => {
                let Some(index) = blocks.iter().position(|block| block.contains(&statement)) else {
                    return self.resolve(holder, name);
                };
                let (done, mut accumulated) = self.walk_back(&blocks[index], statement, name);
                if done {
                    return accumulated;
                }
                // Earlier branches are alternatives, none of them ends the walk.
                for earlier in blocks[..index].iter().rev() {
                    accumulated.extend(self.eval_block(earlier, name));
                }
                let mut values = self.resolve(holder, name);
                values.extend(accumulated);
                values
            }
            _ => Vec::new(),
        }
    }

    /// Walks the statements before `statement` in reverse. Returns whether a
    /// plain assignment ended the walk, and the values found so far.
    fn walk_back(
        &mut self,
        statements: &[NodeId],
        statement: NodeId,
        name: &str,
    ) -> (bool, Vec<AbstractValue>) {
        let Some(position) = statements.iter().position(|candidate| *candidate == statement) else {
            return (false, Vec::new());
        };
        let mut accumulated = Vec::new();
        for candidate in statements[..position].iter().rev() {
            match self.assignment_to(*candidate, name) {
                Some((AssignmentOperator::Equals, rhs)) => {
                    let mut values = self.abstract_eval(*candidate, rhs);
                    values.extend(accumulated);
                    trace!(name, count = values.len(), "resolved assignment");
                    return (true, values);
                }
                Some((_, rhs)) => {
                    let values = self.abstract_eval(*candidate, rhs);
                    accumulated.extend(values);
                }
                None => accumulated.extend(self.full_eval(*candidate, name)),
            }
        }
        (false, accumulated)
    }

    /// Every value assigned to `name` anywhere inside a nested block.
    fn full_eval(&mut self, statement: NodeId, name: &str) -> Vec<AbstractValue> {
        let ast = self.ast;
        let mut values = Vec::new();
        for list in ast.statement_lists(statement).into_iter().rev() {
            values.extend(self.eval_block(list, name));
        }
        values
    }

    /// Every value assigned to `name` in `block`, latest first.
    fn eval_block(&mut self, block: &[NodeId], name: &str) -> Vec<AbstractValue> {
        let mut values = Vec::new();
        for nested in block.iter().rev() {
            match self.assignment_to(*nested, name) {
                Some((_, rhs)) => values.extend(self.abstract_eval(*nested, rhs)),
                None => values.extend(self.full_eval(*nested, name)),
            }
        }
        values
    }

    fn assignment_to(&self, statement: NodeId, name: &str) -> Option<(AssignmentOperator, NodeId)> {
        match self.ast.kind(statement) {
            NodeKind::Assignment { lhs, op, rhs }
                if self.ast.identifier_name(*lhs) == Some(name) =>
            {
                Some((*op, *rhs))
            }
            _ => None,
        }
    }
}

fn combine(
    left: &AbstractValue,
    right: &AbstractValue,
    separator: &str,
    out: &mut Vec<AbstractValue>,
) {
    let mut push_joined = |left: &str, right: &str| {
        if left.len() + separator.len() + right.len() <= MAX_STRING_LEN {
            out.push(AbstractValue::Str(format!("{left}{separator}{right}")));
        }
    };
    match (left, right) {
        (AbstractValue::Str(left), AbstractValue::Str(right)) => push_joined(left, right),
        (AbstractValue::Str(left), AbstractValue::List(elements)) => {
            for element in elements.iter().flat_map(AbstractValue::strings) {
                push_joined(left, element);
            }
        }
        (AbstractValue::List(elements), AbstractValue::Str(right)) => {
            for element in elements.iter().flat_map(AbstractValue::strings) {
                push_joined(element, right);
            }
        }
        (AbstractValue::List(left), AbstractValue::List(right)) => {
            let elements = left.iter().chain(right).take(MAX_VALUES).cloned().collect();
            out.push(AbstractValue::List(elements));
        }
        (AbstractValue::Dict(left), AbstractValue::Dict(right)) => {
            let entries = left.iter().chain(right).take(MAX_VALUES).cloned().collect();
            out.push(AbstractValue::Dict(entries));
        }
        _ => {}
    }
}

/// Drops repeated candidates, keeping the first, and caps their number.
fn settle(values: Vec<AbstractValue>) -> Vec<AbstractValue> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .take(MAX_VALUES)
        .collect()
}

fn subscript(container: &AbstractValue, index: &AbstractValue, out: &mut Vec<AbstractValue>) {
    match (container, index) {
        (AbstractValue::List(elements), AbstractValue::Int(position)) => {
            if let Some(element) = usize::try_from(*position).ok().and_then(|at| elements.get(at)) {
                out.push(element.clone());
            }
        }
        (AbstractValue::Dict(entries), AbstractValue::Str(key)) => {
            out.extend(
                entries
                    .iter()
                    .filter(|(candidate, _)| candidate == key)
                    .map(|(_, value)| value.clone()),
            );
        }
        // A list of dictionaries indexed by key.
        (AbstractValue::List(elements), AbstractValue::Str(_)) => {
            for element in elements {
                if matches!(element, AbstractValue::Dict(_)) {
                    subscript(element, index, out);
                }
            }
        }
        _ => {}
    }
}

fn apply_string_method(text: &str, name: &str, replacement: Option<(&str, &str)>) -> String {
    match name {
        "underscorify" => text
            .chars()
            .map(|chr| if chr.is_ascii_alphanumeric() { chr } else { '_' })
            .collect(),
        "to_lower" => text.to_ascii_lowercase(),
        "to_upper" => text.to_ascii_uppercase(),
        "strip" => text.trim().to_string(),
        "replace" => match replacement {
            Some((from, to)) if !from.is_empty() => text.replace(from, to),
            _ => text.to_string(),
        },
        other => unreachable!("no string method named {other}"),
    }
}

/// The statement that holds `node`: the node itself or the closest ancestor
/// that sits directly in a file body, loop body or selection branch.
pub fn enclosing_statement(ast: &Ast, node: NodeId) -> Option<NodeId> {
    let mut current = node;
    loop {
        let parent = ast.parent(current)?;
        let held = ast
            .statement_lists(parent)
            .iter()
            .any(|list| list.contains(&current));
        if held {
            return Some(current);
        }
        current = parent;
    }
}

/// Every string `expr` may evaluate to, each listed once in order of
/// discovery.
pub fn guess_values(ast: &Ast, options: &OptionState, expr: NodeId) -> Vec<String> {
    let Some(statement) = enclosing_statement(ast, expr) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    PartialEvaluator::new(ast, options)
        .calculate(statement, expr)
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
