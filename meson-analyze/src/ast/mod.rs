use std::ops::Index;

use index_vec::IndexVec;
use serde::Serialize;

use crate::catalog::{Function, Method};
use crate::types::TypeSet;

index_vec::define_index_type! {
    /// Handle of a node in an [`Ast`] arena.
    pub struct NodeId = usize;
    MAX_INDEX = usize::MAX;
}

/// Source range of a node. Lines and columns are 0-based, the end column
/// is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Location {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Location {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    pub fn union(a: &Self, b: &Self) -> Self {
        let (start_line, start_column) = if (a.start_line, a.start_column)
            <= (b.start_line, b.start_column)
        {
            (a.start_line, a.start_column)
        } else {
            (b.start_line, b.start_column)
        };
        let (end_line, end_column) =
            if (a.end_line, a.end_column) >= (b.end_line, b.end_column) {
                (a.end_line, a.end_column)
            } else {
                (b.end_line, b.end_column)
            };
        Self::new(start_line, start_column, end_line, end_column)
    }

    /// Point containment. On a boundary line the column must lie within
    /// the node's column range on that line; both boundaries are inclusive.
    pub fn contains(&self, line: usize, column: usize) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if self.start_line == self.end_line {
            return self.start_column <= column && column <= self.end_column;
        }
        if line == self.start_line {
            return column >= self.start_column;
        }
        if line == self.end_line {
            return column <= self.end_column;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    Equals,
    PlusEquals,
    MinusEquals,
    MulEquals,
    DivEquals,
    ModEquals,
}

impl AssignmentOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignmentOperator::Equals => "=",
            AssignmentOperator::PlusEquals => "+=",
            AssignmentOperator::MinusEquals => "-=",
            AssignmentOperator::MulEquals => "*=",
            AssignmentOperator::DivEquals => "/=",
            AssignmentOperator::ModEquals => "%=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    In,
    NotIn,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::In => "in",
            BinaryOperator::NotIn => "not in",
        }
    }

    /// Comparison and logical operators, whose result is always a bool.
    pub fn is_boolean(self) -> bool {
        !matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Sub
                | BinaryOperator::Mul
                | BinaryOperator::Div
                | BinaryOperator::Mod
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Exclamation,
    Negate,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    BuildDefinition {
        statements: Vec<NodeId>,
    },
    Assignment {
        lhs: NodeId,
        op: AssignmentOperator,
        rhs: NodeId,
    },
    FunctionCall {
        id: NodeId,
        args: Option<NodeId>,
        function: Option<&'static Function>,
    },
    MethodCall {
        obj: NodeId,
        id: NodeId,
        args: Option<NodeId>,
        method: Option<&'static Method>,
    },
    ArgumentList {
        args: Vec<NodeId>,
    },
    KeywordItem {
        key: NodeId,
        value: NodeId,
    },
    Binary {
        lhs: NodeId,
        op: BinaryOperator,
        rhs: NodeId,
    },
    Unary {
        op: UnaryOperator,
        expr: NodeId,
    },
    Conditional {
        condition: NodeId,
        if_true: NodeId,
        if_false: NodeId,
    },
    Subscript {
        outer: NodeId,
        inner: NodeId,
    },
    ArrayLiteral {
        elements: Vec<NodeId>,
    },
    DictionaryLiteral {
        entries: Vec<NodeId>,
    },
    KeyValueItem {
        key: NodeId,
        value: NodeId,
    },
    StringLiteral {
        value: String,
        is_format: bool,
    },
    IntegerLiteral {
        value: i64,
    },
    BooleanLiteral {
        value: bool,
    },
    Identifier {
        name: String,
    },
    Iteration {
        ids: Vec<NodeId>,
        expression: NodeId,
        block: Vec<NodeId>,
    },
    /// `if`/`elif`/`else`. `blocks` has one entry per condition plus one
    /// more when an `else` branch is present.
    Selection {
        conditions: Vec<NodeId>,
        blocks: Vec<Vec<NodeId>>,
    },
    Break,
    Continue,
    /// A `subdir()` call whose literal target exists on disk.
    SubdirCall {
        id: NodeId,
        args: Option<NodeId>,
        function: Option<&'static Function>,
        subdir: String,
    },
    /// A `subdir()` call with a computed target.
    MultiSubdirCall {
        id: NodeId,
        args: Option<NodeId>,
        function: Option<&'static Function>,
        subdirs: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub location: Location,
    pub parent: Option<NodeId>,
    pub types: TypeSet,
}

/// Arena holding the nodes of every file of a project.
#[derive(Debug, Default, Clone)]
pub struct Ast {
    nodes: IndexVec<NodeId, Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self {
            nodes: IndexVec::new(),
        }
    }

    pub fn alloc(&mut self, kind: NodeKind, location: Location) -> NodeId {
        self.nodes.push(Node {
            kind,
            location,
            parent: None,
            types: TypeSet::empty(),
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id].kind
    }

    pub fn location(&self, id: NodeId) -> Location {
        self.nodes[id].location
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id].parent = parent;
    }

    pub fn types(&self, id: NodeId) -> &TypeSet {
        &self.nodes[id].types
    }

    pub fn set_types(&mut self, id: NodeId, types: TypeSet) {
        self.nodes[id].types = types;
    }

    /// Rewrites a node in place. The handle, location and parent stay.
    pub fn replace_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id].kind = kind;
    }

    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn string_value(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::StringLiteral { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Positional arguments of an argument list node, in order.
    pub fn positional_args(&self, args: Option<NodeId>) -> Vec<NodeId> {
        self.arguments(args)
            .iter()
            .copied()
            .filter(|arg| !matches!(self.kind(*arg), NodeKind::KeywordItem { .. }))
            .collect()
    }

    /// Value of the keyword argument `name`, if present.
    pub fn kwarg(&self, args: Option<NodeId>, name: &str) -> Option<NodeId> {
        self.arguments(args).iter().find_map(|arg| match self.kind(*arg) {
            NodeKind::KeywordItem { key, value } if self.identifier_name(*key) == Some(name) => {
                Some(*value)
            }
            _ => None,
        })
    }

    pub fn arguments(&self, args: Option<NodeId>) -> &[NodeId] {
        match args.map(|id| self.kind(id)) {
            Some(NodeKind::ArgumentList { args }) => args,
            _ => &[],
        }
    }

    /// Direct syntactic children, in source order. Subtrees attached to an
    /// inclusion node are not children; they only point back at it.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.nodes[id].kind {
            NodeKind::BuildDefinition { statements } => statements.clone(),
            NodeKind::Assignment { lhs, rhs, .. } | NodeKind::Binary { lhs, rhs, .. } => {
                vec![*lhs, *rhs]
            }
            NodeKind::FunctionCall { id, args, .. }
            | NodeKind::SubdirCall { id, args, .. }
            | NodeKind::MultiSubdirCall { id, args, .. } => {
                std::iter::once(*id).chain(*args).collect()
            }
            NodeKind::MethodCall { obj, id, args, .. } => {
                [*obj, *id].into_iter().chain(*args).collect()
            }
            NodeKind::ArgumentList { args } => args.clone(),
            NodeKind::KeywordItem { key, value } | NodeKind::KeyValueItem { key, value } => {
                vec![*key, *value]
            }
            NodeKind::Unary { expr, .. } => vec![*expr],
            NodeKind::Conditional {
                condition,
                if_true,
                if_false,
            } => vec![*condition, *if_true, *if_false],
            NodeKind::Subscript { outer, inner } => vec![*outer, *inner],
            NodeKind::ArrayLiteral { elements } => elements.clone(),
            NodeKind::DictionaryLiteral { entries } => entries.clone(),
            NodeKind::Iteration {
                ids,
                expression,
                block,
            } => ids
                .iter()
                .copied()
                .chain(std::iter::once(*expression))
                .chain(block.iter().copied())
                .collect(),
            NodeKind::Selection { conditions, blocks } => {
                let mut children = Vec::new();
                for (index, block) in blocks.iter().enumerate() {
                    if let Some(condition) = conditions.get(index) {
                        children.push(*condition);
                    }
                    children.extend(block.iter().copied());
                }
                children
            }
            NodeKind::StringLiteral { .. }
            | NodeKind::IntegerLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::Break
            | NodeKind::Continue => Vec::new(),
        }
    }

    /// Links every node below `root` to its syntactic parent.
    pub fn set_parents(&mut self, root: NodeId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            for child in self.children(id) {
                self.nodes[child].parent = Some(id);
                pending.push(child);
            }
        }
    }

    /// Statement lists held directly by `id`: the file body, a loop body or
    /// each branch of a selection.
    pub fn statement_lists(&self, id: NodeId) -> Vec<&[NodeId]> {
        match &self.nodes[id].kind {
            NodeKind::BuildDefinition { statements } => vec![statements.as_slice()],
            NodeKind::Iteration { block, .. } => vec![block.as_slice()],
            NodeKind::Selection { blocks, .. } => blocks.iter().map(Vec::as_slice).collect(),
            _ => Vec::new(),
        }
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_containment_includes_end_column() {
        let location = Location::new(4, 0, 4, 10);
        assert!(location.contains(4, 5));
        assert!(location.contains(4, 10));
        assert!(!location.contains(4, 11));
        assert!(!location.contains(3, 5));
    }

    #[test]
    fn multi_line_containment_checks_boundary_columns() {
        let location = Location::new(2, 4, 5, 1);
        assert!(!location.contains(2, 3));
        assert!(location.contains(3, 80));
        assert!(location.contains(5, 1));
        assert!(!location.contains(5, 2));
    }

    #[test]
    fn parents_follow_syntax() {
        let mut ast = Ast::new();
        let lhs = ast.alloc(
            NodeKind::Identifier {
                name: "x".to_string(),
            },
            Location::new(0, 0, 0, 1),
        );
        let rhs = ast.alloc(NodeKind::IntegerLiteral { value: 1 }, Location::new(0, 4, 0, 5));
        let assignment = ast.alloc(
            NodeKind::Assignment {
                lhs,
                op: AssignmentOperator::Equals,
                rhs,
            },
            Location::new(0, 0, 0, 5),
        );
        let root = ast.alloc(
            NodeKind::BuildDefinition {
                statements: vec![assignment],
            },
            Location::new(0, 0, 0, 5),
        );
        ast.set_parents(root);
        assert_eq!(ast.parent(root), None);
        assert_eq!(ast.parent(assignment), Some(root));
        assert_eq!(ast.parent(lhs), Some(assignment));
        assert_eq!(ast.parent(rhs), Some(assignment));
    }
}
