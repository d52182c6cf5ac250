mod analyzer;
mod ast;
mod catalog;
mod config;
mod diagnostics;
mod error;
mod eval;
mod lexer;
mod metadata;
mod options;
mod parser;
mod scope;
mod source;
mod tree;
mod types;

pub use crate::analyzer::TypeAnalyzer;
pub use crate::ast::{
    AssignmentOperator, Ast, BinaryOperator, Location, Node, NodeId, NodeKind, UnaryOperator,
};
pub use crate::catalog::{
    catalog, get_method, lookup_function, lookup_method, Argument, Callable, Callee, Catalog,
    Function, Method,
};
pub use crate::config::AnalysisOptions;
pub use crate::diagnostics::{Diagnostic, DiagnosticLevel, Diagnostics};
pub use crate::error::LoadError;
pub use crate::eval::{enclosing_statement, guess_values, AbstractValue, PartialEvaluator};
pub use crate::lexer::{Keyword, Lexer, Token, TokenKind};
pub use crate::metadata::{FileMetadata, Metadata};
pub use crate::options::{extract_options, MesonOption, OptionKind, OptionState};
pub use crate::parser::{BuildFileParser, MesonParser, Parser};
pub use crate::scope::Scope;
pub use crate::source::{SourceFile, SourceId};
pub use crate::tree::{MesonTree, Project, BUILD_FILE, OPTION_FILES};
pub use crate::types::{dedup, ObjectKind, Type, TypeSet};
