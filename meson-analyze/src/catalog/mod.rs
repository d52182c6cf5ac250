//! Builtin functions and object methods of the build language.
//!
//! Signatures live in `static` tables and are indexed once into a
//! [`Catalog`] the first time it is requested. Nothing is mutated afterward.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::types::{ObjectKind, Type, TypeSet};

mod functions;
mod modules;
mod objects;

/// Type as written in a signature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Any,
    Bool,
    Int,
    Str,
    Void,
    Disabler,
    List(&'static [Ty]),
    Dict(&'static [Ty]),
    Object(ObjectKind),
}

impl Ty {
    pub fn to_type(self) -> Type {
        match self {
            Ty::Any => Type::Any,
            Ty::Bool => Type::Bool,
            Ty::Int => Type::Int,
            Ty::Str => Type::Str,
            Ty::Void => Type::Void,
            Ty::Disabler => Type::Disabler,
            Ty::List(elements) => Type::List(to_type_set(elements)),
            Ty::Dict(values) => Type::Dict(to_type_set(values)),
            Ty::Object(kind) => Type::Object(kind),
        }
    }
}

pub fn to_type_set(types: &[Ty]) -> TypeSet {
    types.iter().map(|ty| ty.to_type()).collect()
}

pub(crate) const ANY: Ty = Ty::Any;
pub(crate) const BOOL: Ty = Ty::Bool;
pub(crate) const INT: Ty = Ty::Int;
pub(crate) const STR: Ty = Ty::Str;
pub(crate) const VOID: Ty = Ty::Void;

pub(crate) const fn obj(kind: ObjectKind) -> Ty {
    Ty::Object(kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    Positional {
        name: &'static str,
        types: &'static [Ty],
        optional: bool,
        varargs: bool,
    },
    Kwarg {
        name: &'static str,
        types: &'static [Ty],
        optional: bool,
    },
}

impl Argument {
    pub fn name(&self) -> &'static str {
        match self {
            Argument::Positional { name, .. } | Argument::Kwarg { name, .. } => name,
        }
    }

    pub fn types(&self) -> TypeSet {
        match self {
            Argument::Positional { types, .. } | Argument::Kwarg { types, .. } => {
                to_type_set(types)
            }
        }
    }
}

pub(crate) const fn pos(name: &'static str, types: &'static [Ty]) -> Argument {
    Argument::Positional {
        name,
        types,
        optional: false,
        varargs: false,
    }
}

pub(crate) const fn opt(name: &'static str, types: &'static [Ty]) -> Argument {
    Argument::Positional {
        name,
        types,
        optional: true,
        varargs: false,
    }
}

pub(crate) const fn varargs(name: &'static str, types: &'static [Ty]) -> Argument {
    Argument::Positional {
        name,
        types,
        optional: true,
        varargs: true,
    }
}

pub(crate) const fn kw(name: &'static str, types: &'static [Ty]) -> Argument {
    Argument::Kwarg {
        name,
        types,
        optional: true,
    }
}

pub(crate) const fn required(name: &'static str, types: &'static [Ty]) -> Argument {
    Argument::Kwarg {
        name,
        types,
        optional: false,
    }
}

/// Shared behavior of functions and methods.
pub trait Callable {
    fn name(&self) -> &'static str;
    fn args(&self) -> &'static [Argument];
    fn returns(&self) -> &'static [Ty];

    /// Keyword arguments shared with other callables (e.g. every build
    /// target accepts the same set).
    fn shared_kwargs(&self) -> &'static [Argument] {
        &[]
    }

    /// Whether the argument list is known well enough to check calls.
    fn checked(&self) -> bool {
        true
    }

    fn return_types(&self) -> TypeSet {
        to_type_set(self.returns())
    }

    fn positionals(&self) -> Vec<&'static Argument> {
        self.args()
            .iter()
            .filter(|arg| matches!(arg, Argument::Positional { .. }))
            .collect()
    }

    fn min_positional(&self) -> usize {
        self.args()
            .iter()
            .filter(|arg| matches!(arg, Argument::Positional { optional: false, .. }))
            .count()
    }

    /// `None` when a vararg makes the count unbounded.
    fn max_positional(&self) -> Option<usize> {
        let mut count = 0;
        for arg in self.args() {
            match arg {
                Argument::Positional { varargs: true, .. } => return None,
                Argument::Positional { .. } => count += 1,
                Argument::Kwarg { .. } => {}
            }
        }
        Some(count)
    }

    fn has_kwarg(&self, name: &str) -> bool {
        self.args()
            .iter()
            .chain(self.shared_kwargs())
            .any(|arg| matches!(arg, Argument::Kwarg { name: kwarg, .. } if *kwarg == name))
    }

    fn kwarg(&self, name: &str) -> Option<&'static Argument> {
        self.args()
            .iter()
            .chain(self.shared_kwargs())
            .find(|arg| matches!(arg, Argument::Kwarg { name: kwarg, .. } if *kwarg == name))
    }

    fn required_kwargs(&self) -> Vec<&'static str> {
        self.args()
            .iter()
            .chain(self.shared_kwargs())
            .filter_map(|arg| match arg {
                Argument::Kwarg {
                    name,
                    optional: false,
                    ..
                } => Some(*name),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Function {
    pub name: &'static str,
    pub args: &'static [Argument],
    pub shared_kwargs: &'static [Argument],
    pub returns: &'static [Ty],
    pub checked: bool,
}

impl Callable for Function {
    fn name(&self) -> &'static str {
        self.name
    }

    fn args(&self) -> &'static [Argument] {
        self.args
    }

    fn returns(&self) -> &'static [Ty] {
        self.returns
    }

    fn shared_kwargs(&self) -> &'static [Argument] {
        self.shared_kwargs
    }

    fn checked(&self) -> bool {
        self.checked
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Method {
    pub name: &'static str,
    /// Name of the type whose vtable holds this method.
    pub owner: &'static str,
    pub args: &'static [Argument],
    pub shared_kwargs: &'static [Argument],
    pub returns: &'static [Ty],
    pub checked: bool,
}

impl Method {
    /// Human readable `owner.name`.
    pub fn id(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }

    fn owner_has_parent(&self) -> bool {
        ObjectKind::from_name(self.owner)
            .and_then(ObjectKind::parent)
            .is_some()
    }
}

impl Callable for Method {
    fn name(&self) -> &'static str {
        self.name
    }

    fn args(&self) -> &'static [Argument] {
        self.args
    }

    fn returns(&self) -> &'static [Ty] {
        self.returns
    }

    fn shared_kwargs(&self) -> &'static [Argument] {
        self.shared_kwargs
    }

    fn checked(&self) -> bool {
        self.checked
    }
}

/// The resolved target of a call node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee {
    Function(&'static Function),
    Method(&'static Method),
}

impl Callee {
    pub fn callable(self) -> &'static dyn Callable {
        match self {
            Callee::Function(function) => function,
            Callee::Method(method) => method,
        }
    }

    /// `name` for functions, `owner.name` for methods.
    pub fn display_name(self) -> String {
        match self {
            Callee::Function(function) => function.name.to_string(),
            Callee::Method(method) => method.id(),
        }
    }
}

pub(crate) const fn function(
    name: &'static str,
    args: &'static [Argument],
    returns: &'static [Ty],
) -> Function {
    Function {
        name,
        args,
        shared_kwargs: &[],
        returns,
        checked: true,
    }
}

pub(crate) const fn target_function(
    name: &'static str,
    args: &'static [Argument],
    returns: &'static [Ty],
) -> Function {
    Function {
        name,
        args,
        shared_kwargs: functions::BUILD_TARGET_KWARGS,
        returns,
        checked: true,
    }
}

pub(crate) const fn method(
    owner: &'static str,
    name: &'static str,
    args: &'static [Argument],
    returns: &'static [Ty],
) -> Method {
    Method {
        name,
        owner,
        args,
        shared_kwargs: &[],
        returns,
        checked: true,
    }
}

/// A method whose keyword arguments are too numerous or too version
/// dependent to check calls against.
pub(crate) const fn loose_method(
    owner: &'static str,
    name: &'static str,
    returns: &'static [Ty],
) -> Method {
    Method {
        checked: false,
        ..method(owner, name, &[], returns)
    }
}

/// Indexed view over the static signature tables.
pub struct Catalog {
    functions: HashMap<&'static str, &'static Function>,
    vtables: HashMap<&'static str, Vec<&'static Method>>,
    /// Every method, root owners before owners with a parent.
    search_order: Vec<&'static Method>,
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(Catalog::build)
}

impl Catalog {
    fn build() -> Self {
        let functions = functions::FUNCTIONS
            .iter()
            .map(|function| (function.name, function))
            .collect();

        let all_methods: Vec<&'static Method> = objects::VTABLES
            .iter()
            .chain(modules::VTABLES)
            .flat_map(|table| table.iter())
            .collect();

        let mut vtables: HashMap<&'static str, Vec<&'static Method>> = HashMap::new();
        for method in &all_methods {
            vtables.entry(method.owner).or_default().push(method);
        }

        let (roots, children): (Vec<_>, Vec<_>) = all_methods
            .iter()
            .copied()
            .partition(|method| !method.owner_has_parent());
        let search_order = roots.into_iter().chain(children).collect();

        Self {
            functions,
            vtables,
            search_order,
        }
    }

    pub fn function(&self, name: &str) -> Option<&'static Function> {
        self.functions.get(name).copied()
    }

    pub fn functions(&self) -> impl Iterator<Item = &'static Function> + '_ {
        self.functions.values().copied()
    }

    /// Methods declared directly on the type named `owner`.
    pub fn methods_of(&self, owner: &str) -> &[&'static Method] {
        self.vtables.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Any method named `name`, preferring owners without a parent object.
    pub fn any_method(&self, name: &str) -> Option<&'static Method> {
        self.search_order
            .iter()
            .copied()
            .find(|method| method.name == name)
    }

    /// Method `name` as seen on a value of type `ty`, following the
    /// object's parent chain.
    pub fn method_of(&self, ty: &Type, name: &str) -> Option<&'static Method> {
        let find_in = |owner: &str| {
            self.methods_of(owner)
                .iter()
                .copied()
                .find(|method| method.name == name)
        };
        match ty {
            Type::Object(kind) => kind.lineage().find_map(|kind| find_in(kind.name())),
            Type::Any | Type::Void | Type::Disabler => None,
            other => find_in(other.name()),
        }
    }
}

pub fn lookup_function(name: &str) -> Option<&'static Function> {
    catalog().function(name)
}

pub fn lookup_method(name: &str) -> Option<&'static Method> {
    catalog().any_method(name)
}

pub fn get_method(ty: &Type, name: &str) -> Option<&'static Method> {
    catalog().method_of(ty, name)
}
