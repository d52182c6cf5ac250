use std::collections::BTreeMap;

use crate::types::{ObjectKind, Type, TypeSet};

/// Variable bindings visible at one point of the analysis.
///
/// A nested block gets a full copy of its parent's bindings; on exit the
/// copy is merged back by unioning each variable's types. Exclusive
/// branches are therefore not tracked: a variable that is a `str` in one
/// branch and a `list` in another ends up `str|list` afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    variables: BTreeMap<String, TypeSet>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            variables: BTreeMap::new(),
        }
    }

    /// Scope of a build file's top level, holding the builtin objects.
    pub fn root() -> Self {
        let mut scope = Self::new();
        for (name, kind) in [
            ("meson", ObjectKind::Meson),
            ("build_machine", ObjectKind::BuildMachine),
            ("host_machine", ObjectKind::HostMachine),
            ("target_machine", ObjectKind::TargetMachine),
        ] {
            scope.set(name, TypeSet::single(Type::Object(kind)));
        }
        scope
    }

    pub fn child(&self) -> Self {
        self.clone()
    }

    pub fn get(&self, name: &str) -> Option<&TypeSet> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn set<S: Into<String>>(&mut self, name: S, types: TypeSet) {
        self.variables.insert(name.into(), types);
    }

    /// Unions every binding of `other` into this scope.
    pub fn merge(&mut self, other: &Scope) {
        for (name, types) in &other.variables {
            let merged = match self.variables.get(name) {
                Some(existing) => existing.union(types),
                None => types.clone(),
            };
            self.variables.insert(name.clone(), merged);
        }
    }

    /// Bindings ordered by name.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &TypeSet)> {
        self.variables
            .iter()
            .map(|(name, types)| (name.as_str(), types))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
