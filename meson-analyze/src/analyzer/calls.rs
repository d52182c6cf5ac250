use crate::ast::{NodeId, NodeKind};
use crate::catalog::{
    get_method, lookup_function, lookup_method, Argument, Callable, Callee, Function, Method,
};
use crate::eval::guess_values;
use crate::types::{ObjectKind, Type, TypeSet};

use super::operators;
use super::TypeAnalyzer;

/// Objects `build_target()` may produce when its kind is not known.
const BUILD_TARGET_KINDS: &[ObjectKind] = &[
    ObjectKind::Exe,
    ObjectKind::Lib,
    ObjectKind::BuildTgt,
    ObjectKind::BothLibs,
    ObjectKind::Jar,
];

fn target_kind(target_type: &str) -> Option<ObjectKind> {
    match target_type {
        "executable" => Some(ObjectKind::Exe),
        "shared_library" | "static_library" | "library" => Some(ObjectKind::Lib),
        "shared_module" => Some(ObjectKind::BuildTgt),
        "both_libraries" => Some(ObjectKind::BothLibs),
        "jar" => Some(ObjectKind::Jar),
        _ => None,
    }
}

/// Declared positional parameter receiving the argument at `index`. A
/// trailing vararg absorbs everything past the end.
fn positional_at(positionals: &[&'static Argument], index: usize) -> Option<&'static Argument> {
    match positionals.get(index) {
        Some(arg) => Some(*arg),
        None => positionals
            .last()
            .copied()
            .filter(|arg| matches!(arg, Argument::Positional { varargs: true, .. })),
    }
}

impl<'a> TypeAnalyzer<'a> {
    pub(super) fn type_from_function_call(
        &mut self,
        node: NodeId,
        id: NodeId,
        args: Option<NodeId>,
    ) -> TypeSet {
        if let Some(args) = args {
            self.infer_expression(args);
        }
        self.current_file().function_calls.push(node);

        let name = self.ast.identifier_name(id).unwrap_or_default().to_string();
        let Some(function) = lookup_function(&name) else {
            if self.config.report_unresolved {
                let location = self.ast.location(id);
                self.report_error(format!("Unknown function `{name}`"), location);
            }
            return TypeSet::empty();
        };

        match self.ast.kind_mut(node) {
            NodeKind::FunctionCall { function: slot, .. }
            | NodeKind::SubdirCall { function: slot, .. }
            | NodeKind::MultiSubdirCall { function: slot, .. } => *slot = Some(function),
            other => unreachable!("function call index holds {other:?}"),
        }
        let callee = Callee::Function(function);
        self.register_kwargs(args, callee);
        self.check_call(node, args, callee);
        self.refine_function(function, args)
    }

    pub(super) fn type_from_method_call(
        &mut self,
        node: NodeId,
        obj: NodeId,
        id: NodeId,
        args: Option<NodeId>,
    ) -> TypeSet {
        let receiver = self.infer_expression(obj);
        if let Some(args) = args {
            self.infer_expression(args);
        }
        self.current_file().method_calls.push(node);

        let name = self.ast.identifier_name(id).unwrap_or_default().to_string();
        let mut resolved: Option<&'static Method> = None;
        let mut result = Vec::new();
        for ty in &receiver {
            if let Some(method) = get_method(ty, &name) {
                resolved.get_or_insert(method);
                result.extend(self.refine_method(method, ty, args).iter().cloned());
            }
        }
        if resolved.is_none() && (receiver.is_empty() || receiver.iter().any(Type::is_any)) {
            if let Some(method) = lookup_method(&name) {
                resolved = Some(method);
                result.extend(method.return_types().iter().cloned());
            }
        }
        if receiver.contains(&Type::Disabler) {
            result.push(Type::Disabler);
        }

        let Some(method) = resolved else {
            let only_disabler = receiver.as_slice() == [Type::Disabler];
            if self.config.report_unresolved && !only_disabler {
                let location = self.ast.location(id);
                self.report_error(
                    format!("No method `{name}` found for types `{receiver}`"),
                    location,
                );
            }
            return TypeSet::new(result);
        };

        if let NodeKind::MethodCall { method: slot, .. } = self.ast.kind_mut(node) {
            *slot = Some(method);
        }
        let callee = Callee::Method(method);
        self.register_kwargs(args, callee);
        self.check_call(node, args, callee);
        TypeSet::new(result)
    }

    fn register_kwargs(&mut self, args: Option<NodeId>, callee: Callee) {
        let keyword_items: Vec<NodeId> = self
            .ast
            .arguments(args)
            .iter()
            .copied()
            .filter(|arg| matches!(self.ast.kind(*arg), NodeKind::KeywordItem { .. }))
            .collect();
        let file = self.current_file();
        file.kwargs
            .extend(keyword_items.into_iter().map(|item| (item, callee)));
    }

    /// Argument count, keyword and type checks against the callee's
    /// signature.
    fn check_call(&mut self, node: NodeId, args: Option<NodeId>, callee: Callee) {
        let callable = callee.callable();
        if !self.config.check_arguments || !callable.checked() {
            return;
        }

        let positionals = callable.positionals();
        let mut positional_count = 0;
        let mut seen_kwarg = false;
        let mut forwards_kwargs = false;
        let mut given_kwargs: Vec<String> = Vec::new();

        for arg in self.ast.arguments(args).to_vec() {
            let location = self.ast.location(arg);
            match self.ast.kind(arg).clone() {
                NodeKind::KeywordItem { key, value } => {
                    seen_kwarg = true;
                    let Some(name) = self.ast.identifier_name(key).map(str::to_string) else {
                        continue;
                    };
                    if name == "kwargs" {
                        forwards_kwargs = true;
                        continue;
                    }
                    match callable.kwarg(&name) {
                        Some(expected) => {
                            self.check_argument_type(expected, value);
                            given_kwargs.push(name);
                        }
                        None => {
                            let key_location = self.ast.location(key);
                            self.report_error(
                                format!("Unknown key word argument '{name}'!"),
                                key_location,
                            );
                        }
                    }
                }
                _ => {
                    if seen_kwarg {
                        self.report_error(
                            "Unexpected positional argument after a keyword argument",
                            location,
                        );
                    }
                    if let Some(expected) = positional_at(&positionals, positional_count) {
                        self.check_argument_type(expected, arg);
                    }
                    positional_count += 1;
                }
            }
        }

        let location = self.ast.location(node);
        if !forwards_kwargs {
            for required in callable.required_kwargs() {
                if !given_kwargs.iter().any(|given| given == required) {
                    self.report_error(
                        format!("Missing required key word argument '{required}'!"),
                        location,
                    );
                }
            }
        }

        let minimum = callable.min_positional();
        if positional_count < minimum {
            let message = if positional_count == 0 {
                format!("Expected {minimum} positional arguments, but got none!")
            } else {
                format!(
                    "Expected at least {minimum} positional arguments, but got {positional_count}!"
                )
            };
            self.report_error(message, location);
        }
        if let Some(maximum) = callable.max_positional() {
            if positional_count > maximum {
                self.report_error(
                    format!(
                        "Expected maximum {maximum} positional arguments, but got {positional_count}!"
                    ),
                    location,
                );
            }
        }
    }

    fn check_argument_type(&mut self, expected: &Argument, value: NodeId) {
        let expected_types = expected.types();
        let given = self.ast.types(value).clone();
        if !operators::compatible(&expected_types, &given) {
            let location = self.ast.location(value);
            self.report_error(format!("Expected {expected_types}, got {given}"), location);
        }
    }

    fn first_positional(&self, args: Option<NodeId>) -> Option<NodeId> {
        self.ast.positional_args(args).first().copied()
    }

    fn second_positional_types(&self, args: Option<NodeId>) -> TypeSet {
        self.ast
            .positional_args(args)
            .get(1)
            .map(|arg| self.ast.types(*arg).clone())
            .unwrap_or_default()
    }

    fn guess(&self, expr: NodeId) -> Vec<String> {
        guess_values(&*self.ast, self.options, expr)
    }

    /// Narrows the declared return types of calls whose result depends on
    /// their (string) arguments.
    fn refine_function(&mut self, function: &'static Function, args: Option<NodeId>) -> TypeSet {
        let declared = function.return_types();
        match function.name {
            "import" => {
                let Some(module) = self.first_positional(args) else {
                    return declared;
                };
                let names = self.guess(module);
                if names.is_empty() {
                    return declared;
                }
                let mut kinds = Vec::new();
                for name in names {
                    match ObjectKind::for_module(&name) {
                        Some(kind) => kinds.push(Type::Object(kind)),
                        None => {
                            let location = self.ast.location(module);
                            self.report_warning(format!("Unknown module `{name}`"), location);
                            kinds.push(Type::Object(ObjectKind::Module));
                        }
                    }
                }
                TypeSet::new(kinds)
            }
            "get_option" => {
                let Some(option) = self.first_positional(args) else {
                    return declared;
                };
                let names = self.guess(option);
                let location = self.ast.location(option);
                let mut types = TypeSet::empty();
                for name in &names {
                    match self.options.find_option(name) {
                        Some(found) => {
                            if found.deprecated {
                                self.report_warning("Deprecated option", location);
                            }
                            types = types.union(&found.value_types());
                        }
                        None if names.len() == 1 => {
                            self.report_error(format!("Unknown option `{name}`"), location);
                        }
                        None => {}
                    }
                }
                if types.is_empty() {
                    declared
                } else {
                    types
                }
            }
            "build_target" => {
                let guessed = self
                    .ast
                    .kwarg(args, "target_type")
                    .map(|value| self.guess(value))
                    .unwrap_or_default();
                let kinds: Vec<Type> = guessed
                    .iter()
                    .filter_map(|name| target_kind(name))
                    .map(Type::Object)
                    .collect();
                if kinds.is_empty() {
                    BUILD_TARGET_KINDS.iter().copied().map(Type::Object).collect()
                } else {
                    TypeSet::new(kinds)
                }
            }
            "get_variable" => {
                let default = self.second_positional_types(args);
                let names = self
                    .first_positional(args)
                    .map(|name| self.guess(name))
                    .unwrap_or_default();
                if names.is_empty() {
                    return default.union(&TypeSet::single(Type::Any));
                }
                let any = TypeSet::single(Type::Any);
                names
                    .iter()
                    .map(|name| self.scope.get(name).unwrap_or(&any))
                    .fold(default, |acc, types| acc.union(types))
            }
            "set_variable" => {
                let value = self.second_positional_types(args);
                let names = self
                    .first_positional(args)
                    .map(|name| self.guess(name))
                    .unwrap_or_default();
                for name in names {
                    self.scope.set(name, value.clone());
                }
                declared
            }
            _ => declared,
        }
    }

    fn refine_method(
        &self,
        method: &'static Method,
        receiver: &Type,
        args: Option<NodeId>,
    ) -> TypeSet {
        match (method.name, receiver) {
            ("get", Type::List(elements)) | ("get", Type::Dict(elements)) => {
                elements.union(&self.second_positional_types(args))
            }
            _ => method.return_types(),
        }
    }
}
