use serde::Serialize;
use tracing::{debug, warn};

use crate::ast::{Ast, NodeId, NodeKind};
use crate::types::{ObjectKind, Type, TypeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Integer,
    Boolean,
    Feature,
    Combo { values: Vec<String> },
    Array { choices: Vec<String> },
}

/// A build option, builtin or declared by the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MesonOption {
    pub name: String,
    pub description: Option<String>,
    pub deprecated: bool,
    #[serde(flatten)]
    pub kind: OptionKind,
}

impl MesonOption {
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            OptionKind::String => "string",
            OptionKind::Integer => "integer",
            OptionKind::Boolean => "boolean",
            OptionKind::Feature => "feature",
            OptionKind::Combo { .. } => "combo",
            OptionKind::Array { .. } => "array",
        }
    }

    /// Types `get_option()` yields for this option.
    pub fn value_types(&self) -> TypeSet {
        match self.kind {
            OptionKind::String | OptionKind::Combo { .. } => TypeSet::single(Type::Str),
            OptionKind::Integer => TypeSet::single(Type::Int),
            OptionKind::Boolean => TypeSet::single(Type::Bool),
            OptionKind::Feature => TypeSet::single(Type::Object(ObjectKind::Feature)),
            OptionKind::Array { .. } => {
                TypeSet::single(Type::list_of([Type::Int, Type::Str, Type::Bool]))
            }
        }
    }

    /// Values a string-valued option may statically take.
    pub fn possible_values(&self) -> &[String] {
        match &self.kind {
            OptionKind::Combo { values } => values,
            OptionKind::Array { choices } => choices,
            _ => &[],
        }
    }
}

#[derive(Clone, Copy)]
enum Builtin {
    Str,
    Int,
    Bool,
    Feature,
    Combo(&'static [&'static str]),
    Array,
}

const BUILTIN_OPTIONS: &[(&str, Builtin, &str)] = &[
    (
        "auto_features",
        Builtin::Feature,
        "Override value of all `auto` features (Default: `auto`)",
    ),
    (
        "backend",
        Builtin::Combo(&[
            "ninja", "vs", "vs2010", "vs2012", "vs2013", "vs2015", "vs2017", "vs2019", "vs2022",
            "xcode", "none",
        ]),
        "Backend to use (Default: `ninja`)",
    ),
    (
        "b_colorout",
        Builtin::Combo(&["auto", "always", "never"]),
        "Use colored output (Default: `always`)",
    ),
    ("b_coverage", Builtin::Bool, "Enable coverage tracking (Default: `false`)"),
    ("b_lto", Builtin::Bool, "Use link time optimization (Default: `false`)"),
    ("b_lto_threads", Builtin::Int, "Use multiple threads for lto (Default: `0`)"),
    (
        "b_ndebug",
        Builtin::Combo(&["true", "false", "if-release"]),
        "Disable asserts (Default: `false`)",
    ),
    ("b_pch", Builtin::Bool, "Use precompiled headers (Default: `true`)"),
    ("b_pie", Builtin::Bool, "Build position independent executables (Default: `false`)"),
    (
        "b_sanitize",
        Builtin::Combo(&[
            "none",
            "address",
            "thread",
            "undefined",
            "memory",
            "leak",
            "address,undefined",
        ]),
        "Code sanitizer to use (Default: `none`)",
    ),
    (
        "b_vscrt",
        Builtin::Combo(&[
            "none",
            "md",
            "mdd",
            "mt",
            "mtd",
            "from_buildtype",
            "static_from_buildtype",
        ]),
        "VS runtime library to use (Default: `from_buildtype`)",
    ),
    ("bindir", Builtin::Str, "Executable directory (Default: `bin`)"),
    (
        "buildtype",
        Builtin::Combo(&["plain", "debug", "debugoptimized", "release", "minsize", "custom"]),
        "Build type to use (Default: `debug`)",
    ),
    ("c_args", Builtin::Array, "C compile arguments to use"),
    ("c_link_args", Builtin::Array, "C link arguments to use"),
    (
        "c_std",
        Builtin::Combo(&[
            "none", "c89", "c99", "c11", "c17", "c18", "c2x", "gnu89", "gnu99", "gnu11", "gnu17",
            "gnu18", "gnu2x", "gnu23",
        ]),
        "C language standard to use",
    ),
    (
        "cmake_prefix_path",
        Builtin::Array,
        "Additional prefixes for cmake to search before builtin paths",
    ),
    ("cpp_args", Builtin::Array, "C++ compile arguments to use"),
    ("cpp_link_args", Builtin::Array, "C++ link arguments to use"),
    (
        "cpp_std",
        Builtin::Combo(&[
            "none", "c++98", "c++03", "c++11", "c++14", "c++17", "c++1z", "c++2a", "c++20",
            "gnu++03", "gnu++11", "gnu++14", "gnu++17", "gnu++1z", "gnu++2a", "gnu++20",
        ]),
        "C++ language standard to use",
    ),
    ("datadir", Builtin::Str, "Data file directory (Default: `share`)"),
    ("debug", Builtin::Bool, "Enable debug symbols and other information (Default: `true`)"),
    (
        "default_library",
        Builtin::Combo(&["shared", "static", "both"]),
        "Default library type (Default: `shared`)",
    ),
    ("errorlogs", Builtin::Bool, "Whether to print the logs from failing tests (Default: `true`)"),
    (
        "force_fallback_for",
        Builtin::Array,
        "Force fallback for those dependencies (Default: Empty array)",
    ),
    ("includedir", Builtin::Str, "Header file directory (Default: `include`)"),
    ("infodir", Builtin::Str, "Info page directory (Default: `share/info`)"),
    ("layout", Builtin::Combo(&["mirror", "flat"]), "Build directory layout (Default: `mirror`)"),
    ("libdir", Builtin::Str, "Library directory"),
    ("libexecdir", Builtin::Str, "Library executable directory (Default: `libexec`)"),
    ("localedir", Builtin::Str, "Locale data directory (Default: `share/locale`)"),
    ("localstatedir", Builtin::Str, "Localstate data directory (Default: `var`)"),
    ("mandir", Builtin::Str, "Manual page directory (Default: `share/man`)"),
    (
        "optimization",
        Builtin::Combo(&["plain", "0", "g", "1", "2", "3", "s"]),
        "Optimization level (Default: `0`)",
    ),
    (
        "pkg_config_path",
        Builtin::Array,
        "Additional paths for pkg-config to search before builtin paths",
    ),
    (
        "prefer_static",
        Builtin::Bool,
        "Whether to try static linking before shared linking (Default: `false`)",
    ),
    ("prefix", Builtin::Str, "Installation prefix (`C:\\` or `/usr/local` by default)"),
    ("sbindir", Builtin::Str, "System executable directory (Default: `sbin`)"),
    ("sharedstatedir", Builtin::Str, "Architecture-independent data directory (Default: `com`)"),
    ("stdsplit", Builtin::Bool, "Split stdout and stderr in test logs (Default: `true`)"),
    ("strip", Builtin::Bool, "Strip targets on install (Default: `false`)"),
    ("sysconfdir", Builtin::Str, "Sysconf data directory (Default: `etc`)"),
    ("unity", Builtin::Combo(&["on", "off", "subprojects"]), "Unity build (Default: `off`)"),
    ("unity_size", Builtin::Int, "Unity block size (Default: `4`)"),
    ("vsenv", Builtin::Bool, "Activate Visual Studio environment (Default: `false`)"),
    (
        "warning_level",
        Builtin::Combo(&["0", "1", "2", "3", "everything"]),
        "Set the warning level. From 0 = none to everything = highest (Default: `1`)",
    ),
    ("werror", Builtin::Bool, "Treat warnings as errors (Default: `false`)"),
    (
        "wrap_mode",
        Builtin::Combo(&["default", "nofallback", "nodownload", "forcefallback", "nopromote"]),
        "Wrap mode to use (Default: `default`)",
    ),
];

/// Every option a project can query with `get_option()`.
#[derive(Debug, Clone, Serialize)]
pub struct OptionState {
    options: Vec<MesonOption>,
}

impl Default for OptionState {
    fn default() -> Self {
        Self::builtin()
    }
}

impl OptionState {
    pub fn builtin() -> Self {
        let options = BUILTIN_OPTIONS
            .iter()
            .map(|(name, kind, description)| MesonOption {
                name: name.to_string(),
                description: Some(description.to_string()),
                deprecated: false,
                kind: match kind {
                    Builtin::Str => OptionKind::String,
                    Builtin::Int => OptionKind::Integer,
                    Builtin::Bool => OptionKind::Boolean,
                    Builtin::Feature => OptionKind::Feature,
                    Builtin::Combo(values) => OptionKind::Combo {
                        values: values.iter().map(|value| value.to_string()).collect(),
                    },
                    Builtin::Array => OptionKind::Array {
                        choices: Vec::new(),
                    },
                },
            })
            .collect();
        Self { options }
    }

    /// Builtin options followed by `project_options`.
    pub fn with_project_options(project_options: Vec<MesonOption>) -> Self {
        let mut state = Self::builtin();
        state.options.extend(project_options);
        state
    }

    /// Looks up an option. Project options shadow builtins of the same name.
    pub fn find_option(&self, name: &str) -> Option<&MesonOption> {
        self.options.iter().rev().find(|option| option.name == name)
    }

    pub fn options(&self) -> &[MesonOption] {
        &self.options
    }
}

/// Collects the `option()` declarations below `root`.
///
/// Only declarations with a literal name and a literal `type:` are used.
/// Description, deprecation flag and choices are taken when they are
/// literals too.
pub fn extract_options(ast: &Ast, root: NodeId) -> Vec<MesonOption> {
    let mut options = Vec::new();
    let mut pending = vec![root];
    let mut calls = Vec::new();
    while let Some(id) = pending.pop() {
        if let NodeKind::FunctionCall { id: callee, args, .. } = ast.kind(id) {
            if ast.identifier_name(*callee) == Some("option") {
                calls.push((id, *args));
            }
        }
        pending.extend(ast.children(id).into_iter().rev());
    }
    calls.sort_by_key(|(id, _)| *id);

    for (_, args) in calls {
        if let Some(option) = option_from_call(ast, args) {
            debug!(name = %option.name, kind = option.type_name(), "found option");
            options.push(option);
        }
    }
    options
}

fn option_from_call(ast: &Ast, args: Option<NodeId>) -> Option<MesonOption> {
    let name = ast.positional_args(args).first().and_then(|first| ast.string_value(*first))?;
    let kind_name = ast.kwarg(args, "type").and_then(|value| ast.string_value(value))?;

    let description = ast
        .kwarg(args, "description")
        .and_then(|value| ast.string_value(value))
        .map(str::to_string);
    let deprecated = match ast.kwarg(args, "deprecated").map(|value| ast.kind(value)) {
        Some(NodeKind::BooleanLiteral { value }) => *value,
        _ => false,
    };
    let choices: Vec<String> = match ast.kwarg(args, "choices").map(|value| ast.kind(value)) {
        Some(NodeKind::ArrayLiteral { elements }) => elements
            .iter()
            .filter_map(|element| ast.string_value(*element))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let kind = match kind_name {
        "string" => OptionKind::String,
        "integer" => OptionKind::Integer,
        "boolean" => OptionKind::Boolean,
        "feature" => OptionKind::Feature,
        "array" => OptionKind::Array { choices },
        "combo" => OptionKind::Combo { values: choices },
        other => {
            warn!(name, kind = other, "unknown option type");
            return None;
        }
    };

    Some(MesonOption {
        name: name.to_string(),
        description,
        deprecated,
        kind,
    })
}
