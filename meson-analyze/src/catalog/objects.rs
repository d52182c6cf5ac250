use super::{kw, method, obj, opt, pos, varargs, Argument, Method, Ty, ANY, BOOL, INT, STR, VOID};
use crate::types::ObjectKind;

const STRS: &[Ty] = &[STR, Ty::List(&[STR])];
const FILE: Ty = obj(ObjectKind::File);
const DEP: Ty = obj(ObjectKind::Dep);
const INC: Ty = obj(ObjectKind::Inc);
const CUSTOM_IDX: Ty = obj(ObjectKind::CustomIdx);
const EXTRACTED: Ty = obj(ObjectKind::ExtractedObj);

const STR_METHODS: &[Method] = &[
    method("str", "contains", &[pos("fragment", &[STR])], &[BOOL]),
    method("str", "endswith", &[pos("fragment", &[STR])], &[BOOL]),
    method(
        "str",
        "format",
        &[varargs("value", &[INT, BOOL, STR])],
        &[STR],
    ),
    method("str", "join", &[varargs("strings", STRS)], &[STR]),
    method(
        "str",
        "replace",
        &[pos("old", &[STR]), pos("new", &[STR])],
        &[STR],
    ),
    method("str", "split", &[opt("split_string", &[STR])], &[Ty::List(&[STR])]),
    method("str", "splitlines", &[], &[Ty::List(&[STR])]),
    method("str", "startswith", &[pos("fragment", &[STR])], &[BOOL]),
    method("str", "strip", &[opt("strip_chars", &[STR])], &[STR]),
    method(
        "str",
        "substring",
        &[opt("start", &[INT]), opt("end", &[INT])],
        &[STR],
    ),
    method("str", "to_int", &[], &[INT]),
    method("str", "to_lower", &[], &[STR]),
    method("str", "to_upper", &[], &[STR]),
    method("str", "underscorify", &[], &[STR]),
    method(
        "str",
        "version_compare",
        &[pos("compare_string", &[STR])],
        &[BOOL],
    ),
];

const INT_METHODS: &[Method] = &[
    method("int", "is_even", &[], &[BOOL]),
    method("int", "is_odd", &[], &[BOOL]),
    method("int", "to_string", &[kw("fill", &[INT])], &[STR]),
];

const BOOL_METHODS: &[Method] = &[
    method("bool", "to_int", &[], &[INT]),
    method(
        "bool",
        "to_string",
        &[opt("true_str", &[STR]), opt("false_str", &[STR])],
        &[STR],
    ),
];

// `get` is refined by the analyzer to the element types.
const LIST_METHODS: &[Method] = &[
    method("list", "contains", &[pos("item", &[ANY])], &[BOOL]),
    method(
        "list",
        "get",
        &[pos("index", &[INT]), opt("fallback", &[ANY])],
        &[ANY],
    ),
    method("list", "length", &[], &[INT]),
];

const DICT_METHODS: &[Method] = &[
    method(
        "dict",
        "get",
        &[pos("key", &[STR]), opt("fallback", &[ANY])],
        &[ANY],
    ),
    method("dict", "has_key", &[pos("key", &[STR])], &[BOOL]),
    method("dict", "keys", &[], &[Ty::List(&[STR])]),
];

const MESON_METHODS: &[Method] = &[
    method(
        "meson",
        "add_devenv",
        &[
            pos("env", &[obj(ObjectKind::Env), STR, Ty::List(&[STR]), Ty::Dict(&[STR])]),
            kw("method", &[STR]),
            kw("separator", &[STR]),
        ],
        &[VOID],
    ),
    method(
        "meson",
        "add_dist_script",
        &[
            pos("script_name", &[STR, FILE, obj(ObjectKind::ExternalProgram)]),
            varargs("arg", &[STR, FILE, obj(ObjectKind::ExternalProgram)]),
        ],
        &[VOID],
    ),
    method(
        "meson",
        "add_install_script",
        &[
            pos(
                "script_name",
                &[STR, FILE, obj(ObjectKind::ExternalProgram), obj(ObjectKind::Exe)],
            ),
            varargs("arg", &[STR, FILE, obj(ObjectKind::Tgt), obj(ObjectKind::ExternalProgram)]),
            kw("dry_run", &[BOOL]),
            kw("install_tag", &[STR]),
            kw("skip_if_destdir", &[BOOL]),
        ],
        &[VOID],
    ),
    method(
        "meson",
        "add_postconf_script",
        &[
            pos("script_name", &[STR, FILE, obj(ObjectKind::ExternalProgram)]),
            varargs("arg", &[STR, FILE, obj(ObjectKind::ExternalProgram)]),
        ],
        &[VOID],
    ),
    method("meson", "backend", &[], &[STR]),
    method("meson", "build_options", &[], &[STR]),
    method("meson", "build_root", &[], &[STR]),
    method("meson", "can_run_host_binaries", &[], &[BOOL]),
    method("meson", "current_build_dir", &[], &[STR]),
    method("meson", "current_source_dir", &[], &[STR]),
    method(
        "meson",
        "get_compiler",
        &[pos("language", &[STR]), kw("native", &[BOOL])],
        &[obj(ObjectKind::Compiler)],
    ),
    method(
        "meson",
        "get_cross_property",
        &[pos("propname", &[STR]), opt("fallback_value", &[ANY])],
        &[ANY],
    ),
    method(
        "meson",
        "get_external_property",
        &[
            pos("propname", &[STR]),
            opt("fallback_value", &[ANY]),
            kw("native", &[BOOL]),
        ],
        &[ANY],
    ),
    method("meson", "global_build_root", &[], &[STR]),
    method("meson", "global_source_root", &[], &[STR]),
    method("meson", "has_exe_wrapper", &[], &[BOOL]),
    method(
        "meson",
        "has_external_property",
        &[pos("propname", &[STR]), kw("native", &[BOOL])],
        &[BOOL],
    ),
    method(
        "meson",
        "install_dependency_manifest",
        &[pos("output_name", &[STR])],
        &[VOID],
    ),
    method("meson", "is_cross_build", &[], &[BOOL]),
    method("meson", "is_subproject", &[], &[BOOL]),
    method("meson", "is_unity", &[], &[BOOL]),
    method(
        "meson",
        "override_dependency",
        &[
            pos("name", &[STR]),
            pos("dep_object", &[DEP]),
            kw("native", &[BOOL]),
            kw("static", &[BOOL]),
        ],
        &[VOID],
    ),
    method(
        "meson",
        "override_find_program",
        &[
            pos("progname", &[STR]),
            pos("program", &[obj(ObjectKind::Exe), FILE, obj(ObjectKind::ExternalProgram)]),
        ],
        &[VOID],
    ),
    method("meson", "project_build_root", &[], &[STR]),
    method("meson", "project_license", &[], &[Ty::List(&[STR])]),
    method("meson", "project_license_files", &[], &[Ty::List(&[FILE])]),
    method("meson", "project_name", &[], &[STR]),
    method("meson", "project_source_root", &[], &[STR]),
    method("meson", "project_version", &[], &[STR]),
    method("meson", "source_root", &[], &[STR]),
    method("meson", "version", &[], &[STR]),
];

const BUILD_MACHINE_METHODS: &[Method] = &[
    method("build_machine", "cpu", &[], &[STR]),
    method("build_machine", "cpu_family", &[], &[STR]),
    method("build_machine", "endian", &[], &[STR]),
    method("build_machine", "kernel", &[], &[STR]),
    method("build_machine", "subsystem", &[], &[STR]),
    method("build_machine", "system", &[], &[STR]),
];

const BOTH_LIBS_METHODS: &[Method] = &[
    method("both_libs", "get_shared_lib", &[], &[obj(ObjectKind::Lib)]),
    method("both_libs", "get_static_lib", &[], &[obj(ObjectKind::Lib)]),
];

const BUILD_TGT_METHODS: &[Method] = &[
    method(
        "build_tgt",
        "extract_all_objects",
        &[kw("recursive", &[BOOL])],
        &[EXTRACTED],
    ),
    method(
        "build_tgt",
        "extract_objects",
        &[varargs("source", &[STR, FILE])],
        &[EXTRACTED],
    ),
    method("build_tgt", "found", &[], &[BOOL]),
    method("build_tgt", "full_path", &[], &[STR]),
    method("build_tgt", "name", &[], &[STR]),
    method("build_tgt", "path", &[], &[STR]),
    method("build_tgt", "private_dir_include", &[], &[INC]),
];

const CODE: &[Ty] = &[STR, FILE];
const COMPILER_CHECK_KWARGS: &[Argument] = &[
    kw("args", STRS),
    kw("dependencies", &[DEP, Ty::List(&[DEP])]),
    kw("include_directories", &[INC, STR, Ty::List(&[INC, STR])]),
    kw("no_builtin_args", &[BOOL]),
    kw("prefix", STRS),
    kw("required", &[BOOL, obj(ObjectKind::Feature)]),
];

/// A compiler method that runs a check and accepts the common check kwargs.
const fn check(name: &'static str, args: &'static [Argument], returns: &'static [Ty]) -> Method {
    Method {
        shared_kwargs: COMPILER_CHECK_KWARGS,
        ..method("compiler", name, args, returns)
    }
}

const COMPILER_METHODS: &[Method] = &[
    check("alignment", &[pos("typename", &[STR])], &[INT]),
    check("check_header", &[pos("header_name", &[STR])], &[BOOL]),
    method("compiler", "cmd_array", &[], &[Ty::List(&[STR])]),
    check("compiles", &[pos("code", CODE)], &[BOOL]),
    check("compute_int", &[pos("expr", &[STR])], &[INT]),
    method(
        "compiler",
        "find_library",
        &[
            pos("libname", &[STR]),
            kw("dirs", STRS),
            kw("disabler", &[BOOL]),
            kw("has_headers", STRS),
            kw("required", &[BOOL, obj(ObjectKind::Feature)]),
            kw("static", &[BOOL]),
        ],
        &[DEP],
    ),
    method(
        "compiler",
        "first_supported_argument",
        &[varargs("arg", STRS)],
        &[Ty::List(&[STR])],
    ),
    method(
        "compiler",
        "first_supported_link_argument",
        &[varargs("arg", STRS)],
        &[Ty::List(&[STR])],
    ),
    method("compiler", "get_argument_syntax", &[], &[STR]),
    check("get_define", &[pos("definename", &[STR])], &[STR]),
    method("compiler", "get_id", &[], &[STR]),
    method("compiler", "get_linker_id", &[], &[STR]),
    method(
        "compiler",
        "get_supported_arguments",
        &[varargs("arg", STRS), kw("checked", &[STR])],
        &[Ty::List(&[STR])],
    ),
    method(
        "compiler",
        "get_supported_function_attributes",
        &[varargs("attribs", STRS)],
        &[Ty::List(&[STR])],
    ),
    method(
        "compiler",
        "get_supported_link_arguments",
        &[varargs("arg", STRS)],
        &[Ty::List(&[STR])],
    ),
    method("compiler", "has_argument", &[pos("argument", &[STR])], &[BOOL]),
    check("has_function", &[pos("funcname", &[STR])], &[BOOL]),
    method(
        "compiler",
        "has_function_attribute",
        &[pos("name", &[STR])],
        &[BOOL],
    ),
    check("has_header", &[pos("header_name", &[STR])], &[BOOL]),
    check(
        "has_header_symbol",
        &[pos("header", &[STR]), pos("symbol", &[STR])],
        &[BOOL],
    ),
    method(
        "compiler",
        "has_link_argument",
        &[pos("argument", &[STR])],
        &[BOOL],
    ),
    check(
        "has_member",
        &[pos("typename", &[STR]), pos("membername", &[STR])],
        &[BOOL],
    ),
    check(
        "has_members",
        &[pos("typename", &[STR]), varargs("member", &[STR])],
        &[BOOL],
    ),
    method(
        "compiler",
        "has_multi_arguments",
        &[varargs("arg", &[STR])],
        &[BOOL],
    ),
    method(
        "compiler",
        "has_multi_link_arguments",
        &[varargs("arg", &[STR])],
        &[BOOL],
    ),
    check("has_type", &[pos("typename", &[STR])], &[BOOL]),
    check("links", &[pos("source", CODE)], &[BOOL]),
    method(
        "compiler",
        "preprocess",
        &[varargs("source", &[STR, FILE, obj(ObjectKind::CustomTgt), CUSTOM_IDX])],
        &[Ty::List(&[CUSTOM_IDX])],
    ),
    check(
        "run",
        &[pos("code", CODE)],
        &[obj(ObjectKind::RunResult)],
    ),
    check("sizeof", &[pos("typename", &[STR])], &[INT]),
    method("compiler", "symbols_have_underscore_prefix", &[], &[BOOL]),
    method("compiler", "version", &[], &[STR]),
];

const CUSTOM_IDX_METHODS: &[Method] = &[method("custom_idx", "full_path", &[], &[STR])];

const CUSTOM_TGT_METHODS: &[Method] = &[
    method("custom_tgt", "full_path", &[], &[STR]),
    method("custom_tgt", "to_list", &[], &[Ty::List(&[CUSTOM_IDX])]),
];

const DEP_METHODS: &[Method] = &[
    method("dep", "as_link_whole", &[], &[DEP]),
    method("dep", "as_system", &[opt("value", &[STR])], &[DEP]),
    method("dep", "found", &[], &[BOOL]),
    method(
        "dep",
        "get_configtool_variable",
        &[pos("var_name", &[STR])],
        &[STR],
    ),
    method(
        "dep",
        "get_pkgconfig_variable",
        &[
            pos("var_name", &[STR]),
            kw("default", &[STR]),
            kw("define_variable", &[Ty::List(&[STR])]),
        ],
        &[STR],
    ),
    method(
        "dep",
        "get_variable",
        &[
            opt("varname", &[STR]),
            kw("cmake", &[STR]),
            kw("configtool", &[STR]),
            kw("default_value", &[STR]),
            kw("internal", &[STR]),
            kw("pkgconfig", &[STR]),
            kw("pkgconfig_define", &[Ty::List(&[STR])]),
        ],
        &[STR],
    ),
    method("dep", "include_type", &[], &[STR]),
    method("dep", "name", &[], &[STR]),
    method(
        "dep",
        "partial_dependency",
        &[
            kw("compile_args", &[BOOL]),
            kw("includes", &[BOOL]),
            kw("link_args", &[BOOL]),
            kw("links", &[BOOL]),
            kw("sources", &[BOOL]),
        ],
        &[DEP],
    ),
    method("dep", "type_name", &[], &[STR]),
    method("dep", "version", &[], &[STR]),
];

const ENV_METHODS: &[Method] = &[
    method(
        "env",
        "append",
        &[pos("variable", &[STR]), varargs("value", &[STR]), kw("separator", &[STR])],
        &[VOID],
    ),
    method(
        "env",
        "prepend",
        &[pos("variable", &[STR]), varargs("value", &[STR]), kw("separator", &[STR])],
        &[VOID],
    ),
    method(
        "env",
        "set",
        &[pos("variable", &[STR]), varargs("value", &[STR]), kw("separator", &[STR])],
        &[VOID],
    ),
    method("env", "unset", &[pos("variable", &[STR])], &[VOID]),
];

const EXTERNAL_PROGRAM_METHODS: &[Method] = &[
    method("external_program", "found", &[], &[BOOL]),
    method("external_program", "full_path", &[], &[STR]),
    method("external_program", "path", &[], &[STR]),
    method("external_program", "version", &[], &[STR]),
];

const FEATURE_METHODS: &[Method] = &[
    method("feature", "allowed", &[], &[BOOL]),
    method("feature", "auto", &[], &[BOOL]),
    method(
        "feature",
        "disable_auto_if",
        &[pos("value", &[BOOL])],
        &[obj(ObjectKind::Feature)],
    ),
    method(
        "feature",
        "disable_if",
        &[pos("value", &[BOOL]), kw("error_message", &[STR])],
        &[obj(ObjectKind::Feature)],
    ),
    method("feature", "disabled", &[], &[BOOL]),
    method(
        "feature",
        "enable_auto_if",
        &[pos("value", &[BOOL])],
        &[obj(ObjectKind::Feature)],
    ),
    method(
        "feature",
        "enable_if",
        &[pos("value", &[BOOL]), kw("error_message", &[STR])],
        &[obj(ObjectKind::Feature)],
    ),
    method("feature", "enabled", &[], &[BOOL]),
    method(
        "feature",
        "require",
        &[pos("value", &[BOOL]), kw("error_message", &[STR])],
        &[obj(ObjectKind::Feature)],
    ),
];

const CFG_DATA_METHODS: &[Method] = &[
    method(
        "cfg_data",
        "get",
        &[pos("varname", &[STR]), opt("default_value", &[STR, INT, BOOL])],
        &[STR, INT, BOOL],
    ),
    method(
        "cfg_data",
        "get_unquoted",
        &[pos("varname", &[STR]), opt("default_value", &[STR, INT, BOOL])],
        &[STR, INT, BOOL],
    ),
    method("cfg_data", "has", &[pos("varname", &[STR])], &[BOOL]),
    method("cfg_data", "keys", &[], &[Ty::List(&[STR])]),
    method(
        "cfg_data",
        "merge_from",
        &[pos("other", &[obj(ObjectKind::CfgData)])],
        &[VOID],
    ),
    method(
        "cfg_data",
        "set",
        &[
            pos("varname", &[STR]),
            pos("value", &[STR, INT, BOOL]),
            kw("description", &[STR]),
        ],
        &[VOID],
    ),
    method(
        "cfg_data",
        "set10",
        &[pos("varname", &[STR]), pos("value", &[BOOL, INT]), kw("description", &[STR])],
        &[VOID],
    ),
    method(
        "cfg_data",
        "set_quoted",
        &[pos("varname", &[STR]), pos("value", &[STR]), kw("description", &[STR])],
        &[VOID],
    ),
];

const FILE_METHODS: &[Method] = &[method("file", "full_path", &[], &[STR])];

const GENERATOR_METHODS: &[Method] = &[method(
    "generator",
    "process",
    &[
        varargs("source", &[STR, FILE, obj(ObjectKind::CustomTgt), CUSTOM_IDX]),
        kw("extra_args", STRS),
        kw("preserve_path_from", &[STR]),
    ],
    &[obj(ObjectKind::GeneratedList)],
)];

const MODULE_METHODS: &[Method] = &[method("module", "found", &[], &[BOOL])];

const RUNRESULT_METHODS: &[Method] = &[
    method("runresult", "compiled", &[], &[BOOL]),
    method("runresult", "returncode", &[], &[INT]),
    method("runresult", "stderr", &[], &[STR]),
    method("runresult", "stdout", &[], &[STR]),
];

const SUBPROJECT_METHODS: &[Method] = &[
    method("subproject", "found", &[], &[BOOL]),
    method(
        "subproject",
        "get_variable",
        &[pos("var_name", &[STR]), opt("fallback", &[ANY])],
        &[ANY],
    ),
];

pub(crate) static VTABLES: &[&[Method]] = &[
    STR_METHODS,
    INT_METHODS,
    BOOL_METHODS,
    LIST_METHODS,
    DICT_METHODS,
    MESON_METHODS,
    BUILD_MACHINE_METHODS,
    BOTH_LIBS_METHODS,
    BUILD_TGT_METHODS,
    CFG_DATA_METHODS,
    COMPILER_METHODS,
    CUSTOM_IDX_METHODS,
    CUSTOM_TGT_METHODS,
    DEP_METHODS,
    ENV_METHODS,
    EXTERNAL_PROGRAM_METHODS,
    FEATURE_METHODS,
    FILE_METHODS,
    GENERATOR_METHODS,
    MODULE_METHODS,
    RUNRESULT_METHODS,
    SUBPROJECT_METHODS,
];
