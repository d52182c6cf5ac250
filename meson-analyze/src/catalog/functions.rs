use super::{
    function, kw, obj, opt, pos, required, target_function, varargs, Argument, Function, Ty, ANY,
    BOOL, INT, STR, VOID,
};
use crate::types::ObjectKind;

const FILE: Ty = obj(ObjectKind::File);
const DEP: Ty = obj(ObjectKind::Dep);
const EXE: Ty = obj(ObjectKind::Exe);
const LIB: Ty = obj(ObjectKind::Lib);
const JAR: Ty = obj(ObjectKind::Jar);
const BUILD_TGT: Ty = obj(ObjectKind::BuildTgt);
const BOTH_LIBS: Ty = obj(ObjectKind::BothLibs);
const CUSTOM_TGT: Ty = obj(ObjectKind::CustomTgt);
const CUSTOM_IDX: Ty = obj(ObjectKind::CustomIdx);
const EXTERNAL_PROGRAM: Ty = obj(ObjectKind::ExternalProgram);
const ENV: Ty = obj(ObjectKind::Env);
const INC: Ty = obj(ObjectKind::Inc);
const FEATURE: Ty = obj(ObjectKind::Feature);
const TGT: Ty = obj(ObjectKind::Tgt);

const STRS: &[Ty] = &[STR, Ty::List(&[STR])];
const STR_OR_FILE: &[Ty] = &[STR, FILE];
const DEPS: &[Ty] = &[DEP, Ty::List(&[DEP])];
const REQUIRED: &[Ty] = &[BOOL, FEATURE];
const INSTALL_DIR: &[Ty] = &[STR, BOOL, Ty::List(&[STR, BOOL])];
const INSTALL_MODE: &[Ty] = &[STR, INT, Ty::List(&[STR, INT])];
const SOURCES: &[Ty] = &[
    STR,
    FILE,
    CUSTOM_TGT,
    CUSTOM_IDX,
    obj(ObjectKind::GeneratedList),
    obj(ObjectKind::StructuredSrc),
    obj(ObjectKind::ExtractedObj),
    Ty::List(&[
        STR,
        FILE,
        CUSTOM_TGT,
        CUSTOM_IDX,
        obj(ObjectKind::GeneratedList),
    ]),
];
const COMMAND: &[Ty] = &[
    STR,
    FILE,
    EXE,
    EXTERNAL_PROGRAM,
    CUSTOM_TGT,
    Ty::List(&[STR, FILE, EXE, EXTERNAL_PROGRAM, CUSTOM_TGT]),
];
const ENV_LIKE: &[Ty] = &[ENV, STR, Ty::List(&[STR]), Ty::Dict(&[STR, Ty::List(&[STR])])];
const TEST_EXE: &[Ty] = &[EXE, JAR, EXTERNAL_PROGRAM, FILE, CUSTOM_TGT, CUSTOM_IDX];
const LINK_TARGETS: &[Ty] =
    &[LIB, CUSTOM_TGT, CUSTOM_IDX, Ty::List(&[LIB, CUSTOM_TGT, CUSTOM_IDX])];

/// Keyword arguments accepted by every build target function.
pub(crate) const BUILD_TARGET_KWARGS: &[Argument] = &[
    kw("build_by_default", &[BOOL]),
    kw("build_rpath", &[STR]),
    kw("c_args", STRS),
    kw("c_pch", STR_OR_FILE),
    kw("cpp_args", STRS),
    kw("cpp_pch", STR_OR_FILE),
    kw("cs_args", STRS),
    kw("cuda_args", STRS),
    kw("cython_args", STRS),
    kw("d_args", STRS),
    kw("d_debug", STRS),
    kw("d_import_dirs", STRS),
    kw("d_module_versions", STRS),
    kw("d_unittest", &[BOOL]),
    kw("darwin_versions", &[STR, INT, Ty::List(&[STR, INT])]),
    kw("dependencies", DEPS),
    kw("export_dynamic", &[BOOL]),
    kw("extra_files", &[STR, FILE, Ty::List(&[STR, FILE])]),
    kw("fortran_args", STRS),
    kw("gnu_symbol_visibility", &[STR]),
    kw("gui_app", &[BOOL]),
    kw("implib", &[BOOL, STR]),
    kw("implicit_include_directories", &[BOOL]),
    kw("include_directories", &[INC, STR, Ty::List(&[INC, STR])]),
    kw("install", &[BOOL]),
    kw("install_dir", INSTALL_DIR),
    kw("install_mode", INSTALL_MODE),
    kw("install_rpath", &[STR]),
    kw("install_tag", &[STR]),
    kw("java_args", STRS),
    kw("java_resources", &[obj(ObjectKind::StructuredSrc)]),
    kw("link_args", STRS),
    kw("link_depends", &[STR, FILE, CUSTOM_TGT, CUSTOM_IDX, Ty::List(&[STR, FILE])]),
    kw("link_language", &[STR]),
    kw("link_whole", LINK_TARGETS),
    kw("link_with", LINK_TARGETS),
    kw("main_class", &[STR]),
    kw("masm_args", STRS),
    kw("name_prefix", &[STR, Ty::List(&[])]),
    kw("name_suffix", &[STR, Ty::List(&[])]),
    kw("nasm_args", STRS),
    kw("native", &[BOOL]),
    kw("objc_args", STRS),
    kw("objcpp_args", STRS),
    kw(
        "objects",
        &[
            obj(ObjectKind::ExtractedObj),
            FILE,
            STR,
            Ty::List(&[obj(ObjectKind::ExtractedObj), FILE, STR]),
        ],
    ),
    kw("override_options", &[Ty::List(&[STR]), Ty::Dict(&[STR, INT, BOOL])]),
    kw("pic", &[BOOL]),
    kw("pie", &[BOOL]),
    kw("prelink", &[BOOL]),
    kw("rust_abi", &[STR]),
    kw("rust_args", STRS),
    kw("rust_crate_type", &[STR]),
    kw("rust_dependency_map", &[Ty::Dict(&[STR])]),
    kw("sources", SOURCES),
    kw("soversion", &[STR, INT]),
    kw("swift_args", STRS),
    kw("vala_args", STRS),
    kw("vala_gir", &[STR]),
    kw("vala_header", &[STR]),
    kw("vala_vapi", &[STR]),
    kw("version", &[STR]),
    kw("vs_module_defs", &[STR, FILE, CUSTOM_TGT, CUSTOM_IDX]),
    kw("win_subsystem", &[STR]),
];

const TARGET_ARGS: &[Argument] = &[
    pos("target_name", &[STR]),
    varargs("source", SOURCES),
];

const COMPILER_ARGUMENT_ARGS: &[Argument] = &[
    varargs("argument", &[STR]),
    required("language", STRS),
    kw("native", &[BOOL]),
];

const TEST_ARGS: &[Argument] = &[
    pos("name", &[STR]),
    pos("executable", TEST_EXE),
    kw("args", &[STR, FILE, TGT, Ty::List(&[STR, FILE, TGT])]),
    kw("depends", &[BUILD_TGT, CUSTOM_TGT, Ty::List(&[BUILD_TGT, CUSTOM_TGT])]),
    kw("env", ENV_LIKE),
    kw("is_parallel", &[BOOL]),
    kw("priority", &[INT]),
    kw("protocol", &[STR]),
    kw("should_fail", &[BOOL]),
    kw("suite", STRS),
    kw("timeout", &[INT]),
    kw("verbose", &[BOOL]),
    kw("workdir", &[STR]),
];

const MESSAGE_ARGS: &[Argument] = &[
    pos("text", &[STR, INT, BOOL, Ty::List(&[ANY]), Ty::Dict(&[ANY])]),
    varargs("more_text", &[STR, INT, BOOL, Ty::List(&[ANY]), Ty::Dict(&[ANY])]),
];

pub(crate) static FUNCTIONS: &[Function] = &[
    function("add_global_arguments", COMPILER_ARGUMENT_ARGS, &[VOID]),
    function("add_global_link_arguments", COMPILER_ARGUMENT_ARGS, &[VOID]),
    function(
        "add_languages",
        &[
            varargs("language", &[STR]),
            kw("native", &[BOOL]),
            kw("required", REQUIRED),
        ],
        &[BOOL],
    ),
    function("add_project_arguments", COMPILER_ARGUMENT_ARGS, &[VOID]),
    function(
        "add_project_dependencies",
        &[
            varargs("dependencies", DEPS),
            required("language", STRS),
            kw("native", &[BOOL]),
        ],
        &[VOID],
    ),
    function("add_project_link_arguments", COMPILER_ARGUMENT_ARGS, &[VOID]),
    function(
        "add_test_setup",
        &[
            pos("setup_name", &[STR]),
            kw("env", ENV_LIKE),
            kw("exclude_suites", STRS),
            kw("exe_wrapper", &[STR, EXTERNAL_PROGRAM, Ty::List(&[STR, EXTERNAL_PROGRAM])]),
            kw("gdb", &[BOOL]),
            kw("is_default", &[BOOL]),
            kw("timeout_multiplier", &[INT]),
        ],
        &[VOID],
    ),
    function(
        "alias_target",
        &[pos("target_name", &[STR]), varargs("dep", &[TGT])],
        &[obj(ObjectKind::AliasTgt)],
    ),
    function(
        "assert",
        &[pos("condition", &[BOOL]), opt("message", &[STR])],
        &[VOID],
    ),
    function("benchmark", TEST_ARGS, &[VOID]),
    target_function("both_libraries", TARGET_ARGS, &[BOTH_LIBS]),
    target_function(
        "build_target",
        &[
            pos("target_name", &[STR]),
            varargs("source", SOURCES),
            kw("target_type", &[STR]),
        ],
        &[BUILD_TGT],
    ),
    function(
        "configuration_data",
        &[opt("data", &[Ty::Dict(&[STR, INT, BOOL])])],
        &[obj(ObjectKind::CfgData)],
    ),
    function(
        "configure_file",
        &[
            kw("capture", &[BOOL]),
            kw("command", COMMAND),
            kw("configuration", &[obj(ObjectKind::CfgData), Ty::Dict(&[STR, INT, BOOL])]),
            kw("copy", &[BOOL]),
            kw("depfile", &[STR]),
            kw("encoding", &[STR]),
            kw("format", &[STR]),
            kw("input", &[STR, FILE, Ty::List(&[STR, FILE])]),
            kw("install", &[BOOL]),
            kw("install_dir", &[STR, BOOL]),
            kw("install_mode", INSTALL_MODE),
            kw("install_tag", &[STR]),
            required("output", &[STR]),
            kw("output_format", &[STR]),
        ],
        &[FILE],
    ),
    function(
        "custom_target",
        &[
            opt("name", &[STR]),
            kw("build_always", &[BOOL]),
            kw("build_always_stale", &[BOOL]),
            kw("build_by_default", &[BOOL]),
            kw("capture", &[BOOL]),
            kw("command", COMMAND),
            kw("console", &[BOOL]),
            kw("depend_files", &[STR, FILE, Ty::List(&[STR, FILE])]),
            kw("depends", &[BUILD_TGT, CUSTOM_TGT, Ty::List(&[BUILD_TGT, CUSTOM_TGT])]),
            kw("depfile", &[STR]),
            kw("env", ENV_LIKE),
            kw("feed", &[BOOL]),
            kw("input", SOURCES),
            kw("install", &[BOOL]),
            kw("install_dir", INSTALL_DIR),
            kw("install_mode", INSTALL_MODE),
            kw("install_tag", STRS),
            kw("output", STRS),
        ],
        &[CUSTOM_TGT],
    ),
    function("debug", MESSAGE_ARGS, &[VOID]),
    function(
        "declare_dependency",
        &[
            kw("compile_args", STRS),
            kw("d_import_dirs", STRS),
            kw("d_module_versions", STRS),
            kw("dependencies", DEPS),
            kw("extra_files", &[STR, FILE, Ty::List(&[STR, FILE])]),
            kw("include_directories", &[INC, STR, Ty::List(&[INC, STR])]),
            kw("link_args", STRS),
            kw("link_whole", LINK_TARGETS),
            kw("link_with", LINK_TARGETS),
            kw(
                "objects",
                &[obj(ObjectKind::ExtractedObj), Ty::List(&[obj(ObjectKind::ExtractedObj)])],
            ),
            kw("sources", SOURCES),
            kw("variables", &[Ty::Dict(&[STR]), Ty::List(&[STR])]),
            kw("version", &[STR]),
        ],
        &[DEP],
    ),
    function(
        "dependency",
        &[
            varargs("names", &[STR]),
            kw("allow_fallback", &[BOOL]),
            kw("cmake_args", STRS),
            kw("cmake_module_path", STRS),
            kw("cmake_package_version", &[STR]),
            kw("components", STRS),
            kw("default_options", &[Ty::List(&[STR]), Ty::Dict(&[STR, INT, BOOL])]),
            kw("disabler", &[BOOL]),
            kw("fallback", STRS),
            kw("include_type", &[STR]),
            kw("language", &[STR]),
            kw("main", &[BOOL]),
            kw("method", &[STR]),
            kw("modules", STRS),
            kw("native", &[BOOL]),
            kw("not_found_message", &[STR]),
            kw("optional_modules", STRS),
            kw("private_headers", &[BOOL]),
            kw("required", REQUIRED),
            kw("static", &[BOOL]),
            kw("version", STRS),
        ],
        &[DEP],
    ),
    function("disabler", &[], &[Ty::Disabler]),
    function(
        "environment",
        &[
            opt("env", &[STR, Ty::List(&[STR]), Ty::Dict(&[STR, Ty::List(&[STR])])]),
            kw("method", &[STR]),
            kw("separator", &[STR]),
        ],
        &[ENV],
    ),
    function("error", MESSAGE_ARGS, &[VOID]),
    target_function("executable", TARGET_ARGS, &[EXE]),
    function(
        "files",
        &[varargs("file", &[STR])],
        &[Ty::List(&[FILE])],
    ),
    function(
        "find_program",
        &[
            pos("program_name", &[STR, FILE]),
            varargs("fallback", &[STR, FILE]),
            kw("dirs", STRS),
            kw("disabler", &[BOOL]),
            kw("native", &[BOOL]),
            kw("required", REQUIRED),
            kw("version", STRS),
            kw("version_argument", &[STR]),
        ],
        &[EXTERNAL_PROGRAM],
    ),
    function(
        "generator",
        &[
            pos("exe", &[EXE, EXTERNAL_PROGRAM]),
            kw("arguments", STRS),
            kw("capture", &[BOOL]),
            kw("depends", &[BUILD_TGT, CUSTOM_TGT, Ty::List(&[BUILD_TGT, CUSTOM_TGT])]),
            kw("depfile", &[STR]),
            kw("output", STRS),
        ],
        &[obj(ObjectKind::Generator)],
    ),
    function(
        "get_option",
        &[pos("option_name", &[STR])],
        &[STR, INT, BOOL, FEATURE, Ty::List(&[STR, INT, BOOL])],
    ),
    function(
        "get_variable",
        &[pos("variable_name", &[STR]), opt("default", &[ANY])],
        &[ANY],
    ),
    function(
        "import",
        &[
            pos("module_name", &[STR]),
            kw("disabler", &[BOOL]),
            kw("required", REQUIRED),
        ],
        &[obj(ObjectKind::Module)],
    ),
    function(
        "include_directories",
        &[varargs("includes", &[STR, INC]), kw("is_system", &[BOOL])],
        &[INC],
    ),
    function(
        "install_data",
        &[
            varargs("file", &[STR, FILE]),
            kw("follow_symlinks", &[BOOL]),
            kw("install_dir", &[STR]),
            kw("install_mode", INSTALL_MODE),
            kw("install_tag", &[STR]),
            kw("preserve_path", &[BOOL]),
            kw("rename", STRS),
            kw("sources", &[STR, FILE, Ty::List(&[STR, FILE])]),
        ],
        &[VOID],
    ),
    function(
        "install_emptydir",
        &[
            varargs("dirpath", &[STR]),
            kw("install_mode", INSTALL_MODE),
            kw("install_tag", &[STR]),
        ],
        &[VOID],
    ),
    function(
        "install_headers",
        &[
            varargs("file", &[STR, FILE]),
            kw("follow_symlinks", &[BOOL]),
            kw("install_dir", &[STR]),
            kw("install_mode", INSTALL_MODE),
            kw("preserve_path", &[BOOL]),
            kw("subdir", &[STR]),
        ],
        &[VOID],
    ),
    function(
        "install_man",
        &[
            varargs("file", &[STR, FILE]),
            kw("install_dir", &[STR]),
            kw("install_mode", INSTALL_MODE),
            kw("locale", &[STR]),
        ],
        &[VOID],
    ),
    function(
        "install_subdir",
        &[
            pos("subdir_name", &[STR]),
            kw("exclude_directories", STRS),
            kw("exclude_files", STRS),
            kw("follow_symlinks", &[BOOL]),
            kw("install_dir", &[STR]),
            kw("install_mode", INSTALL_MODE),
            kw("install_tag", &[STR]),
            kw("strip_directory", &[BOOL]),
        ],
        &[VOID],
    ),
    function(
        "install_symlink",
        &[
            pos("link_name", &[STR]),
            required("install_dir", &[STR]),
            kw("install_tag", &[STR]),
            required("pointing_to", &[STR]),
        ],
        &[VOID],
    ),
    function("is_disabler", &[pos("var", &[ANY])], &[BOOL]),
    function("is_variable", &[pos("var", &[STR])], &[BOOL]),
    target_function("jar", TARGET_ARGS, &[JAR]),
    function("join_paths", &[varargs("part", &[STR])], &[STR]),
    target_function("library", TARGET_ARGS, &[LIB]),
    function("message", MESSAGE_ARGS, &[VOID]),
    function(
        "project",
        &[
            pos("project_name", &[STR]),
            varargs("language", STRS),
            kw("default_options", &[Ty::List(&[STR]), Ty::Dict(&[STR, INT, BOOL])]),
            kw("license", STRS),
            kw("license_files", STRS),
            kw("meson_version", &[STR]),
            kw("subproject_dir", &[STR]),
            kw("version", &[STR, FILE]),
        ],
        &[VOID],
    ),
    function(
        "range",
        &[pos("start", &[INT]), opt("stop", &[INT]), opt("step", &[INT])],
        &[obj(ObjectKind::Range)],
    ),
    function(
        "run_command",
        &[
            varargs("command", &[STR, FILE, EXTERNAL_PROGRAM]),
            kw("capture", &[BOOL]),
            kw("check", &[BOOL]),
            kw("env", ENV_LIKE),
        ],
        &[obj(ObjectKind::RunResult)],
    ),
    function(
        "run_target",
        &[
            pos("target_name", &[STR]),
            required("command", COMMAND),
            kw("depends", &[BUILD_TGT, CUSTOM_TGT, Ty::List(&[BUILD_TGT, CUSTOM_TGT])]),
            kw("env", ENV_LIKE),
        ],
        &[obj(ObjectKind::RunTgt)],
    ),
    function(
        "set_variable",
        &[pos("variable_name", &[STR]), pos("value", &[ANY])],
        &[VOID],
    ),
    target_function("shared_library", TARGET_ARGS, &[LIB]),
    target_function("shared_module", TARGET_ARGS, &[BUILD_TGT]),
    target_function("static_library", TARGET_ARGS, &[LIB]),
    function(
        "structured_sources",
        &[
            pos("root", &[Ty::List(&[STR, FILE, CUSTOM_TGT, CUSTOM_IDX])]),
            opt("additional", &[Ty::Dict(&[STR, FILE, CUSTOM_TGT, CUSTOM_IDX])]),
        ],
        &[obj(ObjectKind::StructuredSrc)],
    ),
    function(
        "subdir",
        &[pos("dir_name", &[STR]), kw("if_found", DEPS)],
        &[VOID],
    ),
    function("subdir_done", &[], &[VOID]),
    function(
        "subproject",
        &[
            pos("subproject_name", &[STR]),
            kw("default_options", &[Ty::List(&[STR]), Ty::Dict(&[STR, INT, BOOL])]),
            kw("required", REQUIRED),
            kw("version", &[STR]),
        ],
        &[obj(ObjectKind::Subproject)],
    ),
    function(
        "summary",
        &[
            pos("key_or_dict", &[STR, Ty::Dict(&[ANY])]),
            opt("value", &[ANY]),
            kw("bool_yn", &[BOOL]),
            kw("list_sep", &[STR]),
            kw("section", &[STR]),
        ],
        &[VOID],
    ),
    function("test", TEST_ARGS, &[VOID]),
    function("unset_variable", &[pos("varname", &[STR])], &[VOID]),
    function(
        "vcs_tag",
        &[
            kw("command", COMMAND),
            kw("fallback", &[STR]),
            required("input", &[STR, FILE]),
            required("output", &[STR]),
            kw("replace_string", &[STR]),
        ],
        &[CUSTOM_TGT],
    ),
    function("warning", MESSAGE_ARGS, &[VOID]),
];
