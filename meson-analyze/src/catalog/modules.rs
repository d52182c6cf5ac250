use super::{
    kw, loose_method, method, obj, opt, pos, varargs, Method, Ty, ANY, BOOL, INT, STR, VOID,
};
use crate::types::ObjectKind;

const STRS: &[Ty] = &[STR, Ty::List(&[STR])];
const FILE: Ty = obj(ObjectKind::File);
const DEP: Ty = obj(ObjectKind::Dep);
const CUSTOM_TGT: Ty = obj(ObjectKind::CustomTgt);
const CUSTOM_TGTS: Ty = Ty::List(&[CUSTOM_TGT]);
const PATHLIKE: &[Ty] =
    &[STR, FILE, CUSTOM_TGT, obj(ObjectKind::CustomIdx), obj(ObjectKind::BuildTgt)];

const CMAKE_MODULE: &[Method] = &[
    method(
        "cmake_module",
        "subproject",
        &[
            pos("name", &[STR]),
            kw("cmake_options", STRS),
            kw("options", &[obj(ObjectKind::CmakeSubprojectOptions)]),
            kw("required", &[BOOL, obj(ObjectKind::Feature)]),
        ],
        &[obj(ObjectKind::CmakeSubproject)],
    ),
    method(
        "cmake_module",
        "subproject_options",
        &[],
        &[obj(ObjectKind::CmakeSubprojectOptions)],
    ),
    loose_method("cmake_module", "write_basic_package_version_file", &[VOID]),
    loose_method("cmake_module", "configure_package_config_file", &[VOID]),
];

const CMAKE_SUBPROJECT: &[Method] = &[
    method(
        "cmake_subproject",
        "dependency",
        &[pos("target", &[STR]), kw("include_type", &[STR])],
        &[DEP],
    ),
    method(
        "cmake_subproject",
        "include_directories",
        &[pos("target", &[STR])],
        &[obj(ObjectKind::Inc)],
    ),
    method(
        "cmake_subproject",
        "target",
        &[pos("target", &[STR])],
        &[obj(ObjectKind::Tgt)],
    ),
    method("cmake_subproject", "target_type", &[pos("target", &[STR])], &[STR]),
    method("cmake_subproject", "target_list", &[], &[Ty::List(&[STR])]),
    method("cmake_subproject", "found", &[], &[BOOL]),
    method(
        "cmake_subproject",
        "get_variable",
        &[pos("var_name", &[STR]), opt("fallback", &[ANY])],
        &[ANY],
    ),
];

const CMAKE_SUBPROJECT_OPTIONS: &[Method] = &[
    loose_method("cmake_subprojectoptions", "add_cmake_defines", &[VOID]),
    loose_method("cmake_subprojectoptions", "set_override_option", &[VOID]),
    loose_method("cmake_subprojectoptions", "set_install", &[VOID]),
    loose_method("cmake_subprojectoptions", "append_compile_args", &[VOID]),
    loose_method("cmake_subprojectoptions", "append_link_args", &[VOID]),
    method("cmake_subprojectoptions", "clear", &[], &[VOID]),
];

const CUDA_MODULE: &[Method] = &[
    method(
        "cuda_module",
        "min_driver_version",
        &[pos("version", &[STR, obj(ObjectKind::Compiler)])],
        &[STR],
    ),
    loose_method("cuda_module", "nvcc_arch_flags", &[Ty::List(&[STR])]),
    loose_method("cuda_module", "nvcc_arch_readable", &[Ty::List(&[STR])]),
];

const DLANG_MODULE: &[Method] = &[loose_method("dlang_module", "generate_dub_file", &[VOID])];

const EXTERNAL_PROJECT: &[Method] = &[method(
    "external_project",
    "dependency",
    &[pos("subdir", &[STR])],
    &[DEP],
)];

const EXTERNAL_PROJECT_MODULE: &[Method] = &[loose_method(
    "external_project_module",
    "add_project",
    &[obj(ObjectKind::ExternalProject)],
)];

const FS_MODULE: &[Method] = &[
    method("fs_module", "exists", &[pos("file", &[STR])], &[BOOL]),
    method("fs_module", "is_dir", &[pos("file", &[STR])], &[BOOL]),
    method("fs_module", "is_file", &[pos("file", &[STR])], &[BOOL]),
    method("fs_module", "is_symlink", &[pos("file", &[STR, FILE])], &[BOOL]),
    method("fs_module", "is_absolute", &[pos("file", &[STR, FILE])], &[BOOL]),
    method(
        "fs_module",
        "hash",
        &[pos("file", &[STR, FILE]), pos("hash_algorithm", &[STR])],
        &[STR],
    ),
    method("fs_module", "size", &[pos("file", &[STR, FILE])], &[INT]),
    method(
        "fs_module",
        "is_samepath",
        &[pos("path1", &[STR, FILE]), pos("path2", &[STR, FILE])],
        &[BOOL],
    ),
    method("fs_module", "expand_user", &[pos("file", &[STR])], &[STR]),
    method("fs_module", "as_posix", &[pos("file", &[STR])], &[STR]),
    method(
        "fs_module",
        "replace_suffix",
        &[pos("file", PATHLIKE), pos("suffix", &[STR])],
        &[STR],
    ),
    method("fs_module", "parent", &[pos("file", PATHLIKE)], &[STR]),
    method("fs_module", "name", &[pos("file", PATHLIKE)], &[STR]),
    method("fs_module", "stem", &[pos("file", PATHLIKE)], &[STR]),
    method(
        "fs_module",
        "read",
        &[pos("file", &[STR, FILE]), kw("encoding", &[STR])],
        &[STR],
    ),
    method(
        "fs_module",
        "copyfile",
        &[
            pos("src", &[STR, FILE]),
            opt("dst", &[STR]),
            kw("install", &[BOOL]),
            kw("install_dir", &[STR]),
            kw("install_mode", &[STR, INT, Ty::List(&[STR, INT])]),
            kw("install_tag", &[STR]),
        ],
        &[CUSTOM_TGT],
    ),
    method(
        "fs_module",
        "relative_to",
        &[pos("file", PATHLIKE), pos("start", PATHLIKE)],
        &[STR],
    ),
];

const GNOME_MODULE: &[Method] = &[
    loose_method("gnome_module", "compile_resources", &[Ty::List(&[obj(ObjectKind::BuildTgt)])]),
    loose_method("gnome_module", "generate_gir", &[CUSTOM_TGTS]),
    loose_method("gnome_module", "genmarshal", &[CUSTOM_TGTS]),
    loose_method("gnome_module", "mkenums", &[CUSTOM_TGTS]),
    loose_method("gnome_module", "mkenums_simple", &[CUSTOM_TGTS]),
    loose_method("gnome_module", "compile_schemas", &[CUSTOM_TGT]),
    loose_method("gnome_module", "gdbus_codegen", &[CUSTOM_TGTS]),
    loose_method("gnome_module", "generate_vapi", &[DEP]),
    loose_method("gnome_module", "yelp", &[VOID]),
    loose_method("gnome_module", "gtkdoc", &[CUSTOM_TGTS]),
    method(
        "gnome_module",
        "gtkdoc_html_dir",
        &[pos("module", &[STR])],
        &[STR],
    ),
    loose_method("gnome_module", "post_install", &[VOID]),
];

const HOTDOC_MODULE: &[Method] = &[
    method(
        "hotdoc_module",
        "has_extensions",
        &[varargs("extension", &[STR])],
        &[BOOL],
    ),
    loose_method("hotdoc_module", "generate_doc", &[obj(ObjectKind::HotdocTarget)]),
];

const HOTDOC_TARGET: &[Method] = &[method("hotdoc_target", "config_path", &[], &[STR])];

const I18N_MODULE: &[Method] = &[
    loose_method("i18n_module", "gettext", &[Ty::List(&[CUSTOM_TGTS, CUSTOM_TGT])]),
    loose_method("i18n_module", "merge_file", &[CUSTOM_TGT]),
    loose_method("i18n_module", "itstool_join", &[CUSTOM_TGT]),
    loose_method("i18n_module", "xgettext", &[CUSTOM_TGT]),
];

const ICESTORM_MODULE: &[Method] = &[loose_method(
    "icestorm_module",
    "project",
    &[Ty::List(&[obj(ObjectKind::RunTgt), CUSTOM_TGT])],
)];

const JAVA_MODULE: &[Method] = &[
    loose_method("java_module", "generate_native_header", &[CUSTOM_TGT]),
    loose_method("java_module", "generate_native_headers", &[CUSTOM_TGT]),
    loose_method("java_module", "native_headers", &[CUSTOM_TGT]),
];

const KEYVAL_MODULE: &[Method] = &[method(
    "keyval_module",
    "load",
    &[pos("file", &[STR, FILE])],
    &[Ty::Dict(&[STR])],
)];

const PKGCONFIG_MODULE: &[Method] = &[loose_method(
    "pkgconfig_module",
    "generate",
    &[obj(ObjectKind::ExternalProgram)],
)];

const PYTHON_INSTALLATION: &[Method] = &[
    loose_method("python_installation", "extension_module", &[obj(ObjectKind::BuildTgt)]),
    method(
        "python_installation",
        "dependency",
        &[
            kw("embed", &[BOOL]),
            kw("required", &[BOOL, obj(ObjectKind::Feature)]),
            kw("disabler", &[BOOL]),
        ],
        &[DEP],
    ),
    method(
        "python_installation",
        "get_install_dir",
        &[kw("pure", &[BOOL]), kw("subdir", &[STR])],
        &[STR],
    ),
    method(
        "python_installation",
        "get_path",
        &[pos("path_name", &[STR]), opt("fallback", &[ANY])],
        &[STR],
    ),
    method(
        "python_installation",
        "get_variable",
        &[pos("variable_name", &[STR]), opt("fallback", &[ANY])],
        &[STR],
    ),
    method("python_installation", "has_path", &[pos("path_name", &[STR])], &[BOOL]),
    method("python_installation", "has_variable", &[pos("variable_name", &[STR])], &[BOOL]),
    loose_method("python_installation", "install_sources", &[VOID]),
    method("python_installation", "language_version", &[], &[STR]),
];

const PYTHON_MODULE: &[Method] = &[method(
    "python_module",
    "find_installation",
    &[
        opt("name_or_path", &[STR]),
        kw("disabler", &[BOOL]),
        kw("modules", STRS),
        kw("pure", &[BOOL]),
        kw("required", &[BOOL, obj(ObjectKind::Feature)]),
    ],
    &[obj(ObjectKind::PythonInstallation)],
)];

const PYTHON3_MODULE: &[Method] = &[
    method("python3_module", "find_python", &[], &[obj(ObjectKind::ExternalProgram)]),
    loose_method("python3_module", "extension_module", &[obj(ObjectKind::BuildTgt)]),
    method("python3_module", "language_version", &[], &[STR]),
    method(
        "python3_module",
        "sysconfig_path",
        &[pos("path_name", &[STR])],
        &[STR],
    ),
];

macro_rules! qt_module {
    ($name:ident, $owner:literal) => {
        const $name: &[Method] = &[
            loose_method($owner, "compile_resources", &[CUSTOM_TGTS]),
            loose_method($owner, "compile_ui", &[CUSTOM_TGTS]),
            loose_method($owner, "compile_moc", &[CUSTOM_TGTS]),
            loose_method($owner, "preprocess", &[CUSTOM_TGTS]),
            loose_method($owner, "compile_translations", &[CUSTOM_TGTS]),
            method(
                $owner,
                "has_tools",
                &[
                    kw("method", &[STR]),
                    kw("required", &[BOOL, obj(ObjectKind::Feature)]),
                ],
                &[BOOL],
            ),
        ];
    };
}

qt_module!(QT4_MODULE, "qt4_module");
qt_module!(QT5_MODULE, "qt5_module");
qt_module!(QT6_MODULE, "qt6_module");

const RUST_MODULE: &[Method] = &[
    loose_method("rust_module", "test", &[VOID]),
    loose_method("rust_module", "bindgen", &[CUSTOM_TGT]),
    loose_method("rust_module", "proc_macro", &[obj(ObjectKind::BuildTgt)]),
];

const SIMD_MODULE: &[Method] = &[loose_method(
    "simd_module",
    "check",
    &[Ty::List(&[obj(ObjectKind::CfgData), obj(ObjectKind::Lib)])],
)];

const SOURCE_FILES: &[Method] = &[
    method("sourcefiles", "sources", &[], &[Ty::List(&[STR, FILE])]),
    method("sourcefiles", "dependencies", &[], &[Ty::List(&[STR, FILE])]),
];

const SOURCE_SET: &[Method] = &[
    loose_method("sourceset", "add", &[VOID]),
    loose_method("sourceset", "add_all", &[VOID]),
    loose_method("sourceset", "all_sources", &[Ty::List(&[STR, FILE])]),
    loose_method("sourceset", "all_dependencies", &[Ty::List(&[STR, FILE])]),
    loose_method("sourceset", "apply", &[obj(ObjectKind::SourceFiles)]),
];

const SOURCESET_MODULE: &[Method] = &[method(
    "sourceset_module",
    "source_set",
    &[],
    &[obj(ObjectKind::SourceSet)],
)];

const WAYLAND_MODULE: &[Method] = &[
    loose_method("wayland_module", "scan_xml", &[CUSTOM_TGTS]),
    method(
        "wayland_module",
        "find_protocol",
        &[pos("name", &[STR]), kw("state", &[STR]), kw("version", &[INT])],
        &[FILE],
    ),
];

const WINDOWS_MODULE: &[Method] = &[loose_method(
    "windows_module",
    "compile_resources",
    &[Ty::List(&[CUSTOM_TGT])],
)];

pub(crate) static VTABLES: &[&[Method]] = &[
    CMAKE_MODULE,
    CMAKE_SUBPROJECT,
    CMAKE_SUBPROJECT_OPTIONS,
    CUDA_MODULE,
    DLANG_MODULE,
    EXTERNAL_PROJECT,
    EXTERNAL_PROJECT_MODULE,
    FS_MODULE,
    GNOME_MODULE,
    HOTDOC_MODULE,
    HOTDOC_TARGET,
    I18N_MODULE,
    ICESTORM_MODULE,
    JAVA_MODULE,
    KEYVAL_MODULE,
    PKGCONFIG_MODULE,
    PYTHON_INSTALLATION,
    PYTHON_MODULE,
    PYTHON3_MODULE,
    QT4_MODULE,
    QT5_MODULE,
    QT6_MODULE,
    RUST_MODULE,
    SIMD_MODULE,
    SOURCE_FILES,
    SOURCE_SET,
    SOURCESET_MODULE,
    WAYLAND_MODULE,
    WINDOWS_MODULE,
];
