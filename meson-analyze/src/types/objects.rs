macro_rules! object_kinds {
    ($($variant:ident => $name:literal $(: $parent:ident)?,)*) => {
        /// Named object types known to the build language.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ObjectKind {
            $($variant,)*
        }

        impl ObjectKind {
            pub const ALL: &'static [ObjectKind] = &[$(ObjectKind::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(ObjectKind::$variant => $name,)*
                }
            }

            /// The type this one inherits methods from.
            pub fn parent(self) -> Option<ObjectKind> {
                match self {
                    $(ObjectKind::$variant => object_kinds!(@parent $($parent)?),)*
                }
            }
        }
    };
    (@parent) => { None };
    (@parent $parent:ident) => { Some(ObjectKind::$parent) };
}

object_kinds! {
    Meson => "meson",
    BuildMachine => "build_machine",
    HostMachine => "host_machine": BuildMachine,
    TargetMachine => "target_machine": BuildMachine,
    AliasTgt => "alias_tgt": Tgt,
    BothLibs => "both_libs": Lib,
    BuildTgt => "build_tgt": Tgt,
    CfgData => "cfg_data",
    Compiler => "compiler",
    CustomIdx => "custom_idx",
    CustomTgt => "custom_tgt": Tgt,
    Dep => "dep",
    Env => "env",
    Exe => "exe": BuildTgt,
    ExternalProgram => "external_program",
    ExtractedObj => "extracted_obj",
    Feature => "feature",
    File => "file",
    Generator => "generator",
    GeneratedList => "generated_list",
    Inc => "inc",
    Jar => "jar": BuildTgt,
    Lib => "lib": BuildTgt,
    Module => "module",
    Range => "range",
    RunResult => "runresult",
    RunTgt => "run_tgt": Tgt,
    StructuredSrc => "structured_src",
    Subproject => "subproject",
    Tgt => "tgt",
    CmakeModule => "cmake_module": Module,
    CmakeSubproject => "cmake_subproject",
    CmakeSubprojectOptions => "cmake_subprojectoptions",
    CudaModule => "cuda_module": Module,
    DlangModule => "dlang_module": Module,
    ExternalProject => "external_project",
    ExternalProjectModule => "external_project_module": Module,
    FsModule => "fs_module": Module,
    GnomeModule => "gnome_module": Module,
    HotdocModule => "hotdoc_module": Module,
    HotdocTarget => "hotdoc_target": CustomTgt,
    I18nModule => "i18n_module": Module,
    IcestormModule => "icestorm_module": Module,
    JavaModule => "java_module": Module,
    KeyvalModule => "keyval_module": Module,
    PkgconfigModule => "pkgconfig_module": Module,
    Python3Module => "python3_module": Module,
    PythonInstallation => "python_installation": ExternalProgram,
    PythonModule => "python_module": Module,
    Qt4Module => "qt4_module": Module,
    Qt5Module => "qt5_module": Module,
    Qt6Module => "qt6_module": Module,
    RustModule => "rust_module": Module,
    SimdModule => "simd_module": Module,
    SourceFiles => "sourcefiles",
    SourceSet => "sourceset",
    SourcesetModule => "sourceset_module": Module,
    WaylandModule => "wayland_module": Module,
    WindowsModule => "windows_module": Module,
}

impl ObjectKind {
    pub fn from_name(name: &str) -> Option<ObjectKind> {
        ObjectKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// `self` followed by each ancestor, nearest first.
    pub fn lineage(self) -> impl Iterator<Item = ObjectKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// Object returned by `import(name)`.
    pub fn for_module(name: &str) -> Option<ObjectKind> {
        let kind = match name {
            "cmake" => ObjectKind::CmakeModule,
            "fs" => ObjectKind::FsModule,
            "gnome" => ObjectKind::GnomeModule,
            "i18n" => ObjectKind::I18nModule,
            "rust" | "unstable-rust" => ObjectKind::RustModule,
            "python" => ObjectKind::PythonModule,
            "python3" => ObjectKind::Python3Module,
            "pkgconfig" => ObjectKind::PkgconfigModule,
            "keyval" | "unstable-keyval" => ObjectKind::KeyvalModule,
            "dlang" => ObjectKind::DlangModule,
            "unstable-external_project" => ObjectKind::ExternalProjectModule,
            "hotdoc" => ObjectKind::HotdocModule,
            "java" => ObjectKind::JavaModule,
            "windows" => ObjectKind::WindowsModule,
            "cuda" | "unstable-cuda" => ObjectKind::CudaModule,
            "icestorm" | "unstable-icestorm" => ObjectKind::IcestormModule,
            "qt4" => ObjectKind::Qt4Module,
            "qt5" => ObjectKind::Qt5Module,
            "qt6" => ObjectKind::Qt6Module,
            "sourceset" => ObjectKind::SourcesetModule,
            "unstable-simd" | "simd" => ObjectKind::SimdModule,
            "unstable-wayland" | "wayland" => ObjectKind::WaylandModule,
            _ => return None,
        };
        Some(kind)
    }
}
